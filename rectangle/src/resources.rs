use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const VERTEX_SHADER: &str = "pass_through.vert";
pub const FRAGMENT_SHADER: &str = "simple.frag";
pub const TEXTURE_IMAGE: &str = "testimage";

/// Supplies shader sources and decoded images by name.
pub trait ResourceLoader {
    fn shader_source(&self, name: &str) -> Result<String, ResourceError>;
    fn image(&self, name: &str) -> Result<Image, ResourceError>;
}

/// RGBA8 pixels, rows ordered bottom to top so that texture coordinate `(0, 0)` is the
/// bottom left corner of the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Takes rows in the usual top-to-bottom order and flips them.
    pub fn from_rgba_top_down(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, ResourceError> {
        let row = width as usize * 4;

        if row * height as usize != pixels.len() {
            return Err(ResourceError::Decode(format!(
                "expected {} bytes for {width}x{height} RGBA image, got {}",
                row * height as usize,
                pixels.len()
            )));
        }

        let pixels = if row == 0 {
            pixels
        } else {
            pixels.chunks_exact(row).rev().flatten().copied().collect()
        };

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn decode_png<R: Read>(reader: R) -> Result<Self, ResourceError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder
            .read_info()
            .map_err(|e| ResourceError::Decode(e.to_string()))?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| ResourceError::Decode(e.to_string()))?;
        buf.truncate(info.buffer_size());

        if info.bit_depth != png::BitDepth::Eight {
            return Err(ResourceError::UnsupportedFormat(format!(
                "{:?} bit depth",
                info.bit_depth
            )));
        }

        let rgba = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            png::ColorType::Indexed => {
                return Err(ResourceError::UnsupportedFormat(
                    "unexpanded indexed color".to_string(),
                ))
            }
        };

        Self::from_rgba_top_down(info.width, info.height, rgba)
    }

    /// Square checkerboard with `cells` squares per side.
    pub fn checkerboard(size: u32, cells: u32) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let light = ((x / cell) + (y / cell)) % 2 == 0;
                let v = if light { 0xe0 } else { 0x50 };

                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Shaders compiled into the binary and a generated texture.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedResources;

impl ResourceLoader for EmbeddedResources {
    fn shader_source(&self, name: &str) -> Result<String, ResourceError> {
        match name {
            VERTEX_SHADER => Ok(include_str!("gl_shaders/pass_through.vert").to_string()),
            FRAGMENT_SHADER => Ok(include_str!("gl_shaders/simple.frag").to_string()),
            _ => Err(ResourceError::NotFound(name.to_string())),
        }
    }

    fn image(&self, name: &str) -> Result<Image, ResourceError> {
        match name {
            TEXTURE_IMAGE => Ok(Image::checkerboard(256, 8)),
            _ => Err(ResourceError::NotFound(name.to_string())),
        }
    }
}

/// Reads `<root>/shaders/<name>` and `<root>/images/<name>.png`, using the embedded
/// resources for anything missing on disk.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
    fallback: EmbeddedResources,
}

impl DirectoryResources {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_owned(),
            fallback: EmbeddedResources,
        }
    }

    fn shader_path(&self, name: &str) -> PathBuf {
        self.root.join("shaders").join(name)
    }

    fn image_path(&self, name: &str) -> PathBuf {
        self.root.join("images").join(format!("{name}.png"))
    }
}

impl ResourceLoader for DirectoryResources {
    fn shader_source(&self, name: &str) -> Result<String, ResourceError> {
        let path = self.shader_path(name);

        match std::fs::read_to_string(&path) {
            Ok(src) => {
                log::info!("Loaded shader {:?}", path);
                Ok(src)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{:?} not found, using built-in {name}", path);
                self.fallback.shader_source(name)
            }
            Err(e) => Err(ResourceError::Io(path, e)),
        }
    }

    fn image(&self, name: &str) -> Result<Image, ResourceError> {
        let path = self.image_path(name);

        match File::open(&path) {
            Ok(file) => {
                let image = Image::decode_png(BufReader::new(file))?;
                log::info!(
                    "Loaded image {:?} ({}x{})",
                    path,
                    image.width(),
                    image.height()
                );
                Ok(image)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{:?} not found, using built-in {name}", path);
                self.fallback.image(name)
            }
            Err(e) => Err(ResourceError::Io(path, e)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Unknown resource {0:?}")]
    NotFound(String),
    #[error("Could not read {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }

        out
    }

    #[test]
    fn flips_rows() {
        #[rustfmt::skip]
        let top_down = vec![
            1, 1, 1, 1,  2, 2, 2, 2,
            3, 3, 3, 3,  4, 4, 4, 4,
        ];

        let image = Image::from_rgba_top_down(2, 2, top_down).unwrap();

        #[rustfmt::skip]
        let expected: [u8; 16] = [
            3, 3, 3, 3,  4, 4, 4, 4,
            1, 1, 1, 1,  2, 2, 2, 2,
        ];
        assert_eq!(image.pixels(), &expected);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Image::from_rgba_top_down(2, 2, vec![0; 15]),
            Err(ResourceError::Decode(_))
        ));
    }

    #[test]
    fn decodes_rgb_png() {
        let png = encode_png(1, 2, png::ColorType::Rgb, &[255, 0, 0, 0, 0, 255]);

        let image = Image::decode_png(png.as_slice()).unwrap();

        assert_eq!((image.width(), image.height()), (1, 2));
        assert_eq!(image.pixels(), &[0_u8, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn decodes_grayscale_png() {
        let png = encode_png(2, 1, png::ColorType::Grayscale, &[10, 200]);

        let image = Image::decode_png(png.as_slice()).unwrap();

        assert_eq!(image.pixels(), &[10_u8, 10, 10, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Image::decode_png(&b"not a png"[..]),
            Err(ResourceError::Decode(_))
        ));
    }

    #[test]
    fn checkerboard_alternates() {
        let image = Image::checkerboard(4, 2);

        assert_eq!(image.pixels().len(), 4 * 4 * 4);
        assert_eq!(image.pixels()[0], 0xe0);
        assert_eq!(image.pixels()[2 * 4], 0x50);
        assert_eq!(image.pixels()[(2 * 4 + 2) * 4], 0xe0);
    }

    #[test]
    fn embedded_shaders() {
        let res = EmbeddedResources;

        assert!(res
            .shader_source(VERTEX_SHADER)
            .unwrap()
            .contains("layout(location = 2)"));
        assert!(res
            .shader_source(FRAGMENT_SHADER)
            .unwrap()
            .contains("uniform sampler2D tex"));
        assert!(matches!(
            res.shader_source("missing.glsl"),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn directory_falls_back_to_embedded() {
        let res = DirectoryResources::new("/nonexistent/rectangle-assets");

        assert!(res.shader_source(VERTEX_SHADER).is_ok());
        assert_eq!(res.image(TEXTURE_IMAGE).unwrap().width(), 256);
    }

    #[test]
    fn directory_reads_files() {
        let root = std::env::temp_dir().join(format!("rectangle-res-{}", std::process::id()));
        std::fs::create_dir_all(root.join("shaders")).unwrap();
        std::fs::create_dir_all(root.join("images")).unwrap();

        std::fs::write(root.join("shaders").join(VERTEX_SHADER), "// custom").unwrap();
        std::fs::write(
            root.join("images").join("testimage.png"),
            encode_png(1, 1, png::ColorType::Rgba, &[1, 2, 3, 4]),
        )
        .unwrap();

        let res = DirectoryResources::new(&root);

        assert_eq!(res.shader_source(VERTEX_SHADER).unwrap(), "// custom");
        assert_eq!(res.image(TEXTURE_IMAGE).unwrap().pixels(), &[1_u8, 2, 3, 4]);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
