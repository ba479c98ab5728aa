use std::ffi::c_void;
use thiserror::Error;

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    /// Creates a 2D texture clamped to its edges, uploads `data` and builds the mipmap chain.
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormats,
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage);
        }

        if (width as usize * height as usize * format.channels() as usize) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                filter.min.gl_enum() as i32,
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                filter.mag.gl_enum() as i32,
            );

            // rows of RGBA8 data are not necessarily 4-byte aligned for odd widths
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.internal_format() as i32,
                width as i32,
                height as i32,
                0,
                format.pixel_format(),
                format.pixel_type(),
                data.as_ptr() as *const c_void,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
        }

        log::debug!("Created texture {id} ({width}x{height})");

        Ok(Self { id })
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("Texture dimensions must be non-zero")]
    EmptyImage,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormats {
    Rgba8,
}

impl TextureFormats {
    pub fn channels(&self) -> u8 {
        match self {
            TextureFormats::Rgba8 => 4,
        }
    }

    fn internal_format(&self) -> u32 {
        match self {
            TextureFormats::Rgba8 => gl::RGBA8,
        }
    }

    fn pixel_format(&self) -> u32 {
        match self {
            TextureFormats::Rgba8 => gl::RGBA,
        }
    }

    fn pixel_type(&self) -> u32 {
        match self {
            TextureFormats::Rgba8 => gl::UNSIGNED_BYTE,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
    /// Nearest texel of the two closest mip levels, blended linearly between levels.
    /// Only valid for minification.
    NearestMipmapLinear,
}

impl FilterMode {
    fn gl_enum(&self) -> u32 {
        match self {
            FilterMode::Nearest => gl::NEAREST,
            FilterMode::Linear => gl::LINEAR,
            FilterMode::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureFilter {
    pub min: FilterMode,
    pub mag: FilterMode,
}

impl TextureFilter {
    pub const MIPMAPPED: Self = Self {
        min: FilterMode::NearestMipmapLinear,
        mag: FilterMode::Linear,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mipmapped_filter_modes() {
        let filter = TextureFilter::MIPMAPPED;

        assert_eq!(filter.min.gl_enum(), gl::NEAREST_MIPMAP_LINEAR);
        assert_eq!(filter.mag.gl_enum(), gl::LINEAR);
    }

    #[test]
    fn length_is_validated_before_any_gl_call() {
        let res = Texture2D::new(2, 2, &[0; 15], TextureFormats::Rgba8, TextureFilter::MIPMAPPED);
        assert!(matches!(res, Err(TextureError::InvalidSrcLength)));

        let res = Texture2D::new(0, 2, &[], TextureFormats::Rgba8, TextureFilter::MIPMAPPED);
        assert!(matches!(res, Err(TextureError::EmptyImage)));
    }
}
