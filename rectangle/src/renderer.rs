use std::time::Duration;

use thiserror::Error;

use gl_wrapper::geometry::{BufferUsage, GBError, Geometry, GeometryBuilder};
use gl_wrapper::program::{Program, ProgramBuild, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureError, TextureFilter, TextureFormats};

use crate::animation::{AnimationState, ColorAnimation};
use crate::color::Rgb;
use crate::palette::INITIAL_PALETTE;
use crate::resources::{
    ResourceError, ResourceLoader, FRAGMENT_SHADER, TEXTURE_IMAGE, VERTEX_SHADER,
};
use crate::vertex::{QuadVertices, ATTRIBUTES, INDICES, VERTEX_COUNT};

pub const BACKGROUND: [f32; 3] = [0.1, 0.1, 0.2];
pub const SAMPLER_UNIFORM: &str = "tex";
pub const TEXTURE_UNIT: u8 = 0;

/// Services the window owning the GL context provides to the renderer.
pub trait RenderHost {
    fn make_current(&self);
    fn request_redraw(&self);
}

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Renderer used before initialize()")]
    NotInitialized,
    #[error("Renderer is already initialized")]
    AlreadyInitialized,
    #[error("Expected {expected} colors, got {got}")]
    InvalidArgument { expected: usize, got: usize },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Geometry(#[from] GBError),
}

// fields drop in declaration order
struct GpuResources {
    geometry: Geometry,
    program: Program,
    texture: Texture2D,
    gl: GlRenderer,
}

///
/// Textured quad with animated vertex colors.
///
/// GPU objects are created by [`initialize`](Self::initialize) and released by
/// [`destroy`](Self::destroy). Both, like every other call touching the GPU, must happen on
/// the thread owning the GL context. Dropping an initialized renderer without `destroy`
/// releases the objects too, but then the caller has to make sure the context is current.
///
pub struct RectangleRenderer {
    colors: [Rgb; VERTEX_COUNT],
    vertices: QuadVertices,
    animation: ColorAnimation,
    gpu: Option<GpuResources>,
}

impl RectangleRenderer {
    pub fn new(colors: [Rgb; VERTEX_COUNT]) -> Self {
        Self {
            colors,
            vertices: QuadVertices::new(&colors),
            animation: ColorAnimation::new(colors),
            gpu: None,
        }
    }

    /// Creates the texture, shader program and buffers. Must be called exactly once, with
    /// the context current, before [`draw`](Self::draw).
    ///
    /// Shader compile and link failures are logged and otherwise ignored; check
    /// [`program_linked`](Self::program_linked) if that matters.
    pub fn initialize<L: ResourceLoader + ?Sized>(
        &mut self,
        loader: &L,
    ) -> Result<(), RendererError> {
        if self.gpu.is_some() {
            return Err(RendererError::AlreadyInitialized);
        }

        let image = loader.image(TEXTURE_IMAGE)?;
        let texture = Texture2D::new(
            image.width(),
            image.height(),
            image.pixels(),
            TextureFormats::Rgba8,
            TextureFilter::MIPMAPPED,
        )?;

        let vert = loader.shader_source(VERTEX_SHADER)?;
        let frag = loader.shader_source(FRAGMENT_SHADER)?;

        let ProgramBuild { program, errors } = ProgramBuilder::new(&vert, &frag).build();

        for e in &errors {
            log::error!("{e}");
        }

        let geometry = ATTRIBUTES
            .iter()
            .fold(GeometryBuilder::new(self.vertices.as_slice()), |b, a| {
                b.with_attribute(*a)
            })
            .with_indices(&INDICES)
            // colors are re-uploaded on every animation step
            .with_usage(BufferUsage::DynamicDraw)
            .build()?;

        texture.bind(TEXTURE_UNIT);

        match program.uniform_location(SAMPLER_UNIFORM) {
            Some(loc) => program.set_uniform_i32(loc, TEXTURE_UNIT as i32),
            None => log::warn!("Sampler uniform {SAMPLER_UNIFORM:?} not found in program"),
        }

        log::info!(
            "Rectangle initialized ({}x{} texture, program linked: {})",
            image.width(),
            image.height(),
            program.is_linked()
        );

        self.gpu = Some(GpuResources {
            geometry,
            program,
            texture,
            gl: GlRenderer::new(),
        });

        Ok(())
    }

    /// Renders the current state. Calling this before [`initialize`](Self::initialize) is a
    /// caller error and returns [`RendererError::NotInitialized`].
    pub fn draw(&mut self) -> Result<(), RendererError> {
        let gpu = self.gpu.as_mut().ok_or(RendererError::NotInitialized)?;

        let [r, g, b] = BACKGROUND;
        gpu.gl.clear_color(r, g, b);
        gpu.gl.draw(&gpu.geometry, &gpu.program);

        Ok(())
    }

    /// Advances the color animation by one step. Returns whether the colors changed.
    ///
    /// Exactly one step is taken per call regardless of `delta`; hosts call this once per
    /// rendered frame.
    pub fn tick<H: RenderHost + ?Sized>(
        &mut self,
        host: &H,
        delta: Duration,
    ) -> Result<bool, RendererError> {
        self.animation.record_elapsed(delta);

        match self.animation.advance() {
            Some(colors) => {
                self.colors = colors;
                self.update_vertex_colors(host)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Starts blending from the current colors to `targets`, replacing any running
    /// transition, and takes the first step right away.
    pub fn start_color_transition<H: RenderHost + ?Sized>(
        &mut self,
        host: &H,
        targets: &[Rgb],
    ) -> Result<(), RendererError> {
        let targets = checked_colors(targets)?;

        log::debug!("Starting color transition to {:?}", targets);

        self.animation.start(self.colors, targets);
        self.tick(host, Duration::ZERO)?;

        Ok(())
    }

    /// Switches to `colors` at once, cancelling any running transition.
    pub fn set_colors<H: RenderHost + ?Sized>(
        &mut self,
        host: &H,
        colors: &[Rgb],
    ) -> Result<(), RendererError> {
        let colors = checked_colors(colors)?;

        self.colors = colors;
        self.animation = ColorAnimation::new(colors);

        self.update_vertex_colors(host)
    }

    fn update_vertex_colors<H: RenderHost + ?Sized>(
        &mut self,
        host: &H,
    ) -> Result<(), RendererError> {
        self.vertices.set_colors(&self.colors);

        if let Some(gpu) = &self.gpu {
            host.make_current();
            gpu.geometry.update(self.vertices.as_slice())?;
        }

        host.request_redraw();

        Ok(())
    }

    /// Releases all GPU objects with the context made current first.
    pub fn destroy<H: RenderHost + ?Sized>(mut self, host: &H) {
        if let Some(gpu) = self.gpu.take() {
            host.make_current();
            drop(gpu);
            log::info!("Rectangle resources released");
        }
    }

    pub fn colors(&self) -> &[Rgb; VERTEX_COUNT] {
        &self.colors
    }

    pub fn vertices(&self) -> &QuadVertices {
        &self.vertices
    }

    pub fn animation(&self) -> &ColorAnimation {
        &self.animation
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    /// `None` before initialization.
    pub fn program_linked(&self) -> Option<bool> {
        self.gpu.as_ref().map(|gpu| gpu.program.is_linked())
    }
}

impl Default for RectangleRenderer {
    fn default() -> Self {
        Self::new(INITIAL_PALETTE)
    }
}

fn checked_colors(colors: &[Rgb]) -> Result<[Rgb; VERTEX_COUNT], RendererError> {
    colors
        .try_into()
        .map_err(|_| RendererError::InvalidArgument {
            expected: VERTEX_COUNT,
            got: colors.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use crate::animation::FRAME_LIMIT;

    #[derive(Default)]
    struct CountingHost {
        current: Cell<usize>,
        redraws: Cell<usize>,
    }

    impl RenderHost for CountingHost {
        fn make_current(&self) {
            self.current.set(self.current.get() + 1);
        }

        fn request_redraw(&self) {
            self.redraws.set(self.redraws.get() + 1);
        }
    }

    #[test]
    fn draw_requires_initialize() {
        let mut renderer = RectangleRenderer::default();

        assert!(matches!(renderer.draw(), Err(RendererError::NotInitialized)));
        assert!(!renderer.is_initialized());
        assert_eq!(renderer.program_linked(), None);
    }

    #[test]
    fn starts_idle_on_initial_palette() {
        let renderer = RectangleRenderer::default();

        assert_eq!(renderer.animation_state(), AnimationState::Idle);
        assert_eq!(renderer.colors(), &INITIAL_PALETTE);
        assert_eq!(renderer.vertices(), &QuadVertices::new(&INITIAL_PALETTE));
    }

    #[test]
    fn transition_needs_four_colors() {
        let host = CountingHost::default();
        let mut renderer = RectangleRenderer::default();

        let res = renderer.start_color_transition(&host, &[Rgb::WHITE; 3]);

        assert!(matches!(
            res,
            Err(RendererError::InvalidArgument {
                expected: 4,
                got: 3
            })
        ));
        assert_eq!(renderer.animation_state(), AnimationState::Idle);
        assert_eq!(host.redraws.get(), 0);
    }

    #[test]
    fn transition_takes_first_step_immediately() {
        let host = CountingHost::default();
        let mut renderer = RectangleRenderer::default();

        renderer
            .start_color_transition(&host, &[Rgb::WHITE; 4])
            .unwrap();

        assert_eq!(renderer.animation().frame_count(), 1);
        assert_eq!(renderer.animation_state(), AnimationState::Transitioning);
        assert_ne!(renderer.colors(), &INITIAL_PALETTE);
        assert_eq!(host.redraws.get(), 1);
        // nothing to upload without GPU resources
        assert_eq!(host.current.get(), 0);
    }

    #[test]
    fn every_step_requests_a_redraw() {
        let host = CountingHost::default();
        let mut renderer = RectangleRenderer::default();

        renderer
            .start_color_transition(&host, &[Rgb::BLACK; 4])
            .unwrap();

        let mut steps = 1;
        while renderer.tick(&host, Duration::from_millis(16)).unwrap() {
            steps += 1;
        }

        assert_eq!(steps, FRAME_LIMIT as usize);
        assert_eq!(host.redraws.get(), FRAME_LIMIT as usize);
        assert_eq!(renderer.animation_state(), AnimationState::Idle);

        assert!(!renderer.tick(&host, Duration::from_millis(16)).unwrap());
        assert_eq!(host.redraws.get(), FRAME_LIMIT as usize);
    }

    #[test]
    fn set_colors_cancels_transition() {
        let host = CountingHost::default();
        let mut renderer = RectangleRenderer::default();

        renderer
            .start_color_transition(&host, &[Rgb::BLACK; 4])
            .unwrap();
        renderer.set_colors(&host, &[Rgb::WHITE; 4]).unwrap();

        assert_eq!(renderer.animation_state(), AnimationState::Idle);
        assert_eq!(renderer.colors(), &[Rgb::WHITE; 4]);
        assert_eq!(renderer.vertices().vertex(2).color, [1.0, 1.0, 1.0]);
        assert!(!renderer.tick(&host, Duration::ZERO).unwrap());
    }

    #[test]
    fn destroy_without_initialize_does_not_touch_context() {
        let host = CountingHost::default();

        RectangleRenderer::default().destroy(&host);

        assert_eq!(host.current.get(), 0);
    }
}
