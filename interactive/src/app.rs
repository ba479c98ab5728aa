use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use rectangle::palette::{PaletteGenerator, INITIAL_PALETTE, WHITE_PALETTE};
use rectangle::{
    DirectoryResources, EmbeddedResources, RectangleRenderer, RenderHost, RendererError,
    ResourceLoader,
};

use crate::config;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: RectangleRenderer,
    palettes: PaletteGenerator,
}

impl App {
    pub fn new(config: &config::Config) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.window.width,
                config.window.height,
            )))
            .with_resizable(false)
            .with_title(&config.window.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        // The picker has to hand back a config, so an empty match set has no error path.
        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                most_samples(configs, |c: &Config| c.num_samples())
                    .expect("display reported no OpenGL configs for the default template")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        log::debug!("Picked GL config with {} samples", gl_config.num_samples());

        let window = window.ok_or(AppError::NoWindow)?;
        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(s.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        let loader: Box<dyn ResourceLoader> = match &config.assets {
            Some(dir) => Box::new(DirectoryResources::new(dir)),
            None => Box::new(EmbeddedResources),
        };

        let mut renderer = RectangleRenderer::new(INITIAL_PALETTE);
        renderer.initialize(loader.as_ref())?;

        log::info!("Using palette seed {}", config.seed);

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            renderer,
            palettes: PaletteGenerator::from_seed(config.seed),
        })
    }

    pub fn run(self) -> ! {
        let App {
            event_loop,
            gl_context,
            gl_window,
            renderer,
            mut palettes,
        } = self;

        let mut renderer = Some(renderer);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Wait;

            let host = GlHost {
                context: &gl_context,
                window: &gl_window,
            };

            match event {
                Event::RedrawRequested(_) => {
                    if let Some(renderer) = &mut renderer {
                        let now = Instant::now();
                        let delta = now - last_frame;
                        last_frame = now;

                        if let Err(e) = renderer.draw() {
                            log::error!("Could not draw: {e}");
                        }

                        if let Err(e) = renderer.tick(&host, delta) {
                            log::error!("Could not advance animation: {e}");
                        }

                        if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                            log::error!("Could not swap buffers: {e}");
                        }
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    WindowEvent::KeyboardInput { input, .. }
                        if input.state == ElementState::Pressed =>
                    {
                        let action = input.virtual_keycode.and_then(KeyAction::from_key);

                        match (action, &mut renderer) {
                            (Some(KeyAction::Quit), _) => control_flow.set_exit(),
                            (Some(action), Some(renderer)) => {
                                if let Err(e) = action.apply(renderer, &host, &mut palettes) {
                                    log::error!("{e}");
                                }
                            }
                            _ => {}
                        }
                    }
                    _ => (),
                },
                Event::LoopDestroyed => {
                    if let Some(renderer) = renderer.take() {
                        renderer.destroy(&host);
                    }
                }
                _ => (),
            }
        })
    }
}

/// Prefers the config with the most samples, keeping the first one offered on a tie.
fn most_samples<C>(configs: impl Iterator<Item = C>, samples: impl Fn(&C) -> u8) -> Option<C> {
    configs.reduce(|best, c| if samples(&c) > samples(&best) { c } else { best })
}

struct GlHost<'a> {
    context: &'a PossiblyCurrentContext,
    window: &'a GlWindow,
}

impl RenderHost for GlHost<'_> {
    fn make_current(&self) {
        if let Err(e) = self.context.make_current(&self.window.surface) {
            log::error!("Could not make context current: {e}");
        }
    }

    fn request_redraw(&self) {
        self.window.window.request_redraw();
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    AnimateRandom,
    ChangeRandom,
    AnimateWhite,
    AnimateInitial,
    Quit,
}

impl KeyAction {
    pub fn from_key(key: VirtualKeyCode) -> Option<Self> {
        match key {
            VirtualKeyCode::A | VirtualKeyCode::Space => Some(Self::AnimateRandom),
            VirtualKeyCode::C => Some(Self::ChangeRandom),
            VirtualKeyCode::W => Some(Self::AnimateWhite),
            VirtualKeyCode::R => Some(Self::AnimateInitial),
            VirtualKeyCode::Escape => Some(Self::Quit),
            _ => None,
        }
    }

    fn apply<H: RenderHost>(
        &self,
        renderer: &mut RectangleRenderer,
        host: &H,
        palettes: &mut PaletteGenerator,
    ) -> Result<(), RendererError> {
        match self {
            KeyAction::AnimateRandom => {
                renderer.start_color_transition(host, &palettes.next_palette())
            }
            KeyAction::ChangeRandom => renderer.set_colors(host, &palettes.next_palette()),
            KeyAction::AnimateWhite => renderer.start_color_transition(host, &WHITE_PALETTE),
            KeyAction::AnimateInitial => {
                renderer.start_color_transition(host, &INITIAL_PALETTE)
            }
            KeyAction::Quit => Ok(()),
        }
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSizedWindow)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSizedWindow)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not create display: {0}")]
    Display(String),
    #[error("Display builder did not create a window")]
    NoWindow,
    #[error("Window has zero size")]
    ZeroSizedWindow,
    #[error("OpenGL error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("Could not initialize renderer: {0}")]
    Renderer(#[from] RendererError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings() {
        assert_eq!(
            KeyAction::from_key(VirtualKeyCode::Space),
            Some(KeyAction::AnimateRandom)
        );
        assert_eq!(
            KeyAction::from_key(VirtualKeyCode::A),
            Some(KeyAction::AnimateRandom)
        );
        assert_eq!(
            KeyAction::from_key(VirtualKeyCode::C),
            Some(KeyAction::ChangeRandom)
        );
        assert_eq!(
            KeyAction::from_key(VirtualKeyCode::Escape),
            Some(KeyAction::Quit)
        );
        assert_eq!(KeyAction::from_key(VirtualKeyCode::Q), None);
    }

    #[test]
    fn picks_most_samples() {
        let configs = [("a", 0), ("b", 4), ("c", 2), ("d", 4)];

        let best = most_samples(configs.into_iter(), |c| c.1);
        assert_eq!(best, Some(("b", 4)));

        assert_eq!(most_samples(std::iter::empty::<(&str, u8)>(), |c| c.1), None);
    }
}
