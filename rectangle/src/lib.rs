//! A single textured quad whose vertex colors can be blended from one palette to another.
//!
//! [`RectangleRenderer`] owns every GPU object; the host window supplies the GL context
//! through [`RenderHost`] and the shader and texture data through a [`ResourceLoader`].

pub mod animation;
pub mod color;
pub mod math;
pub mod palette;
pub mod renderer;
pub mod resources;
pub mod vertex;

pub use animation::{AnimationState, ColorAnimation, FRAME_LIMIT};
pub use color::{Hsv, Rgb};
pub use palette::PaletteGenerator;
pub use renderer::{RectangleRenderer, RenderHost, RendererError};
pub use resources::{DirectoryResources, EmbeddedResources, Image, ResourceLoader};
