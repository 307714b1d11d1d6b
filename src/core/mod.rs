pub mod color;
pub mod compositor;
pub mod constants;
pub mod explosions;
pub mod falling;
pub mod lanes;
pub mod particles;
pub mod rng;
pub mod scene;

pub use color::{Rgba, Theme};
pub use compositor::{Blend, Paint, Surface};
pub use explosions::ExplosionKind;
pub use lanes::KeyRect;
pub use scene::{RendererConfig, Scene};
