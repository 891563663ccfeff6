pub mod animation;
pub mod frame;
pub mod layout;
pub mod params;
pub mod player;
pub mod ticker;

pub use frame::{DrawCall, Frame, MeshKind, TextureKind};
pub use params::TransformParameters;
pub use player::AnimationPlayer;
