pub mod global_uniform;
pub mod imgui_renderer;
pub mod instance;
pub mod mesh;
pub mod renderer;
pub mod scene_pass;
pub mod texture;
