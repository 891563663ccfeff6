use glam::{Affine2, Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Truck,
    /// Unit square on the XZ plane, corners at 0 and 1, facing +Y.
    Quad,
    /// Box spanning -1..1 on every axis.
    Cube,
    /// Open tube of radius 1 running from z = 0 to z = 1.
    Cylinder,
    Sphere,
}

impl MeshKind {
    pub const PROCEDURAL: [MeshKind; 4] = [
        MeshKind::Quad,
        MeshKind::Cube,
        MeshKind::Cylinder,
        MeshKind::Sphere,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Asphalt,
    Brick,
    Grass,
}

impl TextureKind {
    pub const COUNT: usize = 3;
    pub const ALL: [TextureKind; Self::COUNT] =
        [TextureKind::Asphalt, TextureKind::Brick, TextureKind::Grass];

    pub fn file_name(self) -> &'static str {
        match self {
            TextureKind::Asphalt => "asphalt.jpg",
            TextureKind::Brick => "brick.jpg",
            TextureKind::Grass => "grass.jpg",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub texture: Option<TextureKind>,
    /// Multiplied with the texel (or used as is when untextured).
    pub color: Vec3,
    pub model: Mat4,
    pub uv_transform: Affine2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub point_position: Vec3,
    pub point_color: Vec3,
    pub spot_position: Vec3,
    pub spot_direction: Vec3,
    pub spot_color: Vec3,
    pub spot_cutoff_degrees: f32,
    pub spot_exponent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl ScreenRect {
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.min + self.size;
        point.cmpge(self.min).all() && point.cmple(max).all()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: &'static str,
    /// Top-left corner of the text in logical window pixels, origin at the
    /// top-left.
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Logical size of the window the overlay is placed in.
    pub screen_size: Vec2,
    pub region: ScreenRect,
    pub color: [f32; 4],
    pub lines: Vec<OverlayLine>,
}

/// Everything needed to draw one redraw of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f64; 4],
    pub camera: CameraMatrices,
    pub lights: Lights,
    pub draws: Vec<DrawCall>,
    pub overlay: Overlay,
}
