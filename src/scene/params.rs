use glam::{UVec2, Vec2, Vec3};

pub const TRUCK_REST_X: f32 = 60.0;
pub const TRUCK_REST_Z: f32 = 0.0;
pub const TRUCK_REST_ANGLE: f32 = -90.0;
pub const RAMP_REST_ANGLE: f32 = 0.0;

pub const RAMP_MAX_ANGLE: f32 = 25.0;
pub const CAMERA_MAX_ROTATION_X: f32 = 50.0;
pub const DEFAULT_SCENE_DISTANCE: f32 = 150.0;

/// Placement of everything that moves in the scene, plus the free-look
/// camera and the reflector color.
///
/// Fields edited from the UI go through setters that drop out-of-range
/// values and keep the last valid one. The animation writes the truck and
/// ramp fields directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParameters {
    pub truck_x: f32,
    pub truck_z: f32,
    pub truck_angle: f32,
    truck_scale: f32,

    pub ramp_angle: f32,
    ramp_height_scale: f32,
    pub ramp_wait_counter: u32,

    camera_rotation_x: f32,
    pub camera_rotation_y: f32,
    pub scene_distance: f32,

    ambient_color: Vec3,
    /// Drawable size in physical pixels.
    pub viewport: UVec2,
    /// Physical pixels per logical pixel of the window.
    pub scale_factor: f32,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            truck_x: TRUCK_REST_X,
            truck_z: TRUCK_REST_Z,
            truck_angle: TRUCK_REST_ANGLE,
            truck_scale: 1.0,
            ramp_angle: RAMP_REST_ANGLE,
            ramp_height_scale: 1.0,
            ramp_wait_counter: 0,
            camera_rotation_x: 0.0,
            camera_rotation_y: 0.0,
            scene_distance: DEFAULT_SCENE_DISTANCE,
            ambient_color: Vec3::new(0.0, 0.0, 1.0),
            viewport: UVec2::new(1280, 720),
            scale_factor: 1.0,
        }
    }
}

impl TransformParameters {
    pub fn truck_scale(&self) -> f32 {
        self.truck_scale
    }

    pub fn set_truck_scale(&mut self, scale: f32) {
        if scale > 0.0 {
            self.truck_scale = scale;
        }
    }

    pub fn ramp_height_scale(&self) -> f32 {
        self.ramp_height_scale
    }

    pub fn set_ramp_height_scale(&mut self, scale: f32) {
        if scale > 0.0 {
            self.ramp_height_scale = scale;
        }
    }

    pub fn camera_rotation_x(&self) -> f32 {
        self.camera_rotation_x
    }

    /// Pitch is limited to [0, 50] degrees so the camera never dips under
    /// the ground plane.
    pub fn set_camera_rotation_x(&mut self, degrees: f32) {
        if (0.0..=CAMERA_MAX_ROTATION_X).contains(&degrees) {
            self.camera_rotation_x = degrees;
        }
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }

    pub fn set_ambient_red(&mut self, value: f32) {
        if is_color_component(value) {
            self.ambient_color.x = value;
        }
    }

    pub fn set_ambient_green(&mut self, value: f32) {
        if is_color_component(value) {
            self.ambient_color.y = value;
        }
    }

    pub fn set_ambient_blue(&mut self, value: f32) {
        if is_color_component(value) {
            self.ambient_color.z = value;
        }
    }

    /// Puts the truck and ramp back where they stand when nothing is playing.
    pub fn reset_to_rest(&mut self) {
        self.truck_x = TRUCK_REST_X;
        self.truck_z = TRUCK_REST_Z;
        self.truck_angle = TRUCK_REST_ANGLE;
        self.ramp_angle = RAMP_REST_ANGLE;
        self.ramp_wait_counter = 0;
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y == 0 {
            1.0
        } else {
            self.viewport.x as f32 / self.viewport.y as f32
        }
    }

    /// Window size in logical pixels, the space the UI overlay is laid out in.
    pub fn ui_size(&self) -> Vec2 {
        let scale = if self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        self.viewport.as_vec2() / scale
    }
}

fn is_color_component(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_rest_pose() {
        let params = TransformParameters::default();
        assert_eq!(params.truck_angle, -90.0);
        assert_eq!(params.truck_x, 60.0);
        assert_eq!(params.truck_z, 0.0);
        assert_eq!(params.ramp_angle, 0.0);
        assert_eq!(params.truck_scale(), 1.0);
        assert_eq!(params.scene_distance, 150.0);
    }

    #[test]
    fn truck_scale_rejects_non_positive() {
        let mut params = TransformParameters::default();
        params.set_truck_scale(0.0);
        assert_eq!(params.truck_scale(), 1.0);
        params.set_truck_scale(-3.0);
        assert_eq!(params.truck_scale(), 1.0);
        params.set_truck_scale(2.5);
        assert_eq!(params.truck_scale(), 2.5);
    }

    #[test]
    fn ramp_height_scale_rejects_non_positive() {
        let mut params = TransformParameters::default();
        params.set_ramp_height_scale(1.75);
        params.set_ramp_height_scale(0.0);
        assert_eq!(params.ramp_height_scale(), 1.75);
    }

    #[test]
    fn camera_pitch_is_limited() {
        let mut params = TransformParameters::default();
        params.set_camera_rotation_x(75.0);
        assert_eq!(params.camera_rotation_x(), 0.0);
        params.set_camera_rotation_x(30.0);
        assert_eq!(params.camera_rotation_x(), 30.0);
        params.set_camera_rotation_x(-5.0);
        assert_eq!(params.camera_rotation_x(), 30.0);
        params.set_camera_rotation_x(50.0);
        assert_eq!(params.camera_rotation_x(), 50.0);
    }

    #[test]
    fn ambient_components_stay_in_unit_range() {
        let mut params = TransformParameters::default();
        params.set_ambient_red(0.4);
        params.set_ambient_green(1.5);
        params.set_ambient_blue(-0.1);
        assert_eq!(params.ambient_color(), Vec3::new(0.4, 0.0, 1.0));
    }

    #[test]
    fn unconstrained_fields_accept_anything() {
        let mut params = TransformParameters::default();
        params.camera_rotation_y = -725.0;
        params.scene_distance = -50.0;
        assert_eq!(params.camera_rotation_y, -725.0);
        assert_eq!(params.scene_distance, -50.0);
    }

    #[test]
    fn ui_size_is_in_logical_pixels() {
        let mut params = TransformParameters::default();
        params.viewport = UVec2::new(2560, 1440);
        params.scale_factor = 2.0;
        assert_eq!(params.ui_size(), Vec2::new(1280.0, 720.0));
        assert!((params.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);

        params.scale_factor = 0.0;
        assert_eq!(params.ui_size(), Vec2::new(2560.0, 1440.0));
    }
}
