use glam::{Affine2, Mat4, Vec2, Vec3};

use crate::scene::{
    frame::{
        CameraMatrices, DrawCall, Frame, Lights, MeshKind, Overlay, OverlayLine, ScreenRect,
        TextureKind,
    },
    params::TransformParameters,
};

const CLEAR_COLOR: [f64; 4] = [0.5, 0.5, 1.0, 1.0];

const CAMERA_EYE: Vec3 = Vec3::new(-200.0, 30.0, 0.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 0.0, -350.0);
const FIELD_OF_VIEW_DEGREES: f32 = 50.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 1000.0;

const GRASS_COLOR: Vec3 = Vec3::new(0.0, 0.3, 0.0);
const ASPHALT_COLOR: Vec3 = Vec3::new(0.2, 0.2, 0.2);
const BRICK_COLOR: Vec3 = Vec3::new(0.4, 0.2, 0.0);
const RAMP_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);

const TRUCK_BASE_SCALE: f32 = 0.07;
const TRUCK_BASE_HEIGHT: f32 = 13.0;

const SITE_Z: f32 = -100.0;
const RAMP_Z: f32 = -97.0;
const RAMP_PILLAR_X: f32 = 25.0;
const RAMP_BAR_PIVOT_X: f32 = -28.0;
const RAMP_BAR_LENGTH: f32 = 56.0;
const RAMP_BASE_HEIGHT: f32 = 6.0;

pub const OVERLAY_WIDTH: f32 = 210.0;
pub const OVERLAY_LINE_SPACING: f32 = 30.0;
pub const OVERLAY_FONT_SIZE: f32 = 14.0;

pub const OVERLAY_LABELS: [&str; 5] = [
    "Task: 5.2",
    "Scene: truck at the loading ramp",
    "Keys: P play, Q quit",
    "I/K J/L rotate, +/- zoom",
    "Course: Computer Graphics",
];

/// Grass patches around the street and the construction site:
/// (min x, min z, max x, max z, texture repeats).
static GRASS_PATCHES: [(f32, f32, f32, f32, Vec2); 6] = [
    (-600.0, 20.0, 600.0, 150.0, Vec2::new(60.0, 10.0)),
    (-600.0, -100.0, -20.0, -20.0, Vec2::new(25.0, 3.0)),
    (20.0, -100.0, 600.0, -20.0, Vec2::new(25.0, 3.0)),
    (-600.0, -500.0, -100.0, -100.0, Vec2::new(25.0, 10.0)),
    (100.0, -500.0, 600.0, -100.0, Vec2::new(25.0, 10.0)),
    (-100.0, -500.0, 100.0, -300.0, Vec2::new(25.0, 10.0)),
];

/// Main road, the construction site floor and the driveway between them.
static STREET_PATCHES: [(f32, f32, f32, f32, Vec2); 3] = [
    (-600.0, -20.0, 600.0, 20.0, Vec2::new(20.0, 5.0)),
    (-100.0, -300.0, 100.0, -100.0, Vec2::new(20.0, 10.0)),
    (-20.0, -100.0, 20.0, -20.0, Vec2::new(5.0, 5.0)),
];

/// Brick wall segments in the site frame: (center x, center z, half extents).
static WALL_SEGMENTS: [(f32, f32, Vec3); 17] = [
    // back
    (-80.0, -200.0, Vec3::new(20.0, 9.0, 2.0)),
    (-40.0, -200.0, Vec3::new(20.0, 9.0, 2.0)),
    (0.0, -200.0, Vec3::new(20.0, 9.0, 2.0)),
    (40.0, -200.0, Vec3::new(20.0, 9.0, 2.0)),
    (80.0, -200.0, Vec3::new(20.0, 9.0, 2.0)),
    // left
    (-98.0, -125.0, Vec3::new(2.0, 9.0, 25.0)),
    (-98.0, -175.0, Vec3::new(2.0, 9.0, 25.0)),
    (-98.0, -75.0, Vec3::new(2.0, 9.0, 25.0)),
    (-98.0, -25.0, Vec3::new(2.0, 9.0, 25.0)),
    // right
    (98.0, -125.0, Vec3::new(2.0, 9.0, 25.0)),
    (98.0, -175.0, Vec3::new(2.0, 9.0, 25.0)),
    (98.0, -75.0, Vec3::new(2.0, 9.0, 25.0)),
    (98.0, -25.0, Vec3::new(2.0, 9.0, 25.0)),
    // front, split around the gate
    (-80.0, 0.0, Vec3::new(20.0, 9.0, 2.0)),
    (-45.0, 0.0, Vec3::new(15.0, 9.0, 2.0)),
    (80.0, 0.0, Vec3::new(20.0, 9.0, 2.0)),
    (45.0, 0.0, Vec3::new(15.0, 9.0, 2.0)),
];

/// Lays out the whole scene for the given parameters. Draw calls come out in
/// a fixed order: truck, grass, street, reflector marker, walls, ramp.
pub fn build_frame(params: &TransformParameters) -> Frame {
    let camera = camera_matrices(params);

    let mut draws = vec![truck(params)];
    draws.extend(ground_patches("grass", &GRASS_PATCHES, TextureKind::Grass, GRASS_COLOR));
    draws.extend(ground_patches("street", &STREET_PATCHES, TextureKind::Asphalt, ASPHALT_COLOR));
    draws.extend(walls());
    draws.extend(ramp(params));

    Frame {
        clear_color: CLEAR_COLOR,
        lights: lights(params, &camera),
        camera,
        draws,
        overlay: overlay(params),
    }
}

pub fn camera_matrices(params: &TransformParameters) -> CameraMatrices {
    let view = Mat4::look_at_rh(CAMERA_EYE, CAMERA_TARGET, Vec3::Y)
        * Mat4::from_translation(Vec3::new(0.0, 0.0, -params.scene_distance))
        * Mat4::from_rotation_y(params.camera_rotation_y.to_radians())
        * Mat4::from_rotation_x(params.camera_rotation_x().to_radians());

    let projection = Mat4::perspective_rh(
        FIELD_OF_VIEW_DEGREES.to_radians(),
        params.aspect_ratio(),
        Z_NEAR,
        Z_FAR,
    );

    CameraMatrices { view, projection }
}

fn lights(params: &TransformParameters, camera: &CameraMatrices) -> Lights {
    // The point light hangs off the viewer, not the world.
    let point_position = camera
        .view
        .inverse()
        .transform_point3(Vec3::new(100.0, 100.0, 0.0));

    Lights {
        point_position,
        point_color: Vec3::new(0.9, 0.9, 0.6),
        spot_position: Vec3::new(0.0, 110.0, SITE_Z),
        spot_direction: Vec3::new(0.0, -1.0, -1.0).normalize(),
        spot_color: params.ambient_color(),
        spot_cutoff_degrees: 40.0,
        spot_exponent: 5.0,
    }
}

fn truck(params: &TransformParameters) -> DrawCall {
    let scale = params.truck_scale();
    let model = Mat4::from_translation(Vec3::new(
        params.truck_x,
        TRUCK_BASE_HEIGHT * scale,
        params.truck_z,
    )) * Mat4::from_rotation_y(params.truck_angle.to_radians())
        * Mat4::from_scale(Vec3::splat(TRUCK_BASE_SCALE * scale));

    DrawCall {
        name: "truck",
        mesh: MeshKind::Truck,
        texture: None,
        color: Vec3::ONE,
        model,
        uv_transform: Affine2::IDENTITY,
    }
}

fn ground_patches<'a>(
    name: &'static str,
    patches: &'a [(f32, f32, f32, f32, Vec2)],
    texture: TextureKind,
    color: Vec3,
) -> impl Iterator<Item = DrawCall> + 'a {
    patches
        .iter()
        .map(move |&(min_x, min_z, max_x, max_z, repeats)| DrawCall {
            name,
            mesh: MeshKind::Quad,
            texture: Some(texture),
            color,
            model: Mat4::from_translation(Vec3::new(min_x, 0.0, min_z))
                * Mat4::from_scale(Vec3::new(max_x - min_x, 1.0, max_z - min_z)),
            uv_transform: Affine2::from_scale(repeats),
        })
}

fn walls() -> impl Iterator<Item = DrawCall> {
    let site = Mat4::from_translation(Vec3::new(0.0, 0.0, SITE_Z));

    let reflector = DrawCall {
        name: "reflector",
        mesh: MeshKind::Sphere,
        texture: None,
        color: Vec3::ZERO,
        model: site
            * Mat4::from_translation(Vec3::new(0.0, 10.0, -100.0))
            * Mat4::from_scale(Vec3::splat(10.0)),
        uv_transform: Affine2::IDENTITY,
    };

    let brick_uv = Affine2::from_scale_angle_translation(
        Vec2::splat(0.5),
        (-90.0f32).to_radians(),
        Vec2::ZERO,
    );

    let segments = WALL_SEGMENTS.iter().map(move |&(x, z, half_extents)| DrawCall {
        name: "wall",
        mesh: MeshKind::Cube,
        texture: Some(TextureKind::Brick),
        color: BRICK_COLOR,
        model: site * Mat4::from_translation(Vec3::new(x, 0.0, z)) * Mat4::from_scale(half_extents),
        uv_transform: brick_uv,
    });

    std::iter::once(reflector).chain(segments)
}

fn ramp(params: &TransformParameters) -> [DrawCall; 3] {
    let base = Mat4::from_translation(Vec3::new(0.0, 0.0, RAMP_Z));
    let height = RAMP_BASE_HEIGHT * params.ramp_height_scale();
    let pillar_stretch = Mat4::from_scale(Vec3::new(1.0, 0.5 + height, 1.0));

    let pillar = |x: f32| DrawCall {
        name: "ramp pillar",
        mesh: MeshKind::Cube,
        texture: None,
        color: RAMP_COLOR,
        model: base * pillar_stretch * Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
        uv_transform: Affine2::IDENTITY,
    };

    let bar = DrawCall {
        name: "ramp bar",
        mesh: MeshKind::Cylinder,
        texture: None,
        color: RAMP_COLOR,
        model: base
            * Mat4::from_translation(Vec3::new(RAMP_BAR_PIVOT_X, height, 0.0))
            * Mat4::from_rotation_z(params.ramp_angle.to_radians())
            * Mat4::from_rotation_y(90.0f32.to_radians())
            * Mat4::from_scale(Vec3::new(1.0, 1.0, RAMP_BAR_LENGTH)),
        uv_transform: Affine2::IDENTITY,
    };

    [pillar(-RAMP_PILLAR_X), pillar(RAMP_PILLAR_X), bar]
}

/// Labels sit in the bottom-right strip of the window, stacked upwards from
/// the bottom edge. Placement is in logical pixels so it matches the UI
/// coordinates on scaled displays.
fn overlay(params: &TransformParameters) -> Overlay {
    let screen_size = params.ui_size();
    let Vec2 {
        x: width,
        y: height,
    } = screen_size;

    let region = ScreenRect {
        min: Vec2::new(width - OVERLAY_WIDTH, height - (height / 2.0).floor()),
        size: Vec2::new(OVERLAY_WIDTH, (height / 2.0).floor()),
    };

    let lines = OVERLAY_LABELS
        .iter()
        .enumerate()
        .map(|(i, &text)| OverlayLine {
            text,
            position: Vec2::new(
                region.min.x,
                height - OVERLAY_LINE_SPACING * (i + 1) as f32 - OVERLAY_FONT_SIZE,
            ),
        })
        .collect();

    Overlay {
        screen_size,
        region,
        color: [1.0, 0.0, 0.0, 1.0],
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;

    fn names(frame: &Frame) -> Vec<&'static str> {
        frame.draws.iter().map(|draw| draw.name).collect()
    }

    #[test]
    fn draws_come_out_in_scene_order() {
        let frame = build_frame(&TransformParameters::default());
        let names = names(&frame);

        assert_eq!(names.first(), Some(&"truck"));
        assert_eq!(&names[1..7], &["grass"; 6]);
        assert_eq!(&names[7..10], &["street"; 3]);
        assert_eq!(names[10], "reflector");
        assert_eq!(&names[11..28], &["wall"; 17]);
        assert_eq!(&names[28..], &["ramp pillar", "ramp pillar", "ramp bar"]);
    }

    #[test]
    fn truck_follows_its_parameters() {
        let mut params = TransformParameters::default();
        params.truck_x = 120.0;
        params.truck_z = -35.0;
        params.truck_angle = -180.0;
        params.set_truck_scale(2.0);

        let frame = build_frame(&params);
        let truck = &frame.draws[0];
        let (scale, _rotation, translation) = truck.model.to_scale_rotation_translation();

        assert_eq!(truck.mesh, MeshKind::Truck);
        assert!(translation.abs_diff_eq(Vec3::new(120.0, 26.0, -35.0), 1e-4));
        assert!(scale.abs_diff_eq(Vec3::splat(0.14), 1e-5));

        // Facing -Z after the half turn maps local +X onto world -X.
        let forward = truck.model.transform_vector3(Vec3::X).normalize();
        assert!(forward.abs_diff_eq(Vec3::NEG_X, 1e-4));
    }

    #[test]
    fn ramp_bar_rises_with_the_ramp_angle() {
        let mut params = TransformParameters::default();
        let bar_tip = |params: &TransformParameters| {
            let frame = build_frame(params);
            let bar = frame.draws.last().unwrap().clone();
            bar.model.transform_point3(Vec3::new(0.0, 0.0, 1.0))
        };

        let lowered = bar_tip(&params);
        assert!(lowered.abs_diff_eq(Vec3::new(28.0, 6.0, -97.0), 1e-3));

        params.ramp_angle = 25.0;
        let raised = bar_tip(&params);
        let expected_rise = 56.0 * 25.0f32.to_radians().sin();
        assert!((raised.y - (6.0 + expected_rise)).abs() < 1e-3);
        assert!(raised.x < lowered.x);
    }

    #[test]
    fn ramp_height_scale_stretches_pillars_and_lifts_bar() {
        let mut params = TransformParameters::default();
        params.set_ramp_height_scale(2.0);

        let frame = build_frame(&params);
        let pillar = &frame.draws[28];
        let top = pillar.model.transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!(top.abs_diff_eq(Vec3::new(-25.0, 12.5, -97.0), 1e-4));

        let bar = frame.draws.last().unwrap();
        let pivot = bar.model.transform_point3(Vec3::ZERO);
        assert!(pivot.abs_diff_eq(Vec3::new(-28.0, 12.0, -97.0), 1e-4));
    }

    #[test]
    fn ground_patches_cover_their_rectangles() {
        let frame = build_frame(&TransformParameters::default());
        let site_floor = &frame.draws[8];

        assert_eq!(site_floor.texture, Some(TextureKind::Asphalt));
        let near = site_floor.model.transform_point3(Vec3::ZERO);
        let far = site_floor.model.transform_point3(Vec3::new(1.0, 0.0, 1.0));
        assert!(near.abs_diff_eq(Vec3::new(-100.0, 0.0, -300.0), 1e-4));
        assert!(far.abs_diff_eq(Vec3::new(100.0, 0.0, -100.0), 1e-4));
    }

    #[test]
    fn walls_and_reflector_live_in_the_site_frame() {
        let frame = build_frame(&TransformParameters::default());

        let reflector = &frame.draws[10];
        let center = reflector.model.transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(0.0, 10.0, -200.0), 1e-4));
        assert_eq!(reflector.color, Vec3::ZERO);

        let back_wall = &frame.draws[11];
        let corner = back_wall.model.transform_point3(Vec3::ONE);
        assert!(corner.abs_diff_eq(Vec3::new(-60.0, 9.0, -298.0), 1e-4));
        assert!(frame.draws[11..28]
            .iter()
            .all(|wall| wall.texture == Some(TextureKind::Brick)));
    }

    #[test]
    fn reflector_light_takes_the_ambient_color() {
        let mut params = TransformParameters::default();
        params.set_ambient_red(0.5);

        let frame = build_frame(&params);
        assert_eq!(frame.lights.spot_color, Vec3::new(0.5, 0.0, 1.0));
        assert_eq!(frame.lights.spot_position, Vec3::new(0.0, 110.0, -100.0));
    }

    #[test]
    fn camera_distance_pushes_the_world_away() {
        let mut params = TransformParameters::default();
        let origin_depth = |params: &TransformParameters| {
            camera_matrices(params).view.transform_point3(Vec3::ZERO).length()
        };

        let near = origin_depth(&params);
        params.scene_distance += 50.0;
        let far = origin_depth(&params);

        assert!(far > near);
    }

    #[test]
    fn projection_follows_viewport_aspect() {
        let mut params = TransformParameters::default();
        params.viewport = UVec2::new(800, 400);
        let wide = camera_matrices(&params).projection;
        params.viewport = UVec2::new(400, 400);
        let square = camera_matrices(&params).projection;

        assert!((square.x_axis.x / wide.x_axis.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn overlay_stacks_labels_in_the_bottom_right() {
        let mut params = TransformParameters::default();
        params.viewport = UVec2::new(1000, 600);

        let overlay = build_frame(&params).overlay;

        assert_eq!(overlay.region.min, Vec2::new(790.0, 300.0));
        assert_eq!(overlay.region.size, Vec2::new(210.0, 300.0));
        assert_eq!(overlay.lines.len(), 5);
        assert_eq!(overlay.lines[0].text, OVERLAY_LABELS[0]);
        assert_eq!(overlay.lines[0].position, Vec2::new(790.0, 556.0));
        assert_eq!(overlay.lines[4].position, Vec2::new(790.0, 436.0));
        assert!(overlay.lines.iter().all(|line| overlay.region.contains(line.position)));
    }

    #[test]
    fn overlay_stays_inside_a_scaled_window() {
        let mut params = TransformParameters::default();
        params.viewport = UVec2::new(2560, 1440);
        params.scale_factor = 2.0;

        let overlay = build_frame(&params).overlay;
        let window = ScreenRect {
            min: Vec2::ZERO,
            size: Vec2::new(1280.0, 720.0),
        };

        assert_eq!(overlay.screen_size, window.size);
        assert_eq!(overlay.region.min, Vec2::new(1070.0, 360.0));
        assert_eq!(overlay.lines[0].position, Vec2::new(1070.0, 676.0));
        assert!(overlay.lines.iter().all(|line| window.contains(line.position)));
    }

    #[test]
    fn point_light_follows_the_viewer() {
        let mut params = TransformParameters::default();
        for (yaw, distance) in [(0.0, 150.0), (35.0, 60.0)] {
            params.camera_rotation_y = yaw;
            params.scene_distance = distance;
            let frame = build_frame(&params);

            let eye_space = frame.camera.view.transform_point3(frame.lights.point_position);
            assert!(eye_space.abs_diff_eq(Vec3::new(100.0, 100.0, 0.0), 1e-3));
        }
    }
}
