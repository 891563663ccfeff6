use glam::Vec2;

use crate::scene::frame::Overlay;

const BORDER_THICKNESS: f32 = 4.0;
const BORDER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Draws the label lines and, while an animation session runs, a frame
/// around the viewport. Everything is in imgui's logical pixels.
pub fn draw(ui: &imgui::Ui, overlay: &Overlay, show_border: bool) {
    let draw_list = ui.get_foreground_draw_list();

    for line in overlay
        .lines
        .iter()
        .filter(|line| overlay.region.contains(line.position))
    {
        draw_list.add_text(line.position.to_array(), overlay.color, line.text);
    }

    if show_border {
        let (min, max) = border_corners(overlay.screen_size);
        draw_list
            .add_rect(min, max, BORDER_COLOR)
            .thickness(BORDER_THICKNESS)
            .build();
    }
}

/// The stroke is centered on the rect, so it is inset by half its width to
/// stay fully on screen.
fn border_corners(screen_size: Vec2) -> ([f32; 2], [f32; 2]) {
    let inset = Vec2::splat(BORDER_THICKNESS / 2.0);
    (inset.to_array(), (screen_size - inset).to_array())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_hugs_the_logical_window() {
        let (min, max) = border_corners(Vec2::new(1280.0, 720.0));
        assert_eq!(min, [2.0, 2.0]);
        assert_eq!(max, [1278.0, 718.0]);
    }
}
