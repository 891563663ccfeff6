use std::time::{Duration, Instant};

use winit::keyboard::Key;

use crate::scene::{AnimationPlayer, TransformParameters};

const CAMERA_STEP_DEGREES: f32 = 5.0;
const ZOOM_STEP: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    StartAnimation,
    Quit,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    ZoomIn,
    ZoomOut,
}

impl ShellCommand {
    pub fn from_key(key: &Key) -> Option<ShellCommand> {
        let Key::Character(text) = key else {
            return None;
        };

        let command = match text.to_ascii_lowercase().as_str() {
            "p" => ShellCommand::StartAnimation,
            "q" => ShellCommand::Quit,
            "i" => ShellCommand::PitchUp,
            "k" => ShellCommand::PitchDown,
            "j" => ShellCommand::YawLeft,
            "l" => ShellCommand::YawRight,
            "+" => ShellCommand::ZoomIn,
            "-" => ShellCommand::ZoomOut,
            _ => return None,
        };

        Some(command)
    }

    /// Applies a free-look command. Other commands leave the parameters alone.
    pub fn apply_camera(self, params: &mut TransformParameters) {
        match self {
            ShellCommand::PitchUp => {
                params.set_camera_rotation_x(params.camera_rotation_x() + CAMERA_STEP_DEGREES)
            }
            ShellCommand::PitchDown => {
                params.set_camera_rotation_x(params.camera_rotation_x() - CAMERA_STEP_DEGREES)
            }
            ShellCommand::YawLeft => params.camera_rotation_y -= CAMERA_STEP_DEGREES,
            ShellCommand::YawRight => params.camera_rotation_y += CAMERA_STEP_DEGREES,
            ShellCommand::ZoomIn => params.scene_distance -= ZOOM_STEP,
            ShellCommand::ZoomOut => params.scene_distance += ZOOM_STEP,
            ShellCommand::StartAnimation | ShellCommand::Quit => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    Quit,
}

/// Keyboard dispatch and the timed animation session.
///
/// Starting the animation locks every key until the session length has
/// passed, at which point the player is stopped and the controls unlock.
pub struct HostControls {
    session_length: Duration,
    session_started: Option<Instant>,
}

impl HostControls {
    pub fn new(session_length: Duration) -> Self {
        Self {
            session_length,
            session_started: None,
        }
    }

    pub fn animation_active(&self) -> bool {
        self.session_started.is_some()
    }

    /// When the running session is due to end, if one is running.
    pub fn session_deadline(&self) -> Option<Instant> {
        self.session_started
            .map(|started| started + self.session_length)
    }

    pub fn handle_key(
        &mut self,
        key: &Key,
        player: &mut AnimationPlayer,
        now: Instant,
    ) -> anyhow::Result<KeyOutcome> {
        if self.animation_active() {
            return Ok(KeyOutcome::Ignored);
        }

        let Some(command) = ShellCommand::from_key(key) else {
            return Ok(KeyOutcome::Ignored);
        };

        match command {
            ShellCommand::StartAnimation => {
                player.start()?;
                self.session_started = Some(now);
            }
            ShellCommand::Quit => return Ok(KeyOutcome::Quit),
            camera => player.update_params(|params| camera.apply_camera(params)),
        }

        Ok(KeyOutcome::Handled)
    }

    /// Ends the session once it has run its length. Returns true on the call
    /// that ended it.
    pub fn update(&mut self, player: &mut AnimationPlayer, now: Instant) -> bool {
        match self.session_started {
            Some(started) if now.duration_since(started) >= self.session_length => {
                log::debug!("Session ended with the animation in {:?}", player.state());
                player.stop();
                self.session_started = None;
                true
            }
            _ => false,
        }
    }
}
