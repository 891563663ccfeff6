use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::scene::{
    animation::{AnimationState, Sequencer},
    params::TransformParameters,
    ticker::RepeatingTask,
};

#[derive(Debug, Default)]
pub struct SceneState {
    pub params: TransformParameters,
    pub sequencer: Sequencer,
}

/// Owns the scene parameters and the tick source that animates them.
///
/// The tick worker and the render loop share one mutex. Readers take a
/// full copy of the parameters, so a frame never mixes two ticks.
pub struct AnimationPlayer {
    shared: Arc<Mutex<SceneState>>,
    tick_interval: Duration,
    task: Option<RepeatingTask>,
}

impl AnimationPlayer {
    pub fn new(params: TransformParameters, tick_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(SceneState {
                params,
                sequencer: Sequencer::default(),
            })),
            tick_interval,
            task: None,
        }
    }

    pub fn snapshot(&self) -> TransformParameters {
        self.lock().params
    }

    pub fn state(&self) -> AnimationState {
        self.lock().sequencer.state()
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(RepeatingTask::is_running)
    }

    pub fn update_params<R>(&self, f: impl FnOnce(&mut TransformParameters) -> R) -> R {
        f(&mut self.lock().params)
    }

    pub fn start(&mut self) -> anyhow::Result<()> {
        if let Some(mut task) = self.task.take() {
            task.cancel();
        }

        {
            let mut scene = self.lock();
            let SceneState { params, sequencer } = &mut *scene;
            sequencer.start(params);
        }

        let shared = self.shared.clone();
        let task = RepeatingTask::spawn("animation-tick", self.tick_interval, move || {
            let mut scene = shared.lock().unwrap_or_else(PoisonError::into_inner);
            let SceneState { params, sequencer } = &mut *scene;
            sequencer.tick(params);
        })?;
        self.task = Some(task);

        log::info!("Animation started ({:?} per tick)", self.tick_interval);
        Ok(())
    }

    /// Halts the tick source, then snaps the scene back to rest. Returns only
    /// after the last tick has finished.
    pub fn stop(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.cancel();
        }

        let mut scene = self.lock();
        let SceneState { params, sequencer } = &mut *scene;
        sequencer.stop(params);

        log::info!("Animation stopped");
    }

    fn lock(&self) -> MutexGuard<'_, SceneState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_for(player: &AnimationPlayer, predicate: impl Fn(&AnimationPlayer) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !predicate(player) {
            assert!(Instant::now() < deadline, "timed out waiting for animation");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn runs_to_completion_on_its_own() {
        let mut player = AnimationPlayer::new(TransformParameters::default(), Duration::from_millis(1));
        player.start().unwrap();
        assert!(player.is_active());

        wait_for(&player, |p| p.state() == AnimationState::AnimationFinished);

        let params = player.snapshot();
        assert_eq!(params.truck_x, -1000.0);
        assert_eq!(params.ramp_angle, 0.0);
        player.stop();
    }

    #[test]
    fn stop_is_final() {
        let mut player = AnimationPlayer::new(TransformParameters::default(), Duration::from_millis(1));
        player.start().unwrap();
        wait_for(&player, |p| p.snapshot().truck_x < 300.0);

        player.stop();
        assert!(!player.is_active());

        let stopped = player.snapshot();
        assert_eq!(player.state(), AnimationState::AnimationFinished);
        assert_eq!(stopped.truck_x, 60.0);
        assert_eq!(stopped.truck_z, 0.0);
        assert_eq!(stopped.truck_angle, -90.0);
        assert_eq!(stopped.ramp_angle, 0.0);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(player.snapshot(), stopped);
    }

    #[test]
    fn parameter_edits_are_visible_to_snapshots() {
        let player = AnimationPlayer::new(TransformParameters::default(), Duration::from_millis(10));
        player.update_params(|params| params.set_truck_scale(2.5));
        assert_eq!(player.snapshot().truck_scale(), 2.5);
        assert!(!player.is_active());
    }

    #[test]
    fn restarting_replaces_the_running_task() {
        let mut player = AnimationPlayer::new(TransformParameters::default(), Duration::from_millis(1));
        player.start().unwrap();
        wait_for(&player, |p| p.snapshot().truck_x < 350.0);

        player.start().unwrap();
        let restarted = player.snapshot();
        assert!(restarted.truck_x <= 400.0);
        assert!(restarted.truck_x > 300.0);
        player.stop();
    }
}
