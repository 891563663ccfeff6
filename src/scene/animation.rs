use crate::scene::params::{TransformParameters, DEFAULT_SCENE_DISTANCE, RAMP_MAX_ANGLE};

const TRUCK_START_X: f32 = 400.0;
const TRUCK_STEP: f32 = 5.0;
const TURN_STEP: f32 = 5.0;
const RAMP_STEP: f32 = 1.0;

const TURNED_ANGLE: f32 = -180.0;
const STRAIGHT_ANGLE: f32 = -90.0;
const RAMP_STOP_Z: f32 = -40.0;
const RAMP_WAIT_TICKS: u32 = 30;
const OFF_SCREEN_X: f32 = -1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    TruckArriving,
    TruckTurning,
    TruckTowardsRamp,
    RampRising,
    RampWait,
    RampLowering,
    TruckAwayFromRamp,
    TruckTurningBack,
    TruckLeaving,
    #[default]
    AnimationFinished,
}

impl AnimationState {
    /// Applies one tick worth of movement for this state and returns the
    /// state the next tick runs in. The exit check sees the value written
    /// by this same tick.
    pub fn step(self, params: &mut TransformParameters) -> AnimationState {
        use AnimationState::*;

        match self {
            TruckArriving => {
                params.truck_x -= TRUCK_STEP;
                advance_if(params.truck_x <= 0.0, self, TruckTurning)
            }
            TruckTurning => {
                params.truck_angle -= TURN_STEP;
                advance_if(params.truck_angle <= TURNED_ANGLE, self, TruckTowardsRamp)
            }
            TruckTowardsRamp => {
                params.truck_z -= TRUCK_STEP;
                advance_if(params.truck_z <= RAMP_STOP_Z, self, RampRising)
            }
            RampRising => {
                params.ramp_angle += RAMP_STEP;
                advance_if(params.ramp_angle >= RAMP_MAX_ANGLE, self, RampWait)
            }
            RampWait => {
                params.ramp_wait_counter += 1;
                advance_if(params.ramp_wait_counter >= RAMP_WAIT_TICKS, self, RampLowering)
            }
            RampLowering => {
                params.ramp_angle -= RAMP_STEP;
                advance_if(params.ramp_angle <= 0.0, self, TruckAwayFromRamp)
            }
            TruckAwayFromRamp => {
                params.truck_z += TRUCK_STEP;
                advance_if(params.truck_z >= 0.0, self, TruckTurningBack)
            }
            TruckTurningBack => {
                params.truck_angle += TURN_STEP;
                advance_if(params.truck_angle >= STRAIGHT_ANGLE, self, TruckLeaving)
            }
            TruckLeaving => {
                params.truck_x -= TRUCK_STEP;
                advance_if(params.truck_x <= OFF_SCREEN_X, self, AnimationFinished)
            }
            AnimationFinished => AnimationFinished,
        }
    }

    pub fn is_finished(self) -> bool {
        self == AnimationState::AnimationFinished
    }
}

fn advance_if(done: bool, current: AnimationState, next: AnimationState) -> AnimationState {
    if done {
        next
    } else {
        current
    }
}

/// The scripted truck-and-ramp run. Holds nothing but the current state;
/// every movement lands in the [`TransformParameters`] passed in.
#[derive(Debug, Default)]
pub struct Sequencer {
    state: AnimationState,
}

impl Sequencer {
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Seeds the parameters with the opening pose and enters
    /// [`AnimationState::TruckArriving`].
    pub fn start(&mut self, params: &mut TransformParameters) {
        params.truck_x = TRUCK_START_X;
        params.truck_z = 0.0;
        params.truck_angle = STRAIGHT_ANGLE;
        params.ramp_angle = 0.0;
        params.ramp_wait_counter = 0;
        params.set_truck_scale(1.0);

        params.scene_distance = DEFAULT_SCENE_DISTANCE;
        params.set_camera_rotation_x(0.0);
        params.camera_rotation_y = 0.0;

        self.state = AnimationState::TruckArriving;
    }

    pub fn tick(&mut self, params: &mut TransformParameters) {
        let next = self.state.step(params);
        if next != self.state {
            log::debug!("Animation {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Abandons the run wherever it is and snaps back to the rest pose.
    pub fn stop(&mut self, params: &mut TransformParameters) {
        params.reset_to_rest();
        self.state = AnimationState::AnimationFinished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AnimationState::*;

    fn started() -> (Sequencer, TransformParameters) {
        let mut params = TransformParameters::default();
        let mut sequencer = Sequencer::default();
        sequencer.start(&mut params);
        (sequencer, params)
    }

    fn run_to_completion(sequencer: &mut Sequencer, params: &mut TransformParameters) -> u32 {
        let mut ticks = 0;
        while !sequencer.state().is_finished() {
            sequencer.tick(params);
            ticks += 1;
            assert!(ticks < 10_000, "animation never finished");
        }
        ticks
    }

    #[test]
    fn start_seeds_the_opening_pose() {
        let mut params = TransformParameters::default();
        params.set_truck_scale(3.0);
        params.ramp_wait_counter = 12;
        params.scene_distance = 600.0;
        params.set_camera_rotation_x(20.0);

        let mut sequencer = Sequencer::default();
        assert_eq!(sequencer.state(), AnimationFinished);
        sequencer.start(&mut params);

        assert_eq!(sequencer.state(), TruckArriving);
        assert_eq!(params.truck_x, 400.0);
        assert_eq!(params.truck_z, 0.0);
        assert_eq!(params.truck_angle, -90.0);
        assert_eq!(params.ramp_angle, 0.0);
        assert_eq!(params.ramp_wait_counter, 0);
        assert_eq!(params.truck_scale(), 1.0);
        assert_eq!(params.scene_distance, 150.0);
        assert_eq!(params.camera_rotation_x(), 0.0);
    }

    #[test]
    fn arriving_moves_five_per_tick_until_zero() {
        let (mut sequencer, mut params) = started();

        for i in 1..80 {
            sequencer.tick(&mut params);
            assert_eq!(params.truck_x, 400.0 - 5.0 * i as f32);
            assert_eq!(sequencer.state(), TruckArriving);
        }

        sequencer.tick(&mut params);
        assert_eq!(params.truck_x, 0.0);
        assert_eq!(sequencer.state(), TruckTurning);
    }

    #[test]
    fn arriving_does_not_clamp_overshoot() {
        let mut params = TransformParameters::default();
        params.truck_x = 3.0;

        let next = TruckArriving.step(&mut params);

        assert_eq!(next, TruckTurning);
        assert_eq!(params.truck_x, -2.0);
    }

    #[test]
    fn each_phase_lasts_the_scripted_number_of_ticks() {
        let (mut sequencer, mut params) = started();
        let mut phases: Vec<(AnimationState, u32)> = Vec::new();

        while !sequencer.state().is_finished() {
            let state = sequencer.state();
            if phases.last().map(|(last, _)| *last) == Some(state) {
                if let Some((_, count)) = phases.last_mut() {
                    *count += 1;
                }
            } else {
                phases.push((state, 1));
            }
            sequencer.tick(&mut params);
        }

        assert_eq!(
            phases,
            vec![
                (TruckArriving, 80),
                (TruckTurning, 18),
                (TruckTowardsRamp, 8),
                (RampRising, 25),
                (RampWait, 30),
                (RampLowering, 25),
                (TruckAwayFromRamp, 8),
                (TruckTurningBack, 18),
                (TruckLeaving, 200),
            ]
        );
    }

    #[test]
    fn full_run_finishes_and_stays_finished() {
        let (mut sequencer, mut params) = started();

        let ticks = run_to_completion(&mut sequencer, &mut params);

        assert_eq!(ticks, 412);
        assert_eq!(params.truck_x, -1000.0);
        assert_eq!(params.truck_z, 0.0);
        assert_eq!(params.truck_angle, -90.0);
        assert_eq!(params.ramp_angle, 0.0);
        assert_eq!(params.ramp_wait_counter, 30);

        let frozen = params;
        sequencer.tick(&mut params);
        assert_eq!(params, frozen);
        assert_eq!(sequencer.state(), AnimationFinished);
    }

    #[test]
    fn ramp_angle_stays_within_bounds() {
        let (mut sequencer, mut params) = started();
        let mut peak: f32 = 0.0;

        while !sequencer.state().is_finished() {
            sequencer.tick(&mut params);
            assert!((0.0..=25.0).contains(&params.ramp_angle));
            peak = peak.max(params.ramp_angle);
        }

        assert_eq!(peak, 25.0);
    }

    #[test]
    fn states_are_visited_in_order_without_reentry() {
        let (mut sequencer, mut params) = started();
        let order = [
            TruckArriving,
            TruckTurning,
            TruckTowardsRamp,
            RampRising,
            RampWait,
            RampLowering,
            TruckAwayFromRamp,
            TruckTurningBack,
            TruckLeaving,
            AnimationFinished,
        ];
        let position = |state| order.iter().position(|s| *s == state).unwrap();

        let mut last = position(sequencer.state());
        while !sequencer.state().is_finished() {
            sequencer.tick(&mut params);
            let current = position(sequencer.state());
            assert!(current == last || current == last + 1);
            last = current;
        }
    }

    #[test]
    fn stop_resets_from_any_state() {
        let (mut reference, mut reference_params) = started();
        let mut seen = Vec::new();

        while !reference.state().is_finished() {
            let state = reference.state();
            if !seen.contains(&state) {
                seen.push(state);

                let mut sequencer = Sequencer { state };
                let mut params = reference_params;
                sequencer.stop(&mut params);

                assert_eq!(sequencer.state(), AnimationFinished, "from {state:?}");
                assert_eq!(params.truck_angle, -90.0);
                assert_eq!(params.truck_x, 60.0);
                assert_eq!(params.truck_z, 0.0);
                assert_eq!(params.ramp_angle, 0.0);
                assert_eq!(params.ramp_wait_counter, 0);
            }
            reference.tick(&mut reference_params);
        }

        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn stop_leaves_user_framing_alone() {
        let (mut sequencer, mut params) = started();
        params.set_truck_scale(2.0);
        params.camera_rotation_y = 35.0;

        sequencer.stop(&mut params);

        assert_eq!(params.truck_scale(), 2.0);
        assert_eq!(params.camera_rotation_y, 35.0);
    }
}
