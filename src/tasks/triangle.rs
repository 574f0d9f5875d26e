//! Triangle completion: travel the first leg backward, turn, travel the second
//! leg, then point and range the reticle at the remembered start.

use rand::Rng as _;
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    ms_to_s, DispatchContext, TaskAction, TaskKind, TaskOutput, TaskSetup, TickFrame, TrialPhase,
    TrialRun,
};
use crate::{
    conditions::{triangle_table, ConditionSet, ShufflePolicy, TriangleCondition, TriangleVariant},
    config::{
        FIXATION_START_DISTANCE_M, LINEAR_VELOCITY_M_S, MAX_MOTION_STEP_M, MAX_TURN_ANGLE_DEG,
        MAX_TURN_STEP_DEG, MIN_MOTION_STEP_M, MIN_TURN_ANGLE_DEG, MIN_TURN_STEP_DEG,
        MOTION_STEP_MULTIPLIER, ROTATE_VELOCITY_DEG_S, TARGET_MAX_M, TARGET_MIN_M,
        TRIANGLE_INIT_RETICLE_MAX_M, TRIANGLE_INIT_RETICLE_MIN_M, TURN_STEP_MULTIPLIER,
    },
    input::InputSnapshot,
    kinematics::{
        heading, place_polar, rotate, translate, AcceleratingStep, Axis, EulerAngles, Pose,
        StepDirection, Vec3,
    },
    recording::{ResponseLog, TrialRecord, TriangleRecord},
    scene::{Entity, SceneCommand},
};

pub struct TriangleTask {
    machine: statig::blocking::StateMachine<TriangleHsm>,
}

impl TriangleTask {
    pub fn new(mut setup: TaskSetup, policy: ShufflePolicy, variant: TriangleVariant) -> Self {
        let conditions = ConditionSet::shuffled(triangle_table(variant), policy, &mut setup.rng);
        Self::with_conditions(setup, conditions)
    }

    pub fn with_conditions(setup: TaskSetup, conditions: ConditionSet<TriangleCondition>) -> Self {
        Self {
            machine: TriangleHsm::new(setup, conditions).state_machine(),
        }
    }

    pub fn tick(&mut self, now_ms: u64, input: InputSnapshot) -> TaskOutput {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&TickFrame { now_ms, input }, &mut context);
        self.machine.inner().run.output(context)
    }

    pub fn phase(&self) -> TrialPhase {
        self.machine.inner().run.phase
    }

    pub fn direction_distance(&self) -> f64 {
        self.machine.inner().direction_distance
    }

    pub fn direction_angle(&self) -> f64 {
        self.machine.inner().direction_angle
    }
}

struct TriangleHsm {
    run: TrialRun<TriangleCondition>,
    responses: ResponseLog<TriangleRecord>,
    axis: Axis,
    spin_dir: f64,
    leg1: f64,
    leg2: f64,
    turn: f64,
    backward_start_ms: u64,
    phase_start_ms: u64,
    /// Where the second leg ended; the observer stays here while pointing.
    corner: Vec3,
    direction_init: f64,
    direction_distance: f64,
    direction_angle: f64,
    motion_step: AcceleratingStep,
    turn_step: AcceleratingStep,
}

impl TriangleHsm {
    fn new(setup: TaskSetup, conditions: ConditionSet<TriangleCondition>) -> Self {
        Self {
            run: TrialRun::new(TaskKind::TriangleCompletion, setup, conditions),
            responses: ResponseLog::default(),
            axis: Axis::Yaw,
            spin_dir: 1.0,
            leg1: 0.0,
            leg2: 0.0,
            turn: 0.0,
            backward_start_ms: 0,
            phase_start_ms: 0,
            corner: Vec3::ZERO,
            direction_init: 0.0,
            direction_distance: 0.0,
            direction_angle: 0.0,
            motion_step: AcceleratingStep::new(
                MIN_MOTION_STEP_M,
                MAX_MOTION_STEP_M,
                MOTION_STEP_MULTIPLIER,
            ),
            turn_step: AcceleratingStep::new(
                MIN_TURN_STEP_DEG,
                MAX_TURN_STEP_DEG,
                TURN_STEP_MULTIPLIER,
            ),
        }
    }

    fn enter(&mut self, phase: TrialPhase, state: State) -> Outcome<State> {
        self.run.phase = phase;
        Transition(state)
    }

    #[inline]
    fn leg_one_end(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -self.leg1)
    }

    /// Current pointing heading, signed for the turn direction.
    #[inline]
    fn pointing_deg(&self) -> f64 {
        self.spin_dir * (self.turn + self.direction_angle)
    }

    fn place_reticle(&self, context: &mut DispatchContext, heading_deg: f64) {
        let pose = Pose::new(
            self.corner + place_polar(self.direction_distance, heading_deg, self.axis),
            heading(self.axis, heading_deg),
        );
        context.scene(SceneCommand::pose(Entity::Reticle, pose));
    }

    fn complete(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        let file = self
            .responses
            .dump(self.run.response_path(), TriangleRecord::HEADER);
        self.run.complete(context, file);
        self.enter(TrialPhase::Done, State::done())
    }
}

#[state_machine(initial = "State::initialize()")]
impl TriangleHsm {
    #[state]
    fn initialize(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let _ = event;
        self.run.show_intro(context);
        self.enter(TrialPhase::Setup, State::setup())
    }

    #[state]
    fn setup(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        if !event.input.confirm {
            return Handled;
        }
        self.run.begin(context);
        self.enter(TrialPhase::BeforeMotion, State::before_motion())
    }

    #[state]
    fn before_motion(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let _ = event;
        let Some(condition) = self.run.current() else {
            return self.complete(context);
        };

        self.axis = condition.axis;
        self.spin_dir = condition.turn.spin_dir(condition.axis);
        self.leg1 = condition.leg1;
        self.leg2 = condition.leg2;
        self.turn = 180.0 - condition.angle_deg;
        self.run.announce(context, condition.axis);
        self.enter(
            TrialPhase::WaitForBackwardTarget,
            State::wait_for_backward_target(),
        )
    }

    #[state]
    fn wait_for_backward_target(
        &mut self,
        context: &mut DispatchContext,
        event: &TickFrame,
    ) -> Outcome<State> {
        if !event.input.confirm {
            return Handled;
        }
        context.scene(SceneCommand::pose(
            Entity::FixationTarget,
            Pose::new(
                Vec3::new(0.0, 0.0, FIXATION_START_DISTANCE_M),
                EulerAngles::LEVEL,
            ),
        ));
        context.scene(SceneCommand::hide(Entity::Dialog));
        context.scene(SceneCommand::show(Entity::FixationTarget));
        self.phase_start_ms = event.now_ms;
        self.enter(TrialPhase::WaitToMove, State::wait_to_move())
    }

    #[state]
    fn wait_to_move(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let _ = context;
        if !event.waited(self.phase_start_ms) {
            return Handled;
        }
        self.backward_start_ms = event.now_ms;
        self.enter(TrialPhase::MovingBackward, State::moving_backward())
    }

    #[state]
    fn moving_backward(
        &mut self,
        context: &mut DispatchContext,
        event: &TickFrame,
    ) -> Outcome<State> {
        let travelled = translate(
            event.elapsed_s(self.backward_start_ms),
            LINEAR_VELOCITY_M_S,
            self.leg1,
        );
        self.run.set_observer(
            context,
            Pose::new(Vec3::new(0.0, 0.0, -travelled), EulerAngles::LEVEL),
        );

        if travelled < self.leg1 {
            return Handled;
        }
        self.phase_start_ms = event.now_ms;
        self.enter(TrialPhase::WaitToRotate, State::wait_to_rotate())
    }

    #[state]
    fn wait_to_rotate(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        if !event.waited(self.phase_start_ms) {
            return Handled;
        }
        context.scene(SceneCommand::hide(Entity::FixationTarget));
        self.phase_start_ms = event.now_ms;
        self.enter(TrialPhase::Turn, State::turning())
    }

    #[state]
    fn turning(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let elapsed = event.elapsed_s(self.phase_start_ms);
        let orientation = rotate(
            elapsed,
            ROTATE_VELOCITY_DEG_S,
            self.turn,
            self.axis,
            self.spin_dir,
        );
        self.run
            .set_observer(context, Pose::new(self.leg_one_end(), orientation));

        if ROTATE_VELOCITY_DEG_S * elapsed < self.turn {
            return Handled;
        }
        self.phase_start_ms = event.now_ms;
        self.enter(TrialPhase::Wait, State::wait())
    }

    #[state]
    fn wait(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let _ = context;
        if !event.waited(self.phase_start_ms) {
            return Handled;
        }
        self.phase_start_ms = event.now_ms;
        self.enter(TrialPhase::LegTwo, State::leg_two())
    }

    #[state]
    fn leg_two(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let travelled = translate(
            event.elapsed_s(self.phase_start_ms),
            LINEAR_VELOCITY_M_S,
            self.leg2,
        );
        let heading_deg = self.spin_dir * self.turn;
        let position = self.leg_one_end() + place_polar(travelled, heading_deg, self.axis);
        self.run
            .set_observer(context, Pose::new(position, heading(self.axis, heading_deg)));

        if travelled < self.leg2 {
            return Handled;
        }

        self.corner = position;
        self.direction_init = self
            .run
            .setup
            .rng
            .gen_range(TRIANGLE_INIT_RETICLE_MIN_M..=TRIANGLE_INIT_RETICLE_MAX_M);
        self.direction_distance = self.direction_init;
        self.direction_angle = 0.0;
        self.motion_step.reset();
        self.turn_step.reset();
        self.place_reticle(context, heading_deg);
        context.scene(SceneCommand::show(Entity::Reticle));
        self.enter(TrialPhase::PlaceTarget, State::place_target())
    }

    #[state]
    fn place_target(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let input = event.input;
        self.direction_angle = self.turn_step.apply(
            self.direction_angle,
            StepDirection::from_flags(input.increment_held, input.decrement_held),
            MIN_TURN_ANGLE_DEG,
            MAX_TURN_ANGLE_DEG,
        );
        self.direction_distance = self.motion_step.apply(
            self.direction_distance,
            StepDirection::from_flags(input.adjust_plus, input.adjust_minus),
            TARGET_MIN_M,
            TARGET_MAX_M,
        );

        let heading_deg = self.pointing_deg();
        self.run.set_observer(
            context,
            Pose::new(self.corner, heading(self.axis, heading_deg)),
        );
        self.place_reticle(context, heading_deg);

        if !input.confirm {
            return Handled;
        }

        context.scene(SceneCommand::hide(Entity::Reticle));
        self.responses.push(TriangleRecord {
            cond: self.run.cond,
            backward_time_s: ms_to_s(self.backward_start_ms),
            leg1: self.leg1,
            angle_deg: 180.0 - self.turn,
            pitch: self.axis.is_pitch(),
            spin_dir: self.spin_dir,
            leg2: self.leg2,
            direction_init: self.direction_init,
            direction_final: self.direction_distance,
            direction_angle: self.direction_angle,
        });

        if self.run.finish_trial(context) {
            self.enter(TrialPhase::BeforeMotion, State::before_motion())
        } else {
            self.complete(context)
        }
    }

    #[state]
    fn done(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        if event.input.confirm {
            context.actions.push(TaskAction::Terminate);
        }
        Handled
    }
}
