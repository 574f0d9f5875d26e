use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    ms_to_s, DispatchContext, TaskAction, TaskKind, TaskOutput, TaskSetup, TickFrame, TrialPhase,
    TrialRun,
};
use crate::{
    conditions::{rotation_table, ConditionSet, RotationCondition, ShufflePolicy},
    config::{
        MAX_TURN_ANGLE_DEG, MAX_TURN_STEP_DEG, MIN_TURN_ANGLE_DEG, MIN_TURN_STEP_DEG,
        ROTATE_VELOCITY_DEG_S, ROTATION_FIXATION_DISTANCE_M, ROTATION_RETICLE_DISTANCE_M,
        TURN_STEP_MULTIPLIER,
    },
    input::InputSnapshot,
    kinematics::{
        heading, place_polar, rotate, AcceleratingStep, Axis, EulerAngles, Pose, StepDirection,
        Vec3,
    },
    recording::{ResponseLog, RotationRecord, TrialRecord},
    scene::{Entity, SceneCommand},
};

pub struct RotationTask {
    machine: statig::blocking::StateMachine<RotationHsm>,
}

impl RotationTask {
    pub fn new(mut setup: TaskSetup, policy: ShufflePolicy) -> Self {
        let conditions = ConditionSet::shuffled(rotation_table(), policy, &mut setup.rng);
        Self::with_conditions(setup, conditions)
    }

    pub fn with_conditions(setup: TaskSetup, conditions: ConditionSet<RotationCondition>) -> Self {
        Self {
            machine: RotationHsm::new(setup, conditions).state_machine(),
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

    /// Reticle offset from the remembered heading, in degrees.
    pub fn turn_angle(&self) -> f64 {
        self.machine.inner().turn_angle
    }
}

struct RotationHsm {
    run: TrialRun<RotationCondition>,
    responses: ResponseLog<RotationRecord>,
    axis: Axis,
    spin_dir: f64,
    /// Amplitude actually turned, `180 - angle`.
    turn: f64,
    turn_start_ms: u64,
    turn_angle: f64,
    turn_step: AcceleratingStep,
}

impl RotationHsm {
    fn new(setup: TaskSetup, conditions: ConditionSet<RotationCondition>) -> Self {
        Self {
            run: TrialRun::new(TaskKind::Rotation, setup, conditions),
            responses: ResponseLog::default(),
            axis: Axis::Yaw,
            spin_dir: 1.0,
            turn: 0.0,
            turn_start_ms: 0,
            turn_angle: 0.0,
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

    fn place_reticle(&self, context: &mut DispatchContext, heading_deg: f64) {
        let pose = Pose::new(
            place_polar(ROTATION_RETICLE_DISTANCE_M, heading_deg, self.axis),
            heading(self.axis, heading_deg),
        );
        context.scene(SceneCommand::pose(Entity::Reticle, pose));
    }

    fn complete(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        let file = self
            .responses
            .dump(self.run.response_path(), RotationRecord::HEADER);
        self.run.complete(context, file);
        self.enter(TrialPhase::Done, State::done())
    }
}

#[state_machine(initial = "State::initialize()")]
impl RotationHsm {
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
        self.turn = 180.0 - condition.angle_deg;
        self.run.announce(context, condition.axis);
        self.enter(TrialPhase::WaitForButtonPress, State::wait_for_button_press())
    }

    #[state]
    fn wait_for_button_press(
        &mut self,
        context: &mut DispatchContext,
        event: &TickFrame,
    ) -> Outcome<State> {
        if !event.input.confirm {
            return Handled;
        }
        context.scene(SceneCommand::hide(Entity::Dialog));
        context.scene(SceneCommand::pose(
            Entity::FixationTarget,
            Pose::new(
                Vec3::new(0.0, 0.0, ROTATION_FIXATION_DISTANCE_M),
                EulerAngles::LEVEL,
            ),
        ));
        context.scene(SceneCommand::show(Entity::FixationTarget));
        self.enter(TrialPhase::WaitToTurn, State::wait_to_turn())
    }

    #[state]
    fn wait_to_turn(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        if !event.input.confirm {
            return Handled;
        }
        self.turn_start_ms = event.now_ms;
        context.scene(SceneCommand::hide(Entity::FixationTarget));
        self.enter(TrialPhase::Turn, State::turning())
    }

    #[state]
    fn turning(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let elapsed = event.elapsed_s(self.turn_start_ms);
        let orientation = rotate(
            elapsed,
            ROTATE_VELOCITY_DEG_S,
            self.turn,
            self.axis,
            self.spin_dir,
        );
        self.run
            .set_observer(context, Pose::new(Vec3::ZERO, orientation));

        if ROTATE_VELOCITY_DEG_S * elapsed < self.turn {
            return Handled;
        }

        self.place_reticle(context, self.spin_dir * self.turn);
        context.scene(SceneCommand::show(Entity::Reticle));
        self.turn_angle = 0.0;
        self.turn_step.reset();
        self.enter(TrialPhase::TurnBack, State::turn_back())
    }

    #[state]
    fn turn_back(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let direction =
            StepDirection::from_flags(event.input.increment_held, event.input.decrement_held);
        self.turn_angle = self.turn_step.apply(
            self.turn_angle,
            direction,
            MIN_TURN_ANGLE_DEG,
            MAX_TURN_ANGLE_DEG,
        );

        let heading_deg = self.spin_dir * (self.turn + self.turn_angle);
        self.run.set_observer(
            context,
            Pose::new(Vec3::ZERO, heading(self.axis, heading_deg)),
        );
        self.place_reticle(context, heading_deg);

        if !event.input.confirm {
            return Handled;
        }

        self.responses.push(RotationRecord {
            cond: self.run.cond,
            turn_start_s: ms_to_s(self.turn_start_ms),
            angle_deg: 180.0 - self.turn,
            pitch: self.axis.is_pitch(),
            spin_dir: self.spin_dir,
            turn_angle: self.turn_angle,
        });
        context.scene(SceneCommand::pose(
            Entity::Reticle,
            Pose::new(
                Vec3::new(0.0, 0.0, ROTATION_RETICLE_DISTANCE_M),
                EulerAngles::LEVEL,
            ),
        ));
        context.scene(SceneCommand::hide(Entity::Reticle));

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

#[cfg(test)]
mod tests;
