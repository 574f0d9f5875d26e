use rand::Rng as _;
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    ms_to_s, DispatchContext, TaskAction, TaskKind, TaskOutput, TaskSetup, TickFrame, TrialPhase,
    TrialRun,
};
use crate::{
    conditions::{linear_forward_table, ConditionSet, LinearCondition, ShufflePolicy},
    config::{
        FORWARD_ROTATION_DEG, INIT_TARGET_MAX_M, INIT_TARGET_MIN_M, LINEAR_VELOCITY_M_S,
        MAX_MOTION_STEP_M, MIN_MOTION_STEP_M, MOTION_STEP_MULTIPLIER, ROTATE_VELOCITY_DEG_S,
        TARGET_MAX_M, TARGET_MIN_M,
    },
    input::InputSnapshot,
    kinematics::{
        heading, place_polar, rotate, translate, AcceleratingStep, Axis, Pose, StepDirection,
        Vec3,
    },
    recording::{LinearForwardRecord, ResponseLog, TrialRecord},
    scene::{Entity, SceneCommand},
};

/// Turn 45 degrees, travel along the new heading, then match the travelled
/// distance with the reticle.
pub struct LinearForwardTask {
    machine: statig::blocking::StateMachine<LinearForwardHsm>,
}

impl LinearForwardTask {
    pub fn new(mut setup: TaskSetup, policy: ShufflePolicy) -> Self {
        let conditions = ConditionSet::shuffled(linear_forward_table(), policy, &mut setup.rng);
        Self::with_conditions(setup, conditions)
    }

    pub fn with_conditions(setup: TaskSetup, conditions: ConditionSet<LinearCondition>) -> Self {
        Self {
            machine: LinearForwardHsm::new(setup, conditions).state_machine(),
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

    pub fn target_distance(&self) -> f64 {
        self.machine.inner().target
    }
}

struct LinearForwardHsm {
    run: TrialRun<LinearCondition>,
    responses: ResponseLog<LinearForwardRecord>,
    axis: Axis,
    spin_dir: f64,
    distance: f64,
    turn_start_ms: u64,
    phase_start_ms: u64,
    target_init: f64,
    target: f64,
    step: AcceleratingStep,
}

impl LinearForwardHsm {
    fn new(setup: TaskSetup, conditions: ConditionSet<LinearCondition>) -> Self {
        Self {
            run: TrialRun::new(TaskKind::LinearForward, setup, conditions),
            responses: ResponseLog::default(),
            axis: Axis::Yaw,
            spin_dir: 1.0,
            distance: 0.0,
            turn_start_ms: 0,
            phase_start_ms: 0,
            target_init: 0.0,
            target: 0.0,
            step: AcceleratingStep::new(
                MIN_MOTION_STEP_M,
                MAX_MOTION_STEP_M,
                MOTION_STEP_MULTIPLIER,
            ),
        }
    }

    fn enter(&mut self, phase: TrialPhase, state: State) -> Outcome<State> {
        self.run.phase = phase;
        Transition(state)
    }

    #[inline]
    fn heading_deg(&self) -> f64 {
        self.spin_dir * FORWARD_ROTATION_DEG
    }

    /// Reticle sits `target` metres ahead of the observer along the heading.
    fn place_reticle(&self, context: &mut DispatchContext) {
        let angle = self.heading_deg();
        let pose = Pose::new(
            self.run.observer.position + place_polar(self.target, angle, self.axis),
            heading(self.axis, angle),
        );
        context.scene(SceneCommand::pose(Entity::Reticle, pose));
    }

    fn complete(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        let file = self
            .responses
            .dump(self.run.response_path(), LinearForwardRecord::HEADER);
        self.run.complete(context, file);
        self.enter(TrialPhase::Done, State::done())
    }
}

#[state_machine(initial = "State::initialize()")]
impl LinearForwardHsm {
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
        self.distance = condition.distance;
        self.run.announce(context, condition.axis);
        self.enter(TrialPhase::WaitForStart, State::wait_for_start())
    }

    #[state]
    fn wait_for_start(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        if !event.input.confirm {
            return Handled;
        }
        context.scene(SceneCommand::hide(Entity::Dialog));
        self.turn_start_ms = event.now_ms;
        self.enter(TrialPhase::Turn, State::turning())
    }

    #[state]
    fn turning(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let elapsed = event.elapsed_s(self.turn_start_ms);
        let orientation = rotate(
            elapsed,
            ROTATE_VELOCITY_DEG_S,
            FORWARD_ROTATION_DEG,
            self.axis,
            self.spin_dir,
        );
        self.run
            .set_observer(context, Pose::new(Vec3::ZERO, orientation));

        if ROTATE_VELOCITY_DEG_S * elapsed < FORWARD_ROTATION_DEG {
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
        self.enter(TrialPhase::MoveForward, State::move_forward())
    }

    #[state]
    fn move_forward(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let travelled = translate(
            event.elapsed_s(self.phase_start_ms),
            LINEAR_VELOCITY_M_S,
            self.distance,
        );
        let angle = self.heading_deg();
        self.run.set_observer(
            context,
            Pose::new(
                place_polar(travelled, angle, self.axis),
                heading(self.axis, angle),
            ),
        );

        if travelled < self.distance {
            return Handled;
        }

        self.target_init = self
            .run
            .setup
            .rng
            .gen_range(INIT_TARGET_MIN_M..=INIT_TARGET_MAX_M);
        self.target = self.target_init;
        self.step.reset();
        self.place_reticle(context);
        context.scene(SceneCommand::show(Entity::Reticle));
        self.enter(TrialPhase::AdjustTarget, State::adjust_target())
    }

    #[state]
    fn adjust_target(&mut self, context: &mut DispatchContext, event: &TickFrame) -> Outcome<State> {
        let direction =
            StepDirection::from_flags(event.input.adjust_plus, event.input.adjust_minus);
        self.target = self
            .step
            .apply(self.target, direction, TARGET_MIN_M, TARGET_MAX_M);
        self.place_reticle(context);

        if !event.input.confirm {
            return Handled;
        }

        self.responses.push(LinearForwardRecord {
            cond: self.run.cond,
            turn_start_s: ms_to_s(self.turn_start_ms),
            distance: self.distance,
            rotation_deg: FORWARD_ROTATION_DEG,
            pitch: self.axis.is_pitch(),
            spin_dir: self.spin_dir,
            target_init: self.target_init,
            target_final: self.target,
        });
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
