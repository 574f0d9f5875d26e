//! Trial engines, one statig machine per experiment.
//!
//! Every engine is ticked once per frame with the session clock and the
//! debounced input for that frame. A tick returns the scene commands and
//! side effects it produced plus the phase the machine ended in.

use std::{fmt, path::PathBuf, str::FromStr};

use rand::rngs::StdRng;

use crate::{
    conditions::ConditionSet,
    config::WAIT_TIME_MS,
    input::InputSnapshot,
    kinematics::{Axis, Pose},
    recording::LogFile,
    scene::{DialogBackground, Entity, SceneCommand},
};

pub mod linear_backward;
pub mod linear_forward;
pub mod rotation;
pub mod triangle;

pub use linear_backward::LinearBackwardTask;
pub use linear_forward::LinearForwardTask;
pub use rotation::RotationTask;
pub use triangle::TriangleTask;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    LinearForward,
    LinearBackward,
    Rotation,
    TriangleCompletion,
}

impl TaskKind {
    pub const ALL: [Self; 4] = [
        Self::LinearForward,
        Self::LinearBackward,
        Self::Rotation,
        Self::TriangleCompletion,
    ];

    pub const fn response_stem(self) -> &'static str {
        match self {
            Self::LinearForward => "linear_forward",
            Self::LinearBackward => "linear_backward",
            Self::Rotation => "rotation",
            Self::TriangleCompletion => "triangle",
        }
    }

    pub const fn trace_stem(self) -> &'static str {
        match self {
            Self::TriangleCompletion => "triangle_completion",
            other => other.response_stem(),
        }
    }

    /// Title of the start screen.
    pub const fn title(self) -> &'static str {
        match self {
            Self::LinearForward => "Forward Linear Motion",
            Self::LinearBackward => "Backward Linear Motion",
            Self::Rotation => "Rotation Motion",
            Self::TriangleCompletion => "Triangle Completion",
        }
    }

    /// Title shown above "Condition i/N".
    pub const fn condition_title(self) -> &'static str {
        match self {
            Self::Rotation => "Rotational Motion",
            other => other.title(),
        }
    }

    pub const fn menu_label(self) -> &'static str {
        match self {
            Self::LinearForward => "Linear Forward Control",
            Self::LinearBackward => "Linear Backward Control",
            Self::Rotation => "Rotation Control",
            Self::TriangleCompletion => "Triangle Completion Experiment",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.response_stem())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "linear_forward" | "forward" => Ok(Self::LinearForward),
            "linear_backward" | "backward" => Ok(Self::LinearBackward),
            "rotation" => Ok(Self::Rotation),
            "triangle" | "triangle_completion" => Ok(Self::TriangleCompletion),
            other => Err(format!(
                "unknown task `{other}` (expected linear-forward, linear-backward, rotation or triangle)"
            )),
        }
    }
}

/// Phase a trial engine is in after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrialPhase {
    #[default]
    Initialize,
    Setup,
    BeforeMotion,
    WaitForStart,
    WaitForBackwardTarget,
    WaitForButtonPress,
    WaitToMove,
    MovingBackward,
    WaitToRotate,
    WaitToTurn,
    Turn,
    Wait,
    MoveForward,
    LegTwo,
    TurnBack,
    AdjustTarget,
    PlaceTarget,
    Done,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TaskAction {
    Scene(SceneCommand),
    /// Open a head-tracking window for the current trial.
    StartTrace,
    /// Close the window and write it to this path.
    SaveTrace(PathBuf),
    SaveResponses(LogFile),
    /// The participant confirmed the final screen.
    Terminate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaskOutput {
    pub actions: Vec<TaskAction>,
    pub phase: TrialPhase,
    pub observer: Pose,
    pub cond: usize,
}

impl TaskOutput {
    pub fn terminated(&self) -> bool {
        self.actions.contains(&TaskAction::Terminate)
    }

    pub fn scene_commands(&self) -> impl Iterator<Item = &SceneCommand> {
        self.actions.iter().filter_map(|action| match action {
            TaskAction::Scene(command) => Some(command),
            _ => None,
        })
    }

    pub fn saved_responses(&self) -> Option<&LogFile> {
        self.actions.iter().find_map(|action| match action {
            TaskAction::SaveResponses(file) => Some(file),
            _ => None,
        })
    }
}

/// Everything a task needs from the session besides its condition table.
#[derive(Clone, Debug)]
pub struct TaskSetup {
    pub output_dir: PathBuf,
    /// Session start, epoch milliseconds; part of every file name.
    pub session_stamp_ms: i64,
    pub rng: StdRng,
}

#[derive(Clone, Copy, Debug)]
struct TickFrame {
    now_ms: u64,
    input: InputSnapshot,
}

impl TickFrame {
    #[inline]
    fn elapsed_s(&self, since_ms: u64) -> f64 {
        ms_to_s(self.now_ms.saturating_sub(since_ms))
    }

    /// True once the fixed inter-phase pause has passed since `since_ms`.
    #[inline]
    fn waited(&self, since_ms: u64) -> bool {
        self.now_ms.saturating_sub(since_ms) >= WAIT_TIME_MS
    }
}

#[derive(Default)]
struct DispatchContext {
    actions: Vec<TaskAction>,
}

impl DispatchContext {
    fn scene(&mut self, command: SceneCommand) {
        self.actions.push(TaskAction::Scene(command));
    }
}

#[inline]
fn ms_to_s(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

const START_PROMPT: &str = "Press trigger to start";
const QUIT_PROMPT: &str = "Press trigger to quit";

/// Bookkeeping shared by every trial engine: condition cursor, observer pose,
/// output paths and the standard dialog screens.
struct TrialRun<C> {
    kind: TaskKind,
    setup: TaskSetup,
    conditions: ConditionSet<C>,
    cond: usize,
    observer: Pose,
    phase: TrialPhase,
}

impl<C: Copy> TrialRun<C> {
    fn new(kind: TaskKind, setup: TaskSetup, conditions: ConditionSet<C>) -> Self {
        Self {
            kind,
            setup,
            conditions,
            cond: 0,
            observer: Pose::ORIGIN,
            phase: TrialPhase::Initialize,
        }
    }

    fn current(&self) -> Option<C> {
        self.conditions.get(self.cond)
    }

    fn dialog(context: &mut DispatchContext, title: &str, choice: &str, instructions: &str) {
        context.scene(SceneCommand::DialogTitle(title.to_owned()));
        context.scene(SceneCommand::DialogChoice(choice.to_owned()));
        context.scene(SceneCommand::DialogInstructions(instructions.to_owned()));
        context.scene(SceneCommand::show(Entity::Dialog));
    }

    fn show_intro(&self, context: &mut DispatchContext) {
        context.scene(SceneCommand::DialogBackground(DialogBackground::Instruction));
        Self::dialog(context, self.kind.title(), "", START_PROMPT);
    }

    fn begin(&mut self, context: &mut DispatchContext) {
        context.scene(SceneCommand::DialogBackground(DialogBackground::Default));
        self.cond = 0;
        log::info!(
            "{} started with {} conditions",
            self.kind,
            self.conditions.len()
        );
    }

    /// Resets the observer and puts up the "Condition i/N" screen.
    fn announce(&mut self, context: &mut DispatchContext, axis: Axis) {
        log::debug!("{} condition {}", self.kind, self.cond);
        context.scene(SceneCommand::FieldLayout(axis));
        self.set_observer(context, Pose::ORIGIN);
        let label = format!("Condition {}/{}", self.cond + 1, self.conditions.len());
        Self::dialog(context, self.kind.condition_title(), &label, START_PROMPT);
        context.actions.push(TaskAction::StartTrace);
    }

    fn set_observer(&mut self, context: &mut DispatchContext, pose: Pose) {
        self.observer = pose;
        context.scene(SceneCommand::pose(Entity::Observer, pose));
    }

    /// Closes the trial: saves its trace, returns the observer to the origin
    /// and advances the cursor. Returns true when another condition follows.
    fn finish_trial(&mut self, context: &mut DispatchContext) -> bool {
        context
            .actions
            .push(TaskAction::SaveTrace(self.trace_path(self.cond)));
        self.set_observer(context, Pose::ORIGIN);
        if self.cond + 1 < self.conditions.len() {
            self.cond += 1;
            true
        } else {
            false
        }
    }

    fn complete(&mut self, context: &mut DispatchContext, responses: LogFile) {
        log::info!(
            "{} complete, {} response lines",
            self.kind,
            responses.lines.len().saturating_sub(1)
        );
        context.actions.push(TaskAction::SaveResponses(responses));
        Self::dialog(context, "Completed", "", QUIT_PROMPT);
    }

    fn response_path(&self) -> PathBuf {
        self.setup.output_dir.join(format!(
            "Responses_{}_{}.txt",
            self.kind.response_stem(),
            self.setup.session_stamp_ms
        ))
    }

    fn trace_path(&self, cond: usize) -> PathBuf {
        self.setup.output_dir.join(format!(
            "HeadTracking_{}_{}_{}.txt",
            self.kind.trace_stem(),
            self.setup.session_stamp_ms,
            cond
        ))
    }

    fn output(&self, context: DispatchContext) -> TaskOutput {
        TaskOutput {
            actions: context.actions,
            phase: self.phase,
            observer: self.observer,
            cond: self.cond,
        }
    }
}

#[cfg(test)]
mod tests;
