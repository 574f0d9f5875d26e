//! Per-frame driver: owns the menu or the running task, feeds it debounced
//! input, and routes what it emits to the scene, the trace log and the writer.

use std::fs;

use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

use crate::{
    config::SessionConfig,
    error::{HomebaseError, Result},
    input::{InputSnapshot, RawControls, ResponseInput},
    kinematics::Pose,
    menu::{MenuEngine, MenuSelection},
    recording::{FileWriter, HeadTrackerLog, TraceSample, TrackedPose},
    scene::SceneSink,
    tasks::{
        LinearBackwardTask, LinearForwardTask, RotationTask, TaskAction, TaskKind, TaskOutput,
        TaskSetup, TriangleTask,
    },
};

/// What the host hands over every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostFrame {
    /// Monotonic host clock.
    pub now_ms: u64,
    pub controls: RawControls,
    /// Tracked head pose, recorded next to the rig pose while a trace is open.
    pub head: TrackedPose,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Terminated,
}

pub enum ActiveTask {
    Menu(MenuEngine),
    LinearForward(LinearForwardTask),
    LinearBackward(LinearBackwardTask),
    Rotation(RotationTask),
    Triangle(TriangleTask),
}

impl ActiveTask {
    pub fn kind(&self) -> Option<TaskKind> {
        match self {
            Self::Menu(_) => None,
            Self::LinearForward(_) => Some(TaskKind::LinearForward),
            Self::LinearBackward(_) => Some(TaskKind::LinearBackward),
            Self::Rotation(_) => Some(TaskKind::Rotation),
            Self::Triangle(_) => Some(TaskKind::TriangleCompletion),
        }
    }

    fn tick_task(&mut self, now_ms: u64, input: InputSnapshot) -> Option<TaskOutput> {
        match self {
            Self::Menu(_) => None,
            Self::LinearForward(task) => Some(task.tick(now_ms, input)),
            Self::LinearBackward(task) => Some(task.tick(now_ms, input)),
            Self::Rotation(task) => Some(task.tick(now_ms, input)),
            Self::Triangle(task) => Some(task.tick(now_ms, input)),
        }
    }
}

pub struct Session<S: SceneSink> {
    config: SessionConfig,
    scene: S,
    input: ResponseInput,
    active: ActiveTask,
    trace: HeadTrackerLog,
    writer: FileWriter,
    rng: StdRng,
    started_at_ms: i64,
    observer: Pose,
    status: SessionStatus,
}

impl<S: SceneSink> Session<S> {
    /// Fails when the config is invalid or the output directory cannot be
    /// created.
    pub fn new(config: SessionConfig, scene: S, started_at_ms: i64) -> Result<Self> {
        config.validate()?;
        let dir = &config.output_dir;
        fs::create_dir_all(dir).map_err(|e| HomebaseError::OutputDir {
            path: dir.clone(),
            reason: e.to_string(),
        })?;
        if !dir.is_dir() {
            return Err(HomebaseError::OutputDir {
                path: dir.clone(),
                reason: "not a directory".into(),
            });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::info!(
            "session {started_at_ms} writing to {} (seed {:?}, shuffle {:?})",
            dir.display(),
            config.seed,
            config.shuffle
        );

        Ok(Self {
            input: ResponseInput::new(config.stick_neutral_deadzone),
            writer: FileWriter::new(config.background_writes),
            config,
            scene,
            active: ActiveTask::Menu(MenuEngine::new()),
            trace: HeadTrackerLog::default(),
            rng,
            started_at_ms,
            observer: Pose::ORIGIN,
            status: SessionStatus::Running,
        })
    }

    pub fn tick(&mut self, frame: HostFrame) -> SessionStatus {
        if self.status == SessionStatus::Terminated {
            return self.status;
        }

        let input = self.input.update(frame.controls);
        match self.active.tick_task(frame.now_ms, input) {
            Some(output) => self.apply_task_output(output),
            None => self.tick_menu(input),
        }

        if self.trace.is_recording() {
            self.trace.record(&TraceSample {
                time_s: frame.now_ms as f64 / 1000.0,
                rig: self.observer.into(),
                head: frame.head,
            });
        }
        self.status
    }

    fn tick_menu(&mut self, input: InputSnapshot) {
        let ActiveTask::Menu(menu) = &mut self.active else {
            return;
        };
        let output = menu.tick(input);
        if output.input_consumed {
            self.input.reset();
        }
        for command in &output.actions {
            self.scene.apply(command);
        }

        match output.selection {
            MenuSelection::Waiting => {}
            MenuSelection::Start(kind) => self.start_task(kind),
            MenuSelection::Quit => self.terminate(),
        }
    }

    /// Replaces whatever is active with a fresh run of `kind`. The menu calls
    /// this on confirm; headless runs may call it before the first frame.
    pub fn start_task(&mut self, kind: TaskKind) {
        let setup = TaskSetup {
            output_dir: self.config.output_dir.clone(),
            session_stamp_ms: self.started_at_ms,
            rng: StdRng::seed_from_u64(self.rng.gen()),
        };
        let policy = self.config.shuffle;
        log::info!("activating {kind}");
        self.active = match kind {
            TaskKind::LinearForward => {
                ActiveTask::LinearForward(LinearForwardTask::new(setup, policy))
            }
            TaskKind::LinearBackward => {
                ActiveTask::LinearBackward(LinearBackwardTask::new(setup, policy))
            }
            TaskKind::Rotation => ActiveTask::Rotation(RotationTask::new(setup, policy)),
            TaskKind::TriangleCompletion => ActiveTask::Triangle(TriangleTask::new(
                setup,
                policy,
                self.config.triangle_variant,
            )),
        };
    }

    fn apply_task_output(&mut self, output: TaskOutput) {
        self.observer = output.observer;
        for action in output.actions {
            match action {
                TaskAction::Scene(command) => self.scene.apply(&command),
                TaskAction::StartTrace => {
                    if self.config.record_head_tracking {
                        self.trace.start_recording();
                    }
                }
                TaskAction::SaveTrace(path) => {
                    if self.trace.is_recording() {
                        let file = self.trace.stop_recording_and_save(path);
                        self.writer.persist(file);
                    }
                }
                TaskAction::SaveResponses(file) => self.writer.persist(file),
                TaskAction::Terminate => self.terminate(),
            }
        }
    }

    fn terminate(&mut self) {
        if self.status == SessionStatus::Running {
            log::info!("session {} terminated", self.started_at_ms);
            self.status = SessionStatus::Terminated;
        }
    }

    /// Blocks until queued writes are on disk.
    pub fn flush(&mut self) {
        self.writer.flush();
    }

    #[inline]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn active_kind(&self) -> Option<TaskKind> {
        self.active.kind()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn observer(&self) -> Pose {
        self.observer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
