//! Experiment selection menu.
//!
//! Top screen picks a family (or quits), the control family has its own
//! screen, and every selection goes through a confirm screen whose `Back`
//! returns to the screen it came from.

use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::{
    dialog::ChoiceDialog,
    input::InputSnapshot,
    scene::{DialogBackground, Entity, SceneCommand},
    tasks::TaskKind,
};

const TOP_TITLE: &str = "Choose Experiment";
const TOP_CHOICES: [&str; 3] = [
    "Control Experiments",
    "Triangle Completion Experiment",
    "Quit Homebase",
];
const SUB_TITLE: &str = "Choose Control";
const SUB_TASKS: [TaskKind; 3] = [
    TaskKind::LinearForward,
    TaskKind::LinearBackward,
    TaskKind::Rotation,
];
const CONFIRM_TITLE: &str = "Confirm Choice";
const BACK: &str = "Back";
const INSTRUCTIONS: &str = "Move stick to choose, press trigger to select";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuSelection {
    #[default]
    Waiting,
    Start(TaskKind),
    Quit,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuOutput {
    pub actions: Vec<SceneCommand>,
    pub selection: MenuSelection,
    /// A stick edge moved the selection; the caller resets its input.
    pub input_consumed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuScreen {
    #[default]
    Initialize,
    TopChoice,
    SubChoice,
    ConfirmChoice,
    Done,
}

pub struct MenuEngine {
    machine: statig::blocking::StateMachine<MenuHsm>,
}

impl Default for MenuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuEngine {
    pub fn new() -> Self {
        Self {
            machine: MenuHsm::default().state_machine(),
        }
    }

    pub fn tick(&mut self, input: InputSnapshot) -> MenuOutput {
        let mut context = MenuOutput::default();
        self.machine.handle_with_context(&input, &mut context);
        context
    }

    pub fn screen(&self) -> MenuScreen {
        self.machine.inner().screen
    }
}

fn confirm_label(kind: TaskKind) -> String {
    match kind {
        TaskKind::TriangleCompletion => format!("Do '{}'", kind.menu_label()),
        other => format!("Do {} Experiment", other.menu_label()),
    }
}

#[derive(Default)]
struct MenuHsm {
    dialog: ChoiceDialog,
    screen: MenuScreen,
    pending: Option<TaskKind>,
    confirm_from_sub: bool,
}

impl MenuHsm {
    fn enter(&mut self, screen: MenuScreen, state: State) -> Outcome<State> {
        log::debug!("menu -> {screen:?}");
        self.screen = screen;
        Transition(state)
    }

    fn show<I, S>(&mut self, context: &mut MenuOutput, title: &str, choices: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commands = self.dialog.set_elements(title, choices);
        context.actions.extend(commands);
    }

    /// Runs the dialog for this tick and returns the latched choice, if any.
    fn poll(&mut self, context: &mut MenuOutput, input: &InputSnapshot) -> Option<usize> {
        context.input_consumed |= self.dialog.update(input, &mut context.actions);
        self.dialog.response()
    }

    fn to_top(&mut self, context: &mut MenuOutput) -> Outcome<State> {
        self.show(context, TOP_TITLE, TOP_CHOICES);
        self.enter(MenuScreen::TopChoice, State::top_choice())
    }

    fn to_sub(&mut self, context: &mut MenuOutput) -> Outcome<State> {
        let choices = SUB_TASKS
            .iter()
            .map(|kind| kind.menu_label())
            .chain([BACK]);
        self.show(context, SUB_TITLE, choices);
        self.enter(MenuScreen::SubChoice, State::sub_choice())
    }

    fn to_confirm(
        &mut self,
        context: &mut MenuOutput,
        kind: TaskKind,
        from_sub: bool,
    ) -> Outcome<State> {
        self.pending = Some(kind);
        self.confirm_from_sub = from_sub;
        self.show(context, CONFIRM_TITLE, [confirm_label(kind), BACK.to_owned()]);
        self.enter(MenuScreen::ConfirmChoice, State::confirm_choice())
    }
}

#[state_machine(initial = "State::initialize()")]
impl MenuHsm {
    #[state]
    fn initialize(&mut self, context: &mut MenuOutput, event: &InputSnapshot) -> Outcome<State> {
        let _ = event;
        context
            .actions
            .push(SceneCommand::DialogBackground(DialogBackground::Default));
        let instructions = self.dialog.set_instructions(INSTRUCTIONS);
        context.actions.push(instructions);
        context.actions.push(SceneCommand::show(Entity::Dialog));
        self.to_top(context)
    }

    #[state]
    fn top_choice(&mut self, context: &mut MenuOutput, event: &InputSnapshot) -> Outcome<State> {
        match self.poll(context, event) {
            None => Handled,
            Some(0) => self.to_sub(context),
            Some(1) => self.to_confirm(context, TaskKind::TriangleCompletion, false),
            Some(_) => {
                log::info!("quit selected");
                context.selection = MenuSelection::Quit;
                context.actions.push(SceneCommand::hide(Entity::Dialog));
                self.enter(MenuScreen::Done, State::done())
            }
        }
    }

    #[state]
    fn sub_choice(&mut self, context: &mut MenuOutput, event: &InputSnapshot) -> Outcome<State> {
        match self.poll(context, event) {
            None => Handled,
            Some(i) => match SUB_TASKS.get(i) {
                Some(&kind) => self.to_confirm(context, kind, true),
                None => self.to_top(context),
            },
        }
    }

    #[state]
    fn confirm_choice(
        &mut self,
        context: &mut MenuOutput,
        event: &InputSnapshot,
    ) -> Outcome<State> {
        match (self.poll(context, event), self.pending) {
            (None, _) => Handled,
            (Some(0), Some(kind)) => {
                log::info!("starting {kind}");
                context.selection = MenuSelection::Start(kind);
                context.actions.push(SceneCommand::hide(Entity::Dialog));
                self.enter(MenuScreen::Done, State::done())
            }
            _ if self.confirm_from_sub => self.to_sub(context),
            _ => self.to_top(context),
        }
    }

    #[state]
    fn done(&mut self, context: &mut MenuOutput, event: &InputSnapshot) -> Outcome<State> {
        let _ = (context, event);
        Handled
    }
}
