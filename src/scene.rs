//! What the host should show. The core never renders; it only emits commands.

use crate::kinematics::{Axis, Pose};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Camera rig carrying the head-mounted display.
    Observer,
    /// Operator-adjustable matching target.
    Reticle,
    FixationTarget,
    Dialog,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogBackground {
    Instruction,
    #[default]
    Default,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    SetPose { entity: Entity, pose: Pose },
    SetVisible { entity: Entity, visible: bool },
    DialogTitle(String),
    /// The single visible entry of the choice list.
    DialogChoice(String),
    DialogInstructions(String),
    DialogBackground(DialogBackground),
    /// Lay the optic-flow field out for a trial on this axis.
    FieldLayout(Axis),
}

impl SceneCommand {
    #[inline]
    pub const fn pose(entity: Entity, pose: Pose) -> Self {
        Self::SetPose { entity, pose }
    }

    #[inline]
    pub const fn show(entity: Entity) -> Self {
        Self::SetVisible {
            entity,
            visible: true,
        }
    }

    #[inline]
    pub const fn hide(entity: Entity) -> Self {
        Self::SetVisible {
            entity,
            visible: false,
        }
    }
}

pub trait SceneSink {
    fn apply(&mut self, command: &SceneCommand);
}

impl<S: SceneSink + ?Sized> SceneSink for &mut S {
    fn apply(&mut self, command: &SceneCommand) {
        (**self).apply(command);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntityState {
    pub pose: Pose,
    pub visible: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DialogState {
    pub title: String,
    pub choice: String,
    pub instructions: String,
    pub background: DialogBackground,
}

/// Latest value of every scene property, folded from the command stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneState {
    pub observer: EntityState,
    pub reticle: EntityState,
    pub fixation_target: EntityState,
    pub dialog: EntityState,
    pub dialog_text: DialogState,
    pub field_layout: Option<Axis>,
}

impl SceneState {
    pub fn entity(&self, entity: Entity) -> &EntityState {
        match entity {
            Entity::Observer => &self.observer,
            Entity::Reticle => &self.reticle,
            Entity::FixationTarget => &self.fixation_target,
            Entity::Dialog => &self.dialog,
        }
    }

    fn entity_mut(&mut self, entity: Entity) -> &mut EntityState {
        match entity {
            Entity::Observer => &mut self.observer,
            Entity::Reticle => &mut self.reticle,
            Entity::FixationTarget => &mut self.fixation_target,
            Entity::Dialog => &mut self.dialog,
        }
    }
}

impl SceneSink for SceneState {
    fn apply(&mut self, command: &SceneCommand) {
        match command {
            SceneCommand::SetPose { entity, pose } => self.entity_mut(*entity).pose = *pose,
            SceneCommand::SetVisible { entity, visible } => {
                self.entity_mut(*entity).visible = *visible;
            }
            SceneCommand::DialogTitle(text) => self.dialog_text.title.clone_from(text),
            SceneCommand::DialogChoice(text) => self.dialog_text.choice.clone_from(text),
            SceneCommand::DialogInstructions(text) => {
                self.dialog_text.instructions.clone_from(text);
            }
            SceneCommand::DialogBackground(background) => {
                self.dialog_text.background = *background;
            }
            SceneCommand::FieldLayout(axis) => self.field_layout = Some(*axis),
        }
    }
}

/// Keeps every command in arrival order and the folded state alongside.
#[derive(Clone, Debug, Default)]
pub struct SceneLog {
    pub commands: Vec<SceneCommand>,
    pub state: SceneState,
}

impl SceneLog {
    pub fn drain(&mut self) -> Vec<SceneCommand> {
        core::mem::take(&mut self.commands)
    }
}

impl SceneSink for SceneLog {
    fn apply(&mut self, command: &SceneCommand) {
        self.state.apply(command);
        self.commands.push(command.clone());
    }
}
