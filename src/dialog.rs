//! Single-line choice dialog driven by the stick and trigger.

use crate::{input::InputSnapshot, scene::SceneCommand};

#[derive(Clone, Debug, Default)]
pub struct ChoiceDialog {
    choices: Vec<String>,
    current: usize,
    has_response: bool,
}

impl ChoiceDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces title and choices, selecting the first choice and clearing any
    /// pending response.
    pub fn set_elements<I, S>(&mut self, title: &str, choices: I) -> Vec<SceneCommand>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self.current = 0;
        self.has_response = false;
        vec![
            SceneCommand::DialogTitle(title.to_owned()),
            SceneCommand::DialogChoice(self.current_text().to_owned()),
        ]
    }

    pub fn set_instructions(&mut self, text: &str) -> SceneCommand {
        self.has_response = false;
        SceneCommand::DialogInstructions(text.to_owned())
    }

    /// Applies one tick of input. Returns true when a stick edge moved the
    /// selection; the caller must then reset the input so no other consumer
    /// sees the same edge.
    pub fn update(&mut self, input: &InputSnapshot, commands: &mut Vec<SceneCommand>) -> bool {
        if self.has_response || self.choices.is_empty() {
            return false;
        }

        let n = self.choices.len();
        let mut navigated = false;
        if input.increment {
            self.current = (self.current + n - 1) % n;
            navigated = true;
        }
        if input.decrement {
            self.current = (self.current + 1) % n;
            navigated = true;
        }
        if navigated {
            commands.push(SceneCommand::DialogChoice(self.current_text().to_owned()));
        }

        if input.confirm {
            log::debug!("dialog choice {} confirmed", self.current);
            self.has_response = true;
        }
        navigated
    }

    pub fn response(&self) -> Option<usize> {
        self.has_response.then_some(self.current)
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    fn current_text(&self) -> &str {
        self.choices.get(self.current).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests;
