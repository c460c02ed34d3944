use std::collections::VecDeque;

use cb_06_dedup_engine::InputState;

use crate::ports::InputSource;

/// Plays back a fixed sequence of input states, then holds the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<InputState>,
    current: InputState,
}

impl ScriptedInput {
    /// Nothing pressed, switch off, forever.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn new(script: impl IntoIterator<Item = InputState>) -> Self {
        Self {
            script: script.into_iter().collect(),
            current: InputState::default(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputState {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        self.current
    }
}
