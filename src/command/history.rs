use std::rc::Rc;

use super::{Command, CommandError, HistoryError};
use crate::document::Document;
use crate::event::{EditorEvent, EventBus};

/// Label of the timeline entry that stands for the loaded state
pub const ORIGINAL_STATE_LABEL: &str = "--- Original Loaded Data ---";

/// Linear, truncating undo/redo log.
///
/// The cursor is exposed as `current_index`: `-1` is the loaded state and
/// `len() - 1` means everything is applied. Recording a command while some
/// commands are undone throws those undone commands away.
pub struct CommandHistory {
    commands: Vec<Command>,
    /// Number of commands currently applied; `current_index + 1`
    applied: usize,
    event_bus: Rc<EventBus>,
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("len", &self.commands.len())
            .field("current_index", &self.current_index())
            .finish()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the history timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub label: String,
    /// The `jump_to` target that reaches this entry
    pub target: isize,
    pub is_current: bool,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::with_event_bus(Rc::new(EventBus::new()))
    }

    /// Creates an empty history announcing its changes on `event_bus`
    pub fn with_event_bus(event_bus: Rc<EventBus>) -> Self {
        Self {
            commands: Vec::new(),
            applied: 0,
            event_bus,
        }
    }

    /// Append an already-applied command, pruning any undone commands first
    pub fn record(&mut self, command: Command) {
        let pruned = self.commands.len() - self.applied;
        if pruned > 0 {
            log::debug!("Discarding {} undone command(s)", pruned);
        }
        self.commands.truncate(self.applied);
        log::debug!("Recording {}", command);
        self.commands.push(command);
        self.applied = self.commands.len();
        self.notify();
    }

    /// Undo the most recently applied command.
    ///
    /// Returns `Ok(false)` when already at the loaded state. If replay fails
    /// the cursor does not move.
    pub fn undo(&mut self, document: &mut Document) -> Result<bool, CommandError> {
        if !self.can_undo() {
            return Ok(false);
        }
        let command = &self.commands[self.applied - 1];
        log::debug!("Undo {}", command);
        command.undo(document)?;
        self.applied -= 1;
        self.notify();
        Ok(true)
    }

    /// Re-apply the next undone command.
    ///
    /// Returns `Ok(false)` when nothing is left to redo.
    pub fn redo(&mut self, document: &mut Document) -> Result<bool, CommandError> {
        if !self.can_redo() {
            return Ok(false);
        }
        let command = &self.commands[self.applied];
        log::debug!("Redo {}", command);
        command.redo(document)?;
        self.applied += 1;
        self.notify();
        Ok(true)
    }

    /// Undo or redo step by step until `current_index == target`.
    ///
    /// Targets outside `-1..=len()-1` are rejected before anything is
    /// replayed. Returns the number of steps taken.
    pub fn jump_to(&mut self, target: isize, document: &mut Document) -> Result<usize, HistoryError> {
        let max = self.commands.len() as isize - 1;
        if target < -1 || target > max {
            return Err(HistoryError::TargetOutOfRange { target, min: -1, max });
        }
        let mut steps = 0;
        while self.current_index() > target {
            self.undo(document)?;
            steps += 1;
        }
        while self.current_index() < target {
            self.redo(document)?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.applied = 0;
        self.notify();
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        self.applied < self.commands.len()
    }

    pub fn current_index(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The loaded state followed by one numbered entry per command
    pub fn timeline(&self, document: &Document) -> Vec<TimelineEntry> {
        let current = self.current_index();
        let original = TimelineEntry {
            label: ORIGINAL_STATE_LABEL.to_string(),
            target: -1,
            is_current: current == -1,
        };
        std::iter::once(original)
            .chain(self.commands.iter().enumerate().map(|(i, command)| TimelineEntry {
                label: format!("{:03}: {}", i + 1, command.describe(document)),
                target: i as isize,
                is_current: current == i as isize,
            }))
            .collect()
    }

    fn notify(&self) {
        self.event_bus.emit(EditorEvent::HistoryChanged {
            len: self.commands.len(),
            current_index: self.current_index(),
        });
    }
}
