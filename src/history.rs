use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::signals::{SignalBus, SignalKind, SignalPayload};
use std::time::{Duration, Instant};
use uuid::Uuid;

/*
 * Undo/redo stacks over boxed commands. Each executed command gets a
 * monotonically increasing state id; rapid repeats of the same updatable
 * command on the same attribute coalesce into one entry so a slider drag
 * is a single undo step.
 */

const COALESCE_WINDOW: Duration = Duration::from_millis(500);

/// Snapshot of what the undo/redo UI needs to enable its buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

struct HistoryEntry {
    id: u64,
    cmd: Box<dyn Command>,
}

pub struct History {
    undos: Vec<HistoryEntry>,
    redos: Vec<HistoryEntry>,
    last_cmd_time: Option<Instant>,
    id_counter: u64,
}

impl History {
    pub fn new() -> Self {
        Self {
            undos: Vec::new(),
            redos: Vec::new(),
            last_cmd_time: None,
            id_counter: 0,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undos.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undos.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redos.len()
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// State id of the most recent executed command; 0 is the state
    /// before any command ran.
    pub fn current_state_id(&self) -> u64 {
        self.undos.last().map_or(0, |e| e.id)
    }

    /// Validate and run a command, pushing it onto the undo stack (or
    /// folding it into the previous entry when coalescable). Returns the
    /// touched UUIDs. On a validation error nothing changes.
    pub fn execute(
        &mut self,
        cmd: Box<dyn Command>,
        scene: &mut SceneGraph,
        signals: &SignalBus,
    ) -> Result<Vec<Uuid>, EditorError> {
        cmd.validate(scene)?;
        let now = Instant::now();
        let in_window = self
            .last_cmd_time
            .is_some_and(|t| now.duration_since(t) < COALESCE_WINDOW);

        let mut entry = match self.undos.pop() {
            Some(mut last) if in_window && coalescable(&*last.cmd, &*cmd) => {
                last.cmd.absorb(cmd);
                last
            }
            other => {
                if let Some(last) = other {
                    self.undos.push(last);
                }
                self.id_counter += 1;
                HistoryEntry {
                    id: self.id_counter,
                    cmd,
                }
            }
        };

        entry.cmd.execute(scene);
        self.last_cmd_time = Some(now);
        let touched = entry.cmd.touched();
        let emitted = entry.cmd.signals_after_execute();
        self.undos.push(entry);
        self.redos.clear();

        for (kind, payload) in emitted {
            signals.publish(kind, payload);
        }
        signals.publish(SignalKind::HistoryChanged, SignalPayload::None);
        Ok(touched)
    }

    /// Revert the most recent command. No-op when the undo stack is
    /// empty. Returns the touched UUIDs.
    pub fn undo(&mut self, scene: &mut SceneGraph, signals: &SignalBus) -> Option<Vec<Uuid>> {
        let mut entry = self.undos.pop()?;
        entry.cmd.revert(scene);
        let touched = entry.cmd.touched();
        let emitted = entry.cmd.signals_after_revert();
        self.redos.push(entry);

        for (kind, payload) in emitted {
            signals.publish(kind, payload);
        }
        signals.publish(SignalKind::HistoryChanged, SignalPayload::None);
        Some(touched)
    }

    /// Re-run the most recently undone command. No-op when the redo
    /// stack is empty.
    pub fn redo(&mut self, scene: &mut SceneGraph, signals: &SignalBus) -> Option<Vec<Uuid>> {
        let mut entry = self.redos.pop()?;
        entry.cmd.execute(scene);
        let touched = entry.cmd.touched();
        let emitted = entry.cmd.signals_after_execute();
        self.undos.push(entry);

        for (kind, payload) in emitted {
            signals.publish(kind, payload);
        }
        signals.publish(SignalKind::HistoryChanged, SignalPayload::None);
        Some(touched)
    }

    /// Drop both stacks and restart state ids from zero.
    pub fn clear(&mut self, signals: &SignalBus) {
        self.undos.clear();
        self.redos.clear();
        self.id_counter = 0;
        self.last_cmd_time = None;
        signals.publish(SignalKind::HistoryChanged, SignalPayload::None);
    }

    /// Walk the stacks until the scene is at state `id`, replaying or
    /// reverting as needed. Per-step scene graph and history signals are
    /// suppressed; one of each fires when the walk completes.
    pub fn go_to_state(
        &mut self,
        id: u64,
        scene: &mut SceneGraph,
        signals: &SignalBus,
    ) -> Vec<Uuid> {
        let mut touched = Vec::new();
        {
            let _scene_quiet = signals.suppress(SignalKind::SceneGraphChanged);
            let _history_quiet = signals.suppress(SignalKind::HistoryChanged);
            loop {
                let current = self.current_state_id();
                let step = if current > id {
                    self.undo(scene, signals)
                } else if self.redos.last().is_some_and(|e| e.id <= id) {
                    self.redo(scene, signals)
                } else {
                    None
                };
                match step {
                    Some(t) => touched.extend(t),
                    None => break,
                }
            }
        }
        signals.publish(SignalKind::SceneGraphChanged, SignalPayload::None);
        signals.publish(SignalKind::HistoryChanged, SignalPayload::None);
        touched
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn coalescable(last: &dyn Command, next: &dyn Command) -> bool {
    last.is_updatable()
        && next.is_updatable()
        && last.kind_name() == next.kind_name()
        && last.target() == next.target()
        && last.target().is_some()
        && last.attribute_name() == next.attribute_name()
}
