use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::signals::{SignalKind, SignalPayload};
use uuid::Uuid;

/// Move a node within its parent's children list.
#[derive(Debug)]
pub struct ChangeObjectOrderCommand {
    target: Uuid,
    new_index: usize,
    old_index: Option<usize>,
}

impl ChangeObjectOrderCommand {
    pub fn new(target: Uuid, new_index: usize) -> Self {
        Self {
            target,
            new_index,
            old_index: None,
        }
    }
}

impl Command for ChangeObjectOrderCommand {
    fn kind_name(&self) -> &'static str {
        "ChangeObjectOrder"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        let node = scene.require(self.target)?;
        if node.parent.is_none() {
            return Err(EditorError::NotRemovable { uuid: self.target });
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        if let Ok(old) = scene.reorder_child(self.target, self.new_index) {
            self.old_index.get_or_insert(old);
        }
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let Some(old) = self.old_index {
            let _ = scene.reorder_child(self.target, old);
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target]
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![(SignalKind::SceneGraphChanged, SignalPayload::None)]
    }
}

/// Reparent a node elsewhere in the tree. Moves that would make a node
/// its own ancestor are rejected up front.
#[derive(Debug)]
pub struct MoveObjectInTreeCommand {
    target: Uuid,
    new_parent: Uuid,
    index: Option<usize>,
    old_location: Option<(Uuid, usize)>,
}

impl MoveObjectInTreeCommand {
    pub fn new(target: Uuid, new_parent: Uuid, index: Option<usize>) -> Self {
        Self {
            target,
            new_parent,
            index,
            old_location: None,
        }
    }
}

impl Command for MoveObjectInTreeCommand {
    fn kind_name(&self) -> &'static str {
        "MoveObjectInTree"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        scene.require(self.target)?;
        scene.require(self.new_parent)?;
        if self.target == scene.root() {
            return Err(EditorError::NotRemovable { uuid: self.target });
        }
        if scene.is_descendant(self.new_parent, self.target) {
            return Err(EditorError::CycleDetected { uuid: self.target });
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        if let Ok(old) = scene.reparent(self.target, self.new_parent, self.index) {
            self.old_location.get_or_insert(old);
        }
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let Some((parent, index)) = self.old_location {
            let _ = scene.reparent(self.target, parent, Some(index));
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target, self.new_parent]
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![(SignalKind::SceneGraphChanged, SignalPayload::None)]
    }
}
