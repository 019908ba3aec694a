use crate::commands::as_any::AsAny;
use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::signals::{SignalKind, SignalPayload};
use glam::f64::DVec3;
use uuid::Uuid;

/*
 * Position and rotation setters. Both are updatable so that dragging a
 * gizmo collapses into a single history entry; the first execute captures
 * the pre-drag value and later absorbs only move the endpoint.
 */

#[derive(Debug)]
pub struct SetPositionCommand {
    target: Uuid,
    new_position: DVec3,
    old_position: Option<DVec3>,
}

impl SetPositionCommand {
    pub fn new(target: Uuid, new_position: DVec3) -> Self {
        Self {
            target,
            new_position,
            old_position: None,
        }
    }
}

impl Command for SetPositionCommand {
    fn kind_name(&self) -> &'static str {
        "SetPosition"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        if !self.new_position.is_finite() {
            return Err(EditorError::InvalidGeometry {
                reason: format!("position {} is not finite", self.new_position),
            });
        }
        scene.require(self.target).map(|_| ())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(node) = scene.get_mut(self.target) else {
            return;
        };
        self.old_position.get_or_insert(node.transform.position);
        node.transform.position = self.new_position;
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let (Some(node), Some(old)) = (scene.get_mut(self.target), self.old_position) {
            node.transform.position = old;
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target]
    }

    fn is_updatable(&self) -> bool {
        true
    }

    fn target(&self) -> Option<Uuid> {
        Some(self.target)
    }

    fn attribute_name(&self) -> Option<&'static str> {
        Some("position")
    }

    fn absorb(&mut self, newer: Box<dyn Command>) {
        if let Ok(newer) = newer.as_any_box().downcast::<SetPositionCommand>() {
            self.new_position = newer.new_position;
        }
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (SignalKind::ObjectChanged, SignalPayload::Object(self.target)),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}

/// Set a node's rotation, given as Euler angles in degrees.
#[derive(Debug)]
pub struct SetRotationCommand {
    target: Uuid,
    new_rotation: DVec3,
    old_rotation: Option<DVec3>,
}

impl SetRotationCommand {
    pub fn new(target: Uuid, new_rotation: DVec3) -> Self {
        Self {
            target,
            new_rotation,
            old_rotation: None,
        }
    }
}

impl Command for SetRotationCommand {
    fn kind_name(&self) -> &'static str {
        "SetRotation"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        if !self.new_rotation.is_finite() {
            return Err(EditorError::InvalidGeometry {
                reason: format!("rotation {} is not finite", self.new_rotation),
            });
        }
        scene.require(self.target).map(|_| ())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(node) = scene.get_mut(self.target) else {
            return;
        };
        self.old_rotation.get_or_insert(node.transform.rotation);
        node.transform.rotation = self.new_rotation;
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let (Some(node), Some(old)) = (scene.get_mut(self.target), self.old_rotation) {
            node.transform.rotation = old;
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target]
    }

    fn is_updatable(&self) -> bool {
        true
    }

    fn target(&self) -> Option<Uuid> {
        Some(self.target)
    }

    fn attribute_name(&self) -> Option<&'static str> {
        Some("rotation")
    }

    fn absorb(&mut self, newer: Box<dyn Command>) {
        if let Ok(newer) = newer.as_any_box().downcast::<SetRotationCommand>() {
            self.new_rotation = newer.new_rotation;
        }
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (SignalKind::ObjectChanged, SignalPayload::Object(self.target)),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}
