use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeKind;
use crate::signals::{SignalKind, SignalPayload};
use uuid::Uuid;

/// Attach a detector to a zone, or detach it with `None`.
#[derive(Debug)]
pub struct SetDetectorZoneCommand {
    target: Uuid,
    new_zone: Option<Uuid>,
    old_zone: Option<Option<Uuid>>,
}

impl SetDetectorZoneCommand {
    pub fn new(target: Uuid, new_zone: Option<Uuid>) -> Self {
        Self {
            target,
            new_zone,
            old_zone: None,
        }
    }
}

impl Command for SetDetectorZoneCommand {
    fn kind_name(&self) -> &'static str {
        "SetDetectorZone"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        let node = scene.require(self.target)?;
        if !matches!(node.kind, NodeKind::Detector(_)) {
            return Err(EditorError::InvalidGeometry {
                reason: format!(
                    "{} is a {}, not a detector",
                    self.target,
                    node.kind.kind_str()
                ),
            });
        }
        if let Some(zone) = self.new_zone {
            if !scene.get(zone).is_some_and(|n| n.kind.is_zone()) {
                return Err(EditorError::InvalidReference { uuid: zone });
            }
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(NodeKind::Detector(data)) = scene.get_mut(self.target).map(|n| &mut n.kind)
        else {
            return;
        };
        self.old_zone.get_or_insert(data.zone_uuid);
        data.zone_uuid = self.new_zone;
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let Some(old) = self.old_zone {
            if let Some(NodeKind::Detector(data)) =
                scene.get_mut(self.target).map(|n| &mut n.kind)
            {
                data.zone_uuid = old;
            }
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target]
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (SignalKind::ObjectChanged, SignalPayload::Object(self.target)),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}
