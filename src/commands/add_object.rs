use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::scene::node::{NodeKind, SceneNode};
use crate::signals::{SignalKind, SignalPayload};
use uuid::Uuid;

/// Insert a new node under `parent` at `index` (append when `None`).
#[derive(Debug)]
pub struct AddObjectCommand {
    template: SceneNode,
    parent: Uuid,
    index: Option<usize>,
}

impl AddObjectCommand {
    pub fn new(template: SceneNode, parent: Uuid, index: Option<usize>) -> Self {
        Self {
            template,
            parent,
            index,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.template.uuid
    }
}

impl Command for AddObjectCommand {
    fn kind_name(&self) -> &'static str {
        "AddObject"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        scene.require(self.parent)?;
        if scene.contains(self.template.uuid) {
            return Err(EditorError::DuplicateUuid {
                uuid: self.template.uuid,
            });
        }
        match &self.template.kind {
            NodeKind::Primitive(data) => data.shape.validate()?,
            NodeKind::Detector(data) => {
                data.geometry.validate()?;
                if let Some(zone) = data.zone_uuid {
                    if !scene.get(zone).is_some_and(|n| n.kind.is_zone()) {
                        return Err(EditorError::InvalidReference { uuid: zone });
                    }
                }
            }
            NodeKind::Zone(data) => {
                for uuid in data.referenced_uuids() {
                    if !scene.get(uuid).is_some_and(|n| n.kind.is_primitive()) {
                        return Err(EditorError::InvalidReference { uuid });
                    }
                }
            }
            NodeKind::WorldZone(_) => {
                if scene.world_zone().is_some() {
                    return Err(EditorError::InvalidGeometry {
                        reason: "the scene already has a world zone".to_string(),
                    });
                }
            }
            NodeKind::Output(data) => {
                if let Some(detector) = data.detector_uuid {
                    if !scene
                        .get(detector)
                        .is_some_and(|n| matches!(n.kind, NodeKind::Detector(_)))
                    {
                        return Err(EditorError::InvalidReference { uuid: detector });
                    }
                }
                for quantity in &data.quantities {
                    if let Some(filter) = quantity.filter_uuid {
                        if !scene
                            .get(filter)
                            .is_some_and(|n| matches!(n.kind, NodeKind::Filter(_)))
                        {
                            return Err(EditorError::InvalidReference { uuid: filter });
                        }
                    }
                }
            }
            NodeKind::Group | NodeKind::Beam(_) | NodeKind::Filter(_) => {}
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let _ = scene.insert(self.template.clone(), self.parent, self.index);
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        let _ = scene.detach(self.template.uuid);
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.template.uuid]
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        let payload = SignalPayload::Object(self.template.uuid);
        let mut signals = vec![(SignalKind::ObjectAdded, payload)];
        if self.template.kind.is_zone() {
            signals.push((SignalKind::ZoneAdded, payload));
        }
        signals.push((SignalKind::SceneGraphChanged, SignalPayload::None));
        signals
    }

    fn signals_after_revert(&self) -> Vec<(SignalKind, SignalPayload)> {
        let payload = SignalPayload::Object(self.template.uuid);
        let mut signals = vec![(SignalKind::ObjectRemoved, payload)];
        if self.template.kind.is_zone() {
            signals.push((SignalKind::ZoneRemoved, payload));
        }
        signals.push((SignalKind::SceneGraphChanged, SignalPayload::None));
        signals
    }
}
