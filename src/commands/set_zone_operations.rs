use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::signals::{SignalKind, SignalPayload};
use crate::zone::algebra::{Operation, Operator};
use uuid::Uuid;

/// Replace a zone's boolean algebra wholesale. The first operation of
/// every non-empty row is normalized to a union on construction.
#[derive(Debug)]
pub struct SetZoneOperationsCommand {
    target: Uuid,
    new_rows: Vec<Vec<Operation>>,
    old_rows: Option<Vec<Vec<Operation>>>,
}

impl SetZoneOperationsCommand {
    pub fn new(target: Uuid, mut new_rows: Vec<Vec<Operation>>) -> Self {
        for row in &mut new_rows {
            if let Some(first) = row.first_mut() {
                first.operation = Operator::Union;
            }
        }
        Self {
            target,
            new_rows,
            old_rows: None,
        }
    }
}

impl Command for SetZoneOperationsCommand {
    fn kind_name(&self) -> &'static str {
        "SetZoneOperations"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        let node = scene.require(self.target)?;
        if node.kind.as_zone().is_none() {
            return Err(EditorError::InvalidGeometry {
                reason: format!(
                    "{} is a {}, not a zone",
                    self.target,
                    node.kind.kind_str()
                ),
            });
        }
        for op in self.new_rows.iter().flatten() {
            if !scene
                .get(op.object_id)
                .is_some_and(|n| n.kind.is_primitive())
            {
                return Err(EditorError::InvalidReference { uuid: op.object_id });
            }
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(zone) = scene.get_mut(self.target).and_then(|n| n.kind.as_zone_mut())
        else {
            return;
        };
        self.old_rows.get_or_insert_with(|| zone.rows.clone());
        zone.rows = self.new_rows.clone();
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let (Some(node), Some(old)) = (scene.get_mut(self.target), &self.old_rows) {
            if let Some(zone) = node.kind.as_zone_mut() {
                zone.rows = old.clone();
            }
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target]
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (
                SignalKind::ZoneGeometryChanged,
                SignalPayload::Object(self.target),
            ),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}
