use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeKind;
use crate::signals::{SignalKind, SignalPayload};
use uuid::Uuid;

/// Toggle the world zone between automatic fitting and manual sizing.
#[derive(Debug)]
pub struct SetAutoCalculateCommand {
    target: Uuid,
    new_value: bool,
    old_value: Option<bool>,
}

impl SetAutoCalculateCommand {
    pub fn new(target: Uuid, new_value: bool) -> Self {
        Self {
            target,
            new_value,
            old_value: None,
        }
    }
}

impl Command for SetAutoCalculateCommand {
    fn kind_name(&self) -> &'static str {
        "SetAutoCalculate"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        let node = scene.require(self.target)?;
        if !matches!(node.kind, NodeKind::WorldZone(_)) {
            return Err(EditorError::InvalidGeometry {
                reason: format!(
                    "{} is a {}, not the world zone",
                    self.target,
                    node.kind.kind_str()
                ),
            });
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(NodeKind::WorldZone(data)) = scene.get_mut(self.target).map(|n| &mut n.kind)
        else {
            return;
        };
        self.old_value.get_or_insert(data.auto_calculate);
        data.auto_calculate = self.new_value;
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let Some(old) = self.old_value {
            if let Some(NodeKind::WorldZone(data)) =
                scene.get_mut(self.target).map(|n| &mut n.kind)
            {
                data.auto_calculate = old;
            }
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        vec![self.target]
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (
                SignalKind::AutocalculateChanged,
                SignalPayload::Object(self.target),
            ),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}
