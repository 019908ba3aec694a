use crate::commands::as_any::AsAny;
use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::signals::{SignalKind, SignalPayload};
use uuid::Uuid;

#[derive(Debug)]
pub struct SetNameCommand {
    target: Uuid,
    new_name: String,
    old_name: Option<String>,
}

impl SetNameCommand {
    pub fn new(target: Uuid, new_name: impl Into<String>) -> Self {
        Self {
            target,
            new_name: new_name.into(),
            old_name: None,
        }
    }
}

impl Command for SetNameCommand {
    fn kind_name(&self) -> &'static str {
        "SetName"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        scene.require(self.target).map(|_| ())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(node) = scene.get_mut(self.target) else {
            return;
        };
        self.old_name.get_or_insert_with(|| node.name.clone());
        node.name = self.new_name.clone();
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let (Some(node), Some(old)) = (scene.get_mut(self.target), &self.old_name) {
            node.name = old.clone();
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
        Some("name")
    }

    fn absorb(&mut self, newer: Box<dyn Command>) {
        if let Ok(newer) = newer.as_any_box().downcast::<SetNameCommand>() {
            self.new_name = newer.new_name;
        }
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (SignalKind::ObjectChanged, SignalPayload::Object(self.target)),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}
