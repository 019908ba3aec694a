use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::commands::as_any::AsAny;
use crate::scene::node::{check_dimension, NodeKind, PrimitiveShape, WorldZoneGeometry};
use crate::signals::{SignalKind, SignalPayload};
use std::mem::discriminant;
use uuid::Uuid;

/// Change the dimensions of a primitive or a detector grid. The shape
/// kind must stay the same; a box cannot become a sphere.
#[derive(Debug)]
pub struct SetGeometryCommand {
    target: Uuid,
    new_shape: PrimitiveShape,
    old_shape: Option<PrimitiveShape>,
}

impl SetGeometryCommand {
    pub fn new(target: Uuid, new_shape: PrimitiveShape) -> Self {
        Self {
            target,
            new_shape,
            old_shape: None,
        }
    }
}

fn shape_of(kind: &NodeKind) -> Option<&PrimitiveShape> {
    match kind {
        NodeKind::Primitive(data) => Some(&data.shape),
        NodeKind::Detector(data) => Some(&data.geometry),
        _ => None,
    }
}

fn shape_of_mut(kind: &mut NodeKind) -> Option<&mut PrimitiveShape> {
    match kind {
        NodeKind::Primitive(data) => Some(&mut data.shape),
        NodeKind::Detector(data) => Some(&mut data.geometry),
        _ => None,
    }
}

impl Command for SetGeometryCommand {
    fn kind_name(&self) -> &'static str {
        "SetGeometry"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        self.new_shape.validate()?;
        let node = scene.require(self.target)?;
        let Some(current) = shape_of(&node.kind) else {
            return Err(EditorError::InvalidGeometry {
                reason: format!(
                    "{} is a {} and carries no shape",
                    self.target,
                    node.kind.kind_str()
                ),
            });
        };
        if discriminant(current) != discriminant(&self.new_shape) {
            return Err(EditorError::InvalidGeometry {
                reason: "the shape kind of an object cannot change".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(shape) = scene.get_mut(self.target).and_then(|n| shape_of_mut(&mut n.kind))
        else {
            return;
        };
        self.old_shape.get_or_insert(*shape);
        *shape = self.new_shape;
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let (Some(node), Some(old)) = (scene.get_mut(self.target), self.old_shape) {
            if let Some(shape) = shape_of_mut(&mut node.kind) {
                *shape = old;
            }
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
        Some("geometry")
    }

    fn absorb(&mut self, newer: Box<dyn Command>) {
        if let Ok(newer) = newer.as_any_box().downcast::<SetGeometryCommand>() {
            self.new_shape = newer.new_shape;
        }
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        vec![
            (
                SignalKind::GeometryChanged,
                SignalPayload::Object(self.target),
            ),
            (SignalKind::SceneGraphChanged, SignalPayload::None),
        ]
    }
}

/// Change the world zone's bounding geometry by hand. Meaningful in
/// manual mode; in automatic mode the next refit overwrites it.
#[derive(Debug)]
pub struct SetWorldZoneGeometryCommand {
    target: Uuid,
    new_geometry: WorldZoneGeometry,
    old_geometry: Option<WorldZoneGeometry>,
}

impl SetWorldZoneGeometryCommand {
    pub fn new(target: Uuid, new_geometry: WorldZoneGeometry) -> Self {
        Self {
            target,
            new_geometry,
            old_geometry: None,
        }
    }
}

impl Command for SetWorldZoneGeometryCommand {
    fn kind_name(&self) -> &'static str {
        "SetWorldZoneGeometry"
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
        match self.new_geometry {
            WorldZoneGeometry::Box {
                width,
                height,
                depth,
            } => {
                check_dimension(width)?;
                check_dimension(height)?;
                check_dimension(depth)?;
            }
            WorldZoneGeometry::Cylinder { radius, depth } => {
                check_dimension(radius)?;
                check_dimension(depth)?;
            }
            WorldZoneGeometry::Sphere { radius } => check_dimension(radius)?,
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        let Some(NodeKind::WorldZone(data)) = scene.get_mut(self.target).map(|n| &mut n.kind)
        else {
            return;
        };
        self.old_geometry.get_or_insert(data.geometry);
        data.geometry = self.new_geometry;
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        if let Some(old) = self.old_geometry {
            if let Some(NodeKind::WorldZone(data)) =
                scene.get_mut(self.target).map(|n| &mut n.kind)
            {
                data.geometry = old;
            }
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
        Some("worldZoneGeometry")
    }

    fn absorb(&mut self, newer: Box<dyn Command>) {
        if let Ok(newer) = newer.as_any_box().downcast::<SetWorldZoneGeometryCommand>() {
            self.new_geometry = newer.new_geometry;
        }
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
