use crate::error::EditorError;
use crate::scene::serde_utils::dvec3_serializer;
use crate::scene::transform::Transform;
use crate::zone::algebra::Operation;
use glam::f64::DVec3;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) fn check_dimension(dim: f64) -> Result<(), EditorError> {
    if !dim.is_finite() || dim < 0.0 {
        return Err(EditorError::InvalidGeometry {
            reason: format!("dimension {dim} is not a non-negative finite number"),
        });
    }
    Ok(())
}

/// Shape parameters of a primitive solid. The shape kind is fixed at
/// creation; only the dimensions are mutable (through SetGeometryCommand).
///
/// The hollow cylinder is folded into `Cylinder` via `inner_radius`;
/// `inner_radius == 0` is a full cylinder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "geometryType")]
pub enum PrimitiveShape {
    #[serde(rename = "BoxGeometry", rename_all = "camelCase")]
    Box { width: f64, height: f64, depth: f64 },
    #[serde(rename = "HollowCylinderGeometry", rename_all = "camelCase")]
    Cylinder {
        radius: f64,
        inner_radius: f64,
        depth: f64,
    },
    #[serde(rename = "SphereGeometry", rename_all = "camelCase")]
    Sphere { radius: f64 },
}

impl PrimitiveShape {
    pub fn validate(&self) -> Result<(), EditorError> {
        match *self {
            PrimitiveShape::Box {
                width,
                height,
                depth,
            } => {
                check_dimension(width)?;
                check_dimension(height)?;
                check_dimension(depth)?;
            }
            PrimitiveShape::Cylinder {
                radius,
                inner_radius,
                depth,
            } => {
                check_dimension(radius)?;
                check_dimension(inner_radius)?;
                check_dimension(depth)?;
                if inner_radius > radius {
                    return Err(EditorError::InvalidGeometry {
                        reason: format!(
                            "inner radius {inner_radius} exceeds outer radius {radius}"
                        ),
                    });
                }
            }
            PrimitiveShape::Sphere { radius } => check_dimension(radius)?,
        }
        Ok(())
    }

    /// A zero-extent shape yields an empty mesh, not an error.
    pub fn is_degenerate(&self) -> bool {
        match self {
            PrimitiveShape::Box {
                width,
                height,
                depth,
            } => *width == 0.0 || *height == 0.0 || *depth == 0.0,
            PrimitiveShape::Cylinder {
                radius,
                inner_radius,
                depth,
            } => *depth == 0.0 || *radius == 0.0 || inner_radius >= radius,
            PrimitiveShape::Sphere { radius } => *radius == 0.0,
        }
    }

    /// Half extents of the axis-aligned box enclosing the shape in its
    /// local frame (shape centered at the origin, cylinder axis along z).
    pub fn local_half_extents(&self) -> DVec3 {
        match self {
            PrimitiveShape::Box {
                width,
                height,
                depth,
            } => DVec3::new(width / 2.0, height / 2.0, depth / 2.0),
            PrimitiveShape::Cylinder { radius, depth, .. } => {
                DVec3::new(*radius, *radius, depth / 2.0)
            }
            PrimitiveShape::Sphere { radius } => DVec3::splat(*radius),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveData {
    pub shape: PrimitiveShape,
}

/// A simulation zone: an ordered boolean composition of primitive solids.
///
/// `rows` is a sequence of algebra rows; each row is evaluated left to
/// right into an accumulator, and row results are unioned together. The
/// first operation of a non-empty row is always a union (implicit in the
/// UI, normalized on write here).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneData {
    #[serde(rename = "unionOperations")]
    pub rows: Vec<Vec<Operation>>,
    #[serde(default)]
    pub material_name: String,
}

impl ZoneData {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            material_name: String::new(),
        }
    }

    pub fn with_rows(rows: Vec<Vec<Operation>>) -> Self {
        Self {
            rows,
            material_name: String::new(),
        }
    }

    /// The set of primitive UUIDs this zone's algebra depends on.
    pub fn referenced_uuids(&self) -> FxHashSet<Uuid> {
        self.rows
            .iter()
            .flatten()
            .map(|op| op.object_id)
            .collect()
    }

    pub fn references(&self, uuid: Uuid) -> bool {
        self.rows
            .iter()
            .flatten()
            .any(|op| op.object_id == uuid)
    }

    /// Remove every operation referencing one of `removed`. The first
    /// surviving operation of each row is renormalized to a union. Empty
    /// rows are kept; they contribute nothing to the evaluation.
    pub fn prune(&mut self, removed: &FxHashSet<Uuid>) {
        for row in &mut self.rows {
            row.retain(|op| !removed.contains(&op.object_id));
            if let Some(first) = row.first_mut() {
                first.operation = crate::zone::algebra::Operator::Union;
            }
        }
    }
}

impl Default for ZoneData {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "geometryType")]
pub enum WorldZoneGeometry {
    #[serde(rename = "BoxGeometry", rename_all = "camelCase")]
    Box { width: f64, height: f64, depth: f64 },
    #[serde(rename = "HollowCylinderGeometry", rename_all = "camelCase")]
    Cylinder { radius: f64, depth: f64 },
    #[serde(rename = "SphereGeometry", rename_all = "camelCase")]
    Sphere { radius: f64 },
}

/// The outermost zone bounding the whole simulation space. In automatic
/// mode its dimensions are fitted around the primitives in the scene
/// rather than set by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldZoneData {
    pub geometry: WorldZoneGeometry,
    pub auto_calculate: bool,
    pub margin_multiplier: f64,
}

impl WorldZoneData {
    pub fn new() -> Self {
        Self {
            geometry: WorldZoneGeometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            auto_calculate: true,
            margin_multiplier: 1.1,
        }
    }
}

impl Default for WorldZoneData {
    fn default() -> Self {
        Self::new()
    }
}

/// A scoring detector; its grid volume reuses the primitive shape
/// parameters and it may be attached to a zone by UUID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorData {
    pub geometry: PrimitiveShape,
    #[serde(default)]
    pub zone_uuid: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeamData {
    #[serde(with = "dvec3_serializer")]
    pub direction: DVec3,
    /// Beam kinetic energy in MeV.
    pub energy: f64,
    pub particle: String,
}

impl BeamData {
    pub fn new() -> Self {
        Self {
            direction: DVec3::new(0.0, 0.0, 1.0),
            energy: 150.0,
            particle: "proton".to_string(),
        }
    }
}

impl Default for BeamData {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleRelation {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterEqual,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    pub keyword: String,
    pub relation: RuleRelation,
    pub value: f64,
}

/// A particle filter: a conjunction of rules over scored quantities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterData {
    pub rules: Vec<FilterRule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub name: String,
    pub keyword: String,
    #[serde(default)]
    pub filter_uuid: Option<Uuid>,
}

/// A scoring output: quantities scored on one detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputData {
    #[serde(default)]
    pub detector_uuid: Option<Uuid>,
    pub quantities: Vec<Quantity>,
}

/// Closed set of node variants. Every consumer matches exhaustively, so
/// adding a variant is a compile-time visible change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Group,
    Primitive(PrimitiveData),
    Zone(ZoneData),
    WorldZone(WorldZoneData),
    Detector(DetectorData),
    Beam(BeamData),
    Filter(FilterData),
    Output(OutputData),
}

impl NodeKind {
    pub fn kind_str(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Primitive(_) => "Primitive",
            NodeKind::Zone(_) => "Zone",
            NodeKind::WorldZone(_) => "WorldZone",
            NodeKind::Detector(_) => "Detector",
            NodeKind::Beam(_) => "Beam",
            NodeKind::Filter(_) => "Filter",
            NodeKind::Output(_) => "Output",
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, NodeKind::Primitive(_))
    }

    pub fn is_zone(&self) -> bool {
        matches!(self, NodeKind::Zone(_))
    }

    pub fn as_zone(&self) -> Option<&ZoneData> {
        match self {
            NodeKind::Zone(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_zone_mut(&mut self) -> Option<&mut ZoneData> {
        match self {
            NodeKind::Zone(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveData> {
        match self {
            NodeKind::Primitive(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub uuid: Uuid,
    pub name: String,
    /// Back-reference for traversal only; ownership is top-down through
    /// the scene graph arena.
    pub parent: Option<Uuid>,
    /// Ordered; order is user-visible in the outliner and preserved by
    /// undo/redo.
    pub children: Vec<Uuid>,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::identity(),
            kind,
        }
    }

    pub fn with_uuid(uuid: Uuid, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            uuid,
            ..Self::new(name, kind)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn new_primitive(name: impl Into<String>, shape: PrimitiveShape) -> Self {
        Self::new(name, NodeKind::Primitive(PrimitiveData { shape }))
    }

    pub fn new_zone(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Zone(ZoneData::new()))
    }

    pub fn new_group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }
}
