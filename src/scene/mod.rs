pub mod graph;
pub mod node;
pub mod serde_utils;
pub mod transform;

pub use graph::{DetachedSubtree, SceneGraph};
pub use node::{
    BeamData, DetectorData, FilterData, FilterRule, NodeKind, OutputData, PrimitiveData,
    PrimitiveShape, Quantity, RuleRelation, SceneNode, WorldZoneData, WorldZoneGeometry,
    ZoneData,
};
pub use transform::Transform;
