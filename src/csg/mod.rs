pub mod csg_types;
pub mod csg_utils;
pub mod evaluator;
pub mod mesh_utils;

pub use csg_types::CsgMesh;
pub use evaluator::{apply_operator, primitive_mesh};
pub use mesh_utils::DerivedSolid;
