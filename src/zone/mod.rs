pub mod algebra;
pub mod engine;
pub mod world_zone;

pub use algebra::{Operation, Operator};
pub use engine::ZoneEngine;
pub use world_zone::fit_world_zone;
