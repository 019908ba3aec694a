use glam::f64::DVec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde adapter storing a `DVec3` as a bare `[x, y, z]` array, for use
/// with `#[serde(with = "...")]` on vector fields.
pub mod dvec3_serializer {
    use super::*;

    pub fn serialize<S>(vec: &DVec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (vec.x, vec.y, vec.z).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DVec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (x, y, z) = <(f64, f64, f64)>::deserialize(deserializer)?;
        Ok(DVec3::new(x, y, z))
    }
}
