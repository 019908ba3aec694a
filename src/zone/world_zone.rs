use crate::scene::graph::SceneGraph;
use crate::scene::node::{NodeKind, WorldZoneData, WorldZoneGeometry};
use glam::f64::DVec3;

/// Fit the world zone around every primitive in the scene.
///
/// Returns the fitted geometry and its center, or `None` when the scene
/// has no primitives with extent. The fitted shape keeps the kind of the
/// current world zone geometry; only the dimensions are recomputed, with
/// each half extent scaled by `margin_multiplier`.
pub fn fit_world_zone(
    scene: &SceneGraph,
    data: &WorldZoneData,
) -> Option<(WorldZoneGeometry, DVec3)> {
    let mut min = DVec3::splat(f64::INFINITY);
    let mut max = DVec3::splat(f64::NEG_INFINITY);
    let mut any = false;

    for node in scene.iter() {
        let NodeKind::Primitive(primitive) = &node.kind else {
            continue;
        };
        if primitive.shape.is_degenerate() {
            continue;
        }
        let half = primitive.shape.local_half_extents();
        // World-space AABB of the rotated local box, corner by corner.
        for i in 0..8 {
            let corner = DVec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            let world = node.transform.apply_to_position(corner);
            min = min.min(world);
            max = max.max(world);
        }
        any = true;
    }

    if !any {
        return None;
    }

    let center = (min + max) / 2.0;
    let half = (max - min) / 2.0 * data.margin_multiplier;
    let geometry = match data.geometry {
        WorldZoneGeometry::Box { .. } => WorldZoneGeometry::Box {
            width: half.x * 2.0,
            height: half.y * 2.0,
            depth: half.z * 2.0,
        },
        WorldZoneGeometry::Cylinder { .. } => WorldZoneGeometry::Cylinder {
            radius: half.x.hypot(half.y),
            depth: half.z * 2.0,
        },
        WorldZoneGeometry::Sphere { .. } => WorldZoneGeometry::Sphere {
            radius: half.length(),
        },
    };
    Some((geometry, center))
}
