use crate::csg::csg_types::CsgMesh;
use crate::csg::evaluator::{apply_operator, primitive_mesh};
use crate::csg::mesh_utils::DerivedSolid;
use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeKind;
use csgrs::traits::CSG;
use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

/*
 * Incremental zone evaluation. Every zone's derived solid is cached; a
 * scene change marks a zone dirty only when the change touches the zone
 * itself or a primitive its algebra references. Recomputing a clean zone
 * hands back the cached handle unchanged.
 */

#[derive(Debug, Default)]
pub struct ZoneEngine {
    derived: FxHashMap<Uuid, DerivedSolid>,
    dirty: FxHashSet<Uuid>,
}

impl ZoneEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update dirtiness after a scene mutation. `touched` lists every
    /// UUID the mutation affected, including removed ones.
    pub fn on_scene_change(&mut self, scene: &SceneGraph, touched: &[Uuid]) {
        self.derived.retain(|uuid, _| scene.contains(*uuid));
        self.dirty.retain(|uuid| scene.contains(*uuid));

        for node in scene.iter() {
            let NodeKind::Zone(zone) = &node.kind else {
                continue;
            };
            if self.dirty.contains(&node.uuid) {
                continue;
            }
            let hit = touched.contains(&node.uuid)
                || touched.iter().any(|t| zone.references(*t));
            if hit {
                tracing::debug!(zone = %node.uuid, "zone marked dirty");
                self.dirty.insert(node.uuid);
            }
        }
    }

    /// Force every zone in the scene to recompute on next request, used
    /// after loading a project.
    pub fn mark_all_dirty(&mut self, scene: &SceneGraph) {
        self.derived.clear();
        self.dirty.clear();
        for node in scene.iter() {
            if node.kind.is_zone() {
                self.dirty.insert(node.uuid);
            }
        }
    }

    pub fn is_dirty(&self, zone_id: Uuid) -> bool {
        self.dirty.contains(&zone_id)
    }

    pub fn cached(&self, zone_id: Uuid) -> Option<&DerivedSolid> {
        self.derived.get(&zone_id)
    }

    /// Evaluate a zone's algebra, serving the cached solid when the zone
    /// is clean. Rows accumulate left to right from the empty solid and
    /// row results are unioned together.
    pub fn recompute(
        &mut self,
        scene: &SceneGraph,
        zone_id: Uuid,
    ) -> Result<DerivedSolid, EditorError> {
        let node = scene.require(zone_id)?;
        let zone = node.kind.as_zone().ok_or(EditorError::InvalidGeometry {
            reason: format!("{} is a {}, not a zone", zone_id, node.kind.kind_str()),
        })?;

        if !self.dirty.contains(&zone_id) {
            if let Some(cached) = self.derived.get(&zone_id) {
                return Ok(cached.clone());
            }
        }

        let mut result = CsgMesh::new();
        for row in &zone.rows {
            let mut acc = CsgMesh::new();
            for op in row {
                let operand = scene.require(op.object_id)?;
                let primitive =
                    operand
                        .kind
                        .as_primitive()
                        .ok_or(EditorError::InvalidGeometry {
                            reason: format!(
                                "zone operand {} is a {}, not a primitive",
                                op.object_id,
                                operand.kind.kind_str()
                            ),
                        })?;
                let mesh = primitive_mesh(&primitive.shape, &operand.transform);
                acc = apply_operator(acc, op.operation, &mesh);
            }
            result = result.union(&acc);
        }

        let solid = DerivedSolid::from_mesh(result);
        if solid.is_empty() {
            tracing::warn!(zone = %zone_id, "zone algebra produced an empty solid");
        }
        self.derived.insert(zone_id, solid.clone());
        self.dirty.remove(&zone_id);
        Ok(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::{PrimitiveShape, SceneNode, ZoneData};
    use crate::zone::algebra::Operation;

    fn scene_with_two_boxes() -> (SceneGraph, Uuid, Uuid) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let big = scene
            .insert(
                SceneNode::new_primitive(
                    "big",
                    PrimitiveShape::Box {
                        width: 10.0,
                        height: 10.0,
                        depth: 10.0,
                    },
                ),
                root,
                None,
            )
            .unwrap();
        let small = scene
            .insert(
                SceneNode::new_primitive(
                    "small",
                    PrimitiveShape::Box {
                        width: 5.0,
                        height: 5.0,
                        depth: 5.0,
                    },
                ),
                root,
                None,
            )
            .unwrap();
        (scene, big, small)
    }

    fn add_zone(scene: &mut SceneGraph, rows: Vec<Vec<Operation>>) -> Uuid {
        let root = scene.root();
        let mut node = SceneNode::new_zone("zone");
        node.kind = NodeKind::Zone(ZoneData::with_rows(rows));
        scene.insert(node, root, None).unwrap()
    }

    #[test]
    fn subtraction_row_has_shell_volume() {
        let (mut scene, big, small) = scene_with_two_boxes();
        let zone = add_zone(
            &mut scene,
            vec![vec![
                Operation::union(big),
                Operation::left_subtraction(small),
            ]],
        );
        let mut engine = ZoneEngine::new();
        engine.mark_all_dirty(&scene);
        let solid = engine.recompute(&scene, zone).unwrap();
        assert!((solid.volume() - 875.0).abs() < 1e-6);
    }

    #[test]
    fn clean_zone_is_served_from_cache() {
        let (mut scene, big, _) = scene_with_two_boxes();
        let zone = add_zone(&mut scene, vec![vec![Operation::union(big)]]);
        let mut engine = ZoneEngine::new();
        engine.mark_all_dirty(&scene);
        let first = engine.recompute(&scene, zone).unwrap();
        let second = engine.recompute(&scene, zone).unwrap();
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn touching_a_referenced_primitive_dirties_the_zone() {
        let (mut scene, big, small) = scene_with_two_boxes();
        let zone = add_zone(&mut scene, vec![vec![Operation::union(big)]]);
        let mut engine = ZoneEngine::new();
        engine.mark_all_dirty(&scene);
        engine.recompute(&scene, zone).unwrap();

        engine.on_scene_change(&scene, &[small]);
        assert!(!engine.is_dirty(zone));
        engine.on_scene_change(&scene, &[big]);
        assert!(engine.is_dirty(zone));
    }

    #[test]
    fn missing_operand_is_an_error() {
        let (mut scene, _, _) = scene_with_two_boxes();
        let ghost = Uuid::new_v4();
        let zone = add_zone(&mut scene, vec![vec![Operation::union(ghost)]]);
        let mut engine = ZoneEngine::new();
        engine.mark_all_dirty(&scene);
        assert!(matches!(
            engine.recompute(&scene, zone),
            Err(EditorError::InvalidReference { uuid }) if uuid == ghost
        ));
    }

    #[test]
    fn empty_rows_yield_the_empty_solid() {
        let mut scene = SceneGraph::new();
        let zone = add_zone(&mut scene, vec![]);
        let mut engine = ZoneEngine::new();
        engine.mark_all_dirty(&scene);
        let solid = engine.recompute(&scene, zone).unwrap();
        assert!(solid.is_empty());
    }
}
