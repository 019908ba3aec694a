use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::scene::node::{NodeKind, SceneNode};
use crate::scene::transform::Transform;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use uuid::Uuid;

/*
 * Project files are versioned JSON with the scene stored as a nested
 * tree, children inline under their parent. Loading rebuilds the arena
 * and cross-checks every UUID reference: zone algebra references must
 * resolve, while dangling detector, output and quantity references are
 * repaired to none with a warning.
 */

pub const PROJECT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ProjectJson {
    version: u32,
    scene: ProjectNode,
}

#[derive(Serialize, Deserialize)]
struct ProjectNode {
    uuid: Uuid,
    name: String,
    transform: Transform,
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(default)]
    children: Vec<ProjectNode>,
}

fn node_to_project(scene: &SceneGraph, uuid: Uuid) -> Option<ProjectNode> {
    let node = scene.get(uuid)?;
    Some(ProjectNode {
        uuid: node.uuid,
        name: node.name.clone(),
        transform: node.transform.clone(),
        kind: node.kind.clone(),
        children: node
            .children
            .iter()
            .filter_map(|child| node_to_project(scene, *child))
            .collect(),
    })
}

fn build_project(scene: &SceneGraph) -> Result<ProjectJson, EditorError> {
    let root = node_to_project(scene, scene.root()).ok_or(EditorError::MalformedProject {
        reason: "scene has no root".to_string(),
    })?;
    Ok(ProjectJson {
        version: PROJECT_VERSION,
        scene: root,
    })
}

/// Serialize the scene to an in-memory project document.
pub fn project_to_value(scene: &SceneGraph) -> Result<serde_json::Value, EditorError> {
    Ok(serde_json::to_value(build_project(scene)?)?)
}

/// Rebuild a scene from an in-memory project document.
pub fn project_from_value(value: serde_json::Value) -> Result<SceneGraph, EditorError> {
    let project: ProjectJson = serde_json::from_value(value)?;
    scene_from_project(project)
}

pub fn save_project(scene: &SceneGraph, path: &Path) -> Result<(), EditorError> {
    let project = build_project(scene)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &project)?;
    Ok(())
}

pub fn load_project(path: &Path) -> Result<SceneGraph, EditorError> {
    let file = File::open(path)?;
    let project: ProjectJson = serde_json::from_reader(BufReader::new(file))?;
    scene_from_project(project)
}

fn scene_from_project(project: ProjectJson) -> Result<SceneGraph, EditorError> {
    if project.version > PROJECT_VERSION {
        return Err(EditorError::MalformedProject {
            reason: format!("unsupported project version {}", project.version),
        });
    }

    let root_node = SceneNode {
        uuid: project.scene.uuid,
        name: project.scene.name.clone(),
        parent: None,
        children: Vec::new(),
        transform: project.scene.transform.clone(),
        kind: project.scene.kind.clone(),
    };
    let mut scene = SceneGraph::from_root(root_node);
    let root_uuid = project.scene.uuid;
    for child in project.scene.children {
        insert_recursive(&mut scene, root_uuid, child)?;
    }
    validate_references(&mut scene)?;
    Ok(scene)
}

fn insert_recursive(
    scene: &mut SceneGraph,
    parent: Uuid,
    node: ProjectNode,
) -> Result<(), EditorError> {
    let scene_node = SceneNode {
        uuid: node.uuid,
        name: node.name,
        parent: None,
        children: Vec::new(),
        transform: node.transform,
        kind: node.kind,
    };
    scene
        .insert(scene_node, parent, None)
        .map_err(|err| match err {
            EditorError::DuplicateUuid { uuid } => EditorError::MalformedProject {
                reason: format!("duplicate uuid {uuid}"),
            },
            other => other,
        })?;
    let uuid = node.uuid;
    for child in node.children {
        insert_recursive(scene, uuid, child)?;
    }
    Ok(())
}

/// Zone algebra rows must reference existing primitives; a broken row is
/// a load error. Detector, output and quantity links degrade gracefully
/// to none instead.
fn validate_references(scene: &mut SceneGraph) -> Result<(), EditorError> {
    let primitives: FxHashSet<Uuid> = scene
        .iter_kind(NodeKind::is_primitive)
        .map(|n| n.uuid)
        .collect();
    let zones: FxHashSet<Uuid> = scene.iter_kind(NodeKind::is_zone).map(|n| n.uuid).collect();
    let detectors: FxHashSet<Uuid> = scene
        .iter_kind(|k| matches!(k, NodeKind::Detector(_)))
        .map(|n| n.uuid)
        .collect();
    let filters: FxHashSet<Uuid> = scene
        .iter_kind(|k| matches!(k, NodeKind::Filter(_)))
        .map(|n| n.uuid)
        .collect();

    for node in scene.iter() {
        if let NodeKind::Zone(zone) = &node.kind {
            for uuid in zone.referenced_uuids() {
                if !primitives.contains(&uuid) {
                    return Err(EditorError::InvalidReference { uuid });
                }
            }
        }
    }

    let uuids: Vec<Uuid> = scene.iter().map(|n| n.uuid).collect();
    for uuid in uuids {
        let Some(node) = scene.get_mut(uuid) else {
            continue;
        };
        match &mut node.kind {
            NodeKind::Detector(detector) => {
                if let Some(zone) = detector.zone_uuid {
                    if !zones.contains(&zone) {
                        tracing::warn!(detector = %uuid, zone = %zone, "dropping dangling zone reference");
                        detector.zone_uuid = None;
                    }
                }
            }
            NodeKind::Output(output) => {
                if let Some(detector) = output.detector_uuid {
                    if !detectors.contains(&detector) {
                        tracing::warn!(output = %uuid, detector = %detector, "dropping dangling detector reference");
                        output.detector_uuid = None;
                    }
                }
                for quantity in &mut output.quantities {
                    if let Some(filter) = quantity.filter_uuid {
                        if !filters.contains(&filter) {
                            tracing::warn!(output = %uuid, filter = %filter, "dropping dangling filter reference");
                            quantity.filter_uuid = None;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
