use glam::f64::DVec3;
use simscene::editor::Editor;
use simscene::error::EditorError;
use simscene::scene::{
    BeamData, DetectorData, FilterData, FilterRule, NodeKind, OutputData, PrimitiveShape,
    Quantity, RuleRelation, SceneGraph, SceneNode, Transform, ZoneData,
};
use simscene::serialization::{load_project, project_from_value, project_to_value, save_project};
use simscene::zone::Operation;
use uuid::Uuid;

fn snapshot(scene: &SceneGraph) -> Vec<SceneNode> {
    let mut nodes: Vec<SceneNode> = scene.iter().cloned().collect();
    nodes.sort_by_key(|n| n.uuid);
    nodes
}

fn full_scene() -> SceneGraph {
    let mut scene = SceneGraph::new();
    let root = scene.root();

    let primitive = SceneNode::new_primitive(
        "target",
        PrimitiveShape::Cylinder {
            radius: 5.0,
            inner_radius: 1.0,
            depth: 10.0,
        },
    )
    .with_transform(Transform {
        position: DVec3::new(1.0, 2.0, 3.0),
        rotation: DVec3::new(0.0, 90.0, 0.0),
        scale: DVec3::ONE,
    });
    let primitive_uuid = scene.insert(primitive, root, None).unwrap();

    let mut zone_node = SceneNode::new_zone("zone");
    zone_node.kind = NodeKind::Zone(ZoneData::with_rows(vec![vec![Operation::union(
        primitive_uuid,
    )]]));
    let zone_uuid = scene.insert(zone_node, root, None).unwrap();

    let detector = SceneNode::new(
        "det",
        NodeKind::Detector(DetectorData {
            geometry: PrimitiveShape::Box {
                width: 2.0,
                height: 2.0,
                depth: 2.0,
            },
            zone_uuid: Some(zone_uuid),
        }),
    );
    let detector_uuid = scene.insert(detector, root, None).unwrap();

    let filter = SceneNode::new(
        "protons only",
        NodeKind::Filter(FilterData {
            rules: vec![FilterRule {
                keyword: "Z".to_string(),
                relation: RuleRelation::Equal,
                value: 1.0,
            }],
        }),
    );
    let filter_uuid = scene.insert(filter, root, None).unwrap();

    let output = SceneNode::new(
        "dose output",
        NodeKind::Output(OutputData {
            detector_uuid: Some(detector_uuid),
            quantities: vec![Quantity {
                name: "dose".to_string(),
                keyword: "Dose".to_string(),
                filter_uuid: Some(filter_uuid),
            }],
        }),
    );
    scene.insert(output, root, None).unwrap();

    scene
        .insert(SceneNode::new("beam", NodeKind::Beam(BeamData::new())), root, None)
        .unwrap();
    scene
}

#[test]
fn save_load_round_trip_preserves_the_scene() {
    let scene = full_scene();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");

    save_project(&scene, &path).unwrap();
    let loaded = load_project(&path).unwrap();

    assert_eq!(snapshot(&scene), snapshot(&loaded));
    assert_eq!(scene.root(), loaded.root());
}

#[test]
fn value_round_trip_is_stable() {
    let scene = full_scene();
    let value = project_to_value(&scene).unwrap();
    let loaded = project_from_value(value.clone()).unwrap();
    assert_eq!(snapshot(&scene), snapshot(&loaded));

    // serializing the reloaded scene reproduces the same document
    let again = project_to_value(&loaded).unwrap();
    assert_eq!(value, again);
}

#[test]
fn loaded_scene_drives_a_fresh_editor() {
    let scene = full_scene();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");
    save_project(&scene, &path).unwrap();

    let mut editor = Editor::from_scene(load_project(&path).unwrap());
    assert!(!editor.can_undo());

    let zone = editor
        .scene()
        .iter()
        .find(|n| n.kind.is_zone())
        .unwrap()
        .uuid;
    let solid = editor.recompute_zone(zone).unwrap();
    assert!(solid.volume() > 0.0);
}

#[test]
fn zone_with_a_broken_reference_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    let ghost = Uuid::new_v4();
    let json = format!(
        r#"{{
  "version": 1,
  "scene": {{
    "uuid": "{root}",
    "name": "Scene",
    "transform": {{"position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}},
    "type": "Group",
    "children": [
      {{
        "uuid": "{zone}",
        "name": "zone",
        "transform": {{"position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}},
        "type": "Zone",
        "unionOperations": [[{{"objectId": "{ghost}", "operation": "union"}}]],
        "materialName": ""
      }}
    ]
  }}
}}"#,
        root = Uuid::new_v4(),
        zone = Uuid::new_v4(),
        ghost = ghost,
    );
    std::fs::write(&path, json).unwrap();

    assert!(matches!(
        load_project(&path),
        Err(EditorError::InvalidReference { uuid }) if uuid == ghost
    ));
}

#[test]
fn dangling_detector_reference_is_repaired() {
    let mut scene = full_scene();
    // point the detector at a zone that will not be in the file
    let detector_uuid = scene
        .iter()
        .find(|n| matches!(n.kind, NodeKind::Detector(_)))
        .unwrap()
        .uuid;
    if let Some(NodeKind::Detector(data)) = scene.get_mut(detector_uuid).map(|n| &mut n.kind) {
        data.zone_uuid = Some(Uuid::new_v4());
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dangling.json");
    save_project(&scene, &path).unwrap();
    let loaded = load_project(&path).unwrap();

    let NodeKind::Detector(data) = &loaded.get(detector_uuid).unwrap().kind else {
        panic!("detector missing after load");
    };
    assert_eq!(data.zone_uuid, None);
}

#[test]
fn duplicate_uuids_are_a_malformed_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.json");
    let dup = Uuid::new_v4();
    let child = format!(
        r#"{{
        "uuid": "{dup}",
        "name": "box",
        "transform": {{"position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}},
        "type": "Primitive",
        "shape": {{"geometryType": "BoxGeometry", "width": 1.0, "height": 1.0, "depth": 1.0}}
      }}"#
    );
    let json = format!(
        r#"{{
  "version": 1,
  "scene": {{
    "uuid": "{root}",
    "name": "Scene",
    "transform": {{"position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}},
    "type": "Group",
    "children": [{child}, {child}]
  }}
}}"#,
        root = Uuid::new_v4(),
    );
    std::fs::write(&path, json).unwrap();

    assert!(matches!(
        load_project(&path),
        Err(EditorError::MalformedProject { .. })
    ));
}

#[test]
fn future_versions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.json");
    let json = format!(
        r#"{{
  "version": 99,
  "scene": {{
    "uuid": "{root}",
    "name": "Scene",
    "transform": {{"position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}},
    "type": "Group",
    "children": []
  }}
}}"#,
        root = Uuid::new_v4(),
    );
    std::fs::write(&path, json).unwrap();

    assert!(matches!(
        load_project(&path),
        Err(EditorError::MalformedProject { .. })
    ));
}
