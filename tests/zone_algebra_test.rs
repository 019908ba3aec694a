use glam::f64::DVec3;
use simscene::commands::{AddObjectCommand, SetPositionCommand, SetZoneOperationsCommand};
use simscene::editor::Editor;
use simscene::scene::{NodeKind, PrimitiveShape, SceneNode, ZoneData};
use simscene::zone::Operation;
use uuid::Uuid;

const EPS: f64 = 1e-6;

// Route the evaluator's warnings (degenerate operands, empty results)
// into the captured test output.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_test_writer()
        .try_init();
}

fn add_box(editor: &mut Editor, name: &str, size: f64, position: DVec3) -> Uuid {
    let node = SceneNode::new_primitive(
        name,
        PrimitiveShape::Box {
            width: size,
            height: size,
            depth: size,
        },
    );
    let uuid = node.uuid;
    let root = editor.scene().root();
    editor
        .execute(Box::new(AddObjectCommand::new(node, root, None)))
        .unwrap();
    editor
        .execute(Box::new(SetPositionCommand::new(uuid, position)))
        .unwrap();
    uuid
}

fn add_zone(editor: &mut Editor, rows: Vec<Vec<Operation>>) -> Uuid {
    let mut node = SceneNode::new_zone("zone");
    node.kind = NodeKind::Zone(ZoneData::with_rows(rows));
    let uuid = node.uuid;
    let root = editor.scene().root();
    editor
        .execute(Box::new(AddObjectCommand::new(node, root, None)))
        .unwrap();
    uuid
}

#[test]
fn subtraction_order_matters() {
    let mut editor = Editor::new();
    let big = add_box(&mut editor, "big", 10.0, DVec3::ZERO);
    let small = add_box(&mut editor, "small", 4.0, DVec3::ZERO);

    let big_minus_small = add_zone(
        &mut editor,
        vec![vec![
            Operation::union(big),
            Operation::left_subtraction(small),
        ]],
    );
    let small_minus_big = add_zone(
        &mut editor,
        vec![vec![
            Operation::union(small),
            Operation::left_subtraction(big),
        ]],
    );

    let shell = editor.recompute_zone(big_minus_small).unwrap();
    assert!((shell.volume() - (1000.0 - 64.0)).abs() < EPS);

    // the small box lies entirely inside the big one
    let nothing = editor.recompute_zone(small_minus_big).unwrap();
    assert!(nothing.volume() < EPS);
}

#[test]
fn right_subtraction_swaps_the_operands() {
    let mut editor = Editor::new();
    let big = add_box(&mut editor, "big", 10.0, DVec3::ZERO);
    let small = add_box(&mut editor, "small", 4.0, DVec3::ZERO);

    // accumulator is the small box; right-subtraction computes big - acc
    let zone = add_zone(
        &mut editor,
        vec![vec![
            Operation::union(small),
            Operation::right_subtraction(big),
        ]],
    );
    let shell = editor.recompute_zone(zone).unwrap();
    assert!((shell.volume() - (1000.0 - 64.0)).abs() < EPS);
}

#[test]
fn intersection_keeps_the_overlap() {
    let mut editor = Editor::new();
    let a = add_box(&mut editor, "a", 2.0, DVec3::ZERO);
    let b = add_box(&mut editor, "b", 2.0, DVec3::new(1.0, 0.0, 0.0));

    let zone = add_zone(
        &mut editor,
        vec![vec![Operation::union(a), Operation::intersection(b)]],
    );
    let overlap = editor.recompute_zone(zone).unwrap();
    assert!((overlap.volume() - 4.0).abs() < EPS);
}

#[test]
fn rows_union_together() {
    let mut editor = Editor::new();
    let a = add_box(&mut editor, "a", 2.0, DVec3::new(-10.0, 0.0, 0.0));
    let b = add_box(&mut editor, "b", 3.0, DVec3::new(10.0, 0.0, 0.0));

    let zone = add_zone(
        &mut editor,
        vec![vec![Operation::union(a)], vec![Operation::union(b)]],
    );
    let both = editor.recompute_zone(zone).unwrap();
    assert!((both.volume() - (8.0 + 27.0)).abs() < EPS);
}

#[test]
fn empty_algebra_yields_an_empty_solid() {
    init_logging();
    let mut editor = Editor::new();
    let zone = add_zone(&mut editor, vec![]);
    let solid = editor.recompute_zone(zone).unwrap();
    assert!(solid.is_empty());
    assert_eq!(solid.volume(), 0.0);
}

#[test]
fn degenerate_operand_contributes_nothing() {
    init_logging();
    let mut editor = Editor::new();
    let root = editor.scene().root();
    let flat = SceneNode::new_primitive(
        "flat",
        PrimitiveShape::Box {
            width: 2.0,
            height: 0.0,
            depth: 2.0,
        },
    );
    let flat_uuid = flat.uuid;
    editor
        .execute(Box::new(AddObjectCommand::new(flat, root, None)))
        .unwrap();

    let zone = add_zone(&mut editor, vec![vec![Operation::union(flat_uuid)]]);
    let solid = editor.recompute_zone(zone).unwrap();
    assert!(solid.is_empty());
}

#[test]
fn clean_zones_are_served_from_cache() {
    let mut editor = Editor::new();
    let a = add_box(&mut editor, "a", 2.0, DVec3::ZERO);
    let unrelated = add_box(&mut editor, "unrelated", 2.0, DVec3::new(50.0, 0.0, 0.0));
    let zone = add_zone(&mut editor, vec![vec![Operation::union(a)]]);

    let first = editor.recompute_zone(zone).unwrap();
    let second = editor.recompute_zone(zone).unwrap();
    assert!(first.ptr_eq(&second));

    // touching a primitive the zone does not reference keeps the cache
    editor
        .execute(Box::new(SetPositionCommand::new(
            unrelated,
            DVec3::new(60.0, 0.0, 0.0),
        )))
        .unwrap();
    let third = editor.recompute_zone(zone).unwrap();
    assert!(first.ptr_eq(&third));

    // touching the referenced primitive invalidates it
    editor
        .execute(Box::new(SetPositionCommand::new(
            a,
            DVec3::new(1.0, 0.0, 0.0),
        )))
        .unwrap();
    assert!(editor.zone_is_dirty(zone));
    let fourth = editor.recompute_zone(zone).unwrap();
    assert!(!first.ptr_eq(&fourth));
}

#[test]
fn replacing_the_algebra_is_undoable() {
    let mut editor = Editor::new();
    let big = add_box(&mut editor, "big", 10.0, DVec3::ZERO);
    let small = add_box(&mut editor, "small", 5.0, DVec3::ZERO);
    let zone = add_zone(&mut editor, vec![vec![Operation::union(big)]]);

    assert!((editor.recompute_zone(zone).unwrap().volume() - 1000.0).abs() < EPS);

    editor
        .execute(Box::new(SetZoneOperationsCommand::new(
            zone,
            vec![vec![
                Operation::union(big),
                Operation::left_subtraction(small),
            ]],
        )))
        .unwrap();
    assert!((editor.recompute_zone(zone).unwrap().volume() - 875.0).abs() < EPS);

    assert!(editor.undo());
    assert!((editor.recompute_zone(zone).unwrap().volume() - 1000.0).abs() < EPS);
}

#[test]
fn algebra_referencing_a_missing_object_is_rejected() {
    let mut editor = Editor::new();
    let zone = add_zone(&mut editor, vec![]);
    let ghost = Uuid::new_v4();
    let result = editor.execute(Box::new(SetZoneOperationsCommand::new(
        zone,
        vec![vec![Operation::union(ghost)]],
    )));
    assert!(result.is_err());
    // the zone is untouched
    let solid = editor.recompute_zone(zone).unwrap();
    assert!(solid.is_empty());
}
