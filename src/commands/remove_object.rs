use crate::commands::Command;
use crate::error::EditorError;
use crate::scene::graph::{DetachedSubtree, SceneGraph};
use crate::scene::node::NodeKind;
use crate::signals::{SignalKind, SignalPayload};
use crate::zone::algebra::Operation;
use rustc_hash::FxHashSet;
use uuid::Uuid;

/// A dangling reference cleared as part of a removal, recorded so undo
/// can restore it.
#[derive(Debug)]
enum ClearedReference {
    DetectorZone { detector: Uuid, zone: Uuid },
    OutputDetector { output: Uuid, detector: Uuid },
    QuantityFilter {
        output: Uuid,
        quantity_index: usize,
        filter: Uuid,
    },
}

/// Remove a node and its whole subtree. Zone algebra rows referencing
/// removed primitives are pruned and detector, output and quantity
/// references to removed nodes are cleared, all restored on undo.
#[derive(Debug)]
pub struct RemoveObjectCommand {
    target: Uuid,
    subtree: Option<DetachedSubtree>,
    pruned_zone_rows: Vec<(Uuid, Vec<Vec<Operation>>)>,
    cleared_refs: Vec<ClearedReference>,
    was_zone: bool,
    last_touched: Vec<Uuid>,
}

impl RemoveObjectCommand {
    pub fn new(target: Uuid) -> Self {
        Self {
            target,
            subtree: None,
            pruned_zone_rows: Vec::new(),
            cleared_refs: Vec::new(),
            was_zone: false,
            last_touched: Vec::new(),
        }
    }

    fn record_touched(&mut self) {
        let mut touched: Vec<Uuid> = match &self.subtree {
            Some(subtree) => subtree.uuids().collect(),
            None => vec![self.target],
        };
        touched.extend(self.pruned_zone_rows.iter().map(|(uuid, _)| *uuid));
        for cleared in &self.cleared_refs {
            touched.push(match cleared {
                ClearedReference::DetectorZone { detector, .. } => *detector,
                ClearedReference::OutputDetector { output, .. } => *output,
                ClearedReference::QuantityFilter { output, .. } => *output,
            });
        }
        self.last_touched = touched;
    }
}

impl Command for RemoveObjectCommand {
    fn kind_name(&self) -> &'static str {
        "RemoveObject"
    }

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError> {
        scene.require(self.target)?;
        if self.target == scene.root() {
            return Err(EditorError::NotRemovable { uuid: self.target });
        }
        for uuid in scene.descendants_inclusive(self.target) {
            if let Some(n) = scene.get(uuid) {
                if matches!(n.kind, NodeKind::WorldZone(_)) {
                    return Err(EditorError::NotRemovable { uuid });
                }
            }
        }
        Ok(())
    }

    fn execute(&mut self, scene: &mut SceneGraph) {
        // Re-executing on redo starts from fresh captures.
        self.pruned_zone_rows.clear();
        self.cleared_refs.clear();

        self.was_zone = scene
            .get(self.target)
            .is_some_and(|n| n.kind.is_zone());

        let Ok(subtree) = scene.detach(self.target) else {
            return;
        };
        let removed: FxHashSet<Uuid> = subtree.uuids().collect();
        self.subtree = Some(subtree);

        let survivors: Vec<Uuid> = scene.iter().map(|n| n.uuid).collect();
        for uuid in survivors {
            let Some(node) = scene.get_mut(uuid) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Zone(zone) => {
                    if removed.iter().any(|r| zone.references(*r)) {
                        self.pruned_zone_rows.push((uuid, zone.rows.clone()));
                        zone.prune(&removed);
                    }
                }
                NodeKind::Detector(detector) => {
                    if let Some(zone) = detector.zone_uuid {
                        if removed.contains(&zone) {
                            detector.zone_uuid = None;
                            self.cleared_refs.push(ClearedReference::DetectorZone {
                                detector: uuid,
                                zone,
                            });
                        }
                    }
                }
                NodeKind::Output(output) => {
                    if let Some(detector) = output.detector_uuid {
                        if removed.contains(&detector) {
                            output.detector_uuid = None;
                            self.cleared_refs.push(ClearedReference::OutputDetector {
                                output: uuid,
                                detector,
                            });
                        }
                    }
                    for (i, quantity) in output.quantities.iter_mut().enumerate() {
                        if let Some(filter) = quantity.filter_uuid {
                            if removed.contains(&filter) {
                                quantity.filter_uuid = None;
                                self.cleared_refs.push(ClearedReference::QuantityFilter {
                                    output: uuid,
                                    quantity_index: i,
                                    filter,
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        self.record_touched();
    }

    fn revert(&mut self, scene: &mut SceneGraph) {
        self.record_touched();
        let Some(subtree) = self.subtree.take() else {
            return;
        };
        let _ = scene.attach(subtree);

        for (uuid, rows) in self.pruned_zone_rows.drain(..) {
            if let Some(zone) = scene.get_mut(uuid).and_then(|n| n.kind.as_zone_mut()) {
                zone.rows = rows;
            }
        }
        for cleared in self.cleared_refs.drain(..) {
            match cleared {
                ClearedReference::DetectorZone { detector, zone } => {
                    if let Some(NodeKind::Detector(data)) =
                        scene.get_mut(detector).map(|n| &mut n.kind)
                    {
                        data.zone_uuid = Some(zone);
                    }
                }
                ClearedReference::OutputDetector { output, detector } => {
                    if let Some(NodeKind::Output(data)) =
                        scene.get_mut(output).map(|n| &mut n.kind)
                    {
                        data.detector_uuid = Some(detector);
                    }
                }
                ClearedReference::QuantityFilter {
                    output,
                    quantity_index,
                    filter,
                } => {
                    if let Some(NodeKind::Output(data)) =
                        scene.get_mut(output).map(|n| &mut n.kind)
                    {
                        if let Some(quantity) = data.quantities.get_mut(quantity_index) {
                            quantity.filter_uuid = Some(filter);
                        }
                    }
                }
            }
        }
    }

    fn touched(&self) -> Vec<Uuid> {
        if self.last_touched.is_empty() {
            vec![self.target]
        } else {
            self.last_touched.clone()
        }
    }

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)> {
        let payload = SignalPayload::Object(self.target);
        let mut signals = vec![(SignalKind::ObjectRemoved, payload)];
        if self.was_zone {
            signals.push((SignalKind::ZoneRemoved, payload));
        }
        signals.push((SignalKind::SceneGraphChanged, SignalPayload::None));
        signals
    }

    fn signals_after_revert(&self) -> Vec<(SignalKind, SignalPayload)> {
        let payload = SignalPayload::Object(self.target);
        let mut signals = vec![(SignalKind::ObjectAdded, payload)];
        if self.was_zone {
            signals.push((SignalKind::ZoneAdded, payload));
        }
        signals.push((SignalKind::SceneGraphChanged, SignalPayload::None));
        signals
    }
}
