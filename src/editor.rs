use crate::commands::Command;
use crate::csg::mesh_utils::DerivedSolid;
use crate::error::EditorError;
use crate::history::{History, HistoryState};
use crate::scene::graph::SceneGraph;
use crate::scene::node::{NodeKind, SceneNode, WorldZoneData};
use crate::signals::{SignalBus, SignalKind, SignalPayload};
use crate::zone::engine::ZoneEngine;
use crate::zone::world_zone::fit_world_zone;
use uuid::Uuid;

/*
 * Facade tying the pieces together: the scene graph holds the model, the
 * history runs commands against it, the zone engine keeps derived solids
 * current, and the signal bus fans state changes out to observers. A new
 * editor always carries a world zone in automatic mode.
 */

pub struct Editor {
    scene: SceneGraph,
    zones: ZoneEngine,
    history: History,
    signals: SignalBus,
    selected: Option<Uuid>,
}

impl Editor {
    pub fn new() -> Self {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let world = SceneNode::new("World Zone", NodeKind::WorldZone(WorldZoneData::new()));
        scene
            .insert(world, root, None)
            .expect("fresh scene accepts the world zone");
        Self {
            scene,
            zones: ZoneEngine::new(),
            history: History::new(),
            signals: SignalBus::new(),
            selected: None,
        }
    }

    /// Rebuild an editor around a loaded scene, with a fresh history and
    /// every zone marked for recomputation.
    pub fn from_scene(scene: SceneGraph) -> Self {
        let mut zones = ZoneEngine::new();
        zones.mark_all_dirty(&scene);
        Self {
            scene,
            zones,
            history: History::new(),
            signals: SignalBus::new(),
            selected: None,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn signals(&self) -> SignalBus {
        self.signals.clone()
    }

    pub fn get_node_by_uuid(&self, uuid: Uuid) -> Option<&SceneNode> {
        self.scene.get(uuid)
    }

    pub fn world_zone_uuid(&self) -> Option<Uuid> {
        self.scene.world_zone_uuid()
    }

    /// Run a command through the history. On success the zone caches are
    /// invalidated for everything the command touched and the world zone
    /// is refitted when in automatic mode.
    pub fn execute(&mut self, cmd: Box<dyn Command>) -> Result<(), EditorError> {
        let touched = self.history.execute(cmd, &mut self.scene, &self.signals)?;
        self.after_mutation(&touched);
        Ok(())
    }

    /// Revert the last command. Returns false when there was nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.scene, &self.signals) {
            Some(touched) => {
                self.after_mutation(&touched);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.scene, &self.signals) {
            Some(touched) => {
                self.after_mutation(&touched);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn current_state_id(&self) -> u64 {
        self.history.current_state_id()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    pub fn clear_history(&mut self) {
        self.history.clear(&self.signals);
    }

    /// Jump the scene to a recorded history state.
    pub fn go_to_state(&mut self, id: u64) {
        let touched = self
            .history
            .go_to_state(id, &mut self.scene, &self.signals);
        self.after_mutation(&touched);
    }

    /// Evaluate one zone, from cache when nothing it depends on changed.
    pub fn recompute_zone(&mut self, zone_id: Uuid) -> Result<DerivedSolid, EditorError> {
        self.zones.recompute(&self.scene, zone_id)
    }

    pub fn zone_is_dirty(&self, zone_id: Uuid) -> bool {
        self.zones.is_dirty(zone_id)
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Change the selection and notify observers. Selecting the current
    /// selection again is a no-op.
    pub fn select(&mut self, uuid: Option<Uuid>) {
        if self.selected == uuid {
            return;
        }
        self.selected = uuid;
        let payload = match uuid {
            Some(uuid) => SignalPayload::Object(uuid),
            None => SignalPayload::None,
        };
        self.signals.publish(SignalKind::ObjectSelected, payload);
    }

    fn after_mutation(&mut self, touched: &[Uuid]) {
        if self.selected.is_some_and(|s| !self.scene.contains(s)) {
            self.select(None);
        }
        self.zones.on_scene_change(&self.scene, touched);
        self.refresh_world_zone();
    }

    /// In automatic mode the world zone tracks the primitives: refit its
    /// geometry and recenter its node after every mutation.
    fn refresh_world_zone(&mut self) {
        let Some(world_uuid) = self.scene.world_zone_uuid() else {
            return;
        };
        let Some(NodeKind::WorldZone(data)) = self.scene.get(world_uuid).map(|n| &n.kind)
        else {
            return;
        };
        if !data.auto_calculate {
            return;
        }
        let Some((geometry, center)) = fit_world_zone(&self.scene, data) else {
            return;
        };
        let changed = {
            let Some(node) = self.scene.get_mut(world_uuid) else {
                return;
            };
            let NodeKind::WorldZone(data) = &mut node.kind else {
                return;
            };
            let changed = data.geometry != geometry || node.transform.position != center;
            data.geometry = geometry;
            node.transform.position = center;
            changed
        };
        if changed {
            self.signals.publish(
                SignalKind::ZoneGeometryChanged,
                SignalPayload::Object(world_uuid),
            );
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
