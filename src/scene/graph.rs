use crate::error::EditorError;
use crate::scene::node::{NodeKind, SceneNode};
use indexmap::IndexMap;
use uuid::Uuid;

/*
 * The scene is a tree of nodes stored in an arena keyed by UUID. Nodes own
 * their children lists; the arena owns the nodes. Detach and attach are
 * exact inverses so commands can capture a removed subtree and restore it
 * bit for bit on undo, including sibling order.
 */

/// A subtree removed from the graph, in pre-order. `nodes[0]` is the
/// detached root; `parent` and `index` record where it was attached.
#[derive(Clone, Debug)]
pub struct DetachedSubtree {
    pub nodes: Vec<SceneNode>,
    pub parent: Uuid,
    pub index: usize,
}

impl DetachedSubtree {
    pub fn root_uuid(&self) -> Uuid {
        self.nodes[0].uuid
    }

    pub fn uuids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.nodes.iter().map(|n| n.uuid)
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    root: Uuid,
    nodes: IndexMap<Uuid, SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = SceneNode::new("Scene", NodeKind::Group);
        let root_uuid = root.uuid;
        let mut nodes = IndexMap::new();
        nodes.insert(root_uuid, root);
        Self {
            root: root_uuid,
            nodes,
        }
    }

    /// Rebuild a graph around an existing root node, used when loading a
    /// project file.
    pub fn from_root(root: SceneNode) -> Self {
        let root_uuid = root.uuid;
        let mut nodes = IndexMap::new();
        nodes.insert(root_uuid, root);
        Self {
            root: root_uuid,
            nodes,
        }
    }

    pub fn root(&self) -> Uuid {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, uuid: Uuid) -> bool {
        self.nodes.contains_key(&uuid)
    }

    pub fn get(&self, uuid: Uuid) -> Option<&SceneNode> {
        self.nodes.get(&uuid)
    }

    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&uuid)
    }

    pub fn require(&self, uuid: Uuid) -> Result<&SceneNode, EditorError> {
        self.nodes
            .get(&uuid)
            .ok_or(EditorError::InvalidReference { uuid })
    }

    pub fn require_mut(&mut self, uuid: Uuid) -> Result<&mut SceneNode, EditorError> {
        self.nodes
            .get_mut(&uuid)
            .ok_or(EditorError::InvalidReference { uuid })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    /// All nodes of a given kind, in insertion order.
    pub fn iter_kind<'a>(
        &'a self,
        pred: impl Fn(&NodeKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a SceneNode> {
        self.nodes.values().filter(move |n| pred(&n.kind))
    }

    /// Insert `node` as a child of `parent` at `index` (clamped to the
    /// child count; `None` appends). The node's own `parent`/`children`
    /// fields are overwritten.
    pub fn insert(
        &mut self,
        mut node: SceneNode,
        parent: Uuid,
        index: Option<usize>,
    ) -> Result<Uuid, EditorError> {
        if self.nodes.contains_key(&node.uuid) {
            return Err(EditorError::DuplicateUuid { uuid: node.uuid });
        }
        let parent_node = self.require_mut(parent)?;
        let index = index
            .unwrap_or(parent_node.children.len())
            .min(parent_node.children.len());
        let uuid = node.uuid;
        parent_node.children.insert(index, uuid);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(uuid, node);
        Ok(uuid)
    }

    /// Remove `uuid` and every descendant, returning the subtree so it can
    /// be re-attached later. The root cannot be detached.
    pub fn detach(&mut self, uuid: Uuid) -> Result<DetachedSubtree, EditorError> {
        if uuid == self.root {
            return Err(EditorError::NotRemovable { uuid });
        }
        let node = self.require(uuid)?;
        let parent = node
            .parent
            .ok_or(EditorError::InvalidReference { uuid })?;
        let parent_node = self.require_mut(parent)?;
        let index = parent_node
            .children
            .iter()
            .position(|c| *c == uuid)
            .ok_or(EditorError::InvalidReference { uuid })?;
        parent_node.children.remove(index);

        let order = self.descendants_inclusive(uuid);
        let mut nodes = Vec::with_capacity(order.len());
        for id in order {
            // swap_remove keeps the arena compact; tree order lives in the
            // children lists, not in map order.
            let node = self
                .nodes
                .swap_remove(&id)
                .ok_or(EditorError::InvalidReference { uuid: id })?;
            nodes.push(node);
        }
        Ok(DetachedSubtree {
            nodes,
            parent,
            index,
        })
    }

    /// Re-insert a previously detached subtree at its recorded location.
    /// Exact inverse of `detach`.
    pub fn attach(&mut self, subtree: DetachedSubtree) -> Result<Uuid, EditorError> {
        let root_uuid = subtree.root_uuid();
        for node in &subtree.nodes {
            if self.nodes.contains_key(&node.uuid) {
                return Err(EditorError::DuplicateUuid { uuid: node.uuid });
            }
        }
        let parent_node = self.require_mut(subtree.parent)?;
        let index = subtree.index.min(parent_node.children.len());
        parent_node.children.insert(index, root_uuid);
        for node in subtree.nodes {
            self.nodes.insert(node.uuid, node);
        }
        Ok(root_uuid)
    }

    /// Pre-order listing of `uuid` and all its descendants.
    pub fn descendants_inclusive(&self, uuid: Uuid) -> Vec<Uuid> {
        let mut out = Vec::new();
        let mut stack = vec![uuid];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                out.push(id);
                // push in reverse so children come off the stack in order
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// True when `candidate` lies in the subtree rooted at `ancestor`
    /// (including `candidate == ancestor`).
    pub fn is_descendant(&self, candidate: Uuid, ancestor: Uuid) -> bool {
        let mut cur = Some(candidate);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Move a child within its parent's children list. `new_index` is
    /// clamped to the valid range.
    pub fn reorder_child(&mut self, uuid: Uuid, new_index: usize) -> Result<usize, EditorError> {
        let parent = self
            .require(uuid)?
            .parent
            .ok_or(EditorError::NotRemovable { uuid })?;
        let parent_node = self.require_mut(parent)?;
        let old_index = parent_node
            .children
            .iter()
            .position(|c| *c == uuid)
            .ok_or(EditorError::InvalidReference { uuid })?;
        let new_index = new_index.min(parent_node.children.len() - 1);
        let child = parent_node.children.remove(old_index);
        parent_node.children.insert(new_index, child);
        Ok(old_index)
    }

    /// Reparent `uuid` under `new_parent` at `index`, refusing moves that
    /// would make a node its own ancestor. Returns the old location.
    pub fn reparent(
        &mut self,
        uuid: Uuid,
        new_parent: Uuid,
        index: Option<usize>,
    ) -> Result<(Uuid, usize), EditorError> {
        if uuid == self.root {
            return Err(EditorError::NotRemovable { uuid });
        }
        self.require(new_parent)?;
        if self.is_descendant(new_parent, uuid) {
            return Err(EditorError::CycleDetected { uuid });
        }
        let old_parent = self
            .require(uuid)?
            .parent
            .ok_or(EditorError::InvalidReference { uuid })?;
        let old_parent_node = self.require_mut(old_parent)?;
        let old_index = old_parent_node
            .children
            .iter()
            .position(|c| *c == uuid)
            .ok_or(EditorError::InvalidReference { uuid })?;
        old_parent_node.children.remove(old_index);

        let new_parent_node = self.require_mut(new_parent)?;
        let index = index
            .unwrap_or(new_parent_node.children.len())
            .min(new_parent_node.children.len());
        new_parent_node.children.insert(index, uuid);
        self.require_mut(uuid)?.parent = Some(new_parent);
        Ok((old_parent, old_index))
    }

    /// The world zone node, if present. At most one exists per scene.
    pub fn world_zone(&self) -> Option<&SceneNode> {
        self.nodes
            .values()
            .find(|n| matches!(n.kind, NodeKind::WorldZone(_)))
    }

    pub fn world_zone_uuid(&self) -> Option<Uuid> {
        self.world_zone().map(|n| n.uuid)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::PrimitiveShape;

    fn boxed(name: &str) -> SceneNode {
        SceneNode::new_primitive(
            name,
            PrimitiveShape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
        )
    }

    #[test]
    fn insert_sets_parent_and_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.insert(boxed("a"), root, None).unwrap();
        let b = graph.insert(boxed("b"), root, None).unwrap();
        let c = graph.insert(boxed("c"), root, Some(1)).unwrap();
        assert_eq!(graph.get(root).unwrap().children, vec![a, c, b]);
        assert_eq!(graph.get(c).unwrap().parent, Some(root));
    }

    #[test]
    fn duplicate_uuid_is_rejected() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = boxed("a");
        let copy = node.clone();
        graph.insert(node, root, None).unwrap();
        assert!(matches!(
            graph.insert(copy, root, None),
            Err(EditorError::DuplicateUuid { .. })
        ));
    }

    #[test]
    fn detach_then_attach_restores_structure() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.insert(SceneNode::new_group("g"), root, None).unwrap();
        let a = graph.insert(boxed("a"), group, None).unwrap();
        let b = graph.insert(boxed("b"), root, None).unwrap();

        let before_children = graph.get(root).unwrap().children.clone();
        let subtree = graph.detach(group).unwrap();
        assert!(!graph.contains(group));
        assert!(!graph.contains(a));
        assert!(graph.contains(b));

        graph.attach(subtree).unwrap();
        assert_eq!(graph.get(root).unwrap().children, before_children);
        assert_eq!(graph.get(group).unwrap().children, vec![a]);
        assert_eq!(graph.get(a).unwrap().parent, Some(group));
    }

    #[test]
    fn root_cannot_be_detached() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        assert!(matches!(
            graph.detach(root),
            Err(EditorError::NotRemovable { .. })
        ));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let outer = graph
            .insert(SceneNode::new_group("outer"), root, None)
            .unwrap();
        let inner = graph
            .insert(SceneNode::new_group("inner"), outer, None)
            .unwrap();
        assert!(matches!(
            graph.reparent(outer, inner, None),
            Err(EditorError::CycleDetected { .. })
        ));
        assert!(matches!(
            graph.reparent(outer, outer, None),
            Err(EditorError::CycleDetected { .. })
        ));
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let g = graph.insert(SceneNode::new_group("g"), root, None).unwrap();
        let a = graph.insert(boxed("a"), g, None).unwrap();
        let b = graph.insert(boxed("b"), g, None).unwrap();
        assert_eq!(graph.descendants_inclusive(g), vec![g, a, b]);
    }
}
