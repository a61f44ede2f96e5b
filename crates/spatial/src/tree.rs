//! QuadTree for spatial indexing.
//!
//! The tree is meant to be cleared and refilled every frame. Node slots are
//! pooled, so a steady rebuild loop reuses the same allocations.
//!
//! An object whose bounds straddle a quadrant boundary is stored in every
//! leaf it overlaps. Queries merge those leaves and report each object once.

use crate::config::TreeConfig;
use crate::node::{Entry, NodeId, TreeNode};
use crate::object::{Bounded, ObjectId, ObjectTable};
use crate::rect::Rectangle;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Reusable output of a range query.
///
/// Holds the result list and the identity bitset used to skip objects that
/// were already reported by another leaf. The bitset is sized by id value,
/// so it only tracks ids below [`QueryBuffer::DENSE_ID_LIMIT`]; larger ids
/// are checked against the result list instead. Ids handed out by
/// [`ObjectTable`] are dense and always take the bitset path.
#[derive(Debug, Clone, Default)]
pub struct QueryBuffer {
    results: Vec<ObjectId>,
    seen: FixedBitSet,
}

impl QueryBuffer {
    /// Ids at or above this value are not tracked in the bitset.
    pub const DENSE_ID_LIMIT: usize = 1 << 20;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(results: usize, ids: usize) -> Self {
        Self {
            results: Vec::with_capacity(results),
            seen: FixedBitSet::with_capacity(ids.min(Self::DENSE_ID_LIMIT)),
        }
    }

    /// Ids found by the last query, in leaf visitation order.
    #[inline]
    pub fn results(&self) -> &[ObjectId] {
        &self.results
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        let bit = id.index();
        if bit < Self::DENSE_ID_LIMIT {
            self.seen.contains(bit)
        } else {
            self.results.contains(&id)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.results.iter().copied()
    }

    pub fn into_vec(self) -> Vec<ObjectId> {
        self.results
    }

    /// Forget the previous results. Only the bits that were set are reset.
    pub fn clear(&mut self) {
        for id in self.results.drain(..) {
            if id.index() < self.seen.len() {
                self.seen.set(id.index(), false);
            }
        }
    }

    #[inline]
    fn push(&mut self, id: ObjectId) {
        let bit = id.index();
        if bit >= Self::DENSE_ID_LIMIT {
            if !self.results.contains(&id) {
                self.results.push(id);
            }
            return;
        }
        if bit >= self.seen.len() {
            self.seen.grow(bit + 1);
        }
        if !self.seen.put(bit) {
            self.results.push(id);
        }
    }
}

/// Shape of the tree at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Reachable nodes, root included.
    pub nodes: usize,
    pub leaves: usize,
    /// Depth of the deepest leaf.
    pub max_depth: u32,
    /// Largest member count of a single leaf.
    pub max_leaf_len: usize,
    /// Sum of leaf member counts. Straddling objects count once per leaf.
    pub memberships: usize,
}

/// QuadTree over a fixed world rectangle.
pub struct QuadTree {
    bound: Rectangle,
    config: TreeConfig,
    /// Node arena. Slot 0 is the root; slots at `live..` are pooled.
    nodes: Vec<TreeNode>,
    live: usize,
}

impl QuadTree {
    /// Create a tree with the default limits.
    pub fn new(bound: Rectangle) -> Self {
        Self::with_config(bound, TreeConfig::default())
    }

    pub fn with_config(bound: Rectangle, config: TreeConfig) -> Self {
        Self {
            bound,
            config,
            nodes: vec![TreeNode::new(bound, 0, None)],
            live: 1,
        }
    }

    #[inline]
    pub fn bound(&self) -> Rectangle {
        self.bound
    }

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    #[inline]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Get a node by id. Ids come from [`TreeNode::children`] or
    /// [`QuadTree::level_order`] and are invalidated by [`QuadTree::clear`].
    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        debug_assert!(id.index() < self.live, "stale node id {id:?}");
        &self.nodes[id.index()]
    }

    /// True when nothing has been inserted since the last clear.
    pub fn is_empty(&self) -> bool {
        self.live == 1 && self.root().is_empty()
    }

    /// Insert an object under `id`.
    ///
    /// The object's current bounds are captured. Returns how many leaves it
    /// was stored in; 0 means it overlapped none of the quadrants it reached
    /// (it lies outside the world bounds) and was dropped, or that every leaf
    /// it reached already held `id`.
    pub fn insert<O: Bounded + ?Sized>(&mut self, id: ObjectId, object: &O) -> usize {
        let entry = Entry {
            id,
            bound: object.bound(),
        };
        self.insert_at(NodeId::ROOT, entry)
    }

    fn insert_at(&mut self, node: NodeId, entry: Entry) -> usize {
        let current = &self.nodes[node.index()];
        let children = current.children;
        match children {
            None => {
                if current.depth() < self.config.max_depth
                    && current.len() + 1 > self.config.max_child_count
                {
                    self.subdivide(node);
                    self.insert_at(node, entry)
                } else {
                    usize::from(self.nodes[node.index()].add(entry.id, entry.bound))
                }
            }
            Some(children) => {
                let mut placed = 0;
                for child in children {
                    if self.nodes[child.index()].bound().intersects(&entry.bound) {
                        placed += self.insert_at(child, entry);
                    }
                }
                if placed == 0 {
                    trace!(object = %entry.id, ?node, "object overlaps no child quadrant, dropped");
                }
                placed
            }
        }
    }

    /// Split a leaf into four quadrants and hand its members down.
    fn subdivide(&mut self, node: NodeId) {
        let current = &self.nodes[node.index()];
        debug_assert!(current.is_leaf(), "subdivide called on internal node {node:?}");
        let depth = current.depth() + 1;
        let quadrants = current.bound().quadrants();

        let children = quadrants.map(|bound| self.alloc(bound, depth, Some(node)));

        let mut entries = std::mem::take(&mut self.nodes[node.index()].entries);
        self.nodes[node.index()].children = Some(children);

        for entry in &entries {
            let mut placed = false;
            for child in children {
                let child = &mut self.nodes[child.index()];
                if child.bound().intersects(&entry.bound) {
                    child.add(entry.id, entry.bound);
                    placed = true;
                }
            }
            if !placed {
                trace!(object = %entry.id, ?node, "member overlaps no child quadrant, dropped");
            }
        }

        trace!(?node, depth, members = entries.len(), "subdivided");

        // Hand the emptied allocation back so the slot keeps its capacity
        entries.clear();
        self.nodes[node.index()].entries = entries;
    }

    fn alloc(&mut self, bound: Rectangle, depth: u32, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.live as u32);
        match self.nodes.get_mut(self.live) {
            Some(slot) => slot.reset(bound, depth, parent),
            None => self.nodes.push(TreeNode::new(bound, depth, parent)),
        }
        self.live += 1;
        id
    }

    /// Reset to a single empty leaf over the same world bounds.
    pub fn clear(&mut self) {
        self.live = 1;
        self.nodes[NodeId::ROOT.index()].reset(self.bound, 0, None);
    }

    /// Clear, then insert every object of the table.
    pub fn rebuild<T: Bounded>(&mut self, objects: &ObjectTable<T>) {
        self.clear();
        for (id, object) in objects.iter() {
            self.insert(id, object);
        }
    }

    /// Remove an object from every leaf holding it.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.nodes[..self.live]
            .iter_mut()
            .filter(|node| node.is_leaf())
            .fold(false, |removed, node| node.remove(id) | removed)
    }

    /// Find every member of every leaf that overlaps `range`.
    ///
    /// This is a broad phase: members are not tested against `range`
    /// themselves, so the result may hold objects near but outside it.
    pub fn query_range(&self, range: &Rectangle) -> Vec<ObjectId> {
        let mut buffer = QueryBuffer::new();
        self.query_range_into(range, &mut buffer);
        buffer.into_vec()
    }

    /// [`QuadTree::query_range`] writing into a reusable buffer.
    pub fn query_range_into(&self, range: &Rectangle, buffer: &mut QueryBuffer) {
        buffer.clear();
        if self.root().bound().intersects(range) {
            self.collect(NodeId::ROOT, range, false, buffer);
        }
    }

    /// Find the objects whose own bounds overlap `range`.
    pub fn query_intersecting(&self, range: &Rectangle) -> Vec<ObjectId> {
        let mut buffer = QueryBuffer::new();
        self.query_intersecting_into(range, &mut buffer);
        buffer.into_vec()
    }

    /// [`QuadTree::query_intersecting`] writing into a reusable buffer.
    pub fn query_intersecting_into(&self, range: &Rectangle, buffer: &mut QueryBuffer) {
        buffer.clear();
        if self.root().bound().intersects(range) {
            self.collect(NodeId::ROOT, range, true, buffer);
        }
    }

    fn collect(&self, node: NodeId, range: &Rectangle, exact: bool, buffer: &mut QueryBuffer) {
        let current = &self.nodes[node.index()];
        match current.children {
            None => {
                for entry in &current.entries {
                    if !exact || entry.bound.intersects(range) {
                        buffer.push(entry.id);
                    }
                }
            }
            Some(children) => {
                for child in children {
                    if self.nodes[child.index()].bound().intersects(range) {
                        self.collect(child, range, exact, buffer);
                    }
                }
            }
        }
    }

    /// Walk every node breadth first, starting at the root.
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder {
            tree: self,
            queue: VecDeque::from([NodeId::ROOT]),
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for (_, node) in self.level_order() {
            stats.nodes += 1;
            if node.is_leaf() {
                stats.leaves += 1;
                stats.max_depth = stats.max_depth.max(node.depth());
                stats.max_leaf_len = stats.max_leaf_len.max(node.len());
                stats.memberships += node.len();
            }
        }
        stats
    }
}

impl fmt::Debug for QuadTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("bound", &self.bound)
            .field("config", &self.config)
            .field("nodes", &self.live)
            .field("pooled", &(self.nodes.len() - self.live))
            .finish()
    }
}

/// Breadth-first iterator over the nodes of a [`QuadTree`].
#[derive(Debug)]
pub struct LevelOrder<'a> {
    tree: &'a QuadTree,
    queue: VecDeque<NodeId>,
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let node = &self.tree.nodes[id.index()];
        if let Some(children) = node.children() {
            self.queue.extend(children);
        }
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn world() -> QuadTree {
        QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0))
    }

    fn id(raw: u32) -> ObjectId {
        ObjectId::new(raw)
    }

    fn assert_unique(ids: &[ObjectId]) {
        let set: HashSet<_> = ids.iter().collect();
        assert_eq!(set.len(), ids.len(), "duplicate ids in {ids:?}");
    }

    #[test]
    fn test_insert_find() {
        let mut tree = world();
        tree.insert(id(1), &Rectangle::new(0.0, 0.0, 2.0, 2.0));
        tree.insert(id(2), &Rectangle::new(30.0, 30.0, 2.0, 2.0));
        tree.insert(id(3), &Rectangle::new(-30.0, -30.0, 2.0, 2.0));

        let found = tree.query_intersecting(&Rectangle::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(found, vec![id(1)]);

        let found = tree.query_intersecting(&Rectangle::new(30.0, 30.0, 10.0, 10.0));
        assert_eq!(found, vec![id(2)]);
    }

    #[test]
    fn test_random_objects_are_found_by_their_own_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = world();
        let mut objects = Vec::new();
        for raw in 0..20 {
            let x = rng.random_range(-49.5f32..49.5);
            let y = rng.random_range(-49.5f32..49.5);
            let bound = Rectangle::new(x, y, 1.0, 1.0);
            tree.insert(id(raw), &bound);
            objects.push((id(raw), bound));
        }

        for (object, bound) in &objects {
            assert!(tree.query_range(bound).contains(object), "{object} not found");
        }

        let all = tree.query_range(&tree.bound());
        assert_eq!(all.len(), 20);
        assert_unique(&all);
    }

    #[test]
    fn test_containment_holds_under_heavy_load() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut table = ObjectTable::new();
        for _ in 0..500 {
            let x = rng.random_range(-48.0f32..48.0);
            let y = rng.random_range(-48.0f32..48.0);
            let w = rng.random_range(0.5f32..4.0);
            let h = rng.random_range(0.5f32..4.0);
            table.insert(Rectangle::new(x, y, w, h));
        }

        let mut tree = world();
        tree.rebuild(&table);

        let mut buffer = QueryBuffer::new();
        for (object, bound) in table.iter() {
            tree.query_range_into(bound, &mut buffer);
            assert!(buffer.contains(object));
            assert_unique(buffer.results());
        }
        assert!(tree.stats().max_depth <= tree.config().max_depth);
    }

    #[test]
    fn test_straddling_object_reported_once() {
        let mut tree = world();
        // Fill the root so the next insert subdivides
        for raw in 0..4 {
            let offset = raw as f32 * 5.0;
            tree.insert(id(raw), &Rectangle::new(-40.0 + offset, 40.0, 1.0, 1.0));
        }
        // Centered on the origin: overlaps all four quadrants
        let placed = tree.insert(id(99), &Rectangle::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(placed, 4);

        let found = tree.query_range(&tree.bound());
        assert_unique(&found);
        assert_eq!(found.iter().filter(|&&o| o == id(99)).count(), 1);
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_reinserting_same_id_stores_nothing() {
        let mut tree = world();
        let bound = Rectangle::new(-30.0, 30.0, 1.0, 1.0);
        assert_eq!(tree.insert(id(1), &bound), 1);
        assert_eq!(tree.insert(id(1), &bound), 0);

        for raw in 2..6 {
            tree.insert(id(raw), &Rectangle::new(-40.0 + raw as f32 * 2.0, 40.0, 1.0, 1.0));
        }
        let center = Rectangle::new(0.0, 0.0, 4.0, 4.0);
        assert_eq!(tree.insert(id(99), &center), 4);
        assert_eq!(tree.insert(id(99), &center), 0);
        assert_eq!(tree.stats().memberships, 5 + 4);
    }

    #[test]
    fn test_sparse_ids_skip_bitset() {
        let mut tree = world();
        for raw in 0..4 {
            tree.insert(id(raw), &Rectangle::new(-40.0 + raw as f32 * 5.0, 40.0, 1.0, 1.0));
        }
        let far_id = id(u32::MAX);
        assert_eq!(tree.insert(far_id, &Rectangle::new(0.0, 0.0, 4.0, 4.0)), 4);

        let mut buffer = QueryBuffer::new();
        tree.query_range_into(&tree.bound(), &mut buffer);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.iter().filter(|&o| o == far_id).count(), 1);
        assert!(buffer.contains(far_id));
        assert!(buffer.seen.len() < QueryBuffer::DENSE_ID_LIMIT);

        buffer.clear();
        assert!(!buffer.contains(far_id));
    }

    #[test]
    fn test_fifth_object_triggers_exactly_one_subdivision() {
        let mut tree = world();
        let bounds = [
            Rectangle::new(-25.0, 25.0, 1.0, 1.0),
            Rectangle::new(25.0, 25.0, 1.0, 1.0),
            Rectangle::new(25.0, -25.0, 1.0, 1.0),
            Rectangle::new(-25.0, -25.0, 1.0, 1.0),
        ];
        for (raw, bound) in bounds.iter().enumerate() {
            tree.insert(id(raw as u32), bound);
        }
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().len(), 4);

        tree.insert(id(4), &Rectangle::new(-10.0, 10.0, 1.0, 1.0));

        let stats = tree.stats();
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.memberships, 5);

        let root = tree.root();
        assert!(!root.is_leaf());
        assert!(root.is_empty());
        let [lt, rt, rb, lb] = root.children().unwrap();
        assert_eq!(tree.node(lt).members().collect::<Vec<_>>(), vec![id(0), id(4)]);
        assert_eq!(tree.node(rt).members().collect::<Vec<_>>(), vec![id(1)]);
        assert_eq!(tree.node(rb).members().collect::<Vec<_>>(), vec![id(2)]);
        assert_eq!(tree.node(lb).members().collect::<Vec<_>>(), vec![id(3)]);
        for child in [lt, rt, rb, lb] {
            assert_eq!(tree.node(child).depth(), 1);
            assert_eq!(tree.node(child).parent(), Some(NodeId::ROOT));
        }
    }

    #[test]
    fn test_quadrant_sized_object_stays_in_one_child() {
        let mut tree = world();
        for raw in 0..4 {
            tree.insert(id(raw), &Rectangle::new(20.0 + raw as f32, -20.0, 1.0, 1.0));
        }
        // Exactly the left-top quadrant: it only touches the other three
        let placed = tree.insert(id(10), &Rectangle::new(-25.0, 25.0, 50.0, 50.0));
        assert_eq!(placed, 1);
        let [lt, ..] = tree.root().children().unwrap();
        assert!(tree.node(lt).contains(id(10)));
    }

    #[test]
    fn test_depth_never_exceeds_limit() {
        let mut tree = world();
        for raw in 0..100 {
            let jitter = raw as f32 * 0.001;
            tree.insert(id(raw), &Rectangle::new(10.0 + jitter, 10.0, 0.1, 0.1));
        }
        for (_, node) in tree.level_order() {
            assert!(node.depth() <= TreeConfig::DEFAULT_MAX_DEPTH);
        }
        let stats = tree.stats();
        assert_eq!(stats.max_depth, TreeConfig::DEFAULT_MAX_DEPTH);
        // Capacity is not enforced at the depth limit
        assert_eq!(stats.max_leaf_len, 100);
    }

    #[test]
    fn test_cluster_at_origin_stays_retrievable() {
        let mut tree = world();
        for raw in 0..5 {
            tree.insert(id(raw), &Rectangle::new(0.0, 0.0, 0.1, 0.1));
        }
        assert!(!tree.root().is_leaf());

        let found = tree.query_range(&Rectangle::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(found.len(), 5);
        assert_unique(&found);
        for raw in 0..5 {
            assert!(found.contains(&id(raw)));
        }
    }

    #[test]
    fn test_far_corner_query() {
        let mut tree = world();
        tree.insert(id(0), &Rectangle::new(0.0, 0.0, 1.0, 1.0));
        let corner = Rectangle::new(50.0, 50.0, 1.0, 1.0);

        assert!(tree.query_intersecting(&corner).is_empty());
        // The root is still a leaf overlapping the corner, so the broad phase
        // reports its only member.
        assert_eq!(tree.query_range(&corner), vec![id(0)]);

        // Outside the world entirely
        assert!(tree.query_range(&Rectangle::new(80.0, 80.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_broad_phase_is_leaf_granular() {
        let mut tree = world();
        for raw in 0..4 {
            tree.insert(id(raw), &Rectangle::new(-40.0 + raw as f32 * 2.0, 40.0, 1.0, 1.0));
        }
        tree.insert(id(4), &Rectangle::new(40.0, -40.0, 1.0, 1.0));

        // Overlaps the left-top leaf but none of its members
        let range = Rectangle::new(-10.0, 10.0, 2.0, 2.0);
        assert_eq!(tree.query_range(&range), vec![id(0), id(1), id(2), id(3)]);
        assert!(tree.query_intersecting(&range).is_empty());

        // The right-top leaf is empty
        assert!(tree.query_range(&Rectangle::new(10.0, 10.0, 2.0, 2.0)).is_empty());
        assert_eq!(tree.query_range(&Rectangle::new(10.0, -10.0, 2.0, 2.0)), vec![id(4)]);
    }

    #[test]
    fn test_clear_empties_tree() {
        let mut tree = world();
        for raw in 0..50 {
            tree.insert(id(raw), &Rectangle::new(raw as f32 - 25.0, 0.0, 1.0, 1.0));
        }
        assert!(!tree.is_empty());

        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().depth(), 0);
        assert_eq!(tree.root().parent(), None);
        assert_eq!(tree.root().bound(), Rectangle::new(0.0, 0.0, 100.0, 100.0));
        assert!(tree.query_range(&tree.bound()).is_empty());

        tree.clear();
        assert!(tree.query_range(&tree.bound()).is_empty());
    }

    #[test]
    fn test_rebuild_reuses_node_slots() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut table = ObjectTable::new();
        for _ in 0..200 {
            let x = rng.random_range(-45.0f32..45.0);
            let y = rng.random_range(-45.0f32..45.0);
            table.insert(Rectangle::new(x, y, 1.0, 1.0));
        }

        let mut tree = world();
        tree.rebuild(&table);
        let first = tree.stats();
        let allocated = tree.nodes.len();

        for _ in 0..10 {
            tree.rebuild(&table);
        }
        assert_eq!(tree.stats(), first);
        assert_eq!(tree.nodes.len(), allocated);
        assert_eq!(tree.query_range(&tree.bound()).len(), 200);
    }

    #[test]
    fn test_moving_objects_rebuild() {
        let mut table = ObjectTable::new();
        let a = table.insert(Rectangle::new(-30.0, -30.0, 1.0, 1.0));
        let b = table.insert(Rectangle::new(30.0, 30.0, 1.0, 1.0));
        let mut tree = world();
        tree.rebuild(&table);

        let probe = Rectangle::new(30.0, 30.0, 4.0, 4.0);
        assert_eq!(tree.query_intersecting(&probe), vec![b]);

        let _ = table.get_mut(a).unwrap().reposition(30.5, 30.5);
        tree.rebuild(&table);
        let found = tree.query_intersecting(&probe);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&a));
    }

    #[test]
    fn test_remove_from_all_leaves() {
        let mut tree = world();
        for raw in 0..4 {
            tree.insert(id(raw), &Rectangle::new(-40.0, 40.0 - raw as f32 * 3.0, 1.0, 1.0));
        }
        tree.insert(id(9), &Rectangle::new(0.0, 0.0, 2.0, 2.0));

        assert!(tree.remove(id(9)));
        assert!(!tree.remove(id(9)));
        let found = tree.query_range(&tree.bound());
        assert_eq!(found.len(), 4);
        assert!(!found.contains(&id(9)));
    }

    #[test]
    fn test_outside_object_is_dropped_after_subdivision() {
        let mut tree = world();
        // Accepted while the root is a leaf
        assert_eq!(tree.insert(id(0), &Rectangle::new(200.0, 200.0, 1.0, 1.0)), 1);
        for raw in 1..5 {
            tree.insert(id(raw), &Rectangle::new(raw as f32 * 5.0, 5.0, 1.0, 1.0));
        }
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.stats().memberships, 4);
        assert_eq!(tree.insert(id(5), &Rectangle::new(-200.0, 0.0, 1.0, 1.0)), 0);
    }

    #[test]
    fn test_level_order_visits_each_node_once() {
        let mut tree = world();
        for raw in 0..40 {
            let x = (raw % 8) as f32 * 10.0 - 35.0;
            let y = (raw / 8) as f32 * 10.0 - 20.0;
            tree.insert(id(raw), &Rectangle::new(x, y, 1.0, 1.0));
        }

        let visited: Vec<_> = tree.level_order().collect();
        let unique: HashSet<_> = visited.iter().map(|(node, _)| *node).collect();
        assert_eq!(unique.len(), visited.len());
        assert_eq!(visited.len(), tree.stats().nodes);
        assert_eq!(visited[0].0, NodeId::ROOT);
        // Breadth first: depth never decreases
        for pair in visited.windows(2) {
            assert!(pair[0].1.depth() <= pair[1].1.depth());
        }
    }

    #[test]
    fn test_custom_limits() {
        let config = TreeConfig::new(2, 1);
        let mut tree = QuadTree::with_config(Rectangle::new(0.0, 0.0, 16.0, 16.0), config);
        for raw in 0..6 {
            tree.insert(id(raw), &Rectangle::new(-6.0 + raw as f32 * 0.1, 6.0, 0.05, 0.05));
        }
        let stats = tree.stats();
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.max_leaf_len, 6);
        assert_eq!(tree.query_range(&tree.bound()).len(), 6);
    }

    #[test]
    fn test_query_buffer_reuse() {
        let mut tree = world();
        tree.insert(id(3), &Rectangle::new(-20.0, 0.0, 1.0, 1.0));
        tree.insert(id(700), &Rectangle::new(20.0, 0.0, 1.0, 1.0));

        let mut buffer = QueryBuffer::with_capacity(4, 8);
        tree.query_range_into(&tree.bound(), &mut buffer);
        assert_eq!(buffer.len(), 2);

        tree.query_intersecting_into(&Rectangle::new(20.0, 0.0, 2.0, 2.0), &mut buffer);
        assert_eq!(buffer.results(), &[id(700)]);
        assert!(!buffer.contains(id(3)));

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.contains(id(700)));
    }
}
