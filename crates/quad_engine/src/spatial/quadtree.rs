//! Quad-tree spatial partitioning structure
//!
//! Divides the 2D world into hierarchical quadrants so that a collider is only
//! tested against colliders that share its quadrant lineage. A node splits
//! into four children once it directly holds more entries than the configured
//! threshold. Entries that straddle a child boundary stay at the node where
//! they stopped fitting.
//!
//! The tree carries no cross-frame state: the registry clears and rebuilds it
//! every tick from the live collider set.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rect, Vec2};
use crate::world::ColliderId;

/// Configuration for quad-tree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Direct entries a node may hold before it splits
    pub max_colliders_per_node: usize,

    /// Deepest level a node may split at
    pub max_depth: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_colliders_per_node: 4,
            max_depth: 50,
        }
    }
}

/// One of the four children of a split node (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Right-top
    NorthEast = 0,
    /// Left-top
    NorthWest = 1,
    /// Left-bottom
    SouthWest = 2,
    /// Right-bottom
    SouthEast = 3,
}

impl Quadrant {
    /// All quadrants in child storage order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Child slot of this quadrant
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Collider stored in the quad-tree with its world-space bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeEntry {
    /// Collider handle
    pub id: ColliderId,
    /// Axis-aligned bounds at insertion time
    pub bounds: Rect,
}

/// Single node in the quad-tree hierarchy
#[derive(Debug, Clone)]
pub struct QuadNode {
    /// World-space bounds of this node
    pub bounds: Rect,

    /// Entries held directly by this node
    pub entries: Vec<QuadTreeEntry>,

    /// Child nodes in [`Quadrant::ALL`] order, None if this is a leaf
    pub children: Option<Box<[QuadNode; 4]>>,

    /// Depth in the tree (0 = root)
    pub level: u32,
}

impl QuadNode {
    /// Create a new leaf node
    pub fn new(bounds: Rect, level: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            level,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Quadrant of `node` that fully contains `item`
    ///
    /// Measured against the node midpoints; anything touching or crossing a
    /// midpoint, or reaching outside the node, belongs to no single quadrant.
    pub fn quadrant_for(node: &Rect, item: &Rect) -> Option<Quadrant> {
        let mid = node.center();

        let north = item.max.y < mid.y && item.min.y >= node.min.y;
        let south = item.min.y > mid.y && item.max.y <= node.max.y;
        let west = item.max.x < mid.x && item.min.x >= node.min.x;
        let east = item.min.x > mid.x && item.max.x <= node.max.x;

        match (north, south, west, east) {
            (true, _, _, true) => Some(Quadrant::NorthEast),
            (true, _, true, _) => Some(Quadrant::NorthWest),
            (_, true, true, _) => Some(Quadrant::SouthWest),
            (_, true, _, true) => Some(Quadrant::SouthEast),
            _ => None,
        }
    }

    /// Split this node into 4 equally sized children
    fn split(&mut self) {
        if self.children.is_some() {
            return; // Already split
        }

        let Rect { min, max } = self.bounds;
        let mid = self.bounds.center();
        let level = self.level + 1;

        self.children = Some(Box::new([
            QuadNode::new(Rect::new(Vec2::new(mid.x, min.y), Vec2::new(max.x, mid.y)), level),
            QuadNode::new(Rect::new(min, mid), level),
            QuadNode::new(Rect::new(Vec2::new(min.x, mid.y), Vec2::new(mid.x, max.y)), level),
            QuadNode::new(Rect::new(mid, max), level),
        ]));
    }

    /// Insert an entry into this node or the child that fully contains it
    pub fn insert(&mut self, entry: QuadTreeEntry, config: &QuadTreeConfig) {
        let bounds = self.bounds;

        if let Some(ref mut children) = self.children {
            if let Some(quadrant) = Self::quadrant_for(&bounds, &entry.bounds) {
                children[quadrant.index()].insert(entry, config);
                return;
            }
        }

        self.entries.push(entry);

        if self.entries.len() > config.max_colliders_per_node && self.level < config.max_depth {
            self.split();

            // Push down everything that now fits a single child
            let held = std::mem::take(&mut self.entries);
            if let Some(ref mut children) = self.children {
                for held_entry in held {
                    match Self::quadrant_for(&bounds, &held_entry.bounds) {
                        Some(quadrant) => children[quadrant.index()].insert(held_entry, config),
                        None => self.entries.push(held_entry),
                    }
                }
            }
        }
    }

    /// Collect the entries along the descent path of `query`
    ///
    /// Children are visited before this node's own entries are appended.
    /// Returns false when the descent stopped at a split node because the
    /// query fits none of its children; entries below that node are then not
    /// in `results`.
    pub fn retrieve(&self, results: &mut Vec<ColliderId>, query: &Rect) -> bool {
        let settled = match self.children {
            Some(ref children) => match Self::quadrant_for(&self.bounds, query) {
                Some(quadrant) => children[quadrant.index()].retrieve(results, query),
                None => false,
            },
            None => true,
        };

        results.extend(self.entries.iter().map(|entry| entry.id));
        settled
    }

    /// Drop all entries and children
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children = None;
    }

    /// Count total entries in this node and all children
    pub fn count_entries(&self) -> usize {
        let mut count = self.entries.len();

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_entries();
            }
        }

        count
    }

    /// Number of nodes in this subtree, including this one
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(QuadNode::count_nodes).sum())
    }

    /// Deepest level below (or at) this node
    pub fn max_level(&self) -> u32 {
        self.children.as_ref().map_or(self.level, |children| {
            children.iter().map(QuadNode::max_level).max().unwrap_or(self.level)
        })
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a QuadNode>) {
        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.get_all_leaves(leaves);
            }
        } else {
            leaves.push(self);
        }
    }
}

/// Quad-tree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct QuadTree {
    /// Root node covering the world bounds
    root: QuadNode,

    /// Configuration
    config: QuadTreeConfig,
}

impl QuadTree {
    /// Create a new quad-tree with given world bounds
    pub fn new(world_bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadNode::new(world_bounds, 0),
            config,
        }
    }

    /// Insert a collider with its current bounds
    pub fn insert(&mut self, id: ColliderId, bounds: Rect) {
        self.root.insert(QuadTreeEntry { id, bounds }, &self.config);
    }

    /// Append every collider that could overlap `query` to `results`
    ///
    /// Returns the root-level quadrant of the query, or `None` when the query
    /// straddles a split boundary somewhere along its descent (or lies outside
    /// the world bounds). In that case `results` is incomplete and the caller
    /// must fall back to testing every collider.
    pub fn retrieve(&self, results: &mut Vec<ColliderId>, query: &Rect) -> Option<Quadrant> {
        let root_quadrant = QuadNode::quadrant_for(&self.root.bounds, query);
        let settled = self.root.retrieve(results, query);

        if settled {
            root_quadrant
        } else {
            None
        }
    }

    /// Clear the quad-tree
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Get total entry count
    pub fn len(&self) -> usize {
        self.root.count_entries()
    }

    /// Whether the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest split level (0 when the root is a leaf)
    pub fn depth(&self) -> u32 {
        self.root.max_level()
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// World bounds covered by the root
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Configuration in use
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Root node (for visualization)
    pub fn root(&self) -> &QuadNode {
        &self.root
    }

    /// Bounds of every leaf, for debug overlays
    pub fn leaf_bounds(&self) -> Vec<Rect> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves.into_iter().map(|leaf| leaf.bounds).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn world() -> Rect {
        Rect::from_origin_size(0.0, 0.0, 100.0, 100.0)
    }

    fn square(x: f32, y: f32) -> Rect {
        Rect::from_center_extents(Vec2::new(x, y), Vec2::new(2.0, 2.0))
    }

    #[test]
    fn test_quadrant_membership() {
        let bounds = world();
        assert_eq!(QuadNode::quadrant_for(&bounds, &square(75.0, 25.0)), Some(Quadrant::NorthEast));
        assert_eq!(QuadNode::quadrant_for(&bounds, &square(25.0, 25.0)), Some(Quadrant::NorthWest));
        assert_eq!(QuadNode::quadrant_for(&bounds, &square(25.0, 75.0)), Some(Quadrant::SouthWest));
        assert_eq!(QuadNode::quadrant_for(&bounds, &square(75.0, 75.0)), Some(Quadrant::SouthEast));

        // Crossing the vertical midpoint
        assert_eq!(QuadNode::quadrant_for(&bounds, &square(49.0, 25.0)), None);
        // Outside the node entirely
        assert_eq!(QuadNode::quadrant_for(&bounds, &square(150.0, 25.0)), None);
    }

    #[test]
    fn test_split_after_threshold() {
        let mut ids = SlotMap::<ColliderId, ()>::with_key();
        let mut tree = QuadTree::new(world(), QuadTreeConfig::default());

        for i in 0..4 {
            tree.insert(ids.insert(()), square(10.0 + i as f32 * 5.0, 10.0));
        }
        assert!(tree.root().is_leaf());

        tree.insert(ids.insert(()), square(80.0, 80.0));
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.len(), 5);
        assert!(tree.root().entries.is_empty());
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_straddlers_stay_at_parent() {
        let mut ids = SlotMap::<ColliderId, ()>::with_key();
        let mut tree = QuadTree::new(world(), QuadTreeConfig::default());

        let straddler = ids.insert(());
        tree.insert(straddler, square(50.0, 50.0));
        for i in 0..4 {
            tree.insert(ids.insert(()), square(10.0 + i as f32 * 5.0, 10.0));
        }

        assert_eq!(tree.root().entries.len(), 1);
        assert_eq!(tree.root().entries[0].id, straddler);
    }

    #[test]
    fn test_retrieve_is_limited_to_quadrant_lineage() {
        let mut ids = SlotMap::<ColliderId, ()>::with_key();
        let mut tree = QuadTree::new(world(), QuadTreeConfig::default());

        let north_west: Vec<_> = (0..3).map(|_| ids.insert(())).collect();
        let south_east: Vec<_> = (0..3).map(|_| ids.insert(())).collect();
        let straddler = ids.insert(());

        for (i, id) in north_west.iter().enumerate() {
            tree.insert(*id, square(10.0 + i as f32 * 10.0, 10.0));
        }
        for (i, id) in south_east.iter().enumerate() {
            tree.insert(*id, square(60.0 + i as f32 * 10.0, 90.0));
        }
        tree.insert(straddler, square(50.0, 10.0));

        let mut results = Vec::new();
        let quadrant = tree.retrieve(&mut results, &square(20.0, 20.0));

        assert_eq!(quadrant, Some(Quadrant::NorthWest));
        assert_eq!(results.len(), 4);
        for id in &north_west {
            assert!(results.contains(id));
        }
        assert!(results.contains(&straddler));
        for id in &south_east {
            assert!(!results.contains(id));
        }
    }

    #[test]
    fn test_retrieve_reports_straddling_queries() {
        let mut ids = SlotMap::<ColliderId, ()>::with_key();
        let mut tree = QuadTree::new(world(), QuadTreeConfig::default());
        for i in 0..6 {
            tree.insert(ids.insert(()), square(10.0 + i as f32 * 6.0, 80.0));
        }

        let mut results = Vec::new();
        assert_eq!(tree.retrieve(&mut results, &square(50.0, 50.0)), None);

        results.clear();
        assert_eq!(tree.retrieve(&mut results, &square(250.0, 50.0)), None);
    }

    #[test]
    fn test_max_depth_keeps_overflow() {
        let mut ids = SlotMap::<ColliderId, ()>::with_key();
        let config = QuadTreeConfig { max_colliders_per_node: 1, max_depth: 2 };
        let mut tree = QuadTree::new(world(), config);

        // All at the same spot: splitting can never separate them
        for _ in 0..6 {
            tree.insert(ids.insert(()), square(10.0, 10.0));
        }

        assert_eq!(tree.len(), 6);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_clear_round_trip() {
        let mut ids = SlotMap::<ColliderId, ()>::with_key();
        let mut tree = QuadTree::new(world(), QuadTreeConfig::default());
        for i in 0..20 {
            tree.insert(ids.insert(()), square(5.0 + i as f32 * 4.5, 5.0 + i as f32 * 4.5));
        }
        assert!(tree.depth() > 0);

        tree.clear();

        let mut results = Vec::new();
        tree.retrieve(&mut results, &square(10.0, 10.0));
        assert!(results.is_empty());
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_bounds(), vec![world()]);
    }
}
