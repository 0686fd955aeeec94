//! Spatial partitioning for broad-phase collision queries

pub mod quadtree;

pub use quadtree::{QuadNode, QuadTree, QuadTreeConfig, QuadTreeEntry, Quadrant};
