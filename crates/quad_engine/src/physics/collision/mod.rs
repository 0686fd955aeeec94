//! Collider geometry and narrow-phase intersection tests
//!
//! # Architecture
//!
//! - **Model Space Storage**: [`ColliderShape`] only stores dimensions
//! - **On-Demand Placement**: shapes become [`WorldSpaceShape`]s at the
//!   collider's absolute center only while being tested
//! - **Owner Handles**: a [`Collider`] refers to its entity through an
//!   [`EntityId`](crate::world::EntityId), never a reference
//!
//! # Module Organization
//!
//! - [`primitives`] - World-space circles and overlap math
//! - [`shape`] - Tagged shape variants
//! - [`collider`] - Collider metadata attached to entities

pub mod primitives;
pub mod shape;
pub mod collider;

// Re-export commonly used types
pub use primitives::Circle;
pub use shape::{ColliderShape, ShapeKind, WorldSpaceShape};
pub use collider::Collider;
