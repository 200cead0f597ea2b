//! Vantage Core - Foundational types for the Vantage viewer
//!
//! This crate provides the types shared by every stage of the pipeline:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for scene-node positioning
//! - Axis-aligned bounding boxes
//! - Colors

pub mod bounds;
pub mod types;

pub use bounds::Aabb;
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use types::{Color, Transform};
