//! Core engine types and utilities for Starfire.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial helpers
//! - Frame timing and the fixed-step accumulator

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
