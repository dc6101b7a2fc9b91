//! Verdant Core - Core types and utilities for the Verdant world simulation
//!
//! This crate provides the foundational types used throughout the simulation:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and color types handed to the render collaborator
//! - Frame clock and the deferred timer queue

pub mod time;
pub mod timer;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3};
pub use time::{Clock, TimeConfig};
pub use timer::{TimerId, TimerQueue};
pub use types::{Color, EntityId, Hsl, Transform};
