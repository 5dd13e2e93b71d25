//! # VOIDRIFT Shared
//!
//! Common types used by the world generator and every collaborator that
//! consumes its output (simulation, renderer, network hand-off).
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - Any GPU, window, or audio crate
//! - Anything with platform-specific behavior
//!
//! Everything here is part of the world format; keep it pure data.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod math;

pub use constants::{CHUNK_SIZE_UNITS, DEFAULT_LOAD_RADIUS, DEFAULT_UNLOAD_RADIUS};
pub use ids::{EnemyId, PortalId};
pub use math::Vec2;
