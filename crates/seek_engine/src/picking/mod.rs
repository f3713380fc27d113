//! Picking: turning pointer clicks into game objects

pub mod hit_resolver;

pub use hit_resolver::{named_ancestor, HitResolver, MissReason, Resolution};
