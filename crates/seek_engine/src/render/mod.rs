//! Rendering-side primitives the engine needs for picking
//!
//! The renderer itself, lighting and orbit controls are owned by the host application.

pub mod camera;

pub use camera::Camera;
