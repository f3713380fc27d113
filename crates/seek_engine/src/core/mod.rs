//! # Core Module
//!
//! Shared configuration types read by every subsystem.
//!
//! ## Organization
//!
//! - **Config**: Game, viewport, camera, object and prop configuration

pub mod config;

pub use config::{
    CameraConfig,
    EngineConfig,
    GameConfig,
    ObjectConfig,
    SceneConfig,
    ViewportConfig,
    Config,
    ConfigError,
};
