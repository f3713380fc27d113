//! # Seek Engine
//!
//! Interaction and game-state engine for single-scene "find the hidden objects" games.
//!
//! ## Features
//!
//! - **Object Registry**: Maps visual-node names (aliases) to logical game objects
//! - **Scene Index**: Handle-based scene graph arena with ray intersection queries
//! - **Hit Resolution**: Pointer → ray → nearest named ancestor → distance gate → object
//! - **Game State Machine**: Idle / Running / Won lifecycle with timer and checklist
//! - **Configuration**: Scene descriptors and prop placement loaded from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seek_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::load_from_file("resources/config/house.toml")?;
//!     config.validate()?;
//!
//!     let mut scene = SceneIndex::new();
//!     assemble_props(&config.scene.props, &mut scene)?;
//!
//!     let camera = config.scene.camera.to_camera(config.viewport.aspect_ratio());
//!     let mut game = GameStateMachine::new(HitResolver::new(config.scene.detection_radius));
//!     game.install_registry(config.scene.build_registry()?)?;
//!     game.start_game()?;
//!
//!     let click = PointerEvent::new(640.0, 360.0, 1280.0, 720.0);
//!     game.pointer_click(&click, &camera, &mut scene)?;
//!     println!("{:?}", game.snapshot());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod events;
pub mod input;
pub mod render;
pub mod scene;
pub mod picking;
pub mod game;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{CameraConfig, EngineConfig, GameConfig, ObjectConfig, SceneConfig, ViewportConfig},
        events::{EventQueue, GameEvent},
        foundation::{
            math::{Vec3, Mat4, Transform},
            time::SecondTicker,
        },
        game::{
            GameError, GameObjectDescriptor, GameStateMachine, ClickOutcome, ObjectId,
            ObjectRegistry, Phase, RegistryError, SessionSnapshot,
        },
        input::PointerEvent,
        picking::{HitResolver, MissReason, Resolution},
        render::Camera,
        scene::{
            assemble_props, NodeHandle, PartPlacement, PropPlacement, SceneError, SceneIndex,
            SceneQuery, VisibilitySink,
        },
    };
}
