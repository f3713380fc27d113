//! Game state machine
//!
//! Owns the session (phase, score, checklist, timer, message) and the object registry.
//! Lifecycle:
//!
//! ```text
//! Idle --start_game--> Running --pointer_click (last object)--> Won --play_again--> Idle
//! ```
//!
//! Clicks outside `Running` are ignored. The whole-second ticker is armed on entering
//! `Running` and disarmed on leaving it, so nothing ticks a finished or torn-down session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::{EventHandler, EventQueue, GameEvent};
use crate::foundation::time::{format_clock, SecondTicker};
use crate::input::PointerEvent;
use crate::picking::{HitResolver, MissReason, Resolution};
use crate::render::Camera;
use crate::scene::{SceneQuery, VisibilitySink};
use super::error::GameError;
use super::registry::{GameObjectDescriptor, ObjectId, ObjectRegistry};

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to start
    #[default]
    Idle,
    /// Objects are being searched for
    Running,
    /// Every object was found
    Won,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Won => "won",
        };
        f.write_str(name)
    }
}

/// What a pointer click did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Not running; the click was dropped
    Ignored,
    /// The click did not select a game object
    Missed(MissReason),
    /// The object under the pointer was already found
    AlreadyFound(ObjectId),
    /// A new object was found
    Found {
        /// Object identifier
        id: ObjectId,
        /// Checklist label
        label: String,
    },
    /// The last object was found and the session is won
    Won {
        /// Object identifier
        id: ObjectId,
        /// Checklist label
        label: String,
        /// Final time in whole seconds
        elapsed_seconds: u32,
    },
}

/// Read-only copy of the session for presentation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Objects found so far
    pub score: usize,
    /// Objects in this session
    pub total: usize,
    /// Labels still to find, in registration order
    pub remaining: Vec<String>,
    /// Whole seconds played
    pub elapsed_seconds: u32,
    /// Last feedback message, possibly empty
    pub message: String,
}

impl SessionSnapshot {
    /// Elapsed time as `mm:ss`
    pub fn elapsed_clock(&self) -> String {
        format_clock(self.elapsed_seconds)
    }

    /// Whether the session has been won
    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }
}

#[derive(Debug, Default)]
struct SessionState {
    phase: Phase,
    score: usize,
    total: usize,
    remaining: Vec<ObjectId>,
    elapsed_seconds: u32,
    message: String,
}

/// Drives one hidden-object session at a time
#[derive(Debug)]
pub struct GameStateMachine {
    resolver: HitResolver,
    registry: ObjectRegistry,
    session: SessionState,
    ticker: SecondTicker,
    events: EventQueue,
}

impl GameStateMachine {
    /// Create an idle machine with an empty registry
    pub fn new(resolver: HitResolver) -> Self {
        Self {
            resolver,
            registry: ObjectRegistry::new(),
            session: SessionState::default(),
            ticker: SecondTicker::new(),
            events: EventQueue::new(),
        }
    }

    /// Replace the registry with a freshly built one
    pub fn install_registry(&mut self, registry: ObjectRegistry) -> Result<(), GameError> {
        self.require(Phase::Idle, "install a registry")?;
        log::debug!("Installed registry with {} objects", registry.len());
        self.registry = registry;
        Ok(())
    }

    /// Register one more object before the session starts
    pub fn register(&mut self, descriptor: GameObjectDescriptor) -> Result<(), GameError> {
        self.require(Phase::Idle, "register objects")?;
        self.registry.register(descriptor)?;
        Ok(())
    }

    /// Start a session: reset the score, checklist, message and timer
    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.require(Phase::Idle, "start a game")?;
        if self.registry.is_empty() {
            return Err(GameError::EmptyRegistry);
        }

        let remaining: Vec<ObjectId> = self.registry.iter().map(|d| d.id.clone()).collect();
        self.session = SessionState {
            phase: Phase::Running,
            score: 0,
            total: remaining.len(),
            remaining,
            elapsed_seconds: 0,
            message: String::new(),
        };
        self.ticker.arm();
        self.events.push(GameEvent::SessionStarted { total: self.session.total });

        log::info!("Game started with {} objects to find", self.session.total);
        Ok(())
    }

    /// Handle a pointer click
    ///
    /// Misses, clicks on already-found objects and clicks outside `Running` leave the
    /// session untouched. A new find updates score, checklist and message, and asks
    /// `scene` to hide the object's nodes.
    pub fn pointer_click<S>(
        &mut self,
        pointer: &PointerEvent,
        camera: &Camera,
        scene: &mut S,
    ) -> Result<ClickOutcome, GameError>
    where
        S: SceneQuery + VisibilitySink + ?Sized,
    {
        if self.session.phase != Phase::Running {
            log::debug!("Click ignored while {}", self.session.phase);
            return Ok(ClickOutcome::Ignored);
        }

        let id = match self.resolver.resolve(pointer, camera, &*scene, &self.registry) {
            Resolution::Hit(id) => id,
            Resolution::NoHit(reason) => {
                log::debug!("Click missed: {:?}", reason);
                return Ok(ClickOutcome::Missed(reason));
            }
        };

        if self.registry.get(&id).is_some_and(GameObjectDescriptor::is_found) {
            log::debug!("'{}' was already found", id);
            return Ok(ClickOutcome::AlreadyFound(id));
        }

        let descriptor = self.registry.mark_found(&id)?;
        let label = descriptor.label.clone();
        let feedback = descriptor.feedback.clone();
        for target in &descriptor.hide_on_found {
            scene.request_visibility_change(target, false);
        }

        self.session.remaining.retain(|r| r != &id);
        self.session.score += 1;
        self.session.message.clone_from(&feedback);
        log::info!(
            "Found '{}' ({}/{})",
            id,
            self.session.score,
            self.session.total
        );
        self.events.push(GameEvent::ObjectFound {
            id: id.clone(),
            label: label.clone(),
            feedback,
        });

        if !self.session.remaining.is_empty() {
            return Ok(ClickOutcome::Found { id, label });
        }

        self.session.phase = Phase::Won;
        self.ticker.disarm();
        let elapsed_seconds = self.session.elapsed_seconds;
        self.events.push(GameEvent::Won {
            score: self.session.score,
            elapsed_seconds,
        });
        log::info!("All objects found in {}s", elapsed_seconds);

        Ok(ClickOutcome::Won { id, label, elapsed_seconds })
    }

    /// Advance the timer by one second
    ///
    /// Returns `false` (and does nothing) unless a session is running.
    pub fn tick(&mut self) -> bool {
        self.advance_clock(1) == 1
    }

    /// Feed frame time, ticking once per whole second of play
    ///
    /// Returns the number of seconds applied.
    pub fn update(&mut self, delta_seconds: f32) -> u32 {
        let due = self.ticker.advance(delta_seconds);
        if due == 0 {
            return 0;
        }
        self.advance_clock(due)
    }

    /// Tear down a won session and return to idle
    ///
    /// The registry is emptied; fresh descriptors must be installed before the next
    /// [`start_game`](Self::start_game).
    pub fn play_again(&mut self) -> Result<(), GameError> {
        self.require(Phase::Won, "play again")?;

        self.ticker.disarm();
        self.registry.clear();
        self.session = SessionState::default();
        self.events.push(GameEvent::SessionReset);

        log::info!("Session reset");
        Ok(())
    }

    /// Copy of the session for presentation
    pub fn snapshot(&self) -> SessionSnapshot {
        let remaining = self
            .session
            .remaining
            .iter()
            .filter_map(|id| self.registry.get(id))
            .map(|d| d.label.clone())
            .collect();

        SessionSnapshot {
            phase: self.session.phase,
            score: self.session.score,
            total: self.session.total,
            remaining,
            elapsed_seconds: self.session.elapsed_seconds,
            message: self.session.message.clone(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Registered objects
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Take pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Deliver pending events to `handlers`
    pub fn dispatch_events(&mut self, handlers: &mut [&mut dyn EventHandler]) -> usize {
        self.events.dispatch(handlers)
    }

    /// Add `seconds` to the running clock as a single `Tick`
    fn advance_clock(&mut self, seconds: u32) -> u32 {
        if self.session.phase != Phase::Running {
            log::trace!("Tick ignored while {}", self.session.phase);
            return 0;
        }
        self.session.elapsed_seconds = self.session.elapsed_seconds.saturating_add(seconds);
        self.events.push(GameEvent::Tick {
            elapsed_seconds: self.session.elapsed_seconds,
        });
        seconds
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), GameError> {
        if self.session.phase == phase {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                phase: self.session.phase,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> GameStateMachine {
        let mut game = GameStateMachine::new(HitResolver::new(9.0));
        game.register(GameObjectDescriptor::new("rat", "Rat", ["street_rat"])).unwrap();
        game
    }

    #[test]
    fn test_new_machine_is_idle() {
        let game = machine();
        let snapshot = game.snapshot();

        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.score, 0);
        assert!(snapshot.remaining.is_empty());
    }

    #[test]
    fn test_start_requires_objects() {
        let mut game = GameStateMachine::new(HitResolver::new(9.0));
        assert!(matches!(game.start_game(), Err(GameError::EmptyRegistry)));
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_invalid_transitions_change_nothing() {
        let mut game = machine();
        assert!(matches!(
            game.play_again(),
            Err(GameError::InvalidTransition { phase: Phase::Idle, .. })
        ));

        game.start_game().unwrap();
        game.tick();
        assert!(matches!(
            game.start_game(),
            Err(GameError::InvalidTransition { phase: Phase::Running, .. })
        ));
        assert!(matches!(
            game.register(GameObjectDescriptor::new("spray", "Spray", ["spray_paint_bottles_02"])),
            Err(GameError::InvalidTransition { .. })
        ));
        assert_eq!(game.snapshot().elapsed_seconds, 1);
        assert_eq!(game.registry().len(), 1);
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut game = machine();
        assert!(!game.tick());

        game.start_game().unwrap();
        assert!(game.tick());
        assert!(game.tick());
        assert_eq!(game.snapshot().elapsed_seconds, 2);
    }

    #[test]
    fn test_update_converts_frame_time() {
        let mut game = machine();
        assert_eq!(game.update(3.0), 0);

        game.start_game().unwrap();
        assert_eq!(game.update(0.75), 0);
        assert_eq!(game.update(0.75), 1);
        assert_eq!(game.update(2.0), 2);
        assert_eq!(game.snapshot().elapsed_seconds, 3);
    }

    #[test]
    fn test_huge_update_applies_in_one_step() {
        let mut game = machine();
        game.start_game().unwrap();
        game.drain_events();

        assert_eq!(game.update(1.0e8), 100_000_000);
        assert_eq!(game.snapshot().elapsed_seconds, 100_000_000);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Tick { elapsed_seconds: 100_000_000 }]
        );
    }

    #[test]
    fn test_undrained_ticks_stay_bounded() {
        let mut game = machine();
        game.start_game().unwrap();
        for _ in 0..10_000 {
            game.update(1.0);
        }
        game.tick();

        assert_eq!(game.snapshot().elapsed_seconds, 10_001);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::SessionStarted { total: 1 },
                GameEvent::Tick { elapsed_seconds: 10_001 },
            ]
        );
    }

    #[test]
    fn test_start_emits_event() {
        let mut game = machine();
        game.start_game().unwrap();

        assert_eq!(game.drain_events(), vec![GameEvent::SessionStarted { total: 1 }]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_elapsed_clock_format() {
        let snapshot = SessionSnapshot {
            elapsed_seconds: 125,
            ..SessionSnapshot::default()
        };
        assert_eq!(snapshot.elapsed_clock(), "02:05");
        assert_eq!(SessionSnapshot::default().elapsed_clock(), "00:00");
    }
}
