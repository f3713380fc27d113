//! Game event queue
//!
//! The state machine records what happened during a call (object found, timer tick, win)
//! as [`GameEvent`]s. Presentation code drains them once per frame, or hands them to
//! [`EventHandler`]s in registration order.
//!
//! Handlers return `true` to consume an event, which stops forwarding to later handlers.
//! Back-to-back `Tick`s collapse into the latest one, so a host that never drains only
//! ever holds one pending tick.

use serde::Serialize;

use crate::game::registry::ObjectId;

/// Something observable that happened to the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A session started running
    SessionStarted {
        /// Number of objects to find
        total: usize,
    },
    /// An object was found
    ObjectFound {
        /// Object identifier
        id: ObjectId,
        /// Checklist label
        label: String,
        /// Feedback message for the player
        feedback: String,
    },
    /// One second of play elapsed
    Tick {
        /// Whole seconds since the session started
        elapsed_seconds: u32,
    },
    /// Every object was found
    Won {
        /// Final score
        score: usize,
        /// Time taken in whole seconds
        elapsed_seconds: u32,
    },
    /// The session was torn down and returned to idle
    SessionReset,
}

/// Receiver of game events
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &GameEvent) -> bool;
}

/// FIFO of pending game events
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, replacing a pending `Tick` at the back with a newer one
    pub fn push(&mut self, event: GameEvent) {
        log::trace!("Queued {:?}", event);
        if matches!(event, GameEvent::Tick { .. }) {
            if let Some(last) = self.pending.last_mut() {
                if matches!(last, GameEvent::Tick { .. }) {
                    *last = event;
                    return;
                }
            }
        }
        self.pending.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Deliver every pending event to `handlers`, emptying the queue
    ///
    /// Returns how many events were consumed by some handler.
    pub fn dispatch(&mut self, handlers: &mut [&mut dyn EventHandler]) -> usize {
        let mut consumed = 0;
        for event in self.drain() {
            if handlers.iter_mut().any(|handler| handler.on_event(&event)) {
                consumed += 1;
            }
        }
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TickCounter {
        ticks: usize,
        consume: bool,
    }

    impl EventHandler for TickCounter {
        fn on_event(&mut self, event: &GameEvent) -> bool {
            if matches!(event, GameEvent::Tick { .. }) {
                self.ticks += 1;
                return self.consume;
            }
            false
        }
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::SessionStarted { total: 4 });
        queue.push(GameEvent::Tick { elapsed_seconds: 1 });

        assert_eq!(
            queue.drain(),
            vec![GameEvent::SessionStarted { total: 4 }, GameEvent::Tick { elapsed_seconds: 1 }]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_consecutive_ticks_collapse() {
        let mut queue = EventQueue::new();
        for second in 1..=500 {
            queue.push(GameEvent::Tick { elapsed_seconds: second });
        }
        queue.push(GameEvent::SessionReset);
        queue.push(GameEvent::Tick { elapsed_seconds: 501 });

        assert_eq!(
            queue.drain(),
            vec![
                GameEvent::Tick { elapsed_seconds: 500 },
                GameEvent::SessionReset,
                GameEvent::Tick { elapsed_seconds: 501 },
            ]
        );
    }

    #[test]
    fn test_consumed_events_stop_forwarding() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::Tick { elapsed_seconds: 1 });
        queue.push(GameEvent::SessionReset);

        let mut first = TickCounter { ticks: 0, consume: true };
        let mut second = TickCounter { ticks: 0, consume: true };
        let consumed = queue.dispatch(&mut [&mut first as &mut dyn EventHandler, &mut second]);

        assert_eq!(consumed, 1);
        assert_eq!(first.ticks, 1);
        assert_eq!(second.ticks, 0);
        assert!(queue.drain().is_empty());
    }
}
