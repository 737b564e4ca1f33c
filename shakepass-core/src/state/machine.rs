//! Phase state machine
//!
//! The phase only ever advances IDLE → PRE → GEN → POST → IDLE. Any event
//! that does not match the current phase leaves it unchanged.

use super::events::{Event, TriggerSource};
use super::Phase;

/// Process an event and return the next phase
pub fn transition(phase: Phase, event: Event) -> Phase {
    use Event::*;

    match (phase, event) {
        (Phase::Idle, Trigger(_)) => Phase::Pre,
        (Phase::Pre, Charged) => Phase::Gen,
        (Phase::Gen, Published) => Phase::Post,
        (Phase::Post, Released) => Phase::Idle,

        // Default: stay in current phase
        _ => phase,
    }
}

/// Authoritative lifecycle of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lifecycle {
    phase: Phase,
    trigger: Option<TriggerSource>,
    cycles: u32,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// What started the cycle in flight, if any
    pub fn trigger(&self) -> Option<TriggerSource> {
        self.trigger
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Apply an event, returning the new phase if it changed
    pub fn fire(&mut self, event: Event) -> Option<Phase> {
        let next = transition(self.phase, event);
        if next == self.phase {
            return None;
        }

        match event {
            Event::Trigger(source) => self.trigger = Some(source),
            Event::Released => {
                self.trigger = None;
                self.cycles = self.cycles.wrapping_add(1);
            }
            _ => {}
        }
        self.phase = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EVENTS: [Event; 5] = [
        Event::Trigger(TriggerSource::Chord),
        Event::Trigger(TriggerSource::Command),
        Event::Charged,
        Event::Published,
        Event::Released,
    ];

    #[test]
    fn test_full_cycle() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(
            lifecycle.fire(Event::Trigger(TriggerSource::Command)),
            Some(Phase::Pre)
        );
        assert_eq!(lifecycle.trigger(), Some(TriggerSource::Command));
        assert_eq!(lifecycle.fire(Event::Charged), Some(Phase::Gen));
        assert_eq!(lifecycle.fire(Event::Published), Some(Phase::Post));
        assert_eq!(lifecycle.fire(Event::Released), Some(Phase::Idle));
        assert_eq!(lifecycle.cycles(), 1);
        assert_eq!(lifecycle.trigger(), None);
    }

    #[test]
    fn test_retrigger_ignored_while_busy() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.fire(Event::Trigger(TriggerSource::Chord));
        assert_eq!(lifecycle.fire(Event::Trigger(TriggerSource::Command)), None);
        assert_eq!(lifecycle.trigger(), Some(TriggerSource::Chord));
    }

    #[test]
    fn test_out_of_order_events_ignored() {
        for event in [Event::Charged, Event::Published, Event::Released] {
            assert_eq!(transition(Phase::Idle, event), Phase::Idle);
        }
        assert_eq!(transition(Phase::Pre, Event::Published), Phase::Pre);
        assert_eq!(transition(Phase::Gen, Event::Released), Phase::Gen);
    }

    proptest! {
        #[test]
        fn prop_only_cyclic_successor_reachable(picks in proptest::collection::vec(0usize..5, 0..64)) {
            let mut phase = Phase::Idle;
            for i in picks {
                let next = transition(phase, EVENTS[i]);
                prop_assert!(next == phase || next == phase.successor());
                phase = next;
            }
        }
    }
}
