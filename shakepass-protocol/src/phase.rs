//! Generation lifecycle phases as carried by `EV:` lines

/// Where the device is in a generation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for a trigger, streaming telemetry
    #[default]
    Idle,
    /// Charging the accumulator before commit
    Pre,
    /// Password computed and being emitted
    Gen,
    /// Settling after emission
    Post,
}

// Wire format names
const NAME_IDLE: &str = "IDLE";
const NAME_PRE: &str = "PRE";
const NAME_GEN: &str = "GEN";
const NAME_POST: &str = "POST";

impl Phase {
    /// All phases in cycle order
    pub const CYCLE: [Phase; 4] = [Phase::Idle, Phase::Pre, Phase::Gen, Phase::Post];

    /// Parse a phase from its wire name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::CYCLE
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(name))
    }

    /// Wire name of this phase
    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => NAME_IDLE,
            Phase::Pre => NAME_PRE,
            Phase::Gen => NAME_GEN,
            Phase::Post => NAME_POST,
        }
    }

    /// The phase that follows this one in a cycle
    pub fn successor(self) -> Self {
        match self {
            Phase::Idle => Phase::Pre,
            Phase::Pre => Phase::Gen,
            Phase::Gen => Phase::Post,
            Phase::Post => Phase::Idle,
        }
    }

    /// Returns true while a generation cycle is in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for phase in Phase::CYCLE {
            assert_eq!(Phase::from_name(phase.name()), Some(phase));
        }
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Phase::from_name("post"), Some(Phase::Post));
        assert_eq!(Phase::from_name("Gen"), Some(Phase::Gen));
        assert_eq!(Phase::from_name("DONE"), None);
        assert_eq!(Phase::from_name(""), None);
    }

    #[test]
    fn test_successor_cycles() {
        let mut phase = Phase::Idle;
        for expected in [Phase::Pre, Phase::Gen, Phase::Post, Phase::Idle] {
            phase = phase.successor();
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn test_busy() {
        assert!(!Phase::Idle.is_busy());
        assert!(Phase::Pre.is_busy());
        assert!(Phase::Gen.is_busy());
        assert!(Phase::Post.is_busy());
    }
}
