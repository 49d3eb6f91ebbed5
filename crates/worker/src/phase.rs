//! Worker lifecycle phases.

use std::fmt;

/// The lifecycle phase of a worker instance.
///
/// Phases only move forward: Installing → Waiting → Activating → Active.
/// The phase is owned by the [`crate::Worker`] and consulted explicitly on
/// every intercepted request; there is no ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Pre-caching configured assets into the current partitions.
    #[default]
    Installing,
    /// Install finished; ready to replace any previous version immediately.
    Waiting,
    /// Purging partitions left over from previous versions.
    Activating,
    /// Serving: the request router is live.
    Active,
}

impl Phase {
    /// Whether `next` is the legal successor of `self`.
    pub(crate) fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Installing, Phase::Waiting)
                | (Phase::Waiting, Phase::Activating)
                | (Phase::Activating, Phase::Active)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Installing => "installing",
            Phase::Waiting => "waiting",
            Phase::Activating => "activating",
            Phase::Active => "active",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_are_valid() {
        assert!(Phase::Installing.can_advance_to(Phase::Waiting));
        assert!(Phase::Waiting.can_advance_to(Phase::Activating));
        assert!(Phase::Activating.can_advance_to(Phase::Active));
    }

    #[test]
    fn test_skipping_or_reversing_is_invalid() {
        assert!(!Phase::Installing.can_advance_to(Phase::Activating));
        assert!(!Phase::Installing.can_advance_to(Phase::Active));
        assert!(!Phase::Waiting.can_advance_to(Phase::Active));
        assert!(!Phase::Active.can_advance_to(Phase::Installing));
        assert!(!Phase::Active.can_advance_to(Phase::Active));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Phase::Installing.to_string(), "installing");
        assert_eq!(Phase::Active.to_string(), "active");
    }
}
