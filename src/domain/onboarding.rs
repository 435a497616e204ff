//! Onboarding sub-state machine
//!
//! Every project carries exactly one of four onboarding states, derived from
//! the `{onboardingOverview, isGenerating, generationFailed}` triple on the
//! record. Transitions are validated here before the store is touched.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Onboarding sub-state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OnboardingState {
    /// Just fetched, no generation attempted.
    New,
    /// A background generation task is in flight.
    Generating,
    /// An overview is present.
    Ready,
    /// The last generation attempt failed.
    Failed,
}

impl OnboardingState {
    /// Returns the set of valid target states from the current state.
    ///
    /// ```text
    /// New ──► Generating ──► Ready
    ///             ▲  │
    ///             │  └─────► Failed
    ///             └── regenerate (from Ready or Failed)
    /// ```
    pub fn valid_transitions(&self) -> &[OnboardingState] {
        match self {
            Self::New => &[Self::Generating],
            Self::Generating => &[Self::Ready, Self::Failed],
            Self::Ready | Self::Failed => &[Self::Generating],
        }
    }

    /// Check whether transitioning to `target` is allowed from this state.
    pub fn can_transition_to(&self, target: &OnboardingState) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Whether a generation task is currently expected to be running.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Generating)
    }
}

impl std::fmt::Display for OnboardingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Generating => write!(f, "Generating"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Error returned when an invalid onboarding transition is attempted.
#[derive(Debug, thiserror::Error)]
#[error("Invalid onboarding transition from {from} to {to}")]
pub struct TransitionError {
    pub from: OnboardingState,
    pub to: OnboardingState,
}
