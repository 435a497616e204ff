//! Core domain model: project records and the onboarding state machine

pub mod onboarding;
pub mod project;

pub use onboarding::{OnboardingState, TransitionError};
pub use project::{
    Commit, ContextCommit, DependencyManifest, OnboardingContext, ProjectPatch, ProjectRecord,
    RepositoryMetadata,
};
