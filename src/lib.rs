//! Traceback - repository onboarding dashboard API
//!
//! Lets a caller track a GitHub repository, assembles a denormalized project
//! record from the GitHub REST API, and asynchronously generates an
//! AI-written onboarding overview for it.
//!
//! # Architecture
//!
//! ```text
//! traceback/
//! ├── domain/           # ProjectRecord, onboarding state machine
//! ├── application/      # Orchestrator, error taxonomy
//! ├── infrastructure/   # GitHub client, LLM provider, storage backends
//! ├── presentation/     # Axum controllers, DTOs, routes
//! ├── config/           # Layered configuration (files + TRACEBACK__* env)
//! └── logging.rs        # tracing subscriber setup
//! ```
//!
//! The core is the onboarding lifecycle: `New → Generating → Ready | Failed`,
//! with regenerate re-entering `Generating` from either resting state. The
//! project store is the single shared mutable resource and notifies
//! subscribers on every mutation, so callers await change instead of polling.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::{AppHandle, create_app};
pub use config::Config;
pub use logging::init_tracing;
