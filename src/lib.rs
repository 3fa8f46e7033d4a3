//! Placement quiz scoring for the KidQuest tutoring programme.
//!
//! The [`placement`] module holds the pure engine (question bank, age filter, quiz session,
//! scorer) together with the service and router seams that persist results and start the
//! family nurture sequence.

pub mod config;
pub mod error;
pub mod placement;
pub mod telemetry;
