//! Intake domain - the clan application form
//!
//! Architecture:
//!   webhook update → edges (Inbound) → engine → machine decides → effects execute
//!
//! The machine is pure and synchronous; all IO (messenger, stores, clock)
//! happens in effects through the kernel's `Base*` traits.

pub mod actions;
pub mod commands;
pub mod edges;
pub mod effects;
pub mod engine;
pub mod events;
pub mod machines;
pub mod models;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use edges::{inbound_from_update, ChatContext, Inbound, Origin};
pub use engine::IntakeEngine;
pub use events::FormEvent;
pub use machines::FormMachine;
pub use models::{Applicant, ApplicantId, Session, Step, APPLICATION_FORM};
