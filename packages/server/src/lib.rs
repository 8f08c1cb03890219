// Clan Application Bot - Intake Core
//
// This crate runs a conversational application form over a chat bot webhook:
// applicants answer a fixed sequence of questions, review a preview, and
// submit to an operator chat, at most once per cooldown window.
//
// Architecture follows the domain layout: domains/intake holds the pure form
// machine and its effects; kernel holds infrastructure traits and adapters.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
