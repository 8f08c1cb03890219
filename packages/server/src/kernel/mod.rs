//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod keyed_lock;
pub mod test_dependencies;
pub mod traits;

pub use deps::{IntakeSettings, ServerDeps, TelegramAdapter};
pub use keyed_lock::{KeyedGuard, KeyedLocks};
pub use test_dependencies::{MockMessenger, TestDependencies, TEST_ADMIN_CHAT_ID};
pub use traits::*;
