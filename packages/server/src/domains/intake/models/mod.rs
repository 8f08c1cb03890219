pub mod answers;
pub mod field;
pub mod session;

pub use answers::*;
pub use field::*;
pub use session::*;
