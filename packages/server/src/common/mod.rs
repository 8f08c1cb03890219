pub mod keyboard;
pub mod locale;
pub mod utils;

pub use keyboard::*;
pub use locale::*;
