mod assign;
mod config;
mod lock;
mod status;

pub use assign::*;
pub use config::*;
pub use status::*;
