pub mod config;
pub mod workspace;

pub use config::*;
pub use workspace::*;
