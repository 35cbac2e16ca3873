pub mod cli;
pub mod io;
pub mod keyboard;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
