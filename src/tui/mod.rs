pub mod app;
pub mod detail;
pub mod input;
pub mod render;
pub mod shell;
pub mod theme;

pub use app::run;
