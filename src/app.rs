pub mod cli;
pub mod commands;
pub mod display;

pub use commands::App;
