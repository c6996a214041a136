pub mod render;
pub mod repl;

pub use repl::{ask_once, run_repl_mode};
