/// Interactive runtime module - Gateway

mod repl;

pub use repl::{parse_command, Command, Repl};
