//! # tinybasic
//!
//! An interpreter for a Tiny BASIC dialect.
//!
//! ## Pipeline
//!
//! A line of source text flows through three stages:
//!
//! 1. **Cursor** - character-level, backtracking-friendly scanning primitive
//! 2. **Parser** - turns one line into a [`parser::ParsedLine`] directly off the
//!    cursor, with no separate tokenizing pass
//! 3. **Engine** - a host-driven state machine ([`engine::Engine`]) that stores
//!    the program, executes statements, and suspends for `INPUT` without
//!    blocking its caller
//!
//! ## Example
//!
//! ```rust,no_run
//! use tiny_basic::engine::Engine;
//! use tiny_basic::engine::io::{HostCommand, InputEvent, IoHost};
//!
//! struct StdioHost;
//!
//! impl IoHost for StdioHost {
//!     fn get_input_char(&mut self) -> InputEvent { InputEvent::EndOfStream }
//!     fn put_output_char(&mut self, b: u8) { print!("{}", b as char); }
//!     fn show_command_prompt(&mut self) {}
//!     fn show_input_prompt(&mut self) {}
//!     fn show_error(&mut self, message: &str) { eprintln!("{message}"); }
//!     fn show_debug_trace(&mut self, message: &str) { eprintln!("{message}"); }
//!     fn bye(&mut self) {}
//!     fn host_command(&mut self, _command: HostCommand) {}
//! }
//!
//! let mut engine = Engine::new(1024);
//! let mut host = StdioHost;
//! engine.step(&mut host);
//! ```

pub mod ast;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod parser;
