#![forbid(unsafe_code)]

//! Line-oriented text editor driving a [`undograph::VersionedDocument`].
//!
//! Each input line is one command (`set`, `append`, `commit`, `undo`, ...).
//! Commands are read from a script file or stdin and their output is written
//! to stdout, which makes the binary handy for poking at history behaviour
//! from a shell.

pub mod cli;
pub mod error;
pub mod logging;
pub mod script;

pub use cli::{Cli, run, run_from_env};
pub use error::{DemoError, Result};
