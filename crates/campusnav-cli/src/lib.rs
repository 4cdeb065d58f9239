//! Campus navigation CLI library.
//!
//! Subcommand handlers, terminal styling and output formatting for the
//! `campusnav` binary.

pub mod commands;
pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
