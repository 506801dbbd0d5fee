//! Behavioral specifications for the runboard CLI.
//!
//! These tests are black-box: they invoke the built binary and verify
//! stdout, stderr, and exit codes against synthetic run directories.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// snapshot mode
#[path = "specs/once.rs"]
mod once;
