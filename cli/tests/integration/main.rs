//! Integration tests for the mcp-anywhere binary
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Every command gets a private config path and data directory.

mod cli_tests;
mod serve_command;
mod support;
