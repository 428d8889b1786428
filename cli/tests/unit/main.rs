//! Unit tests for the mcp-anywhere library
//!
//! These tests use the public API directly and run fast without external I/O.

mod architecture;
mod property_tests;
