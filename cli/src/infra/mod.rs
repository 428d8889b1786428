//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, container
//! teardown, SQLite storage, filesystem access, and configuration loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::transport` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod docker;
pub mod fs;
pub mod store;
