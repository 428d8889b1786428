//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::transport`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    ClientGateway, CommandRunner, ContainerManager, DbStatus, LocalFs, ReleaseReport, StateStore,
    Transport,
};
