//! # DEPENDENTS
//!
//! Reverse-dependency reports for native binaries in multi-module builds.
//!
//! For one binary of the build, answers which other binaries transitively
//! depend on it and whether they are currently buildable.
//!
//! ## Layout
//!
//! - **model**: the build-model boundary ([`model::ProjectModelProvider`]) and
//!   a JSON snapshot loader
//! - **core**: artifact keys, the binary registry, the dependency index and
//!   the dependents resolver
//! - **formatters**: text tree and JSON reports

pub mod core;
pub mod formatters;
pub mod model;
