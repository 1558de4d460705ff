//! AgriNode library.
//!
//! A simulated smart-irrigation edge node together with the telemetry hub
//! it reports to. Exposes the pure-logic modules for integration testing
//! and external inspection; executor wiring and logging setup live in the
//! binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod broker;
pub mod channels;
pub mod config;
pub mod error;
pub mod hub;
pub mod node;
pub mod sim;
pub mod telemetry;
