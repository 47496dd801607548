#![deny(warnings)]

//! Deterministic self-play harness for the Schafkopf engine.

pub mod agent;
pub mod config;
pub mod logging;
pub mod report;
pub mod runner;
pub mod session;
