//! Code shared between the admin panel server, its API client and the test
//! helper

#![warn(unused_crate_dependencies)]

pub mod const_config;
pub mod errors;
pub mod flash;
pub mod forms;
mod macros;
pub mod media;
pub mod session;
pub mod telemetry;
