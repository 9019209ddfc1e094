//! # Notable design decisions (notes)
//! - The panel keeps no data of its own. Every read and write goes to the
//!   backend API and only the logged in user and pending flash messages live
//!   in the session
//! - Pages are answered with their template context as json. Rendering the
//!   named template is left to whatever sits in front of the panel
//! - Handlers return an [`context::Outcome`] and never queue flash messages
//!   themselves
//! - Redirects use `303 See Other` so a browser follows a POST with a GET
//! - Suggested sequence of steps to add a resource:
//!     - Add its schema and record in `xevents_shared::forms`
//!     - Add the route and endpoint constants in `xevents_shared::const_config`
//!     - Create a module in `routes` implementing `Resource`
//!     - Register its scope in `startup.rs` behind the session gate
//!     - Add tests

#![warn(unused_crate_dependencies)]


mod authentication;
pub mod configuration;
pub mod context;
mod routes;
mod session_state;
pub mod startup;
mod submission;

pub use configuration::{get_configuration, Configuration};
pub use startup::{build_runnable_server, get_socket_address, initialize_tracing, RunnableServer};
