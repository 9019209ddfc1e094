//! Thin wrapper over the backend HTTP API
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
mod fetch;

pub use client::{ApiClient, ApiError, Base, MultipartFile, MultipartPayload, RequestBody};
pub use fetch::fetch_all;
pub use reqwest::{Method, StatusCode};
