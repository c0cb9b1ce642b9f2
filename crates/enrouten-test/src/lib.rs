//! # enrouten-test
//!
//! Testing utilities for enrouten-rs applications.
//!
//! ## Modules
//!
//! - [`client`] - In-process HTTP client driving an `axum::Router`

pub mod client;

pub use client::{TestClient, TestResponse};
