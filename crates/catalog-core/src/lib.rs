//! Core types and the storage trait for the course catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! SQLite backend and the axum server both depend on it.

// Native `async fn` in traits; `Send` bounds are spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod course;
pub mod error;
pub mod store;

pub use error::{Error, Result};
