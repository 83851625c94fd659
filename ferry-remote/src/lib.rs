//! # ferry-remote
//!
//! The remote side of ferry: startup configuration, the [`Remote`] trait
//! every higher layer consumes, and [`Gateway`], its blocking HTTP
//! implementation.
//!
//! All remote I/O is strictly sequential — one call completes before the
//! next begins. Ordering is a correctness requirement for the push
//! direction, so no concurrent dispatch exists anywhere in this crate.

pub mod config;
pub mod error;
pub mod gateway;

pub use config::{Config, ConfigError, TOKEN_ENV};
pub use error::RemoteError;
pub use gateway::{FlowListing, Gateway, Remote};
