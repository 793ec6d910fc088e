//! # cfu-client: Typed client for the control collection service
//!
//! Provides the [`ControlRepository`] interface over the four remote
//! operations on compliance controls (list, create, update, delete) and two
//! implementations:
//!
//! - [`HttpControlRepository`]: JSON over HTTP via `reqwest`.
//! - [`MockControlRepository`]: in-memory, with scripted failures.
//!
//! ## Result Convention
//!
//! Every operation returns `Result<_, RepositoryError>`. The error carries one
//! user-visible message and distinguishes a rejected request (the service
//! answered with a non-success status) from a transport failure (the service
//! could not be reached or answered with an unreadable body).
//!
//! ## Configuration
//!
//! `CFU_API_URL` overrides the default base URL `http://localhost:3000`;
//! `CFU_TIMEOUT_SECS` the 30 second request timeout.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod repository;

pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, RepositoryError};
pub use http::HttpControlRepository;
pub use mock::MockControlRepository;
pub use repository::{ControlRepository, Operation};
