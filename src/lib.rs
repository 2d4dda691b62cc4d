//! An async Rust client for the Open Data Platform of Antwerpen.
//!
//! The client talks to the city's public ArcGIS portal
//! (`geodata.antwerpen.be`) and turns its GeoJSON replies into typed records.
//! Currently it exposes the disabled parking spaces layer.
//!
//! ## Quick start
//! - Optionally configure the client via environment variables
//!   (`ODP_ANTWERPEN_URL`, `ODP_ANTWERPEN_TIMEOUT`, `ODP_ANTWERPEN_VERIFY`) or an
//!   `.antwerpenrc` file in the current or home directory.
//! - Call [`Client::disabled_parkings`] with the number of records you need.
//!
//! ```no_run
//! use antwerpen::Client;
//!
//! # async fn run() -> antwerpen::Result<()> {
//! let client = Client::from_env()?;
//! for parking in client.disabled_parkings(200).await? {
//!     println!("{:?} has {:?} space(s)", parking.entry_id, parking.number);
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```
//!
//! Errors are split into [`ConnectionError`] (timeouts, network failures and
//! non-2xx replies) and [`DataError`] (a reply that is not GeoJSON). The
//! library never retries; callers choose their own policy.

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod models;
mod util;

pub use client::{Client, DEFAULT_LIMIT};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ConfigError, ConnectionError, DataError, Error, ErrorKind, Result};
pub use models::{Coordinates, DisabledParking, Position};
pub use reqwest::Method;
