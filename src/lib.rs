//! Client for a short-let property booking service.
//!
//! Browse and filter listings, quote a stay, book and pay, keep favorites and
//! read notifications, all against the service's REST API through [`api::RentalApi`].

pub mod api;
pub mod booking;
pub mod busy;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod gallery;
pub mod models;
pub mod notifications;
pub mod pricing;
pub mod profile;

pub use config::Config;
pub use error::{ApiError, AppError, ValidationError};
