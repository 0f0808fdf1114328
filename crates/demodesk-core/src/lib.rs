//! Core library for `demodesk`.
//!
//! Client side of a demo-request lead funnel: a typed client for the lead
//! backend, the public booking form, the password-gated admin session, the
//! admin table model and the CSV exporter. The backend itself is external;
//! this crate only speaks its REST contract.
//!
//! # Example
//!
//! ```rust,no_run
//! use demodesk_core::{AdminCredential, AdminSession, HttpLeadApi, LoginOutcome};
//!
//! # async fn example() -> Result<(), demodesk_core::ApiError> {
//! let api = HttpLeadApi::from_env()?;
//! let mut session = AdminSession::new();
//! if let LoginOutcome::Authenticated { count } =
//!     session.login(&api, AdminCredential::new("hunter2")).await
//! {
//!     println!("{count} leads");
//!     let export = session.export_csv();
//!     std::fs::write(&export.filename, &export.body).ok();
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod api;
pub mod booking;
pub mod config;
pub mod csv;
pub mod error;
mod inflight;
pub mod types;
pub mod view;

pub use admin::{AdminSession, AssumeYes, Confirm, DeleteOutcome, LoginOutcome, RefreshOutcome};
pub use api::{HttpLeadApi, LeadApi};
pub use booking::{BookingForm, Field, SubmitMessage, SubmitOutcome};
pub use config::ClientConfig;
pub use csv::CsvExport;
pub use error::ApiError;
pub use types::{AdminCredential, HealthStatus, Lead, LeadId, NewLead};
