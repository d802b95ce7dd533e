//! Rider KYC client
//!
//! Submits registration forms to the KYC API and lists submitted records
//! for admins. Form modelling and validation live in `kyc-common`.

pub mod client;
pub mod config;
pub mod listing;
pub mod render;
pub mod session;
pub mod submission;

pub use client::KycClient;
pub use config::Config;
pub use listing::DriverDirectory;
pub use session::{
    AdminCredentials, AdminSession, FileSessionStore, MemorySessionStore, SessionStore,
};
pub use submission::{FormSession, SubmissionGate, SubmissionState, SubmitOutcome};
