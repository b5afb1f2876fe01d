//! # LeadWatch Core
//!
//! Shared building blocks for the LeadWatch pipeline: the canonical [`Lead`]
//! value, the error taxonomy, configuration, and the traits that connect a
//! lead source to a notification channel.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::LeadWatchConfig;
pub use error::{LeadWatchError, Result};
pub use traits::{LeadSource, Notifier};
pub use types::{Ack, Lead, Staleness};
