//! # LeadWatch Alerts
//!
//! Turns a lead snapshot into one Telegram-ready HTML message.
//!
//! ```text
//! Vec<Lead>
//!   └── Buckets::classify
//!         ├── critical  (21+ days)  → top 5
//!         ├── warning   (14-20)     → top 3
//!         ├── attention (7-13)      → top 3
//!         └── recent    (< 7)       → summary count only
//!   └── AlertComposer::compose → String
//! ```

pub mod buckets;
pub mod compose;
pub mod pipeline;

pub use buckets::{BucketCounts, Buckets};
pub use compose::{ALL_CLEAR, AlertComposer, compose, escape_html};
pub use pipeline::{Delivery, RunReport, run_alerts};
