//! # LeadWatch CRM
//! Lead extraction from a Notion database.
//!
//! ```text
//! POST /v1/databases/{id}/query
//!   └── results[] (pages)
//!         └── normalize::normalize_page(page, FieldMapping, today) → Lead
//!               ├── properties::extract_text (title, rich_text, select, ...)
//!               └── normalize::parse_contact_date (degrades to 999 on failure)
//! ```

pub mod normalize;
pub mod notion;
pub mod properties;

pub use normalize::{normalize_page, parse_contact_date};
pub use notion::{NotionClient, fetch_leads};
