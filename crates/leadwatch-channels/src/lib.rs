//! # LeadWatch Channels
//! Delivery of composed alerts.

pub mod telegram;

pub use telegram::{TelegramChannel, TopicCandidate};
