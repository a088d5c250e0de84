//! Complaint intake form engine.
//!
//! Owns one complaint form session: the draft and its validation, the
//! attachment list, the human-verification challenge, and the gated
//! submission flow that ends in a confirmation with a ticket number.
//! Nothing is persisted or transmitted.

pub mod attachments;
pub mod challenge;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod submission;
pub mod ticket;
pub mod types;
pub mod validation;

pub use error::{FormError, FormResult};
pub use session::FormSession;
