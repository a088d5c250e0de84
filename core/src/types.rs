//! Shared primitive types used across the form engine.

/// Client-side attachment identifier. Unique within one session only.
pub type LocalId = String;

/// Display-only complaint ticket number, e.g. `SM-QK4821`.
pub type TicketNumber = String;
