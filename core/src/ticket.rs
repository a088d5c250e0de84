//! Ticket number generation.
//!
//! Ticket numbers are display artifacts shown on the confirmation screen.
//! Collisions are possible and are not checked.

use crate::{rng::FormRng, types::TicketNumber};

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

pub const TICKET_LETTERS: usize = 2;
pub const TICKET_DIGITS: usize = 4;

pub struct TicketGenerator;

impl TicketGenerator {
    /// `prefix` + 2 letters + 4 digits, e.g. `SM-QK4821`.
    pub fn generate(rng: &mut FormRng, prefix: &str) -> TicketNumber {
        let mut ticket = String::with_capacity(prefix.len() + TICKET_LETTERS + TICKET_DIGITS);
        ticket.push_str(prefix);
        for _ in 0..TICKET_LETTERS {
            ticket.push(rng.pick(LETTERS));
        }
        for _ in 0..TICKET_DIGITS {
            ticket.push(rng.pick(DIGITS));
        }
        ticket
    }

    /// True when `ticket` is `prefix` followed by 2 uppercase letters and
    /// 4 decimal digits.
    pub fn is_well_formed(ticket: &str, prefix: &str) -> bool {
        let Some(body) = ticket.strip_prefix(prefix) else {
            return false;
        };
        let bytes = body.as_bytes();
        bytes.len() == TICKET_LETTERS + TICKET_DIGITS
            && bytes[..TICKET_LETTERS].iter().all(u8::is_ascii_uppercase)
            && bytes[TICKET_LETTERS..].iter().all(u8::is_ascii_digit)
    }
}
