//! Seeded random number generation.
//!
//! RULE: Nothing in the form engine may call a platform RNG directly.
//! All randomness flows through FormRng instances derived from the
//! single master seed held by the session's RngBank.
//!
//! Each concern (challenge codes, ticket numbers, attachment ids) gets its
//! own stream, seeded from (master_seed XOR slot_index). Adding a new slot
//! never changes the streams of existing ones.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, seeded RNG for a single concern.
pub struct FormRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl FormRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform index in [0, n). Rejection-sampled, no modulo bias.
    pub fn index_below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Pick one symbol uniformly from an ASCII alphabet.
    pub fn pick(&mut self, alphabet: &[u8]) -> char {
        alphabet[self.index_below(alphabet.len())] as char
    }

    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }
}

/// Every stream for one form session, derived from one master seed.
///
/// Streams are stateful: the bank keeps one live FormRng per slot so that
/// successive draws (challenge refreshes, new tickets) keep advancing.
pub struct RngBank {
    master_seed: u64,
    challenge:   FormRng,
    ticket:      FormRng,
    attachment:  FormRng,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            challenge:  Self::stream(master_seed, RngSlot::Challenge),
            ticket:     Self::stream(master_seed, RngSlot::Ticket),
            attachment: Self::stream(master_seed, RngSlot::Attachment),
        }
    }

    /// Seed from OS entropy. Used by interactive sessions.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_slot(&mut self, slot: RngSlot) -> &mut FormRng {
        match slot {
            RngSlot::Challenge  => &mut self.challenge,
            RngSlot::Ticket     => &mut self.ticket,
            RngSlot::Attachment => &mut self.attachment,
        }
    }

    fn stream(master_seed: u64, slot: RngSlot) -> FormRng {
        FormRng::new(master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries, only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Challenge = 0,
    Ticket = 1,
    Attachment = 2,
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Challenge => "challenge",
            Self::Ticket => "ticket",
            Self::Attachment => "attachment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7);
        let mut b = RngBank::new(7);
        for _ in 0..32 {
            assert_eq!(
                a.for_slot(RngSlot::Ticket).next_u64(),
                b.for_slot(RngSlot::Ticket).next_u64()
            );
        }
    }

    #[test]
    fn slots_are_independent_streams() {
        let mut bank = RngBank::new(7);
        let c = bank.for_slot(RngSlot::Challenge).next_u64();
        let t = bank.for_slot(RngSlot::Ticket).next_u64();
        assert_ne!(c, t);
    }

    #[test]
    fn index_below_stays_in_range() {
        let mut rng = FormRng::new(99, 0);
        for _ in 0..1000 {
            assert!(rng.index_below(36) < 36);
        }
    }
}
