use crate::{check_length, Error, Generator};
use burrow_core::shortcode::{ALPHABET, DEFAULT_LENGTH};
use burrow_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic generator that counts through the keyspace in base 36.
///
/// Codes are rendered at a fixed width using the short code alphabet as
/// digits, so with the default width the sequence is "aaaaa", "aaaab", ...
/// The counter wraps once the keyspace is exhausted; the store still rejects
/// codes that are already taken.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    length: usize,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            length: self.length,
        }
    }
}

impl SeqGenerator {
    /// Creates a generator of [`DEFAULT_LENGTH`]-character codes starting at zero.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            length: DEFAULT_LENGTH,
        }
    }

    /// Creates a generator of `length`-character codes starting from `offset`.
    ///
    /// Useful for resuming from a known state or giving each node its own
    /// counter range.
    pub fn with_offset(length: usize, offset: u64) -> Result<Self, Error> {
        check_length(length)?;
        Ok(Self {
            counter: AtomicU64::new(offset),
            length,
        })
    }

    fn render(&self, mut value: u64) -> String {
        let base = ALPHABET.len() as u64;
        let mut digits = vec![ALPHABET[0]; self.length];
        for slot in digits.iter_mut().rev() {
            *slot = ALPHABET[(value % base) as usize];
            value /= base;
        }
        // Every byte comes from ALPHABET, which is ASCII.
        digits.into_iter().map(char::from).collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(self.render(count))
    }
}
