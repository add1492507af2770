use crate::{check_length, Error, Generator};
use burrow_core::shortcode::{ALPHABET, DEFAULT_LENGTH};
use burrow_core::ShortCode;
use rand::Rng;

/// Draws codes uniformly at random from `[a-z0-9]`.
///
/// At the default length of 5 the keyspace holds 36^5 (about 6 * 10^7)
/// codes. Uniqueness is not guaranteed here; callers insert through the
/// store and retry on collision.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of [`DEFAULT_LENGTH`] characters.
    pub fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }

    /// Creates a generator producing codes of `length` characters.
    pub fn with_length(length: usize) -> Result<Self, Error> {
        check_length(length)?;
        Ok(Self { length })
    }

    /// Generates a code using the supplied random source.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> ShortCode {
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        self.generate_with(&mut rand::rng())
    }
}
