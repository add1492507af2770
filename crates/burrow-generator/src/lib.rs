pub mod error;
pub mod random;
pub mod seq;

pub use error::Error;
pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use burrow_core::shortcode::MAX_LENGTH;
use burrow_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated code is only a candidate: the store decides whether it is free.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    fn generate(&self) -> Self::Output;
}

impl<G: Generator> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}

fn check_length(length: usize) -> Result<(), Error> {
    if length == 0 || length > MAX_LENGTH {
        return Err(Error::InvalidLength {
            length,
            max_length: MAX_LENGTH,
        });
    }
    Ok(())
}
