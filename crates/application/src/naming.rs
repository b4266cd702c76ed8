//! Random test data.

use rand::Rng;

/// Default length of generated strings.
pub const DEFAULT_RANDOM_LENGTH: usize = 8;

/// Generates a random string of ASCII letters.
///
/// Used to make user names distinct between runs; uniqueness is not
/// guaranteed.
#[must_use]
pub fn random_string(len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            char::from(CHARSET[idx])
        })
        .collect()
}
