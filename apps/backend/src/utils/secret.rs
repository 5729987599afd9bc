//! Secret-string generation for the identity store.
//!
//! Claim and bearer secrets are 43-character strings over a url-safe
//! alphabet (64 symbols, so 6 bits per character ≈ 258 bits), drawn from the
//! OS's cryptographically secure RNG. Uniqueness is enforced by the store's
//! unique indexes; collisions are out of reach at this entropy.

use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::OsRng;

const URL_SAFE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const SECRET_LEN: usize = 43;

/// Generate an opaque, unguessable secret string.
pub fn generate_secret() -> String {
    let mut rng = OsRng;
    let dist = Uniform::from(0..URL_SAFE.len());

    let mut s = String::with_capacity(SECRET_LEN);
    for _ in 0..SECRET_LEN {
        s.push(URL_SAFE[dist.sample(&mut rng)] as char);
    }
    s
}
