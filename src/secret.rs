//! In-memory secrets such as passwords.
//!
//! A [`SecretString`] overwrites its buffer with random bytes when it is
//! dropped, whichever way the owning scope is left.

use std::fmt;

use rand::Rng;

pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Takes the secret out and overwrites its allocation in place. The
    /// returned bytes are the scrubbed buffer, not the secret.
    fn wipe(&mut self) -> Vec<u8> {
        // into_bytes keeps the allocation, so the random bytes land on the
        // memory that held the secret
        let mut bytes = std::mem::take(&mut self.0).into_bytes();
        rand::rng().fill(&mut bytes[..]);
        std::hint::black_box(&bytes);
        bytes
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        drop(self.wipe());
    }
}

impl From<String> for SecretString {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}
