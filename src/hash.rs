use argon2rs::{Argon2, Variant};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::HashError;

const SCHEME: &str = "argon2i";
const SALT_LEN: usize = 32;
const HASH_LEN: usize = 32;

lazy_static! {
    static ref RNG: SystemRandom = SystemRandom::new();
}

/// One-way password digests. Implementations must salt every digest so that
/// equal passwords produce different strings.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    fn verify(&self, digest: &str, password: &str) -> bool;
}

/// Generate a random 32-byte salt value.
fn random_salt() -> Result<[u8; SALT_LEN], HashError> {
    let mut salt = [0; SALT_LEN];
    RNG.fill(&mut salt).map_err(|_| HashError::Random)?;
    Ok(salt)
}

/// Argon2i keyed with a server-side pepper. Digests are stored as
/// `argon2i$<salt>$<hash>`, both parts base64.
pub struct Argon2Hasher {
    pepper: [u8; 32],
}

impl Argon2Hasher {
    pub fn new(pepper: [u8; 32]) -> Self {
        Argon2Hasher { pepper }
    }

    fn argon2_session(&self, salt: &[u8], password: &str) -> [u8; HASH_LEN] {
        let mut out = [0; HASH_LEN];
        Argon2::default(Variant::Argon2i).hash(
            &mut out,
            password.as_bytes(),
            salt,
            &self.pepper,
            &[],
        );
        out
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = random_salt()?;
        let hash = self.argon2_session(&salt, password);

        Ok(format!(
            "{}${}${}",
            SCHEME,
            STANDARD.encode(salt),
            STANDARD.encode(hash)
        ))
    }

    fn verify(&self, digest: &str, password: &str) -> bool {
        let mut parts = digest.splitn(3, '$');
        let (salt, expected) = match (parts.next(), parts.next(), parts.next()) {
            (Some(SCHEME), Some(salt), Some(hash)) => match (STANDARD.decode(salt), STANDARD.decode(hash)) {
                (Ok(salt), Ok(hash)) => (salt, hash),
                _ => return false,
            },
            _ => return false,
        };

        constant_time_eq(&self.argon2_session(&salt, password), &expected)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
