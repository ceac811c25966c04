use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::FrontendError;

/// Hash with Argon2id and a fresh random salt; returns a PHC string.
pub fn hash_password(password: &str) -> Result<String, FrontendError> {
    if password.is_empty() {
        return Err(FrontendError::InvalidInput("password is required".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, phc: &str) -> Result<bool, FrontendError> {
    let parsed = PasswordHash::new(phc).map_err(|e| anyhow::anyhow!("parse password hash: {e}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}").into()),
    }
}
