use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

pub fn hash_login_key(login_key: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(login_key.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash login key: {}", e))?;

    Ok(hash.to_string())
}

pub fn verify_login_key(login_key: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid login key hash: {}", e))?;

    let argon2 = Argon2::default();
    let result = argon2.verify_password(login_key.as_bytes(), &parsed_hash);

    match result {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Login key verification error: {}", e)),
    }
}
