use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::error;

pub const SALT_LEN: usize = 32;
pub const DIGEST_LEN: usize = 32;

/// Fresh random salt; one per account, regenerated on every password
/// update.
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

pub fn hash_password(plain: &str, salt: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut digest = vec![0u8; DIGEST_LEN];
    Argon2::default()
        .hash_password_into(plain.as_bytes(), salt, &mut digest)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?;
    Ok(digest)
}

/// Shared by the login and update-password paths.
pub fn verify_password(plain: &str, salt: &[u8], stored_digest: &[u8]) -> anyhow::Result<bool> {
    let digest = hash_password(plain, salt)?;
    Ok(digest.as_slice() == stored_digest)
}
