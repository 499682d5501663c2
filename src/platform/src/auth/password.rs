use argon2::Argon2;
use password_hash::PasswordHash;

use crate::error::Result;

pub fn make_password_hash(password: &str) -> Result<String> {
    let salt = password_hash::SaltString::generate(rand::thread_rng());
    let phf = Argon2::default();
    let hash = PasswordHash::generate(phf, password, &salt)?;

    Ok(hash.to_string())
}

pub fn verify_password(password: impl AsRef<[u8]>, password_hash: PasswordHash) -> Result<()> {
    Ok(password_hash.verify_password(&[&Argon2::default()], password)?)
}

#[cfg(test)]
mod tests {
    use password_hash::PasswordHash;

    use super::make_password_hash;
    use super::verify_password;

    #[test]
    fn test_hash_and_verify() {
        let hash = make_password_hash("correct horse battery staple").unwrap();
        let parsed = PasswordHash::new(hash.as_str()).unwrap();
        verify_password("correct horse battery staple", parsed).unwrap();

        let parsed = PasswordHash::new(hash.as_str()).unwrap();
        assert!(verify_password("wrong password", parsed).is_err());
    }
}
