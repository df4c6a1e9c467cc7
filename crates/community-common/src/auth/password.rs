//! Password hashing (Argon2id) and strength rules

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// `Ok(false)` on mismatch; `Err` only if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn long_enough(p: &str) -> bool {
    p.chars().count() >= 8
}

fn has_upper(p: &str) -> bool {
    p.chars().any(char::is_uppercase)
}

fn has_lower(p: &str) -> bool {
    p.chars().any(char::is_lowercase)
}

fn has_digit(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_digit())
}

type Rule = (&'static str, fn(&str) -> bool);

const RULES: [Rule; 4] = [
    ("at least 8 characters", long_enough),
    ("an uppercase letter", has_upper),
    ("a lowercase letter", has_lower),
    ("a digit", has_digit),
];

/// Reject weak passwords, naming every rule that failed
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let missing: Vec<&str> = RULES
        .iter()
        .filter(|(_, check)| !check(password))
        .map(|(rule, _)| *rule)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Password must contain {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Correct1Horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Correct1Horse", &hash).unwrap());
        assert!(!verify_password("Wrong1Horse", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("Correct1Horse").unwrap(),
            hash_password("Correct1Horse").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn test_strength_rules() {
        assert!(validate_password_strength("Abcdefg1").is_ok());

        let Err(AppError::Validation(msg)) = validate_password_strength("short") else {
            panic!("expected validation error");
        };
        assert!(msg.contains("8 characters"));
        assert!(msg.contains("uppercase"));
        assert!(msg.contains("digit"));
        assert!(!msg.contains("lowercase"));
    }
}
