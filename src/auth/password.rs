use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

/// Hash a password with `Argon2id` and a fresh OS-random salt.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored `Argon2id` hash.
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Stored password hash is malformed: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Password policy for player accounts: 8-72 characters containing at least
/// one letter and one digit.
///
/// # Errors
///
/// Returns a message suitable for the signup form.
pub fn validate_password(password: &str) -> Result<(), String> {
    if !(8..=72).contains(&password.chars().count()) {
        return Err("Password must be between 8 and 72 characters.".to_string());
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err("Password must contain at least one letter and one digit.".to_string());
    }
    Ok(())
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
/// Deliverability is not verified.
///
/// # Errors
///
/// Returns a message suitable for the signup form.
pub fn validate_email(email: &str) -> Result<(), String> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email address.".to_string());
    };
    let domain_ok = !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return Err("Invalid email address.".to_string());
    }
    Ok(())
}

/// Usernames are public handles on rosters and friend lists: 3-30
/// characters, starting with a letter, then letters, digits, or underscores.
///
/// # Errors
///
/// Returns a message suitable for the signup form.
pub fn validate_username(username: &str) -> Result<(), String> {
    if !(3..=30).contains(&username.chars().count()) {
        return Err("Username must be between 3 and 30 characters.".to_string());
    }
    let mut chars = username.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err("Username must start with a letter.".to_string());
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Username may only contain letters, digits, and underscores.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("SecurePass123!").unwrap_or_default();
        assert!(verify_password("SecurePass123!", &hash).unwrap_or(false));
        assert!(!verify_password("WrongPass123!", &hash).unwrap_or(true));
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123!").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("allletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password(&"a1".repeat(40)).is_err());
    }

    #[test]
    fn test_email_structure() {
        assert!(validate_email("player@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("player@nodot").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("player@example.").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("striker_9").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("9lives").is_err());
        assert!(validate_username("_hidden").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }
}
