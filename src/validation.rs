use crate::error::{Error, Result};

pub const FIRST_WRAPPED_YEAR: i32 = 2008;
const MAX_USERNAME_LEN: usize = 39;

/// GitHub logins: alphanumerics and single hyphens, no hyphen at either end.
pub fn validate_username(username: &str) -> Result<()> {
    let invalid = || Error::InvalidUsername(username.to_string());

    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(invalid());
    }
    if username.starts_with('-') || username.ends_with('-') || username.contains("--") {
        return Err(invalid());
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_year(year: i32, current_year: i32) -> Result<()> {
    if (FIRST_WRAPPED_YEAR..=current_year).contains(&year) {
        Ok(())
    } else {
        Err(Error::InvalidYear(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("octocat").is_ok());
        assert!(validate_username("a").is_ok());
        assert!(validate_username("some-user-42").is_ok());
        assert!(validate_username(&"a".repeat(39)).is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("-leading").is_err());
        assert!(validate_username("trailing-").is_err());
        assert!(validate_username("double--hyphen").is_err());
        assert!(validate_username("under_score").is_err());
        assert!(validate_username(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_year_range() {
        assert!(validate_year(2008, 2026).is_ok());
        assert!(validate_year(2026, 2026).is_ok());
        assert!(matches!(validate_year(2007, 2026), Err(Error::InvalidYear(2007))));
        assert!(validate_year(2027, 2026).is_err());
    }
}
