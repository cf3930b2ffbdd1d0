use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Regex for validating semantic version strings
    /// - Valid: "1.0", "1.0.0", "12.34.56"
    /// - Invalid: "v1.0", "1", "1.0.0-beta"
    pub static ref VERSION_REGEX: Regex = Regex::new(r"^\d+\.\d+(\.\d+)?$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_regex_valid() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("user123"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(USERNAME_REGEX.is_match("JohnDoe"));
    }

    #[test]
    fn test_username_regex_invalid() {
        assert!(!USERNAME_REGEX.is_match("123user")); // starts with digit
        assert!(!USERNAME_REGEX.is_match("-user")); // starts with hyphen
        assert!(!USERNAME_REGEX.is_match("user-name")); // hyphen
        assert!(!USERNAME_REGEX.is_match("user name")); // space
        assert!(!USERNAME_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_version_regex_valid() {
        assert!(VERSION_REGEX.is_match("1.0"));
        assert!(VERSION_REGEX.is_match("1.0.0"));
        assert!(VERSION_REGEX.is_match("12.34.56"));
    }

    #[test]
    fn test_version_regex_invalid() {
        assert!(!VERSION_REGEX.is_match("v1.0"));
        assert!(!VERSION_REGEX.is_match("1"));
        assert!(!VERSION_REGEX.is_match("1.0.0-beta"));
        assert!(!VERSION_REGEX.is_match(""));
    }
}
