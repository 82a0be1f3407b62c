//! Masking for log output and validation of login input
//!
//! Tokens and URLs pass through here before they reach a `tracing` call.

use thiserror::Error;

/// Errors raised when validating user-supplied login fields
#[derive(Debug, Error, PartialEq)]
pub enum SanitizerError {
    /// Input contains control characters
    #[error("Invalid input: contains control characters")]
    InvalidInput,
}

/// Sanitizer for sensitive data
pub struct Sanitizer;

impl Sanitizer {
    /// Masks a token for logging, keeping only the last 4 characters
    ///
    /// # Examples
    ///
    /// ```
    /// use kvgate::security::Sanitizer;
    ///
    /// assert_eq!(Sanitizer::sanitize_token("eyJhbGciOiJIUzI1NiJ9.payload"), "***load");
    /// assert_eq!(Sanitizer::sanitize_token("abc"), "****");
    /// ```
    pub fn sanitize_token(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() > 4 {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("***{}", tail)
        } else {
            "****".to_string()
        }
    }

    /// Drops query string and fragment from a URL before logging it
    ///
    /// # Examples
    ///
    /// ```
    /// use kvgate::security::Sanitizer;
    ///
    /// assert_eq!(
    ///     Sanitizer::sanitize_url("http://localhost:8000/users/me?token=secret"),
    ///     "http://localhost:8000/users/me"
    /// );
    /// ```
    pub fn sanitize_url(url: &str) -> String {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        url[..end].to_string()
    }

    /// Validates a username before it is sent to `/auth/token`
    ///
    /// Any control character, newline and null byte included, is rejected.
    /// Everything else, blank or long names too, goes to the server as typed
    /// and is judged there.
    pub fn validate_username(input: &str) -> Result<(), SanitizerError> {
        if input.chars().any(|c| c.is_control()) {
            return Err(SanitizerError::InvalidInput);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_token_normal() {
        assert_eq!(Sanitizer::sanitize_token("tok-123456"), "***3456");
    }

    #[test]
    fn test_sanitize_token_short() {
        assert_eq!(Sanitizer::sanitize_token(""), "****");
        assert_eq!(Sanitizer::sanitize_token("abcd"), "****");
        assert_eq!(Sanitizer::sanitize_token("abcde"), "***bcde");
    }

    #[test]
    fn test_sanitize_token_multibyte() {
        assert_eq!(Sanitizer::sanitize_token("ключ-токен"), "***окен");
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(
            Sanitizer::sanitize_url("https://api.example.com/auth?token=secret&user=admin"),
            "https://api.example.com/auth"
        );
        assert_eq!(
            Sanitizer::sanitize_url("https://example.com/page#section"),
            "https://example.com/page"
        );
        assert_eq!(
            Sanitizer::sanitize_url("https://api.example.com/path"),
            "https://api.example.com/path"
        );
    }

    #[test]
    fn test_validate_username() {
        assert!(Sanitizer::validate_username("alice").is_ok());
        assert!(Sanitizer::validate_username("alice@example.com").is_ok());
        assert_eq!(
            Sanitizer::validate_username("ali\0ce"),
            Err(SanitizerError::InvalidInput)
        );
        assert_eq!(
            Sanitizer::validate_username("bob\n"),
            Err(SanitizerError::InvalidInput)
        );
    }

    #[test]
    fn test_validate_username_leaves_the_rest_to_the_server() {
        assert!(Sanitizer::validate_username("").is_ok());
        assert!(Sanitizer::validate_username("   ").is_ok());
        assert!(Sanitizer::validate_username(&"a".repeat(300)).is_ok());
        assert_eq!(
            Sanitizer::validate_username("\talice"),
            Err(SanitizerError::InvalidInput)
        );
    }
}
