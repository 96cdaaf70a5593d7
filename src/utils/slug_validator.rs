//! Custom slug validation
//!
//! A slug is optional. When present it must be 3..=50 characters drawn from
//! `[A-Za-z0-9_-]`.

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugValidationError {
    TooShort(usize),
    TooLong(usize),
    InvalidCharacter(char),
}

impl std::fmt::Display for SlugValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort(len) => write!(
                f,
                "Custom slug is too short ({} characters, minimum {})",
                len, SLUG_MIN_LEN
            ),
            Self::TooLong(len) => write!(
                f,
                "Custom slug is too long ({} characters, maximum {})",
                len, SLUG_MAX_LEN
            ),
            Self::InvalidCharacter(c) => write!(
                f,
                "Custom slug contains invalid character {:?}; only letters, digits, '-' and '_' are allowed",
                c
            ),
        }
    }
}

impl std::error::Error for SlugValidationError {}

#[inline]
fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validate an optional slug. `None` and `""` are accepted.
pub fn validate_slug(input: Option<&str>) -> Result<(), SlugValidationError> {
    let Some(slug) = input.filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    if let Some(bad) = slug.chars().find(|c| !is_slug_char(*c)) {
        return Err(SlugValidationError::InvalidCharacter(bad));
    }

    // charset is ASCII at this point, so byte length == char count
    let len = slug.len();
    if len < SLUG_MIN_LEN {
        return Err(SlugValidationError::TooShort(len));
    }
    if len > SLUG_MAX_LEN {
        return Err(SlugValidationError::TooLong(len));
    }

    Ok(())
}

/// Trim a user-supplied slug; blank input means "let the provider pick".
pub fn normalize_slug(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
