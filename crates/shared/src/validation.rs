//! Common validation utilities.
//!
//! Validation is structural only: these helpers check shape (length, allowed
//! characters, URL scheme), never whether a date is a real calendar date or a
//! URL is reachable.

use validator::ValidationError;

/// Minimum number of characters in a person's display name.
pub const MIN_NAME_CHARS: usize = 2;

/// Minimum number of digits in a contact phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_CHARS: usize = 8;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a profile display name (at least two visible characters).
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() >= MIN_NAME_CHARS {
        Ok(())
    } else {
        Err(error(
            "name_length",
            "Name must be at least 2 characters",
        ))
    }
}

/// Validates a phone number: digits with optional `+`, spaces or dashes,
/// and at least ten digits in total.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
    if !allowed {
        return Err(error(
            "phone_format",
            "Phone number may only contain digits, spaces, dashes and a leading +",
        ));
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(error(
            "phone_length",
            "Phone number must contain at least 10 digits",
        ));
    }

    Ok(())
}

/// Validates password length for new accounts.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_CHARS {
        Ok(())
    } else {
        Err(error(
            "password_length",
            "Password must be at least 8 characters",
        ))
    }
}

/// Validates a media or link URL: absolute `http`/`https` URLs, or paths
/// relative to the site root (`/uploads/a.jpg`, but not `//host/a.jpg`).
pub fn validate_media_url(url: &str) -> Result<(), ValidationError> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    let site_relative = trimmed.starts_with('/') && !trimmed.starts_with("//");

    let well_formed = match rest {
        Some(host) => !host.is_empty(),
        None => site_relative,
    };
    if well_formed && !trimmed.contains(|c: char| c.is_whitespace() || c == '\\') {
        Ok(())
    } else {
        Err(error(
            "url_format",
            "URL must be an http(s) address or a site path",
        ))
    }
}

/// Validates a CSS color value. Anything that could break out of a `style`
/// attribute is rejected; the color itself is not interpreted.
pub fn validate_css_color(color: &str) -> Result<(), ValidationError> {
    let trimmed = color.trim();
    if trimmed.is_empty() || trimmed.len() > 64 {
        return Err(error("color_length", "Color must be 1 to 64 characters"));
    }
    if trimmed
        .chars()
        .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\'))
    {
        return Err(error("color_format", "Color contains invalid characters"));
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("url(") || lower.contains("expression(") || lower.contains(':') {
        return Err(error("color_format", "Color contains invalid characters"));
    }
    Ok(())
}
