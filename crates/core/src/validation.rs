//! Field limits and validation functions for user-supplied content.
//!
//! Validators return `Err(message)`; the lifecycle engine wraps the message
//! in [`CoreError::Validation`](crate::error::CoreError::Validation).

use crate::entities::{NewComment, NewPost, NewTopic};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of a username in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length of a user bio in characters.
pub const MAX_BIO_LENGTH: usize = 500;

/// Maximum length of a topic name or post title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a topic description or post body in characters.
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Maximum length of a comment body in characters.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

/// Validate a required text field: non-blank and at most `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.chars().count() > max {
        return Err(format!(
            "{field} exceeds maximum length of {max} characters"
        ));
    }
    Ok(())
}

/// Validate a username: non-blank, bounded, and free of whitespace.
pub fn validate_username(username: &str) -> Result<(), String> {
    validate_required("Username", username, MAX_USERNAME_LENGTH)?;
    if username.chars().any(char::is_whitespace) {
        return Err("Username must not contain whitespace".to_string());
    }
    Ok(())
}

pub fn validate_bio(bio: &str) -> Result<(), String> {
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(format!(
            "Bio exceeds maximum length of {MAX_BIO_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entity validators
// ---------------------------------------------------------------------------

pub fn validate_new_topic(input: &NewTopic) -> Result<(), String> {
    validate_required("Name", &input.name, MAX_TITLE_LENGTH)?;
    validate_required("Description", &input.description, MAX_BODY_LENGTH)
}

pub fn validate_new_post(input: &NewPost) -> Result<(), String> {
    validate_required("Title", &input.title, MAX_TITLE_LENGTH)?;
    validate_required("Body", &input.body, MAX_BODY_LENGTH)
}

pub fn validate_new_comment(input: &NewComment) -> Result<(), String> {
    validate_required("Body", &input.body, MAX_COMMENT_LENGTH)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
