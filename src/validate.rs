//! Input validation at the presentation boundary.
//!
//! The task store accepts anything it is given. These checks run in the CLI and
//! the TUI form before a draft or patch reaches the store.

use chrono::NaiveDate;

pub const MAX_DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Task description is required")]
    EmptyDescription,
    #[error("Task description must be less than {MAX_DESCRIPTION_CHARS} characters")]
    DescriptionTooLong,
    #[error("Due date cannot be in the past")]
    DueInPast,
    #[error("Unrecognised due date '{0}'. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'")]
    BadDueDate(String),
}

/// Trim and check a description. Returns the trimmed text.
pub fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if raw.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(trimmed.to_string())
}

/// A due date may be today or later.
pub fn validate_due_date(due: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if due < today {
        return Err(ValidationError::DueInPast);
    }
    Ok(due)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_descriptions() {
        assert_eq!(validate_description("  Buy milk ").unwrap(), "Buy milk");
        assert!(validate_description(&"a".repeat(200)).is_ok());
        assert!(validate_description(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn invalid_descriptions() {
        assert_eq!(validate_description(""), Err(ValidationError::EmptyDescription));
        assert_eq!(validate_description("   "), Err(ValidationError::EmptyDescription));
        assert_eq!(
            validate_description(&"a".repeat(201)),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn due_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(validate_due_date(today, today).is_ok());
        assert!(validate_due_date(today.succ_opt().unwrap(), today).is_ok());
        assert_eq!(
            validate_due_date(today.pred_opt().unwrap(), today),
            Err(ValidationError::DueInPast)
        );
    }
}
