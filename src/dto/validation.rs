//! Validation helpers for DTOs.

use validator::ValidationError;

/// Rejects values made only of whitespace.
///
/// ```ignore
/// validate_not_blank("Ada")  // Ok
/// validate_not_blank("   ") // Err
/// ```
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must contain at least one visible character".into());
        return Err(err);
    }
    Ok(())
}

/// Rejects option lists with blank or duplicated entries.
pub fn validate_option_list(options: &[String]) -> Result<(), ValidationError> {
    if options.iter().any(|option| option.trim().is_empty()) {
        let mut err = ValidationError::new("blank_option");
        err.message = Some("Options must not be blank".into());
        return Err(err);
    }
    for (index, option) in options.iter().enumerate() {
        if options[..index].contains(option) {
            let mut err = ValidationError::new("duplicate_option");
            err.message = Some(format!("Option `{option}` is listed twice").into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("Ada").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t").is_err());
    }

    #[test]
    fn option_lists_must_be_distinct() {
        let ok = vec!["A: x".to_string(), "B: y".to_string()];
        assert!(validate_option_list(&ok).is_ok());

        let duplicate = vec!["A: x".to_string(), "A: x".to_string()];
        assert!(validate_option_list(&duplicate).is_err());

        let blank = vec!["A: x".to_string(), " ".to_string()];
        assert!(validate_option_list(&blank).is_err());
    }
}
