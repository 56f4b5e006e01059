//! Base contract system

use kb_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;
}

/// Validate a name is present and within length
pub fn validate_name(field: &str, name: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.add(field, "can't be blank");
    } else if name.chars().count() > 255 {
        errors.add(field, "is too long (maximum is 255 characters)");
    }
}

/// Fold the derive-based `validator` checks into our error collection
pub fn merge_derived<T: validator::Validate>(entity: &T, errors: &mut ValidationErrors) {
    if let Err(derived) = entity.validate() {
        for (field, field_errors) in derived.field_errors() {
            if errors.has_error(field) {
                continue;
            }
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                errors.add(field, message);
            }
        }
    }
}
