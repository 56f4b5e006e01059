//! Result type aliases and the service result pattern

use crate::error::{KbError, ValidationErrors};

/// Standard Result type for board operations
pub type KbResult<T> = Result<T, KbError>;

/// Outcome of a create service: either the created value or the
/// validation errors that stopped it before anything was persisted.
#[derive(Debug)]
pub struct ServiceResult<T> {
    success: bool,
    result: Option<T>,
    errors: ValidationErrors,
}

impl<T> ServiceResult<T> {
    /// Create a successful result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
        }
    }

    /// Create a failed result with errors
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }

    /// Create a failed result with a single base error
    pub fn failure_with_message(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Map the result value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceResult<U> {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
        }
    }

    /// Convert to standard Result
    pub fn into_result(self) -> KbResult<T> {
        if self.success {
            self.result.ok_or_else(|| {
                KbError::Internal("ServiceResult success but no result value".into())
            })
        } else {
            Err(KbError::Validation(self.errors))
        }
    }
}

impl<T> From<KbResult<T>> for ServiceResult<T> {
    fn from(result: KbResult<T>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(KbError::Validation(errors)) => ServiceResult::failure(errors),
            Err(e) => ServiceResult::failure_with_message(e.to_string()),
        }
    }
}

impl<T> From<ServiceResult<T>> for KbResult<T> {
    fn from(result: ServiceResult<T>) -> Self {
        result.into_result()
    }
}
