//! Core error types for Kanban RS
//!
//! Every layer converts into [`KbError`] at its public boundary.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all board operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KbError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    /// A remote write backing an optimistic operation failed.
    /// The local state has already been rolled back when this is returned.
    #[error("Remote write failed during {operation}: {message}")]
    RemoteWrite {
        operation: &'static str,
        message: String,
    },

    /// The selected project could not be mirrored into its owning team.
    #[error("Sync inconsistency: project {project_id} is not listed under team {team_id}")]
    SyncInconsistency { team_id: String, project_id: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl KbError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn remote_write(operation: &'static str, message: impl Into<String>) -> Self {
        Self::RemoteWrite {
            operation,
            message: message.into(),
        }
    }

    /// Whether the caller may repeat the same action by hand
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteWrite { .. } | Self::ExternalService { .. })
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            KbError::NotFound { .. } => "not_found",
            KbError::Validation(_) => "validation_failed",
            KbError::Contract(_) => "contract_violated",
            KbError::RemoteWrite { .. } => "remote_write_failed",
            KbError::SyncInconsistency { .. } => "sync_inconsistency",
            KbError::ExternalService { .. } => "external_service_error",
            KbError::Config(_) => "configuration_error",
            KbError::Internal(_) => "internal_error",
            KbError::Conflict { .. } => "conflict",
        }
    }
}

/// Validation errors collection
///
/// Field names are kept sorted so messages render deterministically.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("{}", self.full_messages().join(", "))]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Contract validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("Attribute {attribute} is invalid: {message}")]
    AttributeInvalid { attribute: String, message: String },

    #[error("Base contract error: {message}")]
    Base { message: String },

    #[error("Multiple contract errors")]
    Multiple { errors: ValidationErrors },
}

impl From<ContractError> for ValidationErrors {
    fn from(err: ContractError) -> Self {
        let mut errors = ValidationErrors::new();
        match err {
            ContractError::AttributeInvalid { attribute, message } => {
                errors.add(attribute, message);
            }
            ContractError::Base { message } => {
                errors.add_base(message);
            }
            ContractError::Multiple { errors: e } => {
                return e;
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add("due_date", "can't be blank");
        errors.add_base("Team not found");

        assert!(errors.has_error("name"));
        assert_eq!(
            errors.full_messages(),
            vec![
                "Team not found".to_string(),
                "due_date can't be blank".to_string(),
                "name can't be blank".to_string(),
            ]
        );
    }

    #[test]
    fn test_merge_and_into_result() {
        let mut a = ValidationErrors::new();
        assert!(a.clone().into_result().is_ok());

        let mut b = ValidationErrors::new();
        b.add("members", "must contain at least one member");
        a.merge(b);
        assert!(a.into_result().is_err());
    }

    #[test]
    fn test_contract_error_conversion() {
        let errors: ValidationErrors = ContractError::AttributeInvalid {
            attribute: "assignee".into(),
            message: "is not a member of the team".into(),
        }
        .into();
        assert_eq!(errors.get("assignee").map(Vec::len), Some(1));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(KbError::remote_write("move_card", "timeout").is_retryable());
        assert!(!KbError::not_found("Card", "id", "c1").is_retryable());
        assert_eq!(
            KbError::Validation(ValidationErrors::new()).error_code(),
            "validation_failed"
        );
    }
}
