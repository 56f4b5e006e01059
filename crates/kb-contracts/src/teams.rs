//! Team contract

use kb_core::error::ValidationErrors;
use kb_models::NewTeam;

use crate::base::{validate_name, Contract, ValidationResult};

/// Contract for creating a team
#[derive(Debug, Default)]
pub struct TeamContract;

impl TeamContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract<NewTeam> for TeamContract {
    fn validate(&self, team: &NewTeam) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_name("name", &team.name, &mut errors);

        if team.members.is_empty() {
            errors.add("members", "must contain at least one member");
        }
        for member in &team.members {
            if member.name.trim().is_empty() {
                errors.add("members", "can't contain a member without a name");
                break;
            }
        }

        errors.into_result()
    }
}
