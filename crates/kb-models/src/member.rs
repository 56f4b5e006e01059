//! Team member model

use kb_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Member of a team
///
/// Cards reference members by value in their `assignee` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Id,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Member {
    /// Default role for members added while creating a team
    pub const ROLE_MEMBER: &'static str = "member";

    /// New member with a fresh id, an empty email and the `member` role
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            name: name.into(),
            email: Some(String::new()),
            role: Some(Self::ROLE_MEMBER.to_string()),
        }
    }
}

impl Identifiable for Member {
    fn id(&self) -> &str {
        &self.id
    }
}
