//! Team model
//!
//! The team is the unit of persistence: every write to a project or card
//! ends up as a `PATCH teams/{id}` carrying the team's whole project list.

use kb_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::member::Member;
use crate::project::Project;

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Id,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Team {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    /// Copy of the project list with one entry replaced by id
    pub fn projects_with(&self, updated: &Project) -> Vec<Project> {
        self.projects
            .iter()
            .map(|p| if p.id == updated.id { updated.clone() } else { p.clone() })
            .collect()
    }
}

impl Identifiable for Team {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Team {
    const RESOURCE_NAME: &'static str = "teams";
    const TYPE_NAME: &'static str = "Team";
}

/// Team payload for `POST teams` (the store assigns or echoes the id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub members: Vec<Member>,
    pub projects: Vec<Project>,
}

impl NewTeam {
    pub fn into_team(self, id: Id) -> Team {
        Team {
            id,
            name: self.name,
            description: self.description,
            members: self.members,
            projects: self.projects,
        }
    }
}

/// Partial team for `PATCH teams/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
}

impl TeamPatch {
    pub fn projects(projects: Vec<Project>) -> Self {
        Self {
            projects: Some(projects),
            ..Default::default()
        }
    }

    /// Apply the patch the way the store does: shallow field replacement
    pub fn apply_to(self, team: &mut Team) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(description) = self.description {
            team.description = Some(description);
        }
        if let Some(members) = self.members {
            team.members = members;
        }
        if let Some(projects) = self.projects {
            team.projects = projects;
        }
    }
}
