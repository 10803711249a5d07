use crate::modules::projects::core::project::Project;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire shape of a project, used both as request body and response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub billable: bool,
}

impl From<&Project> for ProjectResource {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            billable: project.billable,
        }
    }
}

impl fmt::Display for ProjectResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project: {} ({}) (billable: {})",
            self.name, self.description, self.billable
        )
    }
}
