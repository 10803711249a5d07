use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub billable: bool,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project: {} ({}) (billable: {})",
            self.name, self.description, self.billable
        )
    }
}

#[cfg(test)]
mod projects_project_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_render_name_description_and_billable_flag() {
        let project = Project {
            id: "p-1".into(),
            user_id: "u-1".into(),
            name: "acme".into(),
            description: "Client work".into(),
            billable: true,
        };
        assert_eq!(
            project.to_string(),
            "Project: acme (Client work) (billable: true)"
        );
    }
}
