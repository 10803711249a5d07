use crate::modules::identity::core::user::{Identity, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResource {
    #[serde(rename = "provider")]
    pub issuer: String,
    #[serde(rename = "subjectid")]
    pub subject_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResource {
    pub id: String,
    pub identities: Vec<IdentityResource>,
}

impl From<&Identity> for IdentityResource {
    fn from(identity: &Identity) -> Self {
        Self {
            issuer: identity.issuer.clone(),
            subject_id: identity.subject_id.clone(),
            email: identity.email.clone(),
        }
    }
}

impl From<&User> for UserResource {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            identities: user.identities.iter().map(IdentityResource::from).collect(),
        }
    }
}
