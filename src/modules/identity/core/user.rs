use serde::{Deserialize, Serialize};

/// One login identity: the provider that issued it and the subject it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub issuer: String,
    pub subject_id: String,
    pub email: String,
}

impl Identity {
    pub fn same_subject(&self, other: &Identity) -> bool {
        self.issuer == other.issuer && self.subject_id == other.subject_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub identities: Vec<Identity>,
}

impl User {
    pub fn new(id: impl Into<String>, identity: Identity) -> Self {
        Self {
            id: id.into(),
            identities: vec![identity],
        }
    }

    pub fn identity_for(&self, identity: &Identity) -> Option<&Identity> {
        self.identities.iter().find(|known| known.same_subject(identity))
    }

    /// Corrects the stored email of a matching identity. Returns whether anything changed.
    pub fn refresh_email(&mut self, identity: &Identity) -> bool {
        match self
            .identities
            .iter_mut()
            .find(|known| known.same_subject(identity))
        {
            Some(known) if known.email != identity.email => {
                known.email.clone_from(&identity.email);
                true
            }
            _ => false,
        }
    }
}
