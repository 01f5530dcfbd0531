use serde::{Deserialize, Serialize};

/// Binary role flag. No richer authorization policy exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The single current authenticated identity, persisted as one JSON value.
///
/// Derived from a matched credential record or a demo account at login; no
/// back-reference to the record is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_setup_complete: bool,
}

/// Partial update merged into the active identity.
#[derive(Debug, Clone, Default)]
pub struct IdentityUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_setup_complete: Option<bool>,
}

impl IdentityUpdate {
    pub fn profile_complete() -> Self {
        Self {
            profile_setup_complete: Some(true),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn identity_roundtrips_through_json() {
        let identity = SessionIdentity {
            id: "demo-admin".into(),
            username: "demo".into(),
            email: "demo@markethub.app".into(),
            role: Role::Admin,
            profile_setup_complete: true,
        };
        let json = serde_json::to_string(&identity).unwrap();
        let back: SessionIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }
}
