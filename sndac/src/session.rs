use serde::Deserialize;
use sndcore::ac::{
    principal::Principal,
    role::RoleName,
};

/// The user as carried on an authenticated session.  Sessions issued by
/// older deployments may omit any of the optional fields.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "isActive", alias = "is_active")]
    pub is_active: Option<bool>,
}

impl From<SessionUser> for Principal {
    fn from(user: SessionUser) -> Self {
        Principal {
            id: user.id,
            email: user.email.unwrap_or_default(),
            name: user.name.unwrap_or_default(),
            role: user.role
                .map(RoleName::from)
                .filter(|role| !role.is_empty())
                .unwrap_or_default(),
            is_active: user.is_active.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod test {
    use sndcore::ac::role::{MANAGER, USER};
    use super::*;

    #[test]
    fn full_session() -> anyhow::Result<()> {
        let user: SessionUser = serde_json::from_str(r#"{
            "id": "12",
            "email": "jo@example.com",
            "name": "Jo",
            "role": "manager",
            "isActive": false
        }"#)?;
        let principal = Principal::from(user);
        assert_eq!(principal.id, "12");
        assert_eq!(principal.email, "jo@example.com");
        assert_eq!(principal.role, MANAGER);
        assert!(!principal.is_active);
        Ok(())
    }

    #[test]
    fn sparse_session() -> anyhow::Result<()> {
        let user: SessionUser = serde_json::from_str(r#"{"id": "3", "role": "  "}"#)?;
        let principal = Principal::from(user);
        assert_eq!(principal.role, USER);
        assert!(principal.is_active);
        assert_eq!(principal.name, "");
        Ok(())
    }
}
