use async_trait::async_trait;
use mockall::mock;
use sndcore::{
    ac::{
        role::RoleName,
        traits::PolicyBackend,
    },
    error::BackendError,
};

mock! {
    pub Store {}

    #[async_trait]
    impl PolicyBackend for Store {
        async fn load_roles_for_user(
            &self,
            user_id: &str,
        ) -> Result<Vec<RoleName>, BackendError>;
        async fn load_permissions_for_roles(
            &self,
            roles: &[RoleName],
        ) -> Result<Vec<String>, BackendError>;
    }
}

/// A store reporting the same roles and permissions for every user.
pub fn policy_store(roles: &[&str], permissions: &[&str]) -> MockStore {
    let roles = roles.iter()
        .map(|role| RoleName::from(*role))
        .collect::<Vec<_>>();
    let permissions = permissions.iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    let mut store = MockStore::new();
    store.expect_load_roles_for_user()
        .returning(move |_| Ok(roles.clone()));
    store.expect_load_permissions_for_roles()
        .returning(move |roles| Ok(if roles.is_empty() {
            Vec::new()
        } else {
            permissions.clone()
        }));
    store
}

/// A store that cannot be reached.
pub fn failing_policy_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_load_roles_for_user()
        .returning(|_| Err(BackendError::Unavailable("connection refused".into())));
    store.expect_load_permissions_for_roles()
        .returning(|_| Err(BackendError::Unavailable("connection refused".into())));
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn smoke_test_stores() -> anyhow::Result<()> {
        let store = policy_store(&["manager"], &["read.report"]);
        let roles = store.load_roles_for_user("1").await?;
        assert_eq!(roles, [RoleName::from("MANAGER")]);
        assert_eq!(store.load_permissions_for_roles(&roles).await?, ["read.report"]);
        assert!(store.load_permissions_for_roles(&[]).await?.is_empty());

        let store = failing_policy_store();
        assert!(store.load_roles_for_user("1").await.is_err());
        Ok(())
    }
}
