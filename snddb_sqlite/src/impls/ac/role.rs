use async_trait::async_trait;
use sndcore::{
    ac::{
        role::RoleName,
        traits::RoleBackend,
    },
    error::BackendError,
};

use crate::SqliteBackend;

async fn add_role_sqlite(
    backend: &SqliteBackend,
    name: &RoleName,
) -> Result<i64, BackendError> {
    let id = sqlx::query_scalar::<_, i64>(r#"
INSERT INTO role (
    name
)
VALUES ( ?1 )
ON CONFLICT(name) DO UPDATE SET name = excluded.name
RETURNING id
        "#,
    )
    .bind(name.as_str())
    .fetch_one(&*backend.pool)
    .await?;
    Ok(id)
}

async fn list_roles_sqlite(
    backend: &SqliteBackend,
) -> Result<Vec<RoleName>, BackendError> {
    let recs = sqlx::query_scalar::<_, String>(r#"
SELECT
    name
FROM
    role
ORDER BY id
        "#,
    )
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs.into_iter()
        .map(RoleName::from)
        .collect())
}

async fn add_permission_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<i64, BackendError> {
    let id = sqlx::query_scalar::<_, i64>(r#"
INSERT INTO permission (
    name
)
VALUES ( ?1 )
ON CONFLICT(name) DO UPDATE SET name = excluded.name
RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(&*backend.pool)
    .await?;
    Ok(id)
}

async fn attach_permission_to_role_sqlite(
    backend: &SqliteBackend,
    role: &RoleName,
    permission: &str,
) -> Result<bool, BackendError> {
    let permission_id = add_permission_sqlite(backend, permission).await?;
    let result = sqlx::query(r#"
INSERT OR IGNORE INTO role_has_permission (
    role_id,
    permission_id
)
SELECT id, ?2 FROM role WHERE name = ?1
        "#,
    )
    .bind(role.as_str())
    .bind(permission_id)
    .execute(&*backend.pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn detach_permission_from_role_sqlite(
    backend: &SqliteBackend,
    role: &RoleName,
    permission: &str,
) -> Result<bool, BackendError> {
    let result = sqlx::query(r#"
DELETE FROM
    role_has_permission
WHERE
    role_id = (SELECT id FROM role WHERE name = ?1)
    AND permission_id = (SELECT id FROM permission WHERE name = ?2)
        "#,
    )
    .bind(role.as_str())
    .bind(permission)
    .execute(&*backend.pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn assign_role_to_user_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    role: &RoleName,
) -> Result<bool, BackendError> {
    let result = sqlx::query(r#"
INSERT OR IGNORE INTO model_has_role (
    user_id,
    role_id
)
SELECT ?1, id FROM role WHERE name = ?2
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(&*backend.pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn revoke_role_from_user_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    role: &RoleName,
) -> Result<bool, BackendError> {
    let result = sqlx::query(r#"
DELETE FROM
    model_has_role
WHERE
    user_id = ?1
    AND role_id = (SELECT id FROM role WHERE name = ?2)
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(&*backend.pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl RoleBackend for SqliteBackend {
    async fn add_role(
        &self,
        name: &RoleName,
    ) -> Result<i64, BackendError> {
        add_role_sqlite(&self, name).await
    }

    async fn list_roles(
        &self,
    ) -> Result<Vec<RoleName>, BackendError> {
        list_roles_sqlite(&self).await
    }

    async fn add_permission(
        &self,
        name: &str,
    ) -> Result<i64, BackendError> {
        add_permission_sqlite(&self, name).await
    }

    async fn attach_permission_to_role(
        &self,
        role: &RoleName,
        permission: &str,
    ) -> Result<bool, BackendError> {
        attach_permission_to_role_sqlite(&self, role, permission).await
    }

    async fn detach_permission_from_role(
        &self,
        role: &RoleName,
        permission: &str,
    ) -> Result<bool, BackendError> {
        detach_permission_from_role_sqlite(&self, role, permission).await
    }

    async fn assign_role_to_user(
        &self,
        user_id: i64,
        role: &RoleName,
    ) -> Result<bool, BackendError> {
        assign_role_to_user_sqlite(&self, user_id, role).await
    }

    async fn revoke_role_from_user(
        &self,
        user_id: i64,
        role: &RoleName,
    ) -> Result<bool, BackendError> {
        revoke_role_from_user_sqlite(&self, user_id, role).await
    }
}
