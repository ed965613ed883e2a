use async_trait::async_trait;
use sndcore::{
    ac::{
        role::RoleName,
        traits::PolicyBackend,
    },
    error::BackendError,
};
use sqlx::{QueryBuilder, Sqlite};

use crate::SqliteBackend;

async fn load_roles_for_user_sqlite(
    backend: &SqliteBackend,
    user_id: &str,
) -> Result<Vec<RoleName>, BackendError> {
    let Ok(user_id) = user_id.parse::<i64>() else {
        log::warn!("user id {user_id:?} is not a valid key; treating as having no roles");
        return Ok(Vec::new());
    };
    let recs = sqlx::query_scalar::<_, String>(r#"
SELECT
    role.name
FROM
    model_has_role
JOIN
    role ON role.id = model_has_role.role_id
WHERE
    model_has_role.user_id = ?1
ORDER BY role.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs.into_iter()
        .map(RoleName::from)
        .collect())
}

async fn load_permissions_for_roles_sqlite(
    backend: &SqliteBackend,
    roles: &[RoleName],
) -> Result<Vec<String>, BackendError> {
    if roles.is_empty() {
        return Ok(Vec::new());
    }
    let mut query = QueryBuilder::<Sqlite>::new(r#"
SELECT
    permission.name
FROM
    role_has_permission
JOIN
    role ON role.id = role_has_permission.role_id
JOIN
    permission ON permission.id = role_has_permission.permission_id
WHERE
    role.name IN ("#
    );
    let mut separated = query.separated(", ");
    for role in roles {
        separated.push_bind(role.to_string());
    }
    separated.push_unseparated(")");
    let recs = query.build_query_scalar::<String>()
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs)
}

#[async_trait]
impl PolicyBackend for SqliteBackend {
    async fn load_roles_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<RoleName>, BackendError> {
        load_roles_for_user_sqlite(
            &self,
            user_id,
        ).await
    }

    async fn load_permissions_for_roles(
        &self,
        roles: &[RoleName],
    ) -> Result<Vec<String>, BackendError> {
        load_permissions_for_roles_sqlite(
            &self,
            roles,
        ).await
    }
}
