//! # User Repository
//!
//! Backend user profiles. The role is stored alongside the profile since the
//! API's `/users/profile` response carries both.

use carhire_core::{Role, User};
use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A user together with the role they registered as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id or email already registered
    pub async fn insert(&self, user: &User, role: Role) -> DbResult<()> {
        debug!(user_id = %user.id, role = %role, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, phone, avatar, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.avatar)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                let value = if field.ends_with("email") {
                    user.email.clone()
                } else {
                    user.id.clone()
                };
                DbError::duplicate(field, value)
            }
            other => other,
        })?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserProfile>> {
        let row = sqlx::query(
            "SELECT id, email, name, phone, avatar, role FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }
}

fn profile_from_row(row: &SqliteRow) -> DbResult<UserProfile> {
    let role: String = row.try_get("role")?;
    let role = role.parse::<Role>().map_err(|e| DbError::CorruptColumn {
        column: "role".to_string(),
        reason: e.to_string(),
    })?;

    Ok(UserProfile {
        user: User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            avatar: row.try_get("avatar")?,
        },
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn amina() -> User {
        User {
            id: "u1".to_string(),
            email: "amina@example.com".to_string(),
            name: "Amina".to_string(),
            phone: Some("0712345678".to_string()),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_profile() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert(&amina(), Role::Owner).await.unwrap();

        let profile = repo.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(profile.user, amina());
        assert_eq!(profile.role, Role::Owner);
        assert!(repo.get_by_id("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_reports_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        repo.insert(&amina(), Role::Renter).await.unwrap();

        let mut other = amina();
        other.id = "u2".to_string();
        let err = repo.insert(&other, Role::Renter).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueViolation { ref value, .. } if value == "amina@example.com"
        ));
    }

    #[test]
    fn test_profile_serializes_flat() {
        let profile = UserProfile {
            user: amina(),
            role: Role::Owner,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["role"], "owner");
        assert!(json.get("avatar").is_none());
    }
}
