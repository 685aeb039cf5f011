//! # User Repository
//!
//! Customer and admin accounts. `is_admin` separates the two; there is no
//! separate admins table.
//!
//! The stored password hash stays inside this module: callers get
//! [`ribbon_core::User`], which has no hash field.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::password::{hash_password, verify_password};
use ribbon_core::User;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, is_admin";

#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRecord {
    id: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    is_admin: bool,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            is_admin: record.is_admin,
        }
    }
}

/// Account to create. The password is hashed before it is stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account. A taken email is a [`DbError::UniqueViolation`].
    pub async fn insert(&self, new_user: &NewUser) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let email = new_user.email.trim().to_lowercase();
        let password_hash = hash_password(&new_user.password)?;

        debug!(email = %email, is_admin = new_user.is_admin, "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, is_admin, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(&password_hash)
        .bind(new_user.first_name.trim())
        .bind(new_user.last_name.trim())
        .bind(new_user.is_admin)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&email))?;

        info!(user_id = %id, is_admin = new_user.is_admin, "User created");

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("User", &id))
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    /// Case-insensitive lookup.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self.record_by_email(email).await?.map(User::from))
    }

    /// Checks credentials. `Ok(None)` for an unknown email or wrong
    /// password; the two are not distinguished.
    pub async fn authenticate(&self, email: &str, password: &str) -> DbResult<Option<User>> {
        let record = match self.record_by_email(email).await? {
            Some(record) => record,
            None => {
                debug!("Login for unknown email");
                return Ok(None);
            }
        };

        if verify_password(password, &record.password_hash) {
            Ok(Some(User::from(record)))
        } else {
            debug!(user_id = %record.id, "Password mismatch");
            Ok(None)
        }
    }

    async fn record_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn new_user(email: &str, is_admin: bool) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "correct horse".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            is_admin,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::in_memory().await.unwrap();
        let users = db.users();

        let created = users.insert(&new_user("Ann@Example.com", false)).await.unwrap();
        assert_eq!(created.email, "ann@example.com");
        assert!(!created.is_admin);

        let by_id = users.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_email = users.find_by_email("ANN@example.com").await.unwrap();
        assert_eq!(by_email, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = Database::in_memory().await.unwrap();
        let users = db.users();

        users.insert(&new_user("ann@example.com", false)).await.unwrap();
        let err = users
            .insert(&new_user("ANN@example.com", true))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = Database::in_memory().await.unwrap();
        let users = db.users();
        users.insert(&new_user("admin@ribbon.shop", true)).await.unwrap();

        let ok = users
            .authenticate("admin@ribbon.shop", "correct horse")
            .await
            .unwrap();
        assert!(ok.is_some_and(|u| u.is_admin));

        assert!(users
            .authenticate("admin@ribbon.shop", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(users
            .authenticate("nobody@ribbon.shop", "correct horse")
            .await
            .unwrap()
            .is_none());
    }
}
