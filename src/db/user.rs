use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// A stored user record.
///
/// The password field holds the bcrypt hash and is never serialized.
#[derive(Debug, Clone, serde::Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    is_admin: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password: row.password,
            is_admin: row.is_admin != 0,
        }
    }
}

/// Fields for inserting a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Fields for updating an existing user.
/// `password` is the new hash, or None to leave the stored one untouched.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub password: Option<String>,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all users, ordered by last then first name.
    pub async fn all(&self) -> Result<Vec<User>, sqlx::Error> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email, password, is_admin
             FROM users ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Get a user by id.
    pub async fn get(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email, password, is_admin
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email, password, is_admin
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Insert a new user. Returns the user id.
    pub async fn insert(&self, user: &NewUser) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password, is_admin)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.is_admin as i32)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Update a user. Returns whether a row was changed.
    pub async fn update(&self, id: i64, changes: &UserChanges) -> Result<bool, sqlx::Error> {
        let result = match &changes.password {
            Some(hash) => {
                sqlx::query(
                    "UPDATE users SET first_name = ?, last_name = ?, email = ?, is_admin = ?,
                     password = ?, updated_at = datetime('now') WHERE id = ?",
                )
                .bind(&changes.first_name)
                .bind(&changes.last_name)
                .bind(&changes.email)
                .bind(changes.is_admin as i32)
                .bind(hash)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE users SET first_name = ?, last_name = ?, email = ?, is_admin = ?,
                     updated_at = datetime('now') WHERE id = ?",
                )
                .bind(&changes.first_name)
                .bind(&changes.last_name)
                .bind(&changes.email)
                .bind(changes.is_admin as i32)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
