use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::result::DatabaseErrorKind;
use diesel::sqlite::SqliteConnection;
use std::time::Duration;

use crate::error::StoreError;
use crate::models::{NewUser, User, UserId};
use crate::schema::users;

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
type PooledConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT    NOT NULL,
        hash        TEXT    NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS username ON users (username);
";

/// Persistence of username/password-hash pairs.
pub trait CredentialStore: Send + Sync {
    /// Create the backing table and its unique index if they are absent.
    fn init(&self) -> Result<(), StoreError>;

    fn create_user(&self, username: &str, password_hash: &str) -> Result<UserId, StoreError>;

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Makes writers wait for SQLite's lock instead of failing with `SQLITE_BUSY`.
#[derive(Debug)]
struct BusyTimeout(Duration);

impl CustomizeConnection<SqliteConnection, r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", self.0.as_millis()))
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str) -> Result<Pool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .connection_customizer(Box::new(BusyTimeout(BUSY_TIMEOUT)))
        .build(manager)?;
    Ok(pool)
}

pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    pub fn new(pool: Pool) -> Self {
        SqliteStore { pool }
    }

    fn conn(&self) -> Result<PooledConnection, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl CredentialStore for SqliteStore {
    fn init(&self) -> Result<(), StoreError> {
        self.conn()?.batch_execute(SCHEMA)?;
        Ok(())
    }

    fn create_user(&self, username: &str, password_hash: &str) -> Result<UserId, StoreError> {
        let mut conn = self.conn()?;
        let new_user = NewUser {
            username,
            password_hash,
        };

        let id = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(users::id)
            .get_result::<i32>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::DuplicateUsername
                }
                e => e.into(),
            })?;
        Ok(UserId(id))
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut self.conn()?)
            .optional()?;
        Ok(user)
    }
}

/// Store kept in a map, for exercising the auth flow without SQLite.
#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        users: Mutex<HashMap<String, User>>,
    }

    impl MemoryStore {
        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    impl CredentialStore for MemoryStore {
        fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }

        fn create_user(&self, username: &str, password_hash: &str) -> Result<UserId, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(username) {
                return Err(StoreError::DuplicateUsername);
            }
            let id = users.len() as i32 + 1;
            users.insert(
                username.to_string(),
                User {
                    id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                },
            );
            Ok(UserId(id))
        }

        fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            Ok(self.users.lock().unwrap().get(username).cloned())
        }
    }
}
