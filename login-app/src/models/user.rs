use playtest::{Application, Error};
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: String,
    password_hash: String,
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn default_data_source(app: &Application) -> Result<String, Error> {
    Ok(app.database()?.default_data_source().to_string())
}

impl User {
    pub fn new<S1: Into<String>, S2: Into<String>>(email: S1, name: S2, password: &str) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password_hash: hash_password(password),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            email: row.get(0)?,
            name: row.get(1)?,
            password_hash: row.get(2)?,
        })
    }

    pub fn create(app: &Application, user: &User) -> Result<(), Error> {
        app.with_connection(&default_data_source(app)?, |connection| {
            connection.execute(
                "INSERT INTO users (email, name, password_hash) VALUES (?1, ?2, ?3)",
                params![user.email, user.name, user.password_hash],
            )?;
            Ok(())
        })
    }

    pub fn find_by_email(app: &Application, email: &str) -> Result<Option<User>, Error> {
        app.with_connection(&default_data_source(app)?, |connection| {
            Ok(connection
                .query_row(
                    "SELECT email, name, password_hash FROM users WHERE email = ?1",
                    params![email],
                    Self::from_row,
                )
                .optional()?)
        })
    }

    pub fn find_all(app: &Application) -> Result<Vec<User>, Error> {
        app.with_connection(&default_data_source(app)?, |connection| {
            let mut statement =
                connection.prepare("SELECT email, name, password_hash FROM users ORDER BY email")?;
            let users = statement
                .query_map([], Self::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
    }

    pub fn authenticate(app: &Application, email: &str, password: &str) -> Result<Option<User>, Error> {
        Ok(Self::find_by_email(app, email)?.filter(|user| user.password_hash == hash_password(password)))
    }
}
