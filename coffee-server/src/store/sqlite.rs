use super::{DrinkStore, StoreError};
use crate::models::{Drink, Ingredient, NewDrink, RecipeInput};
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, ErrorCode};
use tokio::sync::Mutex;

const IN_MEMORY: &str = ":memory:";

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        title  TEXT NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
"#;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Recipes are stored as a JSON column. Rows written by older clients may hold a
/// single ingredient object instead of a list.
fn decode_recipe(raw: &str) -> Result<Vec<Ingredient>, StoreError> {
    Ok(serde_json::from_str::<RecipeInput>(raw)?.normalize())
}

fn decode_row(id: i64, title: String, recipe: String) -> Result<Drink, StoreError> {
    Ok(Drink {
        id,
        title,
        recipe: decode_recipe(&recipe)?,
    })
}

/// SQLite backed drink store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file; `:memory:` opens a private in-memory database
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            let conn = Connection::open(path)?;
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;",
            )?;
            conn
        };
        debug!("Opened SQLite database at {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl DrinkStore for SqliteStore {
    async fn find_all(&self) -> Result<Vec<Drink>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, title, recipe FROM drinks ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, recipe)| decode_row(id, title, recipe))
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, StoreError> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            "SELECT title, recipe FROM drinks WHERE id = ?1",
            params![id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );

        match result {
            Ok((title, recipe)) => Ok(Some(decode_row(id, title, recipe)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        let recipe = serde_json::to_string(&drink.recipe)?;
        let conn = self.conn.lock().await;

        match conn.execute(
            "INSERT INTO drinks (title, recipe) VALUES (?1, ?2)",
            params![&drink.title, &recipe],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(StoreError::Conflict(drink.title)),
            Err(e) => return Err(e.into()),
        }

        Ok(Drink {
            id: conn.last_insert_rowid(),
            title: drink.title,
            recipe: drink.recipe,
        })
    }

    async fn update(&self, drink: &Drink) -> Result<Drink, StoreError> {
        let recipe = serde_json::to_string(&drink.recipe)?;
        let conn = self.conn.lock().await;

        let changed = match conn.execute(
            "UPDATE drinks SET title = ?1, recipe = ?2 WHERE id = ?3",
            params![&drink.title, &recipe, drink.id],
        ) {
            Ok(changed) => changed,
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::Conflict(drink.title.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        if changed == 0 {
            return Err(StoreError::NotFound(drink.id));
        }
        Ok(drink.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM drinks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(CREATE_TABLE, [])?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        // Dropping the table also drops its sqlite_sequence row, so ids restart at 1
        conn.execute("DROP TABLE IF EXISTS drinks", [])?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), String> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|e| format!("SQLite is not responding: {}", e))
    }
}
