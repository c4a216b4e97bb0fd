use chrono::SecondsFormat;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;
use crate::model::{AddressRecord, Category, Entity, EntityId, LoadRun};

use super::functions::register_functions;
use super::migrations::{ADDRESSES_DDL, ENTITIES_DDL, MIGRATIONS};

/// A database connection with the bulk-load and bookkeeping methods the
/// ETL and CLI need. Request-time reads go through [`super::Pool`].
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

/// Row counts of the searchable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabaseStats {
    pub entities: u64,
    pub offices: u64,
    pub addresses: u64,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Bulk load
impl Database {
    /// Replace both searchable tables with the given rows.
    ///
    /// Both tables are dropped, recreated and filled inside one
    /// transaction, and the run is recorded in `load_runs`. If anything
    /// fails the transaction rolls back and the previous contents of both
    /// tables stay in place.
    pub fn replace_all(
        &mut self,
        entities: &[Entity],
        addresses: &[AddressRecord],
        run: &LoadRun,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute_batch("DROP TABLE IF EXISTS skrytki; DROP TABLE IF EXISTS entities;")?;
        tx.execute_batch(ENTITIES_DDL)?;
        tx.execute_batch(ADDRESSES_DDL)?;

        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO entities (id, nazwa, regon, adres, typ, skrytka)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entity in entities {
                stmt.execute(rusqlite::params![
                    entity.id.get(),
                    entity.nazwa,
                    entity.regon,
                    entity.adres,
                    entity.category.code(),
                    entity.skrytka,
                ])?;
            }
        }

        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO skrytki (id, skrytka) VALUES (?1, ?2)")?;
            for address in addresses {
                stmt.execute(rusqlite::params![address.id.get(), address.skrytka])?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO load_runs (run_id, loaded_at, source_rows, entities, addresses)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                run.run_id,
                run.loaded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                i64::try_from(run.source_rows).unwrap_or(i64::MAX),
                i64::try_from(run.entities).unwrap_or(i64::MAX),
                i64::try_from(run.addresses).unwrap_or(i64::MAX),
            ],
        )?;

        tx.commit()?;

        log::info!(
            "Loaded {} entities and {} addresses (run {})",
            entities.len(),
            addresses.len(),
            run.run_id
        );
        Ok(())
    }
}

// Queries
impl Database {
    /// Look up one entity by id.
    pub fn get_entity(&self, id: EntityId) -> Result<Option<Entity>> {
        let entity = self
            .conn
            .query_row(
                "SELECT id, nazwa, regon, adres, typ, skrytka FROM entities WHERE id = ?1",
                [id.get()],
                row_to_entity,
            )
            .optional()?;
        Ok(entity)
    }

    /// Row counts of the searchable tables.
    pub fn stats(&self) -> Result<DatabaseStats> {
        let count = |sql: &str| -> Result<u64> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or(0))
        };

        Ok(DatabaseStats {
            entities: count("SELECT COUNT(*) FROM entities")?,
            offices: count("SELECT COUNT(*) FROM entities WHERE typ = 2")?,
            addresses: count("SELECT COUNT(*) FROM skrytki")?,
        })
    }

    /// The most recent bulk load, if any.
    pub fn last_load(&self) -> Result<Option<LoadRun>> {
        let run = self
            .conn
            .query_row(
                "SELECT run_id, loaded_at, source_rows, entities, addresses
                 FROM load_runs
                 ORDER BY loaded_at DESC, rowid DESC
                 LIMIT 1",
                [],
                row_to_load_run,
            )
            .optional()?;
        Ok(run)
    }
}

/// Map an `entities` row (`id, nazwa, regon, adres, typ, skrytka`).
pub fn row_to_entity(row: &rusqlite::Row) -> rusqlite::Result<Entity> {
    let typ: i64 = row.get(4)?;
    let category =
        Category::from_code(typ).ok_or(rusqlite::Error::IntegralValueOutOfRange(4, typ))?;

    Ok(Entity {
        id: EntityId::new(row.get(0)?),
        nazwa: row.get(1)?,
        regon: row.get(2)?,
        adres: row.get(3)?,
        category,
        skrytka: row.get(5)?,
    })
}

fn row_to_load_run(row: &rusqlite::Row) -> rusqlite::Result<LoadRun> {
    use chrono::DateTime;

    let loaded_at_str: String = row.get(1)?;
    let loaded_at = DateTime::parse_from_rfc3339(&loaded_at_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?
        .into();
    let count = |idx: usize| -> rusqlite::Result<u64> {
        let n: i64 = row.get(idx)?;
        Ok(u64::try_from(n).unwrap_or(0))
    };

    Ok(LoadRun {
        run_id: row.get(0)?,
        loaded_at,
        source_rows: count(2)?,
        entities: count(3)?,
        addresses: count(4)?,
    })
}
