/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Searchable entities, one row per deduplicated registry record.
///
/// `typ` holds the category code (2 = office, 1 = other) and `skrytka` the
/// canonical mailbox URI picked by the ETL run.
pub const ENTITIES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id INTEGER PRIMARY KEY,
    nazwa TEXT NOT NULL,
    regon TEXT NOT NULL,
    adres TEXT NOT NULL,
    typ INTEGER NOT NULL,
    skrytka TEXT
);

CREATE INDEX IF NOT EXISTS idx_entities_regon ON entities(regon);
CREATE INDEX IF NOT EXISTS idx_entities_typ ON entities(typ);
"#;

/// Every known mailbox URI per entity.
pub const ADDRESSES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skrytki (
    id INTEGER NOT NULL,
    skrytka TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_skrytki_id ON skrytki(id);
"#;

const LOAD_RUNS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS load_runs (
    run_id TEXT PRIMARY KEY,
    loaded_at TEXT NOT NULL,
    source_rows INTEGER NOT NULL,
    entities INTEGER NOT NULL,
    addresses INTEGER NOT NULL
);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "entities",
        sql: ENTITIES_DDL,
    },
    Migration {
        version: 2,
        name: "skrytki",
        sql: ADDRESSES_DDL,
    },
    Migration {
        version: 3,
        name: "load_runs",
        sql: LOAD_RUNS_DDL,
    },
];
