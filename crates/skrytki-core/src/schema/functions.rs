//! SQL scalar functions registered on every connection.
//!
//! - `similarity(a, b)`: trigram similarity in `[0, 1]`, `NULL` if either
//!   argument is `NULL`.
//! - `ulower(s)`: Unicode-aware lowercase. SQLite's own `lower()` and
//!   `LIKE` only fold ASCII, which misses Polish letters such as `Ł`/`ł`.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::trigram;

/// Register the search helper functions on `conn`.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("similarity", 2, flags, |ctx| {
        let left = ctx.get::<Option<String>>(0)?;
        let right = ctx.get::<Option<String>>(1)?;
        Ok(match (left, right) {
            (Some(left), Some(right)) => Some(trigram::similarity(&left, &right)),
            _ => None,
        })
    })?;

    conn.create_scalar_function("ulower", 1, flags, |ctx| {
        Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase()))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        conn
    }

    #[test]
    fn test_similarity_function() {
        let conn = conn();
        let score: f64 = conn
            .query_row("SELECT similarity('Testowo', 'testowo')", [], |row| row.get(0))
            .unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);

        let null: Option<f64> = conn
            .query_row("SELECT similarity(NULL, 'x')", [], |row| row.get(0))
            .unwrap();
        assert!(null.is_none());
    }

    #[test]
    fn test_ulower_folds_polish_letters() {
        let conn = conn();
        let lowered: String = conn
            .query_row("SELECT ulower('ŁÓDŹ')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "łódź");

        let matched: bool = conn
            .query_row(
                "SELECT ulower('Urząd Miasta ŁÓDŹ') LIKE ulower('%łódź%')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(matched);
    }
}
