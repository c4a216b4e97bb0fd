//! The three-tier search over the `entities` table.
//!
//! 1. Exact registry number.
//! 2. Case-insensitive substring of name or address, best trigram
//!    similarity first, at most `limit` rows.
//! 3. Trigram similarity of name or address above the threshold, at most
//!    `limit` rows in storage order.
//!
//! A tier runs only when the one before it found nothing. All tiers apply
//! the category filter.

use rusqlite::{params, Connection, Params};

use skrytki_core::model::{AddressRecord, EntityId, SearchHit};
use skrytki_core::trigram::DEFAULT_THRESHOLD;

use crate::query::SearchQuery;

/// Which tier produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Exact,
    Substring,
    Trigram,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
    pub outcome: SearchOutcome,
}

const EXACT_SQL: &str = "
    SELECT nazwa, regon, adres, skrytka, id
    FROM entities
    WHERE regon = ?1 AND typ > ?2";

const SUBSTRING_SQL: &str = "
    SELECT nazwa, regon, adres, skrytka, id
    FROM entities
    WHERE (ulower(nazwa) LIKE ulower(?1) OR ulower(adres) LIKE ulower(?1))
      AND typ > ?2
    ORDER BY max(similarity(nazwa, ?3), similarity(adres, ?3)) DESC, id
    LIMIT ?4";

const TRIGRAM_SQL: &str = "
    SELECT nazwa, regon, adres, skrytka, id
    FROM entities
    WHERE (similarity(nazwa, ?1) > ?3 OR similarity(adres, ?1) > ?3)
      AND typ > ?2
    LIMIT ?4";

/// Run the tiered search on `conn`.
///
/// The connection must have the `similarity` and `ulower` functions
/// registered, as every [`skrytki_core::schema::Pool`] connection does.
pub fn search(conn: &Connection, query: &SearchQuery) -> rusqlite::Result<SearchResult> {
    let threshold = query.category_threshold();
    let limit = i64::try_from(query.limit()).unwrap_or(i64::MAX);

    let hits = select(conn, EXACT_SQL, params![query.raw(), threshold])?;
    if !hits.is_empty() {
        return Ok(found(hits, SearchOutcome::Exact));
    }

    let hits = select(
        conn,
        SUBSTRING_SQL,
        params![query.wildcard(), threshold, query.raw(), limit],
    )?;
    if !hits.is_empty() {
        return Ok(found(hits, SearchOutcome::Substring));
    }

    let hits = select(
        conn,
        TRIGRAM_SQL,
        params![query.raw(), threshold, DEFAULT_THRESHOLD, limit],
    )?;
    if !hits.is_empty() {
        return Ok(found(hits, SearchOutcome::Trigram));
    }

    Ok(found(Vec::new(), SearchOutcome::NoMatch))
}

/// All mailbox addresses of one entity, in load order. Empty for an
/// unknown id.
pub fn addresses(conn: &Connection, id: EntityId) -> rusqlite::Result<Vec<AddressRecord>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, skrytka FROM skrytki WHERE id = ?1 ORDER BY rowid")?;
    let rows = stmt.query_map([id.get()], |row| {
        Ok(AddressRecord {
            id: EntityId::new(row.get(0)?),
            skrytka: row.get(1)?,
        })
    })?;
    rows.collect()
}

fn found(hits: Vec<SearchHit>, outcome: SearchOutcome) -> SearchResult {
    SearchResult { hits, outcome }
}

fn select<P: Params>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<Vec<SearchHit>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, row_to_hit)?;
    rows.collect()
}

fn row_to_hit(row: &rusqlite::Row) -> rusqlite::Result<SearchHit> {
    Ok(SearchHit {
        nazwa: row.get(0)?,
        regon: row.get(1)?,
        adres: row.get(2)?,
        skrytka: row.get(3)?,
        id: EntityId::new(row.get(4)?),
    })
}
