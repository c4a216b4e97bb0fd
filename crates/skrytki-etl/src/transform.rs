//! In-memory transformation steps of an ETL run.
//!
//! Each step takes the whole dataset and returns the next form of it:
//! normalize → deduplicate → classify → pick canonical address → merge.
//! [`prepare`] chains them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use skrytki_core::model::{AddressRecord, Category, Entity, EntityId};

use crate::canonical;
use crate::classify::classify;
use crate::normalize::{clean_text, clean_text_gently};
use crate::source::SourceRecord;

/// A source row after text cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRecord {
    pub nazwa: String,
    pub regon: String,
    pub adres: String,
    pub uri: String,
}

/// A cleaned row tagged with the identifier of its entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord {
    pub id: EntityId,
    pub record: CleanRecord,
}

/// Output of the in-memory steps, ready to serialize and load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedData {
    pub source_rows: usize,
    pub entities: Vec<Entity>,
    pub addresses: Vec<AddressRecord>,
}

/// Counts reported after the in-memory steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub source_rows: usize,
    pub entities: usize,
    pub offices: usize,
    pub addresses: usize,
}

impl PreparedData {
    #[must_use]
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            source_rows: self.source_rows,
            entities: self.entities.len(),
            offices: self
                .entities
                .iter()
                .filter(|e| e.category == Category::Office)
                .count(),
            addresses: self.addresses.len(),
        }
    }
}

/// Run every in-memory step over the raw rows.
pub fn prepare(records: Vec<SourceRecord>) -> PreparedData {
    let source_rows = records.len();
    let keyed = deduplicate(normalize(records));
    let categories = classify_entities(&keyed);
    let canonical = pick_canonical(&keyed);
    let prepared = merge(&keyed, &categories, &canonical, source_rows);

    log::info!(
        "Prepared {} entities and {} addresses from {} rows",
        prepared.entities.len(),
        prepared.addresses.len(),
        source_rows
    );
    prepared
}

/// Clean every text field. Names get the full cleaning; everything else
/// only the gentle one. The address joins postcode, locality and street.
pub fn normalize(records: Vec<SourceRecord>) -> Vec<CleanRecord> {
    records
        .into_iter()
        .map(|r| {
            let adres = format!(
                "{} {} {}",
                clean_text_gently(&r.kod_pocztowy),
                clean_text_gently(&r.miejscowosc),
                clean_text_gently(&r.adres)
            );
            CleanRecord {
                nazwa: clean_text(&r.nazwa),
                regon: clean_text_gently(&r.regon),
                adres: clean_text_gently(&adres),
                uri: clean_text_gently(&r.uri),
            }
        })
        .collect()
}

/// Assign entity identifiers.
///
/// Distinct (name, registry number, address) triples are numbered densely
/// from 1 in sorted order, so the same set of rows always yields the same
/// identifiers whatever order the rows arrive in.
pub fn deduplicate(records: Vec<CleanRecord>) -> Vec<KeyedRecord> {
    let mut ids: BTreeMap<(String, String, String), EntityId> = records
        .iter()
        .map(|r| ((r.nazwa.clone(), r.regon.clone(), r.adres.clone()), EntityId::new(0)))
        .collect();
    for (code, id) in (1..).zip(ids.values_mut()) {
        *id = EntityId::new(code);
    }

    records
        .into_iter()
        .map(|record| {
            let key = (record.nazwa.clone(), record.regon.clone(), record.adres.clone());
            let id = ids.get(&key).copied().unwrap_or(EntityId::new(0));
            KeyedRecord { id, record }
        })
        .collect()
}

/// Classify each entity by its name.
pub fn classify_entities(records: &[KeyedRecord]) -> BTreeMap<EntityId, Category> {
    let mut categories = BTreeMap::new();
    for keyed in records {
        categories
            .entry(keyed.id)
            .or_insert_with(|| classify(&keyed.record.nazwa));
    }
    categories
}

/// Pick the canonical mailbox of each entity that has at least one.
pub fn pick_canonical(records: &[KeyedRecord]) -> BTreeMap<EntityId, String> {
    let mut grouped: BTreeMap<EntityId, Vec<&str>> = BTreeMap::new();
    for keyed in records.iter().filter(|k| !k.record.uri.is_empty()) {
        grouped.entry(keyed.id).or_default().push(&keyed.record.uri);
    }

    grouped
        .into_iter()
        .filter_map(|(id, uris)| canonical::pick(uris).map(|uri| (id, uri.to_string())))
        .collect()
}

/// Join entities with their category and canonical mailbox, and collect
/// the distinct non-empty mailboxes in source order.
pub fn merge(
    records: &[KeyedRecord],
    categories: &BTreeMap<EntityId, Category>,
    canonical: &BTreeMap<EntityId, String>,
    source_rows: usize,
) -> PreparedData {
    let mut entities: BTreeMap<EntityId, Entity> = BTreeMap::new();
    let mut seen: HashSet<(EntityId, &str)> = HashSet::new();
    let mut addresses = Vec::new();

    for KeyedRecord { id, record } in records {
        entities.entry(*id).or_insert_with(|| Entity {
            id: *id,
            nazwa: record.nazwa.clone(),
            regon: record.regon.clone(),
            adres: record.adres.clone(),
            category: categories.get(id).copied().unwrap_or(Category::Other),
            skrytka: canonical.get(id).cloned(),
        });

        if !record.uri.is_empty() && seen.insert((*id, record.uri.as_str())) {
            addresses.push(AddressRecord::new(*id, record.uri.clone()));
        }
    }

    PreparedData {
        source_rows,
        entities: entities.into_values().collect(),
        addresses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(nazwa: &str, regon: &str, uri: &str) -> SourceRecord {
        SourceRecord {
            nazwa: nazwa.to_string(),
            regon: regon.to_string(),
            adres: "Główna 1".to_string(),
            kod_pocztowy: "00-001".to_string(),
            miejscowosc: "Testowo (miasto)".to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_normalize_builds_address() {
        let cleaned = normalize(vec![source("Urząd   Miasta, Testowo", "1", "/um/SkrytkaESP")]);
        assert_eq!(cleaned[0].nazwa, "Urząd Miasta Testowo");
        assert_eq!(cleaned[0].adres, "00-001 Testowo Główna 1");
    }

    #[test]
    fn test_normalize_collapses_empty_address_parts() {
        let mut record = source("Firma", "1", "");
        record.kod_pocztowy = String::new();
        record.miejscowosc = String::new();
        let cleaned = normalize(vec![record]);
        assert_eq!(cleaned[0].adres, "Główna 1");
    }

    #[test]
    fn test_duplicates_collapse_to_one_id() {
        let keyed = deduplicate(normalize(vec![
            source("Urząd Gminy Testowo", "1", "/ug/SkrytkaESP"),
            source("Urząd  Gminy, Testowo", "1", "/ug/skrytka"),
            source("Firma", "2", "/firma/skrytka"),
        ]));
        assert_eq!(keyed[0].id, keyed[1].id);
        assert_ne!(keyed[0].id, keyed[2].id);
    }

    #[test]
    fn test_ids_are_dense_and_order_independent() {
        let rows = vec![
            source("B", "2", "/b"),
            source("A", "1", "/a"),
            source("C", "3", "/c"),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let ids = |rows: Vec<SourceRecord>| -> BTreeMap<String, EntityId> {
            deduplicate(normalize(rows))
                .into_iter()
                .map(|k| (k.record.nazwa, k.id))
                .collect()
        };

        let forward = ids(rows);
        assert_eq!(forward, ids(reversed));
        assert_eq!(forward["A"], EntityId::new(1));
        assert_eq!(forward["B"], EntityId::new(2));
        assert_eq!(forward["C"], EntityId::new(3));
    }

    #[test]
    fn test_canonical_address_per_entity() {
        let keyed = deduplicate(normalize(vec![
            source("Urząd Gminy Testowo", "1", "test@x"),
            source("Urząd Gminy Testowo", "1", "foo/skrytka/1"),
            source("Firma", "2", ""),
        ]));
        let canonical = pick_canonical(&keyed);
        assert_eq!(canonical.get(&keyed[0].id).map(String::as_str), Some("foo/skrytka/1"));
        assert!(!canonical.contains_key(&keyed[2].id));
    }

    #[test]
    fn test_prepare_end_to_end() {
        let prepared = prepare(vec![
            source("Urząd Gminy Testowo", "1", "/ug/skrytka"),
            source("Urząd Gminy Testowo", "1", "/ug/SkrytkaESP"),
            source("Urząd Gminy Testowo", "1", "/ug/SkrytkaESP"),
            source("Sąd Rejonowy w Testowie", "2", "/sr/SkrytkaESP"),
            source("Firma Bez Skrytki", "3", ""),
        ]);

        let summary = prepared.summary();
        assert_eq!(summary.source_rows, 5);
        assert_eq!(summary.entities, 3);
        assert_eq!(summary.offices, 1);
        assert_eq!(summary.addresses, 3);

        let office = prepared
            .entities
            .iter()
            .find(|e| e.regon == "1")
            .unwrap();
        assert_eq!(office.category, Category::Office);
        assert_eq!(office.skrytka.as_deref(), Some("/ug/SkrytkaESP"));

        let without = prepared
            .entities
            .iter()
            .find(|e| e.regon == "3")
            .unwrap();
        assert_eq!(without.skrytka, None);

        let ids: HashSet<EntityId> = prepared.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), prepared.entities.len());
    }
}
