//! Shared fixture data for the unit tests.

use std::path::Path;

use skrytki_core::model::{AddressRecord, Category, Entity, EntityId, LoadRun};
use skrytki_core::schema::Database;

pub fn entity(id: i64, nazwa: &str, regon: &str, adres: &str, category: Category) -> Entity {
    Entity {
        id: EntityId::new(id),
        nazwa: nazwa.to_string(),
        regon: regon.to_string(),
        adres: adres.to_string(),
        category,
        skrytka: Some(format!("/e{id}/SkrytkaESP")),
    }
}

pub fn entities() -> Vec<Entity> {
    let mut spoldzielnia = entity(
        4,
        "Spółdzielnia Mieszkaniowa Zgoda",
        "000000004",
        "00-004 Wólka Polna 4",
        Category::Other,
    );
    spoldzielnia.skrytka = None;

    vec![
        entity(
            1,
            "Urząd Gminy Testowo",
            "000000001",
            "00-001 Testowo Główna 1",
            Category::Office,
        ),
        entity(
            2,
            "Gminny Ośrodek Pomocy Społecznej w Testowie",
            "000000002",
            "00-001 Testowo Szkolna 2",
            Category::Other,
        ),
        entity(
            3,
            "Urząd Miasta Żółkiewka",
            "000000003",
            "22-335 Żółkiewka Rynek 5",
            Category::Office,
        ),
        spoldzielnia,
    ]
}

pub fn addresses() -> Vec<AddressRecord> {
    vec![
        AddressRecord::new(EntityId::new(1), "/e1/SkrytkaESP"),
        AddressRecord::new(EntityId::new(1), "/e1/skrytka"),
        AddressRecord::new(EntityId::new(2), "/e2/SkrytkaESP"),
        AddressRecord::new(EntityId::new(3), "/e3/SkrytkaESP"),
    ]
}

fn fill(db: &mut Database) {
    let run = LoadRun::new("fixture", 5, 4, 4);
    db.replace_all(&entities(), &addresses(), &run)
        .unwrap_or_else(|e| panic!("failed to load fixture: {e}"));
}

/// An in-memory database holding the fixture rows.
pub fn memory_db() -> Database {
    let mut db = Database::open_in_memory().unwrap_or_else(|e| panic!("open: {e}"));
    fill(&mut db);
    db
}

/// An in-memory database holding only `entities`, without addresses.
pub fn memory_db_with(entities: &[Entity]) -> Database {
    let mut db = Database::open_in_memory().unwrap_or_else(|e| panic!("open: {e}"));
    let run = LoadRun::new("fixture", entities.len() as u64, entities.len() as u64, 0);
    db.replace_all(entities, &[], &run)
        .unwrap_or_else(|e| panic!("failed to load fixture: {e}"));
    db
}

/// Write the fixture rows to a database file at `path`.
pub fn file_db(path: &Path) {
    let mut db = Database::open(path).unwrap_or_else(|e| panic!("open: {e}"));
    fill(&mut db);
}
