//! Reading the raw registry extract.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::{EtlError, EtlResult};

/// Columns the extract must have. Any other columns are ignored.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "NAZWA",
    "REGON",
    "ADRES",
    "KOD_POCZTOWY",
    "MIEJSCOWOSC",
    "URI",
];

/// One row of the raw extract. Empty cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "NAZWA")]
    pub nazwa: String,
    #[serde(rename = "REGON")]
    pub regon: String,
    #[serde(rename = "ADRES")]
    pub adres: String,
    #[serde(rename = "KOD_POCZTOWY")]
    pub kod_pocztowy: String,
    #[serde(rename = "MIEJSCOWOSC")]
    pub miejscowosc: String,
    #[serde(rename = "URI")]
    pub uri: String,
}

/// Read every row of the comma-separated extract at `path`.
pub fn read_source(path: &Path) -> EtlResult<Vec<SourceRecord>> {
    let file = std::fs::File::open(path).map_err(|e| EtlError::io(path, e))?;
    parse_source(file, path)
}

/// Parse a comma-separated extract with a header row. `origin` is only
/// used in error messages.
pub fn parse_source<R: Read>(reader: R, origin: &Path) -> EtlResult<Vec<SourceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| EtlError::csv(origin, e))?
        .clone();
    for &column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(EtlError::MissingColumn {
                column,
                path: origin.to_path_buf(),
            });
        }
    }

    let records = reader
        .deserialize::<SourceRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| EtlError::csv(origin, e))?;

    log::info!("Read {} rows from {}", records.len(), origin.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "NAZWA,REGON,ADRES,KOD_POCZTOWY,MIEJSCOWOSC,URI\n";

    fn parse(body: &str) -> EtlResult<Vec<SourceRecord>> {
        parse_source(body.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_parse_rows() {
        let csv = format!(
            "{HEADER}\"Urząd Gminy, Testowo\",000000001,Główna 1,00-001,Testowo,/ug/SkrytkaESP\n"
        );
        let records = parse(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nazwa, "Urząd Gminy, Testowo");
        assert_eq!(records[0].kod_pocztowy, "00-001");
        assert_eq!(records[0].uri, "/ug/SkrytkaESP");
    }

    #[test]
    fn test_empty_cells_read_as_empty_strings() {
        let csv = format!("{HEADER}Firma,,,,,\n");
        let records = parse(&csv).unwrap();
        assert_eq!(records[0].regon, "");
        assert_eq!(records[0].uri, "");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "ID,NAZWA,REGON,ADRES,KOD_POCZTOWY,MIEJSCOWOSC,URI\n9,Firma,1,a,b,c,/u\n";
        let records = parse(csv).unwrap();
        assert_eq!(records[0].nazwa, "Firma");
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "NAZWA,REGON\nFirma,1\n";
        let err = parse(csv).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn { column: "ADRES", .. }));
    }

    #[test]
    fn test_malformed_row_fails_whole_read() {
        let csv = format!("{HEADER}Firma,1,a,b,c,/u\nBroken,2\n");
        assert!(matches!(parse(&csv), Err(EtlError::Csv { .. })));
    }
}
