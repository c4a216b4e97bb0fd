//! Staging files passed between the `prepare` and `load` stages.
//!
//! Both tables are written tab-separated with no header and no quoting.
//! A missing value is an empty field. Tabs and line breaks inside values
//! are replaced by spaces so every row stays on one line.

use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use skrytki_core::model::{AddressRecord, Category, Entity, EntityId};

use crate::error::{EtlError, EtlResult};
use crate::transform::{PipelineSummary, PreparedData};

const ENTITY_FIELDS: usize = 6;
const ADDRESS_FIELDS: usize = 2;

/// Locations of the staging files inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingFiles {
    dir: PathBuf,
}

impl StagingFiles {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn entities(&self) -> PathBuf {
        self.dir.join("entities.tsv")
    }

    #[must_use]
    pub fn addresses(&self) -> PathBuf {
        self.dir.join("addresses.tsv")
    }

    #[must_use]
    pub fn summary(&self) -> PathBuf {
        self.dir.join("summary.json")
    }

    /// Write all staging files, creating the directory if needed.
    pub fn write(&self, data: &PreparedData) -> EtlResult<PipelineSummary> {
        std::fs::create_dir_all(&self.dir).map_err(|e| EtlError::io(&self.dir, e))?;

        write_entities(&self.entities(), &data.entities)?;
        write_addresses(&self.addresses(), &data.addresses)?;

        let summary = data.summary();
        let json = serde_json::to_vec_pretty(&summary).map_err(|e| EtlError::Invalid {
            path: self.summary(),
            message: e.to_string(),
        })?;
        std::fs::write(self.summary(), json).map_err(|e| EtlError::io(self.summary(), e))?;

        log::debug!("Wrote staging files to {}", self.dir.display());
        Ok(summary)
    }

    /// Read back what [`StagingFiles::write`] produced.
    pub fn read(&self) -> EtlResult<(PreparedData, PipelineSummary)> {
        let summary_path = self.summary();
        let json = std::fs::read(&summary_path).map_err(|e| EtlError::io(&summary_path, e))?;
        let summary: PipelineSummary =
            serde_json::from_slice(&json).map_err(|e| EtlError::Invalid {
                path: summary_path,
                message: e.to_string(),
            })?;

        let data = PreparedData {
            source_rows: summary.source_rows,
            entities: read_entities(&self.entities())?,
            addresses: read_addresses(&self.addresses())?,
        };
        Ok((data, summary))
    }
}

/// Make a value safe for an unquoted tab-separated field.
pub fn sanitize(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn writer(path: &Path) -> EtlResult<csv::Writer<std::fs::File>> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| EtlError::csv(path, e))
}

fn reader(path: &Path) -> EtlResult<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| EtlError::csv(path, e))
}

fn write_entities(path: &Path, entities: &[Entity]) -> EtlResult<()> {
    let mut out = writer(path)?;
    for entity in entities {
        out.write_record([
            entity.id.to_string(),
            sanitize(&entity.nazwa),
            sanitize(&entity.regon),
            sanitize(&entity.adres),
            entity.category.code().to_string(),
            entity.skrytka.as_deref().map(sanitize).unwrap_or_default(),
        ])
        .map_err(|e| EtlError::csv(path, e))?;
    }
    out.flush().map_err(|e| EtlError::io(path, e))
}

fn write_addresses(path: &Path, addresses: &[AddressRecord]) -> EtlResult<()> {
    let mut out = writer(path)?;
    for address in addresses {
        out.write_record([address.id.to_string(), sanitize(&address.skrytka)])
            .map_err(|e| EtlError::csv(path, e))?;
    }
    out.flush().map_err(|e| EtlError::io(path, e))
}

fn read_entities(path: &Path) -> EtlResult<Vec<Entity>> {
    let mut input = reader(path)?;
    let mut entities = Vec::new();
    for (line, record) in input.records().enumerate() {
        let record = record.map_err(|e| EtlError::csv(path, e))?;
        let fields = expect_fields(path, line, &record, ENTITY_FIELDS)?;

        let code: i64 = parse_field(path, line, fields[4], "category")?;
        let category = Category::from_code(code).ok_or_else(|| EtlError::Invalid {
            path: path.to_path_buf(),
            message: format!("line {}: unknown category code {code}", line + 1),
        })?;

        entities.push(Entity {
            id: parse_id(path, line, fields[0])?,
            nazwa: fields[1].to_string(),
            regon: fields[2].to_string(),
            adres: fields[3].to_string(),
            category,
            skrytka: Some(fields[5])
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }
    Ok(entities)
}

fn read_addresses(path: &Path) -> EtlResult<Vec<AddressRecord>> {
    let mut input = reader(path)?;
    let mut addresses = Vec::new();
    for (line, record) in input.records().enumerate() {
        let record = record.map_err(|e| EtlError::csv(path, e))?;
        let fields = expect_fields(path, line, &record, ADDRESS_FIELDS)?;
        addresses.push(AddressRecord::new(parse_id(path, line, fields[0])?, fields[1]));
    }
    Ok(addresses)
}

fn expect_fields<'r>(
    path: &Path,
    line: usize,
    record: &'r StringRecord,
    expected: usize,
) -> EtlResult<Vec<&'r str>> {
    if record.len() != expected {
        return Err(EtlError::Invalid {
            path: path.to_path_buf(),
            message: format!(
                "line {}: expected {expected} fields, found {}",
                line + 1,
                record.len()
            ),
        });
    }
    Ok(record.iter().collect())
}

fn parse_id(path: &Path, line: usize, raw: &str) -> EtlResult<EntityId> {
    parse_field::<i64>(path, line, raw, "id").map(EntityId::new)
}

fn parse_field<T: std::str::FromStr>(
    path: &Path,
    line: usize,
    raw: &str,
    what: &str,
) -> EtlResult<T> {
    raw.parse().map_err(|_| EtlError::Invalid {
        path: path.to_path_buf(),
        message: format!("line {}: invalid {what} {raw:?}", line + 1),
    })
}
