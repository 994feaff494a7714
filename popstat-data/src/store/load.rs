#![forbid(unsafe_code)]

use std::{collections::HashMap, time::Instant};

use log::{info, warn};
use popstat_core::{CountryRecord, CountrySource, FetchError, MAX_POPULATION};
use rusqlite::{Error as SqliteError, Transaction};
use thiserror::Error;

use super::{
    connector::StorageConnector,
    error::StorageError,
    schema::{SchemaError, ensure_schema},
};

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of rows written.
    pub inserted: usize,
}

/// Replace the stored snapshot with `records`.
///
/// The table is truncated and every record inserted in one transaction, in
/// slice order, so row ids follow fetch order. Either every record is
/// committed or none is.
///
/// Populations are checked before the store is touched: neither a single
/// record nor the total of any region may exceed [`MAX_POPULATION`], so every
/// stored snapshot can be aggregated.
///
/// # Examples
/// ```
/// use popstat_core::CountryRecord;
/// use popstat_data::{StorageConnector, list_countries, load};
///
/// let mut connector = StorageConnector::in_memory().expect("open in-memory store");
/// let records = vec![
///     CountryRecord::new("Chile", "Americas", 19_000_000).with_codes("CL", "CHL"),
///     CountryRecord::new("Peru", "Americas", 33_000_000).with_codes("PE", "PER"),
/// ];
///
/// let report = load(&mut connector, &records).expect("load snapshot");
/// assert_eq!(report.inserted, 2);
///
/// let stored = list_countries(&connector).expect("read snapshot");
/// assert_eq!(stored[0].record.name, "Chile");
/// ```
pub fn load(
    connector: &mut StorageConnector,
    records: &[CountryRecord],
) -> Result<LoadReport, LoadError> {
    let started_at = Instant::now();
    info!(
        "event=snapshot_load status=start target={} records={}",
        connector.target(),
        records.len()
    );

    check_populations(records)?;
    let report = connector.execute_scoped(|transaction| {
        ensure_schema(transaction)?;
        insert_records(transaction, records)
    })?;

    info!(
        "event=snapshot_load status=ok inserted={} duration_ms={}",
        report.inserted,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

fn check_populations(records: &[CountryRecord]) -> Result<(), LoadError> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.population > MAX_POPULATION {
            return Err(LoadError::PopulationOutOfRange {
                index,
                population: record.population,
            });
        }
        if !record.has_region() {
            continue;
        }
        let total = totals.entry(record.region.as_str()).or_insert(0);
        *total = total
            .checked_add(record.population)
            .filter(|sum| *sum <= MAX_POPULATION)
            .ok_or_else(|| LoadError::RegionTotalOutOfRange {
                index,
                region: record.region.clone(),
            })?;
    }
    Ok(())
}

fn insert_records(
    transaction: &Transaction<'_>,
    records: &[CountryRecord],
) -> Result<LoadReport, LoadError> {
    let mut insert = transaction
        .prepare_cached(
            "INSERT INTO countries (name, cca2, cca3, region, population, area)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(|source| LoadError::Sqlite {
            operation: "prepare country insert",
            source,
        })?;

    for (index, record) in records.iter().enumerate() {
        let population =
            i64::try_from(record.population).map_err(|_| LoadError::PopulationOutOfRange {
                index,
                population: record.population,
            })?;
        insert
            .execute((
                record.name.as_str(),
                record.cca2.as_str(),
                record.cca3.as_str(),
                record.region.as_str(),
                population,
                record.area,
            ))
            .map_err(|source| LoadError::InsertRow {
                index,
                cca3: record.cca3.clone(),
                source,
            })?;
    }

    Ok(LoadReport {
        inserted: records.len(),
    })
}

/// Fetch a fresh snapshot from `source` and load it.
///
/// An empty snapshot is refused before the store is touched, so a source
/// outage that yields no rows never wipes the previous snapshot.
pub fn reload(
    source: &dyn CountrySource,
    connector: &mut StorageConnector,
) -> Result<LoadReport, ReloadError> {
    info!("event=snapshot_reload status=start");
    let records = source.fetch_snapshot().inspect_err(|err| {
        warn!("event=snapshot_reload status=fetch_failed error={err}");
    })?;
    if records.is_empty() {
        warn!("event=snapshot_reload status=empty");
        return Err(ReloadError::EmptySnapshot);
    }
    let report = load(connector, &records)?;
    info!("event=snapshot_reload status=ok inserted={}", report.inserted);
    Ok(report)
}

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The connector is disconnected or the transaction failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Creating or truncating the `countries` table failed.
    #[error("failed to prepare the countries table")]
    Schema(#[from] SchemaError),
    /// A record's population does not fit the storage column.
    #[error("record {index} has population {population}, which exceeds the storable range")]
    PopulationOutOfRange {
        /// Position of the record in the snapshot.
        index: usize,
        /// Offending population.
        population: u64,
    },
    /// Adding a record pushes its region's total past the storable range.
    #[error("record {index} pushes the total of region '{region}' past the storable range")]
    RegionTotalOutOfRange {
        /// Position of the record in the snapshot.
        index: usize,
        /// Region whose total overflowed.
        region: String,
    },
    /// Inserting a record failed.
    #[error("failed to insert record {index} (cca3 '{cca3}')")]
    InsertRow {
        /// Position of the record in the snapshot.
        index: usize,
        /// Three-letter code of the record.
        cca3: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A SQLite statement failed.
    #[error("failed to {operation}")]
    Sqlite {
        /// Step that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Errors raised by [`reload`].
#[derive(Debug, Error)]
pub enum ReloadError {
    /// The country source failed.
    #[error("failed to fetch the country snapshot")]
    Fetch(#[from] FetchError),
    /// The source returned no records, so the stored snapshot was kept.
    #[error("the country source returned no records; keeping the stored snapshot")]
    EmptySnapshot,
    /// Writing the fetched snapshot failed.
    #[error("failed to load the country snapshot")]
    Load(#[from] LoadError),
}
