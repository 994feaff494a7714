#![forbid(unsafe_code)]

use popstat_core::{CountryChoice, CountryRecord, DEFAULT_NAME, StoredCountry};
use rusqlite::{Connection, OptionalExtension, Row};

use super::{
    connector::StorageConnector,
    error::StorageError,
    schema::{SchemaError, ensure_table},
};

/// Every stored country, in insertion order.
pub fn list_countries(connector: &StorageConnector) -> Result<Vec<StoredCountry>, StorageError> {
    connector.read(|connection| {
        prepare_read(connection)?;
        collect(
            connection,
            "list countries",
            "SELECT id, name, cca2, cca3, region, population, area
             FROM countries
             ORDER BY id ASC",
            [],
            stored_country_from_row,
        )
    })
}

/// Countries with a two-letter code, sorted by name, for history lookups.
pub fn country_choices(connector: &StorageConnector) -> Result<Vec<CountryChoice>, StorageError> {
    connector.read(|connection| {
        prepare_read(connection)?;
        collect(
            connection,
            "list country choices",
            "SELECT name, cca2
             FROM countries
             WHERE cca2 IS NOT NULL AND cca2 <> ''
             ORDER BY name ASC, id ASC",
            [],
            |row| {
                Ok(CountryChoice {
                    name: text_or(row, 0, DEFAULT_NAME)?,
                    cca2: row.get(1)?,
                })
            },
        )
    })
}

/// The `limit` most populous countries, earliest row first on ties.
pub fn top_countries(
    connector: &StorageConnector,
    limit: usize,
) -> Result<Vec<StoredCountry>, StorageError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    connector.read(|connection| {
        prepare_read(connection)?;
        collect(
            connection,
            "list top countries",
            "SELECT id, name, cca2, cca3, region, population, area
             FROM countries
             ORDER BY population DESC, id ASC
             LIMIT ?1",
            [limit],
            stored_country_from_row,
        )
    })
}

/// Look up the two-letter code of the first stored country named `name`.
///
/// Returns `Ok(None)` when no such country is stored or its code is empty.
pub fn resolve_country_code(
    connector: &StorageConnector,
    name: &str,
) -> Result<Option<String>, StorageError> {
    connector.read(|connection| {
        prepare_read(connection)?;
        let code: Option<Option<String>> = connection
            .query_row(
                "SELECT cca2 FROM countries WHERE name = ?1 ORDER BY id ASC LIMIT 1",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| StorageError::Sqlite {
                operation: "resolve country code",
                source,
            })?;
        Ok(code.flatten().filter(|code| !code.is_empty()))
    })
}

fn prepare_read(connection: &Connection) -> Result<(), StorageError> {
    ensure_table(connection).map_err(|SchemaError { step, source }| StorageError::Sqlite {
        operation: step,
        source,
    })
}

fn collect<T, P, F>(
    connection: &Connection,
    operation: &'static str,
    sql: &str,
    params: P,
    map: F,
) -> Result<Vec<T>, StorageError>
where
    P: rusqlite::Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let to_storage_error = |source| StorageError::Sqlite { operation, source };
    let mut statement = connection.prepare(sql).map_err(to_storage_error)?;
    let rows = statement.query_map(params, map).map_err(to_storage_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_error)
}

fn stored_country_from_row(row: &Row<'_>) -> rusqlite::Result<StoredCountry> {
    Ok(StoredCountry {
        id: row.get(0)?,
        record: CountryRecord {
            name: text_or(row, 1, DEFAULT_NAME)?,
            cca2: text_or(row, 2, "")?,
            cca3: text_or(row, 3, "")?,
            region: text_or(row, 4, "")?,
            population: population_at(row, 5)?,
            area: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
        },
    })
}

fn text_or(row: &Row<'_>, index: usize, fallback: &str) -> rusqlite::Result<String> {
    Ok(row
        .get::<_, Option<String>>(index)?
        .unwrap_or_else(|| fallback.to_owned()))
}

pub(super) fn population_at(row: &Row<'_>, index: usize) -> rusqlite::Result<u64> {
    let value: Option<i64> = row.get(index)?;
    let value = value.unwrap_or(0);
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(index, value))
}
