#![forbid(unsafe_code)]

use log::debug;
use popstat_core::{DEFAULT_NAME, RegionSummary};
use rusqlite::Row;

use super::{
    connector::StorageConnector, error::StorageError, query::population_at, schema::ensure_table,
};

/// Ranks every country within its region, then pivots the top and bottom
/// rank into one row per region. `id` breaks population ties so the row
/// fetched first wins; `MIN(id)` orders regions with equal totals the same way.
const REGION_SUMMARY_SQL: &str = "
WITH ranked AS (
    SELECT
        id,
        name,
        region,
        population,
        SUM(population) OVER (PARTITION BY region) AS total_population,
        ROW_NUMBER() OVER (
            PARTITION BY region ORDER BY population DESC, id ASC
        ) AS rank_desc,
        ROW_NUMBER() OVER (
            PARTITION BY region ORDER BY population ASC, id ASC
        ) AS rank_asc
    FROM countries
    WHERE region IS NOT NULL AND region <> ''
)
SELECT
    region,
    total_population,
    MAX(CASE WHEN rank_desc = 1 THEN name END) AS largest_country,
    MAX(CASE WHEN rank_desc = 1 THEN population END) AS largest_population,
    MAX(CASE WHEN rank_asc = 1 THEN name END) AS smallest_country,
    MAX(CASE WHEN rank_asc = 1 THEN population END) AS smallest_population
FROM ranked
GROUP BY region, total_population
ORDER BY total_population DESC, MIN(id) ASC";

/// Summarise the stored snapshot per region.
///
/// Rows without a region are excluded. Regions are ordered by total
/// population, largest first. The result matches
/// [`popstat_core::aggregate_records`] applied to the rows in id order.
///
/// # Examples
/// ```
/// use popstat_core::CountryRecord;
/// use popstat_data::{StorageConnector, aggregate, load};
///
/// let mut connector = StorageConnector::in_memory().expect("open in-memory store");
/// let records = vec![
///     CountryRecord::new("A", "X", 10),
///     CountryRecord::new("B", "X", 20),
///     CountryRecord::new("C", "X", 30),
/// ];
/// load(&mut connector, &records).expect("load snapshot");
///
/// let summaries = aggregate(&connector).expect("aggregate regions");
/// assert_eq!(summaries.len(), 1);
/// assert_eq!(summaries[0].total_population, 60);
/// assert_eq!(summaries[0].largest_country, "C");
/// assert_eq!(summaries[0].smallest_country, "A");
/// ```
pub fn aggregate(connector: &StorageConnector) -> Result<Vec<RegionSummary>, StorageError> {
    connector.read(|connection| {
        ensure_table(connection).map_err(|err| StorageError::Sqlite {
            operation: err.step,
            source: err.source,
        })?;
        let to_storage_error = |source| StorageError::Sqlite {
            operation: "aggregate regions",
            source,
        };
        let mut statement = connection
            .prepare_cached(REGION_SUMMARY_SQL)
            .map_err(to_storage_error)?;
        let summaries = statement
            .query_map([], summary_from_row)
            .map_err(to_storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_error)?;
        debug!("event=region_aggregate status=ok regions={}", summaries.len());
        Ok(summaries)
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<RegionSummary> {
    Ok(RegionSummary {
        region: row.get(0)?,
        total_population: population_at(row, 1)?,
        largest_country: name_at(row, 2)?,
        largest_population: population_at(row, 3)?,
        smallest_country: name_at(row, 4)?,
        smallest_population: population_at(row, 5)?,
    })
}

fn name_at(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    Ok(row
        .get::<_, Option<String>>(index)?
        .unwrap_or_else(|| DEFAULT_NAME.to_owned()))
}
