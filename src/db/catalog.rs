use chrono::NaiveDate;
use serde::Deserialize;
use std::{cmp::Reverse, collections::HashMap, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, RowId},
};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One line of the catalog CSV
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Release Date", default)]
    release_date: Option<String>,
}

impl CatalogRow {
    fn into_record(self, line: usize) -> AppResult<MovieRecord> {
        let id = self.id.trim().parse::<i64>().map_err(|_| {
            AppError::DataLoad(format!(
                "catalog line {}: ID {:?} is not an integer",
                line, self.id
            ))
        })?;

        Ok(MovieRecord {
            id,
            title: self.title.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
        })
    }
}

/// Read-only, in-memory movie table.
///
/// Row order is fixed at construction; every derived ordering (e.g. latest
/// releases) is a copy.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    by_id: HashMap<i64, RowId>,
    by_title: HashMap<String, Vec<RowId>>,
}

impl Catalog {
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_title: HashMap<String, Vec<RowId>> = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let row = RowId(position);
            if let Some(existing) = by_id.get(&record.id) {
                tracing::warn!(
                    movie_id = record.id,
                    kept = %existing,
                    ignored = %row,
                    "Duplicate movie id in catalog"
                );
            } else {
                by_id.insert(record.id, row);
            }
            by_title.entry(record.title.clone()).or_default().push(row);
        }

        Self {
            records,
            by_id,
            by_title,
        }
    }

    /// Loads the catalog from a CSV file with `ID`, `Title` and `Release Date` columns
    pub fn load_csv(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
            // header is line 1
            records.push(row?.into_record(index + 2)?);
        }

        tracing::info!(
            path = %path.display(),
            movies = records.len(),
            "Loaded movie catalog"
        );

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, row: RowId) -> Option<&MovieRecord> {
        self.records.get(row.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &MovieRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(position, record)| (RowId(position), record))
    }

    pub fn find_by_id(&self, id: i64) -> Option<RowId> {
        self.by_id.get(&id).copied()
    }

    /// Exact, case-sensitive title lookup.
    ///
    /// Fails with `AmbiguousTitle` rather than picking one row when several
    /// movies share the title.
    pub fn find_by_title(&self, title: &str) -> AppResult<RowId> {
        match self.by_title.get(title).map(Vec::as_slice) {
            Some([row]) => Ok(*row),
            Some(rows) if rows.len() > 1 => Err(AppError::AmbiguousTitle(format!(
                "{} catalog rows are titled {:?}",
                rows.len(),
                title
            ))),
            _ => Err(AppError::NotFound(format!("No movie titled {:?}", title))),
        }
    }

    /// The `limit` most recent releases, newest first.
    ///
    /// Rows with a `YYYY-MM-DD` date come first. Rows whose date does not
    /// parse follow, ordered by the raw date text descending, so blank dates
    /// end up last. Equal keys keep catalog order.
    pub fn latest(&self, limit: usize) -> Vec<MovieRecord> {
        let mut dated: Vec<(Option<NaiveDate>, &str, &MovieRecord)> = self
            .records
            .iter()
            .map(|record| {
                let raw = record.release_date.trim();
                let date = NaiveDate::parse_from_str(raw, RELEASE_DATE_FORMAT).ok();
                (date, raw, record)
            })
            .collect();

        // Option orders None first, so Reverse puts unparsed rows after dated ones
        dated.sort_by_key(|(date, raw, _)| Reverse((*date, *raw)));

        dated
            .into_iter()
            .take(limit)
            .map(|(_, _, record)| record.clone())
            .collect()
    }

    /// Rows whose lowercased title contains `query` (already lowercased), in catalog order
    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<MovieRecord> {
        self.records
            .iter()
            .filter(|record| record.title.to_lowercase().contains(query))
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_catalog() -> Catalog {
        Catalog::from_records(vec![
            MovieRecord::new(27205, "Inception", "2010-07-15"),
            MovieRecord::new(157336, "Interstellar", "2014-11-05"),
            MovieRecord::new(155, "The Dark Knight", "2008-07-16"),
            MovieRecord::new(10, "Hamlet", "1996-12-25"),
            MovieRecord::new(11, "Hamlet", "1948-05-04"),
            MovieRecord::new(12, "Undated", ""),
        ])
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find_by_id(157336), Some(RowId(1)));
        assert_eq!(catalog.find_by_id(999), None);
    }

    #[test]
    fn test_duplicate_id_keeps_first_row() {
        let catalog = Catalog::from_records(vec![
            MovieRecord::new(1, "First", "2000-01-01"),
            MovieRecord::new(1, "Second", "2001-01-01"),
        ]);
        assert_eq!(catalog.find_by_id(1), Some(RowId(0)));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_lookup_by_title_is_case_sensitive() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find_by_title("Inception").unwrap(), RowId(0));
        assert!(matches!(
            catalog.find_by_title("inception"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_lookup_by_shared_title_is_ambiguous() {
        let catalog = sample_catalog();
        assert!(matches!(
            catalog.find_by_title("Hamlet"),
            Err(AppError::AmbiguousTitle(_))
        ));
    }

    #[test]
    fn test_latest_sorted_newest_first() {
        let catalog = sample_catalog();
        let latest: Vec<i64> = catalog.latest(3).iter().map(|m| m.id).collect();
        assert_eq!(latest, vec![157336, 27205, 155]);
    }

    #[test]
    fn test_latest_puts_undated_last_and_keeps_catalog() {
        let catalog = sample_catalog();
        let latest = catalog.latest(10);
        assert_eq!(latest.len(), 6);
        assert_eq!(latest.last().unwrap().id, 12);
        // derived copy only
        assert_eq!(catalog.get(RowId(0)).unwrap().id, 27205);
    }

    #[test]
    fn test_latest_falls_back_to_raw_date_text() {
        let catalog = Catalog::from_records(vec![
            MovieRecord::new(1, "Blank", ""),
            MovieRecord::new(2, "Slashed 2010", "2010/07/15"),
            MovieRecord::new(3, "Iso 1999", "1999-03-31"),
            MovieRecord::new(4, "Slashed 2014", "2014/11/05"),
            MovieRecord::new(5, "Slashed 2010 again", "2010/07/15"),
        ]);

        let latest: Vec<i64> = catalog.latest(10).iter().map(|m| m.id).collect();
        assert_eq!(latest, vec![3, 4, 2, 5, 1]);
    }

    #[test]
    fn test_autocomplete_substring_in_catalog_order() {
        let catalog = sample_catalog();
        let hits: Vec<i64> = catalog.autocomplete("in", 5).iter().map(|m| m.id).collect();
        assert_eq!(hits, vec![27205, 157336, 155]);

        let limited = catalog.autocomplete("in", 1);
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ID,Title,Release Date,Overview").unwrap();
        writeln!(file, "27205,Inception,2010-07-15,Dreams").unwrap();
        writeln!(file, "157336,\"Interstellar\",2014-11-05,Space").unwrap();
        writeln!(file, "42,,2001-01-01,No title").unwrap();
        file.flush().unwrap();

        let catalog = Catalog::load_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(RowId(1)).unwrap().title, "Interstellar");
        assert_eq!(catalog.get(RowId(2)).unwrap().title, "");
    }

    #[test]
    fn test_load_csv_rejects_non_integer_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ID,Title,Release Date").unwrap();
        writeln!(file, "abc,Inception,2010-07-15").unwrap();
        file.flush().unwrap();

        let result = Catalog::load_csv(file.path());
        assert!(matches!(result, Err(AppError::DataLoad(_))));
    }
}
