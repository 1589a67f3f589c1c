use serde::Serialize;

use crate::api::BadFileRecord;

/// One row of the bad-files grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadFileRow {
    /// 1-based position in the fetch this row came from. Only meaningful
    /// until the next fetch.
    pub id: usize,
    pub path: String,
    pub ext: String,
    pub reacquire: bool,
    pub service: String,
}

/// Number records `1..=N` in the order the backend listed them.
pub fn bad_file_rows(records: &[BadFileRecord]) -> Vec<BadFileRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| BadFileRow {
            id: i + 1,
            path: record.path.clone(),
            ext: record.data.file_ext.clone(),
            reacquire: record.data.reacquire,
            service: record.data.service.clone(),
        })
        .collect()
}
