//! Color name lists for [`ColorScanner::lookup_named_colors`](super::ColorScanner::lookup_named_colors)

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::{AnalysisError, Result};

/// Header of the column holding color names
pub const NAME_COLUMN: &str = "color_name";

/// Read color names from a CSV file with a header row
///
/// Names come from the `color_name` column, or the first column when there
/// is none. Blank cells are dropped and duplicates keep their first position.
pub fn read_name_list(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path).map_err(|e| {
        AnalysisError::report(format!("Failed to open name list {}", path.display()), e)
    })?;
    read_names(file)
}

/// Read color names from any CSV source; see [`read_name_list`]
pub fn read_names<R: Read>(source: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::report("Failed to read name list header", e))?;
    let column = headers
        .iter()
        .position(|h| h.trim() == NAME_COLUMN)
        .unwrap_or(0);

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AnalysisError::report("Failed to read name list row", e))?;
        let name = match record.get(column).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    Ok(names)
}
