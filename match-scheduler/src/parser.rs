use csv::{Reader, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::schedule::TeamRef;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to read team CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("team CSV has no usable rows")]
    Empty,
}

/// Finds a column by (case-insensitive) header name, falling back to a fixed position
fn column(headers: &StringRecord, names: &[&str], fallback: usize) -> usize {
    headers
        .iter()
        .position(|h| {
            let h = h.trim().to_lowercase();
            names.iter().any(|n| h == *n)
        })
        .unwrap_or(fallback)
}

/// Loads teams from a CSV file with `id,name,logo_url` columns
pub fn load_teams<P: AsRef<Path>>(csv_path: P) -> Result<Vec<TeamRef>, ParserError> {
    let reader = Reader::from_path(csv_path)?;
    read_teams(reader)
}

/// Same as [`load_teams`] for CSV content already in memory (web uploads).
pub fn parse_teams(data: &[u8]) -> Result<Vec<TeamRef>, ParserError> {
    read_teams(Reader::from_reader(data))
}

fn read_teams<R: Read>(mut reader: Reader<R>) -> Result<Vec<TeamRef>, ParserError> {
    let headers = reader.headers()?.clone();

    let id_col = column(&headers, &["id", "team_id"], 0);
    let name_col = column(&headers, &["name", "team_name"], 1);
    let logo_col = column(&headers, &["logo_url", "logo", "logourl"], 2);

    // Re-used ids replace the earlier row but keep its position
    let mut order: Vec<String> = Vec::new();
    let mut teams: HashMap<String, TeamRef> = HashMap::new();

    for result in reader.records() {
        let record = result?;

        let id = record.get(id_col).unwrap_or("").trim().to_string();
        let name = record.get(name_col).unwrap_or("").trim().to_string();

        // Skip if essential fields are missing
        if id.is_empty() || name.is_empty() {
            tracing::warn!(line = ?record.position().map(|p| p.line()), "skipping team row without id or name");
            continue;
        }

        let logo_url = record
            .get(logo_col)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if !teams.contains_key(&id) {
            order.push(id.clone());
        }
        teams.insert(id.clone(), TeamRef { id, name, logo_url });
    }

    if order.is_empty() {
        return Err(ParserError::Empty);
    }

    Ok(order
        .into_iter()
        .filter_map(|id| teams.remove(&id))
        .collect())
}
