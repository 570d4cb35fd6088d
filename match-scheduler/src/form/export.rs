use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

use crate::schedule::GeneratedMatch;

/// Flat CSV row; logos are left empty when unknown.
#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    id: u64,
    date: String,
    time: String,
    location: &'a str,
    home_team_id: &'a str,
    home_team_name: &'a str,
    home_team_logo: &'a str,
    away_team_id: &'a str,
    away_team_name: &'a str,
    away_team_logo: &'a str,
    status: &'static str,
}

impl<'a> From<&'a GeneratedMatch> for MatchRow<'a> {
    fn from(m: &'a GeneratedMatch) -> Self {
        MatchRow {
            id: m.id,
            date: m.date.format("%Y-%m-%d").to_string(),
            time: m.date.format("%H:%M").to_string(),
            location: &m.location,
            home_team_id: &m.home_team_id,
            home_team_name: &m.home_team_name,
            home_team_logo: m.home_team_logo.as_deref().unwrap_or(""),
            away_team_id: &m.away_team_id,
            away_team_name: &m.away_team_name,
            away_team_logo: m.away_team_logo.as_deref().unwrap_or(""),
            status: m.status.as_str(),
        }
    }
}

/// Exports generated matches to a CSV file, overwriting it
///
/// # Arguments
/// * `matches` - The generated matches, in slot order
/// * `csv_path` - Path to the CSV file
pub fn export_matches_to_csv(matches: &[GeneratedMatch], csv_path: &Path) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(csv_path)?;

    for m in matches {
        wtr.serialize(MatchRow::from(m))?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{generate_schedule_seeded, ScheduleConfig, TeamRef};
    use chrono::NaiveDate;

    #[test]
    fn writes_header_and_rows() {
        let cfg = ScheduleConfig::new(
            vec!["a".into(), "b".into()],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            vec!["16:30".into()],
            1,
        )
        .with_teams(vec![
            TeamRef::new("a", "Alpha").with_logo("https://x/a.png"),
            TeamRef::new("b", "Beta"),
        ]);
        let matches = generate_schedule_seeded(&cfg, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        export_matches_to_csv(&matches, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,time,location,home_team_id,home_team_name,home_team_logo,away_team_id,away_team_name,away_team_logo,status")
        );
        assert_eq!(
            lines.next(),
            Some("1,2024-01-01,16:30,Terrain 1,a,Alpha,https://x/a.png,b,Beta,,upcoming")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_schedule_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        export_matches_to_csv(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
