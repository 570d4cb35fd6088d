use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::schedule::{CapacityReport, GeneratedMatch};

/// Formats a single fixture as `HH:MM  Home vs Away (Location)`
pub fn format_fixture(m: &GeneratedMatch) -> String {
    format!(
        "{}  {} vs {} ({})",
        m.date.format("%H:%M"),
        m.home_team_name,
        m.away_team_name,
        m.location
    )
}

/// Groups matches by calendar day, chronologically, keeping slot order within a day
pub fn group_by_day(matches: &[GeneratedMatch]) -> BTreeMap<NaiveDate, Vec<&GeneratedMatch>> {
    let mut days: BTreeMap<NaiveDate, Vec<&GeneratedMatch>> = BTreeMap::new();
    for m in matches {
        days.entry(m.day()).or_default().push(m);
    }
    days
}

fn render_schedule<W: Write>(out: &mut W, title: &str, matches: &[GeneratedMatch]) -> io::Result<()> {
    writeln!(out, "** {} **", title)?;
    writeln!(out, "Total matches scheduled: {}", matches.len())?;

    if matches.is_empty() {
        writeln!(out, "[NO MATCHES]")?;
        return Ok(());
    }

    for (day, day_matches) in group_by_day(matches) {
        writeln!(out)?;
        writeln!(out, "{} ({} matches)", day.format("%A %d %B %Y"), day_matches.len())?;
        for m in day_matches {
            writeln!(out, "  #{} {}", m.id, format_fixture(m))?;
        }
    }

    Ok(())
}

/// Writes a schedule to a file, grouped by day
pub fn write_schedule_to_file<P: AsRef<Path>>(
    title: &str,
    matches: &[GeneratedMatch],
    path: P,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    render_schedule(&mut file, title, matches)
}

/// Prints a schedule in a readable format
pub fn print_schedule(title: &str, matches: &[GeneratedMatch]) {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    // Nothing sensible to do if stdout is gone
    let _ = render_schedule(&mut lock, title, matches);
}

/// Prints the capacity comparison and any warnings
pub fn print_capacity(report: &CapacityReport) {
    println!(
        "{} matches to play, {} slots ({} days x {} per day)",
        report.pairings, report.slots, report.days, report.matches_per_day
    );
    for warning in &report.warnings {
        println!("⚠️  {}", warning);
    }
}
