use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

use super::types::Slot;

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 || parts[1].len() != 2 {
        return None;
    }
    let hours: u32 = parts[0].parse().ok()?;
    let minutes: u32 = parts[1].parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}

/// Parses "HH:MM" into a time of day.
pub fn parse_time_of_day(time_str: &str) -> Option<NaiveTime> {
    let minutes = parse_time_to_minutes(time_str)?;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Number of calendar days from `start` to `end`, both inclusive.
/// Zero when the range is inverted.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> usize {
    if end < start {
        return 0;
    }
    (end - start).num_days() as usize + 1
}

/// Parses the configured time slots, dropping (and logging) anything that is
/// not a valid HH:MM string. Order is kept as supplied.
pub fn parse_time_slots(time_slots: &[String]) -> Vec<NaiveTime> {
    time_slots
        .iter()
        .filter_map(|raw| {
            let parsed = parse_time_of_day(raw);
            if parsed.is_none() {
                warn!(time_slot = %raw, "ignoring malformed time slot");
            }
            parsed
        })
        .collect()
}

/// Enumerates every schedulable cell: days outer-most (chronological), then
/// the time slots in the order given, then fields 1..=field_count.
///
/// Lazy: the date range is not capped, so callers pull only what they use.
pub fn enumerate_slots(
    start: NaiveDate,
    end: NaiveDate,
    times: &[NaiveTime],
    field_count: u32,
) -> impl Iterator<Item = Slot> + '_ {
    start
        .iter_days()
        .take(day_count(start, end))
        .flat_map(move |date| {
            times.iter().flat_map(move |&time| {
                (1..=field_count).map(move |field| Slot { date, time, field })
            })
        })
}

/// Total number of cells `enumerate_slots` yields, saturating at `usize::MAX`.
pub fn slot_count(start: NaiveDate, end: NaiveDate, time_count: usize, field_count: u32) -> usize {
    day_count(start, end)
        .saturating_mul(time_count)
        .saturating_mul(field_count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        parse_time_of_day(s).unwrap()
    }

    #[test]
    fn parses_and_formats_times() {
        assert_eq!(parse_time_to_minutes("14:00"), Some(840));
        assert_eq!(parse_time_to_minutes("00:05"), Some(5));
        assert_eq!(parse_time_to_minutes("24:00"), None);
        assert_eq!(parse_time_to_minutes("12:60"), None);
        assert_eq!(parse_time_to_minutes("1400"), None);
        assert_eq!(parse_time_to_minutes("14:0"), None);
        assert_eq!(minutes_to_time_string(840), "14:00");
        assert_eq!(minutes_to_time_string(65), "01:05");
    }

    #[test]
    fn single_day_two_times_one_field() {
        let slots = enumerate_slots(
            date("2024-01-01"),
            date("2024-01-01"),
            &[time("14:00"), time("16:00")],
            1,
        )
        .collect::<Vec<_>>();
        assert_eq!(
            slots,
            vec![
                Slot { date: date("2024-01-01"), time: time("14:00"), field: 1 },
                Slot { date: date("2024-01-01"), time: time("16:00"), field: 1 },
            ]
        );
    }

    #[test]
    fn nesting_order_is_day_time_field() {
        let slots = enumerate_slots(
            date("2024-02-28"),
            date("2024-03-01"),
            &[time("18:00"), time("10:00")],
            2,
        )
        .collect::<Vec<_>>();
        assert_eq!(slots.len(), 3 * 2 * 2);
        assert_eq!(slots.len(), slot_count(date("2024-02-28"), date("2024-03-01"), 2, 2));

        // Leap day included, supplied time order preserved.
        assert_eq!(slots[4].date, date("2024-02-29"));
        assert_eq!(slots[0].time, time("18:00"));
        assert_eq!(slots[2].time, time("10:00"));
        assert_eq!(slots[0].field, 1);
        assert_eq!(slots[1].field, 2);
        assert_eq!(slots[11].date, date("2024-03-01"));
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(day_count(date("2024-01-02"), date("2024-01-01")), 0);
        assert!(enumerate_slots(date("2024-01-02"), date("2024-01-01"), &[time("14:00")], 2)
            .next()
            .is_none());
    }

    #[test]
    fn zero_fields_or_no_times_is_empty() {
        assert!(enumerate_slots(date("2024-01-01"), date("2024-01-03"), &[time("14:00")], 0)
            .next()
            .is_none());
        assert!(enumerate_slots(date("2024-01-01"), date("2024-01-03"), &[], 3).next().is_none());
    }

    #[test]
    fn long_ranges_are_enumerated_on_demand() {
        let times: Vec<NaiveTime> = (8..16).map(|h| NaiveTime::from_hms_opt(h, 0, 0).unwrap()).collect();
        let start = date("0001-01-01");
        let end = date("9999-12-31");

        let mut slots = enumerate_slots(start, end, &times, 10);
        assert_eq!(slots.next(), Some(Slot { date: start, time: times[0], field: 1 }));
        assert_eq!(slots.nth(79).map(|s| s.date), Some(date("0001-01-02")));
        assert_eq!(slot_count(start, end, times.len(), 10), day_count(start, end) * 80);
        assert_eq!(slot_count(start, end, usize::MAX, 10), usize::MAX);
    }

    #[test]
    fn malformed_time_slots_are_dropped() {
        let raw = vec!["14:00".to_string(), "bogus".to_string(), "09:30".to_string()];
        assert_eq!(parse_time_slots(&raw), vec![time("14:00"), time("09:30")]);
    }
}
