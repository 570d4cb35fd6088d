use chrono::Timelike;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::pairing::{estimated_pairing_count, generate_pairings};
use super::slot_utils::{day_count, minutes_to_time_string, parse_time_slots, slot_count};
use super::types::{Pairing, ScheduleConfig};

/// Advisory comparison of demand (pairings) against supply (slots). The
/// engine never consults it; callers surface it to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    pub pairings: usize,
    pub estimated_pairings: usize,
    pub days: usize,
    pub matches_per_day: usize,
    pub slots: usize,
    pub warnings: Vec<String>,
}

impl CapacityReport {
    pub fn compute(config: &ScheduleConfig) -> Self {
        let times = parse_time_slots(&config.time_slots);
        let mode = config.pairing_mode();
        let pairings = generate_pairings(&config.team_ids, mode).len();
        let estimated_pairings = estimated_pairing_count(config.team_ids.len(), mode);
        let days = day_count(config.start_date, config.end_date);
        let matches_per_day = times.len() * config.field_count as usize;
        let slots = slot_count(config.start_date, config.end_date, times.len(), config.field_count);

        let mut warnings = Vec::new();
        if pairings > slots {
            warnings.push(format!(
                "{} matches required but only {} slots available; {} will not be scheduled",
                pairings,
                slots,
                pairings - slots
            ));
        }
        if estimated_pairings != pairings {
            warnings.push(format!(
                "estimated {} matches, generator produces {}",
                estimated_pairings, pairings
            ));
        }
        if let Some(duration) = config.match_duration {
            let mut minutes: Vec<u32> = times
                .iter()
                .map(|t| t.num_seconds_from_midnight() / 60)
                .collect();
            minutes.sort_unstable();
            for window in minutes.windows(2) {
                let gap = window[1] - window[0];
                if gap < duration {
                    warnings.push(format!(
                        "time slots {} and {} are {} minutes apart, shorter than the {} minute match duration",
                        minutes_to_time_string(window[0]),
                        minutes_to_time_string(window[1]),
                        gap,
                        duration
                    ));
                }
            }
        }

        CapacityReport {
            pairings,
            estimated_pairings,
            days,
            matches_per_day,
            slots,
            warnings,
        }
    }

    pub fn shortfall(&self) -> usize {
        self.pairings.saturating_sub(self.slots)
    }

    pub fn is_over_capacity(&self) -> bool {
        self.pairings > self.slots
    }
}

/// When demand exceeds supply, shuffles the pairings so that the ones the
/// engine ends up dropping are picked at random rather than always the
/// tail of the list. Otherwise the list is returned untouched.
///
/// Every pairing is kept: the engine stops once slots run out, which does
/// the actual trimming.
pub fn order_for_capacity<R: Rng + ?Sized>(
    mut pairings: Vec<Pairing>,
    slot_count: usize,
    rng: &mut R,
) -> Vec<Pairing> {
    if pairings.len() > slot_count {
        pairings.shuffle(rng);
    }
    pairings
}
