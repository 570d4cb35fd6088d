use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use super::types::{Pairing, Slot};

/// A pairing placed into a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub slot: Slot,
    pub pairing: Pairing,
}

/// Result of one engine run.
#[derive(Debug, Clone, Default)]
pub struct AssignmentOutcome {
    pub assignments: Vec<Assignment>,
    /// Slots visited while pairings remained but none of them fit that day.
    pub skipped_slots: Vec<Slot>,
    /// Pairings still unplaced when the slots ran out.
    pub unscheduled: Vec<Pairing>,
}

/// Teams already placed on each calendar day. A day gets an empty set the
/// first time it is looked up.
#[derive(Debug, Default)]
struct DayUsage {
    days: HashMap<NaiveDate, HashSet<String>>,
}

impl DayUsage {
    fn teams_on(&mut self, day: NaiveDate) -> &mut HashSet<String> {
        self.days.entry(day).or_default()
    }
}

/// Greedy slot filler.
///
/// Walks `slots` in order, pulling only as many as it needs. For each slot it
/// scans the still-unscheduled pairings (everything from `cursor` on) for the
/// first one whose teams are both free that day, swaps it to the cursor, and
/// advances. A slot with no compatible pairing is left empty. Stops as soon as
/// every pairing is placed, so an unbounded slot source is fine.
///
/// No backtracking: an early pick can strand a pairing that a different
/// ordering would have fit.
pub fn assign(slots: impl IntoIterator<Item = Slot>, pairings: &[Pairing]) -> AssignmentOutcome {
    let mut remaining = pairings.to_vec();
    let mut cursor = 0;
    let mut usage = DayUsage::default();
    let mut outcome = AssignmentOutcome::default();

    for slot in slots {
        if cursor == remaining.len() {
            break;
        }

        let used = usage.teams_on(slot.date);
        let found = (cursor..remaining.len()).find(|&k| {
            let p = &remaining[k];
            !used.contains(&p.home) && !used.contains(&p.away)
        });

        match found {
            Some(k) => {
                remaining.swap(cursor, k);
                let pairing = remaining[cursor].clone();
                used.insert(pairing.home.clone());
                used.insert(pairing.away.clone());
                debug!(date = %slot.date, time = %slot.time, field = slot.field, %pairing, "slot filled");
                outcome.assignments.push(Assignment {
                    slot,
                    pairing,
                });
                cursor += 1;
            }
            None => {
                debug!(date = %slot.date, time = %slot.time, field = slot.field, "no compatible pairing, slot left empty");
                outcome.skipped_slots.push(slot);
            }
        }
    }

    outcome.unscheduled = remaining.split_off(cursor);
    outcome
}
