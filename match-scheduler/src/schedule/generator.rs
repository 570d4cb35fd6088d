use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use super::assignment::{assign, Assignment};
use super::capacity::order_for_capacity;
use super::pairing::generate_pairings;
use super::slot_utils::{enumerate_slots, parse_time_slots, slot_count};
use super::types::{GeneratedMatch, MatchStatus, ScheduleConfig, TeamRef};

/// Generates the match schedule for `config`.
///
/// Total: degenerate input (fewer than two teams, no fields, no valid time
/// slots, inverted dates) produces an empty list. When there are more
/// pairings than slots, `rng` decides which ones are left out; it is the
/// only source of randomness.
pub fn generate_schedule<R: Rng + ?Sized>(config: &ScheduleConfig, rng: &mut R) -> Vec<GeneratedMatch> {
    if config.team_ids.len() < 2 || config.field_count == 0 {
        warn!(
            teams = config.team_ids.len(),
            fields = config.field_count,
            "nothing to schedule"
        );
        return Vec::new();
    }

    let Some(first_id) = config
        .existing_match_ids
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .checked_add(1)
    else {
        warn!("existing match ids leave no room for new ids");
        return Vec::new();
    };

    let times = parse_time_slots(&config.time_slots);
    let slot_total = slot_count(config.start_date, config.end_date, times.len(), config.field_count);
    let pairings = generate_pairings(&config.team_ids, config.pairing_mode());

    if pairings.len() > slot_total {
        warn!(
            pairings = pairings.len(),
            slots = slot_total,
            "not enough slots, some pairings will be dropped"
        );
    }

    let pairings = order_for_capacity(pairings, slot_total, rng);
    let slots = enumerate_slots(config.start_date, config.end_date, &times, config.field_count);
    let outcome = assign(slots, &pairings);

    // Ids stop at u64::MAX; anything past it is left out.
    let matches: Vec<GeneratedMatch> = outcome
        .assignments
        .iter()
        .zip(first_id..=u64::MAX)
        .map(|(assignment, id)| build_match(config, assignment, id))
        .collect();
    if matches.len() < outcome.assignments.len() {
        warn!(
            dropped = outcome.assignments.len() - matches.len(),
            "ran out of match ids"
        );
    }

    info!(
        scheduled = matches.len(),
        slots = slot_total,
        skipped_slots = outcome.skipped_slots.len(),
        unscheduled = outcome.unscheduled.len(),
        "schedule generated"
    );

    matches
}

/// Same as [`generate_schedule`] with a seeded generator, for reproducible runs.
pub fn generate_schedule_seeded(config: &ScheduleConfig, seed: u64) -> Vec<GeneratedMatch> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_schedule(config, &mut rng)
}

pub fn generate_schedule_with_entropy(config: &ScheduleConfig) -> Vec<GeneratedMatch> {
    let mut rng = rand::thread_rng();
    generate_schedule(config, &mut rng)
}

fn lookup(config: &ScheduleConfig, team_id: &str) -> TeamRef {
    config
        .teams
        .get(team_id)
        .cloned()
        .unwrap_or_else(|| TeamRef::new(team_id, team_id))
}

fn build_match(config: &ScheduleConfig, assignment: &Assignment, id: u64) -> GeneratedMatch {
    let home = lookup(config, &assignment.pairing.home);
    let away = lookup(config, &assignment.pairing.away);

    GeneratedMatch {
        id,
        home_team_id: assignment.pairing.home.clone(),
        home_team_name: home.name,
        home_team_logo: home.logo_url,
        home_team_score: None,
        away_team_id: assignment.pairing.away.clone(),
        away_team_name: away.name,
        away_team_logo: away.logo_url,
        away_team_score: None,
        date: assignment.slot.kickoff(),
        location: config.location_for_field(assignment.slot.field),
        status: MatchStatus::Upcoming,
    }
}
