use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ScheduleDefaults;
use crate::schedule::slot_utils::parse_time_to_minutes;
use crate::schedule::{ScheduleConfig, TeamRef};

pub const MAX_FIELDS: u32 = 10;
pub const MIN_MATCH_DURATION: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} date is required")]
    MissingDate(&'static str),

    #[error("invalid {field} date `{value}`, expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("field count must be between 1 and 10, got {0}")]
    FieldCount(u32),

    #[error("at least two teams are required")]
    NotEnoughTeams,

    #[error("team `{0}` is selected more than once")]
    DuplicateTeam(String),

    #[error("at least one time slot is required")]
    NoTimeSlots,

    #[error("invalid time slot `{0}`, expected HH:MM")]
    InvalidTimeSlot(String),

    #[error("time slot `{0}` is selected more than once")]
    DuplicateTimeSlot(String),

    #[error("match duration must be at least 60 minutes, got {0}")]
    MatchDuration(u32),
}

pub const DEFAULT_FIELD_COUNT: u32 = 2;
pub const DEFAULT_MATCH_DURATION: u32 = 90;

/// Schedule request from frontend. Left-out fields are filled by
/// [`ScheduleRequest::with_defaults`], or else the constants above.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub field_count: Option<u32>,
    #[serde(default)]
    pub team_ids: Vec<String>,
    #[serde(default)]
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub match_duration: Option<u32>,
    #[serde(default)]
    pub round_robin: Option<bool>,
}

impl ScheduleRequest {
    /// Fills whatever the request left out (no time slots, no field count,
    /// no duration, no pairing mode) from the configured defaults.
    pub fn with_defaults(mut self, defaults: &ScheduleDefaults) -> Self {
        if self.time_slots.is_empty() {
            self.time_slots = defaults.time_slots.clone();
        }
        self.field_count.get_or_insert(defaults.field_count);
        self.match_duration.get_or_insert(defaults.match_duration);
        self.round_robin.get_or_insert(defaults.round_robin);
        self
    }
}

/// A request that passed validation. Time slots are sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub field_count: u32,
    pub team_ids: Vec<String>,
    pub time_slots: Vec<String>,
    pub match_duration: u32,
    pub round_robin: bool,
}

impl ValidatedRequest {
    /// Builds the generator input, decorating with `teams` and seeding ids
    /// above `existing_match_ids`.
    pub fn into_config(
        self,
        teams: impl IntoIterator<Item = TeamRef>,
        existing_match_ids: Vec<u64>,
        location_prefix: &str,
    ) -> ScheduleConfig {
        let mut config = ScheduleConfig::new(
            self.team_ids,
            self.start_date,
            self.end_date,
            self.time_slots,
            self.field_count,
        )
        .with_teams(teams);
        config.round_robin = self.round_robin;
        config.existing_match_ids = existing_match_ids;
        config.match_duration = Some(self.match_duration);
        config.location_prefix = location_prefix.to_string();
        config
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingDate(field));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Validates a schedule request
///
/// An end date before the start date is accepted: it just yields no slots.
pub fn validate_request(req: &ScheduleRequest) -> Result<ValidatedRequest, ValidationError> {
    let start_date = parse_date("start", &req.start_date)?;
    let end_date = parse_date("end", &req.end_date)?;

    let field_count = req.field_count.unwrap_or(DEFAULT_FIELD_COUNT);
    if !(1..=MAX_FIELDS).contains(&field_count) {
        return Err(ValidationError::FieldCount(field_count));
    }

    let team_ids: Vec<String> = req.team_ids.iter().map(|id| id.trim().to_string()).collect();
    if team_ids.iter().filter(|id| !id.is_empty()).count() < 2 {
        return Err(ValidationError::NotEnoughTeams);
    }
    let mut seen = HashSet::new();
    for id in &team_ids {
        if id.is_empty() {
            return Err(ValidationError::NotEnoughTeams);
        }
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::DuplicateTeam(id.clone()));
        }
    }

    if req.time_slots.is_empty() {
        return Err(ValidationError::NoTimeSlots);
    }
    let mut timed: Vec<(u32, String)> = Vec::with_capacity(req.time_slots.len());
    for slot in &req.time_slots {
        let slot = slot.trim();
        let minutes = parse_time_to_minutes(slot)
            .ok_or_else(|| ValidationError::InvalidTimeSlot(slot.to_string()))?;
        if timed.iter().any(|(m, _)| *m == minutes) {
            return Err(ValidationError::DuplicateTimeSlot(slot.to_string()));
        }
        timed.push((minutes, slot.to_string()));
    }
    timed.sort_by_key(|(minutes, _)| *minutes);

    let match_duration = req.match_duration.unwrap_or(DEFAULT_MATCH_DURATION);
    if match_duration < MIN_MATCH_DURATION {
        return Err(ValidationError::MatchDuration(match_duration));
    }

    Ok(ValidatedRequest {
        start_date,
        end_date,
        field_count,
        team_ids,
        time_slots: timed.into_iter().map(|(_, s)| s).collect(),
        match_duration,
        round_robin: req.round_robin.unwrap_or(false),
    })
}
