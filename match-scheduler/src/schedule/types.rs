use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A team as supplied by the caller. Only `id` matters for scheduling;
/// `name` and `logo_url` decorate the generated matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl TeamRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        TeamRef {
            id: id.into(),
            name: name.into(),
            logo_url: None,
        }
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}

/// A (home, away) meeting that has to be played once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub home: String,
    pub away: String,
}

impl Pairing {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Pairing {
            home: home.into(),
            away: away.into(),
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home == team_id || self.away == team_id
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Which pairing algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// Every team meets every other team once, home side = earlier in the list.
    #[default]
    SingleRound,
    /// Circle method, one round per rotation.
    RoundRobin,
}

impl PairingMode {
    pub fn from_flag(round_robin: bool) -> Self {
        if round_robin {
            PairingMode::RoundRobin
        } else {
            PairingMode::SingleRound
        }
    }
}

/// A schedulable (day, time-of-day, field) cell. Fields are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub field: u32,
}

impl Slot {
    pub fn kickoff(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "upcoming" => Some(MatchStatus::Upcoming),
            "live" => Some(MatchStatus::Live),
            "completed" => Some(MatchStatus::Completed),
            _ => None,
        }
    }
}

/// A match produced by the generator. Never mutated after creation; the
/// store keeps its own copy once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMatch {
    pub id: u64,
    pub home_team_id: String,
    pub home_team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team_score: Option<u32>,
    pub away_team_id: String,
    pub away_team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team_score: Option<u32>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub status: MatchStatus,
}

impl GeneratedMatch {
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

pub const DEFAULT_LOCATION_PREFIX: &str = "Terrain";

fn default_location_prefix() -> String {
    DEFAULT_LOCATION_PREFIX.to_string()
}

/// Everything one generation run needs. Plain data in, plain data out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub team_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_slots: Vec<String>,
    pub field_count: u32,
    #[serde(default)]
    pub round_robin: bool,
    #[serde(default)]
    pub existing_match_ids: Vec<u64>,
    #[serde(default)]
    pub teams: HashMap<String, TeamRef>,
    /// Minutes per match. Only used for advisory warnings.
    #[serde(default)]
    pub match_duration: Option<u32>,
    #[serde(default = "default_location_prefix")]
    pub location_prefix: String,
}

impl ScheduleConfig {
    pub fn new(
        team_ids: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        time_slots: Vec<String>,
        field_count: u32,
    ) -> Self {
        ScheduleConfig {
            team_ids,
            start_date,
            end_date,
            time_slots,
            field_count,
            round_robin: false,
            existing_match_ids: Vec::new(),
            teams: HashMap::new(),
            match_duration: None,
            location_prefix: default_location_prefix(),
        }
    }

    pub fn pairing_mode(&self) -> PairingMode {
        PairingMode::from_flag(self.round_robin)
    }

    /// Replaces the lookup table with the given teams, keyed by id.
    pub fn with_teams(mut self, teams: impl IntoIterator<Item = TeamRef>) -> Self {
        self.teams = teams.into_iter().map(|t| (t.id.clone(), t)).collect();
        self
    }

    pub fn location_for_field(&self, field: u32) -> String {
        format!("{} {}", self.location_prefix, field)
    }
}
