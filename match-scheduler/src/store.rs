// Team and match storage. The dashboard's hosted data store sits behind these
// traits; `InMemoryStore` is the implementation the server runs with.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::info;

use crate::schedule::{GeneratedMatch, MatchStatus, TeamRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("match {0} already exists")]
    DuplicateMatch(u64),

    #[error("match {0} not found")]
    MatchNotFound(u64),

    #[error("match id {0} is outside 1..=9007199254740991")]
    InvalidMatchId(u64),
}

/// Largest id a JSON client can round-trip exactly (2^53 - 1).
pub const MAX_MATCH_ID: u64 = (1 << 53) - 1;

pub trait TeamDirectory {
    /// All teams, in insertion order.
    fn teams(&self) -> Vec<TeamRef>;

    /// Teams for the given ids; unknown ids are left out.
    fn lookup(&self, ids: &[String]) -> Vec<TeamRef>;

    /// Inserts or replaces a team by id.
    fn upsert(&self, team: TeamRef);
}

pub trait MatchRepository {
    fn matches(&self) -> Vec<GeneratedMatch>;

    fn existing_ids(&self) -> Vec<u64>;

    /// Stores a batch atomically: nothing is written if any id is taken or
    /// outside `1..=MAX_MATCH_ID`.
    fn save_batch(&self, matches: &[GeneratedMatch]) -> Result<usize, StoreError>;

    fn update_status(
        &self,
        id: u64,
        status: MatchStatus,
        scores: Option<(u32, u32)>,
    ) -> Result<GeneratedMatch, StoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    teams: Vec<TeamRef>,
    matches: BTreeMap<u64, GeneratedMatch>,
}

// In-memory storage (in production, the hosted database)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(teams: Vec<TeamRef>) -> Self {
        let store = Self::new();
        for team in teams {
            store.upsert(team);
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Mutations never leave the maps half-written, so a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TeamDirectory for InMemoryStore {
    fn teams(&self) -> Vec<TeamRef> {
        self.lock().teams.clone()
    }

    fn lookup(&self, ids: &[String]) -> Vec<TeamRef> {
        let state = self.lock();
        ids.iter()
            .filter_map(|id| state.teams.iter().find(|t| &t.id == id).cloned())
            .collect()
    }

    fn upsert(&self, team: TeamRef) {
        let mut state = self.lock();
        match state.teams.iter().position(|t| t.id == team.id) {
            Some(idx) => state.teams[idx] = team,
            None => state.teams.push(team),
        }
    }
}

impl MatchRepository for InMemoryStore {
    fn matches(&self) -> Vec<GeneratedMatch> {
        self.lock().matches.values().cloned().collect()
    }

    fn existing_ids(&self) -> Vec<u64> {
        self.lock().matches.keys().copied().collect()
    }

    fn save_batch(&self, matches: &[GeneratedMatch]) -> Result<usize, StoreError> {
        let mut state = self.lock();

        let mut batch_ids = HashSet::new();
        for m in matches {
            if m.id == 0 || m.id > MAX_MATCH_ID {
                return Err(StoreError::InvalidMatchId(m.id));
            }
            if state.matches.contains_key(&m.id) || !batch_ids.insert(m.id) {
                return Err(StoreError::DuplicateMatch(m.id));
            }
        }

        for m in matches {
            state.matches.insert(m.id, m.clone());
        }
        info!(saved = matches.len(), total = state.matches.len(), "matches saved");
        Ok(matches.len())
    }

    fn update_status(
        &self,
        id: u64,
        status: MatchStatus,
        scores: Option<(u32, u32)>,
    ) -> Result<GeneratedMatch, StoreError> {
        let mut state = self.lock();
        let m = state.matches.get_mut(&id).ok_or(StoreError::MatchNotFound(id))?;
        m.status = status;
        if let Some((home, away)) = scores {
            m.home_team_score = Some(home);
            m.away_team_score = Some(away);
        }
        Ok(m.clone())
    }
}
