pub mod types;
pub mod slot_utils;
pub mod pairing;
pub mod capacity;
pub mod assignment;
pub mod generator;

pub use types::{GeneratedMatch, MatchStatus, Pairing, PairingMode, ScheduleConfig, Slot, TeamRef};
pub use slot_utils::{day_count, enumerate_slots, parse_time_of_day};
pub use pairing::{estimated_pairing_count, generate_pairings};
pub use capacity::{order_for_capacity, CapacityReport};
pub use assignment::{assign, Assignment, AssignmentOutcome};
pub use generator::{generate_schedule, generate_schedule_seeded, generate_schedule_with_entropy};
