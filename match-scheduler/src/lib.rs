// Library root: the scheduling core plus the CLI/web plumbing around it,
// exposed so integration tests can reach the public API.

pub mod config;
pub mod display;
pub mod form;
pub mod parser;
pub mod schedule;
pub mod store;
pub mod web;
