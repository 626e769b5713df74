//! Hiscore Roles Bot - A chat bot that links leaderboard names to guild
//! members and keeps their hiscore roles in sync.
//!
//! This library provides the domain types, the pure eligibility and
//! reconciliation logic, and the I/O shell (leaderboard feed, REST
//! interpreter, link store, interaction server) around them.

pub mod bot;
pub mod commands;
pub mod config;
pub mod discord;
pub mod effects;
pub mod eligibility;
pub mod embeds;
pub mod hiscores;
pub mod links;
pub mod reconcile;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
