//! Scrim tracker for a fixed group of League players: match results,
//! per-member win/loss stats and tier-based 5v5 team balancing.

pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod http;
pub mod metrics;
pub mod rank;
