//! Security guard auto-scheduling.
//!
//! Assigns guards to shifts with a chronological greedy pass followed by a
//! bounded swap improvement, honoring duty status, overlap, rest, skill,
//! security-level and weekly-hour limits. Around the scheduler sit roster
//! storage, auditing, recurring shift expansion and an axum REST API.

pub mod api;
pub mod audit;
pub mod config;
#[cfg(feature = "console")]
pub mod console;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod eligibility;
pub mod error;
pub mod interval;
pub mod ledger;
pub mod prepare;
pub mod recurrence;
pub mod repository;
pub mod result;
pub mod scoring;
pub mod solver;
