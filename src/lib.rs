//! Colombian income tax engine.
//!
//! This crate computes personal income tax and mandatory health and pension
//! contributions for a monthly salary, using the progressive UVT bracket table
//! and contribution rules of a configurable tax year.

#![warn(missing_docs)]

pub mod calculation;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
