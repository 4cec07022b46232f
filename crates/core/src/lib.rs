//! Reporting engine for Tally.
//!
//! This crate contains the aggregation and reporting logic with ZERO web
//! dependencies. It reads a ledger through the `LedgerStore` trait and turns
//! it into dashboard-ready figures.
//!
//! # Modules
//!
//! - `period` - Period resolution, comparison ranges, sparklines and buckets
//! - `currency` - Conversion into the base currency
//! - `ledger` - Ledger read model, filters and the in-memory store
//! - `aggregation` - Sums, groupings and metrics over one snapshot
//! - `balance` - Account balances and net worth at arbitrary dates
//! - `budget` - Budget targets and variance analysis
//! - `flow` - Income-to-expense flow graphs
//! - `reports` - Report orchestration, caching and fan-out

pub mod aggregation;
pub mod balance;
pub mod budget;
pub mod currency;
pub mod flow;
pub mod ledger;
pub mod period;
pub mod reports;
