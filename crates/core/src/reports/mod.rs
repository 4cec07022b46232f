//! Report orchestration.
//!
//! - `orchestrator` - the single entry point; takes a snapshot, resolves the
//!   period and runs one report
//! - `named` - the fixed dashboard reports
//! - `adhoc` - user-defined grouping and metrics
//! - `fanout` - bounded, cancellable concurrent sub-aggregations
//! - `cache` - result cache keyed by request and snapshot revision

mod adhoc;
pub mod cache;
pub mod context;
pub mod error;
pub mod fanout;
mod named;
pub mod orchestrator;
pub mod request;
pub mod types;

#[cfg(test)]
mod tests;

pub use cache::ReportCache;
pub use context::{Clock, FixedClock, ReportContext, ReportSettings, ReportWindow, SystemClock};
pub use error::ReportError;
pub use orchestrator::ReportOrchestrator;
pub use request::{AdHocDefinition, ReportRequest};
pub use types::*;
