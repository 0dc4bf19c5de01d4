//! Quota and delay tracking for case review pipelines.
//!
//! Cases move through assigned, returned, qualified, approved and audited
//! states. Each reviewer role accrues a quota per business day; comparing it
//! with the cases the role has completed gives a backlog, and the backlog
//! places every reviewer in one of four delay categories.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod crossfilter;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod quota;
pub mod report;
pub mod risk;

pub use error::{TrackerError, TrackerResult};
pub use models::{CaseRecord, CategoryRow, DelayCategory, Role, State, SummaryRow};
