//! Core pipeline and selection state for the flood-relief dispatch dashboard.
//!
//! Raw detection batches are parsed and validated, turned into allocation
//! recommendations on demand, and kept in sync with a map marker set and a
//! single active selection owned by [`dashboard::DashboardState`].

pub mod allocation;
pub mod dashboard;
pub mod ingest;
pub mod inventory;
pub mod map;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use dashboard::{DashboardModel, DashboardOptions, DashboardState};
pub use prelude::{Clock, FixedClock, ReliefError, ReliefResult, SystemClock};
