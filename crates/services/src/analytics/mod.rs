//! The meeting-analytics aggregation engine.
//!
//! Source rows flow one direction: temporal resolution, then the record
//! join, then derived metrics, then the view projections, assembled by the
//! query façade. Every query is a stateless read over whatever snapshot
//! the storage provides; nothing here caches or mutates.

pub mod error;
pub mod facade;
pub mod filter;
pub mod joiner;
pub mod metrics;
pub mod reports;
pub mod source;
pub mod temporal;
pub mod views;

pub use error::{AnalyticsError, AnalyticsResult};
pub use facade::{AnalyticsEngine, AnalyticsEnvelope};
pub use filter::{AnalyticsParams, ViewKind, ViewSelection};
pub use source::{AnalyticsSource, MongoSource};
