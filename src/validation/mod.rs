//! URL checking
//!
//! Request strategy, the per-URL checker, the bounded dispatcher and the
//! aggregation of outcomes into a batch report.

pub mod aggregator;
pub mod checker;
pub mod dispatcher;
pub mod outcome;
pub mod probe;
pub mod report;
pub mod strategy;

// Re-export commonly used items
pub use aggregator::Aggregator;
pub use checker::{CheckUrl, Checker};
pub use dispatcher::{Dispatcher, ProgressSink};
pub use outcome::{Bucket, CheckKind, CheckOutcome, CheckStatus};
pub use probe::{HttpProbe, ProbeError, ProbeResponse, ReqwestProbe};
pub use report::BatchReport;
pub use strategy::{HeadThenGet, Method, MethodPlan, ResolveStrategy};
