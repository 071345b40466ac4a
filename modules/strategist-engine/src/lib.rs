pub mod cache;
pub mod competitor;
pub mod pipeline;
pub mod strategy;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod trends;

pub use pipeline::{
    CompetitorOutcome, CompetitorReport, Notice, NoticeLevel, PlanOutcome, PlanReport, Strategist,
};
