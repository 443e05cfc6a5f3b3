pub mod config;
pub mod engine;
pub mod factors;
pub mod types;
pub mod validation;

pub use config::*;
pub use engine::{analyze_question, FactorContribution, VisualAnalysis};
pub use factors::RangeOp;
pub use types::{Priority, VisualType};
pub use validation::validate_scoring;
