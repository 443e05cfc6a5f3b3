pub mod samples;
pub mod types;

pub use samples::{load_questions, sample_questions};
pub use types::Question;
