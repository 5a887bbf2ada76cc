//! Domain models for the wellness engine.

mod biomarker;
mod genetic;
mod profile;
mod score;
mod supplement;

pub use biomarker::*;
pub use genetic::*;
pub use profile::*;
pub use score::*;
pub use supplement::*;
