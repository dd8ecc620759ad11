pub mod axes;
pub mod config;
pub mod recommendations;
pub mod scorer;
pub mod treatment;

pub use config::{ScoringConfig, WeightTable};
pub use recommendations::generate;
pub use scorer::{score_all, weighted_overall};
pub use treatment::build_plan;
