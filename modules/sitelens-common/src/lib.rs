pub mod authority;
pub mod config;
pub mod error;
pub mod recommendation;
pub mod recover;
pub mod scores;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod types;
pub mod validation;

pub use authority::*;
pub use config::Config;
pub use error::SiteLensError;
pub use recommendation::*;
pub use scores::*;
pub use types::*;
pub use validation::*;
