//! Consistency validator: re-checks a scored snapshot against its raw markup
//! and live network probes, and returns a corrected copy with a confidence
//! summary.

pub mod config;
pub mod consistency;
pub mod markup;
pub mod prober;
pub mod reachability;
pub mod redirect;
pub mod sanity;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod validate;

pub use config::ValidatorConfig;
pub use prober::{HopResponse, HttpProber, ProbeOutcome, Prober};
pub use redirect::walk_redirects;
pub use validate::{validate, ValidationOutcome};
