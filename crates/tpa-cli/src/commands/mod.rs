//! CLI command implementations.

pub mod analyze;
pub mod apply_result;
pub mod recalc;

pub use analyze::run_analyze;
pub use apply_result::run_apply_result;
pub use recalc::run_recalc;
