//! CLI argument definitions for the verification limits.

use crate::verifier::VerifyConfig;
use clap::Args;

/// Limits controlling how the reference data is queried.
#[derive(Args, Clone, Debug)]
pub struct VerifyArgs {
    /// Accounts per remote query
    #[arg(long, default_value = "25", env = "REV_VERIFY_BATCH_SIZE")]
    pub batch_size: usize,

    /// Maximum number of queries in flight at once
    #[arg(long, default_value = "50", env = "REV_VERIFY_CONCURRENCY")]
    pub concurrency_limit: usize,

    /// Hard cap on the number of accounts verified
    #[arg(long, default_value = "5000", env = "REV_VERIFY_MAX")]
    pub max_to_process: usize,

    /// Do not fail the run for zero-balance accounts missing from a response
    #[arg(long)]
    pub allow_unreported_zero: bool,
}

impl From<&VerifyArgs> for VerifyConfig {
    fn from(args: &VerifyArgs) -> Self {
        VerifyConfig::new()
            .with_batch_size(args.batch_size)
            .with_concurrency_limit(args.concurrency_limit)
            .with_max_to_process(args.max_to_process)
            .with_allow_unreported_zero(args.allow_unreported_zero)
    }
}
