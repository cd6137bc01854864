use std::process::ExitCode;

/// A fatal failure of one pipeline stage.
///
/// Row-level parse problems are deliberately absent: one malformed row must
/// not abort the run, so those surface as [`crate::core::score::SkipReason`]
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The comparison page was unreachable or missing the anti-forgery tokens.
    #[error("retrieval failed: {0:#}")]
    Retrieval(#[source] anyhow::Error),

    /// The export postback failed.
    #[error("export failed: {0:#}")]
    Export(#[source] anyhow::Error),

    /// Opening the database or appending the batch failed. Rows inserted
    /// before the failure stay written.
    #[error("persistence failed: {0:#}")]
    Persistence(#[source] anyhow::Error),

    /// The savings alert could not be built or delivered. Records persisted
    /// earlier in the same run are unaffected.
    #[error("delivery failed: {0:#}")]
    Delivery(#[source] anyhow::Error),
}

impl RunError {
    /// Distinct non-zero exit code per failure category, for the external
    /// scheduler to tell the stages apart.
    pub fn exit_code(&self) -> ExitCode {
        let code: u8 = match self {
            Self::Retrieval(_) => 2,
            Self::Export(_) => 3,
            Self::Persistence(_) => 4,
            Self::Delivery(_) => 5,
        };
        ExitCode::from(code)
    }
}
