//! Process exit codes.
//!
//! Scripts and CI can tell a failing lint run apart from a broken setup.

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// No errors, and warnings within the allowed count
    Success = 0,
    /// Lint errors, or more warnings than `--max-warnings` allows
    LintFailure = 1,
    /// Invalid configuration or unusable schema
    SetupError = 2,
}

impl ExitCode {
    /// Decide the outcome of a finished run.
    #[must_use]
    pub const fn from_counts(errors: usize, warnings: usize, max_warnings: Option<usize>) -> Self {
        if errors > 0 {
            return Self::LintFailure;
        }
        match max_warnings {
            Some(max) if warnings > max => Self::LintFailure,
            _ => Self::Success,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::LintFailure => write!(f, "lint failure"),
            Self::SetupError => write!(f, "setup error"),
        }
    }
}
