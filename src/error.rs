use thiserror::Error;

/// Unified error type for release-coordinator operations.
///
/// Nothing here is recoverable: every variant aborts the run. Tool failures keep
/// the exit code of the failing program so the process can exit with it.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("{tool} exited with code {code}: {stderr}")]
    ToolInvocation {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Malformed tool output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<ReleaseError>,
    },
}

/// Convenience type alias for Results in release-coordinator
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        ReleaseError::Parse(msg.into())
    }

    /// Create a structural (document shape) error with context
    pub fn structural(msg: impl Into<String>) -> Self {
        ReleaseError::Structural(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Annotate the error with the workflow step it happened in.
    ///
    /// An error that already carries a step keeps its innermost annotation.
    pub fn in_step(self, step: &'static str) -> Self {
        match self {
            already @ ReleaseError::Step { .. } => already,
            other => ReleaseError::Step {
                step,
                source: Box::new(other),
            },
        }
    }

    /// Process exit code for this failure.
    ///
    /// Tool failures report the tool's own exit code, everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::ToolInvocation { code, .. } if *code != 0 => *code,
            ReleaseError::Step { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

/// Extension for annotating results with a workflow step name.
pub trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T>;
}

impl<T> StepContext<T> for Result<T> {
    fn step(self, step: &'static str) -> Result<T> {
        self.map_err(|e| e.in_step(step))
    }
}
