use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenieError {
    #[error("Unknown mode '{mode}'. Must be 'native' or 'docker'.")]
    InvalidMode { mode: String },

    #[error("All files must be in the same directory for Docker binding.")]
    PathLayout { directories: Vec<PathBuf> },

    #[error("Invalid path for {field} ({value}): {reason}")]
    InvalidPath {
        field: String,
        value: String,
        reason: String,
    },

    /// `marker_only` is set when the exit status was 0 and only the
    /// `ERROR` text on stderr signalled the failure. `exit_code` is `None`
    /// for that case and for a child killed by a signal.
    #[error("{tool} failed:\n{stderr}")]
    ProcessFailed {
        tool: String,
        exit_code: Option<i32>,
        marker_only: bool,
        stderr: String,
    },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation '{operation}' is not supported in {mode} mode")]
    Unsupported { mode: String, operation: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Process,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl GenieError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenieError::InvalidMode { .. }
            | GenieError::ConfigError { .. }
            | GenieError::ConfigValidationError { .. }
            | GenieError::Unsupported { .. } => ErrorCategory::Configuration,
            GenieError::PathLayout { .. } | GenieError::InvalidPath { .. } => ErrorCategory::Input,
            GenieError::ProcessFailed { .. } => ErrorCategory::Process,
            GenieError::Spawn { .. }
            | GenieError::IoError(_)
            | GenieError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Process => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code used by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GenieError::InvalidMode { mode } => {
                format!("'{}' is not a valid execution mode", mode)
            }
            GenieError::PathLayout { directories } => format!(
                "Docker mode needs every file in one directory, got {} directories",
                directories.len()
            ),
            GenieError::InvalidPath { field, reason, .. } => {
                format!("The {} path is not usable: {}", field, reason)
            }
            GenieError::ProcessFailed {
                tool,
                exit_code,
                marker_only,
                ..
            } => match (exit_code, marker_only) {
                (_, true) => format!("{} reported ERROR despite exiting with status 0", tool),
                (Some(code), false) => format!("{} exited with status {}", tool, code),
                (None, false) => format!("{} was terminated by a signal", tool),
            },
            GenieError::Spawn { program, .. } => format!("Could not run '{}'", program),
            GenieError::Unsupported { mode, operation } => {
                format!("'{}' is only available outside {} mode", operation, mode)
            }
            GenieError::IoError(e) => format!("File system error: {}", e),
            GenieError::SerializationError(e) => format!("Could not render output: {}", e),
            GenieError::ConfigError { message } => format!("Configuration problem: {}", message),
            GenieError::ConfigValidationError { field, message } => {
                format!("Invalid setting '{}': {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GenieError::InvalidMode { .. } => "Use --mode native or --mode docker",
            GenieError::PathLayout { .. } => {
                "Move the input, output and reference files into the same directory"
            }
            GenieError::InvalidPath { .. } => "Pass a non-empty UTF-8 file path",
            GenieError::ProcessFailed { .. } => {
                "Check the Genie error output above and the input file format"
            }
            GenieError::Spawn { .. } => {
                "Make sure the binary is installed and on PATH (or the Docker daemon is running)"
            }
            GenieError::Unsupported { .. } => "Switch to docker mode for this command",
            GenieError::IoError(_) => "Check file permissions and free disk space",
            GenieError::SerializationError(_) => "Run again without --dry-run",
            GenieError::ConfigError { .. } | GenieError::ConfigValidationError { .. } => {
                "Review the configuration file"
            }
        }
    }

    /// Lines the CLI writes to stderr before exiting: the friendly message,
    /// the tool's own stderr for process failures, then the suggestion.
    pub fn report(&self) -> String {
        let mut lines = vec![format!("❌ {}", self.user_friendly_message())];
        if let GenieError::ProcessFailed { stderr, .. } = self {
            let stderr = stderr.trim_end();
            if !stderr.is_empty() {
                lines.push(stderr.to_string());
            }
        }
        lines.push(format!("💡 Suggestion: {}", self.recovery_suggestion()));
        lines.join("\n")
    }
}

pub type Result<T> = std::result::Result<T, GenieError>;
