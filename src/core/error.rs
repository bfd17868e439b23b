//! Error handling for the launcher
//!
//! This module provides the error taxonomy of the update pipeline together with
//! user-friendly reporting for the CLI. The design mirrors two needs:
//! 1. **Strongly-typed errors** so the pipeline can tell a connectivity problem
//!    from a filesystem problem from a legitimate "nothing to install" state
//! 2. **User-friendly messages** with actionable suggestions when the CLI exits
//!
//! # Error Categories
//!
//! - **Network**: [`LauncherError::NetworkError`], [`LauncherError::HttpStatus`].
//!   Recoverable by retrying the whole flow.
//! - **Filesystem**: [`LauncherError::FileSystemError`], [`LauncherError::IoError`],
//!   [`LauncherError::ExtractionFailed`], [`LauncherError::PermissionRepairFailed`].
//!   The install is aborted and the version record keeps its prior value.
//! - **Release selection**: [`LauncherError::NoCompatibleAsset`]. A terminal state,
//!   not retryable until a new release is published.
//! - **Launch**: [`LauncherError::LaunchNotFound`], [`LauncherError::LaunchFailed`].
//!   Logged only; the launcher keeps running.
//! - **Configuration**: [`LauncherError::ConfigError`],
//!   [`LauncherError::PlatformNotSupported`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use gamelaunch_cli::core::{LauncherError, user_friendly_error};
//!
//! let error = LauncherError::NetworkError {
//!     operation: "fetch latest release".to_string(),
//!     reason: "connection refused".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error with a retry suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for launcher operations.
///
/// Each variant names one failure mode of the resolve/download/install/launch
/// pipeline. Variants carry plain strings rather than source errors so they can
/// be cloned into [`ErrorContext`] for display.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// A request to the release index or the asset host could not complete.
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        /// What was being fetched (e.g., "fetch latest release", "download asset")
        operation: String,
        /// The transport-level reason
        reason: String,
    },

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The latest release has no asset for the running platform.
    ///
    /// This is a legitimate terminal state and is reported distinctly from
    /// network and filesystem failures.
    #[error("Release {tag} has no asset compatible with {platform}")]
    NoCompatibleAsset {
        /// Platform display name
        platform: String,
        /// Release tag that was inspected
        tag: String,
    },

    /// A filesystem operation failed on a known path.
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation that failed (e.g., "remove install root")
        operation: String,
        /// The path involved
        path: String,
    },

    /// The downloaded archive could not be extracted.
    #[error("Failed to extract archive {archive}: {reason}")]
    ExtractionFailed {
        /// Archive path
        archive: String,
        /// Reason reported by the zip reader or filesystem
        reason: String,
    },

    /// Execute permissions could not be applied inside an application bundle.
    #[error("Failed to repair permissions on {path}: {reason}")]
    PermissionRepairFailed {
        /// File whose mode could not be changed
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// No runnable entry point exists under the install root.
    #[error("No '{extension}' entry point found under {root}")]
    LaunchNotFound {
        /// Install root that was searched
        root: String,
        /// Extension that was searched for
        extension: String,
    },

    /// The entry point was found but the process could not be started.
    #[error("Failed to start {path}: {reason}")]
    LaunchFailed {
        /// Entry point path
        path: String,
        /// Spawn error
        reason: String,
    },

    /// The host operating system is neither Windows nor MacOS and no override is set.
    #[error("Platform not supported: {platform}")]
    PlatformNotSupported {
        /// The detected operating system
        platform: String,
    },

    /// Configuration file or override is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// IO error from the standard library.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl LauncherError {
    /// Whether this error belongs to the network category (retry the whole flow).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::HttpStatus { .. })
    }

    /// Whether this error belongs to the IO category (install aborted, record untouched).
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileSystemError { .. }
                | Self::IoError(_)
                | Self::ExtractionFailed { .. }
                | Self::PermissionRepairFailed { .. }
        )
    }

    /// Build a [`LauncherError::NetworkError`] from a reqwest failure.
    pub fn network(operation: impl Into<String>, error: &reqwest::Error) -> Self {
        Self::NetworkError {
            operation: operation.into(),
            reason: error.to_string(),
        }
    }
}

impl Clone for LauncherError {
    fn clone(&self) -> Self {
        match self {
            Self::NetworkError {
                operation,
                reason,
            } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::HttpStatus {
                url,
                status,
            } => Self::HttpStatus {
                url: url.clone(),
                status: *status,
            },
            Self::NoCompatibleAsset {
                platform,
                tag,
            } => Self::NoCompatibleAsset {
                platform: platform.clone(),
                tag: tag.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::ExtractionFailed {
                archive,
                reason,
            } => Self::ExtractionFailed {
                archive: archive.clone(),
                reason: reason.clone(),
            },
            Self::PermissionRepairFailed {
                path,
                reason,
            } => Self::PermissionRepairFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::LaunchNotFound {
                root,
                extension,
            } => Self::LaunchNotFound {
                root: root.clone(),
                extension: extension.clone(),
            },
            Self::LaunchFailed {
                path,
                reason,
            } => Self::LaunchFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::PlatformNotSupported {
                platform,
            } => Self::PlatformNotSupported {
                platform: platform.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that pairs a [`LauncherError`] with user-facing hints.
///
/// ```rust,no_run
/// use gamelaunch_cli::core::{ErrorContext, LauncherError};
///
/// let context = ErrorContext::new(LauncherError::ConfigError {
///     message: "repository must look like owner/name".to_string(),
/// })
/// .with_suggestion("Fix the 'repository' key in config.toml");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying launcher error
    pub error: LauncherError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: LauncherError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Find the first [`LauncherError`] anywhere in an anyhow chain.
///
/// Typed errors show up either as the root cause or as a `.with_context()`
/// layer (installer steps attach a `FileSystemError` that way). `downcast_ref`
/// covers both; walking the chain catches errors nested as plain sources.
#[must_use]
pub fn find_launcher_error(error: &anyhow::Error) -> Option<&LauncherError> {
    error
        .downcast_ref::<LauncherError>()
        .or_else(|| error.chain().find_map(|cause| cause.downcast_ref::<LauncherError>()))
}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`LauncherError`] anywhere in the chain, then bare
/// [`std::io::Error`]s, and finally falls back to the rendered chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(launcher_error) = find_launcher_error(&error) {
        return create_error_context(launcher_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LauncherError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the data directory is writable by the current user")
                .with_details("The launcher needs write access to its install root and version record");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LauncherError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(LauncherError::Other {
        message,
    })
}

fn create_error_context(error: LauncherError) -> ErrorContext {
    match &error {
        LauncherError::NetworkError { .. } | LauncherError::HttpStatus { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Server connection failed. Check your network or GitHub release, then retry")
                .with_details("Nothing was installed; the current install and version record are unchanged")
        }
        LauncherError::NoCompatibleAsset { platform, .. } => {
            let suggestion = format!(
                "Wait for a release that ships a {platform} build, or check the asset names on the release page"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Assets are matched by a platform keyword in their file name ('win' or 'mac')")
        }
        LauncherError::ExtractionFailed { .. }
        | LauncherError::FileSystemError { .. }
        | LauncherError::IoError(_)
        | LauncherError::PermissionRepairFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Run the install again; a failed install is never recorded as installed")
            .with_details("The version record keeps its previous value until extraction succeeds"),
        LauncherError::LaunchNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Reinstall the game with 'gamelaunch run' or 'gamelaunch install'"),
        LauncherError::LaunchFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the installed executable is not blocked by the operating system"),
        LauncherError::PlatformNotSupported { .. } => ErrorContext::new(error)
            .with_suggestion("Set 'platform = \"windows\"' or 'platform = \"macos\"' in config.toml to override detection"),
        LauncherError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Inspect the resolved settings with 'gamelaunch config show'"),
        LauncherError::Other { .. } => ErrorContext::new(error),
    }
}
