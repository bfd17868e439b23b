//! Core types shared by every stage of the launcher pipeline.
//!
//! Currently this is the error taxonomy; see [`error`] for the categories and
//! how they are reported to the user.

pub mod error;

pub use error::{ErrorContext, LauncherError, find_launcher_error, user_friendly_error};
