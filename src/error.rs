#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the profile-stats crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a documented error surface for library consumers.

use std::{
    fmt,
    path::{Path, PathBuf}
};

/// HTTP status attached to a failed remote call, when the provider sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStatus(pub Option<u16>);

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "HTTP {code}"),
            None => f.write_str("no HTTP status")
        }
    }
}

/// Unified error type returned by the aggregation pipeline and CLI.
///
/// Every remote failure is fatal for the run. Missing document markers are
/// not represented here: the patcher treats them as a per-region no-op.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Required configuration, such as the access token, is absent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human readable description of the missing or invalid setting.
        message: String
    },
    /// A call to the hosting API was rejected or could not be completed.
    #[error("remote fetch failed for {context} ({status}): {message}")]
    RemoteFetch {
        /// Request that failed, for example `languages for octocat/hello`.
        context: String,
        /// Status code reported by the provider.
        status:  RemoteStatus,
        /// Provider-supplied detail or transport error text.
        message: String
    },
    /// Wraps I/O errors on the profile document or the settings file.
    #[error("failed to access {path:?}: {source}")]
    Io {
        /// Location of the file being read or written.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors for the settings file.
    #[error("failed to parse settings: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON encoding and decoding errors.
    #[error("failed to process JSON: {source}")]
    Serialize {
        /// Underlying serde_json error.
        source: serde_json::Error
    },
    /// Returned when settings violate invariants.
    #[error("invalid settings: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Unexpected failures such as a panicking fetch task.
    #[error("internal error: {message}")]
    Internal {
        /// Human readable description of the failure.
        message: String
    }
}

impl Error {
    /// Constructs a configuration error.
    ///
    /// # Parameters
    ///
    /// * `message` - Description of the missing or invalid setting.
    pub fn configuration<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Configuration {
            message: message.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs an internal error.
    pub fn internal<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Internal {
            message: message.into()
        }
    }

    /// Constructs a remote fetch error with an explicit status.
    pub fn remote<C, M>(context: C, status: Option<u16>, message: M) -> Self
    where
        C: Into<String>,
        M: Into<String>
    {
        Self::RemoteFetch {
            context: context.into(),
            status:  RemoteStatus(status),
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Converts an [`octocrab::Error`] into [`Error::RemoteFetch`].
///
/// GitHub API rejections keep their status code and message; transport and
/// decoding failures carry no status.
pub fn remote_error(context: &str, error: octocrab::Error) -> Error {
    match error {
        octocrab::Error::GitHub {
            source, ..
        } => {
            let mut message = source.message.clone();
            if let Some(details) = source.errors.as_ref().filter(|items| !items.is_empty()) {
                let rendered = serde_json::to_string(details).unwrap_or_default();
                message.push_str(&format!(" {rendered}"));
            }
            Error::remote(context, Some(source.status_code.as_u16()), message)
        }
        other => Error::remote(context, None, other.to_string())
    }
}
