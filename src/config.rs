//! Run settings: the optional YAML settings document and credential lookup.
//!
//! Settings are optional as a whole and per key; anything missing falls back
//! to the defaults below. Values are validated once after decoding so the
//! pipeline can rely on every limit being at least one.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Environment variables consulted for the access token, in priority order.
pub const TOKEN_VARIABLES: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN",];
/// Document patched when neither the CLI nor the settings name one.
pub const DEFAULT_DOCUMENT: &str = "README.md";
/// Text inserted into a region whose table has no rows.
pub const DEFAULT_PLACEHOLDER: &str = "_No data found._";

const DEFAULT_LANGUAGE_SAMPLE: usize = 30;
const DEFAULT_TOP_LANGUAGES: usize = 10;
const DEFAULT_RECENT_REPOSITORIES: usize = 5;
const DEFAULT_CONTRIBUTOR_REPOSITORIES: usize = 5;
const DEFAULT_TOP_CONTRIBUTORS: usize = 10;

/// Size limits applied by the aggregation pipeline.
///
/// # Examples
///
/// ```
/// use profile_stats::Limits;
///
/// let limits = Limits::default();
/// assert_eq!(limits.language_sample, 30);
/// assert_eq!(limits.top_contributors, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct Limits
{
    /// Most recently pushed repositories whose languages are fetched.
    pub language_sample:          usize,
    /// Languages kept in the language table.
    pub top_languages:            usize,
    /// Rows of the recent activity table.
    pub recent_repositories:      usize,
    /// Most-starred repositories whose contributors are ranked.
    pub contributor_repositories: usize,
    /// Rows of the contributor table.
    pub top_contributors:         usize,
}

impl Default for Limits
{
    fn default() -> Self
    {
        Self {
            language_sample:          DEFAULT_LANGUAGE_SAMPLE,
            top_languages:            DEFAULT_TOP_LANGUAGES,
            recent_repositories:      DEFAULT_RECENT_REPOSITORIES,
            contributor_repositories: DEFAULT_CONTRIBUTOR_REPOSITORIES,
            top_contributors:         DEFAULT_TOP_CONTRIBUTORS,
        }
    }
}

impl Limits
{
    fn validate(&self,) -> Result<(), Error,>
    {
        let checks = [
            ("language_sample", self.language_sample,),
            ("top_languages", self.top_languages,),
            ("recent_repositories", self.recent_repositories,),
            ("contributor_repositories", self.contributor_repositories,),
            ("top_contributors", self.top_contributors,),
        ];

        for (name, value,) in checks {
            if value == 0 {
                return Err(Error::validation(format!("limits.{name} must be at least 1"),),);
            }
        }

        Ok((),)
    }
}

/// Settings document accepted through `--config`.
///
/// # Examples
///
/// ```
/// use profile_stats::parse_settings;
///
/// let settings = parse_settings("document: docs/PROFILE.md\nlimits:\n  top_languages: 6\n",)?;
/// assert_eq!(settings.limits.top_languages, 6);
/// assert_eq!(settings.limits.recent_repositories, 5);
/// # Ok::<(), profile_stats::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct Settings
{
    /// Profile document to patch.
    pub document:    PathBuf,
    /// Aggregation limits.
    pub limits:      Limits,
    /// Replacement for empty tables.
    pub placeholder: String,
}

impl Default for Settings
{
    fn default() -> Self
    {
        Self {
            document:    PathBuf::from(DEFAULT_DOCUMENT,),
            limits:      Limits::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
        }
    }
}

/// Loads settings from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`] for
/// malformed YAML and [`Error::Validation`] for out-of-range values.
pub fn load_settings(path: &Path,) -> Result<Settings, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_settings(&contents,)
}

/// Parses settings from a YAML string. An empty document yields defaults.
///
/// # Errors
///
/// Propagates [`Error::Parse`] and [`Error::Validation`].
pub fn parse_settings(contents: &str,) -> Result<Settings, Error,>
{
    let settings: Settings = if contents.trim().is_empty() {
        Settings::default()
    } else {
        serde_yaml::from_str(contents,)?
    };

    settings.limits.validate()?;
    if settings.placeholder.trim().is_empty() {
        return Err(Error::validation("placeholder must not be empty",),);
    }
    if settings.document.as_os_str().is_empty() {
        return Err(Error::validation("document path must not be empty",),);
    }

    Ok(settings,)
}

/// Resolves the access token.
///
/// An explicit value wins; otherwise the first non-empty variable from
/// [`TOKEN_VARIABLES`] is used. `lookup` abstracts the environment so callers
/// can pass `|name| std::env::var(name).ok()`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when no token is available.
///
/// # Examples
///
/// ```
/// use profile_stats::resolve_token;
///
/// let token = resolve_token(None, |name| (name == "GITHUB_TOKEN").then(|| "abc".to_owned()),)?;
/// assert_eq!(token, "abc");
/// # Ok::<(), profile_stats::Error>(())
/// ```
pub fn resolve_token<F,>(explicit: Option<&str,>, lookup: F,) -> Result<String, Error,>
where
    F: Fn(&str,) -> Option<String,>,
{
    if let Some(token,) = explicit.map(str::trim,).filter(|value| !value.is_empty(),) {
        return Ok(token.to_owned(),);
    }

    TOKEN_VARIABLES
        .iter()
        .filter_map(|name| lookup(*name,),)
        .map(|value| value.trim().to_owned(),)
        .find(|value| !value.is_empty(),)
        .ok_or_else(|| {
            Error::configuration(format!(
                "missing access token: set {} or pass --token",
                TOKEN_VARIABLES.join(" or ")
            ),)
        },)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn empty_document_yields_defaults()
    {
        let settings = parse_settings("  \n",).expect("defaults",);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.document, PathBuf::from("README.md"));
        assert_eq!(settings.placeholder, "_No data found._");
    }

    #[test]
    fn partial_limits_fall_back_to_defaults()
    {
        let yaml = r"
limits:
  recent_repositories: 3
placeholder: nothing here
";
        let settings = parse_settings(yaml,).expect("valid settings",);
        assert_eq!(settings.limits.recent_repositories, 3);
        assert_eq!(settings.limits.language_sample, 30);
        assert_eq!(settings.placeholder, "nothing here");
    }

    #[test]
    fn zero_limit_is_rejected()
    {
        let error = parse_settings("limits:\n  top_contributors: 0\n",).expect_err("zero limit",);
        match error {
            Error::Validation {
                message,
            } => assert_eq!(message, "limits.top_contributors must be at least 1"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected()
    {
        let error = parse_settings("concurrency: 12\n",).expect_err("unknown key",);
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn load_settings_reads_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("settings.yaml",);
        fs::write(&path, "document: PROFILE.md\n",).expect("failed to write settings",);

        let settings = load_settings(&path,).expect("valid settings",);
        assert_eq!(settings.document, PathBuf::from("PROFILE.md"));
    }

    #[test]
    fn load_settings_reports_missing_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let error = load_settings(&temp.path().join("absent.yaml",),).expect_err("missing file",);
        assert!(matches!(error, Error::Io { .. }));
    }

    #[test]
    fn explicit_token_wins()
    {
        let token = resolve_token(Some("cli",), |_| Some("env".to_owned(),),).expect("token",);
        assert_eq!(token, "cli");
    }

    #[test]
    fn first_present_variable_wins()
    {
        let token = resolve_token(None, |name| match name {
            "GH_TOKEN" => Some("primary".to_owned(),),
            "GITHUB_TOKEN" => Some("secondary".to_owned(),),
            _ => None,
        },)
        .expect("token",);
        assert_eq!(token, "primary");
    }

    #[test]
    fn blank_variable_is_skipped()
    {
        let token = resolve_token(None, |name| match name {
            "GH_TOKEN" => Some("   ".to_owned(),),
            "GITHUB_TOKEN" => Some("secondary".to_owned(),),
            _ => None,
        },)
        .expect("token",);
        assert_eq!(token, "secondary");
    }

    #[test]
    fn missing_token_is_configuration_error()
    {
        let error = resolve_token(None, |_| None,).expect_err("no token",);
        match error {
            Error::Configuration {
                message,
            } => assert!(message.contains("GH_TOKEN or GITHUB_TOKEN")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
