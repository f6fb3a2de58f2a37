//! Profile README statistics generator.
//!
//! The library queries the GitHub REST API for the authenticated user's
//! public repositories, aggregates stars, forks, languages, open issues and
//! pull requests and top contributors under a bounded number of concurrent
//! requests, renders the results as markdown, and splices them into marker
//! regions of a profile document.

pub mod aggregate;
mod config;
mod error;
mod executor;
mod github;
mod model;
mod pipeline;
mod readme;
mod render;
mod source;

pub use config::{
    DEFAULT_DOCUMENT, DEFAULT_PLACEHOLDER, Limits, Settings, TOKEN_VARIABLES, load_settings,
    parse_settings, resolve_token,
};
pub use error::{Error, RemoteStatus, io_error};
pub use executor::{BoundedExecutor, CONCURRENCY_LIMIT};
pub use github::GitHubSource;
pub use model::{
    AggregationResult, ContributorRecord, IssueRecord, LanguageHistogram, LanguageShare,
    OwnerRecord, PullRequestMarker, PullRequestRecord, RankedContributor, RepositoryRecord,
};
pub use pipeline::collect_statistics;
pub use readme::{
    DocumentReport, Region, RegionOutcome, RegionReport, patch_document, replace_region,
    update_document,
};
pub use render::{RenderedSections, TableRow, render_sections, render_summary, render_table};
pub use source::{PAGE_SIZE, RemoteSource};
