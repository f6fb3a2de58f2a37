// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Remote data source contract consumed by the aggregation pipeline.
///
/// List operations return every page concatenated. Implementations report
/// failures as [`Error::RemoteFetch`](crate::Error::RemoteFetch) and never
/// retry.
use std::future::Future;

use crate::{
    error::Error,
    model::{ContributorRecord, IssueRecord, LanguageHistogram, PullRequestRecord, RepositoryRecord}
};

/// Page size requested from every paginated endpoint.
pub const PAGE_SIZE: usize = 100;

/// Hosting API operations needed to build profile statistics.
///
/// The pipeline fans calls out on spawned tasks, so implementations are shared
/// behind an `Arc` and their futures must be `Send`.
pub trait RemoteSource: Send + Sync + 'static {
    /// Login of the identity the credentials belong to.
    fn authenticated_login(&self) -> impl Future<Output = Result<String, Error>> + Send;

    /// Public repositories the authenticated identity is affiliated with as
    /// owner, most recently pushed first.
    fn owned_repositories(&self)
    -> impl Future<Output = Result<Vec<RepositoryRecord>, Error>> + Send;

    fn languages(
        &self,
        owner: &str,
        repo: &str
    ) -> impl Future<Output = Result<LanguageHistogram, Error>> + Send;

    fn open_pull_requests(
        &self,
        owner: &str,
        repo: &str
    ) -> impl Future<Output = Result<Vec<PullRequestRecord>, Error>> + Send;

    /// Open issues; the result includes pull requests, which callers filter.
    fn open_issues(
        &self,
        owner: &str,
        repo: &str
    ) -> impl Future<Output = Result<Vec<IssueRecord>, Error>> + Send;

    /// Non-anonymous contributors.
    fn contributors(
        &self,
        owner: &str,
        repo: &str
    ) -> impl Future<Output = Result<Vec<ContributorRecord>, Error>> + Send;
}
