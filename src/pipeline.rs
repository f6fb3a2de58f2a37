// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Aggregation pipeline driving remote fetches through the bounded executor.
///
/// The pipeline lists the authenticated user's repositories, keeps the owned
/// non-fork ones, and fans per-repository requests out for languages, open
/// issues and pull requests, and contributors. Each fan-out returns partial
/// results that are folded sequentially in submission order, which keeps
/// tie-breaking deterministic regardless of completion order.
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::{
    aggregate::{
        ContributorTally, count_open_issues, filter_owned, language_shares, merge_histograms,
        most_recent, top_starred, totals
    },
    config::Limits,
    error::Error,
    executor::BoundedExecutor,
    model::{AggregationResult, LanguageShare, RankedContributor, RepositoryRecord},
    source::RemoteSource
};

/// Open item counts for one repository request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct OpenCounts {
    issues:        u64,
    pull_requests: u64
}

#[derive(Debug, Clone, Copy)]
enum OpenItems {
    PullRequests,
    Issues
}

/// Fetches everything needed for the profile sections and aggregates it.
///
/// # Errors
///
/// Any [`Error::RemoteFetch`] aborts the run; no partial result is returned.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use indicatif::ProgressBar;
/// use profile_stats::{BoundedExecutor, GitHubSource, Limits, collect_statistics};
///
/// # async fn example() -> Result<(), profile_stats::Error> {
/// let source = Arc::new(GitHubSource::new("ghp_token")?);
/// let result = collect_statistics(
///     source,
///     &BoundedExecutor::default(),
///     &Limits::default(),
///     &ProgressBar::hidden()
/// )
/// .await?;
/// println!("{} stars", result.total_stars);
/// # Ok(())
/// # }
/// ```
pub async fn collect_statistics<S>(
    source: Arc<S>,
    executor: &BoundedExecutor,
    limits: &Limits,
    progress: &ProgressBar
) -> Result<AggregationResult, Error>
where
    S: RemoteSource
{
    progress.set_message("Resolving authenticated user...");
    let login = source.authenticated_login().await?;

    progress.set_message(format!("Listing repositories for {login}..."));
    let listed = source.owned_repositories().await?;
    let owned = filter_owned(&listed, &login);
    info!(
        "Aggregating {} owned repositories out of {} listed",
        owned.len(),
        listed.len()
    );

    let sums = totals(&owned);

    progress.set_message("Fetching language breakdown...");
    let languages = collect_languages(&source, executor, &owned, limits).await?;

    let recent = most_recent(&owned, limits.recent_repositories);

    progress.set_message("Counting open issues and pull requests...");
    let open = collect_open_counts(&source, executor, &owned).await?;

    progress.set_message("Ranking contributors...");
    let contributors = collect_contributors(&source, executor, &owned, limits).await?;

    Ok(AggregationResult {
        login,
        repository_count: owned.len(),
        total_stars: sums.stars,
        total_forks: sums.forks,
        open_issues: open.issues,
        open_pull_requests: open.pull_requests,
        languages,
        recent,
        contributors
    })
}

async fn collect_languages<S>(
    source: &Arc<S>,
    executor: &BoundedExecutor,
    owned: &[RepositoryRecord],
    limits: &Limits
) -> Result<Vec<LanguageShare>, Error>
where
    S: RemoteSource
{
    let sample = most_recent(owned, limits.language_sample);
    debug!("Fetching languages for {} repositories", sample.len());

    let tasks: Vec<_> = sample
        .iter()
        .map(|repository| {
            let source = Arc::clone(source);
            let owner = repository.owner.login.clone();
            let name = repository.name.clone();
            move || async move { source.languages(&owner, &name).await }
        })
        .collect();

    let histograms = executor.run(tasks).await?;
    let merged = merge_histograms(&histograms);
    Ok(language_shares(&merged, limits.top_languages))
}

async fn collect_open_counts<S>(
    source: &Arc<S>,
    executor: &BoundedExecutor,
    owned: &[RepositoryRecord]
) -> Result<OpenCounts, Error>
where
    S: RemoteSource
{
    let tasks: Vec<_> = owned
        .iter()
        .flat_map(|repository| {
            [OpenItems::PullRequests, OpenItems::Issues].map(|kind| (repository, kind))
        })
        .map(|(repository, kind)| {
            let source = Arc::clone(source);
            let owner = repository.owner.login.clone();
            let name = repository.name.clone();
            move || async move {
                match kind {
                    OpenItems::PullRequests => source
                        .open_pull_requests(&owner, &name)
                        .await
                        .map(|pulls| OpenCounts {
                            issues:        0,
                            pull_requests: pulls.len() as u64
                        }),
                    OpenItems::Issues => source
                        .open_issues(&owner, &name)
                        .await
                        .map(|entries| OpenCounts {
                            issues:        count_open_issues(&entries),
                            pull_requests: 0
                        })
                }
            }
        })
        .collect();

    let counts = executor.run(tasks).await?;
    let total = counts.iter().fold(OpenCounts::default(), |acc, item| OpenCounts {
        issues:        acc.issues.saturating_add(item.issues),
        pull_requests: acc.pull_requests.saturating_add(item.pull_requests)
    });
    info!(
        "Counted {} open issues and {} open pull requests",
        total.issues, total.pull_requests
    );
    Ok(total)
}

async fn collect_contributors<S>(
    source: &Arc<S>,
    executor: &BoundedExecutor,
    owned: &[RepositoryRecord],
    limits: &Limits
) -> Result<Vec<RankedContributor>, Error>
where
    S: RemoteSource
{
    let starred = top_starred(owned, limits.contributor_repositories);
    debug!("Fetching contributors for {} repositories", starred.len());

    let tasks: Vec<_> = starred
        .iter()
        .map(|repository| {
            let source = Arc::clone(source);
            let owner = repository.owner.login.clone();
            let name = repository.name.clone();
            move || async move { source.contributors(&owner, &name).await }
        })
        .collect();

    let lists = executor.run(tasks).await?;
    let mut tally = ContributorTally::new();
    for list in &lists {
        tally.fold(list);
    }
    info!("Merged {} distinct contributors", tally.len());
    Ok(tally.ranked(limits.top_contributors))
}
