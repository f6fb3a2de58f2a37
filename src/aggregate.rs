// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Pure aggregation steps over records that were already fetched.
//!
//! The functions here never touch the network. Fan-out tasks return partial
//! results (one histogram or contributor list per repository) and the
//! pipeline folds them sequentially through these helpers once every task has
//! settled, so no shared state is mutated concurrently.

use std::collections::{HashMap, HashSet};

use crate::model::{
    ContributorRecord, IssueRecord, LanguageHistogram, LanguageShare, RankedContributor,
    RepositoryRecord,
};

/// Keeps repositories owned by `login` that are not forks.
///
/// Duplicate ids are dropped, keeping the first occurrence, so the output
/// preserves the listing order of the input.
pub fn filter_owned(repositories: &[RepositoryRecord], login: &str,) -> Vec<RepositoryRecord,>
{
    let mut seen = HashSet::with_capacity(repositories.len(),);
    repositories
        .iter()
        .filter(|repository| !repository.fork && repository.is_owned_by(login,),)
        .filter(|repository| seen.insert(repository.id,),)
        .cloned()
        .collect()
}

/// Sums of stars and forks over a set of repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct Totals
{
    pub stars: u64,
    pub forks: u64,
}

pub fn totals(repositories: &[RepositoryRecord],) -> Totals
{
    repositories.iter().fold(Totals::default(), |acc, repository| Totals {
        stars: acc.stars.saturating_add(repository.stars,),
        forks: acc.forks.saturating_add(repository.forks,),
    },)
}

/// Returns up to `limit` repositories ordered by last push, newest first.
///
/// The remote listing is usually already sorted this way, but the order is
/// enforced here with a stable sort. Repositories without a push come last.
pub fn most_recent(repositories: &[RepositoryRecord], limit: usize,) -> Vec<RepositoryRecord,>
{
    let mut ordered: Vec<&RepositoryRecord,> = repositories.iter().collect();
    ordered.sort_by(|left, right| right.pushed_at.cmp(&left.pushed_at,),);
    ordered.into_iter().take(limit,).cloned().collect()
}

/// Returns up to `limit` repositories with the most stars; ties keep the
/// listing order.
pub fn top_starred(repositories: &[RepositoryRecord], limit: usize,) -> Vec<RepositoryRecord,>
{
    let mut ordered: Vec<&RepositoryRecord,> = repositories.iter().collect();
    ordered.sort_by(|left, right| right.stars.cmp(&left.stars,),);
    ordered.into_iter().take(limit,).cloned().collect()
}

/// Folds partial histograms in the given order.
pub fn merge_histograms<'a, I,>(parts: I,) -> LanguageHistogram
where
    I: IntoIterator<Item = &'a LanguageHistogram,>,
{
    parts.into_iter().fold(LanguageHistogram::new(), |mut merged, part| {
        merged.merge(part,);
        merged
    },)
}

/// Converts a histogram into percentages of its total and keeps the `limit`
/// largest shares.
///
/// A zero total is treated as one so empty histograms yield zero percentages
/// instead of NaN. Equal percentages keep first-occurrence order.
pub fn language_shares(histogram: &LanguageHistogram, limit: usize,) -> Vec<LanguageShare,>
{
    let total = histogram.total().max(1,) as f64;
    let mut shares: Vec<LanguageShare,> = histogram
        .iter()
        .map(|(language, bytes,)| LanguageShare {
            language: language.to_owned(),
            percent:  bytes as f64 / total * 100.0,
        },)
        .collect();

    shares.sort_by(|left, right| right.percent.total_cmp(&left.percent,),);
    shares.truncate(limit,);
    shares
}

/// Counts issues that are not pull requests.
pub fn count_open_issues(entries: &[IssueRecord],) -> u64
{
    entries.iter().filter(|entry| !entry.is_pull_request(),).count() as u64
}

/// Case-insensitive contributor accumulator.
///
/// Contributions add up across repositories. The first record seen for a
/// login fixes its display login, profile URL and avatar.
#[derive(Debug, Clone, Default,)]
pub struct ContributorTally
{
    ranked: Vec<RankedContributor,>,
    index:  HashMap<String, usize,>,
}

impl ContributorTally
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Folds one repository's contributor list into the tally.
    pub fn fold(&mut self, contributors: &[ContributorRecord],)
    {
        for contributor in contributors {
            let key = contributor.login.to_lowercase();
            match self.index.get(&key,) {
                Some(&position,) => {
                    let entry = &mut self.ranked[position];
                    entry.contributions = entry.contributions.saturating_add(contributor.contributions,);
                }
                None => {
                    self.index.insert(key, self.ranked.len(),);
                    self.ranked.push(RankedContributor {
                        login:         contributor.login.clone(),
                        html_url:      contributor.html_url.clone(),
                        avatar_url:    contributor.avatar_url.clone(),
                        contributions: contributor.contributions,
                    },);
                }
            }
        }
    }

    /// Cumulative contributions for `login`, matched case-insensitively.
    pub fn contributions(&self, login: &str,) -> Option<u64,>
    {
        self.index.get(&login.to_lowercase(),).map(|&position| self.ranked[position].contributions,)
    }

    pub fn len(&self,) -> usize
    {
        self.ranked.len()
    }

    pub fn is_empty(&self,) -> bool
    {
        self.ranked.is_empty()
    }

    /// Returns the `limit` largest contributors; ties keep first-seen order.
    pub fn ranked(&self, limit: usize,) -> Vec<RankedContributor,>
    {
        let mut ordered = self.ranked.clone();
        ordered.sort_by(|left, right| right.contributions.cmp(&left.contributions,),);
        ordered.truncate(limit,);
        ordered
    }
}
