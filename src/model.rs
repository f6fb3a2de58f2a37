// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed records for the hosting API payloads and the aggregation snapshot.
//!
//! Each remote entity is decoded into a dedicated struct with named fields so
//! the pipeline never inspects open-ended JSON. Records are immutable
//! snapshots constructed for a single run.

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{MapAccess, Visitor}
};

/// Account that owns a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OwnerRecord {
    pub login: String
}

/// Repository snapshot returned by `GET /user/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryRecord {
    pub id:        u64,
    pub name:      String,
    pub full_name: String,
    pub html_url:  String,
    pub owner:     OwnerRecord,
    #[serde(default)]
    pub fork:      bool,
    #[serde(default, rename = "stargazers_count")]
    pub stars:     u64,
    #[serde(default, rename = "forks_count")]
    pub forks:     u64,
    /// `None` for repositories that never received a push.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>
}

impl RepositoryRecord {
    /// Returns `true` when `login` owns the repository (case-insensitive).
    pub fn is_owned_by(&self, login: &str) -> bool {
        self.owner.login.eq_ignore_ascii_case(login)
    }
}

/// Open pull request entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PullRequestRecord {
    pub number: u64,
    #[serde(default)]
    pub title:  String
}

/// Marker object GitHub attaches to issues that are pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PullRequestMarker {
    #[serde(default)]
    pub url: Option<String>
}

/// Entry returned by the issues endpoint, which also lists pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IssueRecord {
    pub number:       u64,
    #[serde(default)]
    pub title:        String,
    #[serde(default)]
    pub pull_request: Option<PullRequestMarker>
}

impl IssueRecord {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Contributor entry for a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContributorRecord {
    pub login:         String,
    #[serde(default)]
    pub html_url:      String,
    #[serde(default)]
    pub avatar_url:    String,
    #[serde(default)]
    pub contributions: u64
}

/// Language name to byte count mapping that remembers insertion order.
///
/// The order of first occurrence is the tie-breaker when percentages are
/// ranked, so both decoding and merging keep it stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageHistogram {
    entries: Vec<(String, u64)>,
    index:   HashMap<String, usize>
}

impl LanguageHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bytes` to `language`, appending it when first seen.
    pub fn add(&mut self, language: &str, bytes: u64) {
        match self.index.get(language) {
            Some(&position) => {
                let slot = &mut self.entries[position].1;
                *slot = slot.saturating_add(bytes);
            }
            None => {
                self.index.insert(language.to_owned(), self.entries.len());
                self.entries.push((language.to_owned(), bytes));
            }
        }
    }

    /// Adds every entry of `other` in its own order.
    pub fn merge(&mut self, other: &LanguageHistogram) {
        for (language, bytes) in &other.entries {
            self.add(language, *bytes);
        }
    }

    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, (_, bytes)| sum.saturating_add(*bytes))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.index.get(language).map(|&position| self.entries[position].1)
    }

    /// Iterates entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(language, bytes)| (language.as_str(), *bytes))
    }
}

impl<'a> FromIterator<(&'a str, u64)> for LanguageHistogram {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for (language, bytes) in iter {
            histogram.add(language, bytes);
        }
        histogram
    }
}

impl<'de> Deserialize<'de> for LanguageHistogram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        struct HistogramVisitor;

        impl<'de> Visitor<'de> for HistogramVisitor {
            type Value = LanguageHistogram;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of language names to byte counts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>
            {
                let mut histogram = LanguageHistogram::new();
                while let Some((language, bytes)) = map.next_entry::<String, u64>()? {
                    histogram.add(&language, bytes);
                }
                Ok(histogram)
            }
        }

        deserializer.deserialize_map(HistogramVisitor)
    }
}

/// Share of a language in the merged histogram, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub percent:  f64
}

/// Contributor merged across repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedContributor {
    /// Login as first seen; merging is case-insensitive.
    pub login:         String,
    pub html_url:      String,
    pub avatar_url:    String,
    pub contributions: u64
}

/// Final snapshot consumed by the markdown renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub login:              String,
    pub repository_count:   usize,
    pub total_stars:        u64,
    pub total_forks:        u64,
    /// Open issues with pull requests excluded.
    pub open_issues:        u64,
    pub open_pull_requests: u64,
    pub languages:          Vec<LanguageShare>,
    pub recent:             Vec<RepositoryRecord>,
    /// Ranked over the most-starred repositories only.
    pub contributors:       Vec<RankedContributor>
}
