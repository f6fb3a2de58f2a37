// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Markdown rendering for aggregated profile statistics.
///
/// Produces one block per document region. Tables are rendered through the
/// [`TableRow`] trait so every row type declares its own columns.
use serde::Serialize;

use crate::{
    model::{AggregationResult, LanguageShare, RankedContributor, RepositoryRecord},
    readme::Region
};

/// Row type that can be rendered as a markdown table.
pub trait TableRow {
    /// Header labels, one per cell.
    const COLUMNS: &'static [&'static str];

    /// Cell values in column order; `None` renders as an empty cell.
    fn cells(&self) -> Vec<Option<String>>;
}

/// Renders rows as a markdown table.
///
/// Returns an empty string for an empty slice so callers can substitute a
/// placeholder.
///
/// # Example
///
/// ```
/// use profile_stats::{LanguageShare, render_table};
///
/// let rows = vec![LanguageShare {
///     language: "Rust".to_owned(),
///     percent:  100.0
/// }];
/// assert_eq!(render_table(&rows), "| Language | Share |\n| --- | --- |\n| Rust | 100.00% |");
/// ```
pub fn render_table<R: TableRow>(rows: &[R]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("| {} |", R::COLUMNS.join(" | ")));
    lines.push(format!("| {} |", vec!["---"; R::COLUMNS.len()].join(" | ")));

    for row in rows {
        let cells: Vec<String> = row
            .cells()
            .into_iter()
            .map(|cell| cell.map(|value| escape_cell(&value)).unwrap_or_default())
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other)
        }
    }
    escaped
}

impl TableRow for LanguageShare {
    const COLUMNS: &'static [&'static str] = &["Language", "Share"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.language.clone()),
            Some(format!("{:.2}%", self.percent)),
        ]
    }
}

impl TableRow for RepositoryRecord {
    const COLUMNS: &'static [&'static str] = &["Repository", "Last push", "Stars"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(format!("[{}]({})", self.name, self.html_url)),
            self.pushed_at
                .map(|pushed| pushed.format("%Y-%m-%d").to_string()),
            Some(self.stars.to_string()),
        ]
    }
}

impl TableRow for RankedContributor {
    const COLUMNS: &'static [&'static str] = &["", "Contributor", "Contributions"];

    fn cells(&self) -> Vec<Option<String>> {
        let avatar = (!self.avatar_url.is_empty()).then(|| {
            format!(
                "<img src=\"{}\" width=\"24\" height=\"24\" alt=\"{}\" />",
                escape_attribute(&self.avatar_url),
                escape_attribute(&self.login)
            )
        });
        let profile = if self.html_url.is_empty() {
            self.login.clone()
        } else {
            format!("[{}]({})", self.login, self.html_url)
        };

        vec![avatar, Some(profile), Some(self.contributions.to_string())]
    }
}

/// Rendered markdown for every document region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSections {
    pub stats:   String,
    pub langs:   String,
    pub recent:  String,
    pub contrib: String
}

impl RenderedSections {
    /// Blocks paired with their regions, in patch order.
    pub fn blocks(&self) -> [(Region, &str); 4] {
        [
            (Region::Stats, self.stats.as_str()),
            (Region::Langs, self.langs.as_str()),
            (Region::Recent, self.recent.as_str()),
            (Region::Contrib, self.contrib.as_str())
        ]
    }
}

/// Renders the summary list.
pub fn render_summary(result: &AggregationResult) -> String {
    [
        format!("- Public repositories: **{}**", result.repository_count),
        format!("- Total stars: **{}**", result.total_stars),
        format!("- Total forks: **{}**", result.total_forks),
        format!("- Open issues: **{}**", result.open_issues),
        format!("- Open pull requests: **{}**", result.open_pull_requests),
    ]
    .join("\n")
}

/// Renders all four blocks, substituting `placeholder` for empty tables.
pub fn render_sections(result: &AggregationResult, placeholder: &str) -> RenderedSections {
    let or_placeholder = |table: String| {
        if table.is_empty() {
            placeholder.to_owned()
        } else {
            table
        }
    };

    RenderedSections {
        stats:   render_summary(result),
        langs:   or_placeholder(render_table(&result.languages)),
        recent:  or_placeholder(render_table(&result.recent)),
        contrib: or_placeholder(render_table(&result.contributors))
    }
}
