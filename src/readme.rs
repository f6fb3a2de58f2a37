// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Updates the profile document between generated-content markers.
///
/// Each region is delimited by HTML comments:
/// - `<!-- STATS:START -->` / `<!-- STATS:END -->`
/// - `<!-- LANGS:START -->` / `<!-- LANGS:END -->`
/// - `<!-- RECENT:START -->` / `<!-- RECENT:END -->`
/// - `<!-- CONTRIB:START -->` / `<!-- CONTRIB:END -->`
///
/// Everything outside the markers is left untouched. A region whose markers
/// are missing or out of order is skipped rather than reported as an error.
use std::{fmt, fs, path::Path, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::{Error, io_error},
    render::RenderedSections
};

/// Named marker region owned by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    Stats,
    Langs,
    Recent,
    Contrib
}

impl Region {
    /// All regions in patch order.
    pub const ALL: [Region; 4] = [Region::Stats, Region::Langs, Region::Recent, Region::Contrib];

    /// Marker name used inside the HTML comments.
    pub fn name(self) -> &'static str {
        match self {
            Region::Stats => "STATS",
            Region::Langs => "LANGS",
            Region::Recent => "RECENT",
            Region::Contrib => "CONTRIB"
        }
    }

    pub fn start_marker(self) -> String {
        format!("<!-- {}:START -->", self.name())
    }

    pub fn end_marker(self) -> String {
        format!("<!-- {}:END -->", self.name())
    }

    fn compile(self, edge: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r"<!--\s*{}:{}\s*-->", regex::escape(self.name()), edge))
    }

    /// Compiled marker patterns, shared by every call.
    fn patterns(self) -> Result<&'static MarkerPatterns, Error> {
        let table = MARKER_PATTERNS
            .as_ref()
            .map_err(|e| Error::internal(format!("invalid marker pattern: {e}")))?;
        table
            .get(self as usize)
            .ok_or_else(|| Error::internal(format!("no marker pattern for {self}")))
    }
}

#[derive(Debug)]
struct MarkerPatterns {
    start: Regex,
    end:   Regex
}

/// Indexed by `Region as usize`, which matches `Region::ALL`.
static MARKER_PATTERNS: LazyLock<Result<Vec<MarkerPatterns>, regex::Error>> =
    LazyLock::new(|| {
        Region::ALL
            .iter()
            .map(|region| {
                Ok(MarkerPatterns {
                    start: region.compile("START")?,
                    end:   region.compile("END")?
                })
            })
            .collect()
    });

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to a single region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionOutcome {
    /// Content between the markers was replaced.
    Replaced,
    /// The start or end marker is absent.
    Missing,
    /// The end marker occurs before the start marker.
    Inverted
}

impl fmt::Display for RegionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RegionOutcome::Replaced => "replaced",
            RegionOutcome::Missing => "skipped (markers not found)",
            RegionOutcome::Inverted => "skipped (end marker before start marker)"
        };
        f.write_str(label)
    }
}

/// Replaces the text strictly between a region's markers.
///
/// The first start marker and the first end marker are used. When either is
/// missing, or the end marker precedes the start marker, the input is returned
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::Internal`] only if the shared marker patterns failed to
/// compile.
///
/// # Example
///
/// ```
/// use profile_stats::{Region, RegionOutcome, replace_region};
///
/// let document = "# Hi\n<!-- STATS:START -->\nold\n<!-- STATS:END -->\n";
/// let (patched, outcome) = replace_region(document, Region::Stats, "new")?;
/// assert_eq!(patched, "# Hi\n<!-- STATS:START -->\nnew\n<!-- STATS:END -->\n");
/// assert_eq!(outcome, RegionOutcome::Replaced);
/// # Ok::<(), profile_stats::Error>(())
/// ```
pub fn replace_region(
    content: &str,
    region: Region,
    block: &str
) -> Result<(String, RegionOutcome), Error> {
    let patterns = region.patterns()?;
    let start = patterns.start.find(content);
    let end = patterns.end.find(content);

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            debug!("Markers for {} not found", region);
            return Ok((content.to_owned(), RegionOutcome::Missing));
        }
    };

    if end.start() < start.end() {
        warn!("End marker for {} precedes its start marker", region);
        return Ok((content.to_owned(), RegionOutcome::Inverted));
    }

    let mut result = String::with_capacity(content.len() + block.len() + 2);
    result.push_str(&content[..start.end()]);
    result.push('\n');
    result.push_str(block);
    result.push('\n');
    result.push_str(&content[end.start()..]);

    Ok((result, RegionOutcome::Replaced))
}

/// Outcome of patching one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub region:  Region,
    pub outcome: RegionOutcome
}

/// Applies every block in order and reports per-region outcomes.
///
/// # Errors
///
/// Propagates [`replace_region`] errors.
pub fn patch_document(
    content: &str,
    sections: &RenderedSections
) -> Result<(String, Vec<RegionReport>), Error> {
    let mut updated = content.to_owned();
    let mut reports = Vec::with_capacity(Region::ALL.len());

    for (region, block) in sections.blocks() {
        let (patched, outcome) = replace_region(&updated, region, block)?;
        updated = patched;
        reports.push(RegionReport {
            region,
            outcome
        });
    }

    Ok((updated, reports))
}

/// Result of updating the document on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub regions: Vec<RegionReport>,
    /// Patched content differs from the file.
    pub changed: bool,
    /// The file was rewritten.
    pub written: bool
}

impl fmt::Display for DocumentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.regions {
            writeln!(f, "{}: {}", report.region, report.outcome)?;
        }
        match (self.changed, self.written) {
            (true, true) => write!(f, "document updated"),
            (true, false) => write!(f, "document would be updated (dry run)"),
            (false, _) => write!(f, "document unchanged")
        }
    }
}

/// Patches the document at `path`, writing it only when the content changed.
///
/// With `dry_run` the file is never written; the report still says whether it
/// would have changed.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read or written.
pub fn update_document(
    path: &Path,
    sections: &RenderedSections,
    dry_run: bool
) -> Result<DocumentReport, Error> {
    info!("Reading document from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| io_error(path, source))?;

    let (updated, regions) = patch_document(&content, sections)?;
    for report in &regions {
        info!("{}: {}", report.region, report.outcome);
    }

    let changed = updated != content;
    let written = changed && !dry_run;

    if written {
        info!("Writing updated document to {}", path.display());
        fs::write(path, updated).map_err(|source| io_error(path, source))?;
    } else if changed {
        info!("Dry run: {} would change", path.display());
    } else {
        info!("No changes to {}", path.display());
    }

    Ok(DocumentReport {
        regions,
        changed,
        written
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tempfile::tempdir;

    use super::*;

    fn sections(stats: &str) -> RenderedSections {
        RenderedSections {
            stats:   stats.to_owned(),
            langs:   "langs".to_owned(),
            recent:  "recent".to_owned(),
            contrib: "contrib".to_owned()
        }
    }

    fn full_document() -> String {
        let mut document = String::from("# Profile\n\n");
        for region in Region::ALL {
            document.push_str(&format!(
                "{}\nOld {} content\n{}\n\n",
                region.start_marker(),
                region,
                region.end_marker()
            ));
        }
        document.push_str("Footer\n");
        document
    }

    #[test]
    fn replace_region_preserves_surrounding_text() {
        let document = "intro\n<!-- LANGS:START -->stale<!-- LANGS:END -->\noutro";
        let (patched, outcome) =
            replace_region(document, Region::Langs, "| a |").expect("patch succeeds");

        assert_eq!(outcome, RegionOutcome::Replaced);
        assert_eq!(
            patched,
            "intro\n<!-- LANGS:START -->\n| a |\n<!-- LANGS:END -->\noutro"
        );
    }

    #[test]
    fn replace_region_tolerates_marker_whitespace() {
        let document = "<!--RECENT:START-->x<!--   RECENT:END   -->";
        let (patched, outcome) =
            replace_region(document, Region::Recent, "y").expect("patch succeeds");
        assert_eq!(outcome, RegionOutcome::Replaced);
        assert_eq!(patched, "<!--RECENT:START-->\ny\n<!--   RECENT:END   -->");
    }

    #[test]
    fn missing_markers_leave_document_unchanged() {
        let document = "# Title\n<!-- STATS:START -->\nno end marker\n";
        let (patched, outcome) =
            replace_region(document, Region::Stats, "new").expect("patch succeeds");
        assert_eq!(outcome, RegionOutcome::Missing);
        assert_eq!(patched, document);
    }

    #[test]
    fn inverted_markers_leave_document_unchanged() {
        let document = "<!-- STATS:END -->\nbody\n<!-- STATS:START -->\n";
        let (patched, outcome) =
            replace_region(document, Region::Stats, "new").expect("patch succeeds");
        assert_eq!(outcome, RegionOutcome::Inverted);
        assert_eq!(patched, document);
    }

    #[test]
    fn marker_patterns_are_built_once_per_region() {
        for region in Region::ALL {
            let first = region.patterns().expect("patterns compile");
            let second = region.patterns().expect("patterns compile");
            assert!(std::ptr::eq(first, second));
            assert!(first.start.is_match(&region.start_marker()));
            assert!(first.end.is_match(&region.end_marker()));
            assert!(!first.start.is_match(&region.end_marker()));
        }

        let stats = Region::Stats.patterns().expect("patterns compile");
        assert!(!stats.start.is_match("<!-- LANGS:START -->"));
    }

    #[test]
    fn patch_document_reports_every_region() {
        let document = "<!-- STATS:START --><!-- STATS:END -->\n<!-- CONTRIB:END --><!-- CONTRIB:START -->";
        let (patched, reports) = patch_document(document, &sections("s")).expect("patch");

        let outcomes: Vec<RegionOutcome> = reports.iter().map(|report| report.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                RegionOutcome::Replaced,
                RegionOutcome::Missing,
                RegionOutcome::Missing,
                RegionOutcome::Inverted
            ]
        );
        assert!(patched.starts_with("<!-- STATS:START -->\ns\n<!-- STATS:END -->"));
    }

    #[test]
    fn update_document_writes_only_on_change() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        fs::write(&path, full_document()).expect("failed to write README");

        let first = update_document(&path, &sections("stats"), false).expect("first update");
        assert!(first.changed);
        assert!(first.written);
        let after_first = fs::read_to_string(&path).expect("failed to read README");
        assert!(after_first.contains("\nstats\n"));
        assert!(!after_first.contains("Old STATS content"));
        assert!(after_first.ends_with("Footer\n"));

        let second = update_document(&path, &sections("stats"), false).expect("second update");
        assert!(!second.changed);
        assert!(!second.written);
        assert_eq!(
            fs::read_to_string(&path).expect("failed to read README"),
            after_first
        );
    }

    #[test]
    fn update_document_dry_run_never_writes() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        let original = full_document();
        fs::write(&path, &original).expect("failed to write README");

        let report = update_document(&path, &sections("stats"), true).expect("dry run");
        assert!(report.changed);
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).expect("read"), original);
        assert!(report.to_string().ends_with("document would be updated (dry run)"));
    }

    #[test]
    fn update_document_reports_missing_file() {
        let temp = tempdir().expect("failed to create tempdir");
        let error = update_document(&temp.path().join("absent.md"), &sections("s"), false)
            .expect_err("missing file");
        assert!(matches!(error, Error::Io { .. }));
    }

    proptest! {
        #[test]
        fn patching_twice_is_idempotent(block in "[a-zA-Z0-9 |\n-]{0,64}", filler in "[a-z \n]{0,32}") {
            let document = format!(
                "{filler}<!-- STATS:START -->{filler}<!-- STATS:END -->{filler}"
            );
            let (once, _) = replace_region(&document, Region::Stats, &block).expect("first");
            let (twice, _) = replace_region(&once, Region::Stats, &block).expect("second");
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn documents_without_markers_are_untouched(document in "[a-zA-Z0-9 #\n]{0,128}") {
            let (patched, outcome) = replace_region(&document, Region::Contrib, "x").expect("patch");
            prop_assert_eq!(outcome, RegionOutcome::Missing);
            prop_assert_eq!(patched, document);
        }
    }
}
