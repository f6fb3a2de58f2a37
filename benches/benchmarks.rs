// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use profile_stats::{
    AggregationResult, ContributorRecord, LanguageHistogram, LanguageShare, Region,
    aggregate::{ContributorTally, language_shares, merge_histograms},
    patch_document, render_sections, replace_region,
};

const LANGUAGES: [&str; 12] = [
    "Rust", "Shell", "Python", "TypeScript", "Go", "C", "Makefile", "Dockerfile", "HTML", "CSS",
    "Lua", "Nix",
];

fn histograms(count: usize,) -> Vec<LanguageHistogram,>
{
    (0..count)
        .map(|repo| {
            LANGUAGES
                .iter()
                .enumerate()
                .map(|(i, name,)| (*name, ((repo + 1) * (i + 3) * 1024) as u64,),)
                .collect()
        },)
        .collect()
}

fn contributor_pages(repos: usize, per_repo: usize,) -> Vec<Vec<ContributorRecord,>,>
{
    (0..repos)
        .map(|repo| {
            (0..per_repo)
                .map(|i| ContributorRecord {
                    login:         format!("user{}", (i + repo) % (per_repo + 7)),
                    html_url:      format!("https://github.com/user{i}"),
                    avatar_url:    String::new(),
                    contributions: ((i * 13 + repo * 7) % 200) as u64,
                },)
                .collect()
        },)
        .collect()
}

fn sample_document(padding: usize,) -> String
{
    let mut doc = String::from("# Hello\n\n",);
    for region in Region::ALL {
        doc.push_str(&"Some prose about the profile owner.\n".repeat(padding,),);
        doc.push_str(&region.start_marker(),);
        doc.push_str("\nstale\n",);
        doc.push_str(&region.end_marker(),);
        doc.push('\n',);
    }
    doc
}

fn sample_result() -> AggregationResult
{
    AggregationResult {
        login:              "octocat".to_owned(),
        repository_count:   42,
        total_stars:        1337,
        total_forks:        99,
        open_issues:        12,
        open_pull_requests: 3,
        languages:          LANGUAGES[..10]
            .iter()
            .map(|name| LanguageShare {
                language: (*name).to_owned(),
                percent:  10.0,
            },)
            .collect(),
        recent:             Vec::new(),
        contributors:       Vec::new(),
    }
}

fn benchmark_language_shares(c: &mut Criterion,)
{
    let parts = histograms(30,);

    c.bench_function("merge_and_rank_languages_30_repos", |b| {
        b.iter(|| {
            let merged = merge_histograms(black_box(&parts,).iter(),);
            black_box(language_shares(&merged, 10,),)
        },)
    },);
}

fn benchmark_contributor_ranking(c: &mut Criterion,)
{
    let pages = contributor_pages(5, 100,);

    c.bench_function("fold_and_rank_contributors", |b| {
        b.iter(|| {
            let mut tally = ContributorTally::new();
            for page in black_box(&pages,) {
                tally.fold(page,);
            }
            black_box(tally.ranked(10,),)
        },)
    },);
}

fn benchmark_replace_region(c: &mut Criterion,)
{
    let doc = sample_document(200,);

    c.bench_function("replace_single_region", |b| {
        b.iter(|| replace_region(black_box(&doc,), Region::Langs, "| a | b |",).expect("patch failed",),)
    },);
}

fn benchmark_patch_document(c: &mut Criterion,)
{
    let doc = sample_document(200,);
    let sections = render_sections(&sample_result(), "_No data found._",);

    c.bench_function("patch_all_regions", |b| {
        b.iter(|| patch_document(black_box(&doc,), &sections,).expect("patch failed",),)
    },);
}

criterion_group!(
    benches,
    benchmark_language_shares,
    benchmark_contributor_ranking,
    benchmark_replace_region,
    benchmark_patch_document
);
criterion_main!(benches);
