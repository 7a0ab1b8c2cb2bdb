//! Human-readable crawl summary

use crate::state::Status;
use crate::storage::ScrapeStats;
use std::fmt::Write;

/// Formats crawl results as a plain-text report
pub fn format_summary(stats: &ScrapeStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Summary ===\n");
    let _ = writeln!(out, "Total URLs recorded: {}\n", stats.total_count);

    let _ = writeln!(out, "URLs by Status:");
    // Sort states by count (descending), bucket order breaks ties
    let mut status_counts: Vec<_> = stats
        .counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .collect();
    status_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (status, count) in status_counts {
        let _ = writeln!(
            out,
            "  {}: {} ({:.1}%)",
            status,
            count,
            percentage(*count, stats.total_count)
        );
    }
    let _ = writeln!(out);

    let failed = stats.urls(Status::Failed);
    if !failed.is_empty() {
        let _ = writeln!(out, "Failed URLs ({}):", failed.len());
        for url in failed {
            let _ = writeln!(out, "  - {}", url);
        }
        let _ = writeln!(out);
    }

    let success = stats.count(Status::Success);
    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} URLs fetched successfully)",
        percentage(success, stats.total_count),
        success,
        stats.total_count
    );

    out
}

/// Prints the summary to stdout
pub fn print_summary(stats: &ScrapeStats) {
    print!("{}", format_summary(stats));
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
