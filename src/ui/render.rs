//! ui::render
//!
//! Console rendering of an [`AnalysisReport`].
//!
//! The renderer is a pure consumer: it receives the immutable report and
//! produces the boxed, colorized layout. No styling state leaks into the
//! core, and nothing here feeds back into analysis. Color can be disabled
//! globally via [`colored::control::set_override`], which the CLI layer
//! does for non-TTY and `color = false` configurations.

use colored::Colorize;

use crate::core::types::{AnalysisReport, Relationship};

const BOX_WIDTH: usize = 52;
const MAX_LISTED_FILES: usize = 3;

/// Render the full report.
pub fn render(report: &AnalysisReport, verbose: bool) {
    title("Branch drift analysis");

    render_working_area(report);
    render_flow(report);
    render_branches(report);
    render_code_status(report);
    render_diff_details(report);
    render_advice(report);
    if verbose {
        render_merge_history(report);
    }

    end();
}

/// A single-line verdict for quiet mode / scripting by eye.
pub fn render_quiet(report: &AnalysisReport) {
    println!(
        "{}: {} ({} confidence), significant: {}",
        report.target_branch,
        report.relationship.relationship.label(),
        report.relationship.confidence.label(),
        report.significance.is_significant
    );
}

fn render_working_area(report: &AnalysisReport) {
    subtitle("Working area");
    let area = &report.working_area;
    if area.is_clean {
        success("working tree clean; branch operations are safe");
        return;
    }

    warning(&format!(
        "{} file(s) with pending changes",
        area.changed_entries.len()
    ));
    for entry in area.changed_entries.iter().take(MAX_LISTED_FILES) {
        detail(&format!("{} {}", colorize_kind(entry.kind.label()), entry.path));
    }
    let rest = area.changed_entries.len().saturating_sub(MAX_LISTED_FILES);
    if rest > 0 {
        detail(&format!("... and {rest} more"));
    }
}

fn colorize_kind(label: &str) -> String {
    match label {
        "modified" => label.yellow().to_string(),
        "added" => label.green().to_string(),
        "deleted" => label.red().to_string(),
        "untracked" => label.dimmed().to_string(),
        _ => label.magenta().to_string(),
    }
}

fn render_flow(report: &AnalysisReport) {
    let flow = &report.merge_history.flow;
    if !flow.detected {
        return;
    }

    subtitle("Merge flow");
    if let Some(description) = &flow.description {
        println!("{}", description.magenta());
    }
    for step in &flow.chain {
        detail(&format!(
            "{}. {} -> {} ({})",
            step.step, step.from, step.to, step.hash
        ));
    }
}

fn render_branches(report: &AnalysisReport) {
    subtitle("Branches");
    detail(&format!("current: {}", report.current_branch.green()));
    detail(&format!(
        "tip: {} {} ({})",
        report.current_info.short_hash,
        report.current_info.summary,
        report.current_info.relative_date
    ));
    separator();
    detail(&format!("target:  {}", report.resolved_target.blue()));
    detail(&format!(
        "tip: {} {} ({})",
        report.target_info.short_hash,
        report.target_info.summary,
        report.target_info.relative_date
    ));
}

fn render_code_status(report: &AnalysisReport) {
    subtitle("Code status");
    let significance = &report.significance;

    detail(&format!(
        "relationship: {} ({} confidence)",
        report.relationship.relationship.label(),
        report.relationship.confidence.label()
    ));

    match report.relationship.relationship {
        Relationship::Synchronized => highlight("code identical"),
        Relationship::Ahead => {
            if significance.is_significant {
                alert(&format!(
                    "unpushed code: {} meaningful commit(s) ahead",
                    significance.ahead_meaningful
                ));
            } else {
                highlight("code identical - histories differ only in merge commits");
            }
        }
        Relationship::Behind => {
            if significance.is_significant {
                alert(&format!(
                    "code behind: {} meaningful commit(s) to sync",
                    significance.behind_meaningful
                ));
            } else {
                info("code essentially identical; only history-shaped commits differ");
            }
        }
        Relationship::Diverged => warning("histories diverged; a merge is needed"),
        Relationship::Unknown => warning("could not determine the code status"),
    }
}

fn render_diff_details(report: &AnalysisReport) {
    let significance = &report.significance;
    let relevant = matches!(
        report.relationship.relationship,
        Relationship::Behind | Relationship::Diverged
    );
    if !significance.is_significant || !relevant {
        return;
    }

    subtitle("Real code difference");
    if significance.behind_meaningful > 0 {
        detail(&format!(
            "meaningful commits behind: {}",
            significance.behind_meaningful.to_string().red()
        ));
    }
    if significance.ahead_meaningful > 0 {
        detail(&format!(
            "meaningful commits ahead: {}",
            significance.ahead_meaningful
        ));
    }
    if significance.has_file_level_diff {
        detail(&"file contents differ".yellow().to_string());
    }
    match &significance.common_ancestor {
        Some(ancestor) => detail(&format!("common ancestor: {}", ancestor.short(7))),
        None => detail("common ancestor: none resolvable"),
    }
}

fn render_advice(report: &AnalysisReport) {
    subtitle("Suggested action");
    let significant = report.significance.is_significant;

    match report.relationship.relationship {
        Relationship::Synchronized => {
            success("nothing to do - code is in sync");
        }
        Relationship::Ahead => {
            if significant {
                info("push your new code");
                detail(&format!("git push origin {}", report.current_branch));
            } else {
                success("nothing to do - only merge history differs");
                if !report.target_branch.contains('/') {
                    info("the local target branch is fully merged and can be removed");
                    detail(&format!("git branch -d {}", report.target_branch));
                }
            }
        }
        Relationship::Behind => {
            warning("update your branch");
            detail(&format!("git pull origin {}", report.resolved_target));
        }
        Relationship::Diverged => {
            warning("merge the target branch");
            detail(&format!("git merge {}", report.resolved_target));
        }
        Relationship::Unknown => {
            warning("verify the reference and repository state, then retry");
        }
    }
}

fn render_merge_history(report: &AnalysisReport) {
    let merges = &report.merge_history.merges;
    if merges.is_empty() {
        return;
    }

    subtitle(&format!("Recent merges ({})", merges.len()));
    for record in merges {
        detail(&format!(
            "{} {} ({}) [from: {}]",
            record.short_hash.dimmed(),
            record.subject,
            record.relative_date,
            record.inferred_source_branch
        ));
    }
}

// Box-drawing helpers.

fn title(message: &str) {
    println!("\n{}", format!("╭─ {message} ─╮").cyan().bold());
}

fn subtitle(message: &str) {
    println!("{}", format!("├─ {message}").blue().bold());
}

fn detail(message: &str) {
    println!("{}", format!("  │ {message}").dimmed());
}

fn separator() {
    println!("{}", format!("  ├{}", "─".repeat(BOX_WIDTH - 2)).dimmed());
}

fn end() {
    println!("{}\n", format!("╰{}╯", "─".repeat(BOX_WIDTH)).cyan());
}

fn success(message: &str) {
    println!("{}", format!("✓ {message}").green());
}

fn info(message: &str) {
    println!("{}", format!("• {message}").blue());
}

fn warning(message: &str) {
    println!("{}", format!("! {message}").yellow());
}

fn alert(message: &str) {
    println!("{}", format!(" {message} ").black().on_red());
}

fn highlight(message: &str) {
    println!("{}", format!(" {message} ").black().on_green());
}
