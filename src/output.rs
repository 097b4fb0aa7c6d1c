//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Diagnostics go through `tracing` to
//! stderr; this module is only for what the user asked to see.
//!
//! # Output Format
//!
//! ## Collection (`check`, and `publish --verbose`)
//!
//! ```text
//! Documentation
//! 001 index.md
//!     Source: index.md
//! 002 variadic-type-lists.md
//!     Source: posts/variadic-type-lists.md
//!
//! Examples
//! 001 type_list_slice.cpp
//!     Source: examples/type_list_slice.cpp
//!
//! Collected 2 documents, 1 example
//! ```
//!
//! ## Publish (`--verbose`)
//!
//! ```text
//! generate: started
//! generate: ok
//! deploy: skipped (branch `dev` does not publish (trigger is `main`))
//!
//! Artifacts: /repo/html
//!     Digest: 3f2a9c0d81be
//! Generated only
//! ```
//!
//! ## Classify
//!
//! ```text
//! tl::type_list → types
//! TL_ASSERT → macros
//! main → (none)
//! ```

use crate::collect::{DocumentKind, SourceDocument};
use crate::config::CodeBlocks;
use crate::digest;
use crate::publish::{PipelineRun, RunOutcome, StageEvent, StageOutcome};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Format the collected documents, grouped by kind in collection order.
///
/// Display paths lead; the root-relative source path follows as context.
pub fn format_collection(docs: &[SourceDocument], root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (kind, heading) in [
        (DocumentKind::Documentation, "Documentation"),
        (DocumentKind::Example, "Examples"),
    ] {
        let group: Vec<&SourceDocument> = docs.iter().filter(|d| d.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading.to_string());
        for (i, doc) in group.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), doc.display_path));
            let source = doc.path.strip_prefix(root).unwrap_or(&doc.path);
            lines.push(format!(
                "    Source: {}",
                source.to_string_lossy().replace('\\', "/")
            ));
        }
    }

    let examples = docs
        .iter()
        .filter(|d| d.kind == DocumentKind::Example)
        .count();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Collected {}, {}",
        plural(docs.len() - examples, "document"),
        plural(examples, "example")
    ));
    lines
}

/// Print the collection listing to stdout.
pub fn print_collection(docs: &[SourceDocument], root: &Path) {
    for line in format_collection(docs, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Publish
// ============================================================================

/// Format a single stage progress event.
pub fn format_stage_event(event: &StageEvent) -> String {
    match event {
        StageEvent::Started(stage) => format!("{stage}: started"),
        StageEvent::Finished(stage, outcome) => match outcome {
            StageOutcome::Pending => format!("{stage}: pending"),
            StageOutcome::Succeeded => format!("{stage}: ok"),
            StageOutcome::Failed(cause) => format!("{stage}: failed ({cause})"),
            StageOutcome::Skipped(reason) => format!("{stage}: skipped ({reason})"),
        },
    }
}

/// Print a stage progress event to stdout.
pub fn print_stage_event(event: &StageEvent) {
    println!("{}", format_stage_event(event));
}

/// Format the end-of-run summary.
pub fn format_run_summary(run: &PipelineRun, target_branch: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(dir) = run.artifacts() {
        lines.push(format!("Artifacts: {}", dir.display()));
        if let Some(d) = run.artifact_digest() {
            lines.push(format!("    Digest: {}", digest::short(d)));
        }
    }
    let status = match run.outcome() {
        RunOutcome::Published => format!("Published to {target_branch}"),
        RunOutcome::GeneratedOnly => "Generated only".to_string(),
        RunOutcome::GenerationFailed => "Generation failed".to_string(),
        RunOutcome::DeploymentFailed => "Deployment failed".to_string(),
    };
    lines.push(status);
    lines
}

/// Print the end-of-run summary to stdout.
pub fn print_run_summary(run: &PipelineRun, target_branch: &str) {
    for line in format_run_summary(run, target_branch) {
        println!("{}", line);
    }
}

// ============================================================================
// Classify
// ============================================================================

/// Format the code-block category of each symbol, in argument order.
pub fn format_classification(code_blocks: &CodeBlocks, symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .map(|symbol| match code_blocks.classify(symbol) {
            Some(category) => format!("{symbol} → {category}"),
            None => format!("{symbol} → (none)"),
        })
        .collect()
}

/// Print symbol classifications to stdout.
pub fn print_classification(code_blocks: &CodeBlocks, symbols: &[String]) {
    for line in format_classification(code_blocks, symbols) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
