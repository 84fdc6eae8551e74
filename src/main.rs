// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Compile the marker pattern (a bad pattern stops everything right away)
// 3. Compose each root document
// 4. Print what happened
// 5. Exit with proper code (0 = success, 1 = missing fragments on check,
//    2 = error)
//
// Rust concepts used:
// - async/await: several documents are composed concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod cli;

use anyhow::{bail, Result};
use clap::Parser;
use cli::{Cli, CommonArgs, Commands};

use readme_composer::batch::{
    compose_documents, DocumentJob, DocumentReport, DocumentStatus, Mode,
};
use readme_composer::compose::{MarkerOutcome, MarkerPattern};

#[tokio::main]
async fn main() {
    // RUST_LOG=debug shows every marker as it is resolved
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compose {
            common,
            output,
            stdout,
        } => handle_compose(common, output, stdout).await,
        Commands::Check { common } => handle_check(common).await,
    }
}

// Handles the 'compose' subcommand
async fn handle_compose(
    common: CommonArgs,
    output: Option<std::path::PathBuf>,
    stdout: bool,
) -> Result<i32> {
    let marker_pattern = MarkerPattern::new(&common.marker_pattern)?;

    if output.is_some() && common.documents.len() > 1 {
        bail!("--output can only be used with a single document");
    }

    let mode = if stdout {
        Mode::DryRun
    } else {
        Mode::Write { output }
    };
    let jobs = common
        .documents
        .iter()
        .map(|path| DocumentJob::new(path, mode.clone()))
        .collect();

    let reports = compose_documents(jobs, &marker_pattern, common.jobs).await;

    if common.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if stdout {
        for report in &reports {
            if let Some(text) = &report.text {
                print!("{}", text);
            }
        }
    }

    if !common.json {
        for report in &reports {
            print_compose_line(report, stdout);
        }
    }

    Ok(if reports.iter().any(DocumentReport::is_failed) {
        2
    } else {
        0
    })
}

// Handles the 'check' subcommand
async fn handle_check(common: CommonArgs) -> Result<i32> {
    let marker_pattern = MarkerPattern::new(&common.marker_pattern)?;

    let jobs = common
        .documents
        .iter()
        .map(|path| DocumentJob::new(path, Mode::DryRun))
        .collect();

    let reports = compose_documents(jobs, &marker_pattern, common.jobs).await;

    if common.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_table(&reports);
    }

    if reports.iter().any(DocumentReport::is_failed) {
        Ok(2)
    } else if reports.iter().any(|r| r.missing_count() > 0) {
        Ok(1)
    } else {
        Ok(0)
    }
}

// One line per document after 'compose'
//
// With --stdout the composed text owns stdout, so messages go to stderr
fn print_compose_line(report: &DocumentReport, stdout: bool) {
    let path = report.path.display();
    let line = match &report.status {
        DocumentStatus::Updated { written_to } if written_to == &report.path => {
            format!("{} was successfully updated", path)
        }
        DocumentStatus::Updated { written_to } => {
            format!("{} was composed into {}", path, written_to.display())
        }
        DocumentStatus::Unchanged => format!("{} has nothing to insert", path),
        DocumentStatus::Checked { .. } => format!("{} was composed", path),
        DocumentStatus::Failed { message } => {
            eprintln!("error: {}", message);
            return;
        }
    };

    if stdout {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }

    for marker in &report.markers {
        if let MarkerOutcome::Missing { path, .. } = marker {
            eprintln!("   ⚠️  {} not found", path);
        }
    }
}

// Prints the check results as a human-readable table in the terminal
fn print_table(reports: &[DocumentReport]) {
    println!("{:<40} {:<16} {:<10} {:<10}", "DOCUMENT", "STATUS", "MARKERS", "MISSING");
    println!("{}", "=".repeat(75));

    for report in reports {
        let path = report.path.display().to_string();
        // Truncate path if too long for display
        let path_display = if path.chars().count() > 37 {
            format!("{}...", path.chars().take(37).collect::<String>())
        } else {
            path
        };

        println!(
            "{:<40} {:<16} {:<10} {:<10}",
            path_display,
            format_status(&report.status),
            report.markers.len(),
            report.missing_count()
        );

        for marker in &report.markers {
            if let MarkerOutcome::Missing { path, .. } = marker {
                println!("   ⚠️  {} not found", path);
            }
        }
        if let DocumentStatus::Failed { message } = &report.status {
            println!("   ❌ {}", message);
        }
    }

    println!();

    let markers: usize = reports.iter().map(|r| r.markers.len()).sum();
    let missing: usize = reports.iter().map(DocumentReport::missing_count).sum();

    println!("📊 Summary:");
    println!("   ✅ Inserted: {}", markers - missing);
    println!("   ❌ Missing: {}", missing);
    println!("   📋 Documents: {}", reports.len());
}

fn format_status(status: &DocumentStatus) -> String {
    match status {
        DocumentStatus::Updated { .. } => "✅ UPDATED".to_string(),
        DocumentStatus::Unchanged => "➖ UNCHANGED".to_string(),
        DocumentStatus::Checked { changed: true } => "📝 WOULD CHANGE".to_string(),
        DocumentStatus::Checked { changed: false } => "✅ UP TO DATE".to_string(),
        DocumentStatus::Failed { .. } => "⚠️  ERROR".to_string(),
    }
}
