//! Apply the config to the selected targets.

use colored::Colorize;

use infra_config::{ConfigDocument, EnvContext};
use infra_targets::{Setup, SetupReport, TargetReport, TargetSelection};

/// Run the setup and print one line per target.
///
/// Returns whether every target succeeded.
pub fn run_apply(
    doc: &ConfigDocument,
    env: &EnvContext,
    selection: TargetSelection,
    dry_run: bool,
) -> bool {
    let verb = if dry_run { "Planning" } else { "Updating" };
    println!("{} {} MCP server registries...", "=>".blue().bold(), verb);

    let report = Setup::new(doc, env).dry_run(dry_run).run(selection);
    for target in &report.targets {
        print_target(target, dry_run);
    }
    print_summary(&report);

    report.is_success()
}

fn print_target(target: &TargetReport, dry_run: bool) {
    match &target.result {
        Ok(outcome) => {
            let services = if outcome.services.is_empty() {
                "no services".to_string()
            } else {
                outcome.services.join(", ")
            };
            let note = match (outcome.created, outcome.changed) {
                (_, false) => " unchanged".dimmed().to_string(),
                (true, true) => " created".dimmed().to_string(),
                (false, true) => String::new(),
            };
            println!(
                "   {} {} ({}){}",
                "OK".green().bold(),
                outcome.path.display().to_string().cyan(),
                services,
                note
            );
            if dry_run {
                println!("{}", outcome.contents);
            }
        }
        Err(e) => {
            println!("   {} {}: {}", "FAILED".red().bold(), target.kind, e);
        }
    }
}

fn print_summary(report: &SetupReport) {
    let total = report.targets.len();
    let failed = report.failures().count();
    if failed == 0 {
        println!("{} {} of {} targets updated.", "OK".green().bold(), total, total);
    } else {
        println!(
            "{} {} of {} targets failed.",
            "FAILED".red().bold(),
            failed,
            total
        );
    }
}
