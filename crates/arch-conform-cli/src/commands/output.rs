//! Shared output formatting for check results and reports.

use anyhow::Result;
use arch_conform::{Report, RuleResult, Violation};

use crate::OutputFormat;

/// Prints a single rule result in the specified format.
pub fn print_rule_result(result: &RuleResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_result_text(result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => {
            for violation in result.violations() {
                print_violation_compact(violation);
            }
        }
    }
    Ok(())
}

/// Prints a full report in the specified format.
pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for result in report.results() {
                print_result_text(result);
            }
            if !report.unclassified().is_empty() {
                println!("unclassified files:");
                for file in report.unclassified() {
                    println!("  {}", file.path.display());
                }
            }
            let (verdict, color) = if report.success() {
                ("PASS", "\x1b[32m")
            } else {
                ("FAIL", "\x1b[31m")
            };
            println!(
                "{color}{verdict}\x1b[0m: {} rule(s), {} violation(s), {} unclassified file(s)",
                report.results().len(),
                report.violation_count(),
                report.unclassified().len(),
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Compact => {
            for result in report.results() {
                for violation in result.violations() {
                    print_violation_compact(violation);
                }
            }
        }
    }
    Ok(())
}

fn print_result_text(result: &RuleResult) {
    let (verdict, color) = if result.success() {
        ("PASS", "\x1b[32m")
    } else {
        ("FAIL", "\x1b[31m")
    };
    println!("{color}{verdict}\x1b[0m {}", result.rule_id());
    for warning in result.warnings() {
        println!("  \x1b[33mwarning\x1b[0m: {warning}");
    }
    for violation in result.violations() {
        println!("  {}", violation.format());
    }
}

fn print_violation_compact(violation: &Violation) {
    let location = match (&violation.file, violation.line) {
        (Some(file), Some(line)) => format!("{}:{line}", file.display()),
        (Some(file), None) => file.display().to_string(),
        _ => "-".to_string(),
    };
    println!("{location}: {} {}", violation.module, violation.reason);
}
