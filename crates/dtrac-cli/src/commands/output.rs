//! Shared output formatting for analysis results.

use anyhow::Result;
use dtrac_core::{AnalysisReport, AnalysisSummary, Depfile, InheritanceCycle, RulesetViolation};
use serde::Serialize;
use std::io::Write;

use crate::OutputFormat;

/// Print an analysis report in the specified format.
pub fn print(report: &AnalysisReport, depfile: &Depfile, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write(&mut out, report, depfile, format)
}

fn write(
    out: &mut impl Write,
    report: &AnalysisReport,
    depfile: &Depfile,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report)?,
        OutputFormat::Json => write_json(out, report)?,
        OutputFormat::Compact => write_compact(out, report)?,
        OutputFormat::Dot => writeln!(out, "{}", report.layer_graph.to_dot(&depfile.ruleset))?,
    }
    Ok(())
}

fn write_text(out: &mut impl Write, report: &AnalysisReport) -> std::io::Result<()> {
    for violation in &report.violations {
        writeln!(out, "{violation}")?;
    }

    for cycle in &report.cycles {
        writeln!(out, "\x1b[33mwarning\x1b[0m: inheritance cycle {cycle}")?;
    }

    let summary_color = if report.is_clean() {
        "\x1b[32m"
    } else {
        "\x1b[31m"
    };

    writeln!(
        out,
        "\n{}Found {} Violations\x1b[0m",
        summary_color,
        report.violations.len()
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: AnalysisSummary,
    violations: &'a [RulesetViolation],
    cycles: &'a [InheritanceCycle],
}

fn write_json(out: &mut impl Write, report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport {
        summary: report.summary(),
        violations: &report.violations,
        cycles: &report.cycles,
    })?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_compact(out: &mut impl Write, report: &AnalysisReport) -> std::io::Result<()> {
    for violation in &report.violations {
        writeln!(out, "{}", violation.format_compact())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtrac_core::{Analysis, ClassMap, ClassReference, CollectorConfig, Layer, Ruleset};

    fn report() -> (AnalysisReport, Depfile) {
        let depfile = Depfile {
            layers: vec![
                Layer::new(
                    "Controller",
                    vec![CollectorConfig::new("className").with_str("regex", "Controller$")],
                ),
                Layer::new(
                    "Repository",
                    vec![CollectorConfig::new("className").with_str("regex", "Repo$")],
                ),
            ],
            ruleset: Ruleset::new().allow("Controller", ["Repository"]),
            ..Depfile::default()
        };
        let class_map: ClassMap = [
            ClassReference::new("UserController", "a.php", 1).with_reference("UserRepo", 5),
            ClassReference::new("UserRepo", "b.php", 1).with_reference("UserController", 9),
        ]
        .into_iter()
        .collect();
        let report = Analysis::new(depfile.clone()).run(&class_map).unwrap();
        (report, depfile)
    }

    fn render(format: OutputFormat) -> String {
        let (report, depfile) = report();
        let mut buf = Vec::new();
        write(&mut buf, &report, &depfile, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn compact_prints_one_line_per_violation() {
        insta::assert_snapshot!(render(OutputFormat::Compact), @"UserRepo::9 must not depend on UserController (Repository on Controller)");
    }

    #[test]
    fn text_ends_with_violation_count() {
        let text = render(OutputFormat::Text);
        assert!(text.starts_with("UserRepo::9 must not depend on UserController"));
        assert!(text.contains("Found 1 Violations"));
    }

    #[test]
    fn json_carries_summary_and_violations() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value["summary"]["violations"], 1);
        assert_eq!(value["violations"][0]["layer_a"], "Repository");
        assert_eq!(value["violations"][0]["dependency"]["kind"], "basic");
    }

    #[test]
    fn dot_renders_layer_graph() {
        let dot = render(OutputFormat::Dot);
        assert!(dot.contains("\"Repository\" -> \"Controller\" [label=\"1\", color=red];"));
    }
}
