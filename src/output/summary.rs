//! End-of-run report for the command line

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::snapshot::{ArtifactReport, SnapshotReport};
use crate::tree::format_size;

/// Print the run summary to stdout.
pub fn print_summary(report: &SnapshotReport, use_color: bool) -> io::Result<()> {
    let choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_summary(&mut stdout, report)
}

pub fn write_summary<W: WriteColor>(out: &mut W, report: &SnapshotReport) -> io::Result<()> {
    if !report.skipped.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(out, "warning:")?;
        out.reset()?;
        writeln!(out, " {} path(s) could not be read", report.skipped.len())?;
        for skipped in &report.skipped {
            writeln!(out, "  {}: {}", skipped.path.display(), skipped.reason)?;
        }
        if report.had_permission_errors() {
            writeln!(
                out,
                "  The terminal may need Full Disk Access to read these folders."
            )?;
        }
    }

    for failure in &report.failures {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "error:")?;
        out.reset()?;
        writeln!(out, " {}", failure)?;
    }

    if report.is_complete() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(out, "Done.")?;
        out.reset()?;
    }

    if let Some(tree) = &report.tree {
        write_artifact(out, "Tree", tree)?;
    }
    if let Some(index) = &report.index {
        write_artifact(out, "TSV ", index)?;
        writeln!(out, "Files indexed: {}", report.files_indexed)?;
    }
    if let Some(reason) = &report.fallback_reason {
        writeln!(out, "Tree rendered in-process: {}", reason)?;
    }
    writeln!(
        out,
        "Elapsed: {}",
        humantime::format_duration(round_to_millis(report.elapsed))
    )?;
    Ok(())
}

fn write_artifact<W: WriteColor>(out: &mut W, label: &str, artifact: &ArtifactReport) -> io::Result<()> {
    write!(out, "{}: ", label)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
    write!(out, "{}", artifact.path.display())?;
    out.reset()?;
    writeln!(out, " ({})", format_size(artifact.bytes))
}

fn round_to_millis(elapsed: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(elapsed.as_millis() as u64)
}
