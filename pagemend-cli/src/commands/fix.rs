//! Fix command - run the pipeline locally with interactive approval

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use pagemend_core::approval::render_summary;
use pagemend_core::{ApprovalStatus, ArtifactSet, TargetKind};

use super::build_pipeline;

/// Arguments for the fix command
#[derive(Args, Debug)]
pub struct FixArgs {
    /// HTML file to analyze
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// CSS file to analyze
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// JavaScript file to analyze
    #[arg(long)]
    pub js: Option<PathBuf>,

    /// Run against the built-in sample page instead of files
    #[arg(long)]
    pub demo: bool,

    /// Approve all changes without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Directory to write fixed artifacts into
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl FixArgs {
    /// Execute the fix command
    pub async fn execute(&self, verbose: bool, config: &pagemend_core::Config) -> anyhow::Result<()> {
        let artifacts = self.load_artifacts()?;

        if verbose {
            tracing::info!(
                html = artifacts.markup.len(),
                css = artifacts.style.len(),
                js = artifacts.script.len(),
                "Starting pagemend fix"
            );
        }

        let pipeline = build_pipeline(config)?;
        let mut report = pipeline.run(artifacts).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("{}", render_summary(&report.dashboard, &report.diff_views));

        if report.dashboard.is_empty() {
            return Ok(());
        }

        let decision = if self.yes {
            ApprovalStatus::Accepted
        } else {
            prompt_decision(&mut io::stdin().lock())?
        };
        report.set_status(decision);

        println!();
        println!("{}", report.message);

        if decision == ApprovalStatus::Accepted {
            match &self.out {
                Some(dir) => self.write_fixed(dir, &report)?,
                None => print_fixed(&report),
            }
        }

        Ok(())
    }

    fn load_artifacts(&self) -> anyhow::Result<ArtifactSet> {
        if self.demo {
            return Ok(sample_artifacts());
        }
        if self.html.is_none() && self.css.is_none() && self.js.is_none() {
            println!("No input files given, running the built-in demo page.");
            return Ok(sample_artifacts());
        }
        Ok(ArtifactSet::new(
            read_optional(self.html.as_ref())?,
            read_optional(self.css.as_ref())?,
            read_optional(self.js.as_ref())?,
        ))
    }

    fn write_fixed(&self, dir: &PathBuf, report: &pagemend_core::Report) -> anyhow::Result<()> {
        fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", dir.display(), e))?;
        for target in TargetKind::all() {
            let body = report.fixed.get(*target);
            if body.is_empty() {
                continue;
            }
            let path = dir.join(format!("fixed.{}", target.file_extension()));
            fs::write(&path, body)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
            println!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Ask on stdin until the answer is a clear yes or no.
///
/// End of input counts as a rejection, so piping an empty stdin never
/// applies anything.
fn prompt_decision(input: &mut impl BufRead) -> anyhow::Result<ApprovalStatus> {
    loop {
        print!("Approve all changes? (y/n): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(ApprovalStatus::Rejected);
        }
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(ApprovalStatus::Accepted),
            "n" | "no" => return Ok(ApprovalStatus::Rejected),
            _ => println!("Please answer 'y' or 'n'."),
        }
    }
}

fn print_fixed(report: &pagemend_core::Report) {
    for target in TargetKind::all() {
        let body = report.fixed.get(*target);
        if body.is_empty() {
            continue;
        }
        println!();
        println!("Fixed {} ({})", target.keyword(), target.file_extension());
        println!("{}", "-".repeat(40));
        println!("{}", body);
    }
}

fn read_optional(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e)),
        None => Ok(String::new()),
    }
}

/// A small page with one defect of every analyzer family
fn sample_artifacts() -> ArtifactSet {
    ArtifactSet::new(
        r##"<div style="width: 300px;">Lorem ipsum dolor sit amet</div><img src="#" alt=""><button onclick="handleClick()">Click me</button>"##,
        ".header { position: absolute; width: 500px; z-index: 999; }",
        "function handleClick() { const element = document.getElementById('missing-id'); element.style.display = 'none'; }",
    )
}
