//! Terminal output

use colored::*;
use launchpad_core::domain::diagnostic::{Diagnostics, Severity};
use launchpad_core::domain::job::JobRecord;
use launchpad_core::domain::status::JobStatus;

/// Print detailed job information
pub fn print_job_details(job: &JobRecord) {
    println!("{}", "Job Details:".bold());
    println!("  URL:         {}", job.url.cyan());
    println!("  Template:    {}", job.job_template_id);
    println!("  Type:        {}", job.job_type.dimmed());
    println!("  Status:      {}", colorize_status(&job.status));
    println!("  Inventory:   {}", job.inventory_id);

    if job.wait_for_completion {
        println!(
            "  Wait:        up to {}s",
            job.wait_for_completion_timeout_seconds
        );
    }

    if let Some(template) = job.destroy_template() {
        println!("  On destroy:  template {}", template);
    }

    if let Some(ignored) = &job.ignored_fields {
        println!("\n{}", "Ignored fields:".bold());
        for field in ignored {
            println!("  {}", field.yellow());
        }
    }

    if let Some(triggers) = &job.triggers {
        println!("\n{}", "Triggers:".bold());
        for (key, value) in triggers {
            println!("  {} = {}", key.cyan(), value);
        }
    }
}

/// Print diagnostics to stderr
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        let label = match diagnostic.severity {
            Severity::Warning => "Warning:".yellow().bold(),
            Severity::Error => "Error:".red().bold(),
        };
        eprintln!("{} {}", label, diagnostic.summary.bold());
        if !diagnostic.detail.is_empty() {
            eprintln!("  {}", diagnostic.detail);
        }
    }
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::New | JobStatus::Pending | JobStatus::Waiting => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Successful => status_str.green(),
        JobStatus::Failed | JobStatus::Error => status_str.red(),
        JobStatus::Canceled => status_str.dimmed(),
        JobStatus::Unknown(_) => status_str.normal(),
    }
}
