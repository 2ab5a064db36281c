use clap::Parser;
use meetup_export::configuration::get_configuration;
use meetup_export::error::ExportError;
use meetup_export::startup::{resolve_group, run};
use meetup_export::telemetry::{get_subscriber, init_subscriber};
use std::io::IsTerminal;
use std::process::ExitCode;

/// Export the past events of a Meetup group to `<group>_meetups.csv`.
#[derive(Parser)]
#[command(name = "meetup-export")]
#[command(version, about, long_about = None)]
struct Cli {
    /// The group urlname on meetup.com, e.g. `pythonireland`
    #[arg(long)]
    group: Option<String>,
}

fn fail(err: &ExportError) -> ExitCode {
    eprintln!("Error: {}", err);
    ExitCode::from(err)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configurable, so settings come first
    let settings = match get_configuration() {
        Ok(settings) => settings,
        Err(e) => return fail(&ExportError::from(e)),
    };
    let subscriber = get_subscriber(
        settings.log.filter.clone(),
        settings.log.format,
        std::io::stderr().is_terminal(),
        std::io::stderr,
    );
    init_subscriber(subscriber);

    let summary = match resolve_group(&settings, cli.group).and_then(|group| run(&settings, &group)) {
        Ok(summary) => summary,
        Err(e) => return fail(&e),
    };

    tracing::info!(
        "Exported {} events of {} with {} host and {} topic columns to {:?}",
        summary.events,
        summary.group_name.as_deref().unwrap_or(summary.group.as_ref()),
        summary.host_columns,
        summary.topic_columns,
        summary.path
    );
    if summary.truncated {
        tracing::warn!("The export does not contain every past event of the group");
    }
    ExitCode::SUCCESS
}
