use crate::configuration::Settings;
use crate::data_processing::{fetch_past_events, flatten_events, write_csv};
use crate::domain::GroupUrlname;
use crate::error::ExportResult;
use reqwest::blocking::Client;
use std::path::PathBuf;

/// What a completed export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub group: GroupUrlname,
    pub group_name: Option<String>,
    pub path: PathBuf,
    pub events: usize,
    pub host_columns: usize,
    pub topic_columns: usize,
    pub truncated: bool,
}

/// Picks the command-line group if given, otherwise the configured default.
/// An empty or blank group counts as not given.
pub fn resolve_group(settings: &Settings, group: Option<String>) -> ExportResult<GroupUrlname> {
    match group {
        Some(group) if !group.trim().is_empty() => GroupUrlname::parse(group),
        _ => settings.default_group(),
    }
}

/// Fetches, flattens, and writes the past events of one group.
///
/// Nothing is written unless the fetch succeeds; the export file only
/// appears once it has been written in full.
#[tracing::instrument(name = "Exporting past events", skip(settings), fields(group = %group))]
pub fn run(settings: &Settings, group: &GroupUrlname) -> ExportResult<ExportSummary> {
    let client = Client::builder().build()?;
    let meetup_group = fetch_past_events(&client, &settings.meetup.endpoint, group)?;
    let group_name = meetup_group.name.clone();
    let truncated = meetup_group.is_truncated();

    let events = meetup_group.into_events();
    let flattened = flatten_events(&events);

    let path = settings.export.output_dir.join(group.csv_file_name());
    let path = write_csv(&flattened, &path)?;

    Ok(ExportSummary {
        group: group.clone(),
        group_name,
        path,
        events: flattened.rows.len(),
        host_columns: flattened.max_hosts,
        topic_columns: flattened.max_topics,
        truncated,
    })
}
