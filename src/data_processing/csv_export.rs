//! Atomic CSV export.
//!
//! Rows are written to a temporary file next to the destination, which then
//! replaces the destination in one rename. A failed export leaves no partial
//! file behind and leaves an older export untouched.

use super::flatten::FlattenedEvents;
use crate::error::ExportResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Creates the temporary file with the permissions a plain overwrite would
/// leave: those of the existing export, or 0666 less the umask.
fn temp_file_for(path: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp_file = builder.tempfile_in(parent_dir(path))?;
    if let Ok(metadata) = std::fs::metadata(path) {
        temp_file.as_file().set_permissions(metadata.permissions())?;
    }
    Ok(temp_file)
}

/// Flushes the CSV writer and hands back the underlying sink.
fn finish<W: Write>(writer: csv::Writer<W>) -> ExportResult<W> {
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Writes the header and every row to `path`, replacing any existing file.
#[tracing::instrument(
    name = "Writing the CSV export",
    skip(events),
    fields(path = %path.display(), rows = events.rows.len())
)]
pub fn write_csv(events: &FlattenedEvents, path: &Path) -> ExportResult<PathBuf> {
    let temp_file = temp_file_for(path)?;
    let mut writer = csv::Writer::from_writer(temp_file);

    let header = events.header();
    writer.write_record(&header)?;
    for row in &events.rows {
        writer.write_record(row.record(&header))?;
    }

    let temp_file = finish(writer)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;

    tracing::info!("Successfully wrote to {:?}", path);
    Ok(path.to_path_buf())
}
