use crate::error::ExportError;
use unicode_segmentation::UnicodeSegmentation;

/// Group queried when neither the command line nor the configuration names one.
pub const DEFAULT_GROUP: &str = "pythonireland";

/// A Meetup group handle, as it appears in `meetup.com/<urlname>`.
///
/// The handle also names the output file, so anything that could escape the
/// output directory or break the file name is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUrlname(String);

impl GroupUrlname {
    pub fn parse(s: String) -> Result<Self, ExportError> {
        let forbidden_characters = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
        let s = s.trim().to_string();

        if s.is_empty() {
            Err(ExportError::InvalidGroup(
                "group urlname has no non-whitespace characters".to_string(),
            ))
        } else if s.graphemes(true).count() > 256 {
            Err(ExportError::InvalidGroup(format!("{} is too long", s)))
        } else if s == "." || s == ".." {
            Err(ExportError::InvalidGroup(format!("{} is not a group", s)))
        } else if s
            .chars()
            .any(|c| forbidden_characters.contains(&c) || c.is_control() || c.is_whitespace())
        {
            Err(ExportError::InvalidGroup(format!(
                "{} contains forbidden characters",
                s
            )))
        } else {
            Ok(Self(s))
        }
    }

    /// Name of the export file for this group.
    pub fn csv_file_name(&self) -> String {
        format!("{}_meetups.csv", self.0)
    }
}

impl Default for GroupUrlname {
    fn default() -> Self {
        Self(DEFAULT_GROUP.to_string())
    }
}

impl AsRef<str> for GroupUrlname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupUrlname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
