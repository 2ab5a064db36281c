use super::meetup_api::{MeetupEvent, Venue};
use serde_json::Number;
use std::collections::HashMap;
use std::fmt;

/// Columns that precede the host and topic columns, in output order.
pub const LEADING_COLUMNS: [&str; 14] = [
    "id",
    "status",
    "title",
    "url",
    "start_at",
    "end_at",
    "going",
    "eventType",
    "venue",
    "city",
    "address",
    "postalCode",
    "lat",
    "lng",
];

/// Always the last column.
pub const DESCRIPTION_COLUMN: &str = "description";

pub fn host_column(index: usize) -> String {
    format!("host{}", index + 1)
}

pub fn topic_column(index: usize) -> String {
    format!("topic{}", index + 1)
}

/// A single exported value. Numbers keep the representation they arrived with.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(Number),
}

impl Cell {
    fn trimmed(s: &str) -> Self {
        Self::Text(s.trim().to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One event flattened into named cells. Absent fields have no entry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OutputRow {
    cells: HashMap<String, Cell>,
}

impl OutputRow {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn set_text(&mut self, column: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.cells.insert(column.into(), Cell::trimmed(value));
        }
    }

    fn set_number(&mut self, column: &str, value: Option<&Number>) {
        if let Some(value) = value {
            self.cells
                .insert(column.to_string(), Cell::Number(value.clone()));
        }
    }

    fn set_venue(&mut self, venue: &Venue) {
        self.set_text("venue", venue.name.as_deref());
        self.set_text("city", venue.city.as_deref());
        self.set_text("address", venue.address.as_deref());
        self.set_text("postalCode", venue.postal_code.as_deref());
        self.set_number("lat", venue.lat.as_ref());
        self.set_number("lng", venue.lng.as_ref());
    }

    /// Renders the row against a header; missing cells become empty fields.
    pub fn record(&self, header: &[String]) -> Vec<String> {
        header
            .iter()
            .map(|column| {
                self.cells
                    .get(column)
                    .map(Cell::to_string)
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Rows of a run together with the widest host and topic lists seen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlattenedEvents {
    pub rows: Vec<OutputRow>,
    pub max_hosts: usize,
    pub max_topics: usize,
}

impl FlattenedEvents {
    pub fn push(&mut self, event: &MeetupEvent) {
        let mut row = OutputRow::default();
        row.set_text("id", event.id.as_deref());
        row.set_text("status", event.status.as_deref());
        row.set_text("title", event.title.as_deref());
        row.set_text("url", event.event_url.as_deref());
        row.set_text("start_at", event.date_time.as_deref());
        row.set_text("end_at", event.end_time.as_deref());
        row.set_number("going", event.going.as_ref());
        row.set_text("eventType", event.event_type.as_deref());
        if let Some(venue) = &event.venue {
            row.set_venue(venue);
        }

        if let Some(hosts) = event.hosts.as_deref().filter(|hosts| !hosts.is_empty()) {
            self.max_hosts = self.max_hosts.max(hosts.len());
            for (i, host) in hosts.iter().enumerate() {
                row.set_text(host_column(i), host.name.as_deref());
            }
        }

        let topics = event
            .topics
            .as_ref()
            .and_then(|topics| topics.edges.as_deref())
            .filter(|edges| !edges.is_empty());
        if let Some(edges) = topics {
            self.max_topics = self.max_topics.max(edges.len());
            for (i, edge) in edges.iter().enumerate() {
                let name = edge.node.as_ref().and_then(|topic| topic.name.as_deref());
                row.set_text(topic_column(i), name);
            }
        }

        row.set_text(DESCRIPTION_COLUMN, event.description.as_deref());
        tracing::debug!(
            "Flattened event {} into {} cells",
            event.id.as_deref().unwrap_or("<no id>"),
            row.len()
        );
        self.rows.push(row);
    }

    /// The fixed output schema for this run.
    pub fn header(&self) -> Vec<String> {
        LEADING_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain((0..self.max_hosts).map(host_column))
            .chain((0..self.max_topics).map(topic_column))
            .chain(std::iter::once(DESCRIPTION_COLUMN.to_string()))
            .collect()
    }
}

impl<'a> FromIterator<&'a MeetupEvent> for FlattenedEvents {
    fn from_iter<I: IntoIterator<Item = &'a MeetupEvent>>(events: I) -> Self {
        let mut flattened = Self::default();
        for event in events {
            flattened.push(event);
        }
        flattened
    }
}

/// Flattens events in their original order.
pub fn flatten_events(events: &[MeetupEvent]) -> FlattenedEvents {
    events.iter().collect()
}
