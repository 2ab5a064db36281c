use crate::domain::GroupUrlname;
use crate::error::{ExportError, ExportResult};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use serde_json::value::{RawValue, Value};

/// Public GraphQL endpoint of the Meetup API.
/// Schema documentation: https://www.meetup.com/api/schema/#Event
pub const DEFAULT_ENDPOINT: &str = "https://api.meetup.com/gql";

/// Asks for every past event in a single page. The page size is far above any
/// real group's history; `pageInfo` is requested only to detect truncation.
pub const PAST_EVENTS_QUERY: &str = r#"
query ($urlname: String!) {
    groupByUrlname(urlname: $urlname) {
        id
        name
        pastEvents(input: { first: 100500 }) {
            count
            pageInfo {
                hasNextPage
                hasPreviousPage
                startCursor
                endCursor
            }
            edges {
                node {
                    id
                    status
                    token
                    eventUrl
                    title
                    dateTime
                    endTime
                    description
                    going
                    eventType
                    imageUrl
                    venue {
                        name
                        city
                        address
                        postalCode
                        lat
                        lng
                    }
                    hosts {
                        id
                        name
                    }
                    topics {
                        count
                        edges {
                            node {
                                urlkey
                                name
                                id
                            }
                        }
                    }
                }
            }
        }
    }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: PastEventsVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct PastEventsVariables<'a> {
    pub urlname: &'a str,
}

pub fn past_events_request(group: &GroupUrlname) -> GraphQlRequest<'_> {
    GraphQlRequest {
        query: PAST_EVENTS_QUERY,
        variables: PastEventsVariables {
            urlname: group.as_ref(),
        },
    }
}

/// General response envelope of a GraphQL endpoint.
#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<PastEventsData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PastEventsData {
    group_by_urlname: Option<Box<RawValue>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetupGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    pub past_events: EventConnection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConnection {
    pub count: Option<u64>,
    pub page_info: Option<PageInfo>,
    pub edges: Option<Vec<EventEdge>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: Option<bool>,
    pub has_previous_page: Option<bool>,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventEdge {
    pub node: Option<MeetupEvent>,
}

/// An Event object from the Meetup API. Every field may be absent or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetupEvent {
    pub id: Option<String>,
    pub status: Option<String>,
    pub token: Option<String>,
    pub event_url: Option<String>,
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub going: Option<Number>,
    pub event_type: Option<String>,
    pub image_url: Option<String>,
    pub venue: Option<Venue>,
    pub hosts: Option<Vec<Host>>,
    pub topics: Option<TopicConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub lat: Option<Number>,
    pub lng: Option<Number>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Host {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicConnection {
    pub count: Option<u64>,
    pub edges: Option<Vec<TopicEdge>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicEdge {
    pub node: Option<Topic>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Topic {
    pub urlkey: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
}

impl MeetupGroup {
    fn edge_count(&self) -> usize {
        self.past_events.edges.as_ref().map_or(0, Vec::len)
    }

    /// True when the API holds more past events than the single page returned.
    pub fn is_truncated(&self) -> bool {
        let has_next_page = self
            .past_events
            .page_info
            .as_ref()
            .and_then(|info| info.has_next_page)
            .unwrap_or(false);
        let more_than_returned = self
            .past_events
            .count
            .is_some_and(|count| count > self.edge_count() as u64);
        has_next_page || more_than_returned
    }

    /// Consumes the group, returning its event nodes in response order.
    pub fn into_events(self) -> Vec<MeetupEvent> {
        self.past_events
            .edges
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, edge)| {
                if edge.node.is_none() {
                    tracing::warn!("Skipping past event edge {} without a node", i);
                }
                edge.node
            })
            .collect()
    }
}

fn empty_result(group: &GroupUrlname, reason: impl Into<String>) -> ExportError {
    ExportError::EmptyResult {
        group: group.to_string(),
        reason: reason.into(),
    }
}

/// Checks the shape of a successful response and extracts the group.
pub fn parse_past_events(group: &GroupUrlname, body: &str) -> ExportResult<MeetupGroup> {
    let packet: Option<GraphQlResponse> = serde_json::from_str(body)?;
    let packet = packet.ok_or_else(|| empty_result(group, "response body is null"))?;

    let messages: Vec<String> = packet
        .errors
        .unwrap_or_default()
        .into_iter()
        .filter_map(|error| error.message)
        .collect();
    for message in &messages {
        tracing::warn!("GraphQL error for {}: {}", group, message);
    }
    let with_errors = |reason: &str| {
        if messages.is_empty() {
            reason.to_string()
        } else {
            format!("{} ({})", reason, messages.join("; "))
        }
    };

    let data = packet
        .data
        .ok_or_else(|| empty_result(group, with_errors("response has no data")))?;
    let raw_group = data
        .group_by_urlname
        .ok_or_else(|| empty_result(group, with_errors("groupByUrlname is missing or null")))?;
    let shape: Value = serde_json::from_str(raw_group.get())?;
    if shape.as_object().is_some_and(|fields| fields.is_empty()) {
        return Err(empty_result(group, with_errors("groupByUrlname is empty")));
    }

    // Decoded from the raw text so numbers keep the digits they were sent with
    let meetup_group: MeetupGroup = serde_json::from_str(raw_group.get())?;
    tracing::info!(
        "Group {} ({}) reports {} past events, {} returned",
        meetup_group.name.as_deref().unwrap_or("<unnamed>"),
        meetup_group.id.as_deref().unwrap_or("<no id>"),
        meetup_group
            .past_events
            .count
            .map_or_else(|| "an unknown number of".to_string(), |c| c.to_string()),
        meetup_group.edge_count()
    );
    if meetup_group.is_truncated() {
        tracing::warn!(
            "Past events of {} span more than one page; only the first page is exported",
            group
        );
    }
    Ok(meetup_group)
}

/// Issues the single GraphQL request for a group's past events.
#[tracing::instrument(
    name = "Fetching past events from the Meetup API",
    skip(client),
    fields(group = %group)
)]
pub fn fetch_past_events(
    client: &Client,
    endpoint: &str,
    group: &GroupUrlname,
) -> ExportResult<MeetupGroup> {
    let response = client
        .post(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .json(&past_events_request(group))
        .send()?;
    let status = response.status();
    let body = response.text()?;
    if status != StatusCode::OK {
        return Err(ExportError::Transport { status, body });
    }
    parse_past_events(group, &body)
}
