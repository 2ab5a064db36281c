mod csv_export;
mod flatten;
mod meetup_api;

pub use csv_export::write_csv;
pub use flatten::{
    Cell, DESCRIPTION_COLUMN, FlattenedEvents, LEADING_COLUMNS, OutputRow, flatten_events,
    host_column, topic_column,
};
pub use meetup_api::{
    DEFAULT_ENDPOINT, EventConnection, EventEdge, GraphQlRequest, Host, MeetupEvent, MeetupGroup,
    PAST_EVENTS_QUERY, PageInfo, PastEventsVariables, Topic, TopicConnection, TopicEdge, Venue,
    fetch_past_events, parse_past_events, past_events_request,
};
