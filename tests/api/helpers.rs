use fake::Fake;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use meetup_export::configuration::{
    ExportSettings, LogFormat, LogSettings, MeetupSettings, Settings,
};
use meetup_export::error::ExportResult;
use meetup_export::startup::{ExportSummary, resolve_group, run};
use meetup_export::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(default_filter_level, LogFormat::Pretty, false, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(default_filter_level, LogFormat::Pretty, false, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub meetup_server: MockServer,
    pub output_dir: TempDir,
    pub settings: Settings,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // `TRACING` is only executed the first time `initialize` is invoked.
        Lazy::force(&TRACING);

        // Stand-in for the Meetup GraphQL endpoint
        let meetup_server = MockServer::start().await;
        // Every test case writes into its own directory
        let output_dir = tempfile::tempdir().expect("Failed to create output directory.");

        let settings = Settings {
            meetup: MeetupSettings {
                endpoint: format!("{}/gql", meetup_server.uri()),
                default_group: "pythonireland".to_string(),
            },
            export: ExportSettings {
                output_dir: output_dir.path().to_path_buf(),
            },
            log: LogSettings {
                filter: "info".to_string(),
                format: LogFormat::Pretty,
            },
        };

        Self {
            meetup_server,
            output_dir,
            settings,
        }
    }

    /// Mounts a mock answering every GraphQL POST with `template`.
    pub async fn respond_with(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/gql"))
            .respond_with(template)
            .mount(&self.meetup_server)
            .await;
    }

    /// Runs a full export off the async runtime, as the blocking client requires.
    pub async fn export(&self, group: Option<&str>) -> ExportResult<ExportSummary> {
        let settings = self.settings.clone();
        let group = group.map(str::to_string);
        tokio::task::spawn_blocking(move || {
            let group = resolve_group(&settings, group)?;
            run(&settings, &group)
        })
        .await
        .expect("Export task panicked.")
    }

    pub fn export_path(&self, group: &str) -> PathBuf {
        self.output_dir.path().join(format!("{}_meetups.csv", group))
    }

    pub fn read_export(&self, group: &str) -> Vec<csv::StringRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(self.export_path(group))
            .expect("Failed to open the export.");
        reader
            .records()
            .collect::<Result<_, _>>()
            .expect("Failed to parse the export as CSV.")
    }
}

/// A past event node with `hosts` hosts and `topics` topics.
pub fn event_node(id: &str, hosts: usize, topics: usize) -> Value {
    let hosts: Vec<Value> = (0..hosts)
        .map(|i| json!({ "id": i.to_string(), "name": Name().fake::<String>() }))
        .collect();
    let topic_edges: Vec<Value> = (0..topics)
        .map(|i| {
            let name: String = Word().fake();
            json!({ "node": { "urlkey": name.to_lowercase(), "name": name, "id": i.to_string() } })
        })
        .collect();
    json!({
        "id": id,
        "status": "PAST",
        "token": "tok",
        "eventUrl": format!("https://www.meetup.com/pythonireland/events/{}/", id),
        "title": format!("  Meetup {}  ", id),
        "dateTime": "2024-01-10T18:30+00:00",
        "endTime": "2024-01-10T21:00+00:00",
        "description": format!("\nTalks for meetup {}.\n", id),
        "going": 57,
        "eventType": "PHYSICAL",
        "imageUrl": null,
        "venue": {
            "name": " Workday ",
            "city": "Dublin",
            "address": "Kings Building",
            "postalCode": "D02",
            "lat": 53.3398,
            "lng": -6.24031
        },
        "hosts": hosts,
        "topics": { "count": topics, "edges": topic_edges }
    })
}

/// A successful GraphQL response listing `nodes` as the group's past events.
pub fn group_response(nodes: Vec<Value>) -> Value {
    let count = nodes.len();
    let edges: Vec<Value> = nodes.into_iter().map(|node| json!({ "node": node })).collect();
    json!({
        "data": {
            "groupByUrlname": {
                "id": "1234567",
                "name": "Python Ireland",
                "pastEvents": {
                    "count": count,
                    "pageInfo": {
                        "hasNextPage": false,
                        "hasPreviousPage": false,
                        "startCursor": "MA==",
                        "endCursor": "MQ=="
                    },
                    "edges": edges
                }
            }
        }
    })
}
