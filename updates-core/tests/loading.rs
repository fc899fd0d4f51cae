use futures::executor::block_on;
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use updates_core::{
    load_feed, report_failure, Board, DescriptionSource, FeedError, IntroLatch, PendingTimer,
    Response, Transport, WidgetConfig,
};

#[derive(Default)]
struct FakeTransport {
    gets: HashMap<String, Result<Response, String>>,
    post_status: Option<u16>,
    requested: RefCell<Vec<String>>,
    posts: RefCell<Vec<(String, String)>>,
}

impl FakeTransport {
    fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.gets.insert(
            url.into(),
            Ok(Response {
                status,
                body: body.into(),
            }),
        );
        self
    }

    fn reject(mut self, url: &str, reason: &str) -> Self {
        self.gets.insert(url.into(), Err(reason.into()));
        self
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Response, FeedError> {
        self.requested.borrow_mut().push(url.to_string());
        match self.gets.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(FeedError::network(url, reason.clone())),
            None => Err(FeedError::network(url, "no route")),
        }
    }

    async fn post_json(&self, url: &str, body: String) -> Result<Response, FeedError> {
        self.posts.borrow_mut().push((url.to_string(), body));
        match self.post_status {
            Some(status) => Ok(Response {
                status,
                body: "{}".into(),
            }),
            None => Err(FeedError::network(url, "offline")),
        }
    }
}

#[derive(Clone, Default)]
struct NoopTimer(Rc<Cell<bool>>);

impl PendingTimer for NoopTimer {
    fn cancel(self) {
        self.0.set(true);
    }
}

const UPDATES: &str = r#"[
  { "platform_name": "GitHub", "platform_url": "https://github.com/someone",
    "time_ago": "Сегодня", "full_date": "1 июня 2024", "update_event": "github_push" },
  { "platform_name": "Last.fm", "platform_url": "",
    "time_ago": "2 дней назад", "full_date": "30 мая 2024", "update_event": "lastfm_mystery" }
]"#;

const EVENT_TYPES: &str = r#"{ "github_push": "Pushed new commits" }"#;

fn healthy() -> FakeTransport {
    FakeTransport::default()
        .respond("/api/updates", 200, UPDATES)
        .respond("/api/event-types", 200, EVENT_TYPES)
}

/// Mirrors what the browser widget does with a load result.
fn run_widget(transport: &FakeTransport) -> (Board<NoopTimer>, Option<String>) {
    let config = WidgetConfig::default();
    let mut board = Board::new(&config);
    let failure = block_on(async {
        match load_feed(transport, &config, async {}).await {
            Ok(feed) => {
                board.render(feed);
                None
            }
            Err(err) => {
                report_failure(transport, &config.endpoints, &err).await;
                Some(config.failure_message.clone())
            }
        }
    });
    (board, failure)
}

#[test]
fn loads_feed_and_catalog_together() {
    let transport = healthy();
    let (board, failure) = run_widget(&transport);

    assert_eq!(failure, None);
    assert_eq!(board.len(), 2);
    let mut requested = transport.requested.borrow().clone();
    requested.sort();
    assert_eq!(requested, ["/api/event-types", "/api/updates"]);
    assert!(transport.posts.borrow().is_empty());
}

#[test]
fn link_presence_follows_platform_url() {
    let (board, _) = run_widget(&healthy());
    assert!(board.items()[0].link().is_some());
    assert!(board.items()[1].link().is_none());
}

#[test]
fn unknown_event_key_is_shown_verbatim() {
    let (mut board, _) = run_widget(&healthy());
    board.expand(1).unwrap();
    let expansion = board.row(1).unwrap().expansion().unwrap().clone();
    assert_eq!(expansion.label, "Last.fm:");
    assert_eq!(expansion.detail, "lastfm_mystery @ 30 мая 2024");

    board.expand(0).unwrap();
    assert_eq!(
        board.row(0).unwrap().expansion().unwrap().detail,
        "Pushed new commits @ 1 июня 2024"
    );
}

#[test]
fn server_error_renders_nothing_and_reports_once() {
    let transport = FakeTransport {
        post_status: Some(200),
        ..healthy().respond("/api/updates", 500, "[]")
    };
    let (board, failure) = run_widget(&transport);

    assert!(board.is_empty());
    assert_eq!(failure.as_deref(), Some("Не удалось загрузить обновления"));

    let posts = transport.posts.borrow();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "/api/log-error");
    let body: serde_json::Value = serde_json::from_str(&posts[0].1).unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("500"));
    assert!(body["stack"].is_string());
}

#[test]
fn network_rejection_is_reported_and_report_failure_is_swallowed() {
    let transport = healthy().reject("/api/updates", "connection refused");
    let (board, failure) = run_widget(&transport);

    assert!(board.is_empty());
    assert!(failure.is_some());
    let posts = transport.posts.borrow();
    assert_eq!(posts.len(), 1);
    let body: serde_json::Value = serde_json::from_str(&posts[0].1).unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[test]
fn rejected_error_report_is_swallowed() {
    let transport = FakeTransport {
        post_status: Some(500),
        ..healthy().respond("/api/updates", 500, "[]")
    };
    let (board, failure) = run_widget(&transport);

    assert!(board.is_empty());
    assert_eq!(failure.as_deref(), Some("Не удалось загрузить обновления"));
    let posts = transport.posts.borrow();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "/api/log-error");
}

#[test]
fn event_type_failure_aborts_the_load() {
    let transport = healthy().respond("/api/event-types", 503, "down");
    let config = WidgetConfig::default();
    let err = block_on(load_feed(&transport, &config, async {})).unwrap_err();
    assert!(matches!(err, FeedError::Status { status: 503, .. }));
}

#[test]
fn malformed_body_is_a_parse_error() {
    let transport = healthy().respond("/api/updates", 200, "<html>");
    let config = WidgetConfig::default();
    let err = block_on(load_feed(&transport, &config, async {})).unwrap_err();
    assert!(matches!(err, FeedError::Parse { ref url, .. } if url == "/api/updates"));
}

#[test]
fn inline_descriptions_skip_the_catalog_request() {
    let transport = FakeTransport::default().respond("/api/updates", 200, UPDATES);
    let config = WidgetConfig {
        descriptions: DescriptionSource::Inline(BTreeMap::from([(
            "lastfm_mystery".to_string(),
            "Scrobbled a track".to_string(),
        )])),
        ..WidgetConfig::default()
    };
    let feed = block_on(load_feed(&transport, &config, async {})).unwrap();

    assert_eq!(feed.items.len(), 2);
    assert_eq!(feed.catalog.describe(&feed.items[1]), "Scrobbled a track");
    assert_eq!(transport.requested.borrow().as_slice(), ["/api/updates"]);
}

#[test]
fn rendering_waits_for_the_intro() {
    let transport = healthy();
    let config = WidgetConfig::default();
    let mut latch = IntroLatch::default();
    let mut load = Box::pin(load_feed(&transport, &config, latch.gate()));

    assert!(load.as_mut().now_or_never().is_none());
    assert_eq!(transport.requested.borrow().len(), 2);

    latch.finish();
    let feed = block_on(load).unwrap();
    assert_eq!(feed.items.len(), 2);
}
