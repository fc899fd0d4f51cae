//! Target-independent core of the platform updates widget.
//!
//! Everything that decides *what* the widget shows lives here: the feed
//! model, the row state machine and its timers, the overflow heuristic, and
//! the loading/reporting pipeline. The browser crate only wires these to the
//! DOM.

pub mod config;
pub mod error;
pub mod feed;
pub mod intro;
pub mod layout;
pub mod loader;
pub mod rows;

pub use config::{AnimationConfig, DescriptionSource, Endpoints, WidgetConfig};
pub use error::{ConfigError, ErrorReport, FeedError};
pub use feed::{EventCatalog, Feed, UpdateItem};
pub use intro::{IntroGate, IntroLatch};
pub use layout::{Measurements, ScrollDecision};
pub use loader::{load_feed, report_failure, Response, Transport};
pub use rows::{Board, Expansion, PendingTimer, RowClasses, RowKey, RowState, TimerTable};
