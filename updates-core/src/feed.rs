use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of `GET /api/updates`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub platform_name: String,
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub time_ago: String,
    #[serde(default)]
    pub full_date: String,
    #[serde(default)]
    pub update_event: Option<String>,
    #[serde(default)]
    pub update_desc: Option<String>,
}

impl UpdateItem {
    /// Link target, if the item has a non-empty one.
    pub fn link(&self) -> Option<&str> {
        self.platform_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Tooltip for the link: the URL without its scheme.
    pub fn link_title(&self) -> Option<String> {
        let raw = self.link()?;
        let Ok(parsed) = url::Url::parse(raw) else {
            return Some(raw.to_string());
        };
        let href = parsed.as_str();
        let stripped = href
            .strip_prefix("https://")
            .or_else(|| href.strip_prefix("http://"))
            .unwrap_or(href);
        Some(stripped.to_string())
    }

    /// Fixed label shown in front of the detail text.
    pub fn expanded_label(&self) -> String {
        format!("{}:", self.platform_name)
    }

    /// `"<description> <separator> <full_date>"`, or just the date when
    /// nothing describes the event.
    pub fn detail_text(&self, catalog: &EventCatalog, separator: &str) -> String {
        let description = catalog.describe(self);
        if description.is_empty() {
            return self.full_date.clone();
        }
        format!("{description} {separator} {}", self.full_date)
    }
}

/// Event-type key → human readable description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCatalog(BTreeMap<String, String>);

impl EventCatalog {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves an item's description. Unknown keys fall back to the item's
    /// own `update_desc`, then to the raw key.
    pub fn describe(&self, item: &UpdateItem) -> String {
        let key = item.update_event.as_deref();
        if let Some(found) = key.and_then(|k| self.0.get(k)) {
            return found.clone();
        }
        if let Some(desc) = item.update_desc.as_deref().filter(|d| !d.is_empty()) {
            return desc.to_string();
        }
        key.unwrap_or_default().to_string()
    }
}

/// Everything a render needs, fetched once per page view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feed {
    pub items: Vec<UpdateItem>,
    pub catalog: EventCatalog,
}
