use js_sys::Reflect;
use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::{html, NodeRef};
use updates_core::{FeedError, Measurements, PendingTimer, WidgetConfig};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

/// Auto-collapse timer scheduled through `setTimeout`.
#[derive(Clone, Copy)]
pub struct CollapseTimer(pub TimeoutHandle);

impl PendingTimer for CollapseTimer {
    fn cancel(self) {
        self.0.clear();
    }
}

pub fn mount_point(selector: &str) -> Result<HtmlElement, FeedError> {
    let missing = || FeedError::MissingMount(selector.to_string());
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(missing)?;
    let element = document
        .query_selector(selector)
        .ok()
        .flatten()
        .ok_or_else(missing)?;
    element.dyn_into::<HtmlElement>().map_err(|_| missing())
}

/// Reads `window[global]`, accepting either a plain object or a JSON string.
pub fn read_config(global: &str) -> Result<Option<WidgetConfig>, String> {
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;
    let value = Reflect::get(&window, &JsValue::from_str(global))
        .map_err(|_| format!("failed to access {global}"))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(text) = value.as_string() {
        return WidgetConfig::from_json(&text)
            .map(Some)
            .map_err(|e| e.to_string());
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Widths of an expanded row, or `None` if any element is not mounted.
pub fn measure(
    row: NodeRef<html::Div>,
    label: NodeRef<html::Span>,
    detail: NodeRef<html::Div>,
) -> Option<Measurements> {
    let row = row.get_untracked()?;
    let label = label.get_untracked()?;
    let detail = detail.get_untracked()?;
    Some(Measurements {
        row_width: f64::from(row.client_width()),
        label_width: f64::from(label.offset_width()),
        text_width: f64::from(detail.offset_width()),
    })
}
