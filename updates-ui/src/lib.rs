use leptos::*;
use std::cell::RefCell;
use updates_core::{report_failure, IntroGate, IntroLatch, WidgetConfig};
use wasm_bindgen::prelude::*;

mod app;
mod bridge;
mod dom;
mod logging;

pub use app::UpdatesWidget;
pub use bridge::FetchTransport;

/// Element the rows are rendered into.
pub const MOUNT_SELECTOR: &str = "#updates-content";

/// Optional page-provided configuration object (or JSON string).
const CONFIG_GLOBAL: &str = "__UPDATES_CONFIG__";

thread_local! {
    static INTRO: RefCell<IntroLatch> = RefCell::new(IntroLatch::default());
}

/// Called by the page once its intro animation has finished.
#[wasm_bindgen(js_name = introFinished)]
pub fn intro_finished() {
    INTRO.with(|latch| latch.borrow_mut().finish());
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let (config, config_error) = match dom::read_config(CONFIG_GLOBAL) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (WidgetConfig::default(), Some(e)),
    };
    logging::init(&config);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "ignoring invalid widget config");
    }

    let container = match dom::mount_point(MOUNT_SELECTOR) {
        Ok(container) => container,
        Err(err) => {
            let endpoints = config.endpoints.clone();
            spawn_local(async move {
                report_failure(&FetchTransport, &endpoints, &err).await;
            });
            return Ok(());
        }
    };

    let intro = if config.wait_for_intro {
        INTRO.with(|latch| latch.borrow_mut().gate())
    } else {
        IntroGate::ready()
    };

    container.set_inner_html("");
    mount_to(container, move || view! { <UpdatesWidget config=config intro=intro /> });
    Ok(())
}
