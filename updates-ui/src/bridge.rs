use updates_core::{FeedError, Response, Transport};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit};

/// [`Transport`] backed by the browser's `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn get(&self, url: &str) -> Result<Response, FeedError> {
        let init = RequestInit::new();
        init.set_method("GET");
        send(url, &init).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<Response, FeedError> {
        let headers = Headers::new().map_err(|e| js_error(url, &e))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| js_error(url, &e))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));
        send(url, &init).await
    }
}

async fn send(url: &str, init: &RequestInit) -> Result<Response, FeedError> {
    let window = web_sys::window().ok_or_else(|| FeedError::network(url, "window not available"))?;
    let request = Request::new_with_str_and_init(url, init).map_err(|e| js_error(url, &e))?;

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_error(url, &e))?;
    let response: web_sys::Response = value.dyn_into().map_err(|e| js_error(url, &e))?;

    let text = response.text().map_err(|e| js_error(url, &e))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|e| js_error(url, &e))?
        .as_string()
        .unwrap_or_default();

    Ok(Response {
        status: response.status(),
        body,
    })
}

fn js_error(url: &str, value: &JsValue) -> FeedError {
    let reason = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    FeedError::network(url, reason)
}
