use js_sys::Uint8Array;
use shipsfrom_engine::{FailureKind, FetchError, FetchMetadata, FetchOutput, FetchSettings, Fetcher};
use shipsfrom_logging::filter_trace;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Same-origin page fetches through `window.fetch`, so the shopper's session cookies apply.
pub(crate) struct BrowserFetcher {
    settings: FetchSettings,
}

impl BrowserFetcher {
    pub(crate) fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait(?Send)]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let window = web_sys::window()
            .ok_or_else(|| FetchError::new(FailureKind::Network, "no window"))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(network_error)?;
        let response: Response = response.dyn_into().map_err(network_error)?;

        if !response.ok() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(response.status()),
                response.status_text(),
            ));
        }

        let content_type = response.headers().get("content-type").ok().flatten();
        if let Some(ct) = content_type.as_deref() {
            if !self.settings.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let buffer = JsFuture::from(response.array_buffer().map_err(network_error)?)
            .await
            .map_err(network_error)?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        let byte_len = bytes.len() as u64;
        if byte_len > self.settings.max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(byte_len),
                },
                "response too large",
            ));
        }
        filter_trace!("fetched {byte_len} bytes from {url}");

        Ok(FetchOutput {
            bytes,
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: response.url(),
                redirect_count: usize::from(response.redirected()),
                content_type,
                byte_len,
            },
        })
    }
}

fn network_error(err: JsValue) -> FetchError {
    FetchError::new(FailureKind::Network, format!("{err:?}"))
}
