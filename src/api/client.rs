use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Headers, Request, RequestInit, Response};

use super::response::interpret_response;
use crate::config::ClientConfig;
use crate::error::AppError;

#[derive(Serialize)]
struct TextRequest<'a> {
	text: &'a str,
}

#[derive(Serialize)]
struct UrlRequest<'a> {
	url: &'a str,
}

/// Thin `fetch` wrapper around the three extraction endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
	config: ClientConfig,
}

impl ApiClient {
	pub fn new(config: ClientConfig) -> Self {
		Self { config }
	}

	pub async fn process_text(&self, text: &str) -> Result<Value, AppError> {
		self.post_json(&self.config.text_endpoint, &TextRequest { text })
			.await
	}

	pub async fn process_url(&self, url: &str) -> Result<Value, AppError> {
		self.post_json(&self.config.url_endpoint, &UrlRequest { url })
			.await
	}

	/// Uploads `file` as the multipart field `file`.
	pub async fn process_file(&self, file: &File) -> Result<Value, AppError> {
		let form = FormData::new()?;
		form.append_with_blob_and_filename("file", file, &file.name())?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_body(&form.into());
		self.send(&self.config.file_endpoint, &opts).await
	}

	async fn post_json<T: Serialize>(&self, path: &str, data: &T) -> Result<Value, AppError> {
		let body = serde_json::to_string(data).map_err(|e| AppError::Transport(e.to_string()))?;

		let headers = Headers::new()?;
		headers.set("Content-Type", "application/json")?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_headers(&headers);
		opts.set_body(&JsValue::from_str(&body));
		self.send(path, &opts).await
	}

	async fn send(&self, path: &str, opts: &RequestInit) -> Result<Value, AppError> {
		let url = self.config.resolve(path);
		let request = Request::new_with_str_and_init(&url, opts)?;
		let window =
			web_sys::window().ok_or_else(|| AppError::Transport("No window available".into()))?;

		log::debug!("POST {url}");
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await?
			.dyn_into()?;

		let status = response.status();
		let content_type = response.headers().get("content-type")?;
		let body = JsFuture::from(response.text()?)
			.await?
			.as_string()
			.unwrap_or_default();
		log::debug!("{url} answered {status}");

		interpret_response(status, content_type.as_deref(), &body)
	}
}
