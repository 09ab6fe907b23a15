//! Error taxonomy for submissions and graph construction.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::api::InputKind;

/// Everything that can go wrong between a form submit and a rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
	/// A required form field was empty.
	#[error("{0}")]
	Validation(String),

	/// `fetch` rejected or a browser API call failed.
	#[error("{0}")]
	Transport(String),

	/// The server answered with a non-2xx status.
	#[error("{0}")]
	Server(String),

	/// The response was not `application/json`.
	#[error("Invalid response format from server")]
	InvalidResponseFormat,

	/// The server found nothing to draw.
	#[error(
		"No entities found in the {}. Try a different {} with named entities like people, organizations, locations, etc.",
		.0.subject(),
		.0.noun()
	)]
	NoEntities(InputKind),

	/// `nodes` or `edges` was missing or not an array.
	#[error("Invalid graph data received from server")]
	InvalidGraphData,

	/// The renderer could not be built from otherwise valid data.
	#[error("Error initializing graph: {0}")]
	Render(String),
}

impl AppError {
	/// Text shown in the blocking alert.
	///
	/// Failures raised while talking to the server carry an `Error: ` prefix;
	/// everything detected locally is shown verbatim.
	pub fn alert_message(&self) -> String {
		match self {
			Self::Transport(_) | Self::Server(_) | Self::InvalidResponseFormat => {
				format!("Error: {self}")
			}
			_ => self.to_string(),
		}
	}

	/// Wraps a rejected promise or failed `web-sys` call.
	pub fn from_js(value: JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &JsValue::from_str("message"))
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{value:?}"));
		Self::Transport(message)
	}
}

impl From<JsValue> for AppError {
	fn from(value: JsValue) -> Self {
		Self::from_js(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_side_failures_are_prefixed() {
		assert_eq!(
			AppError::Server("Server error: 500".into()).alert_message(),
			"Error: Server error: 500"
		);
		assert_eq!(
			AppError::InvalidResponseFormat.alert_message(),
			"Error: Invalid response format from server"
		);
		assert_eq!(
			AppError::Transport("Failed to fetch".into()).alert_message(),
			"Error: Failed to fetch"
		);
	}

	#[test]
	fn local_failures_are_shown_verbatim() {
		assert_eq!(
			AppError::Validation("Please enter some text".into()).alert_message(),
			"Please enter some text"
		);
		assert_eq!(
			AppError::InvalidGraphData.alert_message(),
			"Invalid graph data received from server"
		);
	}

	#[test]
	fn no_entities_message_names_the_input() {
		let text = AppError::NoEntities(InputKind::Text).to_string();
		assert!(text.starts_with("No entities found in the text. Try a different text"));

		let url = AppError::NoEntities(InputKind::Url).to_string();
		assert!(url.starts_with("No entities found in the URL content. Try a different URL"));
		assert!(url.ends_with("people, organizations, locations, etc."));
	}
}
