use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

#[derive(Deserialize)]
struct ErrorBody {
	error: String,
}

/// Decides what a finished HTTP exchange means for the caller.
///
/// Only JSON bodies are considered; a failing status surfaces the server's
/// `error` field when there is one.
pub fn interpret_response(
	status: u16,
	content_type: Option<&str>,
	body: &str,
) -> Result<Value, AppError> {
	if !content_type.is_some_and(|ct| ct.contains("application/json")) {
		return Err(AppError::InvalidResponseFormat);
	}

	let data: Value =
		serde_json::from_str(body).map_err(|e| AppError::Transport(e.to_string()))?;

	if !(200..300).contains(&status) {
		return Err(match ErrorBody::deserialize(&data) {
			Ok(ErrorBody { error }) if !error.is_empty() => AppError::Server(error),
			_ => AppError::Server(format!("Server error: {status}")),
		});
	}

	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::*;

	const JSON: Option<&str> = Some("application/json");

	#[test]
	fn ok_json_is_passed_through() {
		let value = interpret_response(200, JSON, r#"{"nodes":[],"edges":[]}"#).unwrap();
		assert!(value["nodes"].is_array());
	}

	#[test]
	fn charset_suffix_is_accepted() {
		assert!(interpret_response(200, Some("application/json; charset=utf-8"), "{}").is_ok());
	}

	#[test]
	fn non_json_content_type_is_rejected() {
		assert_eq!(
			interpret_response(200, Some("text/html"), "<html></html>"),
			Err(AppError::InvalidResponseFormat)
		);
		assert_eq!(
			interpret_response(500, None, ""),
			Err(AppError::InvalidResponseFormat)
		);
	}

	#[test]
	fn server_error_message_is_used() {
		assert_eq!(
			interpret_response(400, JSON, r#"{"error":"Empty text provided"}"#),
			Err(AppError::Server("Empty text provided".into()))
		);
	}

	#[test]
	fn status_is_reported_without_error_field() {
		assert_eq!(
			interpret_response(502, JSON, r#"{"detail":"bad gateway"}"#),
			Err(AppError::Server("Server error: 502".into()))
		);
	}

	#[test]
	fn malformed_json_is_a_transport_failure() {
		assert!(matches!(
			interpret_response(200, JSON, "{not json"),
			Err(AppError::Transport(_))
		));
	}
}
