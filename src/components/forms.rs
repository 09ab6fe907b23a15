//! The three input forms. Each only gathers its field and hands it upward.

use leptos::ev::SubmitEvent;
use leptos::html::{Input, Textarea};
use leptos::prelude::*;
use web_sys::File;

use super::file_selector::{FileSelector, selected_file};
use crate::error::AppError;

/// Trimmed text, or the message asking for some.
pub fn require_text(raw: &str) -> Result<String, AppError> {
	require(raw, "Please enter some text")
}

pub fn require_url(raw: &str) -> Result<String, AppError> {
	require(raw, "Please enter a URL")
}

pub fn require_file(file: Option<File>) -> Result<File, AppError> {
	file.ok_or_else(|| AppError::Validation("Please select a file".into()))
}

fn require(raw: &str, message: &str) -> Result<String, AppError> {
	match raw.trim() {
		"" => Err(AppError::Validation(message.into())),
		value => Ok(value.to_string()),
	}
}

#[component]
pub fn TextForm(on_submit: Callback<String>) -> impl IntoView {
	let input_ref = NodeRef::<Textarea>::new();
	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		on_submit.run(input_ref.get().map(|i| i.value()).unwrap_or_default());
	};

	view! {
		<form id="text-form" on:submit=submit>
			<textarea
				id="text-input"
				node_ref=input_ref
				rows="10"
				placeholder="Paste or type text containing people, organizations, places..."
			></textarea>
			<button type="submit" class="submit-btn">"Generate Graph"</button>
		</form>
	}
}

#[component]
pub fn FileForm(on_submit: Callback<Option<File>>) -> impl IntoView {
	let input_ref = NodeRef::<Input>::new();
	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		on_submit.run(selected_file(input_ref));
	};

	view! {
		<form id="file-form" on:submit=submit>
			<FileSelector input_ref=input_ref />
			<p class="hint">"Supported formats: .txt, .pdf"</p>
			<button type="submit" class="submit-btn">"Generate Graph"</button>
		</form>
	}
}

#[component]
pub fn UrlForm(on_submit: Callback<String>) -> impl IntoView {
	let input_ref = NodeRef::<Input>::new();
	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		on_submit.run(input_ref.get().map(|i| i.value()).unwrap_or_default());
	};

	view! {
		<form id="url-form" on:submit=submit>
			<input type="url" id="url-input" node_ref=input_ref placeholder="https://example.com/article" />
			<button type="submit" class="submit-btn">"Generate Graph"</button>
		</form>
	}
}
