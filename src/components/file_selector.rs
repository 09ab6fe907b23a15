use leptos::html::Input;
use leptos::prelude::*;
use web_sys::{Event, File};

pub const NO_FILE: &str = "No file chosen";

/// Text shown next to the picker.
pub fn file_label(name: Option<String>) -> String {
	name.unwrap_or_else(|| NO_FILE.to_string())
}

/// First file currently selected in `input`, if any.
pub fn selected_file(input: NodeRef<Input>) -> Option<File> {
	input.get()?.files()?.get(0)
}

/// Native file picker plus a label mirroring its selection.
#[component]
pub fn FileSelector(input_ref: NodeRef<Input>) -> impl IntoView {
	let (name, set_name) = signal(file_label(None));
	let on_change = move |_: Event| {
		set_name.set(file_label(selected_file(input_ref).map(|f| f.name())));
	};

	view! {
		<div class="file-selector">
			<label class="file-btn" for="file-input">"Choose File"</label>
			<input
				type="file"
				id="file-input"
				name="file"
				accept=".txt,.pdf"
				node_ref=input_ref
				on:change=on_change
			/>
			<span id="file-name">{name}</span>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placeholder_until_a_file_is_chosen() {
		assert_eq!(file_label(None), "No file chosen");
		assert_eq!(file_label(Some("report.pdf".into())), "report.pdf");
	}
}
