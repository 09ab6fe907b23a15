use leptos::prelude::*;

/// The mutually exclusive input panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tab {
	#[default]
	Text,
	File,
	Url,
}

impl Tab {
	pub const ALL: [Tab; 3] = [Tab::Text, Tab::File, Tab::Url];

	/// Value of the `data-tab` attribute.
	pub fn key(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::File => "file",
			Self::Url => "url",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::Text => "Text",
			Self::File => "File",
			Self::Url => "URL",
		}
	}

	pub fn panel_id(self) -> String {
		format!("{}-tab", self.key())
	}

	/// Class list for this tab's button or panel given the active tab.
	pub fn class(self, base: &str, active: Tab) -> String {
		if self == active {
			format!("{base} active")
		} else {
			base.to_string()
		}
	}
}

#[component]
pub fn TabBar(active: RwSignal<Tab>) -> impl IntoView {
	view! {
		<div class="tabs">
			{Tab::ALL
				.into_iter()
				.map(|tab| {
					view! {
						<button
							type="button"
							class=move || tab.class("tab-btn", active.get())
							data-tab=tab.key()
							on:click=move |_| active.set(tab)
						>
							{tab.title()}
						</button>
					}
				})
				.collect_view()}
		</div>
	}
}

#[component]
pub fn TabPanel(tab: Tab, active: RwSignal<Tab>, children: Children) -> impl IntoView {
	view! {
		<div id=tab.panel_id() class=move || tab.class("tab-content", active.get()) data-tab=tab.key()>
			{children()}
		</div>
	}
}
