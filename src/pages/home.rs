use std::future::Future;

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use web_sys::File;

use crate::api::{ApiClient, InputKind};
use crate::components::force_graph::{ForceGraphCanvas, GraphData, NodeSelection};
use crate::components::forms::{FileForm, TextForm, UrlForm, require_file, require_text, require_url};
use crate::components::tabs::{Tab, TabBar, TabPanel};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::graph::{BrowserTokens, TokenSource, prepare_graph};

fn browser_alert(message: &str) {
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(message);
	}
}

/// Result of one submission, ready to be shown.
fn settle<T: TokenSource>(
	result: Result<Value, AppError>,
	kind: InputKind,
	tokens: &mut T,
) -> Result<GraphData, AppError> {
	result.and_then(|body| prepare_graph(&body, kind, tokens))
}

/// State behind the three submit handlers.
///
/// Overlapping submissions are not serialised: whichever response arrives
/// last decides what is shown.
#[derive(Clone)]
struct Controller {
	client: ApiClient,
	loading: RwSignal<bool>,
	graph: RwSignal<Option<GraphData>>,
	/// Where user-facing error messages go.
	alert: fn(&str),
}

impl Controller {
	fn new(config: ClientConfig) -> Self {
		Self {
			client: ApiClient::new(config),
			loading: RwSignal::new(false),
			graph: RwSignal::new(None),
			alert: browser_alert,
		}
	}

	fn submit_text(&self, raw: String) {
		match require_text(&raw) {
			Ok(text) => {
				let client = self.client.clone();
				self.dispatch(InputKind::Text, async move { client.process_text(&text).await });
			}
			Err(err) => self.report(err),
		}
	}

	fn submit_file(&self, file: Option<File>) {
		match require_file(file) {
			Ok(file) => {
				log::info!("Uploading {} ({} bytes)", file.name(), file.size());
				let client = self.client.clone();
				self.dispatch(InputKind::File, async move { client.process_file(&file).await });
			}
			Err(err) => self.report(err),
		}
	}

	fn submit_url(&self, raw: String) {
		match require_url(&raw) {
			Ok(url) => {
				let client = self.client.clone();
				self.dispatch(InputKind::Url, async move { client.process_url(&url).await });
			}
			Err(err) => self.report(err),
		}
	}

	fn dispatch<F>(&self, kind: InputKind, request: F)
	where
		F: Future<Output = Result<Value, AppError>> + 'static,
	{
		log::info!("Submitting {kind:?} input");
		self.loading.set(true);
		let this = self.clone();
		spawn_local(async move {
			let result = request.await;
			this.complete(kind, result);
		});
	}

	fn complete(&self, kind: InputKind, result: Result<Value, AppError>) {
		self.complete_with(kind, result, &mut BrowserTokens);
	}

	fn complete_with<T: TokenSource>(
		&self,
		kind: InputKind,
		result: Result<Value, AppError>,
		tokens: &mut T,
	) {
		match settle(result, kind, tokens) {
			Ok(data) => {
				log::info!(
					"Rendering {} entities and {} relations",
					data.nodes.len(),
					data.links.len()
				);
				self.graph.set(Some(data));
			}
			Err(err) => self.report(err),
		}
		self.loading.set(false);
	}

	/// Hides the spinner and any graph, then tells the user what went wrong.
	fn report(&self, err: AppError) {
		let message = err.alert_message();
		self.loading.set(false);
		self.graph.set(None);
		log::error!("{message}");
		(self.alert)(&message);
	}
}

/// Input tabs, loading indicator and the resulting graph.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<ClientConfig>().unwrap_or_else(ClientConfig::from_env);
	let (physics, tooltip_delay) = (config.physics.clone(), config.tooltip_delay);

	let active_tab = RwSignal::new(Tab::default());
	let controller = Controller::new(config);
	let (loading, graph) = (controller.loading, controller.graph);

	let on_text = {
		let c = controller.clone();
		Callback::new(move |raw: String| c.submit_text(raw))
	};
	let on_file = {
		let c = controller.clone();
		Callback::new(move |file: Option<File>| c.submit_file(file))
	};
	let on_url = {
		let c = controller.clone();
		Callback::new(move |raw: String| c.submit_url(raw))
	};

	let on_select = Callback::new(|selection: NodeSelection| {
		log::info!(
			"Selected node: {} ({}, {})",
			selection.label,
			selection.id,
			selection.entity_type.as_deref().unwrap_or("Unknown")
		);
	});
	let on_error = Callback::new(move |err: AppError| controller.report(err));

	let visible = |shown: bool| if shown { "block" } else { "none" };
	let node_count = move || {
		graph.with(|g| g.as_ref().map_or_else(|| "Nodes: 0".into(), GraphData::node_count_label))
	};
	let edge_count = move || {
		graph.with(|g| g.as_ref().map_or_else(|| "Edges: 0".into(), GraphData::edge_count_label))
	};

	view! {
		<main class="container">
			<header>
				<h1>"Knowledge Graph Generator"</h1>
				<p class="subtitle">
					"Extract entities and relationships from text, documents or web pages."
				</p>
			</header>

			<section class="input-section">
				<TabBar active=active_tab />
				<TabPanel tab=Tab::Text active=active_tab>
					<TextForm on_submit=on_text />
				</TabPanel>
				<TabPanel tab=Tab::File active=active_tab>
					<FileForm on_submit=on_file />
				</TabPanel>
				<TabPanel tab=Tab::Url active=active_tab>
					<UrlForm on_submit=on_url />
				</TabPanel>
			</section>

			<div id="loading" class="loading" style:display=move || visible(loading.get())>
				<div class="spinner"></div>
				<p>"Processing... This may take a moment."</p>
			</div>

			<section
				id="graph-container"
				class="graph-container"
				style:display=move || visible(graph.with(Option::is_some))
			>
				<div class="graph-info">
					<span id="node-count">{node_count}</span>
					<span id="edge-count">{edge_count}</span>
				</div>
				<div id="graph">
					{move || {
						graph
							.get()
							.map(|data| {
								view! {
									<ForceGraphCanvas
										data=data
										physics=physics.clone()
										tooltip_delay=tooltip_delay
										on_select=on_select
										on_error=on_error
									/>
								}
							})
					}}
				</div>
			</section>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use serde_json::json;

	use super::*;
	use crate::api::interpret_response;

	thread_local! {
		static ALERTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
	}

	fn record_alert(message: &str) {
		ALERTS.with(|a| a.borrow_mut().push(message.to_string()));
	}

	fn take_alerts() -> Vec<String> {
		ALERTS.with(|a| a.take())
	}

	/// A controller mid-request, with a stale graph still on screen.
	fn busy_controller() -> Controller {
		let controller = Controller {
			alert: record_alert,
			..Controller::new(ClientConfig::default())
		};
		controller.loading.set(true);
		controller.graph.set(Some(GraphData::default()));
		controller
	}

	struct Fixed;

	impl TokenSource for Fixed {
		fn next_token(&mut self) -> String {
			"abc123xyz".into()
		}
	}

	const JSON: Option<&str> = Some("application/json");

	#[test]
	fn person_response_renders_with_counts() {
		let body = r#"{"nodes":[{"id":"a","label":"Alice","type":"PERSON"}],"edges":[]}"#;
		let data = settle(interpret_response(200, JSON, body), InputKind::Text, &mut Fixed).unwrap();
		assert_eq!(data.nodes[0].color, "#e74c3c");
		assert_eq!(data.node_count_label(), "Nodes: 1");
		assert_eq!(data.edge_count_label(), "Edges: 0");
	}

	#[test]
	fn empty_result_asks_for_different_input() {
		let body = r#"{"nodes":[],"edges":[]}"#;
		let err = settle(interpret_response(200, JSON, body), InputKind::Url, &mut Fixed)
			.unwrap_err();
		assert!(
			err.alert_message()
				.starts_with("No entities found in the URL content.")
		);
	}

	#[test]
	fn server_rejection_is_reported_not_rendered() {
		let body = r#"{"error":"No entities found in the text. Try a different text with named entities."}"#;
		let err = settle(interpret_response(400, JSON, body), InputKind::Text, &mut Fixed)
			.unwrap_err();
		assert_eq!(
			err.alert_message(),
			"Error: No entities found in the text. Try a different text with named entities."
		);
	}

	#[test]
	fn malformed_graph_is_invalid() {
		let result = Ok(json!({"nodes": [{"id": "a"}]}));
		assert_eq!(
			settle(result, InputKind::Text, &mut Fixed),
			Err(AppError::InvalidGraphData)
		);
	}

	#[test]
	fn duplicate_ids_both_survive() {
		let result = Ok(json!({
			"nodes": [{"id": "dup", "label": "One"}, {"id": "dup", "label": "Two"}],
			"edges": [{"id": "e", "source": "dup", "target": "dup-abc123xyz"}]
		}));
		let data = settle(result, InputKind::File, &mut Fixed).unwrap();
		assert_eq!(data.nodes[0].id, "dup");
		assert_eq!(data.nodes[1].id, "dup-abc123xyz");
		assert_eq!(data.node_count_label(), "Nodes: 2");
	}

	#[test]
	fn empty_result_clears_graph_and_alerts_once() {
		let owner = Owner::new();
		owner.set();
		take_alerts();

		let c = busy_controller();
		c.complete_with(InputKind::Text, Ok(json!({"nodes": [], "edges": []})), &mut Fixed);

		assert!(c.graph.get().is_none());
		assert!(!c.loading.get());
		let alerts = take_alerts();
		assert_eq!(alerts.len(), 1);
		assert!(alerts[0].starts_with("No entities found in the text."), "{}", alerts[0]);
	}

	#[test]
	fn body_without_arrays_is_reported_as_invalid() {
		let owner = Owner::new();
		owner.set();
		take_alerts();

		let c = busy_controller();
		c.complete_with(InputKind::Url, Ok(json!({"result": "ok"})), &mut Fixed);

		assert!(c.graph.get().is_none());
		assert!(!c.loading.get());
		assert_eq!(take_alerts(), ["Invalid graph data received from server"]);
	}

	#[test]
	fn transport_failure_is_prefixed() {
		let owner = Owner::new();
		owner.set();
		take_alerts();

		let c = busy_controller();
		let err = AppError::Transport("Failed to fetch".into());
		c.complete_with(InputKind::File, Err(err), &mut Fixed);

		assert!(c.graph.get().is_none());
		assert!(!c.loading.get());
		assert_eq!(take_alerts(), ["Error: Failed to fetch"]);
	}

	#[test]
	fn success_shows_graph_without_alerting() {
		let owner = Owner::new();
		owner.set();
		take_alerts();

		let c = busy_controller();
		let body = json!({
			"nodes": [{"id": "a", "label": "Alice", "type": "PERSON"}, {"id": "b", "label": "Acme"}],
			"edges": [{"source": "a", "target": "b", "label": "works at"}]
		});
		c.complete_with(InputKind::Text, Ok(body), &mut Fixed);

		assert!(!c.loading.get());
		let data = c.graph.get().unwrap();
		assert_eq!(data.node_count_label(), "Nodes: 2");
		assert_eq!(data.edge_count_label(), "Edges: 1");
		assert!(take_alerts().is_empty());
	}
}
