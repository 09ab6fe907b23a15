use entity_graph_client::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
