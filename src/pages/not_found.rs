use leptos::prelude::*;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="container not-found">
			<h1>"Page not found"</h1>
			<p>
				<a href="/">"Back to the graph generator"</a>
			</p>
		</main>
	}
}
