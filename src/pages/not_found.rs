use leptos::prelude::*;

/// 404 fallback page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Not Found"</h1>
			<p>"The page you requested does not exist."</p>
			<a href="/">"Back to the explorer"</a>
		</div>
	}
}
