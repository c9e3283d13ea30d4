use leptos::prelude::*;
use leptos_router::components::A;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="home">
			<h1>"Control-Flow Graphs"</h1>
			<p class="subtitle">
				"Step through small programs drawn as graphs: entry and exit, decisions and loops. "
				"Edge weights, spanning-tree edges, execution counters and the current position are "
				"drawn on top of the chosen layout."
			</p>
			<A href="/examples">"Browse examples"</A>
		</div>
	}
}
