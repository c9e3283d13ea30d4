use leptos::prelude::*;
use log::info;

use crate::catalog::ExamplesCatalog;
use crate::components::graph_canvas::GraphCanvas;
use crate::graph::{LayoutName, Overlay};

/// Example picker with layout and weight controls around the graph canvas.
#[component]
pub fn Examples() -> impl IntoView {
	let items = StoredValue::new(ExamplesCatalog.list());
	let selected = RwSignal::new(ExamplesCatalog.get_default().id);
	let layout = RwSignal::new(LayoutName::default());
	let show_weights = RwSignal::new(false);

	let graph = Signal::derive(move || {
		let id = selected.get();
		items.with_value(|items| {
			items
				.iter()
				.find(|item| item.id == id)
				.map(|item| item.graph.clone())
				.unwrap_or_default()
		})
	});
	let overlay = Signal::derive(move || Overlay::weights(show_weights.get()));

	let list = items.with_value(|items| {
		items
			.iter()
			.map(|item| {
				let id = item.id;
				view! {
					<li>
						<button
							class:active=move || selected.get() == id
							on:click=move |_| {
								info!("Selected example {id}");
								selected.set(id);
							}
						>
							<strong>{item.title}</strong>
							<span class="description">{item.description}</span>
						</button>
					</li>
				}
			})
			.collect_view()
	});

	let layout_options = LayoutName::ALL
		.into_iter()
		.map(|name| {
			view! {
				<option value=name.as_str() selected=move || layout.get() == name>
					{name.as_str()}
				</option>
			}
		})
		.collect_view();

	view! {
		<div class="examples-page">
			<aside class="examples-list">
				<h2>"Examples"</h2>
				<ul>{list}</ul>
			</aside>
			<section class="examples-canvas">
				<div class="toolbar">
					<label>
						"Layout "
						<select on:change=move |ev| {
							layout.set(LayoutName::parse(&event_target_value(&ev)))
						}>{layout_options}</select>
					</label>
					<label>
						<input
							type="checkbox"
							prop:checked=move || show_weights.get()
							on:change=move |ev| show_weights.set(event_target_checked(&ev))
						/>
						" Show weights"
					</label>
				</div>
				<GraphCanvas data=graph overlay=overlay layout=layout />
			</section>
		</div>
	}
}
