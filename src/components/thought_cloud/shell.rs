use leptos::ev;
use leptos::prelude::*;
use log::info;

use super::component::ThoughtCloudCanvas;
use super::config::VisualizerConfig;
use super::selection::{ViewState, filter_nodes};
use super::state::SceneEvent;
use super::types::{DisplayNode, ThoughtRecord, build_display_nodes};

/// The thought cloud with its header, search box, reset control and info
/// panel.
///
/// `thoughts` is `None` while the caller is still loading.
#[component]
pub fn ThoughtCloud(
	#[prop(into)] thoughts: Signal<Option<Vec<ThoughtRecord>>>,
	#[prop(optional)] config: VisualizerConfig,
) -> impl IntoView {
	let nodes = Memo::new(move |_| {
		let nodes = thoughts.with(|t| t.as_deref().map(build_display_nodes).unwrap_or_default());
		info!("thought cloud: {} nodes", nodes.len());
		nodes
	});
	let view_state = RwSignal::new(ViewState::default());

	// A new thought list starts from a clean selection.
	Effect::new(move |initialized: Option<()>| {
		nodes.track();
		if initialized.is_some() {
			view_state.update(|v| *v = v.clear());
		}
	});

	let active = Memo::new(move |_| {
		let query = view_state.with(|v| v.query.clone());
		nodes.with(|all| filter_nodes(all, &query))
	});
	let selected_node: Memo<Option<DisplayNode>> =
		Memo::new(move |_| active.with(|a| view_state.with(|v| v.selected_node(a).cloned())));
	let selected_id = Signal::derive(move || selected_node.with(|n| n.as_ref().map(|n| n.id.clone())));

	let on_event = Callback::new(move |event: SceneEvent| match event {
		SceneEvent::NodeClicked(id) => {
			let active = active.get_untracked();
			view_state.update(|v| *v = v.toggle(&id, &active));
		}
		SceneEvent::BackgroundClicked => view_state.update(|v| *v = v.clear()),
	});

	let on_input = move |ev: ev::Event| {
		let query = event_target_value(&ev);
		let all = nodes.get_untracked();
		view_state.update(|v| *v = v.set_query(query, &all));
	};
	let clear_query = move |_: ev::MouseEvent| {
		let all = nodes.get_untracked();
		view_state.update(|v| *v = v.set_query("", &all));
	};
	let reset_view = move |_: ev::MouseEvent| view_state.update(|v| *v = v.clear());
	let query = move || view_state.with(|v| v.query.clone());

	let empty = move || nodes.with(Vec::is_empty);

	view! {
		<Show
			when=move || !empty()
			fallback=|| {
				view! {
					<div class="thought-cloud-empty">
						<h2>"No thoughts to show yet"</h2>
						<p>"Capture a few thoughts and they will gather here."</p>
					</div>
				}
			}
		>
			<div class="thought-cloud">
				<div class="thought-cloud-header">
					<h1>"The Thought Cloud"</h1>
					<p class="subtitle">"Similar thoughts cluster together. Click a node to focus."</p>
					<p class="count">
						{move || format!("{} of {} thoughts", active.with(Vec::len), nodes.with(Vec::len))}
					</p>
				</div>

				<div class="thought-cloud-search">
					<input
						type="text"
						placeholder="Search your thoughts..."
						prop:value=query
						on:input=on_input
					/>
					<Show when=move || !query().is_empty()>
						<button class="clear-search" on:click=clear_query>
							"×"
						</button>
					</Show>
				</div>

				// remount per thought list so camera and marker state start fresh
				<div class="thought-cloud-canvas-wrap">
					{
						let config = config.clone();
						move || {
							nodes.track();
							view! {
								<ThoughtCloudCanvas
									nodes=active
									selected=selected_id
									on_event=on_event
									config=config.clone()
								/>
							}
						}
					}
				</div>

				<InfoPanel thought=selected_node />

				<button class="reset-view" on:click=reset_view>
					"Reset View"
				</button>
			</div>
		</Show>
	}
}

/// Overlay describing the selected thought. The excerpt opens on demand and
/// closes again whenever the selection changes.
#[component]
fn InfoPanel(#[prop(into)] thought: Signal<Option<DisplayNode>>) -> impl IntoView {
	let show_excerpt = RwSignal::new(false);
	Effect::new(move |_| {
		thought.track();
		show_excerpt.set(false);
	});

	let class = move || {
		if thought.with(Option::is_some) {
			"info-panel"
		} else {
			"info-panel hidden"
		}
	};

	view! {
		<div class=class>
			{move || {
				thought
					.get()
					.map(|t| {
						let chip = format!("background: {}", t.color.css());
						let excerpt = t.excerpt.clone();
						view! {
							<p class="title">{t.title.clone()}</p>
							<span class="label-chip" style=chip>
								{format!("cluster {}", t.label)}
							</span>
							<button on:click=move |_: ev::MouseEvent| show_excerpt.update(|s| *s = !*s)>
								{move || if show_excerpt.get() { "Hide excerpt" } else { "Show excerpt" }}
							</button>
							<Show when=move || show_excerpt.get()>
								<p class="excerpt">{excerpt.clone()}</p>
							</Show>
						}
					})
			}}
		</div>
	}
}
