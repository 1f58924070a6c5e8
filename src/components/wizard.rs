//! The RCA wizard page: search box, result messages, journey canvas and
//! detail drawer.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use serde_json::Value;
use web_sys::KeyboardEvent;

use crate::api::BacktraceClient;
use crate::components::detail_panel::DetailPanel;
use crate::components::journey_graph::{JourneyCanvas, Theme};
use crate::config::AppConfig;
use crate::journey::{JourneyNode, build_journey};
use crate::search::{SearchOutcome, SearchSession, start_search};

/// Submit button text for the current loading state.
pub fn submit_label(loading: bool) -> &'static str {
	if loading { "Searching…" } else { "Search parent routes" }
}

/// Search for the parent routes of a service or flow and draw them.
///
/// The button is disabled while a request is in flight. Pressing Enter in the
/// input starts a new search even then; the earlier answer is dropped when it
/// arrives, also when the new query turns out blank.
#[component]
pub fn RcaWizard(config: AppConfig) -> impl IntoView {
	let client = BacktraceClient::new(&config);
	let zoom_bounds = config.zoom_bounds();
	let canvas_height = config.canvas_height;
	let theme = Theme::by_name(&config.theme);

	let (query, set_query) = signal(String::new());
	let (loading, set_loading) = signal(false);
	let (routes, set_routes) = signal(Vec::<Value>::new());
	let (message, set_message) = signal(Option::<&'static str>::None);
	let (selected, set_selected) = signal(Option::<JourneyNode>::None);
	let session = StoredValue::new(SearchSession::default());

	let graph = Memo::new(move |_| routes.with(|r| build_journey(r)));

	let submit = Callback::new(move |()| {
		let input = query.get_untracked();
		let Some((ticket, validated)) = session.try_update_value(|s| start_search(s, &input)) else {
			return;
		};
		let search = match validated {
			Ok(search) => search,
			Err(err) => {
				set_loading.set(false);
				set_message.set(Some(err.user_message()));
				return;
			}
		};

		set_loading.set(true);
		set_message.set(None);
		set_routes.set(Vec::new());
		set_selected.set(None);
		info!("rca-journey: searching parent routes for {search:?}");

		let client = client.clone();
		spawn_local(async move {
			let result = client.backtrace(&search).await;
			if session.try_with_value(|s| s.is_current(ticket)) != Some(true) {
				warn!("rca-journey: dropped stale response for {search:?}");
				return;
			}
			if let Err(err) = &result {
				warn!("rca-journey: search for {search:?} failed: {err}");
			}
			let outcome = SearchOutcome::from_result(result);
			if let SearchOutcome::Routes(found) = &outcome {
				info!("rca-journey: {} routes for {search:?}", found.len());
			}
			set_message.set(outcome.message());
			set_routes.set(outcome.routes());
			set_loading.set(false);
		});
	});

	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			ev.prevent_default();
			submit.run(());
		}
	};

	view! {
		<main class="rca-wizard" style="max-width: 1280px; margin: 0 auto; padding: 24px; font-family: sans-serif;">
			<h1 style="margin: 0 0 8px;">"RCA Wizard"</h1>
			<p class="prompt">"Enter the service or flow to find the routes and transactions that can reach it."</p>

			<div class="search-bar" style="display: flex; gap: 8px; margin: 16px 0;">
				<input
					type="text"
					class="search-input"
					placeholder="e.g. CancelEmail"
					style="flex: 1; padding: 8px 12px;"
					prop:value=query
					on:input=move |ev| set_query.set(event_target_value(&ev))
					on:keydown=on_keydown
				/>
				<button
					type="button"
					class="search-button"
					disabled=move || loading.get()
					on:click=move |_| submit.run(())
				>
					{move || submit_label(loading.get())}
				</button>
			</div>

			{move || {
				message
					.get()
					.map(|text| {
						view! {
							<div class="alert alert-warning" role="alert" style="padding: 8px 12px; border-radius: 8px; background: #FFF3E0;">
								{text}
							</div>
						}
					})
			}}

			<Show when=move || routes.with(|r| !r.is_empty())>
				<h2 style="margin: 24px 0 12px;">"Routes found (journey visual)"</h2>
				<div class="journey-layout" style="display: flex; gap: 16px; align-items: stretch;">
					<div style="flex: 1; min-width: 0;">
						<JourneyCanvas
							graph=graph
							on_select=move |node: JourneyNode| set_selected.set(Some(node))
							zoom_bounds=zoom_bounds
							height=canvas_height
							theme=theme.clone()
						/>
					</div>
					<DetailPanel
						node=selected
						on_close=move |()| set_selected.set(None)
						theme=theme.clone()
					/>
				</div>
			</Show>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn button_reflects_loading() {
		assert_eq!(submit_label(false), "Search parent routes");
		assert_eq!(submit_label(true), "Searching…");
	}
}
