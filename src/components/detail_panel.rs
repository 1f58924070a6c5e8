//! Side drawer showing the projected details of the selected node.

use leptos::prelude::*;

use crate::components::journey_graph::Theme;
use crate::journey::{JourneyNode, display_value, project_details};
use crate::journey::detail::is_structured;

/// One rendered row of the detail table.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailRow {
	pub key: String,
	pub text: String,
	/// Rendered as a preformatted JSON block.
	pub structured: bool,
}

/// Table rows for a node, in projection order.
pub fn detail_rows(node: &JourneyNode) -> Vec<DetailRow> {
	project_details(&node.record)
		.into_iter()
		.map(|field| DetailRow {
			text: display_value(field.value.as_ref()),
			structured: is_structured(field.value.as_ref()),
			key: field.key,
		})
		.collect()
}

/// Inline style of the type chip, colored like the node on the canvas.
pub fn chip_style(theme: &Theme, node: &JourneyNode) -> String {
	let colors = theme.kind_colors(node.style());
	format!(
		"display: inline-block; padding: 2px 10px; border-radius: 12px; font-size: 12px; \
		 font-weight: 600; background: {}; border: 1px solid {}; color: {};",
		colors.background.to_css(),
		colors.border.to_css(),
		theme.node.text_color.to_css()
	)
}

fn detail_body(node: JourneyNode, theme: &Theme) -> impl IntoView {
	let chip_style = chip_style(theme, &node);
	let type_name = node.kind.type_name().to_string();
	let rows = detail_rows(&node);

	view! {
		<span class="detail-chip" style=chip_style>{type_name}</span>
		<h3 class="detail-label" style="margin: 12px 0; word-break: break-word;">{node.label.clone()}</h3>
		{if rows.is_empty() {
			view! { <p class="detail-empty">"No additional details"</p> }.into_any()
		} else {
			view! {
				<table class="detail-table" style="width: 100%; border-collapse: collapse; font-size: 13px;">
					<tbody>
						{rows
							.into_iter()
							.map(|row| {
								let value = if row.structured {
									view! { <pre style="margin: 0; white-space: pre-wrap;">{row.text}</pre> }.into_any()
								} else {
									view! { <span>{row.text}</span> }.into_any()
								};
								view! {
									<tr>
										<th style="text-align: left; padding: 4px 8px 4px 0; vertical-align: top;">{row.key}</th>
										<td style="padding: 4px 0; word-break: break-word;">{value}</td>
									</tr>
								}
							})
							.collect_view()}
					</tbody>
				</table>
			}
			.into_any()
		}}
	}
}

/// Drawer listing the selected node's details, or a prompt when nothing is selected.
#[component]
pub fn DetailPanel(
	#[prop(into)] node: Signal<Option<JourneyNode>>,
	#[prop(into)] on_close: Callback<()>,
	#[prop(optional)] theme: Theme,
) -> impl IntoView {
	view! {
		<aside
			class="detail-panel"
			style="width: 340px; flex-shrink: 0; padding: 16px; border-radius: 12px; background: #fff; \
			       box-shadow: 0 2px 12px rgba(12, 50, 80, 0.11); overflow-y: auto;"
		>
			<header style="display: flex; justify-content: space-between; align-items: center;">
				<h2 style="margin: 0; font-size: 18px;">"Node details"</h2>
				<button type="button" title="Close" on:click=move |_| on_close.run(())>"×"</button>
			</header>
			{move || match node.get() {
				Some(selected) => detail_body(selected, &theme).into_any(),
				None => view! { <p class="detail-placeholder">"Select a node to view details"</p> }.into_any(),
			}}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::journey::build_journey;

	fn first_node(step: serde_json::Value) -> JourneyNode {
		let graph = build_journey(&[json!([step])]);
		graph.nodes[0].clone()
	}

	#[test]
	fn transaction_rows_follow_the_whitelist() {
		let node = first_node(json!({
			"type": "transaction",
			"transactionKey": "T1",
			"details": { "owner": "ops", "createTs": "" }
		}));
		let rows = detail_rows(&node);
		assert_eq!(rows[0].key, "serverKey");
		assert_eq!(rows[0].text, "-");
		let owner = rows.iter().find(|r| r.key == "owner").expect("owner row");
		assert_eq!(owner.text, "ops");
		let created = rows.iter().find(|r| r.key == "createTs").expect("createTs row");
		assert_eq!(created.text, "-");
	}

	#[test]
	fn nested_details_render_as_blocks() {
		let node = first_node(json!({
			"type": "server",
			"serverKey": "S1",
			"details": { "hosts": ["a", "b"], "region": "eu" }
		}));
		let rows = detail_rows(&node);
		assert_eq!(rows.len(), 2);
		assert!(rows[0].structured);
		assert!(rows[0].text.contains("\"a\""));
		assert!(!rows[1].structured);
		assert_eq!(rows[1].text, "eu");
	}

	#[test]
	fn chip_uses_the_configured_palette() {
		use crate::components::journey_graph::theme::{Color, KindColors};

		let node = first_node(json!({ "type": "service", "label": "A" }));
		let mut theme = Theme::by_name("midnight");
		theme.kinds.service = KindColors {
			border: Color::hex(0x00FF00),
			background: Color::hex(0x112233),
		};
		let style = chip_style(&theme, &node);
		assert!(style.contains("background: #112233;"));
		assert!(style.contains("border: 1px solid #00ff00;"));
		assert!(!chip_style(&Theme::light(), &node).contains("#112233"));
	}

	#[test]
	fn servers_without_details_have_no_rows() {
		let node = first_node(json!({ "type": "server", "serverKey": "S1" }));
		assert!(detail_rows(&node).is_empty());
	}
}
