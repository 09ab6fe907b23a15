use serde_json::Value;

use super::ids::{IdAllocator, TokenSource};
use super::model::{EntityEdge, EntityNode, GraphResponse};
use super::palette::entity_color;
use crate::api::InputKind;
use crate::components::force_graph::{GraphData, GraphLink, GraphNode};
use crate::error::AppError;

/// Turns a decoded response body into renderer input.
///
/// Shape is checked first, then emptiness, so a body without arrays is
/// reported as invalid rather than as "no entities".
pub fn prepare_graph<T: TokenSource>(
	body: &Value,
	kind: InputKind,
	tokens: &mut T,
) -> Result<GraphData, AppError> {
	let response = GraphResponse::from_value(body)?;
	if response.nodes.is_empty() {
		return Err(AppError::NoEntities(kind));
	}
	Ok(normalize(response, tokens))
}

/// Assigns unique ids and maps entities onto renderer shapes.
pub fn normalize<T: TokenSource>(response: GraphResponse, tokens: &mut T) -> GraphData {
	let nodes = {
		let mut ids = IdAllocator::new("node", tokens);
		response
			.nodes
			.into_iter()
			.map(|node| to_graph_node(node, &mut ids))
			.collect()
	};
	let links = {
		let mut ids = IdAllocator::new("edge", tokens);
		response
			.edges
			.into_iter()
			.map(|edge| to_graph_link(edge, &mut ids))
			.collect()
	};
	GraphData { nodes, links }
}

fn to_graph_node<T: TokenSource>(node: EntityNode, ids: &mut IdAllocator<'_, T>) -> GraphNode {
	let id = ids.assign(node.id.as_deref());
	GraphNode {
		title: format!("Type: {}", node.entity_type.as_deref().unwrap_or("Unknown")),
		color: entity_color(node.entity_type.as_deref()).to_string(),
		label: node
			.label
			.filter(|l| !l.is_empty())
			.unwrap_or_else(|| "Unknown".into()),
		entity_type: node.entity_type,
		id,
	}
}

fn to_graph_link<T: TokenSource>(edge: EntityEdge, ids: &mut IdAllocator<'_, T>) -> GraphLink {
	GraphLink {
		id: ids.assign(edge.id.as_deref()),
		source: edge.source,
		target: edge.target,
		label: edge.label.unwrap_or_default(),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::graph::ids::tests::Counter;

	#[test]
	fn single_person_is_red_and_counted() {
		let body = json!({
			"nodes": [{"id": "a", "label": "Alice", "type": "PERSON"}],
			"edges": []
		});
		let data = prepare_graph(&body, InputKind::Text, &mut Counter::default()).unwrap();
		assert_eq!(data.nodes[0].color, "#e74c3c");
		assert_eq!(data.nodes[0].title, "Type: PERSON");
		assert_eq!(data.node_count_label(), "Nodes: 1");
		assert_eq!(data.edge_count_label(), "Edges: 0");
	}

	#[test]
	fn empty_node_list_reports_no_entities() {
		let body = json!({"nodes": [], "edges": []});
		let err = prepare_graph(&body, InputKind::File, &mut Counter::default()).unwrap_err();
		assert_eq!(err, AppError::NoEntities(InputKind::File));
	}

	#[test]
	fn missing_arrays_report_invalid_data() {
		let body = json!({"error": "nope"});
		let err = prepare_graph(&body, InputKind::Url, &mut Counter::default()).unwrap_err();
		assert_eq!(err, AppError::InvalidGraphData);
	}

	#[test]
	fn shared_node_ids_are_made_distinct() {
		let body = json!({
			"nodes": [
				{"id": "x", "label": "Paris", "type": "GPE"},
				{"id": "x", "label": "Paris Hilton", "type": "PERSON"}
			],
			"edges": []
		});
		let data = prepare_graph(&body, InputKind::Text, &mut Counter::default()).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].id, "x");
		assert_eq!(data.nodes[1].id, "x-t0");
		assert_eq!(data.node_count_label(), "Nodes: 2");
	}

	#[test]
	fn defaults_fill_missing_fields() {
		let body = json!({
			"nodes": [{"type": "WORK_OF_ART"}],
			"edges": [{"source": "node-t0", "target": "b"}, {"id": "e", "source": "b", "target": "c"}]
		});
		let data = prepare_graph(&body, InputKind::Text, &mut Counter::default()).unwrap();

		let node = &data.nodes[0];
		assert_eq!(node.id, "node-t0");
		assert_eq!(node.label, "Unknown");
		assert_eq!(node.color, "#7f8c8d");

		assert_eq!(data.links[0].id, "edge-t1");
		assert_eq!(data.links[0].label, "");
		assert_eq!(data.links[1].id, "e");
	}

	#[test]
	fn node_and_edge_ids_live_in_separate_namespaces() {
		let body = json!({
			"nodes": [{"id": "1"}],
			"edges": [{"id": "1", "source": "1", "target": "1"}]
		});
		let data = prepare_graph(&body, InputKind::Text, &mut Counter::default()).unwrap();
		assert_eq!(data.nodes[0].id, "1");
		assert_eq!(data.links[0].id, "1");
	}

	#[test]
	fn numeric_ids_keep_their_edges() {
		let body = json!({
			"nodes": [{"id": 1, "label": 2024, "type": "DATE"}, {"id": 2, "label": "Acme"}],
			"edges": [{"source": 1, "target": 2, "label": "founded"}]
		});
		let data = prepare_graph(&body, InputKind::Text, &mut Counter::default()).unwrap();
		assert_eq!(data.nodes[0].label, "2024");
		assert_eq!(data.nodes[0].color, "#f39c12");
		assert_eq!((data.links[0].source.as_str(), data.links[0].target.as_str()), ("1", "2"));
		assert_eq!(data.edge_count_label(), "Edges: 1");
	}

	#[test]
	fn zero_id_is_replaced_like_a_missing_one() {
		let body = json!({"nodes": [{"id": 0, "label": "Zero"}], "edges": []});
		let data = prepare_graph(&body, InputKind::Text, &mut Counter::default()).unwrap();
		assert_eq!(data.nodes[0].id, "node-t0");
	}
}
