use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::types::{GraphData, NodeSelection};
use crate::config::PhysicsConfig;

pub const NODE_RADIUS: f64 = 10.0;
pub const NODE_BORDER: f64 = 2.0;
pub const HIT_RADIUS: f64 = 14.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
const FIT_MARGIN: f64 = 60.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub title: String,
	pub color: String,
	pub entity_type: Option<String>,
}

/// One drawn edge. Parallel edges between the same ordered pair share it.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	/// Seconds the current node has been hovered, for the tooltip.
	pub dwell_t: f64,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<(), ()>,
	pub links: Vec<LinkInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	pub tooltip_delay: f64,
	/// Insertion order, which is also graph index order.
	nodes: Vec<(DefaultNodeIdx, NodeInfo)>,
	/// Simulated positions as of the last tick, aligned with `nodes`.
	positions: Vec<(f64, f64)>,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		physics: &PhysicsConfig,
		tooltip_delay: f64,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(physics.simulation_parameters());
		let mut id_to_idx = HashMap::new();
		let mut nodes = Vec::with_capacity(data.nodes.len());

		let count = data.nodes.len();
		let ring = (physics.seed_spacing * count as f64 / (2.0 * PI)).max(100.0);
		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y) = if count == 1 {
				(0.0, 0.0)
			} else {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				((ring * angle.cos()) as f32, (ring * angle.sin()) as f32)
			};

			let info = NodeInfo {
				id: node.id.clone(),
				label: node.label.clone(),
				title: node.title.clone(),
				color: node.color.clone(),
				entity_type: node.entity_type.clone(),
			};
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: (),
			});
			id_to_idx.insert(node.id.clone(), idx);
			nodes.push((idx, info));
		}

		let mut links: Vec<LinkInfo> = Vec::new();
		let mut dangling = 0;
		for link in &data.links {
			let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			else {
				log::debug!("Edge {} has an endpoint outside the node list", link.id);
				dangling += 1;
				continue;
			};
			if src == tgt {
				continue;
			}

			if let Some(existing) = links
				.iter_mut()
				.find(|l| l.source == src && l.target == tgt)
			{
				if !link.label.is_empty()
					&& !existing.label.split(", ").any(|l| l == link.label)
				{
					if !existing.label.is_empty() {
						existing.label.push_str(", ");
					}
					existing.label.push_str(&link.label);
				}
				continue;
			}

			graph.add_edge(src, tgt, EdgeData::default());
			links.push(LinkInfo {
				source: src,
				target: tgt,
				label: link.label.clone(),
			});
		}
		if dangling > 0 {
			log::warn!("{dangling} edge(s) reference unknown nodes and will not be drawn");
		}

		let mut state = Self {
			graph,
			links,
			nodes,
			positions: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			tooltip_delay,
		};
		state.sync_positions();
		state
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Copies simulated positions into the per-node buffer.
	pub fn sync_positions(&mut self) {
		let positions = &mut self.positions;
		positions.clear();
		positions.resize(self.nodes.len(), (0.0, 0.0));
		self.graph.visit_nodes(|node| {
			if let Some(slot) = positions.get_mut(node.index().index()) {
				*slot = (node.x() as f64, node.y() as f64);
			}
		});
	}

	pub fn position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		self.slot(idx).and_then(|i| self.positions.get(i).copied())
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<&NodeInfo> {
		self.slot(idx).map(|i| &self.nodes[i].1)
	}

	fn slot(&self, idx: DefaultNodeIdx) -> Option<usize> {
		let i = idx.index();
		self.nodes.get(i).filter(|(stored, _)| *stored == idx).map(|_| i)
	}

	pub fn selection(&self, idx: DefaultNodeIdx) -> Option<NodeSelection> {
		self.node_info(idx).map(|info| NodeSelection {
			id: info.id.clone(),
			label: info.label.clone(),
			entity_type: info.entity_type.clone(),
		})
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();
		self.hover.dwell_t = 0.0;

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for link in &self.links {
				if link.source == idx {
					self.hover.neighbors.insert(link.target);
				} else if link.target == idx {
					self.hover.neighbors.insert(link.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Node whose tooltip should be drawn, if the hover has lasted long enough.
	pub fn tooltip_node(&self) -> Option<DefaultNodeIdx> {
		self.hover
			.node
			.filter(|_| !self.drag.active && self.hover.dwell_t >= self.tooltip_delay)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.sync_positions();
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.dwell_t += dt as f64;
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Zooms by `factor`, keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_center(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.transform.x += dx;
		self.transform.y += dy;
	}

	/// Scales and centres the view so every node is visible.
	pub fn fit_view(&mut self) {
		self.sync_positions();
		if self.positions.is_empty() {
			return;
		}
		let (mut min_x, mut min_y, mut max_x, mut max_y) =
			(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for &(x, y) in &self.positions {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		let (bw, bh) = (max_x - min_x + FIT_MARGIN, max_y - min_y + FIT_MARGIN);
		let k = (self.width / bw)
			.min(self.height / bh)
			.clamp(MIN_ZOOM, MAX_ZOOM.min(1.5));
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{GraphLink, GraphNode};

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			title: "Type: PERSON".into(),
			color: "#e74c3c".into(),
			entity_type: Some("PERSON".into()),
		}
	}

	fn link(source: &str, target: &str, label: &str) -> GraphLink {
		GraphLink {
			id: format!("{source}-{target}-{label}"),
			source: source.into(),
			target: target.into(),
			label: label.into(),
		}
	}

	fn state(data: &GraphData) -> ForceGraphState {
		ForceGraphState::new(data, &PhysicsConfig::default(), 0.3, 800.0, 600.0)
	}

	#[test]
	fn dangling_and_self_edges_are_not_drawn() {
		let data = GraphData {
			nodes: vec![node("a"), node("b")],
			links: vec![link("a", "b", "knows"), link("a", "zz", "x"), link("b", "b", "is")],
		};
		let s = state(&data);
		assert_eq!(s.links.len(), 1);
		assert_eq!(s.links[0].label, "knows");
	}

	#[test]
	fn parallel_edges_share_one_label() {
		let data = GraphData {
			nodes: vec![node("a"), node("b")],
			links: vec![
				link("a", "b", "met"),
				link("a", "b", "visited"),
				link("a", "b", "met"),
				link("b", "a", "called"),
			],
		};
		let s = state(&data);
		assert_eq!(s.links.len(), 2);
		assert_eq!(s.links[0].label, "met, visited");
		assert_eq!(s.links[1].label, "called");
	}

	#[test]
	fn hover_collects_neighbors_in_both_directions() {
		let data = GraphData {
			nodes: vec![node("a"), node("b"), node("c"), node("d")],
			links: vec![link("a", "b", ""), link("c", "a", "")],
		};
		let mut s = state(&data);
		let idx = |id: &str| s.nodes.iter().find(|(_, info)| info.id == id).unwrap().0;
		let (a, b, c, d) = (idx("a"), idx("b"), idx("c"), idx("d"));

		s.set_hover(Some(a));
		assert!(s.is_highlighted(b) && s.is_highlighted(c));
		assert!(!s.is_highlighted(d));

		s.set_hover(None);
		assert!(s.is_hovered(a), "previous node fades out");
		assert!(s.tooltip_node().is_none());
	}

	#[test]
	fn single_node_is_hit_at_view_centre() {
		let data = GraphData {
			nodes: vec![node("solo")],
			links: vec![],
		};
		let s = state(&data);
		let idx = s.node_at_position(400.0, 600.0 / 2.0).unwrap();
		assert_eq!(s.selection(idx).unwrap().label, "SOLO");
		assert!(s.node_at_position(10.0, 10.0).is_none());
	}

	#[test]
	fn tooltip_waits_for_delay() {
		let data = GraphData {
			nodes: vec![node("solo")],
			links: vec![],
		};
		let mut s = state(&data);
		let idx = s.node_at_position(400.0, 300.0).unwrap();
		s.set_hover(Some(idx));
		s.hover.dwell_t = 0.1;
		assert!(s.tooltip_node().is_none());
		s.hover.dwell_t = 0.3;
		assert_eq!(s.tooltip_node(), Some(idx));
	}

	#[test]
	fn zoom_is_clamped_and_keeps_anchor() {
		let mut s = state(&GraphData::default());
		for _ in 0..100 {
			s.zoom_at(100.0, 100.0, 1.1);
		}
		assert_eq!(s.transform.k, MAX_ZOOM);
		let (gx, gy) = s.screen_to_graph(100.0, 100.0);
		assert!((gx - (100.0 - 400.0)).abs() < 1e-6);
		assert!((gy - (100.0 - 300.0)).abs() < 1e-6);
	}

	#[test]
	fn positions_follow_insertion_order() {
		let data = GraphData {
			nodes: (0..40).map(|i| node(&format!("n{i}"))).collect(),
			links: vec![],
		};
		let mut s = state(&data);
		let before = s.positions.clone();
		s.sync_positions();
		assert_eq!(before, s.positions);

		let ring = (PhysicsConfig::default().seed_spacing * 40.0 / (2.0 * PI)).max(100.0);
		for (i, (idx, info)) in s.nodes.iter().enumerate() {
			assert_eq!(info.id, format!("n{i}"));
			let angle = (i as f64) * 2.0 * PI / 40.0;
			let (x, y) = s.position(*idx).unwrap();
			assert!((x - ring * angle.cos()).abs() < 1e-3, "{i}: {x}");
			assert!((y - ring * angle.sin()).abs() < 1e-3, "{i}: {y}");
		}
	}
}
