use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::{GraphData, GraphNode, NodeKind};

/// Extra pixels accepted around a node when hit-testing.
pub const HIT_SLOP: f64 = 4.0;

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

/// One drawable edge, resolved to simulation indices. The relation only
/// matters for styling (connection edges draw dashed).
#[derive(Clone, Copy, Debug)]
pub struct EdgeSprite {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub dashed: bool,
}

/// Owns the live simulation for the currently selected actor's graph plus
/// all interaction state. Rebuilt wholesale when the actor changes; node
/// positions from the previous graph are discarded.
pub struct ForceGraphState {
	pub graph: ForceGraph<GraphNode, ()>,
	pub edges: Vec<EdgeSprite>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let mut indices: Vec<(String, DefaultNodeIdx)> = Vec::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			// Pinned nodes start exactly on their pin; the rest fan out on a
			// ring so the first ticks have somewhere to push from.
			let (x, y, anchored) = match node.pinned {
				Some((px, py)) => (px as f32, py as f32, true),
				None => {
					let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
					(
						(width / 2.0 + 140.0 * angle.cos()) as f32,
						(height / 2.0 + 140.0 * angle.sin()) as f32,
						false,
					)
				}
			};
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: (node.size / 3.0) as f32,
				is_anchor: anchored,
				user_data: node.clone(),
			});
			indices.push((node.id.clone(), idx));
		}

		let lookup = |id: &str| {
			indices
				.iter()
				.find(|(nid, _)| nid == id)
				.map(|(_, idx)| *idx)
		};
		let mut edges = Vec::new();
		for edge in &data.edges {
			if let (Some(src), Some(tgt)) = (lookup(&edge.source), lookup(&edge.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push(EdgeSprite {
					source: src,
					target: tgt,
					dashed: matches!(edge.rel, "shared_password" | "shared_cred"),
				});
			}
		}

		// Auto-select the root so the panel never starts empty.
		let selected = indices.first().map(|(_, idx)| *idx);

		Self {
			graph,
			edges,
			transform: ViewTransform { x: 0.0, y: 0.0, k: 1.0 },
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			selected,
			width,
			height,
			animation_running: true,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose badge covers the given screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.size + HIT_SLOP {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<GraphNode> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	/// Release a drag pin unless the node is the permanently pinned root.
	pub fn release_pin(&mut self, idx: DefaultNodeIdx) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx && node.data.user_data.kind != NodeKind::Email {
				node.data.is_anchor = false;
			}
		});
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
