//! Graph explorer page: headline stats, actor roster, the force-directed
//! canvas and the node detail panel.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::components::actor_list::ActorList;
use crate::components::detail_panel::DetailPanel;
use crate::components::force_graph::ActorGraphCanvas;
use crate::data::{IpCache, load_dataset};
use crate::graph::{GraphData, GraphNode, NodePayload, build_graph};
use crate::model::{Dataset, DatasetStats};
use crate::panel::node_panel;

/// Logical canvas size; the root node pins to its center.
const CANVAS_W: f64 = 960.0;
const CANVAS_H: f64 = 600.0;

#[component]
fn StatItem(
	#[prop(into)] label: String,
	#[prop(into)] value: Signal<usize>,
	#[prop(optional)] danger: bool,
) -> impl IntoView {
	view! {
		<div class=if danger { "stat-item danger" } else { "stat-item" }>
			<span class="stat-value">{move || value.get()}</span>
			<span class="stat-label">{label}</span>
		</div>
	}
}

/// The explorer. Loads both startup documents once, then drives everything
/// reactively from the selected actor and selected node.
#[component]
pub fn Home() -> impl IntoView {
	let dataset = RwSignal::new(Dataset::default());
	let selected_email = RwSignal::new(None::<String>);
	let selected_node = RwSignal::new(None::<GraphNode>);
	let ip_cache = use_context::<IpCache>().unwrap_or_default();

	spawn_local(async move {
		match load_dataset().await {
			Ok(ds) => {
				info!("loaded {} actors", ds.emails.len());
				// Start on the highest-ranked actor, mirroring the roster order.
				let first = ds
					.emails
					.iter()
					.max_by_key(|p| p.rank())
					.map(|p| p.email.clone());
				dataset.set(ds);
				selected_email.set(first);
			}
			Err(e) => error!("dataset load failed: {e}"),
		}
	});

	let stats = Memo::new(move |_| DatasetStats::compute(&dataset.get().emails));

	let graph = Memo::new(move |_| {
		let ds = dataset.get();
		match selected_email.get().and_then(|email| ds.actor(&email)) {
			Some(actor) => build_graph(actor, &ds.emails, CANVAS_W, CANVAS_H),
			None => GraphData::default(),
		}
	});

	// Opportunistic geolocation: whenever the selected node exposes IP rows,
	// resolve whatever the cache is missing. Stale in-flight lookups are
	// harmless; they only ever fill the session cache.
	Effect::new(move |_| {
		if let Some(node) = selected_node.get() {
			if let NodePayload::Ips(ips) = &node.payload {
				let addrs: Vec<String> = ips.iter().map(|ip| ip.addr().to_string()).collect();
				spawn_local(async move { ip_cache.lookup_batch(addrs).await });
			}
		}
	});

	let panel = Memo::new(move |_| {
		let node = selected_node.get()?;
		let ds = dataset.get();
		Some(node_panel(&node, &ds.emails, &ip_cache.snapshot()))
	});

	let on_node_select = Callback::new(move |node: GraphNode| {
		selected_node.set(Some(node));
	});
	let on_actor_select = Callback::new(move |email: String| {
		selected_email.set(Some(email));
	});

	view! {
		<div class="explorer">
			<header class="explorer-header">
				<h1>"Threat Actor Graph"</h1>
				<div class="stats-bar">
					<StatItem label="Actors" value=Signal::derive(move || stats.get().actors) />
					<StatItem label="Domains" value=Signal::derive(move || stats.get().domains) />
					<StatItem
						label="Threat Domains"
						value=Signal::derive(move || stats.get().threat_domains)
						danger=true
					/>
					<StatItem
						label="Registrars"
						value=Signal::derive(move || stats.get().registrars)
					/>
					<StatItem
						label="Leak Signals"
						value=Signal::derive(move || stats.get().leak_signals)
					/>
				</div>
			</header>
			<div class="graph-layout">
				<ActorList
					actors=Signal::derive(move || dataset.get().emails)
					selected=selected_email
					on_select=on_actor_select
				/>
				<div class="graph-main">
					<ActorGraphCanvas
						data=graph
						on_select=on_node_select
						width=CANVAS_W
						height=CANVAS_H
					/>
					<DetailPanel content=panel />
				</div>
			</div>
		</div>
	}
}
