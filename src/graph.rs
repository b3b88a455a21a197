//! Relationship-graph construction: one actor record in, a typed node/edge
//! tree out. The builder is pure and DOM-free; layout and drawing live in
//! `components::force_graph`.

use crate::model::{
	ActorRecord, DomainCard, LeakDatabase, PasswordEntry, PhoneEntry, Registrant, ThreatEntry,
	ThreatKind, dedupe_ips, dedupe_phones,
};
use crate::geo::phone_country;

/// Reserved id of the pinned root node; data-derived ids are step-prefixed
/// (`phone_0`, `threat_3`, ...) and cannot collide with it.
pub const ROOT_ID: &str = "email_main";

const MAX_PHONES: usize = 3;
const MAX_PASSWORD_SITES: usize = 6;
const MAX_LEAK_DBS: usize = 5;
const MAX_THREAT_DOMAINS: usize = 10;
const MAX_SCANNED_DOMAINS: usize = 6;
const MAX_CONNECTED: usize = 5;

/// Every node variety the builder can emit. Closed set: the renderer and the
/// detail panel both match exhaustively on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Email,
	Google,
	Services,
	Name,
	Phone,
	Registrar,
	PasswordsGroup,
	LeakedSite,
	LeaksGroup,
	LeakDb,
	DomainsGroup,
	ThreatsGroup,
	Malware,
	Phishing,
	Domain,
	ScreenshotsGroup,
	IpsGroup,
	ConnectionsGroup,
	ConnectedEmail,
}

impl NodeKind {
	/// Base badge color.
	pub fn color(self) -> &'static str {
		match self {
			Self::Email => "#0ea5e9",
			Self::Google => "#f43f5e",
			Self::Services => "#22c55e",
			Self::Name => "#a855f7",
			Self::Phone => "#14b8a6",
			Self::Registrar => "#a855f7",
			Self::PasswordsGroup => "#ef4444",
			Self::LeakedSite => "#fb923c",
			Self::LeaksGroup => "#fbbf24",
			Self::LeakDb => "#facc15",
			Self::DomainsGroup => "#64748b",
			Self::ThreatsGroup => "#ef4444",
			Self::Malware => "#dc2626",
			Self::Phishing => "#f59e0b",
			Self::Domain => "#38bdf8",
			Self::ScreenshotsGroup => "#0ea5e9",
			Self::IpsGroup => "#8b5cf6",
			Self::ConnectionsGroup => "#ec4899",
			Self::ConnectedEmail => "#f472b6",
		}
	}

	/// Radial-gradient stops for the badge fill.
	pub fn gradient(self) -> (&'static str, &'static str) {
		match self {
			Self::Email => ("#38bdf8", "#0284c7"),
			Self::Google => ("#fb7185", "#e11d48"),
			Self::Services => ("#4ade80", "#16a34a"),
			Self::Name => ("#c084fc", "#9333ea"),
			Self::Phone => ("#2dd4bf", "#0d9488"),
			Self::Registrar => ("#d8b4fe", "#a855f7"),
			Self::PasswordsGroup => ("#f87171", "#dc2626"),
			Self::LeakedSite => ("#fdba74", "#ea580c"),
			Self::LeaksGroup => ("#fcd34d", "#d97706"),
			Self::LeakDb => ("#fde047", "#ca8a04"),
			Self::DomainsGroup => ("#67e8f9", "#0891b2"),
			Self::ThreatsGroup => ("#f87171", "#b91c1c"),
			Self::Malware => ("#fca5a5", "#991b1b"),
			Self::Phishing => ("#fcd34d", "#b45309"),
			Self::Domain => ("#a5f3fc", "#06b6d4"),
			Self::ScreenshotsGroup => ("#93c5fd", "#2563eb"),
			Self::IpsGroup => ("#c4b5fd", "#7c3aed"),
			Self::ConnectionsGroup => ("#a5b4fc", "#4f46e5"),
			Self::ConnectedEmail => ("#cbd5e1", "#475569"),
		}
	}

	/// Resting outline color. Screenshotted plain domains get a brighter ring.
	pub fn stroke(self, has_screenshot: bool) -> &'static str {
		match self {
			Self::Email => "#38bdf8",
			Self::Google => "#fb7185",
			Self::Services => "#4ade80",
			Self::Name | Self::Registrar => "#c084fc",
			Self::Phone => "#2dd4bf",
			Self::Malware | Self::ThreatsGroup | Self::PasswordsGroup => "#f87171",
			Self::Phishing => "#fbbf24",
			Self::LeakedSite => "#fb923c",
			Self::LeaksGroup => "#fcd34d",
			Self::LeakDb => "#fde047",
			Self::IpsGroup => "#a78bfa",
			Self::DomainsGroup => "#22d3ee",
			Self::ScreenshotsGroup => "#60a5fa",
			Self::Domain if has_screenshot => "#38bdf8",
			Self::Domain => "rgba(255,255,255,0.3)",
			Self::ConnectedEmail => "#94a3b8",
			Self::ConnectionsGroup => "#818cf8",
		}
	}

	/// Glyph drawn inside the badge when no favicon applies.
	pub fn glyph(self) -> &'static str {
		match self {
			Self::Email | Self::ConnectedEmail => "\u{1F4E7}",
			Self::Google => "\u{1F50D}",
			Self::Services => "\u{1F4F1}",
			Self::Name => "\u{1F464}",
			Self::Phone => "\u{1F4DE}",
			Self::Registrar => "\u{1F4CB}",
			Self::PasswordsGroup => "\u{1F511}",
			Self::LeakedSite | Self::DomainsGroup => "\u{1F310}",
			Self::LeaksGroup => "\u{1F4A7}",
			Self::LeakDb => "\u{1F5C4}\u{FE0F}",
			Self::ThreatsGroup => "\u{26A0}\u{FE0F}",
			Self::Malware => "\u{2620}\u{FE0F}",
			Self::Phishing => "\u{1F3A3}",
			Self::IpsGroup => "\u{1F5A5}\u{FE0F}",
			Self::ScreenshotsGroup => "\u{1F4F7}",
			Self::Domain | Self::ConnectionsGroup => "\u{1F517}",
		}
	}

	/// Kinds rendered with the stronger danger styling.
	pub fn is_danger(self) -> bool {
		matches!(
			self,
			Self::Malware | Self::Phishing | Self::ThreatsGroup | Self::PasswordsGroup
		)
	}

	/// Kinds that get a soft halo behind the badge.
	pub fn has_glow(self) -> bool {
		self.is_danger() || matches!(self, Self::Email | Self::LeaksGroup)
	}

	/// Kinds whose badge carries the domain's favicon instead of a glyph.
	pub fn uses_favicon(self) -> bool {
		matches!(self, Self::Malware | Self::Phishing | Self::Domain)
	}
}

/// Typed payload carried by a node for the detail panel. Owned data, so the
/// panel never reaches back into the dataset except to resolve connections.
#[derive(Clone, Debug, PartialEq)]
pub enum NodePayload {
	Actor(ActorRecord),
	Google(crate::model::GoogleAccount),
	Services(Vec<String>),
	Names(Vec<String>),
	Phone(PhoneEntry),
	Registrants {
		names: Vec<String>,
		records: Vec<Registrant>,
	},
	Passwords(Vec<PasswordEntry>),
	LeakedSite {
		domain: String,
		passwords: Vec<PasswordEntry>,
	},
	LeakDbs(Vec<LeakDatabase>),
	LeakDb(LeakDatabase),
	Threats(Vec<ThreatEntry>),
	Threat {
		entry: ThreatEntry,
		card: Option<DomainCard>,
	},
	Domains(Vec<String>),
	Screenshots(Vec<DomainCard>),
	ScannedDomain(DomainCard),
	Ips(Vec<crate::model::IpEntry>),
	ConnectedEmails(Vec<String>),
	ConnectedActor {
		email: String,
		actor: Option<ActorRecord>,
	},
}

/// One rendered graph node.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub payload: NodePayload,
	/// Visual radius; also a rough importance signal.
	pub size: f64,
	pub color: &'static str,
	pub country: Option<String>,
	pub has_screenshot: bool,
	pub screenshot: Option<String>,
	/// Favicon lookup key for domain-flavored nodes.
	pub domain: Option<String>,
	/// Fixed layout position; only the root is pinned.
	pub pinned: Option<(f64, f64)>,
}

impl GraphNode {
	fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>, size: f64, payload: NodePayload) -> Self {
		Self {
			id: id.into(),
			kind,
			label: label.into(),
			payload,
			size,
			color: kind.color(),
			country: None,
			has_screenshot: false,
			screenshot: None,
			domain: None,
			pinned: None,
		}
	}
}

/// One edge of the actor tree.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub rel: &'static str,
	pub label: Option<String>,
}

/// A complete per-actor graph, rebuilt from scratch on every selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn root(&self) -> Option<&GraphNode> {
		self.nodes.first()
	}

	fn push_edge(&mut self, source: &str, target: &str, rel: &'static str) {
		self.edges.push(GraphEdge {
			source: source.into(),
			target: target.into(),
			rel,
			label: None,
		});
	}

	fn push_labeled_edge(
		&mut self,
		source: &str,
		target: &str,
		rel: &'static str,
		label: Option<String>,
	) {
		self.edges.push(GraphEdge {
			source: source.into(),
			target: target.into(),
			rel,
			label,
		});
	}
}

/// Truncate to `max` characters, ellipsizing with `".."` past the limit.
fn clip(s: &str, max: usize) -> String {
	if s.chars().count() > max {
		let mut out: String = s.chars().take(max - 2).collect();
		out.push_str("..");
		out
	} else {
		s.to_string()
	}
}

fn take_chars(s: &str, max: usize) -> String {
	s.chars().take(max).collect()
}

/// Build the relationship tree for one actor. Deterministic for a given
/// record and canvas size; the canvas size only fixes the root's pin point.
/// `all_actors` is consulted solely to resolve connected emails.
pub fn build_graph(
	actor: &ActorRecord,
	all_actors: &[ActorRecord],
	width: f64,
	height: f64,
) -> GraphData {
	let mut g = GraphData::default();

	let mut root = GraphNode::new(
		ROOT_ID,
		NodeKind::Email,
		actor.email.clone(),
		50.0,
		NodePayload::Actor(actor.clone()),
	);
	root.pinned = Some((width / 2.0, height / 2.0));
	g.nodes.push(root);

	// Google account, with a services satellite when known.
	if let Some(google) = actor.google.as_ref().filter(|g| g.person_id.is_some()) {
		let label = google.name.clone().unwrap_or_else(|| "Google Account".into());
		g.nodes.push(GraphNode::new(
			"google",
			NodeKind::Google,
			label,
			36.0,
			NodePayload::Google(google.clone()),
		));
		g.push_edge(ROOT_ID, "google", "has_google");

		if !google.services.is_empty() {
			let label = google.services.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
			g.nodes.push(GraphNode::new(
				"google_services",
				NodeKind::Services,
				label,
				24.0,
				NodePayload::Services(google.services.clone()),
			));
			g.push_edge("google", "google_services", "uses");
		}
	}

	if let Some(intel) = &actor.leak_intel {
		if let Some(first) = intel.real_names.first() {
			g.nodes.push(GraphNode::new(
				"real_name",
				NodeKind::Name,
				first.clone(),
				34.0,
				NodePayload::Names(intel.real_names.clone()),
			));
			g.push_edge(ROOT_ID, "real_name", "identity");
		}

		for (i, ph) in dedupe_phones(&intel.phones).into_iter().take(MAX_PHONES).enumerate() {
			let id = format!("phone_{i}");
			let mut node = GraphNode::new(
				id.clone(),
				NodeKind::Phone,
				ph.number(),
				28.0,
				NodePayload::Phone(ph.clone()),
			);
			node.country = phone_country(ph.number()).map(str::to_string);
			g.nodes.push(node);
			g.push_labeled_edge(ROOT_ID, &id, "has_phone", ph.source().map(str::to_string));
		}
	}

	// One aggregate node for all usable WHOIS registrant names.
	{
		let mut names: Vec<String> = Vec::new();
		for r in &actor.registrants {
			if let Some(n) = r.usable_name() {
				if !names.iter().any(|seen| seen == n) {
					names.push(n.to_string());
				}
			}
		}
		if !names.is_empty() {
			let label = if names.len() == 1 {
				names[0].clone()
			} else {
				format!("{} Registrants", names.len())
			};
			g.nodes.push(GraphNode::new(
				"registrant",
				NodeKind::Registrar,
				take_chars(&label, 22),
				30.0,
				NodePayload::Registrants {
					names,
					records: actor.registrants.clone(),
				},
			));
			g.push_edge(ROOT_ID, "registrant", "registered_as");
		}
	}

	// Credentials, grouped by the site each one leaked from.
	if !actor.passwords.is_empty() {
		let mut buckets: Vec<(String, Vec<PasswordEntry>)> = Vec::new();
		for pw in &actor.passwords {
			let site = pw.site();
			match buckets.iter_mut().find(|(s, _)| *s == site) {
				Some((_, list)) => list.push(pw.clone()),
				None => buckets.push((site, vec![pw.clone()])),
			}
		}

		g.nodes.push(GraphNode::new(
			"passwords",
			NodeKind::PasswordsGroup,
			format!("{} Passwords", actor.passwords.len()),
			32.0,
			NodePayload::Passwords(actor.passwords.clone()),
		));
		g.push_edge(ROOT_ID, "passwords", "leaked_creds");

		// The unknown bucket occupies a slot but never becomes a node.
		for (i, (site, pwds)) in buckets.into_iter().take(MAX_PASSWORD_SITES).enumerate() {
			if site == "unknown" || site.is_empty() {
				continue;
			}
			let id = format!("pwd_site_{i}");
			let mut node = GraphNode::new(
				id.clone(),
				NodeKind::LeakedSite,
				take_chars(&site, 18),
				22.0,
				NodePayload::LeakedSite {
					domain: site.clone(),
					passwords: pwds,
				},
			);
			node.domain = Some(site);
			g.nodes.push(node);
			g.push_edge("passwords", &id, "on_site");
		}
	}

	if let Some(ext) = actor.leak_extended.as_ref().filter(|e| !e.databases.is_empty()) {
		g.nodes.push(GraphNode::new(
			"leaks",
			NodeKind::LeaksGroup,
			format!("{} Leaks", ext.databases.len()),
			30.0,
			NodePayload::LeakDbs(ext.databases.clone()),
		));
		g.push_edge(ROOT_ID, "leaks", "found_in");

		for (i, db) in ext.databases.iter().take(MAX_LEAK_DBS).enumerate() {
			let id = format!("leak_db_{i}");
			g.nodes.push(GraphNode::new(
				id.clone(),
				NodeKind::LeakDb,
				take_chars(db.title(), 15),
				20.0,
				NodePayload::LeakDb(db.clone()),
			));
			g.push_edge("leaks", &id, "database");
		}
	}

	// Domain estate: threats under the domains group, screenshotted
	// non-threat domains under their own subgroup.
	let threats = actor.threat_entries();
	let total_domains = actor.domain_count();
	if total_domains > 0 {
		g.nodes.push(GraphNode::new(
			"domains",
			NodeKind::DomainsGroup,
			format!("{total_domains} Domains"),
			32.0,
			NodePayload::Domains(actor.domains.clone()),
		));
		g.push_edge(ROOT_ID, "domains", "owns");

		if !threats.is_empty() {
			g.nodes.push(GraphNode::new(
				"threats",
				NodeKind::ThreatsGroup,
				format!("{} Threats", threats.len()),
				34.0,
				NodePayload::Threats(threats.clone()),
			));
			g.push_edge("domains", "threats", "includes");

			for (i, threat) in threats.iter().take(MAX_THREAT_DOMAINS).enumerate() {
				let id = format!("threat_{i}");
				let kind = match threat.kind {
					ThreatKind::Malware => NodeKind::Malware,
					ThreatKind::Phishing => NodeKind::Phishing,
				};
				let card = actor.card_for(&threat.domain).cloned();
				let mut node = GraphNode::new(
					id.clone(),
					kind,
					clip(&threat.domain, 18),
					26.0,
					NodePayload::Threat {
						entry: threat.clone(),
						card: card.clone(),
					},
				);
				node.domain = Some(threat.domain.clone());
				node.screenshot = card.and_then(|c| c.screenshot);
				node.has_screenshot = node.screenshot.is_some();
				g.nodes.push(node);

				let label = match threat.kind {
					ThreatKind::Malware => Some(format!("{} detections", threat.detections)),
					ThreatKind::Phishing => {
						let joined = threat
							.sources
							.iter()
							.take(2)
							.cloned()
							.collect::<Vec<_>>()
							.join(", ");
						(!joined.is_empty()).then_some(joined)
					}
				};
				g.push_labeled_edge("threats", &id, "detected", label);
			}
		}

		let with_shots: Vec<&DomainCard> = actor
			.domain_cards
			.iter()
			.filter(|c| c.screenshot.is_some())
			.collect();
		let scanned: Vec<&DomainCard> = with_shots
			.iter()
			.copied()
			.filter(|c| !threats.iter().any(|t| t.domain == c.domain))
			.take(MAX_SCANNED_DOMAINS)
			.collect();
		if !scanned.is_empty() {
			g.nodes.push(GraphNode::new(
				"screenshots",
				NodeKind::ScreenshotsGroup,
				format!("{} Scanned", with_shots.len()),
				28.0,
				NodePayload::Screenshots(with_shots.iter().map(|c| (*c).clone()).collect()),
			));
			g.push_edge("domains", "screenshots", "scanned");

			for (i, card) in scanned.into_iter().enumerate() {
				let id = format!("scanned_{i}");
				let mut node = GraphNode::new(
					id.clone(),
					NodeKind::Domain,
					clip(&card.domain, 18),
					22.0,
					NodePayload::ScannedDomain(card.clone()),
				);
				node.domain = Some(card.domain.clone());
				node.has_screenshot = true;
				node.screenshot = card.screenshot.clone();
				g.nodes.push(node);
				g.push_edge("screenshots", &id, "has_scan");
			}
		}
	}

	// IPs stay aggregated; per-address detail lives in the panel.
	if let Some(intel) = &actor.leak_intel {
		let ips = dedupe_ips(&intel.ips);
		if !ips.is_empty() {
			g.nodes.push(GraphNode::new(
				"ips",
				NodeKind::IpsGroup,
				format!("{} IPs", ips.len()),
				28.0,
				NodePayload::Ips(ips),
			));
			g.push_edge(ROOT_ID, "ips", "used_ip");
		}
	}

	if !actor.connected_emails.is_empty() {
		g.nodes.push(GraphNode::new(
			"connections",
			NodeKind::ConnectionsGroup,
			format!("{} Connected", actor.connected_emails.len()),
			30.0,
			NodePayload::ConnectedEmails(actor.connected_emails.clone()),
		));
		g.push_edge(ROOT_ID, "connections", "shared_password");

		for (i, email) in actor.connected_emails.iter().take(MAX_CONNECTED).enumerate() {
			let id = format!("conn_{i}");
			let resolved = all_actors.iter().find(|p| &p.email == email).cloned();
			let flagged = resolved
				.as_ref()
				.is_some_and(|p| !p.blacklist_entries().is_empty());
			let mut node = GraphNode::new(
				id.clone(),
				NodeKind::ConnectedEmail,
				clip(email, 20),
				22.0,
				NodePayload::ConnectedActor {
					email: email.clone(),
					actor: resolved,
				},
			);
			if flagged {
				node.color = "#f59e0b";
			}
			g.nodes.push(node);
			g.push_edge("connections", &id, "shared_cred");
		}
	}

	g
}

#[cfg(test)]
mod tests {
	use std::collections::{HashMap, HashSet};

	use super::*;

	fn actor(json: serde_json::Value) -> ActorRecord {
		serde_json::from_value(json).expect("actor record")
	}

	fn build(json: serde_json::Value) -> GraphData {
		build_graph(&actor(json), &[], 800.0, 600.0)
	}

	fn kinds(g: &GraphData, kind: NodeKind) -> Vec<&GraphNode> {
		g.nodes.iter().filter(|n| n.kind == kind).collect()
	}

	#[test]
	fn bare_actor_yields_single_pinned_root() {
		let g = build(serde_json::json!({ "email": "x@y.com" }));
		assert_eq!(g.nodes.len(), 1);
		assert!(g.edges.is_empty());
		let root = g.root().unwrap();
		assert_eq!(root.id, ROOT_ID);
		assert_eq!(root.kind, NodeKind::Email);
		assert_eq!(root.pinned, Some((400.0, 300.0)));
	}

	#[test]
	fn edges_only_reference_known_nodes() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"google": { "person_id": "g123", "services": ["Gmail", "Drive", "Maps", "Play"] },
			"leak_intel": {
				"real_names": ["Ivan Petrov"],
				"phones": ["+380501234567", "+79991234567"],
				"ips": ["1.2.3.4"]
			},
			"passwords": [{ "password": "p", "url": "https://shop.ua/x" }],
			"leak_extended": { "databases": [{ "database": "CollectionOne" }] },
			"total_domains": 3,
			"virustotal": [{ "domain": "mal.com", "malicious": 4 }],
			"blacklist": [{ "domain": "phish.com", "blacklisted": true, "sources": ["SEAL"] }],
			"domain_cards": [{ "domain": "shop.ua", "screenshot": "s.png" }],
			"connected_emails": ["other@y.com"]
		}));
		let ids: HashSet<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), g.nodes.len(), "node ids must be unique");
		for e in &g.edges {
			assert!(ids.contains(e.source.as_str()), "unknown source {}", e.source);
			assert!(ids.contains(e.target.as_str()), "unknown target {}", e.target);
		}
	}

	#[test]
	fn graph_is_a_tree_rooted_at_the_actor() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"google": { "person_id": "g123", "services": ["Gmail"] },
			"passwords": ["p1", { "password": "p2", "url": "http://a.com/x" }],
			"leak_extended": { "databases": [{ "source": "db1" }, { "source": "db2" }] },
			"total_domains": 2,
			"blacklist": [{ "domain": "phish.com", "blacklisted": true }],
			"connected_emails": ["a@b.c"]
		}));
		// Every non-root node has exactly one incoming edge; none point at
		// the root.
		let mut incoming: HashMap<&str, usize> = HashMap::new();
		for e in &g.edges {
			*incoming.entry(e.target.as_str()).or_default() += 1;
		}
		assert!(!incoming.contains_key(ROOT_ID));
		for n in g.nodes.iter().skip(1) {
			assert_eq!(incoming.get(n.id.as_str()), Some(&1), "node {}", n.id);
		}
		assert_eq!(g.edges.len(), g.nodes.len() - 1);
	}

	#[test]
	fn leak_db_cap_keeps_true_count_in_group_label() {
		let dbs: Vec<serde_json::Value> = (0..20)
			.map(|i| serde_json::json!({ "database": format!("db{i}") }))
			.collect();
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"leak_extended": { "databases": dbs }
		}));
		assert_eq!(kinds(&g, NodeKind::LeakDb).len(), 5);
		assert_eq!(kinds(&g, NodeKind::LeaksGroup)[0].label, "20 Leaks");
	}

	#[test]
	fn keyed_virustotal_becomes_one_malware_leaf() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"total_domains": 1,
			"virustotal": {
				"evil.com": { "malicious": 3, "suspicious": 0, "harmless": 67 }
			}
		}));
		let malware = kinds(&g, NodeKind::Malware);
		assert_eq!(malware.len(), 1);
		assert_eq!(malware[0].domain.as_deref(), Some("evil.com"));
		let edge = g.edges.iter().find(|e| e.target == malware[0].id).unwrap();
		assert_eq!(edge.label.as_deref(), Some("3 detections"));
	}

	#[test]
	fn blacklist_only_actor_gets_phishing_not_malware() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"total_domains": 1,
			"blacklist": [{ "domain": "fake-bank.com", "blacklisted": true, "sources": ["SEAL"] }]
		}));
		assert_eq!(kinds(&g, NodeKind::Phishing).len(), 1);
		assert!(kinds(&g, NodeKind::Malware).is_empty());
		let edge = g
			.edges
			.iter()
			.find(|e| e.target == kinds(&g, NodeKind::Phishing)[0].id)
			.unwrap();
		assert_eq!(edge.label.as_deref(), Some("SEAL"));
	}

	#[test]
	fn threats_require_a_domains_group() {
		// No registered domains means no domain subtree at all.
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"virustotal": [{ "domain": "mal.com", "malicious": 2 }]
		}));
		assert!(kinds(&g, NodeKind::DomainsGroup).is_empty());
		assert!(kinds(&g, NodeKind::Malware).is_empty());
	}

	#[test]
	fn unknown_password_bucket_takes_a_slot_but_no_node() {
		let mut passwords = vec![serde_json::json!("bare-string-pw")];
		for i in 0..6 {
			passwords.push(serde_json::json!({
				"password": "p",
				"url": format!("https://www.site{i}.com/login")
			}));
		}
		let g = build(serde_json::json!({ "email": "x@y.com", "passwords": passwords }));
		// Bucket order: unknown, site0..site5; the cap of six admits
		// unknown plus site0..site4, and unknown is skipped.
		let sites = kinds(&g, NodeKind::LeakedSite);
		assert_eq!(sites.len(), 5);
		assert_eq!(sites[0].label, "site0.com");
		assert_eq!(kinds(&g, NodeKind::PasswordsGroup)[0].label, "7 Passwords");
	}

	#[test]
	fn screenshot_group_counts_all_but_excludes_threat_leaves() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"total_domains": 3,
			"virustotal": [{ "domain": "mal.com", "malicious": 1 }],
			"domain_cards": [
				{ "domain": "mal.com", "screenshot": "m.png" },
				{ "domain": "clean.com", "screenshot": "c.png" }
			]
		}));
		let group = kinds(&g, NodeKind::ScreenshotsGroup);
		assert_eq!(group.len(), 1);
		assert_eq!(group[0].label, "2 Scanned");
		let scanned = kinds(&g, NodeKind::Domain);
		assert_eq!(scanned.len(), 1);
		assert_eq!(scanned[0].domain.as_deref(), Some("clean.com"));
	}

	#[test]
	fn connected_emails_resolve_and_flag_blacklisted_actors() {
		let dataset = vec![actor(serde_json::json!({
			"email": "bad@y.com",
			"blacklist": [{ "domain": "p.com", "blacklisted": true }]
		}))];
		let g = build_graph(
			&actor(serde_json::json!({
				"email": "x@y.com",
				"connected_emails": ["bad@y.com", "ghost@y.com"]
			})),
			&dataset,
			800.0,
			600.0,
		);
		let conns = kinds(&g, NodeKind::ConnectedEmail);
		assert_eq!(conns.len(), 2);
		assert_eq!(conns[0].color, "#f59e0b");
		assert_eq!(conns[1].color, "#f472b6");
		match &conns[1].payload {
			NodePayload::ConnectedActor { actor, .. } => assert!(actor.is_none()),
			other => panic!("unexpected payload {other:?}"),
		}
	}

	#[test]
	fn ip_leaves_stay_collapsed_into_the_group() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"leak_intel": { "ips": ["1.1.1.1", "1.1.1.1", "2.2.2.2"] }
		}));
		let groups = kinds(&g, NodeKind::IpsGroup);
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].label, "2 IPs");
		assert_eq!(g.nodes.len(), 2);
	}

	#[test]
	fn phone_leaves_are_capped_and_carry_country() {
		let g = build(serde_json::json!({
			"email": "x@y.com",
			"leak_intel": {
				"phones": ["+380501234567", "+380501234567", "+79991234567",
				           "+77771234567", "+12025550123"]
			}
		}));
		let phones = kinds(&g, NodeKind::Phone);
		assert_eq!(phones.len(), 3);
		assert_eq!(phones[0].country.as_deref(), Some("ua"));
		assert_eq!(phones[1].country.as_deref(), Some("ru"));
		assert_eq!(phones[2].country.as_deref(), Some("kz"));
	}

	#[test]
	fn registrants_collapse_to_one_aggregate_node() {
		let g = build_graph(
			&{
				let mut p = actor(serde_json::json!({ "email": "x@y.com" }));
				p.registrants = vec![
					Registrant {
						actor: "x@y.com".into(),
						name: Some("Ivan Petrov".into()),
						..Registrant::default()
					},
					Registrant {
						actor: "x@y.com".into(),
						name: Some("REDACTED FOR PRIVACY".into()),
						..Registrant::default()
					},
					Registrant {
						actor: "x@y.com".into(),
						name: Some("Ivan Petrov".into()),
						..Registrant::default()
					},
				];
				p
			},
			&[],
			800.0,
			600.0,
		);
		let regs = kinds(&g, NodeKind::Registrar);
		assert_eq!(regs.len(), 1);
		assert_eq!(regs[0].label, "Ivan Petrov");
	}

	#[test]
	fn rebuild_is_deterministic() {
		let json = serde_json::json!({
			"email": "x@y.com",
			"passwords": ["a", "b"],
			"total_domains": 1,
			"blacklist": [{ "domain": "p.com", "blacklisted": true }]
		});
		let a = build(json.clone());
		let b = build(json);
		let sig = |g: &GraphData| {
			g.nodes
				.iter()
				.map(|n| (n.id.clone(), n.label.clone()))
				.collect::<Vec<_>>()
		};
		assert_eq!(sig(&a), sig(&b));
		assert_eq!(a.edges.len(), b.edges.len());
	}
}
