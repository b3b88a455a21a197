//! Detail-panel view models. `node_panel` is a pure dispatch over the node
//! payload sum type: it turns whatever a node carries into display data
//! (rows, tags, banners, links) and leaves the DOM to the rendering
//! component. Keeping this transform data-only makes every branch testable
//! without a browser.

use std::collections::HashMap;

use crate::data::IpInfo;
use crate::geo::{actor_country, flag_emoji, phone_country};
use crate::graph::{GraphNode, NodePayload};
use crate::model::{ActorRecord, ThreatKind, dedupe_phones};

/// Brands whose impersonation marks a crypto/finance-focused actor.
const HIGH_VALUE_BRANDS: &[&str] = &[
	"metamask", "ledger", "trezor", "coinbase", "binance", "phantom", "trustwallet", "exodus",
	"paypal", "chase", "bank",
];

/// Visual emphasis for rows, tags and badges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
	#[default]
	Default,
	Info,
	Success,
	Warning,
	Danger,
}

impl Tone {
	pub fn css_class(self) -> &'static str {
		match self {
			Self::Default => "",
			Self::Info => "info",
			Self::Success => "success",
			Self::Warning => "warning",
			Self::Danger => "danger",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelBadge {
	pub label: String,
	pub tone: Tone,
}

/// Coarse severity ladder shown in the banner strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreatLevel {
	Medium,
	High,
	Critical,
}

impl ThreatLevel {
	pub fn label(self) -> &'static str {
		match self {
			Self::Medium => "Medium Risk",
			Self::High => "High Risk",
			Self::Critical => "Critical Risk",
		}
	}

	pub fn css_class(self) -> &'static str {
		match self {
			Self::Medium => "medium",
			Self::High => "high",
			Self::Critical => "critical",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreatBanner {
	pub level: ThreatLevel,
	pub headline: String,
	pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelStat {
	pub value: String,
	pub label: String,
	pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelRow {
	pub label: String,
	pub value: String,
	pub tone: Tone,
	pub mono: bool,
}

impl PanelRow {
	fn plain(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
			tone: Tone::Default,
			mono: false,
		}
	}

	fn mono(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
			tone,
			mono: true,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelTag {
	pub text: String,
	pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenshotRef {
	pub domain: String,
	pub url: String,
}

/// Outbound OSINT lookup link; rendered as an anchor, never fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionLink {
	pub label: &'static str,
	pub url: String,
}

/// Everything the detail panel shows for one selected node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelContent {
	pub icon: &'static str,
	pub title: String,
	pub subtitle: Option<String>,
	pub badge: Option<PanelBadge>,
	pub avatar: Option<String>,
	/// Two-letter country code, shown as flag + code.
	pub country: Option<String>,
	pub banner: Option<ThreatBanner>,
	pub stats: Vec<PanelStat>,
	pub rows: Vec<PanelRow>,
	pub tags: Vec<PanelTag>,
	pub screenshots: Vec<ScreenshotRef>,
	pub links: Vec<ActionLink>,
	pub notes: Vec<String>,
}

pub fn favicon_url(domain: &str) -> String {
	format!("https://www.google.com/s2/favicons?domain={domain}&sz=32")
}

fn virustotal_link(domain: &str) -> ActionLink {
	ActionLink {
		label: "VirusTotal",
		url: format!("https://www.virustotal.com/gui/domain/{domain}"),
	}
}

fn urlscan_link(domain: &str) -> ActionLink {
	ActionLink {
		label: "URLScan",
		url: format!("https://urlscan.io/search/#{domain}"),
	}
}

fn archive_link(domain: &str) -> ActionLink {
	ActionLink {
		label: "Archive",
		url: format!("https://web.archive.org/web/*/{domain}"),
	}
}

fn clip(s: &str, max: usize) -> String {
	s.chars().take(max).collect()
}

fn overflow_note(total: usize, shown: usize, what: &str) -> Option<String> {
	(total > shown).then(|| format!("+{} more {what}", total - shown))
}

fn has_crypto_brand(p: &ActorRecord) -> bool {
	p.brand_impersonations().iter().any(|b| {
		let lower = b.to_lowercase();
		HIGH_VALUE_BRANDS.iter().any(|hv| lower.contains(hv))
	})
}

/// Rows shared by the hosting-flavored panels (threat leaf, scanned domain).
fn card_rows(card: &crate::model::DomainCard, rows: &mut Vec<PanelRow>) {
	if let Some(ip) = &card.ip {
		rows.push(PanelRow::mono("IP Address", ip, Tone::Default));
	}
	if let Some(country) = &card.country {
		rows.push(PanelRow::plain(
			"Country",
			format!("{} {}", flag_emoji(country), country.to_uppercase()),
		));
	}
	if let Some(server) = &card.server {
		rows.push(PanelRow::plain("Server", server));
	}
	if let Some(registrar) = card.whois.as_ref().and_then(|w| w.registrar.as_deref()) {
		rows.push(PanelRow::plain("Registrar", clip(registrar, 35)));
	}
}

/// Build the panel for a selected node. Exhaustive over the payload sum
/// type; `all_actors` resolves connection rows, `ip_info` supplies cached
/// geolocation for IP rows (missing entries render a placeholder).
pub fn node_panel(
	node: &GraphNode,
	all_actors: &[ActorRecord],
	ip_info: &HashMap<String, IpInfo>,
) -> PanelContent {
	let mut panel = PanelContent {
		icon: node.kind.glyph(),
		title: node.label.clone(),
		..PanelContent::default()
	};

	match &node.payload {
		NodePayload::Actor(p) => {
			panel.title = p.email.clone();
			panel.subtitle = p.display_name().map(str::to_string);
			panel.avatar = p.google.as_ref().and_then(|g| g.photo.clone());
			panel.country = actor_country(p, ip_info);

			let brands = p.brand_impersonations();
			if has_crypto_brand(p) {
				panel.tags.push(PanelTag {
					text: "\u{1F4B0} Crypto".into(),
					tone: Tone::Danger,
				});
			}
			for brand in brands.iter().take(3) {
				panel.tags.push(PanelTag {
					text: brand.clone(),
					tone: Tone::Warning,
				});
			}

			let domains = p.domain_count();
			if domains > 0 {
				panel.stats.push(PanelStat {
					value: domains.to_string(),
					label: "Domains".into(),
					tone: Tone::Default,
				});
			}
			let threats = p.threat_domain_count();
			if threats > 0 {
				panel.stats.push(PanelStat {
					value: threats.to_string(),
					label: "Threats".into(),
					tone: Tone::Danger,
				});
			}
			if !p.passwords.is_empty() {
				panel.stats.push(PanelStat {
					value: p.passwords.len().to_string(),
					label: "Creds".into(),
					tone: Tone::Default,
				});
			}
			let phones = p
				.leak_intel
				.as_ref()
				.map(|i| dedupe_phones(&i.phones).len())
				.unwrap_or(0);
			if phones > 0 {
				panel.stats.push(PanelStat {
					value: phones.to_string(),
					label: "Phones".into(),
					tone: Tone::Default,
				});
			}

			for card in p.screenshots().into_iter().take(4) {
				if let Some(url) = card.screenshot {
					panel.screenshots.push(ScreenshotRef {
						domain: card.domain,
						url,
					});
				}
			}

			if let Some(info) = &p.leak_info {
				if let Some(nick) = &info.nickname {
					panel.rows.push(PanelRow::plain("Nickname", nick));
				}
				if let Some(addr) = &info.address {
					panel.rows.push(PanelRow::plain("Address", clip(addr, 50)));
				}
				if let Some(phone) = &info.phone {
					panel.rows.push(PanelRow::plain("Phone", phone));
				}
			}
		}

		NodePayload::Google(g) => {
			panel.title = g.name.clone().unwrap_or_else(|| "Google Account".into());
			panel.badge = Some(PanelBadge {
				label: "GOOGLE".into(),
				tone: Tone::Info,
			});
			panel.avatar = g.photo.clone();
			if let Some(id) = &g.person_id {
				panel.rows.push(PanelRow::mono("Person ID", id, Tone::Default));
			}
			if let Some(name) = &g.name {
				panel.rows.push(PanelRow::plain("Name", name));
			}
			if let Some(updated) = &g.last_updated {
				panel.rows.push(PanelRow::plain("Last Updated", updated));
			}
			if g.uses_android {
				panel.rows.push(PanelRow::plain("Platform", "\u{1F916} Android"));
			}
			for s in &g.services {
				panel.tags.push(PanelTag {
					text: s.clone(),
					tone: Tone::Default,
				});
			}
		}

		NodePayload::Services(services) => {
			panel.title = "Google Services".into();
			for s in services {
				panel.tags.push(PanelTag {
					text: s.clone(),
					tone: Tone::Default,
				});
			}
		}

		NodePayload::Names(names) => {
			panel.title = "Real Name".into();
			for n in names {
				panel.tags.push(PanelTag {
					text: n.clone(),
					tone: Tone::Info,
				});
			}
		}

		NodePayload::Phone(ph) => {
			panel.title = "Phone Number".into();
			let country = node
				.country
				.clone()
				.or_else(|| phone_country(ph.number()).map(str::to_string));
			panel.rows.push(PanelRow::mono("Number", ph.number(), Tone::Default));
			if let Some(src) = ph.source() {
				panel.rows.push(PanelRow::plain("Source", src));
			}
			if let Some(code) = &country {
				panel.rows.push(PanelRow::plain(
					"Country",
					format!("{} {}", flag_emoji(code), code.to_uppercase()),
				));
			}
			panel.country = country;
		}

		NodePayload::Registrants { names, records } => {
			panel.title = "WHOIS Registrant".into();
			panel.badge = Some(PanelBadge {
				label: "IDENTITY".into(),
				tone: Tone::Info,
			});
			for name in names.iter().take(5) {
				panel.rows.push(PanelRow::plain("Name", name));
			}
			panel.notes.extend(overflow_note(names.len(), 5, "names"));

			let mut domains: Vec<&str> = Vec::new();
			for r in records {
				if let Some(d) = r.domain.as_deref() {
					if !domains.contains(&d) {
						domains.push(d);
					}
				}
			}
			let shown = domains.len().min(8);
			for d in domains.iter().take(8) {
				panel.tags.push(PanelTag {
					text: (*d).to_string(),
					tone: Tone::Default,
				});
			}
			panel.notes.extend(overflow_note(domains.len(), shown, "domains"));

			let mut countries: Vec<&str> = Vec::new();
			for r in records {
				if let Some(c) = r.country.as_deref() {
					if !c.contains("REDACTED") && !countries.contains(&c) {
						countries.push(c);
					}
				}
			}
			for c in countries.iter().take(5) {
				panel.tags.push(PanelTag {
					text: format!("{} {c}", flag_emoji(c)),
					tone: Tone::Info,
				});
			}
		}

		NodePayload::Passwords(passwords) => {
			panel.title = "Leaked Credentials".into();
			panel.badge = Some(PanelBadge {
				label: "EXPOSED".into(),
				tone: Tone::Danger,
			});
			let mut unique: Vec<&str> = Vec::new();
			for pw in passwords {
				if !unique.contains(&pw.password()) {
					unique.push(pw.password());
				}
			}
			panel.banner = Some(ThreatBanner {
				level: ThreatLevel::High,
				headline: "Credentials Exposed".into(),
				detail: format!("{} passwords found, {} unique", passwords.len(), unique.len()),
			});
			for pw in passwords.iter().take(10) {
				let site = pw.site();
				let label = if site == "unknown" { "Password".to_string() } else { clip(&site, 20) };
				panel.rows.push(PanelRow::mono(label, pw.password(), Tone::Danger));
			}
			panel
				.notes
				.extend(overflow_note(passwords.len(), 10, "credentials"));
		}

		NodePayload::LeakedSite { domain, passwords } => {
			panel.title = "Leaked From".into();
			panel.rows.push(PanelRow::plain("Site", domain));
			panel
				.rows
				.push(PanelRow::plain("Passwords", passwords.len().to_string()));
			for pw in passwords.iter().take(5) {
				panel
					.rows
					.push(PanelRow::mono("Credential", pw.password(), Tone::Danger));
			}
		}

		NodePayload::LeakDbs(dbs) => {
			panel.title = "Data Breaches".into();
			panel.badge = Some(PanelBadge {
				label: format!("{} LEAKS", dbs.len()),
				tone: Tone::Warning,
			});
			let mut unique: Vec<&str> = Vec::new();
			for db in dbs {
				if !unique.contains(&db.title()) {
					unique.push(db.title());
				}
			}
			panel.banner = Some(ThreatBanner {
				level: ThreatLevel::Medium,
				headline: "Data Exposed".into(),
				detail: format!("Found in {} different databases", unique.len()),
			});
			let shown = unique.len().min(15);
			for db in unique.iter().take(15) {
				panel.tags.push(PanelTag {
					text: (*db).to_string(),
					tone: Tone::Warning,
				});
			}
			panel.notes.extend(overflow_note(unique.len(), shown, "databases"));
		}

		NodePayload::LeakDb(db) => {
			panel.title = db.title().to_string();
			if let Some(u) = &db.username {
				panel.rows.push(PanelRow::plain("Username", u));
			}
			if let Some(p) = &db.password {
				panel.rows.push(PanelRow::mono("Password", p, Tone::Danger));
			}
			if let Some(ph) = &db.phone {
				panel.rows.push(PanelRow::plain("Phone", ph));
			}
			if let Some(n) = &db.name {
				panel.rows.push(PanelRow::plain("Name", n));
			}
			if let Some(ip) = &db.ip {
				panel.rows.push(PanelRow::mono("IP", ip, Tone::Default));
			}
		}

		NodePayload::Threats(threats) => {
			panel.title = "Threat Intelligence".into();
			panel.badge = Some(PanelBadge {
				label: format!("{} THREATS", threats.len()),
				tone: Tone::Danger,
			});
			let malware: Vec<_> = threats.iter().filter(|t| t.kind == ThreatKind::Malware).collect();
			let phishing: Vec<_> = threats.iter().filter(|t| t.kind == ThreatKind::Phishing).collect();
			let level = if !malware.is_empty() {
				ThreatLevel::Critical
			} else if phishing.len() > 3 {
				ThreatLevel::High
			} else {
				ThreatLevel::Medium
			};
			panel.banner = Some(ThreatBanner {
				level,
				headline: level.label().into(),
				detail: format!(
					"{} malware, {} phishing domains",
					malware.len(),
					phishing.len()
				),
			});
			for t in malware.iter().take(5) {
				panel
					.rows
					.push(PanelRow::mono("Malware", &t.domain, Tone::Danger));
			}
			panel.notes.extend(overflow_note(malware.len(), 5, "malware domains"));
			for t in phishing.iter().take(5) {
				panel
					.rows
					.push(PanelRow::mono("Phishing", &t.domain, Tone::Warning));
			}
			panel
				.notes
				.extend(overflow_note(phishing.len(), 5, "phishing domains"));
		}

		NodePayload::Threat { entry, card } => {
			panel.title = entry.domain.clone();
			match entry.kind {
				ThreatKind::Malware => {
					panel.badge = Some(PanelBadge {
						label: "Malware".into(),
						tone: Tone::Danger,
					});
					let rate = if entry.engines > 0 {
						entry.detections * 100 / entry.engines
					} else {
						0
					};
					let level = if rate > 50 {
						ThreatLevel::Critical
					} else if rate > 25 {
						ThreatLevel::High
					} else {
						ThreatLevel::Medium
					};
					panel.banner = Some(ThreatBanner {
						level,
						headline: level.label().into(),
						detail: format!(
							"{} of {} engines detected threats",
							entry.detections, entry.engines
						),
					});
					panel.rows.push(PanelRow::mono("Domain", &entry.domain, Tone::Default));
					panel.rows.push(PanelRow::mono(
						"Detections",
						format!("{} / {}", entry.detections, entry.engines),
						Tone::Danger,
					));
					if entry.suspicious > 0 {
						panel.rows.push(PanelRow::mono(
							"Suspicious",
							entry.suspicious.to_string(),
							Tone::Warning,
						));
					}
					panel.links.push(virustotal_link(&entry.domain));
					panel.links.push(urlscan_link(&entry.domain));
				}
				ThreatKind::Phishing => {
					panel.badge = Some(PanelBadge {
						label: "Phishing".into(),
						tone: Tone::Danger,
					});
					let sources = entry.sources.len().max(1);
					let level = if sources > 3 {
						ThreatLevel::Critical
					} else if sources > 1 {
						ThreatLevel::High
					} else {
						ThreatLevel::Medium
					};
					panel.banner = Some(ThreatBanner {
						level,
						headline: level.label().into(),
						detail: format!(
							"Listed in {sources} blocklist{}",
							if sources > 1 { "s" } else { "" }
						),
					});
					panel.rows.push(PanelRow::mono("Domain", &entry.domain, Tone::Default));
					if !entry.sources.is_empty() {
						panel.rows.push(PanelRow::plain(
							"Blocklists",
							format!("{} sources", entry.sources.len()),
						));
						for s in &entry.sources {
							panel.tags.push(PanelTag {
								text: s.clone(),
								tone: Tone::Danger,
							});
						}
					}
					panel.links.push(urlscan_link(&entry.domain));
					panel.links.push(archive_link(&entry.domain));
				}
			}
			if let Some(shot) = &node.screenshot {
				panel.screenshots.push(ScreenshotRef {
					domain: entry.domain.clone(),
					url: shot.clone(),
				});
			}
			if let Some(card) = card {
				card_rows(card, &mut panel.rows);
				if entry.kind == ThreatKind::Phishing {
					if let Some(title) = &card.title {
						panel.rows.push(PanelRow::plain("Title", clip(title, 40)));
					}
				}
			}
		}

		NodePayload::Domains(domains) => {
			// The group label already carries the true count.
			for d in domains.iter().take(12) {
				panel.tags.push(PanelTag {
					text: d.clone(),
					tone: Tone::Default,
				});
			}
			panel
				.notes
				.extend(overflow_note(domains.len(), domains.len().min(12), "domains"));
		}

		NodePayload::Screenshots(cards) => {
			panel.title = format!("Scanned Domains ({})", cards.len());
			for card in cards.iter().take(6) {
				if let Some(url) = &card.screenshot {
					panel.screenshots.push(ScreenshotRef {
						domain: card.domain.clone(),
						url: url.clone(),
					});
				}
			}
			panel
				.notes
				.extend(overflow_note(cards.len(), cards.len().min(6), "screenshots"));
		}

		NodePayload::ScannedDomain(card) => {
			panel.title = card.domain.clone();
			panel.badge = Some(PanelBadge {
				label: "Scanned Domain".into(),
				tone: Tone::Info,
			});
			if let Some(shot) = &card.screenshot {
				panel.screenshots.push(ScreenshotRef {
					domain: card.domain.clone(),
					url: shot.clone(),
				});
			}
			panel.rows.push(PanelRow::mono("Domain", &card.domain, Tone::Default));
			card_rows(card, &mut panel.rows);
			if let Some(title) = &card.title {
				panel.rows.push(PanelRow::plain("Page Title", clip(title, 50)));
			}
			if let Some(uuid) = &card.urlscan_uuid {
				panel
					.rows
					.push(PanelRow::mono("Scan ID", format!("{}...", clip(uuid, 16)), Tone::Default));
			}
			panel.links.push(urlscan_link(&card.domain));
			panel.links.push(archive_link(&card.domain));
		}

		NodePayload::Ips(ips) => {
			panel.title = format!("IP Addresses ({})", ips.len());
			for ip in ips.iter().take(10) {
				let addr = ip.addr();
				let row = match ip_info.get(addr) {
					Some(info) if info.loaded => {
						let flag = info.country.as_deref().map(flag_emoji).unwrap_or_default();
						let kind = if info.proxy || info.hosting {
							("Proxy/VPN", Tone::Warning)
						} else if info.mobile {
							("Mobile", Tone::Info)
						} else {
							("Residential", Tone::Success)
						};
						let mut value = format!("{flag} {}", kind.0).trim().to_string();
						if let Some(isp) = &info.isp {
							value.push_str(&format!(" \u{B7} {isp}"));
						}
						if let Some(src) = ip.source() {
							value.push_str(&format!(" ({src})"));
						}
						PanelRow {
							label: info.ip.clone(),
							value,
							tone: kind.1,
							mono: true,
						}
					}
					_ => PanelRow::mono(addr, "not loaded", Tone::Default),
				};
				panel.rows.push(row);
			}
			panel.notes.extend(overflow_note(ips.len(), 10, "addresses"));
		}

		NodePayload::ConnectedEmails(emails) => {
			panel.title = format!("Shared Passwords ({})", emails.len());
			panel.notes.push(
				"These actors share the same password with this actor - likely same person or group."
					.into(),
			);
			for email in emails.iter().take(10) {
				let flagged = all_actors
					.iter()
					.find(|p| &p.email == email)
					.is_some_and(|p| !p.blacklist_entries().is_empty());
				panel.rows.push(PanelRow {
					label: "Actor".into(),
					value: email.clone(),
					tone: if flagged { Tone::Warning } else { Tone::Default },
					mono: false,
				});
			}
			panel.notes.extend(overflow_note(emails.len(), 10, "actors"));
		}

		NodePayload::ConnectedActor { email, actor } => {
			panel.title = email.clone();
			panel.notes.push("\u{1F511} Shares password with main actor".into());
			if let Some(p) = actor {
				panel.subtitle = p.display_name().map(str::to_string);
				panel.avatar = p.google.as_ref().and_then(|g| g.photo.clone());
				let domains = p.domain_count();
				if domains > 0 {
					panel.stats.push(PanelStat {
						value: domains.to_string(),
						label: "Domains".into(),
						tone: Tone::Default,
					});
				}
				let threats = p.blacklist_entries().len();
				if threats > 0 {
					panel.stats.push(PanelStat {
						value: threats.to_string(),
						label: "Threats".into(),
						tone: Tone::Warning,
					});
				}
				if !p.passwords.is_empty() {
					panel.stats.push(PanelStat {
						value: p.passwords.len().to_string(),
						label: "Creds".into(),
						tone: Tone::Default,
					});
				}
			}
		}
	}

	panel
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{NodeKind, build_graph};

	fn actor(json: serde_json::Value) -> ActorRecord {
		serde_json::from_value(json).expect("actor record")
	}

	fn no_ips() -> HashMap<String, IpInfo> {
		HashMap::new()
	}

	#[test]
	fn bare_root_renders_minimal_panel() {
		let p = actor(serde_json::json!({ "email": "x@y.com" }));
		let g = build_graph(&p, &[], 800.0, 600.0);
		let panel = node_panel(g.root().unwrap(), &[], &no_ips());
		assert_eq!(panel.title, "x@y.com");
		assert!(panel.stats.is_empty());
		assert!(panel.rows.is_empty());
		assert!(panel.banner.is_none());
	}

	#[test]
	fn every_node_of_a_rich_actor_produces_a_panel() {
		let p = actor(serde_json::json!({
			"email": "x@y.com",
			"google": { "person_id": "g1", "name": "Ivan", "services": ["Gmail"], "uses_android": true },
			"leak_intel": {
				"real_names": ["Ivan Petrov"],
				"phones": ["+380501234567"],
				"ips": ["1.2.3.4"]
			},
			"leak_info": { "nickname": "vanya", "num_results": 2 },
			"leak_extended": { "databases": [{ "database": "Col1", "password": "pw" }] },
			"passwords": [{ "password": "p", "url": "https://shop.ua/x" }, "bare"],
			"total_domains": 4,
			"virustotal": [{ "domain": "mal.com", "malicious": 40, "harmless": 30 }],
			"blacklist": [{ "domain": "ph.com", "blacklisted": true, "sources": ["SEAL", "MetaMask"] }],
			"domain_cards": [
				{ "domain": "mal.com", "screenshot": "m.png", "ip": "9.9.9.9", "country": "ua" },
				{ "domain": "ok.com", "screenshot": "o.png", "title": "A shop" }
			],
			"connected_emails": ["peer@y.com"]
		}));
		let g = build_graph(&p, &[], 800.0, 600.0);
		assert!(g.nodes.len() > 10);
		for node in &g.nodes {
			let panel = node_panel(node, &[], &no_ips());
			assert!(!panel.title.is_empty(), "empty title for {:?}", node.kind);
		}
	}

	#[test]
	fn malware_detection_rate_drives_the_banner_level() {
		let p = actor(serde_json::json!({
			"email": "x@y.com",
			"total_domains": 1,
			"virustotal": [{ "domain": "mal.com", "malicious": 40, "harmless": 30 }]
		}));
		let g = build_graph(&p, &[], 800.0, 600.0);
		let leaf = g.nodes.iter().find(|n| n.kind == NodeKind::Malware).unwrap();
		let panel = node_panel(leaf, &[], &no_ips());
		let banner = panel.banner.unwrap();
		assert_eq!(banner.level, ThreatLevel::Critical);
		assert_eq!(banner.detail, "40 of 70 engines detected threats");
		assert_eq!(panel.links[0].label, "VirusTotal");
	}

	#[test]
	fn phishing_level_follows_blocklist_count() {
		let p = actor(serde_json::json!({
			"email": "x@y.com",
			"total_domains": 1,
			"blacklist": [{ "domain": "ph.com", "blacklisted": true, "sources": ["A", "B"] }]
		}));
		let g = build_graph(&p, &[], 800.0, 600.0);
		let leaf = g.nodes.iter().find(|n| n.kind == NodeKind::Phishing).unwrap();
		let panel = node_panel(leaf, &[], &no_ips());
		assert_eq!(panel.banner.unwrap().level, ThreatLevel::High);
		assert_eq!(panel.tags.len(), 2);
		assert_eq!(panel.links[1].label, "Archive");
	}

	#[test]
	fn ip_rows_show_placeholder_until_lookup_lands() {
		let p = actor(serde_json::json!({
			"email": "x@y.com",
			"leak_intel": { "ips": ["1.2.3.4"] }
		}));
		let g = build_graph(&p, &[], 800.0, 600.0);
		let ips = g.nodes.iter().find(|n| n.kind == NodeKind::IpsGroup).unwrap();

		let panel = node_panel(ips, &[], &no_ips());
		assert_eq!(panel.rows[0].value, "not loaded");

		let mut cache = HashMap::new();
		cache.insert(
			"1.2.3.4".to_string(),
			IpInfo {
				ip: "1.2.3.4".into(),
				country: Some("ua".into()),
				isp: Some("Kyivstar".into()),
				mobile: true,
				..IpInfo::default()
			},
		);
		// Unloaded placeholders also come back for cached failures.
		cache.get_mut("1.2.3.4").unwrap().loaded = true;
		let panel = node_panel(ips, &[], &cache);
		assert!(panel.rows[0].value.contains("Mobile"));
		assert!(panel.rows[0].value.contains("Kyivstar"));
	}

	#[test]
	fn connection_rows_flag_blacklisted_peers() {
		let peer = actor(serde_json::json!({
			"email": "peer@y.com",
			"blacklist": [{ "domain": "p.com", "blacklisted": true }]
		}));
		let p = actor(serde_json::json!({
			"email": "x@y.com",
			"connected_emails": ["peer@y.com", "clean@y.com"]
		}));
		let g = build_graph(&p, std::slice::from_ref(&peer), 800.0, 600.0);
		let group = g
			.nodes
			.iter()
			.find(|n| n.kind == NodeKind::ConnectionsGroup)
			.unwrap();
		let panel = node_panel(group, std::slice::from_ref(&peer), &no_ips());
		assert_eq!(panel.rows[0].tone, Tone::Warning);
		assert_eq!(panel.rows[1].tone, Tone::Default);
	}
}
