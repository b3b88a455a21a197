//! Actor dataset model and normalization boundary.
//!
//! The ingested JSON is semi-structured: most fields are optional, several
//! arrive either as arrays or as keyed maps, and a few entries are bare
//! strings where objects are expected. Everything here degrades to "empty"
//! rather than failing, so the graph builder and panels never branch on
//! shape.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

/// The primary dataset document: `{ emails: [...], stats: {...} }`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Dataset {
	#[serde(default)]
	pub emails: Vec<ActorRecord>,
	#[serde(default)]
	pub stats: serde_json::Value,
}

impl Dataset {
	pub fn actor(&self, email: &str) -> Option<&ActorRecord> {
		self.emails.iter().find(|p| p.email == email)
	}
}

/// One email-linked threat actor with all optional enrichment attached.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ActorRecord {
	pub email: String,
	#[serde(default)]
	pub google: Option<GoogleAccount>,
	#[serde(default)]
	pub leak_intel: Option<LeakIntel>,
	#[serde(default)]
	pub leak_info: Option<LeakInfo>,
	#[serde(default)]
	pub leak_extended: Option<LeakExtended>,
	#[serde(default)]
	pub passwords: Vec<PasswordEntry>,
	#[serde(default)]
	pub domains: Vec<String>,
	#[serde(default)]
	pub total_domains: Option<u32>,
	#[serde(default)]
	pub domain_cards: Vec<DomainCard>,
	#[serde(default)]
	pub virustotal: KeyedOrList<VtVerdict>,
	#[serde(default)]
	pub blacklist: KeyedOrList<BlVerdict>,
	#[serde(default)]
	pub urlscan: KeyedOrList<DomainCard>,
	#[serde(default)]
	pub contacts: Vec<Contact>,
	#[serde(default)]
	pub whois_records: Vec<WhoisRecord>,
	#[serde(default)]
	pub crypto_indicators: Vec<String>,
	#[serde(default)]
	pub connected_emails: Vec<String>,
	#[serde(default)]
	pub user_geo: Option<UserGeo>,
	/// WHOIS registrant records, joined in from the secondary document.
	#[serde(default)]
	pub registrants: Vec<Registrant>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GoogleAccount {
	#[serde(default)]
	pub person_id: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub photo: Option<String>,
	#[serde(default)]
	pub services: Vec<String>,
	#[serde(default)]
	pub uses_android: bool,
	#[serde(default)]
	pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LeakIntel {
	#[serde(default)]
	pub real_names: Vec<String>,
	#[serde(default)]
	pub phones: Vec<PhoneEntry>,
	#[serde(default)]
	pub ips: Vec<IpEntry>,
}

/// Single-breach summary block.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LeakInfo {
	#[serde(default)]
	pub fullname: Option<String>,
	#[serde(default)]
	pub nickname: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default)]
	pub num_results: u32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LeakExtended {
	#[serde(default)]
	pub databases: Vec<LeakDatabase>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LeakDatabase {
	#[serde(default)]
	pub database: Option<String>,
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default, alias = "FullName")]
	pub name: Option<String>,
	#[serde(default)]
	pub ip: Option<String>,
}

impl LeakDatabase {
	/// Display name for the breach, `"Unknown"` when the record carries none.
	pub fn title(&self) -> &str {
		self.database
			.as_deref()
			.or(self.source.as_deref())
			.unwrap_or("Unknown")
	}
}

/// A leaked credential, either `{password, url}` or a bare password string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PasswordEntry {
	Full {
		#[serde(default)]
		password: Option<String>,
		#[serde(default)]
		url: Option<String>,
	},
	Bare(String),
}

impl PasswordEntry {
	pub fn password(&self) -> &str {
		match self {
			Self::Full { password, .. } => password.as_deref().unwrap_or(""),
			Self::Bare(p) => p,
		}
	}

	pub fn url(&self) -> Option<&str> {
		match self {
			Self::Full { url, .. } => url.as_deref(),
			Self::Bare(_) => None,
		}
	}

	/// Site bucket for this credential: URL stripped of protocol, path and
	/// leading `www.`; `"unknown"` when no URL survives.
	pub fn site(&self) -> String {
		let url = self.url().unwrap_or("");
		if url.is_empty() {
			return "unknown".into();
		}
		let stripped = url
			.strip_prefix("https://")
			.or_else(|| url.strip_prefix("http://"))
			.unwrap_or(url);
		let host = stripped.split('/').next().unwrap_or("");
		host.strip_prefix("www.").unwrap_or(host).to_string()
	}
}

/// Phone record, `{phone, source}` or a bare number string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PhoneEntry {
	Full {
		#[serde(default)]
		phone: Option<String>,
		#[serde(default)]
		source: Option<String>,
	},
	Bare(String),
}

impl PhoneEntry {
	pub fn number(&self) -> &str {
		match self {
			Self::Full { phone, .. } => phone.as_deref().unwrap_or(""),
			Self::Bare(p) => p,
		}
	}

	pub fn source(&self) -> Option<&str> {
		match self {
			Self::Full { source, .. } => source.as_deref(),
			Self::Bare(_) => None,
		}
	}

	/// Digits-only form, the dedupe key.
	pub fn digits(&self) -> String {
		self.number().chars().filter(|c| c.is_ascii_digit()).collect()
	}
}

/// Observed IP, `{ip, source}` or a bare address string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IpEntry {
	Full {
		#[serde(default)]
		ip: Option<String>,
		#[serde(default)]
		source: Option<String>,
	},
	Bare(String),
}

impl IpEntry {
	pub fn addr(&self) -> &str {
		match self {
			Self::Full { ip, .. } => ip.as_deref().unwrap_or(""),
			Self::Bare(a) => a,
		}
	}

	pub fn source(&self) -> Option<&str> {
		match self {
			Self::Full { source, .. } => source.as_deref(),
			Self::Bare(_) => None,
		}
	}
}

/// Per-domain enrichment card (screenshot, hosting, WHOIS).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DomainCard {
	#[serde(default)]
	pub domain: String,
	#[serde(default)]
	pub screenshot: Option<String>,
	#[serde(default)]
	pub ip: Option<String>,
	#[serde(default)]
	pub country: Option<String>,
	#[serde(default)]
	pub server: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub urlscan_uuid: Option<String>,
	#[serde(default)]
	pub whois: Option<Whois>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Whois {
	#[serde(default, alias = "Registrar")]
	pub registrar: Option<String>,
	#[serde(default, alias = "CreationDate")]
	pub creation_date: Option<String>,
}

/// WHOIS contact, trimmed to the fields the views consume.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Contact {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub country: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct WhoisRecord {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub registrar: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UserGeo {
	#[serde(default)]
	pub countries: Vec<String>,
}

/// WHOIS registrant row from the secondary document, keyed by actor email.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Registrant {
	#[serde(default)]
	pub actor: String,
	#[serde(default)]
	pub domain: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub country: Option<String>,
}

impl Registrant {
	/// Placeholder and redacted markers do not count as names.
	pub fn usable_name(&self) -> Option<&str> {
		let n = self.name.as_deref()?;
		if n.len() <= 2 || n.contains("REDACTED") || n.contains("???") {
			return None;
		}
		Some(n)
	}
}

/// A field that arrives either as a list of records or as a `domain -> record`
/// map. Anything else (null, scalar, mistyped) normalizes to an empty list.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeyedOrList<T> {
	List(Vec<T>),
	Keyed(BTreeMap<String, T>),
	Other(serde_json::Value),
}

impl<T> Default for KeyedOrList<T> {
	fn default() -> Self {
		Self::List(Vec::new())
	}
}

impl<T: Clone> KeyedOrList<T> {
	/// Flatten to an ordered list. For the keyed shape, `adopt_key` writes the
	/// map key (the domain) into each record before it is emitted.
	pub fn flatten(&self, adopt_key: impl Fn(&mut T, &str)) -> Vec<T> {
		match self {
			Self::List(items) => items.clone(),
			Self::Keyed(map) => map
				.iter()
				.map(|(key, value)| {
					let mut v = value.clone();
					adopt_key(&mut v, key);
					v
				})
				.collect(),
			Self::Other(_) => Vec::new(),
		}
	}
}

/// Multi-engine scanner verdict for one domain.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct VtVerdict {
	#[serde(default)]
	pub domain: String,
	#[serde(default)]
	pub malicious: u32,
	#[serde(default)]
	pub suspicious: u32,
	#[serde(default)]
	pub harmless: u32,
}

impl VtVerdict {
	pub fn engines(&self) -> u32 {
		self.harmless + self.malicious + self.suspicious
	}
}

/// Phishing-blocklist verdict for one domain.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BlVerdict {
	#[serde(default)]
	pub domain: String,
	#[serde(default)]
	pub blacklisted: bool,
	#[serde(default)]
	pub sources: Vec<String>,
	#[serde(default)]
	pub blacklist_sources: Vec<String>,
	#[serde(default)]
	pub brand_impersonation: Vec<String>,
}

impl BlVerdict {
	/// Blocklist names, whichever of the two source fields is populated.
	pub fn source_names(&self) -> &[String] {
		if self.blacklist_sources.is_empty() {
			&self.sources
		} else {
			&self.blacklist_sources
		}
	}
}

/// Threat classification of a domain-level verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreatKind {
	Malware,
	Phishing,
}

/// A normalized domain threat: scanner and blocklist verdicts folded into one
/// shape, scanner entries first.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreatEntry {
	pub domain: String,
	pub kind: ThreatKind,
	/// Malicious-engine count (malware entries).
	pub detections: u32,
	pub suspicious: u32,
	/// Total engines consulted (malware entries).
	pub engines: u32,
	/// Blocklist names (phishing entries).
	pub sources: Vec<String>,
}

impl ActorRecord {
	/// Scanner verdicts with actual detections, in source order.
	pub fn vt_entries(&self) -> Vec<VtVerdict> {
		self.virustotal
			.flatten(|v, key| v.domain = key.to_string())
			.into_iter()
			.filter(|v| v.malicious > 0 || v.suspicious > 0)
			.collect()
	}

	/// Blocklist verdicts with a positive signal, in source order.
	pub fn blacklist_entries(&self) -> Vec<BlVerdict> {
		self.blacklist
			.flatten(|v, key| v.domain = key.to_string())
			.into_iter()
			.filter(|v| v.blacklisted || !v.brand_impersonation.is_empty())
			.collect()
	}

	/// Union of both verdict families, scanner entries first.
	pub fn threat_entries(&self) -> Vec<ThreatEntry> {
		let mut out: Vec<ThreatEntry> = self
			.vt_entries()
			.into_iter()
			.map(|v| ThreatEntry {
				domain: v.domain.clone(),
				kind: ThreatKind::Malware,
				detections: v.malicious,
				suspicious: v.suspicious,
				engines: v.engines(),
				sources: Vec::new(),
			})
			.collect();
		out.extend(self.blacklist_entries().into_iter().map(|b| ThreatEntry {
			domain: b.domain.clone(),
			kind: ThreatKind::Phishing,
			detections: 0,
			suspicious: 0,
			engines: 0,
			sources: b.source_names().to_vec(),
		}));
		out
	}

	/// Count of unique threat domains across both verdict families.
	pub fn threat_domain_count(&self) -> usize {
		self.threat_entries()
			.iter()
			.map(|t| t.domain.as_str())
			.collect::<HashSet<_>>()
			.len()
	}

	/// All impersonated brand names, deduplicated, in first-seen order.
	pub fn brand_impersonations(&self) -> Vec<String> {
		let mut seen = HashSet::new();
		let mut out = Vec::new();
		for bl in self.blacklist.flatten(|v, key| v.domain = key.to_string()) {
			for brand in bl.brand_impersonation {
				if seen.insert(brand.clone()) {
					out.push(brand);
				}
			}
		}
		out
	}

	/// Enrichment card for a domain, if one was collected.
	pub fn card_for(&self, domain: &str) -> Option<&DomainCard> {
		self.domain_cards.iter().find(|c| c.domain == domain)
	}

	/// All screenshotted cards, from `domain_cards` then `urlscan`, deduped
	/// by screenshot URL.
	pub fn screenshots(&self) -> Vec<DomainCard> {
		let mut seen = HashSet::new();
		let mut out = Vec::new();
		for card in &self.domain_cards {
			if let Some(shot) = &card.screenshot {
				if seen.insert(shot.clone()) {
					out.push(card.clone());
				}
			}
		}
		for card in self.urlscan.flatten(|c, key| c.domain = key.to_string()) {
			if let Some(shot) = &card.screenshot {
				if seen.insert(shot.clone()) {
					out.push(card);
				}
			}
		}
		out
	}

	pub fn has_leak_data(&self) -> bool {
		!self.passwords.is_empty()
			|| self.leak_info.as_ref().is_some_and(|l| l.num_results > 0)
			|| self
				.leak_extended
				.as_ref()
				.is_some_and(|l| !l.databases.is_empty())
	}

	/// Combined leak signal count: passwords + breach results + databases.
	pub fn leak_count(&self) -> usize {
		self.passwords.len()
			+ self.leak_info.as_ref().map_or(0, |l| l.num_results as usize)
			+ self.leak_extended.as_ref().map_or(0, |l| l.databases.len())
	}

	/// Registered-domain count, preferring the explicit total.
	pub fn domain_count(&self) -> usize {
		self.total_domains
			.map(|n| n as usize)
			.filter(|n| *n > 0)
			.unwrap_or(self.domains.len())
	}

	/// Best-effort human name from the intel sources, in confidence order.
	pub fn display_name(&self) -> Option<&str> {
		if let Some(intel) = &self.leak_intel {
			if let Some(name) = intel.real_names.first() {
				return Some(name);
			}
		}
		if let Some(info) = &self.leak_info {
			if let Some(name) = info.fullname.as_deref() {
				return Some(name);
			}
		}
		if let Some(name) = self.google.as_ref().and_then(|g| g.name.as_deref()) {
			return Some(name);
		}
		self.contacts.iter().find_map(|c| {
			c.name
				.as_deref()
				.filter(|n| !n.contains("REDACTED") && !n.contains("???"))
		})
	}

	/// Ordering heuristic: how dangerous this actor's infrastructure looks.
	pub fn threat_score(&self) -> u32 {
		self.vt_entries().len() as u32 * 100
			+ self.blacklist_entries().len() as u32 * 80
			+ self.brand_impersonations().len() as u32 * 50
			+ self.crypto_indicators.len() as u32 * 30
	}

	/// Ordering heuristic: how much identity intelligence is attached.
	pub fn intel_score(&self) -> u32 {
		let mut s = 0;
		if let Some(g) = &self.google {
			if g.person_id.is_some() {
				s += 50;
			}
			if g.photo.is_some() {
				s += 30;
			}
			if g.name.is_some() {
				s += 20;
			}
		}
		if let Some(intel) = &self.leak_intel {
			s += intel.real_names.len() as u32 * 40;
			s += intel.phones.len() as u32 * 35;
			s += intel.ips.len() as u32 * 25;
		}
		if let Some(info) = &self.leak_info {
			if info.fullname.is_some() {
				s += 40;
			}
			if info.phone.is_some() {
				s += 35;
			}
			if info.nickname.is_some() {
				s += 15;
			}
			s += info.num_results * 10;
		}
		s += self.passwords.len() as u32 * 25;
		s += self.contacts.len() as u32 * 15;
		s += self
			.leak_extended
			.as_ref()
			.map_or(0, |l| l.databases.len() as u32)
			* 30;
		s += self
			.whois_records
			.iter()
			.filter(|w| {
				w.name
					.as_deref()
					.is_some_and(|n| !n.contains("REDACTED") && !n.contains("???"))
			})
			.count() as u32
			* 20;
		s
	}

	/// Combined ordering key for the sidebar.
	pub fn rank(&self) -> u32 {
		self.threat_score() + self.intel_score()
	}
}

/// Drop repeated phone numbers, comparing digits-only forms. Idempotent.
pub fn dedupe_phones(phones: &[PhoneEntry]) -> Vec<PhoneEntry> {
	let mut seen = HashSet::new();
	phones
		.iter()
		.filter(|ph| seen.insert(ph.digits()))
		.cloned()
		.collect()
}

/// Drop repeated IP entries, comparing addresses. Idempotent.
pub fn dedupe_ips(ips: &[IpEntry]) -> Vec<IpEntry> {
	let mut seen = HashSet::new();
	ips.iter()
		.filter(|ip| seen.insert(ip.addr().to_string()))
		.cloned()
		.collect()
}

/// Attach registrant rows to their actors, matching on email.
pub fn attach_registrants(dataset: &mut Dataset, registrants: Vec<Registrant>) {
	let mut by_actor: BTreeMap<String, Vec<Registrant>> = BTreeMap::new();
	for r in registrants {
		by_actor.entry(r.actor.clone()).or_default().push(r);
	}
	for actor in &mut dataset.emails {
		if let Some(rows) = by_actor.remove(&actor.email) {
			actor.registrants = rows;
		}
	}
}

/// Headline numbers for the explorer's stats bar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetStats {
	pub actors: usize,
	pub domains: usize,
	pub threat_domains: usize,
	/// Distinct registrar names seen across WHOIS data.
	pub registrars: usize,
	/// Actors with any leak signal plus total leaked passwords.
	pub leak_signals: usize,
}

impl DatasetStats {
	pub fn compute(actors: &[ActorRecord]) -> Self {
		let mut stats = Self {
			actors: actors.len(),
			..Self::default()
		};
		let mut registrars: HashSet<&str> = HashSet::new();
		for p in actors {
			stats.domains += p.domain_count();
			stats.threat_domains += p.threat_domain_count();
			if p.has_leak_data() {
				stats.leak_signals += 1;
			}
			stats.leak_signals += p.passwords.len();
			let usable = |r: &&str| !r.contains("REDACTED") && !r.contains("????");
			registrars.extend(
				p.whois_records
					.iter()
					.filter_map(|w| w.registrar.as_deref())
					.filter(usable),
			);
			registrars.extend(
				p.domain_cards
					.iter()
					.filter_map(|c| c.whois.as_ref().and_then(|w| w.registrar.as_deref()))
					.filter(usable),
			);
		}
		stats.registrars = registrars.len();
		stats
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn actor(json: serde_json::Value) -> ActorRecord {
		serde_json::from_value(json).expect("actor record")
	}

	#[test]
	fn virustotal_map_shape_normalizes_with_detections() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"virustotal": {
				"evil.com": { "malicious": 3, "suspicious": 0, "harmless": 67 },
				"fine.com": { "malicious": 0, "suspicious": 0, "harmless": 70 }
			}
		}));
		let vt = p.vt_entries();
		assert_eq!(vt.len(), 1);
		assert_eq!(vt[0].domain, "evil.com");
		assert_eq!(vt[0].malicious, 3);
		assert_eq!(vt[0].engines(), 70);
	}

	#[test]
	fn blacklist_list_shape_keeps_positive_signals_only() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"blacklist": [
				{ "domain": "fake-bank.com", "blacklisted": true, "sources": ["SEAL"] },
				{ "domain": "quiet.com", "blacklisted": false }
			]
		}));
		let bl = p.blacklist_entries();
		assert_eq!(bl.len(), 1);
		assert_eq!(bl[0].domain, "fake-bank.com");
		assert_eq!(bl[0].source_names(), ["SEAL".to_string()]);
	}

	#[test]
	fn malformed_verdict_fields_normalize_to_empty() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"virustotal": "corrupted",
			"blacklist": 42
		}));
		assert!(p.vt_entries().is_empty());
		assert!(p.blacklist_entries().is_empty());
		assert!(p.threat_entries().is_empty());
	}

	#[test]
	fn threat_entries_put_scanner_verdicts_first() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"virustotal": [{ "domain": "mal.com", "malicious": 5 }],
			"blacklist": [{ "domain": "phish.com", "blacklisted": true }]
		}));
		let threats = p.threat_entries();
		assert_eq!(threats.len(), 2);
		assert_eq!(threats[0].kind, ThreatKind::Malware);
		assert_eq!(threats[0].domain, "mal.com");
		assert_eq!(threats[1].kind, ThreatKind::Phishing);
	}

	#[test]
	fn bare_password_string_treated_as_unknown_site() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"passwords": ["hunter2", { "password": "qwerty", "url": "https://www.shop.ua/login" }]
		}));
		assert_eq!(p.passwords[0].password(), "hunter2");
		assert_eq!(p.passwords[0].site(), "unknown");
		assert_eq!(p.passwords[1].site(), "shop.ua");
	}

	#[test]
	fn phone_dedupe_is_idempotent_and_digit_keyed() {
		let phones = vec![
			PhoneEntry::Bare("+380 50 123 45 67".into()),
			PhoneEntry::Full {
				phone: Some("380501234567".into()),
				source: Some("breach".into()),
			},
			PhoneEntry::Bare("+79991234567".into()),
		];
		let once = dedupe_phones(&phones);
		assert_eq!(once.len(), 2);
		assert_eq!(dedupe_phones(&once), once);
	}

	#[test]
	fn ip_dedupe_is_idempotent() {
		let ips = vec![
			IpEntry::Bare("1.2.3.4".into()),
			IpEntry::Full {
				ip: Some("1.2.3.4".into()),
				source: Some("log".into()),
			},
			IpEntry::Bare("5.6.7.8".into()),
		];
		let once = dedupe_ips(&ips);
		assert_eq!(once.len(), 2);
		assert_eq!(dedupe_ips(&once), once);
	}

	#[test]
	fn screenshots_merge_cards_and_urlscan_without_repeats() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"domain_cards": [
				{ "domain": "one.com", "screenshot": "s1.png" },
				{ "domain": "bare.com" }
			],
			"urlscan": {
				"one.com": { "screenshot": "s1.png" },
				"two.com": { "screenshot": "s2.png" }
			}
		}));
		let shots = p.screenshots();
		assert_eq!(shots.len(), 2);
		assert_eq!(shots[0].domain, "one.com");
		assert_eq!(shots[1].domain, "two.com");
	}

	#[test]
	fn registrant_join_attaches_rows_by_email() {
		let mut ds = Dataset {
			emails: vec![
				actor(serde_json::json!({ "email": "a@b.c" })),
				actor(serde_json::json!({ "email": "x@y.z" })),
			],
			..Dataset::default()
		};
		attach_registrants(
			&mut ds,
			vec![
				Registrant {
					actor: "a@b.c".into(),
					domain: Some("one.com".into()),
					name: Some("Ivan Petrov".into()),
					country: None,
				},
				Registrant {
					actor: "missing@no.where".into(),
					..Registrant::default()
				},
			],
		);
		assert_eq!(ds.emails[0].registrants.len(), 1);
		assert!(ds.emails[1].registrants.is_empty());
	}

	#[test]
	fn redacted_registrant_names_are_unusable() {
		let r = Registrant {
			name: Some("REDACTED FOR PRIVACY".into()),
			..Registrant::default()
		};
		assert!(r.usable_name().is_none());
		let r = Registrant {
			name: Some("??".into()),
			..Registrant::default()
		};
		assert!(r.usable_name().is_none());
	}

	#[test]
	fn stats_count_unique_threat_domains_and_registrars() {
		let p = actor(serde_json::json!({
			"email": "a@b.c",
			"total_domains": 12,
			"virustotal": [{ "domain": "both.com", "malicious": 2 }],
			"blacklist": [
				{ "domain": "both.com", "blacklisted": true },
				{ "domain": "other.com", "blacklisted": true }
			],
			"passwords": ["p1"],
			"whois_records": [
				{ "registrar": "NameCheap, Inc." },
				{ "registrar": "REDACTED FOR PRIVACY" }
			],
			"domain_cards": [
				{ "domain": "both.com", "whois": { "registrar": "NameCheap, Inc." } }
			]
		}));
		let stats = DatasetStats::compute(std::slice::from_ref(&p));
		assert_eq!(stats.domains, 12);
		assert_eq!(stats.threat_domains, 2);
		assert_eq!(stats.leak_signals, 2);
		assert_eq!(stats.registrars, 1);
	}
}
