//! Country heuristics: phone-prefix resolution and weighted actor-country
//! voting. All of this is best-effort scoring over leaked breadcrumbs, not a
//! geolocation service.

use std::collections::HashMap;

use crate::data::IpInfo;
use crate::model::{ActorRecord, dedupe_phones};

/// Services that only operate in one country. A match is a strong-ish vote
/// for that country; international brands are deliberately absent.
const GEO_SOURCES: &[(&str, &str)] = &[
	// Russia
	("alfabank", "ru"),
	("sberbank", "ru"),
	("tinkoff", "ru"),
	("vtb", "ru"),
	("gazprombank", "ru"),
	("rosbank", "ru"),
	("sovcombank", "ru"),
	("pochta.ru", "ru"),
	("cdek", "ru"),
	("boxberry", "ru"),
	("wildberries", "ru"),
	("ozon", "ru"),
	("dns-shop", "ru"),
	("mvideo", "ru"),
	("eldorado", "ru"),
	("citilink", "ru"),
	("magnit", "ru"),
	("pyaterochka", "ru"),
	("yandex", "ru"),
	("mail.ru", "ru"),
	("rambler", "ru"),
	("gosuslugi", "ru"),
	("nalog.ru", "ru"),
	("avito", "ru"),
	("youla", "ru"),
	("auto.ru", "ru"),
	("hh.ru", "ru"),
	("mts", "ru"),
	("megafon", "ru"),
	("beeline", "ru"),
	("tele2", "ru"),
	("rostelecom", "ru"),
	("vk.com", "ru"),
	("vkontakte", "ru"),
	("ok.ru", "ru"),
	("pikabu", "ru"),
	("kinopoisk", "ru"),
	("sportmaster", "ru"),
	// Ukraine
	("privatbank", "ua"),
	("privat24", "ua"),
	("monobank", "ua"),
	("oschadbank", "ua"),
	("novaposhta", "ua"),
	("nova poshta", "ua"),
	("ukrposhta", "ua"),
	("meest", "ua"),
	("rozetka", "ua"),
	("epicentr", "ua"),
	("comfy", "ua"),
	("foxtrot", "ua"),
	("allo.ua", "ua"),
	("silpo", "ua"),
	("olx.ua", "ua"),
	("work.ua", "ua"),
	("rabota.ua", "ua"),
	("kyivstar", "ua"),
	("vodafone.ua", "ua"),
	("lifecell", "ua"),
	("prom.ua", "ua"),
	("hotline.ua", "ua"),
	("auto.ria", "ua"),
	("ukr.net", "ua"),
	("i.ua", "ua"),
	("meta.ua", "ua"),
	("diia", "ua"),
	("volia", "ua"),
	("triolan", "ua"),
	("datagroup", "ua"),
	// Belarus
	("belarusbank", "by"),
	("priorbank", "by"),
	("euroopt", "by"),
	("onliner", "by"),
	("21vek", "by"),
	// Kazakhstan
	("kaspi", "kz"),
	("halyk", "kz"),
	("kolesa.kz", "kz"),
	("krisha.kz", "kz"),
	("olx.kz", "kz"),
	// USA
	("uber", "us"),
	("doordash", "us"),
	("venmo", "us"),
	("cashapp", "us"),
	("paypal", "us"),
	("chase", "us"),
	("wellsfargo", "us"),
	("walmart", "us"),
	("linkedin", "us"),
	("facebook", "us"),
	("instagram", "us"),
	// Europe
	("revolut", "gb"),
	("n26", "de"),
	("klarna", "se"),
];

/// Dial prefixes checked after the special-cased CIS/NANP rules, longest
/// first within each length class.
const DIAL_PREFIXES: &[(&str, &str)] = &[
	("998", "uz"),
	("995", "ge"),
	("994", "az"),
	("374", "am"),
	("373", "md"),
	("371", "lv"),
	("370", "lt"),
	("372", "ee"),
	("234", "ng"),
	("233", "gh"),
	("254", "ke"),
	("212", "ma"),
	("971", "ae"),
	("966", "sa"),
	("972", "il"),
	("880", "bd"),
	("351", "pt"),
	("358", "fi"),
	("353", "ie"),
	("420", "cz"),
	("421", "sk"),
	("386", "si"),
	("385", "hr"),
	("381", "rs"),
	("359", "bg"),
	("44", "gb"),
	("49", "de"),
	("33", "fr"),
	("39", "it"),
	("34", "es"),
	("31", "nl"),
	("48", "pl"),
	("40", "ro"),
	("90", "tr"),
	("86", "cn"),
	("81", "jp"),
	("82", "kr"),
	("91", "in"),
	("55", "br"),
	("52", "mx"),
	("27", "za"),
	("20", "eg"),
	("92", "pk"),
	("84", "vn"),
	("66", "th"),
	("62", "id"),
	("60", "my"),
	("63", "ph"),
	("65", "sg"),
	("61", "au"),
	("64", "nz"),
	("41", "ch"),
	("43", "at"),
	("32", "be"),
	("30", "gr"),
	("46", "se"),
	("47", "no"),
	("45", "dk"),
	("36", "hu"),
];

/// Resolve a phone number to an ISO country code by dial prefix.
///
/// The shared `7` country code is split on the second digit: `77…` numbers
/// are Kazakh, the rest Russian. Domestic-format Russian numbers (leading
/// `8`) are recognized too.
pub fn phone_country(phone: &str) -> Option<&'static str> {
	let num: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
	if num.len() < 10 {
		return None;
	}
	if num.len() == 11 && num.starts_with('7') {
		return Some(if num.as_bytes()[1] == b'7' { "kz" } else { "ru" });
	}
	if num.len() == 11 && num.starts_with('8') {
		return Some("ru");
	}
	if num.len() == 12 && num.starts_with("380") {
		return Some("ua");
	}
	if num.len() == 12 && num.starts_with("375") {
		return Some("by");
	}
	if num.len() == 11 && num.starts_with('1') {
		return Some("us");
	}
	DIAL_PREFIXES
		.iter()
		.find(|(prefix, _)| num.starts_with(prefix))
		.map(|(_, country)| *country)
}

/// Fold a country name or code to a two-letter lowercase code, if possible.
pub fn normalize_country(raw: &str) -> Option<String> {
	let c = raw.trim().to_lowercase();
	let mapped = match c.as_str() {
		"ukraine" => "ua",
		"russia" | "russian federation" => "ru",
		"belarus" => "by",
		"kazakhstan" => "kz",
		"united states" | "usa" => "us",
		"united kingdom" | "uk" => "gb",
		"germany" => "de",
		"france" => "fr",
		"poland" => "pl",
		"nigeria" => "ng",
		"china" => "cn",
		"india" => "in",
		other => other,
	};
	(mapped.len() == 2 && mapped.chars().all(|ch| ch.is_ascii_alphabetic()))
		.then(|| mapped.to_string())
}

/// Regional-indicator flag for a two-letter code, empty when malformed.
pub fn flag_emoji(code: &str) -> String {
	if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
		return String::new();
	}
	code.chars()
		.filter_map(|c| char::from_u32(0x1F1E6 + c.to_ascii_uppercase() as u32 - 'A' as u32))
		.collect()
}

/// Weighted-vote accumulator for an actor's likely country.
#[derive(Debug, Default)]
pub struct CountryVotes {
	tally: HashMap<String, u32>,
}

impl CountryVotes {
	pub fn cast(&mut self, raw: &str, weight: u32) {
		if let Some(code) = normalize_country(raw) {
			*self.tally.entry(code).or_default() += weight;
		}
	}

	/// Winner by weight; ties break lexicographically for determinism.
	pub fn winner(self) -> Option<String> {
		self.tally
			.into_iter()
			.max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
			.map(|(code, _)| code)
	}
}

/// Guess an actor's country from every breadcrumb we hold, strongest
/// evidence first: WHOIS contacts, then phone prefixes, then leak-source
/// hints, local-service names, IP geolocation, and finally weak signals.
pub fn actor_country(p: &ActorRecord, ip_info: &HashMap<String, IpInfo>) -> Option<String> {
	let mut votes = CountryVotes::default();

	for c in &p.contacts {
		if let Some(country) = &c.country {
			votes.cast(country, 5);
		}
	}

	if let Some(intel) = &p.leak_intel {
		for ph in dedupe_phones(&intel.phones) {
			if let Some(code) = phone_country(ph.number()) {
				votes.cast(code, 4);
			}
		}
	}

	let mut sources: Vec<String> = Vec::new();
	if let Some(ext) = &p.leak_extended {
		for db in &ext.databases {
			sources.extend(db.database.iter().cloned());
			sources.extend(db.source.iter().cloned());
		}
	}
	if let Some(intel) = &p.leak_intel {
		for ph in &intel.phones {
			sources.extend(ph.source().map(str::to_string));
		}
		for ip in &intel.ips {
			sources.extend(ip.source().map(str::to_string));
		}
	}

	for src in &sources {
		let lower = src.to_lowercase();
		for (tld, country) in [("ua", "ua"), ("ru", "ru"), ("by", "by"), ("kz", "kz")] {
			if lower.contains(&format!(".{tld}")) || lower.contains(&format!("_{tld}")) {
				votes.cast(country, 3);
				break;
			}
		}
		let squashed: String = lower.chars().filter(|c| !" _-".contains(*c)).collect();
		for (service, country) in GEO_SOURCES {
			let key: String = service.chars().filter(|c| !" _-".contains(*c)).collect();
			if squashed.contains(&key) {
				votes.cast(country, 2);
			}
		}
	}

	if let Some(intel) = &p.leak_intel {
		for ip in &intel.ips {
			if let Some(info) = ip_info.get(ip.addr()) {
				if let Some(country) = &info.country {
					votes.cast(country, 2);
				}
			}
			if let Some(src) = ip.source() {
				let s = src.to_lowercase();
				const UA_ISP_HINTS: &[&str] =
					&["volia", "kharkov", "kharkiv", "kyiv", "kiev", "triolan", "ukr", "datagroup"];
				if UA_ISP_HINTS.iter().any(|hint| s.contains(hint)) {
					votes.cast("ua", 3);
				}
			}
		}
	}

	if let Some(geo) = &p.user_geo {
		if let Some(country) = geo.countries.first() {
			votes.cast(country, 1);
		}
	}
	if let Some(country) = p.domain_cards.first().and_then(|c| c.country.as_deref()) {
		votes.cast(country, 1);
	}

	votes.winner()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cis_prefixes_disambiguate_on_second_digit() {
		assert_eq!(phone_country("+380501234567"), Some("ua"));
		assert_eq!(phone_country("+79991234567"), Some("ru"));
		assert_eq!(phone_country("+77771234567"), Some("kz"));
		assert_eq!(phone_country("89991234567"), Some("ru"));
		assert_eq!(phone_country("+375291234567"), Some("by"));
	}

	#[test]
	fn nanp_and_table_prefixes() {
		assert_eq!(phone_country("+12025550123"), Some("us"));
		assert_eq!(phone_country("+442071234567"), Some("gb"));
		assert_eq!(phone_country("+998901234567"), Some("uz"));
	}

	#[test]
	fn short_or_empty_numbers_resolve_to_nothing() {
		assert_eq!(phone_country(""), None);
		assert_eq!(phone_country("12345"), None);
		assert_eq!(phone_country("not a phone"), None);
	}

	#[test]
	fn country_names_normalize_to_codes() {
		assert_eq!(normalize_country("Russian Federation").as_deref(), Some("ru"));
		assert_eq!(normalize_country("UA").as_deref(), Some("ua"));
		assert_eq!(normalize_country("Atlantis").is_none(), true);
	}

	#[test]
	fn flag_emoji_builds_regional_indicators() {
		assert_eq!(flag_emoji("ua"), "\u{1F1FA}\u{1F1E6}");
		assert_eq!(flag_emoji(""), "");
		assert_eq!(flag_emoji("xyz"), "");
	}

	#[test]
	fn voting_prefers_heavier_evidence() {
		let mut votes = CountryVotes::default();
		votes.cast("ua", 3);
		votes.cast("ru", 2);
		votes.cast("ru", 2);
		assert_eq!(votes.winner().as_deref(), Some("ru"));
	}

	#[test]
	fn phone_evidence_outvotes_weak_hosting_hint() {
		let p: ActorRecord = serde_json::from_value(serde_json::json!({
			"email": "a@b.c",
			"leak_intel": { "phones": ["+380501234567"] },
			"domain_cards": [{ "domain": "x.com", "country": "us" }]
		}))
		.unwrap();
		assert_eq!(actor_country(&p, &HashMap::new()).as_deref(), Some("ua"));
	}
}
