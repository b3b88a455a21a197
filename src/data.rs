//! Startup data loading and the session-lifetime IP geolocation cache.
//!
//! Two static documents are fetched in parallel at boot: the primary actor
//! dataset and an optional registrants list joined in by actor email. A
//! missing or malformed registrants document is tolerated; a failed primary
//! fetch is logged and leaves the UI empty.

use std::collections::HashMap;

use leptos::prelude::*;
use log::warn;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::model::{Dataset, Registrant, attach_registrants};

const DATA_URL: &str = "data/data.json";
const REGISTRANTS_URL: &str = "data/registrants.json";
const IP_BATCH_URL: &str =
	"http://ip-api.com/batch?fields=status,query,country,countryCode,isp,org,mobile,proxy,hosting";
/// ip-api batch endpoint limit.
const IP_BATCH_CAP: usize = 100;

/// Failure modes of the fetch/parse path.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("no window object available")]
	NoWindow,
	#[error("request failed: {0}")]
	Network(String),
	#[error("http status {0}")]
	Status(u16),
	#[error("response body was not text")]
	Body,
	#[error("parse error: {0}")]
	Parse(#[from] serde_json::Error),
}

fn js_err(e: JsValue) -> FetchError {
	FetchError::Network(format!("{e:?}"))
}

async fn response_text(resp_value: JsValue) -> Result<String, FetchError> {
	let resp: Response = resp_value.dyn_into().map_err(js_err)?;
	if !resp.ok() {
		return Err(FetchError::Status(resp.status()));
	}
	let text = JsFuture::from(resp.text().map_err(js_err)?)
		.await
		.map_err(js_err)?;
	text.as_string().ok_or(FetchError::Body)
}

async fn fetch_text(url: &str) -> Result<String, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let resp = JsFuture::from(window.fetch_with_str(url)).await.map_err(js_err)?;
	response_text(resp).await
}

async fn post_json(url: &str, body: &str) -> Result<String, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let opts = RequestInit::new();
	opts.set_method("POST");
	opts.set_body(&JsValue::from_str(body));
	let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
	let resp = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_err)?;
	response_text(resp).await
}

/// Fetch and join both startup documents. The registrants fetch runs in
/// parallel with the primary one and its failure is downgraded to a log
/// line.
pub async fn load_dataset() -> Result<Dataset, FetchError> {
	let (data, registrants) = futures::join!(fetch_text(DATA_URL), fetch_text(REGISTRANTS_URL));

	let mut dataset: Dataset = serde_json::from_str(&data?)?;

	match registrants.and_then(|text| Ok(serde_json::from_str::<Vec<Registrant>>(&text)?)) {
		Ok(rows) => attach_registrants(&mut dataset, rows),
		Err(e) => warn!("registrants unavailable: {e}"),
	}

	Ok(dataset)
}

/// Geolocation verdict for one IP address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IpInfo {
	pub ip: String,
	/// Lowercase two-letter code.
	pub country: Option<String>,
	pub isp: Option<String>,
	pub mobile: bool,
	pub proxy: bool,
	pub hosting: bool,
	pub loaded: bool,
}

#[derive(Debug, Deserialize)]
struct IpApiRow {
	#[serde(default)]
	status: String,
	#[serde(default)]
	query: String,
	#[serde(default, rename = "countryCode")]
	country_code: Option<String>,
	#[serde(default)]
	isp: Option<String>,
	#[serde(default)]
	org: Option<String>,
	#[serde(default)]
	mobile: bool,
	#[serde(default)]
	proxy: bool,
	#[serde(default)]
	hosting: bool,
}

/// Session-lifetime geolocation cache. Lives in a reactive signal so any
/// panel deriving from it re-renders when lookups land; owned by the app
/// shell and handed down via context rather than living as a module global.
#[derive(Clone, Copy)]
pub struct IpCache {
	entries: RwSignal<HashMap<String, IpInfo>>,
}

impl Default for IpCache {
	fn default() -> Self {
		Self::new()
	}
}

impl IpCache {
	pub fn new() -> Self {
		Self {
			entries: RwSignal::new(HashMap::new()),
		}
	}

	/// Reactive read of the whole cache.
	pub fn snapshot(&self) -> HashMap<String, IpInfo> {
		self.entries.get()
	}

	/// Resolve a batch of addresses, skipping ones already cached. Results
	/// land in the cache; callers observing [`IpCache::snapshot`] re-render.
	/// Failures only log - unresolved addresses keep their placeholder row.
	pub async fn lookup_batch(&self, ips: Vec<String>) {
		let to_fetch: Vec<String> = {
			let cached = self.entries.get_untracked();
			ips.into_iter()
				.filter(|ip| !ip.is_empty() && !cached.contains_key(ip))
				.take(IP_BATCH_CAP)
				.collect()
		};
		if to_fetch.is_empty() {
			return;
		}

		let body = serde_json::json!(
			to_fetch
				.iter()
				.map(|ip| serde_json::json!({ "query": ip }))
				.collect::<Vec<_>>()
		)
		.to_string();

		let rows: Vec<IpApiRow> = match post_json(IP_BATCH_URL, &body)
			.await
			.and_then(|text| Ok(serde_json::from_str(&text)?))
		{
			Ok(rows) => rows,
			Err(e) => {
				warn!("batch IP lookup failed: {e}");
				return;
			}
		};

		self.entries.update(|cache| {
			for row in rows {
				if row.status != "success" || row.query.is_empty() {
					continue;
				}
				cache.insert(
					row.query.clone(),
					IpInfo {
						ip: row.query,
						country: row.country_code.map(|c| c.to_lowercase()),
						isp: row.isp.or(row.org),
						mobile: row.mobile,
						proxy: row.proxy || row.hosting,
						hosting: row.hosting,
						loaded: true,
					},
				);
			}
		});
	}
}
