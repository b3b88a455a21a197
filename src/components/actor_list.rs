//! Sidebar actor roster: searchable, ordered by combined threat and intel
//! score, capped to keep the DOM light.

use leptos::prelude::*;

use crate::data::IpCache;
use crate::geo::{actor_country, flag_emoji};
use crate::model::ActorRecord;

const LIST_CAP: usize = 150;

fn initial(email: &str) -> String {
	email
		.chars()
		.next()
		.unwrap_or('U')
		.to_uppercase()
		.to_string()
}

fn clip(s: &str, max: usize) -> String {
	if s.chars().count() > max {
		let mut out: String = s.chars().take(max - 2).collect();
		out.push_str("..");
		out
	} else {
		s.to_string()
	}
}

/// Row view model, derived once per dataset/search change.
#[derive(Clone, Debug, PartialEq)]
struct ActorRow {
	email: String,
	name: Option<String>,
	photo: Option<String>,
	country: Option<String>,
	domains: usize,
	screenshots: usize,
	malware: usize,
	phishing: usize,
}

#[component]
pub fn ActorList(
	#[prop(into)] actors: Signal<Vec<ActorRecord>>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
	let search = RwSignal::new(String::new());
	let ip_cache = use_context::<IpCache>();

	let rows = Memo::new(move |_| {
		let query = search.get().to_lowercase();
		let ip_info = ip_cache.map(|c| c.snapshot()).unwrap_or_default();
		let mut list = actors.get();
		list.sort_by(|a, b| b.rank().cmp(&a.rank()));
		list.iter()
			.filter(|p| {
				query.is_empty()
					|| p.email.to_lowercase().contains(&query)
					|| p.display_name()
						.is_some_and(|n| n.to_lowercase().contains(&query))
			})
			.take(LIST_CAP)
			.map(|p| ActorRow {
				email: p.email.clone(),
				name: p.display_name().map(str::to_string),
				photo: p.google.as_ref().and_then(|g| g.photo.clone()),
				country: actor_country(p, &ip_info),
				domains: p.domain_count(),
				screenshots: p.screenshots().len(),
				malware: p.vt_entries().len(),
				phishing: p.blacklist_entries().len(),
			})
			.collect::<Vec<_>>()
	});

	let threat_count = Memo::new(move |_| {
		actors
			.get()
			.iter()
			.filter(|p| !p.vt_entries().is_empty() || !p.blacklist_entries().is_empty())
			.count()
	});

	view! {
		<div class="graph-sidebar">
			<div class="graph-search">
				<input
					type="text"
					placeholder="Search actors..."
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
			</div>
			<div class="ga-stats">
				<div class="ga-stats-item">
					<span class="ga-stats-value">{move || actors.get().len()}</span>
					<span class="ga-stats-label">"Actors"</span>
				</div>
				<div class="ga-stats-item danger">
					<span class="ga-stats-value">{move || threat_count.get()}</span>
					<span class="ga-stats-label">"Threats"</span>
				</div>
			</div>
			<div class="graph-actor-list">
				<For
					each=move || rows.get()
					key=|row| row.email.clone()
					children=move |row| {
						let email = row.email.clone();
						let active = {
							let email = email.clone();
							move || selected.get().as_deref() == Some(email.as_str())
						};
						let threats = row.malware + row.phishing;
						let row_class = move || {
							let mut c = String::from("graph-actor");
							if active() {
								c.push_str(" active");
							}
							if threats > 0 {
								c.push_str(" has-threat");
							}
							c
						};
						let on_click = {
							let email = email.clone();
							move |_| on_select.run(email.clone())
						};
						view! {
							<div class=row_class on:click=on_click>
								<div class="ga-avatar-wrap">
									{match row.photo.clone() {
										Some(src) => view! { <img class="ga-avatar" src=src /> }.into_any(),
										None => view! {
											<div class="ga-avatar">{initial(&row.email)}</div>
										}
										.into_any(),
									}}
									{(threats > 0).then(|| view! {
										<span class={if row.malware > 0 {
											"ga-threat-badge critical"
										} else {
											"ga-threat-badge high"
										}}>{threats}</span>
									})}
								</div>
								<div class="ga-content">
									<div class="ga-header">
										{row.name.clone().map(|n| view! {
											<span class="ga-name">{clip(&n, 18)}</span>
										})}
										{row.country.clone().map(|c| view! {
											<span class="ga-flag">{flag_emoji(&c)}</span>
										})}
									</div>
									<div class="ga-email">{clip(&row.email, 24)}</div>
									<div class="ga-meta">
										<span class="ga-domains">{row.domains}" domains"</span>
										{(row.screenshots > 0).then(|| view! {
											<span class="ga-screens">
												{format!("\u{1F4F7} {}", row.screenshots)}
											</span>
										})}
									</div>
								</div>
								{(threats > 0).then(|| view! {
									<div class="ga-indicators">
										{(row.malware > 0).then(|| view! {
											<span class="ga-ind malware">"\u{2620}\u{FE0F}"</span>
										})}
										{(row.phishing > 0).then(|| view! {
											<span class="ga-ind phishing">"\u{1F3A3}"</span>
										})}
									</div>
								})}
							</div>
						}
					}
				/>
			</div>
		</div>
	}
}
