//! Generic renderer for [`PanelContent`]. All type-specific logic lives in
//! `panel::node_panel`; this component just lays the view model out, so the
//! backend could be swapped without touching the dispatch.

use leptos::prelude::*;

use crate::geo::flag_emoji;
use crate::panel::PanelContent;

#[component]
pub fn DetailPanel(#[prop(into)] content: Signal<Option<PanelContent>>) -> impl IntoView {
	view! {
		<div class="graph-info-panel">
			{move || match content.get() {
				None => view! {
					<div class="info-placeholder">"Select a node to view details"</div>
				}
				.into_any(),
				Some(panel) => {
					let country = panel.country.clone();
					view! {
						<div class="panel-header">
							{match panel.avatar.clone() {
								Some(src) => view! { <img class="panel-avatar" src=src /> }.into_any(),
								None => view! { <div class="panel-icon">{panel.icon}</div> }.into_any(),
							}}
							<div class="panel-identity">
								<div class="panel-title">{panel.title.clone()}</div>
								{panel.subtitle.clone().map(|s| view! { <div class="panel-name">{s}</div> })}
								{country.map(|c| view! {
									<div class="panel-location">
										{format!("{} {}", flag_emoji(&c), c.to_uppercase())}
									</div>
								})}
								{panel.badge.clone().map(|b| view! {
									<span class=format!("node-type-badge {}", b.tone.css_class())>
										{b.label}
									</span>
								})}
							</div>
						</div>

						{panel.banner.clone().map(|b| view! {
							<div class=format!("threat-level {}", b.level.css_class())>
								<div class="threat-level-text">
									<div class="level">{b.headline}</div>
									<div class="desc">{b.detail}</div>
								</div>
							</div>
						})}

						{(!panel.stats.is_empty()).then(|| view! {
							<div class="panel-stats">
								{panel
									.stats
									.iter()
									.map(|s| view! {
										<div class=format!("ps-item {}", s.tone.css_class())>
											<span>{s.value.clone()}</span>
											{s.label.clone()}
										</div>
									})
									.collect_view()}
							</div>
						})}

						{(!panel.rows.is_empty()).then(|| view! {
							<div class="panel-details">
								{panel
									.rows
									.iter()
									.map(|r| {
										let value_class =
											format!("pd-value {} {}", r.tone.css_class(), if r.mono { "monospace" } else { "" });
										view! {
											<div class="pd-row">
												<span>{r.label.clone()}</span>
												<span class=value_class>{r.value.clone()}</span>
											</div>
										}
									})
									.collect_view()}
							</div>
						})}

						{(!panel.tags.is_empty()).then(|| view! {
							<div class="panel-tags">
								{panel
									.tags
									.iter()
									.map(|t| view! {
										<span class=format!("panel-tag {}", t.tone.css_class())>
											{t.text.clone()}
										</span>
									})
									.collect_view()}
							</div>
						})}

						{(!panel.screenshots.is_empty()).then(|| view! {
							<div class="panel-screenshots">
								{panel
									.screenshots
									.iter()
									.map(|s| view! {
										<div class="panel-thumb">
											<img src=s.url.clone() loading="lazy" />
											<span>{s.domain.clone()}</span>
										</div>
									})
									.collect_view()}
							</div>
						})}

						{(!panel.links.is_empty()).then(|| view! {
							<div class="panel-actions">
								{panel
									.links
									.iter()
									.map(|l| view! {
										<a href=l.url.clone() target="_blank" class="btn btn-sm">
											{l.label}
										</a>
									})
									.collect_view()}
							</div>
						})}

						{panel
							.notes
							.iter()
							.map(|n| view! { <p class="panel-note">{n.clone()}</p> })
							.collect_view()}
					}
					.into_any()
				}
			}}
		</div>
	}
}
