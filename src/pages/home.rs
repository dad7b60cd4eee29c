use leptos::prelude::*;
use log::{info, warn};

use crate::components::thought_cloud::{ThoughtCloud, ThoughtError, ThoughtRecord, VisualizerConfig, parse_thoughts};

const DATA_ELEMENT: &str = "thought-data";
const CONFIG_ELEMENT: &str = "thought-cloud-config";

const SAMPLE_TOPICS: &[&str] = &[
	"morning run",
	"reading notes",
	"project idea",
	"recipe",
	"meeting recap",
	"travel plan",
];

/// Generate a clustered sample cloud (deterministic for consistency).
fn generate_sample_thoughts(n: usize) -> Vec<ThoughtRecord> {
	let clusters = SAMPLE_TOPICS.len();
	(0..n)
		.map(|i| {
			let label = i % clusters;
			let angle = label as f64 * std::f64::consts::TAU / clusters as f64;
			let center = [3.0 * angle.cos(), 1.5 * (angle * 2.0).sin(), 3.0 * angle.sin()];
			let jitter = |k: usize| (rand_simple(i * 3 + k) - 0.5) * 1.6;
			ThoughtRecord {
				id: format!("sample-{i}"),
				title: format!("{} #{}", SAMPLE_TOPICS[label], i / clusters + 1),
				excerpt: format!("A short note about {}.", SAMPLE_TOPICS[label]),
				position: vec![
					Some(10.0 + center[0] + jitter(0)),
					Some(-4.0 + center[1] + jitter(1)),
					Some(7.0 + center[2] + jitter(2)),
				],
				label: label as u32,
				created_at: None,
			}
		})
		.collect()
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Text of an embedded `<script type="application/json">` element, if any.
fn embedded_json(id: &str) -> Option<String> {
	document().get_element_by_id(id)?.text_content()
}

fn load_thoughts() -> Result<Vec<ThoughtRecord>, ThoughtError> {
	match embedded_json(DATA_ELEMENT) {
		Some(json) => parse_thoughts(&json),
		None => Ok(generate_sample_thoughts(60)),
	}
}

fn load_config() -> VisualizerConfig {
	let Some(json) = embedded_json(CONFIG_ELEMENT) else {
		return VisualizerConfig::default();
	};
	VisualizerConfig::from_json(&json).unwrap_or_else(|e| {
		warn!("ignoring visualizer config: {e}");
		VisualizerConfig::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let thoughts = match load_thoughts() {
		Ok(thoughts) => {
			info!("loaded {} thoughts", thoughts.len());
			Some(thoughts)
		}
		Err(e) => {
			warn!("could not load thoughts: {e}");
			Some(Vec::new())
		}
	};
	let thoughts = Signal::derive(move || thoughts.clone());
	let config = load_config();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<ThoughtCloud thoughts=thoughts config=config />
		</ErrorBoundary>
	}
}
