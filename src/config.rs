//! Client configuration: where the extraction API lives and how the graph moves.

use force_graph::SimulationParameters;

/// Build-time override for the API origin, e.g. `http://localhost:5000`.
const API_BASE_ENV: Option<&str> = option_env!("ENTITY_GRAPH_API_BASE");

/// Endpoint paths and renderer tuning shared through Leptos context.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
	/// Prefix for every endpoint. Empty means "same origin".
	pub api_base: String,
	pub text_endpoint: String,
	pub file_endpoint: String,
	pub url_endpoint: String,
	pub physics: PhysicsConfig,
	/// Seconds a node must stay hovered before its tooltip appears.
	pub tooltip_delay: f64,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			text_endpoint: "/api/process-text".into(),
			file_endpoint: "/api/process-file".into(),
			url_endpoint: "/api/process-url".into(),
			physics: PhysicsConfig::default(),
			tooltip_delay: 0.3,
		}
	}
}

impl ClientConfig {
	/// Defaults, with the API base taken from the build environment when set.
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Some(base) = API_BASE_ENV.filter(|b| !b.trim().is_empty()) {
			config.api_base = base.trim_end_matches('/').to_string();
		}
		config
	}

	/// Joins the API base with an endpoint path.
	pub fn resolve(&self, path: &str) -> String {
		format!("{}{}", self.api_base, path)
	}
}

/// Fixed force simulation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	/// Radius of the ring nodes are seeded on, per node.
	pub seed_spacing: f64,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			force_charge: 400.0,
			force_spring: 0.02,
			force_max: 120.0,
			node_speed: 3000.0,
			damping_factor: 0.85,
			seed_spacing: 12.0,
		}
	}
}

impl PhysicsConfig {
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_endpoints_are_same_origin() {
		let config = ClientConfig::default();
		assert_eq!(config.resolve(&config.text_endpoint), "/api/process-text");
		assert_eq!(config.resolve(&config.file_endpoint), "/api/process-file");
		assert_eq!(config.resolve(&config.url_endpoint), "/api/process-url");
	}

	#[test]
	fn api_base_is_prefixed() {
		let config = ClientConfig {
			api_base: "http://localhost:5000".into(),
			..ClientConfig::default()
		};
		assert_eq!(
			config.resolve(&config.url_endpoint),
			"http://localhost:5000/api/process-url"
		);
	}
}
