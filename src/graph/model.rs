use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// An entity as reported by the extraction API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
	#[serde(default, deserialize_with = "truthy_scalar")]
	pub id: Option<String>,
	#[serde(default, deserialize_with = "truthy_scalar")]
	pub label: Option<String>,
	#[serde(default, rename = "type", deserialize_with = "truthy_scalar")]
	pub entity_type: Option<String>,
}

/// A relation between two entities. Endpoints are not checked here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityEdge {
	#[serde(default, deserialize_with = "truthy_scalar")]
	pub id: Option<String>,
	#[serde(default, deserialize_with = "scalar_endpoint")]
	pub source: String,
	#[serde(default, deserialize_with = "scalar_endpoint")]
	pub target: String,
	#[serde(default, deserialize_with = "truthy_scalar")]
	pub label: Option<String>,
}

/// Successful body of every `process-*` endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
	pub nodes: Vec<EntityNode>,
	pub edges: Vec<EntityEdge>,
}

impl GraphResponse {
	/// Checks that `nodes` and `edges` are arrays before decoding their items.
	pub fn from_value(value: &Value) -> Result<Self, AppError> {
		let (Some(nodes), Some(edges)) = (
			value.get("nodes").filter(|v| v.is_array()),
			value.get("edges").filter(|v| v.is_array()),
		) else {
			return Err(AppError::InvalidGraphData);
		};

		let nodes = Vec::<EntityNode>::deserialize(nodes).map_err(|e| {
			log::warn!("Rejecting node list: {e}");
			AppError::InvalidGraphData
		})?;
		let edges = Vec::<EntityEdge>::deserialize(edges).map_err(|e| {
			log::warn!("Rejecting edge list: {e}");
			AppError::InvalidGraphData
		})?;

		Ok(Self { nodes, edges })
	}
}

/// Text form of a scalar as a browser would print it. Arrays and objects
/// have none.
fn scalar_text(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(match n.as_f64() {
			Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
				format!("{}", f as i64)
			}
			_ => n.to_string(),
		}),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		_ => false,
	}
}

/// Ids, labels and types: falsy values (`0`, `false`, `""`) count as absent.
fn truthy_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Value>::deserialize(deserializer)?
		.filter(|v| !is_falsy(v))
		.and_then(scalar_text))
}

/// Edge endpoints keep any scalar, including `0`.
fn scalar_endpoint<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Value>::deserialize(deserializer)?
		.and_then(scalar_text)
		.unwrap_or_default())
}
