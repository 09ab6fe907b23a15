/// Fill used for any entity type outside the table.
pub const DEFAULT_COLOR: &str = "#7f8c8d";

const ENTITY_COLORS: &[(&str, &str)] = &[
	("PERSON", "#e74c3c"),
	("ORG", "#3498db"),
	("GPE", "#2ecc71"),
	("LOC", "#9b59b6"),
	("DATE", "#f39c12"),
	("TIME", "#1abc9c"),
	("MONEY", "#f1c40f"),
	("PERCENT", "#e67e22"),
	("FACILITY", "#95a5a6"),
	("PRODUCT", "#d35400"),
];

/// Maps an entity type to its node color. Matching is exact.
pub fn entity_color(entity_type: Option<&str>) -> &'static str {
	entity_type
		.and_then(|t| ENTITY_COLORS.iter().find(|(name, _)| *name == t))
		.map(|(_, color)| *color)
		.unwrap_or(DEFAULT_COLOR)
}
