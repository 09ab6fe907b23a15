//! Server graph payloads and their reshaping into renderer input.

mod ids;
mod model;
mod normalize;
mod palette;

pub use ids::{BrowserTokens, TokenSource};
pub use normalize::prepare_graph;
