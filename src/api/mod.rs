//! Talking to the entity-extraction backend.

mod client;
mod response;

pub use client::ApiClient;
#[cfg(test)]
pub(crate) use response::interpret_response;

/// Which form a submission came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
	Text,
	File,
	Url,
}

impl InputKind {
	/// What the server looked at, as used in "No entities found in the ...".
	pub fn subject(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::File => "file",
			Self::Url => "URL content",
		}
	}

	/// What the user should try instead.
	pub fn noun(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::File => "file",
			Self::Url => "URL",
		}
	}
}
