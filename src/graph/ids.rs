use std::collections::HashSet;

const TOKEN_LEN: usize = 9;
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Supplies the random suffixes used for defaulted and renamed ids.
pub trait TokenSource {
	fn next_token(&mut self) -> String;
}

/// `Math.random()` backed tokens. Only usable inside a browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTokens;

impl TokenSource for BrowserTokens {
	fn next_token(&mut self) -> String {
		token_from_fraction(js_sys::Math::random())
	}
}

/// Base-36 digits of a fraction in `[0, 1)`.
pub fn token_from_fraction(mut r: f64) -> String {
	let mut token = String::with_capacity(TOKEN_LEN);
	for _ in 0..TOKEN_LEN {
		r *= 36.0;
		let digit = (r.floor() as usize).min(35);
		token.push(DIGITS[digit] as char);
		r -= digit as f64;
	}
	token
}

/// Hands out ids that are unique within one render.
pub struct IdAllocator<'a, T: TokenSource> {
	prefix: &'static str,
	seen: HashSet<String>,
	tokens: &'a mut T,
}

impl<'a, T: TokenSource> IdAllocator<'a, T> {
	pub fn new(prefix: &'static str, tokens: &'a mut T) -> Self {
		Self {
			prefix,
			seen: HashSet::new(),
			tokens,
		}
	}

	/// Returns `requested` if it is free, otherwise a suffixed variant.
	/// Missing or empty ids get `<prefix>-<token>`.
	pub fn assign(&mut self, requested: Option<&str>) -> String {
		let mut id = match requested.filter(|id| !id.is_empty()) {
			Some(id) => id.to_string(),
			None => format!("{}-{}", self.prefix, self.tokens.next_token()),
		};
		while self.seen.contains(&id) {
			let renamed = format!("{}-{}", id, self.tokens.next_token());
			log::debug!("Duplicate {} id {id:?} renamed to {renamed:?}", self.prefix);
			id = renamed;
		}
		self.seen.insert(id.clone());
		id
	}
}
