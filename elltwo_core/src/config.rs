use serde::Deserialize;

/// Default depth at which nested blocks and inline spans stop recursing.
pub const DEFAULT_MAX_NESTING: usize = 32;

/// Tab stop width used when expanding tabs during preprocessing.
pub const TAB_SIZE: usize = 4;

/// Rendering options shared by the lexers and the bundled renderers.
///
/// Every field has a default, so hosts can deserialize a partial table from
/// their own configuration files:
///
/// ```toml
/// [markdown]
/// use_xhtml = true
/// hard_wrap = true
/// ```
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
	/// Escape `&`, `<` and `>` in literal text. When disabled, text is passed
	/// through untouched.
	pub escape: bool,
	/// Emit self-closing `<br />` and `<hr />` tags.
	pub use_xhtml: bool,
	/// Treat every newline inside a paragraph as a line break.
	pub hard_wrap: bool,
	/// Pass raw HTML found in text through to the output.
	pub parse_block_html: bool,
	/// Maximum nesting depth for blockquotes, list items and inline spans.
	pub max_nesting: usize,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			escape: true,
			use_xhtml: false,
			hard_wrap: false,
			parse_block_html: false,
			max_nesting: DEFAULT_MAX_NESTING,
		}
	}
}

impl Options {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_escape(mut self, enabled: bool) -> Self {
		self.escape = enabled;
		self
	}

	pub fn with_xhtml(mut self, enabled: bool) -> Self {
		self.use_xhtml = enabled;
		self
	}

	pub fn with_hard_wrap(mut self, enabled: bool) -> Self {
		self.hard_wrap = enabled;
		self
	}

	pub fn with_block_html(mut self, enabled: bool) -> Self {
		self.parse_block_html = enabled;
		self
	}

	pub fn with_max_nesting(mut self, depth: usize) -> Self {
		self.max_nesting = depth;
		self
	}

	/// Whether literal text should reach the output without escaping.
	pub fn passes_raw_html(&self) -> bool {
		self.parse_block_html || !self.escape
	}
}
