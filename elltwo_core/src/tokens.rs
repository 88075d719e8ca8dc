use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

/// Column alignment declared by a table's alignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
	Left,
	Center,
	Right,
}

impl Alignment {
	/// Classify one alignment-row cell: `--:` is right, `:-:` is center, `:--`
	/// is left. Anything else is unaligned.
	pub fn classify(cell: &str) -> Option<Self> {
		let cell = cell.trim_matches(' ');
		let (leading, rest) = match cell.strip_prefix(':') {
			Some(rest) => (true, rest),
			None => (false, cell),
		};
		let (trailing, dashes) = match rest.strip_suffix(':') {
			Some(dashes) => (true, dashes),
			None => (false, rest),
		};

		if dashes.is_empty() || !dashes.bytes().all(|byte| byte == b'-') {
			return None;
		}

		match (leading, trailing) {
			(false, true) => Some(Self::Right),
			(true, true) => Some(Self::Center),
			(true, false) => Some(Self::Left),
			(false, false) => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Left => "left",
			Self::Center => "center",
			Self::Right => "right",
		}
	}
}

/// Block level tokens produced by the block lexer.
///
/// Container constructs are flattened into `*Start` / `*End` pairs which are
/// always well nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
	/// Two or more consecutive newlines.
	Newline,
	/// A fenced or indented code block.
	Code { lang: Option<String>, text: String },
	/// `# text` or a setext underlined heading.
	Heading { level: u8, text: String },
	/// `---`
	Hrule,
	ListStart { ordered: bool },
	ListEnd,
	/// Start of a tight list item whose text is rendered inline.
	ListItemStart,
	/// Start of a loose list item whose content is rendered as blocks.
	LooseItemStart,
	ListItemEnd,
	BlockQuoteStart,
	BlockQuoteEnd,
	Table {
		header: Vec<String>,
		align: Vec<Option<Alignment>>,
		cells: Vec<Vec<String>>,
	},
	Paragraph { text: String },
	/// A bare line that was not wrapped into a paragraph.
	Text { text: String },
	/// `$$ [tag] tex`
	Equation { tag: Option<String>, tex: String },
	/// `#! text`
	Title { text: String },
	/// `![title](link)` on its own.
	Image { title: String, link: String },
}

/// The ordered token sequence for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Tokens(
	#[deref]
	#[deref_mut]
	Vec<Token>,
);

impl Tokens {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn into_inner(self) -> Vec<Token> {
		self.0
	}

	pub fn cursor(&self) -> TokenCursor<'_> {
		TokenCursor {
			tokens: &self.0,
			index: 0,
		}
	}
}

impl From<Vec<Token>> for Tokens {
	fn from(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}
}

/// Forward-only cursor over a token sequence with one token of lookahead.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
	tokens: &'a [Token],
	index: usize,
}

impl<'a> Iterator for TokenCursor<'a> {
	type Item = &'a Token;

	fn next(&mut self) -> Option<Self::Item> {
		let token = self.tokens.get(self.index)?;
		self.index += 1;
		Some(token)
	}
}

impl<'a> TokenCursor<'a> {
	/// Look at the next token without consuming it.
	pub fn peek(&self) -> Option<&'a Token> {
		self.tokens.get(self.index)
	}

	/// Consume the next token only when it is bare text.
	pub fn next_text(&mut self) -> Option<&'a str> {
		match self.peek() {
			Some(Token::Text { text }) => {
				self.index += 1;
				Some(text)
			}
			_ => None,
		}
	}
}
