use crate::Alignment;

/// Output type built up by a [`Renderer`].
///
/// `Default` provides the empty value and [`Accumulator::append`] must be
/// associative, so the interpreter can concatenate partial renders in any
/// grouping.
pub trait Accumulator: Default {
	fn append(&mut self, other: Self);
}

impl Accumulator for String {
	fn append(&mut self, other: Self) {
		self.push_str(&other);
	}
}

impl<T> Accumulator for Vec<T> {
	fn append(&mut self, other: Self) {
		self.extend(other);
	}
}

/// Flags passed along with each table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellFlags {
	/// The cell belongs to the header row.
	pub header: bool,
	pub align: Option<Alignment>,
}

/// One method per renderable construct.
///
/// Methods receive child content that has already been rendered into
/// [`Renderer::Output`]. The exceptions are [`Renderer::codespan`],
/// [`Renderer::text`], [`Renderer::escape`], [`Renderer::block_code`],
/// [`Renderer::reflink`] and the math methods, which receive literal source
/// substrings.
pub trait Renderer {
	type Output: Accumulator;

	/// The empty output value.
	fn placeholder(&self) -> Self::Output {
		Self::Output::default()
	}

	fn block_code(&mut self, code: &str, lang: Option<&str>) -> Self::Output;
	fn block_quote(&mut self, body: Self::Output) -> Self::Output;
	/// `raw` is the heading text before inline rendering.
	fn header(&mut self, text: Self::Output, level: u8, raw: &str) -> Self::Output;
	fn hrule(&mut self) -> Self::Output;
	fn list(&mut self, body: Self::Output, ordered: bool) -> Self::Output;
	fn list_item(&mut self, body: Self::Output) -> Self::Output;
	fn paragraph(&mut self, text: Self::Output) -> Self::Output;
	fn table(&mut self, header: Self::Output, body: Self::Output) -> Self::Output;
	fn table_row(&mut self, content: Self::Output) -> Self::Output;
	fn table_cell(&mut self, content: Self::Output, flags: CellFlags) -> Self::Output;

	fn double_emphasis(&mut self, text: Self::Output) -> Self::Output;
	fn emphasis(&mut self, text: Self::Output) -> Self::Output;
	fn codespan(&mut self, text: &str) -> Self::Output;
	fn linebreak(&mut self) -> Self::Output;
	fn strikethrough(&mut self, text: Self::Output) -> Self::Output;
	fn text(&mut self, text: &str) -> Self::Output;
	/// A single backslash escaped character.
	fn escape(&mut self, text: &str) -> Self::Output;
	fn link(&mut self, link: &str, title: Option<&str>, text: Self::Output) -> Self::Output;
	fn image(&mut self, src: &str, title: Self::Output) -> Self::Output;
	/// An `@tag@` reference to a labelled element elsewhere in the document.
	fn reflink(&mut self, tag: &str) -> Self::Output;
	fn footnote(&mut self, text: Self::Output) -> Self::Output;
	fn equation(&mut self, tex: &str, tag: Option<&str>) -> Self::Output;
	fn math(&mut self, tex: &str) -> Self::Output;
	fn title(&mut self, text: Self::Output) -> Self::Output;

	/// Rendered for a run of blank lines. Most backends emit nothing.
	fn newline(&mut self) -> Self::Output {
		self.placeholder()
	}
}

const BLOCKED_SCHEMES: [&str; 2] = ["javascript:", "vbscript:"];

/// Whether a link target may be emitted. Targets using a script scheme are
/// rejected, ignoring case and surrounding control whitespace.
pub fn is_safe_link(url: &str) -> bool {
	let lower = url
		.trim_matches(|ch| matches!(ch, '\0' | '\x1a' | ' ' | '\n' | '\r' | '\t'))
		.to_lowercase();

	!BLOCKED_SCHEMES
		.iter()
		.any(|scheme| lower.starts_with(scheme))
}
