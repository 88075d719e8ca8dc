use serde::Serialize;

use crate::BlockLexer;
use crate::ElltwoResult;
use crate::HtmlRenderer;
use crate::LatexRenderer;
use crate::Markdown;
use crate::Node;
use crate::Options;
use crate::Tokens;
use crate::TreeRenderer;
use crate::preprocess;

/// One independently editable unit of a document.
///
/// The source is lexed once when the cell is parsed. Its HTML is rendered up
/// front since that is what editors display; other outputs are rendered from
/// the stored tokens on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
	source: String,
	html: String,
	#[serde(skip)]
	tokens: Tokens,
	#[serde(skip)]
	options: Options,
}

impl Cell {
	pub fn parse(text: &str, options: &Options) -> ElltwoResult<Self> {
		let tokens = BlockLexer::new(options).parse(&preprocess(text))?;
		let html = Markdown::new(HtmlRenderer::new(*options), options).output(&tokens)?;

		Ok(Self {
			source: text.to_string(),
			html,
			tokens,
			options: *options,
		})
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn tokens(&self) -> &Tokens {
		&self.tokens
	}

	pub fn html(&self) -> &str {
		&self.html
	}

	/// The cell as a LaTeX fragment, without a document preamble.
	pub fn latex(&self) -> ElltwoResult<String> {
		Markdown::new(LatexRenderer::new(), &self.options).output(&self.tokens)
	}

	pub fn tree(&self) -> ElltwoResult<Vec<Node>> {
		Markdown::new(TreeRenderer::new(), &self.options).output(&self.tokens)
	}
}

/// Parse a single cell with the default options.
pub fn parse_cell(text: &str) -> ElltwoResult<Cell> {
	Cell::parse(text, &Options::default())
}

/// Split a document into cell sources. Cells are separated by blank lines,
/// trimmed, and empty cells are dropped.
pub fn split_cells(text: &str) -> Vec<String> {
	text.split("\n\n")
		.map(str::trim)
		.filter(|cell| !cell.is_empty())
		.map(ToString::to_string)
		.collect()
}

/// Reassemble a document from cell sources.
pub fn join_cells<S: AsRef<str>>(cells: &[S]) -> String {
	cells
		.iter()
		.map(AsRef::as_ref)
		.collect::<Vec<_>>()
		.join("\n\n")
}
