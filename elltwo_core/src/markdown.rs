use tracing::instrument;

use crate::Accumulator;
use crate::Alignment;
use crate::BlockLexer;
use crate::CellFlags;
use crate::ElltwoResult;
use crate::HtmlRenderer;
use crate::InlineLexer;
use crate::LatexRenderer;
use crate::Node;
use crate::Options;
use crate::Renderer;
use crate::TAB_SIZE;
use crate::Token;
use crate::TokenCursor;
use crate::Tokens;
use crate::TreeRenderer;
use crate::grammar::clear_space_only_lines;

/// Normalize raw input before lexing.
///
/// Line endings become `\n`, tabs are expanded to [`TAB_SIZE`] columns,
/// non-breaking spaces become plain spaces, `␤` becomes a newline and lines
/// holding only spaces are emptied.
pub fn preprocess(text: &str) -> String {
	let text = text.replace("\r\n", "\n").replace('\r', "\n");
	let text = expand_tabs(&text, TAB_SIZE);
	let text = text.replace('\u{a0}', " ").replace('\u{2424}', "\n");
	clear_space_only_lines(&text)
}

fn expand_tabs(text: &str, tab_size: usize) -> String {
	if !text.contains('\t') {
		return text.to_string();
	}

	let mut expanded = String::with_capacity(text.len());
	let mut column = 0;

	for ch in text.chars() {
		match ch {
			'\t' => {
				let width = tab_size - column % tab_size;
				expanded.extend(std::iter::repeat_n(' ', width));
				column += width;
			}
			'\n' => {
				expanded.push(ch);
				column = 0;
			}
			_ => {
				expanded.push(ch);
				column += 1;
			}
		}
	}

	expanded
}

/// Walks the block tokens of a document and drives a [`Renderer`] over them.
#[derive(Debug, Clone)]
pub struct Markdown<R: Renderer> {
	renderer: R,
	block: BlockLexer,
	inline: InlineLexer,
}

impl<R: Renderer> Markdown<R> {
	pub fn new(renderer: R, options: &Options) -> Self {
		Self {
			renderer,
			block: BlockLexer::new(options),
			inline: InlineLexer::new(options),
		}
	}

	pub fn renderer_mut(&mut self) -> &mut R {
		&mut self.renderer
	}

	pub fn into_renderer(self) -> R {
		self.renderer
	}

	/// Preprocess, lex and render a whole document.
	#[instrument(level = "debug", skip_all, fields(len = text.len()))]
	pub fn render(&mut self, text: &str) -> ElltwoResult<R::Output> {
		let tokens = self.block.parse(&preprocess(text))?;
		self.output(&tokens)
	}

	/// Render an already lexed token sequence.
	pub fn output(&mut self, tokens: &Tokens) -> ElltwoResult<R::Output> {
		let mut cursor = tokens.cursor();
		let mut output = self.renderer.placeholder();

		while let Some(token) = cursor.next() {
			output.append(self.tok(token, &mut cursor)?);
		}

		Ok(output)
	}

	fn inline(&mut self, text: &str) -> ElltwoResult<R::Output> {
		self.inline.output(text, &mut self.renderer)
	}

	fn tok(&mut self, token: &Token, cursor: &mut TokenCursor<'_>) -> ElltwoResult<R::Output> {
		let output = match token {
			Token::Newline => self.renderer.newline(),
			Token::Hrule => self.renderer.hrule(),
			Token::Heading { level, text } => {
				let inner = self.inline(text)?;
				self.renderer.header(inner, *level, text)
			}
			Token::Code { lang, text } => self.renderer.block_code(text, lang.as_deref()),
			Token::Table {
				header,
				align,
				cells,
			} => self.table(header, align, cells)?,
			Token::BlockQuoteStart => {
				let body = self.container(cursor, &Token::BlockQuoteEnd, false)?;
				self.renderer.block_quote(body)
			}
			Token::ListStart { ordered } => {
				let body = self.container(cursor, &Token::ListEnd, false)?;
				self.renderer.list(body, *ordered)
			}
			Token::ListItemStart => {
				let body = self.container(cursor, &Token::ListItemEnd, true)?;
				self.renderer.list_item(body)
			}
			Token::LooseItemStart => {
				let body = self.container(cursor, &Token::ListItemEnd, false)?;
				self.renderer.list_item(body)
			}
			Token::Paragraph { text } => {
				let inner = self.inline(text)?;
				self.renderer.paragraph(inner)
			}
			Token::Text { text } => {
				let inner = self.tok_text(text, cursor)?;
				self.renderer.paragraph(inner)
			}
			Token::Equation { tag, tex } => self.renderer.equation(tex, tag.as_deref()),
			Token::Title { text } => {
				let inner = self.inline(text)?;
				self.renderer.title(inner)
			}
			Token::Image { title, link } => {
				let caption = self.inline(title)?;
				self.renderer.image(link, caption)
			}
			// Closing tokens are consumed by `container`.
			Token::ListEnd | Token::ListItemEnd | Token::BlockQuoteEnd => {
				self.renderer.placeholder()
			}
		};

		Ok(output)
	}

	/// Render tokens up to and including `end`. Bare text inside a tight
	/// container is rendered inline without a paragraph.
	fn container(
		&mut self,
		cursor: &mut TokenCursor<'_>,
		end: &Token,
		tight: bool,
	) -> ElltwoResult<R::Output> {
		let mut body = self.renderer.placeholder();

		while let Some(token) = cursor.next() {
			if token == end {
				break;
			}

			let part = match token {
				Token::Text { text } if tight => self.tok_text(text, cursor)?,
				_ => self.tok(token, cursor)?,
			};
			body.append(part);
		}

		Ok(body)
	}

	/// Merge a run of bare text tokens and render it as one inline span.
	fn tok_text(&mut self, first: &str, cursor: &mut TokenCursor<'_>) -> ElltwoResult<R::Output> {
		let mut text = first.to_string();

		while let Some(next) = cursor.next_text() {
			text.push('\n');
			text.push_str(next);
		}

		self.inline(&text)
	}

	fn table(
		&mut self,
		header: &[String],
		align: &[Option<Alignment>],
		cells: &[Vec<String>],
	) -> ElltwoResult<R::Output> {
		let column = |index: usize| align.get(index).copied().flatten();

		let mut row = self.renderer.placeholder();
		for (index, value) in header.iter().enumerate() {
			let content = self.inline(value)?;
			let flags = CellFlags {
				header: true,
				align: column(index),
			};
			row.append(self.renderer.table_cell(content, flags));
		}
		let header = self.renderer.table_row(row);

		let mut body = self.renderer.placeholder();
		for record in cells {
			let mut row = self.renderer.placeholder();
			for (index, value) in record.iter().enumerate() {
				let content = self.inline(value)?;
				let flags = CellFlags {
					header: false,
					align: column(index),
				};
				row.append(self.renderer.table_cell(content, flags));
			}
			body.append(self.renderer.table_row(row));
		}

		Ok(self.renderer.table(header, body))
	}
}

/// Render `text` to HTML with `options`.
pub fn markdown(text: &str, options: &Options) -> ElltwoResult<String> {
	Markdown::new(HtmlRenderer::new(*options), options).render(text)
}

/// Render `text` to HTML with the default options.
pub fn convert_html(text: &str) -> ElltwoResult<String> {
	markdown(text, &Options::default())
}

/// Render `text` to a complete LaTeX document, returning it together with
/// the paths of every image it references.
pub fn convert_latex(text: &str) -> ElltwoResult<(String, Vec<String>)> {
	let mut markdown = Markdown::new(LatexRenderer::new(), &Options::default());
	let body = markdown.render(text)?;
	Ok(markdown.renderer_mut().finish(&body))
}

/// Render `text` to a document tree.
pub fn convert_tree(text: &str) -> ElltwoResult<Vec<Node>> {
	Markdown::new(TreeRenderer::new(), &Options::default()).render(text)
}
