use tracing::debug;
use tracing::trace;

use crate::Accumulator;
use crate::ElltwoError;
use crate::ElltwoResult;
use crate::LexContext;
use crate::Options;
use crate::Renderer;
use crate::grammar::DEFAULT_INLINE_RULES;
use crate::grammar::HARD_WRAP_INLINE_RULES;
use crate::grammar::InlineRule;
use crate::grammar::RuleMatch;

/// Where an inline span sits relative to its enclosing constructs.
///
/// The context is passed by value into every recursive render, so a flag set
/// for a link's text or a footnote's body can never leak into its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineContext {
	/// Rendering the text of a link. Nested links are not recognized.
	pub in_link: bool,
	/// Rendering the body of a footnote. Nested footnotes are not recognized.
	pub in_footnote: bool,
	depth: usize,
}

impl InlineContext {
	/// Whether `rule` may match in this context.
	pub fn allows(&self, rule: InlineRule) -> bool {
		match rule {
			InlineRule::Link => !self.in_link,
			InlineRule::Footnote => !self.in_footnote,
			_ => true,
		}
	}

	fn link(self) -> Self {
		Self {
			in_link: true,
			..self
		}
	}

	fn footnote(self) -> Self {
		Self {
			in_footnote: true,
			..self
		}
	}

	fn descend(self) -> Self {
		Self {
			depth: self.depth + 1,
			..self
		}
	}
}

/// Renders a span of text through the inline rules.
#[derive(Debug, Clone, Copy)]
pub struct InlineLexer {
	rules: &'static [InlineRule],
	max_nesting: usize,
}

impl Default for InlineLexer {
	fn default() -> Self {
		Self::new(&Options::default())
	}
}

impl InlineLexer {
	pub fn new(options: &Options) -> Self {
		let rules = if options.hard_wrap {
			HARD_WRAP_INLINE_RULES
		} else {
			DEFAULT_INLINE_RULES
		};

		Self {
			rules,
			max_nesting: options.max_nesting,
		}
	}

	pub fn rules(&self) -> &'static [InlineRule] {
		self.rules
	}

	/// Render `text` as a top level span. Every call starts outside of any
	/// link or footnote.
	pub fn output<R: Renderer>(&self, text: &str, renderer: &mut R) -> ElltwoResult<R::Output> {
		self.output_in(text, renderer, InlineContext::default())
	}

	/// Render `text` as if it were nested in `context`.
	pub fn output_in<R: Renderer>(
		&self,
		text: &str,
		renderer: &mut R,
		context: InlineContext,
	) -> ElltwoResult<R::Output> {
		let mut rest = text.trim_end_matches('\n');
		let mut output = renderer.placeholder();

		while !rest.is_empty() {
			let found = self
				.rules
				.iter()
				.filter(|rule| context.allows(**rule))
				.find_map(|rule| rule.matches(rest).map(|found| (*rule, found)));

			let Some((rule, found)) = found else {
				return Err(ElltwoError::exhausted(LexContext::Inline, rest));
			};

			if found.is_empty() {
				return Err(ElltwoError::exhausted(LexContext::Inline, rest));
			}

			trace!(rule = rule.name(), len = found.len(), depth = context.depth, "inline rule matched");
			output.append(self.dispatch(rule, &found, renderer, context)?);
			rest = &rest[found.len()..];
		}

		Ok(output)
	}

	/// Render the body of a nested span one level deeper. Past the nesting
	/// limit the body is emitted as literal text.
	fn nested<R: Renderer>(
		&self,
		text: &str,
		renderer: &mut R,
		context: InlineContext,
	) -> ElltwoResult<R::Output> {
		if context.depth >= self.max_nesting {
			debug!(depth = context.depth, "nesting limit reached, rendering span as text");
			return Ok(renderer.text(text));
		}

		self.output_in(text, renderer, context.descend())
	}

	fn dispatch<R: Renderer>(
		&self,
		rule: InlineRule,
		found: &RuleMatch<'_>,
		renderer: &mut R,
		context: InlineContext,
	) -> ElltwoResult<R::Output> {
		let output = match rule {
			InlineRule::Escape => renderer.escape(found.group(1)),
			InlineRule::Footnote => {
				let body = self.nested(found.group(1), renderer, context.footnote())?;
				renderer.footnote(body)
			}
			InlineRule::Link => {
				let text = self.nested(found.group(1), renderer, context.link())?;
				let title = found.get(3).filter(|title| !title.is_empty());
				renderer.link(found.group(2), title, text)
			}
			InlineRule::Reflink => renderer.reflink(found.group(1)),
			InlineRule::DoubleEmphasis => {
				let text = self.nested(found.group(1), renderer, context)?;
				renderer.double_emphasis(text)
			}
			InlineRule::Emphasis => {
				let text = self.nested(found.group(1), renderer, context)?;
				renderer.emphasis(text)
			}
			InlineRule::Code => renderer.codespan(found.group(1)),
			InlineRule::LineBreak | InlineRule::HardLineBreak => renderer.linebreak(),
			InlineRule::Strikethrough => {
				let text = self.nested(found.group(1), renderer, context)?;
				renderer.strikethrough(text)
			}
			InlineRule::Math => renderer.math(found.group(1)),
			InlineRule::Text | InlineRule::HardText => renderer.text(found.whole()),
		};

		Ok(output)
	}
}
