use miette::Diagnostic;
use thiserror::Error;

/// Which lexer ran out of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexContext {
	Block,
	Inline,
}

impl std::fmt::Display for LexContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Block => write!(f, "block"),
			Self::Inline => write!(f, "inline"),
		}
	}
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ElltwoError {
	#[error("no {context} rule matched the remaining input: `{remaining}`")]
	#[diagnostic(
		code(elltwo::grammar_exhausted),
		help("the catch-all text rule should always match; this is a bug in the rule tables")
	)]
	GrammarExhausted {
		context: LexContext,
		remaining: String,
	},

	#[error("failed to serialize the document tree: {0}")]
	#[diagnostic(code(elltwo::tree_serialize))]
	TreeSerialize(#[from] serde_json::Error),
}

impl ElltwoError {
	/// Build a [`ElltwoError::GrammarExhausted`], keeping only a short excerpt
	/// of the unmatched input.
	pub(crate) fn exhausted(context: LexContext, remaining: &str) -> Self {
		let remaining = remaining.chars().take(40).collect();
		Self::GrammarExhausted { context, remaining }
	}
}

pub type ElltwoResult<T> = Result<T, ElltwoError>;
