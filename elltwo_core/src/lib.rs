//! `elltwo_core` is the markdown engine behind [elltwo](https://github.com/iamlemec/elltwo), a cell based editor for technical documents. It turns markdown with a few scientific extensions (display equations, inline math, references, footnotes and document titles) into HTML, LaTeX or a serializable document tree.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown text
//!   -> preprocess (line endings, tabs, blank lines)
//!   -> BlockLexer (ordered block rules, recursing into lists and blockquotes)
//!   -> Tokens
//!   -> Markdown interpreter (walks the tokens with one token of lookahead)
//!   -> InlineLexer (ordered inline rules for every text span)
//!   -> Renderer (HTML, LaTeX or tree output)
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Rendering [`Options`], deserializable from host configuration.
//! - [`grammar`] - The block and inline rule tables.
//!
//! ## Key Types
//!
//! - [`Token`] - A block level construct produced by the [`BlockLexer`].
//! - [`Renderer`] - One method per construct, generic over its [`Accumulator`] output.
//! - [`HtmlRenderer`], [`LatexRenderer`], [`TreeRenderer`] - The bundled backends.
//! - [`Cell`] - An editable unit of a document with its rendered HTML.
//!
//! ## Quick Start
//!
//! ```rust
//! use elltwo_core::convert_html;
//! use elltwo_core::parse_cell;
//!
//! let html = convert_html("**bold** and *em*").unwrap();
//! assert_eq!(html, "<p><strong>bold</strong> and <em>em</em></p>\n");
//!
//! let cell = parse_cell("#! My Paper").unwrap();
//! assert_eq!(cell.html(), "<div class=\"doc-title\">My Paper</div>\n");
//! ```

pub use block::*;
pub use cell::*;
pub use config::*;
pub use error::*;
pub use html::*;
pub use inline::*;
pub use latex::*;
pub use markdown::*;
pub use renderer::*;
pub use tokens::*;
pub use tree::*;

mod block;
mod cell;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod grammar;
mod html;
mod inline;
mod latex;
mod markdown;
mod renderer;
mod tokens;
mod tree;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
