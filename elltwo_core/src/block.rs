use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::Alignment;
use crate::ElltwoError;
use crate::ElltwoResult;
use crate::LexContext;
use crate::Options;
use crate::grammar::BlockRule;
use crate::grammar::DEFAULT_BLOCK_RULES;
use crate::grammar::LIST_BLOCK_RULES;
use crate::grammar::RuleMatch;
use crate::grammar::bullet_len;
use crate::grammar::split_list_items;
use crate::grammar::strip_block_quote;
use crate::grammar::strip_code_indent;
use crate::tokens::Token;
use crate::tokens::Tokens;

/// Splits a document into block level [`Token`]s.
///
/// The lexer holds no per-document state, so one instance can be reused for
/// any number of documents.
#[derive(Debug, Clone, Copy)]
pub struct BlockLexer {
	max_nesting: usize,
}

impl Default for BlockLexer {
	fn default() -> Self {
		Self::new(&Options::default())
	}
}

impl BlockLexer {
	pub fn new(options: &Options) -> Self {
		Self {
			max_nesting: options.max_nesting,
		}
	}

	/// Tokenize `text` with the default block rules.
	pub fn parse(&self, text: &str) -> ElltwoResult<Tokens> {
		self.parse_with_rules(text, DEFAULT_BLOCK_RULES)
	}

	/// Tokenize `text` trying only `rules`, in order.
	pub fn parse_with_rules(&self, text: &str, rules: &[BlockRule]) -> ElltwoResult<Tokens> {
		let mut tokens = Tokens::new();
		self.parse_into(text, rules, 0, &mut tokens)?;
		Ok(tokens)
	}

	fn parse_into(
		&self,
		text: &str,
		rules: &[BlockRule],
		depth: usize,
		tokens: &mut Tokens,
	) -> ElltwoResult<()> {
		let mut rest = text.trim_end_matches('\n');

		while !rest.is_empty() {
			let found = rules
				.iter()
				.find_map(|rule| rule.matches(rest).map(|found| (*rule, found)));

			let Some((rule, found)) = found else {
				return Err(ElltwoError::exhausted(LexContext::Block, rest));
			};

			if found.is_empty() {
				return Err(ElltwoError::exhausted(LexContext::Block, rest));
			}

			trace!(rule = rule.name(), len = found.len(), depth, "block rule matched");
			self.push_tokens(rule, &found, depth, tokens)?;
			rest = &rest[found.len()..];
		}

		Ok(())
	}

	/// Lex the body of a container one level deeper. Past the nesting limit
	/// the body is kept as bare text instead.
	fn parse_nested(
		&self,
		text: &str,
		rules: &[BlockRule],
		depth: usize,
		tokens: &mut Tokens,
	) -> ElltwoResult<()> {
		if depth >= self.max_nesting {
			debug!(depth, "nesting limit reached, keeping container body as text");
			let text = text.trim_end_matches('\n');
			if !text.is_empty() {
				tokens.push(Token::Text {
					text: text.to_string(),
				});
			}
			return Ok(());
		}

		self.parse_into(text, rules, depth + 1, tokens)
	}

	fn push_tokens(
		&self,
		rule: BlockRule,
		found: &RuleMatch<'_>,
		depth: usize,
		tokens: &mut Tokens,
	) -> ElltwoResult<()> {
		match rule {
			BlockRule::Newline => {
				if found.len() > 1 {
					tokens.push(Token::Newline);
				}
			}
			BlockRule::BlockCode => {
				tokens.push(Token::Code {
					lang: None,
					text: strip_code_indent(found.whole()),
				});
			}
			BlockRule::Fences => {
				tokens.push(Token::Code {
					lang: found.get(2).map(ToString::to_string),
					text: found.group(3).to_string(),
				});
			}
			BlockRule::Hrule => tokens.push(Token::Hrule),
			BlockRule::Heading => {
				tokens.push(Token::Heading {
					level: found.group(1).len() as u8,
					text: found.group(2).to_string(),
				});
			}
			BlockRule::LHeading => {
				let level = if found.group(2) == "=" { 1 } else { 2 };
				tokens.push(Token::Heading {
					level,
					text: found.group(1).to_string(),
				});
			}
			BlockRule::Title => {
				tokens.push(Token::Title {
					text: found.group(1).to_string(),
				});
			}
			BlockRule::Image => {
				tokens.push(Token::Image {
					title: found.group(1).to_string(),
					link: found.group(2).to_string(),
				});
			}
			BlockRule::Equation => {
				let tex = found.group(2).trim();
				let tex = tex.strip_suffix("$$").unwrap_or(tex).trim_end();
				tokens.push(Token::Equation {
					tag: found.get(1).map(str::trim).map(ToString::to_string),
					tex: tex.to_string(),
				});
			}
			BlockRule::BlockQuote => {
				tokens.push(Token::BlockQuoteStart);
				let body = strip_block_quote(found.whole());
				self.parse_nested(&body, DEFAULT_BLOCK_RULES, depth, tokens)?;
				tokens.push(Token::BlockQuoteEnd);
			}
			BlockRule::ListBlock => {
				tokens.push(Token::ListStart {
					ordered: found.group(2).contains('.'),
				});
				self.push_list_items(found.whole(), depth, tokens)?;
				tokens.push(Token::ListEnd);
			}
			BlockRule::Table => {
				let rows = non_empty_lines(found.group(3))
					.map(|row| split_row(trim_pipes(row)))
					.collect();
				tokens.push(table_token(found, rows));
			}
			BlockRule::NpTable => {
				let rows = non_empty_lines(found.group(3)).map(split_row).collect();
				tokens.push(table_token(found, rows));
			}
			BlockRule::Paragraph => {
				tokens.push(Token::Paragraph {
					text: found.group(1).trim_end_matches('\n').to_string(),
				});
			}
			BlockRule::Text => {
				tokens.push(Token::Text {
					text: found.whole().to_string(),
				});
			}
		}

		Ok(())
	}

	/// Split a list into items, outdent each one and decide whether it is
	/// loose before lexing its body with the list rules.
	fn push_list_items(&self, list: &str, depth: usize, tokens: &mut Tokens) -> ElltwoResult<()> {
		let items = split_list_items(list);
		let last = items.len().saturating_sub(1);
		let mut next_loose = false;

		for (index, item) in items.into_iter().enumerate() {
			let bullet = bullet_len(item);
			let body = &item[bullet..];
			let body = if body.contains("\n ") {
				outdent(body, bullet)
			} else {
				body.to_string()
			};

			let mut loose = next_loose || has_inner_blank_line(&body);

			if index != last && !body.is_empty() {
				next_loose = body.ends_with('\n');
				loose = loose || next_loose;
			}

			tokens.push(if loose {
				Token::LooseItemStart
			} else {
				Token::ListItemStart
			});
			self.parse_nested(&body, LIST_BLOCK_RULES, depth, tokens)?;
			tokens.push(Token::ListItemEnd);
		}

		Ok(())
	}
}

/// Remove up to `width` leading spaces from every line.
fn outdent(text: &str, width: usize) -> String {
	text.split_inclusive('\n')
		.map(|line| {
			let spaces = line.bytes().take(width).take_while(|byte| *byte == b' ').count();
			&line[spaces..]
		})
		.collect()
}

/// A blank line somewhere other than at the very end of the item.
fn has_inner_blank_line(text: &str) -> bool {
	text.find("\n\n")
		.is_some_and(|index| !text[index + 2..].trim().is_empty())
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
	text.split('\n').filter(|line| !line.trim().is_empty())
}

/// Remove the leading and trailing pipe of a boxed table row.
fn trim_pipes(row: &str) -> &str {
	let row = row.trim_matches(' ');
	let row = row.strip_prefix('|').unwrap_or(row);
	row.strip_suffix('|').unwrap_or(row)
}

fn split_row(row: &str) -> Vec<String> {
	row.split('|')
		.map(|cell| cell.trim_matches(' ').to_string())
		.collect()
}

/// Build a table token from the header and alignment groups of a table
/// match.
fn table_token(found: &RuleMatch<'_>, cells: Vec<Vec<String>>) -> Token {
	let header = split_row(trim_pipes(found.group(1)));

	let align_row: String = found.group(2).chars().filter(|ch| *ch != ' ').collect();
	let align_row = align_row.strip_suffix('|').unwrap_or(&align_row);
	let align: Vec<_> = align_row.split('|').map(Alignment::classify).collect();

	if align.len() != header.len() {
		warn!(
			header = header.len(),
			align = align.len(),
			"table alignment row does not match the header, extra columns are unaligned"
		);
	}

	Token::Table {
		header,
		align,
		cells,
	}
}
