//! Rule tables for the block and inline lexers.
//!
//! Every rule pairs an anchored matcher with the token or renderer call the
//! owning lexer performs on a match. Matchers take the remaining input and
//! return the consumed prefix together with its capture groups. Most are
//! plain regular expressions; constructs that need backreferences or
//! lookahead (fences, lists, links, emphasis) are small hand-written
//! scanners with the same first-match semantics.

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

/// Captured groups of a successful rule match. Group `0` is always the whole
/// consumed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'t> {
	groups: Vec<Option<&'t str>>,
}

impl<'t> RuleMatch<'t> {
	fn new(groups: Vec<Option<&'t str>>) -> Self {
		Self { groups }
	}

	fn from_captures(captures: &Captures<'t>) -> Self {
		Self::new(
			captures
				.iter()
				.map(|group| group.map(|m| m.as_str()))
				.collect(),
		)
	}

	/// Number of bytes consumed by the match.
	pub fn len(&self) -> usize {
		self.whole().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn whole(&self) -> &'t str {
		self.get(0).unwrap_or_default()
	}

	/// A capture group, `None` when the group did not participate.
	pub fn get(&self, index: usize) -> Option<&'t str> {
		self.groups.get(index).copied().flatten()
	}

	/// A capture group, empty when the group did not participate.
	pub fn group(&self, index: usize) -> &'t str {
		self.get(index).unwrap_or_default()
	}
}

macro_rules! regex {
	($name:ident, $pattern:expr) => {
		static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
	};
}

regex!(NEWLINE, r"^\n+");
regex!(BLOCK_CODE, r"^(?: {4}[^\n]+\n*)+");
regex!(HRULE, r"^ {0,3}[-*_](?: *[-*_]){2,} *(?:\n+|$)");
regex!(HEADING, r"^ *(#{1,6}) *([^\n]+?) *#* *(?:\n+|$)");
regex!(LHEADING, r"^([^\n]+)\n *(=|-)+ *(?:\n+|$)");
regex!(TITLE, r"^ *#! *([^\n]+?) *(?:\n+|$)");
regex!(BLOCK_QUOTE, r"^(?: *>[^\n]+(?:\n[^\n]+)*\n*)+");
regex!(
	NPTABLE,
	r"^ *(\S.*\|.*)\n *([-:]+ *\|[-| :]*)(?:\n|$)((?:.*\|.*(?:\n|$))*)\n*"
);
regex!(
	TABLE,
	r"^ *\|(.+)\n *\|( *[-:]+[-| :]*)(?:\n|$)((?: *\|.*(?:\n|$))*)\n*"
);
regex!(
	EQUATION,
	r"^\$\$ *(?:\[([^\]\n]*)\])? *((?:[^\n]|\n[^\n])*)\n*"
);
regex!(TEXT, r"^[^\n]+");
regex!(LIST_HEAD, r"^ *(?:[*+-]|[0-9]+\.) (?s:.)");
regex!(LIST_BULLET, r"^ *(?:[*+-]|[0-9]+\.) +");
regex!(BLOCK_QUOTE_LEADING, r"(?m)^ *> ?");
regex!(BLOCK_CODE_LEADING, r"(?m)^ {4}");
regex!(SPACE_ONLY_LINE, r"(?m)^ +$");

regex!(ESCAPE, r"^\\([\\`*{}\[\]()#+\-.!_>~|$])");
regex!(FOOTNOTE, r"^\^\[([^\]]+)\]");
regex!(REFLINK, r"^@([^@\]\n]+)@");
regex!(MATH, r"^\$([^$]+?)\$");

/// Inline tags that never start a block of raw HTML.
const INLINE_TAGS: [&str; 33] = [
	"a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "data", "time", "code", "var",
	"samp", "kbd", "sub", "sup", "i", "b", "u", "mark", "ruby", "rt", "rp", "bdi", "bdo", "span",
	"br", "wbr", "ins", "del", "img", "font",
];

/// Block level grammar rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRule {
	Newline,
	BlockCode,
	Fences,
	Hrule,
	Title,
	Image,
	Heading,
	NpTable,
	LHeading,
	BlockQuote,
	Equation,
	ListBlock,
	Table,
	Paragraph,
	Text,
}

/// Rules tried at the top level and inside blockquotes, in priority order.
pub const DEFAULT_BLOCK_RULES: &[BlockRule] = &[
	BlockRule::Newline,
	BlockRule::Hrule,
	BlockRule::BlockCode,
	BlockRule::Fences,
	BlockRule::Title,
	BlockRule::Image,
	BlockRule::Heading,
	BlockRule::NpTable,
	BlockRule::LHeading,
	BlockRule::BlockQuote,
	BlockRule::Equation,
	BlockRule::ListBlock,
	BlockRule::Table,
	BlockRule::Paragraph,
	BlockRule::Text,
];

/// Rules tried inside list items. Tables and paragraphs are left out so that
/// tight items keep their text bare.
pub const LIST_BLOCK_RULES: &[BlockRule] = &[
	BlockRule::Newline,
	BlockRule::BlockCode,
	BlockRule::Fences,
	BlockRule::LHeading,
	BlockRule::Hrule,
	BlockRule::BlockQuote,
	BlockRule::ListBlock,
	BlockRule::Text,
];

impl BlockRule {
	pub fn name(self) -> &'static str {
		match self {
			Self::Newline => "newline",
			Self::BlockCode => "block_code",
			Self::Fences => "fences",
			Self::Hrule => "hrule",
			Self::Title => "title",
			Self::Image => "image",
			Self::Heading => "heading",
			Self::NpTable => "nptable",
			Self::LHeading => "lheading",
			Self::BlockQuote => "block_quote",
			Self::Equation => "equation",
			Self::ListBlock => "list_block",
			Self::Table => "table",
			Self::Paragraph => "paragraph",
			Self::Text => "text",
		}
	}

	/// Try the rule against the start of `text`.
	pub fn matches(self, text: &str) -> Option<RuleMatch<'_>> {
		match self {
			Self::Newline => captures(&NEWLINE, text),
			Self::BlockCode => captures(&BLOCK_CODE, text),
			Self::Fences => match_fences(text),
			Self::Hrule => captures(&HRULE, text),
			Self::Title => captures(&TITLE, text),
			Self::Image => match_block_image(text),
			Self::Heading => captures(&HEADING, text),
			Self::NpTable => captures(&NPTABLE, text),
			Self::LHeading => captures(&LHEADING, text),
			Self::BlockQuote => captures(&BLOCK_QUOTE, text),
			Self::Equation => captures(&EQUATION, text),
			Self::ListBlock => match_list_block(text),
			Self::Table => captures(&TABLE, text),
			Self::Paragraph => match_paragraph(text),
			Self::Text => captures(&TEXT, text),
		}
	}
}

/// Inline grammar rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineRule {
	Escape,
	Footnote,
	Link,
	Reflink,
	DoubleEmphasis,
	Emphasis,
	Code,
	LineBreak,
	/// Line break used when every newline is significant.
	HardLineBreak,
	Strikethrough,
	Math,
	Text,
	/// Plain text that also stops before any newline.
	HardText,
}

/// Inline rules in priority order.
pub const DEFAULT_INLINE_RULES: &[InlineRule] = &[
	InlineRule::Escape,
	InlineRule::Footnote,
	InlineRule::Link,
	InlineRule::Reflink,
	InlineRule::DoubleEmphasis,
	InlineRule::Emphasis,
	InlineRule::Code,
	InlineRule::LineBreak,
	InlineRule::Strikethrough,
	InlineRule::Math,
	InlineRule::Text,
];

/// Inline rules for hard wrapped text, where a bare newline is a line break.
pub const HARD_WRAP_INLINE_RULES: &[InlineRule] = &[
	InlineRule::Escape,
	InlineRule::Footnote,
	InlineRule::Link,
	InlineRule::Reflink,
	InlineRule::DoubleEmphasis,
	InlineRule::Emphasis,
	InlineRule::Code,
	InlineRule::HardLineBreak,
	InlineRule::Strikethrough,
	InlineRule::Math,
	InlineRule::HardText,
];

impl InlineRule {
	pub fn name(self) -> &'static str {
		match self {
			Self::Escape => "escape",
			Self::Footnote => "footnote",
			Self::Link => "link",
			Self::Reflink => "reflink",
			Self::DoubleEmphasis => "double_emphasis",
			Self::Emphasis => "emphasis",
			Self::Code => "code",
			Self::LineBreak | Self::HardLineBreak => "linebreak",
			Self::Strikethrough => "strikethrough",
			Self::Math => "math",
			Self::Text | Self::HardText => "text",
		}
	}

	/// Try the rule against the start of `text`.
	pub fn matches(self, text: &str) -> Option<RuleMatch<'_>> {
		match self {
			Self::Escape => captures(&ESCAPE, text),
			Self::Footnote => captures(&FOOTNOTE, text),
			Self::Link => match_link(text),
			Self::Reflink => captures(&REFLINK, text),
			Self::DoubleEmphasis => match_double_emphasis(text),
			Self::Emphasis => match_emphasis(text),
			Self::Code => match_code(text),
			Self::LineBreak => match_linebreak(text, 2),
			Self::HardLineBreak => match_linebreak(text, 0),
			Self::Strikethrough => match_strikethrough(text),
			Self::Math => captures(&MATH, text),
			Self::Text => match_text(text, false),
			Self::HardText => match_text(text, true),
		}
	}
}

fn captures<'t>(regex: &Regex, text: &'t str) -> Option<RuleMatch<'t>> {
	regex
		.captures(text)
		.map(|captures| RuleMatch::from_captures(&captures))
}

/// Remove the leading `>` markers from every line of a blockquote.
pub(crate) fn strip_block_quote(text: &str) -> String {
	BLOCK_QUOTE_LEADING.replace_all(text, "").into_owned()
}

/// Remove the four space indent from every line of an indented code block.
pub(crate) fn strip_code_indent(text: &str) -> String {
	BLOCK_CODE_LEADING.replace_all(text, "").into_owned()
}

/// Empty every line that holds nothing but spaces.
pub(crate) fn clear_space_only_lines(text: &str) -> String {
	SPACE_ONLY_LINE.replace_all(text, "").into_owned()
}

/// Length of the list bullet (including trailing spaces) at the start of a
/// list item.
pub(crate) fn bullet_len(item: &str) -> usize {
	LIST_BULLET.find(item).map_or(0, |m| m.end())
}

fn is_space(byte: u8) -> bool {
	matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

fn is_word(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

fn skip_spaces(bytes: &[u8], mut index: usize) -> usize {
	while index < bytes.len() && bytes[index] == b' ' {
		index += 1;
	}
	index
}

fn skip_whitespace(bytes: &[u8], mut index: usize) -> usize {
	while index < bytes.len() && is_space(bytes[index]) {
		index += 1;
	}
	index
}

fn skip_newlines(bytes: &[u8], mut index: usize) -> usize {
	while index < bytes.len() && bytes[index] == b'\n' {
		index += 1;
	}
	index
}

/// ```` ```lang ```` fenced code. The closing fence must repeat the opening
/// delimiter exactly.
///
/// Groups: `1` delimiter, `2` language, `3` body.
fn match_fences(text: &str) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	let open = skip_spaces(bytes, 0);
	let fence = *bytes.get(open)?;

	if fence != b'`' && fence != b'~' {
		return None;
	}

	let mut cursor = open;
	while cursor < bytes.len() && bytes[cursor] == fence {
		cursor += 1;
	}

	if cursor - open < 3 {
		return None;
	}

	let delimiter = &text[open..cursor];
	cursor = skip_spaces(bytes, cursor);

	let lang_start = cursor;
	while cursor < bytes.len() && !is_space(bytes[cursor]) {
		cursor += 1;
	}
	let lang = (cursor > lang_start).then(|| &text[lang_start..cursor]);

	cursor = skip_spaces(bytes, cursor);
	if bytes.get(cursor) != Some(&b'\n') {
		return None;
	}

	let body_start = cursor + 1;
	let mut body_end = body_start + 1;

	while body_end <= bytes.len() {
		if !text.is_char_boundary(body_end) {
			body_end += 1;
			continue;
		}

		let close = skip_whitespace(bytes, body_end);
		if text[close..].starts_with(delimiter) {
			let after = skip_spaces(bytes, close + delimiter.len());
			if after == bytes.len() || bytes[after] == b'\n' {
				let end = skip_newlines(bytes, after);
				return Some(RuleMatch::new(vec![
					Some(&text[..end]),
					Some(delimiter),
					lang,
					Some(&text[body_start..body_end]),
				]));
			}
		}

		body_end += 1;
	}

	None
}

/// Candidate end positions of a bracketed link text starting after `[`,
/// longest first.
///
/// Link text is a run of balanced `[...]` groups, characters other than
/// brackets, and `]` characters that are followed by another `]` before the
/// next `[`.
fn link_text_candidates(bytes: &[u8], start: usize) -> Vec<usize> {
	let mut positions = vec![start];
	let mut cursor = start;

	while cursor < bytes.len() {
		match bytes[cursor] {
			b'[' => {
				let Some(offset) = bytes[cursor + 1..]
					.iter()
					.position(|byte| matches!(byte, b']' | b'^'))
				else {
					break;
				};
				let close = cursor + 1 + offset;
				if bytes[close] != b']' {
					break;
				}
				cursor = close + 1;
			}
			b']' => {
				let next = bytes[cursor + 1..]
					.iter()
					.find(|byte| matches!(byte, b'[' | b']'));
				if next != Some(&b']') {
					break;
				}
				cursor += 1;
			}
			_ => cursor += 1,
		}
		positions.push(cursor);
	}

	positions.reverse();
	positions
}

/// A parsed `(url "title")` destination.
struct Destination<'t> {
	link: &'t str,
	title: Option<&'t str>,
	end: usize,
}

/// Parse `\s*(<)?url(>)?(\s+"title")?\s*\)` starting just after the opening
/// parenthesis. The url is the shortest text for which the rest matches.
fn match_destination(text: &str, start: usize, allow_title: bool) -> Option<Destination<'_>> {
	let bytes = text.as_bytes();
	let start = skip_whitespace(bytes, start);

	if bytes.get(start) == Some(&b'<') {
		for end in start + 1..bytes.len() {
			if bytes[end] != b'>' {
				continue;
			}
			if let Some((title, close)) = match_destination_tail(text, end + 1, allow_title) {
				return Some(Destination {
					link: &text[start + 1..end],
					title,
					end: close,
				});
			}
		}
	}

	for end in start..=bytes.len() {
		if !text.is_char_boundary(end) {
			continue;
		}
		if let Some((title, close)) = match_destination_tail(text, end, allow_title) {
			return Some(Destination {
				link: &text[start..end],
				title,
				end: close,
			});
		}
	}

	None
}

/// The optional quoted title and the closing parenthesis of a destination.
fn match_destination_tail(
	text: &str,
	start: usize,
	allow_title: bool,
) -> Option<(Option<&str>, usize)> {
	let bytes = text.as_bytes();

	if allow_title {
		let quote = skip_whitespace(bytes, start);
		if quote > start && matches!(bytes.get(quote), Some(b'"' | b'\'')) {
			let title_start = quote + 1;
			for title_end in title_start..bytes.len() {
				if !matches!(bytes[title_end], b'"' | b'\'') {
					continue;
				}
				let close = skip_whitespace(bytes, title_end + 1);
				if bytes.get(close) == Some(&b')') {
					return Some((Some(&text[title_start..title_end]), close + 1));
				}
			}
		}
	}

	let close = skip_whitespace(bytes, start);
	(bytes.get(close) == Some(&b')')).then_some((None, close + 1))
}

/// `[text](url "title")`
///
/// Groups: `1` text, `2` url, `3` title.
fn match_link(text: &str) -> Option<RuleMatch<'_>> {
	match_bracketed(text, 1, true)
}

/// `![caption](url)` at the start of a block.
///
/// Groups: `1` caption, `2` url.
fn match_block_image(text: &str) -> Option<RuleMatch<'_>> {
	if !text.starts_with('!') {
		return None;
	}
	match_bracketed(text, 2, false)
}

fn match_bracketed(text: &str, text_start: usize, allow_title: bool) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	if bytes.get(text_start - 1) != Some(&b'[') {
		return None;
	}

	for end in link_text_candidates(bytes, text_start) {
		if bytes.get(end) != Some(&b']') || bytes.get(end + 1) != Some(&b'(') {
			continue;
		}
		if let Some(destination) = match_destination(text, end + 2, allow_title) {
			return Some(RuleMatch::new(vec![
				Some(&text[..destination.end]),
				Some(&text[text_start..end]),
				Some(destination.link),
				destination.title,
			]));
		}
	}

	None
}

/// Whether a line of text at the start of `text` opens a construct that ends
/// a running paragraph.
fn starts_block(text: &str) -> bool {
	match_fences(text).is_some()
		|| LIST_HEAD.is_match(text)
		|| HRULE.is_match(text)
		|| HEADING.is_match(text)
		|| LHEADING.is_match(text)
		|| BLOCK_QUOTE.is_match(text)
		|| starts_block_tag(text)
}

/// `<div`, `<table` and other non-inline tags that are not urls or email
/// addresses.
fn starts_block_tag(text: &str) -> bool {
	let Some(rest) = text.strip_prefix('<') else {
		return false;
	};

	let name_len = rest
		.char_indices()
		.find(|(_, ch)| !is_word(*ch))
		.map_or(rest.len(), |(index, _)| index);

	if name_len == 0 || INLINE_TAGS.contains(&&rest[..name_len]) {
		return false;
	}

	let after = &rest[name_len..];
	if after.starts_with(":/") {
		return false;
	}

	// An `@` after some punctuation means this is an address, not a tag.
	let punctuation = after
		.char_indices()
		.find(|(_, ch)| is_word(*ch) || ch.is_whitespace() || *ch == '@');
	!matches!(punctuation, Some((_, '@')))
}

/// A maximal run of non-blank lines whose continuation lines do not start
/// another block construct.
///
/// Groups: `1` the paragraph text.
fn match_paragraph(text: &str) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	let mut end = 0;

	loop {
		let line_end = text[end..].find('\n').map_or(text.len(), |offset| end + offset);
		if line_end == end {
			break;
		}
		if line_end == text.len() {
			end = line_end;
			break;
		}

		let next = line_end + 1;
		if starts_block(&text[next..]) {
			end = line_end;
			break;
		}
		end = next;
	}

	if end == 0 {
		return None;
	}

	let whole = skip_newlines(bytes, end);
	Some(RuleMatch::new(vec![Some(&text[..whole]), Some(&text[..end])]))
}

/// Does an hrule line start at `index`, optionally after the list indent?
fn hrule_follows(text: &str, index: usize, indent: &str) -> bool {
	let rest = &text[index..];
	let candidates = [rest.strip_prefix(indent), Some(rest)];

	candidates.into_iter().flatten().any(|line| {
		let bytes = line.as_bytes();
		let mut cursor = 0;
		let mut markers = 0;

		while cursor < bytes.len() && matches!(bytes[cursor], b'-' | b'*' | b'_') {
			markers += 1;
			cursor = skip_spaces(bytes, cursor + 1);
		}

		markers >= 3 && (cursor == bytes.len() || bytes[cursor] == b'\n')
	})
}

/// Does a list item with exactly `indent` start at `index`?
fn sibling_bullet_follows(text: &str, index: usize, indent: &str) -> bool {
	text[index..]
		.strip_prefix(indent)
		.is_some_and(|rest| bullet_marker_len(rest).is_some())
}

/// Length of a `*`, `+`, `-` or `1.` bullet followed by a space.
fn bullet_marker_len(text: &str) -> Option<usize> {
	let bytes = text.as_bytes();
	let marker = match bytes.first()? {
		b'*' | b'+' | b'-' => 1,
		byte if byte.is_ascii_digit() => {
			let digits = bytes.iter().take_while(|byte| byte.is_ascii_digit()).count();
			(bytes.get(digits) == Some(&b'.')).then_some(digits + 1)?
		}
		_ => return None,
	};

	(bytes.get(marker) == Some(&b' ')).then_some(marker)
}

/// A whole list, from the first bullet up to a terminating hrule, a double
/// blank line that is not followed by an indented or sibling item, or the
/// end of the input.
///
/// Groups: `1` indent, `2` bullet.
fn match_list_block(text: &str) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	let indent_len = skip_spaces(bytes, 0);
	let indent = &text[..indent_len];
	let marker = bullet_marker_len(&text[indent_len..])?;
	let bullet = &text[indent_len..indent_len + marker];
	let content_start = indent_len + marker + 1;

	if content_start >= bytes.len() {
		return None;
	}

	let last_content = bytes
		.iter()
		.rposition(|byte| !is_space(*byte))
		.unwrap_or(0);

	let first = content_start + text[content_start..].chars().next()?.len_utf8();
	let mut end = None;

	for position in first..=bytes.len() {
		if !text.is_char_boundary(position) {
			continue;
		}

		if bytes.get(position) == Some(&b'\n') {
			let after = skip_newlines(bytes, position);
			let newlines = after - position;

			if hrule_follows(text, after, indent) {
				end = Some(after);
				break;
			}

			if newlines >= 3
				|| (newlines == 2
					&& bytes.get(after) != Some(&b' ')
					&& !sibling_bullet_follows(text, after, indent))
			{
				end = Some(after);
				break;
			}
		}

		if position > last_content {
			end = Some(bytes.len());
			break;
		}
	}

	let end = end?;
	Some(RuleMatch::new(vec![
		Some(&text[..end]),
		Some(indent),
		Some(bullet),
	]))
}

/// Split a captured list into its items. A new item starts at every line
/// that begins with the same indent as the item in progress followed by a
/// bullet.
pub(crate) fn split_list_items(list: &str) -> Vec<&str> {
	let mut items = vec![];
	let mut current: Option<(usize, &str)> = None;
	let mut offset = 0;

	for line in list.split_inclusive('\n') {
		let line_start = offset;
		offset += line.len();

		if let Some((start, indent)) = current {
			if !sibling_bullet_follows(list, line_start, indent) {
				continue;
			}
			let item = &list[start..line_start];
			items.push(item.strip_suffix('\n').unwrap_or(item));
			current = None;
		}

		let indent_len = skip_spaces(line.as_bytes(), 0);
		if bullet_marker_len(&line[indent_len..]).is_some() {
			current = Some((line_start, &line[..indent_len]));
		}
	}

	if let Some((start, _)) = current {
		items.push(&list[start..]);
	}

	items
}

/// `__strong__` or `**strong**`.
///
/// Groups: `1` content.
fn match_double_emphasis(text: &str) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	let marker = *bytes.first()?;

	if !matches!(marker, b'_' | b'*') || bytes.get(1) != Some(&marker) {
		return None;
	}

	let content_start = 2;
	let first = content_start + text.get(content_start..)?.chars().next()?.len_utf8();

	(first..bytes.len().saturating_sub(1))
		.find(|&close| {
			bytes[close] == marker && bytes[close + 1] == marker && bytes.get(close + 2) != Some(&marker)
		})
		.map(|close| {
			RuleMatch::new(vec![
				Some(&text[..close + 2]),
				Some(&text[content_start..close]),
			])
		})
}

/// `_emphasis_` or `*emphasis*`. Underscore emphasis must close at a word
/// boundary; star emphasis must not close on a double star.
///
/// Groups: `1` content.
fn match_emphasis(text: &str) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	let marker = *bytes.first()?;

	if !matches!(marker, b'_' | b'*') {
		return None;
	}

	let mut cursor = 1;
	let mut units = 0;

	while cursor < bytes.len() {
		if bytes[cursor] == marker {
			let closes = match marker {
				b'_' => text[cursor + 1..].chars().next().is_none_or(|ch| !is_word(ch)),
				_ => bytes.get(cursor + 1) != Some(&marker),
			};

			if units > 0 && closes {
				return Some(RuleMatch::new(vec![
					Some(&text[..=cursor]),
					Some(&text[1..cursor]),
				]));
			}

			if bytes.get(cursor + 1) != Some(&marker) {
				return None;
			}
			cursor += 2;
		} else {
			cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
		}
		units += 1;
	}

	None
}

/// `` `code` `` with surrounding whitespace trimmed from the content.
///
/// Groups: `1` content.
fn match_code(text: &str) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	if bytes.first() != Some(&b'`') {
		return None;
	}

	for close in 1..bytes.len() {
		if bytes[close] != b'`' || bytes.get(close + 1) == Some(&b'`') {
			continue;
		}

		let inner = &text[1..close];
		let trimmed = inner.trim_start();
		let content = if trimmed.is_empty() { inner } else { trimmed };
		let content = match content.trim_end() {
			"" => content,
			trimmed => trimmed,
		};

		if content.is_empty() || content.ends_with('`') {
			continue;
		}

		return Some(RuleMatch::new(vec![Some(&text[..=close]), Some(content)]));
	}

	None
}

/// Trailing spaces followed by a newline that is not the end of the text.
fn match_linebreak(text: &str, min_spaces: usize) -> Option<RuleMatch<'_>> {
	let bytes = text.as_bytes();
	let spaces = skip_spaces(bytes, 0);

	if spaces < min_spaces || bytes.get(spaces) != Some(&b'\n') {
		return None;
	}

	let end = spaces + 1;
	if text[end..].trim().is_empty() {
		return None;
	}

	Some(RuleMatch::new(vec![Some(&text[..end])]))
}

/// `~~deleted~~` where the content starts and ends with non-whitespace.
///
/// Groups: `1` content.
fn match_strikethrough(text: &str) -> Option<RuleMatch<'_>> {
	let rest = text.strip_prefix("~~")?;
	let first = rest.chars().next()?;

	if first.is_whitespace() {
		return None;
	}

	let bytes = text.as_bytes();
	let content_start = 2;
	let search_start = content_start + first.len_utf8();

	(search_start..bytes.len().saturating_sub(1))
		.filter(|&close| bytes[close] == b'~' && bytes[close + 1] == b'~')
		.find(|&close| {
			text[..close]
				.chars()
				.next_back()
				.is_some_and(|ch| !ch.is_whitespace())
		})
		.map(|close| {
			RuleMatch::new(vec![
				Some(&text[..close + 2]),
				Some(&text[content_start..close]),
			])
		})
}

/// Characters that may start another inline construct.
fn is_inline_marker(byte: u8) -> bool {
	matches!(
		byte,
		b'\\' | b'<' | b'!' | b'[' | b'_' | b'*' | b'`' | b'~' | b'@' | b'$' | b'^'
	)
}

/// The shortest non-empty run of text that ends before the next inline
/// marker, url, line break or the end of the input.
fn match_text(text: &str, hard_wrap: bool) -> Option<RuleMatch<'_>> {
	let first = text.chars().next()?.len_utf8();
	let bytes = text.as_bytes();

	let end = (first..bytes.len())
		.find(|&index| {
			if !text.is_char_boundary(index) {
				return false;
			}

			let rest = &text[index..];
			if is_inline_marker(bytes[index])
				|| rest.starts_with("http://")
				|| rest.starts_with("https://")
			{
				return true;
			}

			// Only the start of a space run can begin a line break.
			if index > first && bytes[index - 1] == b' ' {
				return false;
			}

			let spaces = skip_spaces(bytes, index) - index;
			let min_spaces = if hard_wrap { 0 } else { 2 };
			spaces >= min_spaces && bytes.get(index + spaces) == Some(&b'\n')
		})
		.unwrap_or(bytes.len());

	Some(RuleMatch::new(vec![Some(&text[..end])]))
}
