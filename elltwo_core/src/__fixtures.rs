use crate::Alignment;
use crate::Options;
use crate::Token;

pub(crate) fn hard_wrap_options() -> Options {
	Options::default().with_hard_wrap(true)
}

pub(crate) fn xhtml_options() -> Options {
	Options::default().with_xhtml(true)
}

pub(crate) const PIPED_TABLE: &str = "a|b\n:--|--:\n1|2";

pub(crate) const BOXED_TABLE: &str = "| a | b |\n| --- | :-: |\n| 1 | 2 |";

pub(crate) const NESTED_LIST: &str = "- a\n    - b\n- c";

pub(crate) const PAPER: &str = "#! Paper\n\nHello *world*.";

pub(crate) const FIGURE_DOCUMENT: &str = "# Intro\n\n![Plot](plot.png)\n\nSee @fig@.";

pub(crate) fn piped_table_token() -> Token {
	Token::Table {
		header: vec!["a".into(), "b".into()],
		align: vec![Some(Alignment::Left), Some(Alignment::Right)],
		cells: vec![vec!["1".into(), "2".into()]],
	}
}

pub(crate) fn boxed_table_token() -> Token {
	Token::Table {
		header: vec!["a".into(), "b".into()],
		align: vec![None, Some(Alignment::Center)],
		cells: vec![vec!["1".into(), "2".into()]],
	}
}

pub(crate) fn header_only_table_token() -> Token {
	Token::Table {
		header: vec!["a".into(), "b".into()],
		align: vec![Some(Alignment::Left), Some(Alignment::Right)],
		cells: vec![],
	}
}

pub(crate) fn nested_list_tokens() -> Vec<Token> {
	vec![
		Token::ListStart { ordered: false },
		Token::ListItemStart,
		Token::Text { text: "a".into() },
		Token::ListStart { ordered: false },
		Token::ListItemStart,
		Token::Text { text: "b".into() },
		Token::ListItemEnd,
		Token::ListEnd,
		Token::ListItemEnd,
		Token::ListItemStart,
		Token::Text { text: "c".into() },
		Token::ListItemEnd,
		Token::ListEnd,
	]
}

/// Characters that open or close a construct, plus the markup characters
/// that must always come out escaped.
pub(crate) const MARKER_ALPHABET: &str = "<>&\"'*_~`$^@#!|-[]()\\ \na";

/// Every string over [`MARKER_ALPHABET`] up to `max_len` characters long.
pub(crate) fn marker_corpus(max_len: usize) -> Vec<String> {
	let alphabet: Vec<char> = MARKER_ALPHABET.chars().collect();
	let mut corpus = vec![String::new()];
	let mut frontier = vec![String::new()];

	for _ in 0..max_len {
		frontier = frontier
			.iter()
			.flat_map(|prefix| alphabet.iter().map(move |ch| format!("{prefix}{ch}")))
			.collect();
		corpus.extend(frontier.iter().cloned());
	}

	corpus
}

/// Inputs made of unterminated or degenerate constructs.
pub(crate) const DEGENERATE_INPUTS: [&str; 30] = [
	"",
	"*",
	"**",
	"- ",
	"1. ",
	">",
	"> ",
	"\\",
	"```",
	"``",
	"~~~",
	"$",
	"$$",
	"|",
	"^[",
	"[a](",
	"](",
	"![",
	"#",
	"#!",
	"@",
	"_a",
	"* * x",
	"-\n-",
	"    ",
	"\t\t",
	"a\r\nb",
	"\n\n\n",
	"- a\n\n\n\n- b",
	"[[[[]]]](((())))",
];
