use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;
use crate::grammar::BlockRule;
use crate::grammar::DEFAULT_INLINE_RULES;
use crate::grammar::HARD_WRAP_INLINE_RULES;
use crate::grammar::InlineRule;

#[rstest]
#[case::strong_stars("**bold**", "<p><strong>bold</strong></p>\n")]
#[case::strong_underscores("__bold__", "<p><strong>bold</strong></p>\n")]
#[case::emphasis_star("*em*", "<p><em>em</em></p>\n")]
#[case::emphasis_underscore("_em_", "<p><em>em</em></p>\n")]
#[case::strikethrough("~~s~~", "<p><del>s</del></p>\n")]
#[case::codespan("`a < b`", "<p><code>a &lt; b</code></p>\n")]
#[case::star_inside_word("2*3*4", "<p>2<em>3</em>4</p>\n")]
#[case::underscore_inside_word("snake_case_name", "<p>snake_case_name</p>\n")]
#[case::escaped_stars("a\\*b\\*", "<p>a*b*</p>\n")]
#[case::math("$x^2$", "<p><span class=\"latex\">x^2</span></p>\n")]
#[case::reflink("see @fig1@", "<p>see <span class=\"reference\" target=\"fig1\"></span></p>\n")]
#[case::footnote(
	"note^[a footnote]",
	"<p>note<span class=\"footnote\">a footnote</span></p>\n"
)]
#[case::link("[x](http://a.com)", "<p><a href=\"http://a.com\">x</a></p>\n")]
#[case::link_with_title(
	"[x](http://a.com \"T\")",
	"<p><a href=\"http://a.com\" title=\"T\">x</a></p>\n"
)]
#[case::nested_emphasis("~~**_x_**~~", "<p><del><strong><em>x</em></strong></del></p>\n")]
fn render_inline_constructs(#[case] input: &str, #[case] expected: &str) -> ElltwoResult<()> {
	let html = convert_html(input)?;
	assert_eq!(html, expected);

	Ok(())
}

#[rstest]
#[case::atx_heading("# Heading", "<div class=\"sec-title sec-lvl-1\">Heading</div>\n")]
#[case::closed_atx_heading("### Three ###", "<div class=\"sec-title sec-lvl-3\">Three</div>\n")]
#[case::setext_level_one("Title\n=====", "<div class=\"sec-title sec-lvl-1\">Title</div>\n")]
#[case::setext_level_two("Sub\n---", "<div class=\"sec-title sec-lvl-2\">Sub</div>\n")]
#[case::hrule("---", "<hr>\n")]
#[case::spaced_hrule("* * *", "<hr>\n")]
#[case::title("#! My Paper", "<div class=\"doc-title\">My Paper</div>\n")]
#[case::fenced_code(
	"```rust\nfn main() {}\n```",
	"<pre><code class=\"lang-rust\">fn main() {}\n</code></pre>\n"
)]
#[case::indented_code(
	"    let x = 1;\n    a < b",
	"<pre><code>let x = 1;\na &lt; b\n</code></pre>\n"
)]
#[case::blockquote("> quoted text", "<blockquote><p>quoted text</p>\n</blockquote>\n")]
#[case::numbered_equation(
	"$$ [eq1] E = mc^2",
	"<div class=\"equation numbered\" id=\"eq1\">E = mc^2</div>\n"
)]
#[case::equation("$$ x < y $$", "<div class=\"equation\">x &lt; y</div>\n")]
#[case::figure(
	"![A cat](cat.png)",
	"<figure><img src=\"cat.png\"><figcaption>A cat</figcaption></figure>\n"
)]
#[case::figure_without_caption("![](cat.png)", "<figure><img src=\"cat.png\"></figure>\n")]
#[case::paragraphs("one\ntwo\n\nthree", "<p>one\ntwo</p>\n<p>three</p>\n")]
#[case::paragraph_then_list("text\n- item", "<p>text</p>\n<ul>\n<li>item</li>\n</ul>\n")]
fn render_block_constructs(#[case] input: &str, #[case] expected: &str) -> ElltwoResult<()> {
	let html = convert_html(input)?;
	assert_eq!(html, expected);

	Ok(())
}

#[test]
fn adjacent_bullets_are_tight() -> ElltwoResult<()> {
	let html = convert_html("- one\n- two")?;
	assert_eq!(html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");

	Ok(())
}

#[test]
fn blank_separated_bullets_are_loose() -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse("- one\n\n- two")?;
	assert_eq!(
		tokens.into_inner(),
		vec![
			Token::ListStart { ordered: false },
			Token::LooseItemStart,
			Token::Text {
				text: "one".into()
			},
			Token::ListItemEnd,
			Token::LooseItemStart,
			Token::Text {
				text: "two".into()
			},
			Token::ListItemEnd,
			Token::ListEnd,
		]
	);

	let html = convert_html("- one\n\n- two")?;
	assert_eq!(
		html,
		"<ul>\n<li><p>one</p>\n</li>\n<li><p>two</p>\n</li>\n</ul>\n"
	);

	Ok(())
}

#[rstest]
#[case::inner_blank_line("- a\n\n  b\n- c", vec![true, false])]
#[case::blank_separator_carries_forward("- a\n- b\n\n- c", vec![false, true, true])]
fn item_looseness(#[case] input: &str, #[case] expected: Vec<bool>) -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse(input)?;
	let loose: Vec<bool> = tokens
		.iter()
		.filter_map(|token| match token {
			Token::LooseItemStart => Some(true),
			Token::ListItemStart => Some(false),
			_ => None,
		})
		.collect();
	assert_eq!(loose, expected);

	Ok(())
}

#[test]
fn ordered_list() -> ElltwoResult<()> {
	let html = convert_html("1. first\n2. second")?;
	assert_eq!(html, "<ol>\n<li>first</li>\n<li>second</li>\n</ol>\n");

	Ok(())
}

#[test]
fn nested_list_tokens_are_well_nested() -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse(NESTED_LIST)?;
	assert_eq!(tokens.into_inner(), nested_list_tokens());

	Ok(())
}

#[test]
fn nested_list_renders_inside_parent_item() -> ElltwoResult<()> {
	let html = convert_html(NESTED_LIST)?;
	assert_eq!(
		html,
		"<ul>\n<li>a<ul>\n<li>b</li>\n</ul>\n</li>\n<li>c</li>\n</ul>\n"
	);

	Ok(())
}

#[test]
fn lex_heading_and_paragraph() -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse("# Head\n\nSome text")?;
	assert_eq!(
		tokens.into_inner(),
		vec![
			Token::Heading {
				level: 1,
				text: "Head".into(),
			},
			Token::Paragraph {
				text: "Some text".into(),
			},
		]
	);

	Ok(())
}

#[test]
fn lex_fenced_code_with_language() -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse("```py\nx = 1\n```")?;
	assert_eq!(
		tokens.into_inner(),
		vec![Token::Code {
			lang: Some("py".into()),
			text: "x = 1".into(),
		}]
	);

	Ok(())
}

#[test]
fn equation_ends_at_blank_line() -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse("$$ [e1] a + b\n\nnext")?;
	assert_eq!(
		tokens.into_inner(),
		vec![
			Token::Equation {
				tag: Some("e1".into()),
				tex: "a + b".into(),
			},
			Token::Paragraph {
				text: "next".into(),
			},
		]
	);

	Ok(())
}

#[rstest]
#[case::piped(PIPED_TABLE, piped_table_token())]
#[case::boxed(BOXED_TABLE, boxed_table_token())]
#[case::piped_header_only("a|b\n:--|--:", header_only_table_token())]
#[case::boxed_header_only("| a | b |\n| :-- | --: |", header_only_table_token())]
fn lex_tables(#[case] input: &str, #[case] expected: Token) -> ElltwoResult<()> {
	let tokens = BlockLexer::default().parse(input)?;
	assert_eq!(tokens.into_inner(), vec![expected]);

	Ok(())
}

#[rstest]
#[case::left(":--", Some(Alignment::Left))]
#[case::right("--:", Some(Alignment::Right))]
#[case::center(":-:", Some(Alignment::Center))]
#[case::padded(" :--- ", Some(Alignment::Left))]
#[case::plain("---", None)]
#[case::double_colon("::--", None)]
#[case::colon_only(":", None)]
#[case::empty("", None)]
fn classify_alignment(#[case] cell: &str, #[case] expected: Option<Alignment>) {
	assert_eq!(Alignment::classify(cell), expected);
}

#[test]
fn render_table() -> ElltwoResult<()> {
	let html = convert_html(PIPED_TABLE)?;
	insta::assert_snapshot!(html, @r#"
	<table>
	<thead><tr>
	<th style="text-align:left">a</th>
	<th style="text-align:right">b</th>
	</tr>
	</thead>
	<tbody>
	<tr>
	<td style="text-align:left">1</td>
	<td style="text-align:right">2</td>
	</tr>
	</tbody>
	</table>
	"#);

	Ok(())
}

#[test]
fn header_only_table_has_empty_body() -> ElltwoResult<()> {
	let html = convert_html("a|b\n:--|--:")?;
	assert!(html.starts_with("<table>\n"));
	assert!(html.contains("<th style=\"text-align:left\">a</th>"));
	assert!(html.contains("<tbody>\n</tbody>"));

	Ok(())
}

#[test]
#[traced_test]
fn alignment_mismatch_leaves_extra_columns_unaligned() -> ElltwoResult<()> {
	let html = convert_html("a|b|c\n:--|--:\n1|2|3")?;
	assert!(html.contains("<th style=\"text-align:left\">a</th>"));
	assert!(html.contains("<th style=\"text-align:right\">b</th>"));
	assert!(html.contains("<th>c</th>"));
	assert!(html.contains("<td>3</td>"));
	assert!(logs_contain("table alignment row does not match the header"));

	Ok(())
}

#[test]
#[traced_test]
fn unsafe_link_scheme_gets_empty_target() -> ElltwoResult<()> {
	let html = convert_html("[x](javascript:alert(1))")?;
	assert_eq!(html, "<p><a href=\"\">x</a>)</p>\n");
	assert!(logs_contain("dropping link with an unsafe scheme"));

	Ok(())
}

#[rstest]
#[case::javascript("javascript:alert(1)", false)]
#[case::uppercase("JavaScript:alert(1)", false)]
#[case::padded(" \tvbscript:msgbox", false)]
#[case::http("http://example.com", true)]
#[case::relative("images/cat.png", true)]
fn link_safety(#[case] url: &str, #[case] safe: bool) {
	assert_eq!(is_safe_link(url), safe);
}

#[rstest]
#[case::smart_amp("AT&amp;T &copy; & more", "<p>AT&amp;T &copy; &amp; more</p>\n")]
#[case::angle_brackets("a < b > c", "<p>a &lt; b &gt; c</p>\n")]
#[case::script(
	"<script>alert(1)</script>",
	"<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>\n"
)]
fn escape_literal_text(#[case] input: &str, #[case] expected: &str) -> ElltwoResult<()> {
	let html = convert_html(input)?;
	assert_eq!(html, expected);

	Ok(())
}

#[rstest]
#[case::smart("&amp; &", true, "&amp; &amp;")]
#[case::strict("&amp; &", false, "&amp;amp; &amp;")]
#[case::numeric_entity("&#39;", true, "&#39;")]
#[case::not_an_entity("&;", true, "&amp;;")]
fn escape_ampersands(#[case] input: &str, #[case] smart_amp: bool, #[case] expected: &str) {
	assert_eq!(escape(input, false, smart_amp), expected);
}

#[test]
fn escape_quotes_when_asked() {
	assert_eq!(escape("\"a\" 'b'", true, true), "&quot;a&quot; &#39;b&#39;");
	assert_eq!(escape("\"a\" 'b'", false, true), "\"a\" 'b'");
}

#[test]
fn raw_text_passes_through_without_escaping() -> ElltwoResult<()> {
	let options = Options::default().with_escape(false);
	let html = markdown("<script>alert(1)</script>", &options)?;
	assert_eq!(html, "<p><script>alert(1)</script></p>\n");

	let options = Options::default().with_block_html(true);
	let html = markdown("a <b>c</b>", &options)?;
	assert_eq!(html, "<p>a <b>c</b></p>\n");

	Ok(())
}

#[test]
fn nested_link_yields_single_anchor() -> ElltwoResult<()> {
	let html = convert_html("[outer [inner](u2) text](u1)")?;
	assert_eq!(html, "<p><a href=\"u1\">outer [inner](u2) text</a></p>\n");
	assert_eq!(html.matches("<a ").count(), 1);

	Ok(())
}

#[test]
fn nested_footnote_is_not_recognized() -> ElltwoResult<()> {
	let html = convert_html("^[outer ^[inner]]")?;
	assert_eq!(
		html,
		"<p><span class=\"footnote\">outer ^[inner</span>]</p>\n"
	);

	Ok(())
}

#[test]
fn context_flags_do_not_leak_between_renders() -> ElltwoResult<()> {
	let lexer = InlineLexer::default();
	let mut renderer = HtmlRenderer::default();

	let mut context = InlineContext::default();
	context.in_link = true;
	assert!(!context.allows(InlineRule::Link));
	assert!(context.allows(InlineRule::Footnote));

	let suppressed = lexer.output_in("[a](b)", &mut renderer, context)?;
	assert_eq!(suppressed, "[a](b)");

	let linked = lexer.output("[a](b)", &mut renderer)?;
	assert_eq!(linked, "<a href=\"b\">a</a>");

	Ok(())
}

#[rstest]
#[case::soft_break("line one\nline two", Options::default(), "<p>line one\nline two</p>\n")]
#[case::trailing_spaces(
	"line one  \nline two",
	Options::default(),
	"<p>line one<br>\nline two</p>\n"
)]
#[case::hard_wrap("line one\nline two", hard_wrap_options(), "<p>line one<br>\nline two</p>\n")]
#[case::xhtml_break("a  \nb", xhtml_options(), "<p>a<br />\nb</p>\n")]
#[case::xhtml_hrule("---", xhtml_options(), "<hr />\n")]
#[case::xhtml_figure(
	"![](cat.png)",
	xhtml_options(),
	"<figure><img src=\"cat.png\" /></figure>\n"
)]
fn render_with_options(
	#[case] input: &str,
	#[case] options: Options,
	#[case] expected: &str,
) -> ElltwoResult<()> {
	let html = markdown(input, &options)?;
	assert_eq!(html, expected);

	Ok(())
}

#[test]
fn hard_wrap_selects_its_own_rule_table() {
	assert_eq!(InlineLexer::default().rules(), DEFAULT_INLINE_RULES);
	assert_eq!(
		InlineLexer::new(&hard_wrap_options()).rules(),
		HARD_WRAP_INLINE_RULES
	);
}

#[test]
fn block_nesting_limit_keeps_body_as_text() -> ElltwoResult<()> {
	let options = Options::default().with_max_nesting(1);
	let tokens = BlockLexer::new(&options).parse("> > deep")?;
	assert_eq!(
		tokens.into_inner(),
		vec![
			Token::BlockQuoteStart,
			Token::BlockQuoteStart,
			Token::Text {
				text: "deep".into()
			},
			Token::BlockQuoteEnd,
			Token::BlockQuoteEnd,
		]
	);

	let tokens = BlockLexer::default().parse("> > deep")?;
	assert_eq!(
		tokens[2],
		Token::Paragraph {
			text: "deep".into()
		}
	);

	Ok(())
}

#[test]
fn inline_nesting_limit_renders_literal_text() -> ElltwoResult<()> {
	let options = Options::default().with_max_nesting(1);
	let html = markdown("~~**_x_**~~", &options)?;
	assert_eq!(html, "<p><del><strong>_x_</strong></del></p>\n");

	Ok(())
}

#[test]
fn every_degenerate_input_terminates() -> ElltwoResult<()> {
	for input in DEGENERATE_INPUTS {
		convert_html(input)?;
		convert_latex(input)?;
		convert_tree(input)?;
	}

	Ok(())
}

#[test]
fn escaped_output_only_contains_renderer_markup() -> ElltwoResult<()> {
	let markup = regex::Regex::new(
		r"</?(?:p|pre|code|blockquote|div|hr|ul|ol|li|table|thead|tbody|tr|th|td|strong|em|del|br|a|figure|img|figcaption|span)(?: [^<>]*)?/?>",
	)
	.unwrap();

	for input in marker_corpus(3) {
		let sources = [
			input.clone(),
			format!("- {input}"),
			format!("> [{input}](u{input}) {input}"),
		];
		for source in sources {
			let html = convert_html(&source)?;
			let stripped = markup.replace_all(&html, "");
			assert!(
				!stripped.contains(['<', '>']),
				"{source:?} produced {html:?}"
			);
		}
	}

	Ok(())
}

#[test]
fn long_space_runs_render_as_text() -> ElltwoResult<()> {
	let spaces = " ".repeat(20_000);
	assert_eq!(convert_html(&format!("a{spaces}b"))?, format!("<p>a{spaces}b</p>\n"));
	assert_eq!(convert_html(&format!("a{spaces}\nb"))?, "<p>a<br>\nb</p>\n");

	Ok(())
}

#[test]
fn exhausted_rules_are_fatal() {
	let result = BlockLexer::default().parse_with_rules("abc", &[BlockRule::Newline]);
	let Err(ElltwoError::GrammarExhausted { context, remaining }) = result else {
		panic!("expected the block grammar to be exhausted");
	};
	assert_eq!(context, LexContext::Block);
	assert_eq!(remaining, "abc");
}

#[test]
fn exhausted_error_keeps_a_short_excerpt() {
	let error = ElltwoError::exhausted(LexContext::Inline, &"x".repeat(100));
	let message = error.to_string();
	assert_eq!(
		message,
		format!(
			"no inline rule matched the remaining input: `{}`",
			"x".repeat(40)
		)
	);
}

#[test]
fn preprocess_normalizes_whitespace() {
	let text = preprocess("a\tb\r\nc\u{a0}d\u{2424}e\n   \nf");
	assert_eq!(text, "a   b\nc d\ne\n\nf");
}

#[test]
fn options_deserialize_with_defaults() -> Result<(), serde_json::Error> {
	let options: Options = serde_json::from_str(r#"{ "hard_wrap": true }"#)?;
	assert_eq!(options, Options::default().with_hard_wrap(true));
	assert!(options.escape);
	assert_eq!(options.max_nesting, DEFAULT_MAX_NESTING);

	Ok(())
}

#[test]
fn latex_document() -> ElltwoResult<()> {
	let (latex, images) = convert_latex(PAPER)?;
	assert!(images.is_empty());
	insta::assert_snapshot!(latex, @r"
	\documentclass[12pt]{article}

	\usepackage{amsmath}
	\usepackage{amssymb}
	\usepackage{graphicx}
	\usepackage{hyperref}
	\usepackage[normalem]{ulem}
	\usepackage[margin=1.25in]{geometry}

	\begin{document}

	\title{Paper}
	\date{}
	\maketitle

	Hello \textit{world}.

	\end{document}
	");

	Ok(())
}

#[test]
fn latex_collects_images() -> ElltwoResult<()> {
	let (latex, images) = convert_latex(FIGURE_DOCUMENT)?;
	assert_eq!(images, vec!["plot.png".to_string()]);

	let mut markdown = Markdown::new(LatexRenderer::new(), &Options::default());
	markdown.render(FIGURE_DOCUMENT)?;
	assert_eq!(markdown.into_renderer().images().to_vec(), images);
	assert!(latex.contains("\\section{Intro}"));
	assert!(latex.contains("\\includegraphics[width=0.8\\textwidth]{plot.png}"));
	assert!(latex.contains("\\caption{Plot}"));
	assert!(latex.contains("See \\ref{fig}."));
	assert!(latex.ends_with("\\end{document}\n"));

	Ok(())
}

#[rstest]
#[case::table(
	"a|b\n:-:|--:\n1|2",
	"\\begin{tabular}{cr}\n\\hline\n\\textbf{a} & \\textbf{b} \\\\\n\\hline\n1 & 2 \\\\\n\\hline\n\\end{tabular}\n\n"
)]
#[case::list("- a\n- b", "\\begin{itemize}\n\\item a\n\\item b\n\\end{itemize}\n\n")]
#[case::numbered_equation(
	"$$ [eq] x",
	"\\begin{equation}\n\\label{eq}\nx\n\\end{equation}\n\n"
)]
#[case::equation("$$ x", "\\begin{equation*}\nx\n\\end{equation*}\n\n")]
#[case::special_characters("a_b & 50%", "a\\_b \\& 50\\%\n\n")]
#[case::footnote("a^[b]", "a\\footnote{b}\n\n")]
fn render_latex_fragments(#[case] input: &str, #[case] expected: &str) -> ElltwoResult<()> {
	let mut markdown = Markdown::new(LatexRenderer::new(), &Options::default());
	let latex = markdown.render(input)?;
	assert_eq!(latex, expected);

	Ok(())
}

#[test]
fn tree_output_serializes_to_json() -> ElltwoResult<()> {
	let nodes = convert_tree("*a*")?;
	assert_eq!(
		nodes,
		vec![Node::Paragraph {
			children: vec![Node::Emphasis {
				children: vec![Node::Text { text: "a".into() }],
			}],
		}]
	);
	assert_eq!(
		to_json(&nodes)?,
		r#"[{"type":"paragraph","children":[{"type":"emphasis","children":[{"type":"text","text":"a"}]}]}]"#
	);

	Ok(())
}

#[test]
fn tree_table_keeps_cell_flags() -> ElltwoResult<()> {
	let nodes = convert_tree(PIPED_TABLE)?;
	let [Node::Table { header, body }] = nodes.as_slice() else {
		panic!("expected a single table, got {nodes:?}");
	};
	let [Node::TableRow { children }] = header.as_slice() else {
		panic!("expected a single header row, got {header:?}");
	};
	assert_eq!(
		children[1],
		Node::TableCell {
			header: true,
			align: Some(Alignment::Right),
			children: vec![Node::Text { text: "b".into() }],
		}
	);
	assert_eq!(body.len(), 1);

	Ok(())
}

#[test]
fn parse_cell_renders_html() -> ElltwoResult<()> {
	let cell = parse_cell("**hi**")?;
	assert_eq!(cell.source(), "**hi**");
	assert_eq!(
		cell.tokens().to_vec(),
		vec![Token::Paragraph {
			text: "**hi**".into()
		}]
	);
	assert_eq!(cell.html(), "<p><strong>hi</strong></p>\n");
	assert_eq!(cell.latex()?, "\\textbf{hi}\n\n");
	assert_eq!(
		cell.tree()?,
		vec![Node::Paragraph {
			children: vec![Node::Strong {
				children: vec![Node::Text { text: "hi".into() }],
			}],
		}]
	);
	assert_eq!(
		serde_json::to_string(&cell)?,
		r#"{"source":"**hi**","html":"<p><strong>hi</strong></p>\n"}"#
	);

	Ok(())
}

#[test]
fn split_and_join_cells() {
	let cells = split_cells("#! Title\n\n\n\nBody text.\n\n  \n\nMore");
	assert_eq!(cells, vec!["#! Title", "Body text.", "More"]);
	assert_eq!(join_cells(&cells), "#! Title\n\nBody text.\n\nMore");
}
