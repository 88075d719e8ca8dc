use tracing::debug;

use crate::CellFlags;
use crate::Options;
use crate::Renderer;
use crate::is_safe_link;

/// Replace `&`, `<` and `>` with HTML entities, and `"` and `'` as well when
/// `quote` is set.
///
/// With `smart_amp` an `&` that already starts an entity such as `&amp;` or
/// `&#39;` is left alone, so escaped text is never escaped twice.
pub fn escape(text: &str, quote: bool, smart_amp: bool) -> String {
	let mut escaped = String::with_capacity(text.len());

	for (index, ch) in text.char_indices() {
		match ch {
			'&' if smart_amp && starts_entity(&text[index + 1..]) => escaped.push('&'),
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' if quote => escaped.push_str("&quot;"),
			'\'' if quote => escaped.push_str("&#39;"),
			_ => escaped.push(ch),
		}
	}

	escaped
}

/// `#?\w+;`
fn starts_entity(text: &str) -> bool {
	let text = text.strip_prefix('#').unwrap_or(text);
	let name_len = text
		.char_indices()
		.find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_'))
		.map_or(text.len(), |(index, _)| index);

	name_len > 0 && text[name_len..].starts_with(';')
}

/// Escape a link target for use in an attribute. Script schemes become an
/// empty target.
pub fn escape_link(url: &str) -> String {
	if !is_safe_link(url) {
		debug!(url, "dropping link with an unsafe scheme");
		return String::new();
	}

	escape(url, true, false)
}

/// Renders a document to an HTML fragment.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
	options: Options,
}

impl HtmlRenderer {
	pub fn new(options: Options) -> Self {
		Self { options }
	}

	fn void_tag(&self, tag: &str) -> String {
		if self.options.use_xhtml {
			format!("<{tag} />")
		} else {
			format!("<{tag}>")
		}
	}
}

impl Renderer for HtmlRenderer {
	type Output = String;

	fn block_code(&mut self, code: &str, lang: Option<&str>) -> String {
		let code = code.trim_end_matches('\n');
		match lang {
			Some(lang) => {
				format!(
					"<pre><code class=\"lang-{}\">{}\n</code></pre>\n",
					escape(lang, true, false),
					escape(code, true, false)
				)
			}
			None => format!("<pre><code>{}\n</code></pre>\n", escape(code, false, false)),
		}
	}

	fn block_quote(&mut self, body: String) -> String {
		format!("<blockquote>{}\n</blockquote>\n", body.trim_end_matches('\n'))
	}

	fn header(&mut self, text: String, level: u8, _raw: &str) -> String {
		format!("<div class=\"sec-title sec-lvl-{level}\">{text}</div>\n")
	}

	fn hrule(&mut self) -> String {
		format!("{}\n", self.void_tag("hr"))
	}

	fn list(&mut self, body: String, ordered: bool) -> String {
		let tag = if ordered { "ol" } else { "ul" };
		format!("<{tag}>\n{body}</{tag}>\n")
	}

	fn list_item(&mut self, body: String) -> String {
		format!("<li>{body}</li>\n")
	}

	fn paragraph(&mut self, text: String) -> String {
		format!("<p>{}</p>\n", text.trim_matches(' '))
	}

	fn table(&mut self, header: String, body: String) -> String {
		format!("<table>\n<thead>{header}</thead>\n<tbody>\n{body}</tbody>\n</table>\n")
	}

	fn table_row(&mut self, content: String) -> String {
		format!("<tr>\n{content}</tr>\n")
	}

	fn table_cell(&mut self, content: String, flags: CellFlags) -> String {
		let tag = if flags.header { "th" } else { "td" };
		match flags.align {
			Some(align) => {
				format!(
					"<{tag} style=\"text-align:{}\">{content}</{tag}>\n",
					align.as_str()
				)
			}
			None => format!("<{tag}>{content}</{tag}>\n"),
		}
	}

	fn double_emphasis(&mut self, text: String) -> String {
		format!("<strong>{text}</strong>")
	}

	fn emphasis(&mut self, text: String) -> String {
		format!("<em>{text}</em>")
	}

	fn codespan(&mut self, text: &str) -> String {
		format!("<code>{}</code>", escape(text.trim_end(), false, false))
	}

	fn linebreak(&mut self) -> String {
		format!("{}\n", self.void_tag("br"))
	}

	fn strikethrough(&mut self, text: String) -> String {
		format!("<del>{text}</del>")
	}

	fn text(&mut self, text: &str) -> String {
		if self.options.passes_raw_html() {
			return text.to_string();
		}
		escape(text, false, true)
	}

	fn escape(&mut self, text: &str) -> String {
		escape(text, false, true)
	}

	fn link(&mut self, link: &str, title: Option<&str>, text: String) -> String {
		let link = escape_link(link);
		match title {
			Some(title) => {
				format!(
					"<a href=\"{link}\" title=\"{}\">{text}</a>",
					escape(title, true, true)
				)
			}
			None => format!("<a href=\"{link}\">{text}</a>"),
		}
	}

	fn image(&mut self, src: &str, title: String) -> String {
		let src = escape_link(src);
		let img = if self.options.use_xhtml {
			format!("<img src=\"{src}\" />")
		} else {
			format!("<img src=\"{src}\">")
		};

		if title.is_empty() {
			format!("<figure>{img}</figure>\n")
		} else {
			format!("<figure>{img}<figcaption>{title}</figcaption></figure>\n")
		}
	}

	fn reflink(&mut self, tag: &str) -> String {
		format!(
			"<span class=\"reference\" target=\"{}\"></span>",
			escape(tag, true, true)
		)
	}

	fn footnote(&mut self, text: String) -> String {
		format!("<span class=\"footnote\">{text}</span>")
	}

	fn equation(&mut self, tex: &str, tag: Option<&str>) -> String {
		let tex = escape(tex, false, false);
		match tag {
			Some(tag) if !tag.is_empty() => {
				format!(
					"<div class=\"equation numbered\" id=\"{}\">{tex}</div>\n",
					escape(tag, true, true)
				)
			}
			_ => format!("<div class=\"equation\">{tex}</div>\n"),
		}
	}

	fn math(&mut self, tex: &str) -> String {
		format!("<span class=\"latex\">{}</span>", escape(tex, false, false))
	}

	fn title(&mut self, text: String) -> String {
		format!("<div class=\"doc-title\">{text}</div>\n")
	}
}
