use tracing::debug;

use crate::Alignment;
use crate::CellFlags;
use crate::Renderer;
use crate::is_safe_link;

const PREAMBLE: &str = "\\documentclass[12pt]{article}

\\usepackage{amsmath}
\\usepackage{amssymb}
\\usepackage{graphicx}
\\usepackage{hyperref}
\\usepackage[normalem]{ulem}
\\usepackage[margin=1.25in]{geometry}

\\begin{document}

";

const CELL_SEPARATOR: &str = " & ";

/// Escape the characters that are special to LaTeX in running text.
pub fn escape_latex(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for ch in text.chars() {
		match ch {
			'\\' => escaped.push_str("\\textbackslash{}"),
			'^' => escaped.push_str("\\textasciicircum{}"),
			'~' => escaped.push_str("\\textasciitilde{}"),
			'{' | '}' | '$' | '&' | '#' | '_' | '%' => {
				escaped.push('\\');
				escaped.push(ch);
			}
			_ => escaped.push(ch),
		}
	}

	escaped
}

/// Escape a url for `\href` and `\includegraphics`.
fn escape_url(url: &str) -> String {
	if !is_safe_link(url) {
		debug!(url, "dropping link with an unsafe scheme");
		return String::new();
	}

	url.replace('%', "\\%").replace('#', "\\#")
}

/// Renders a document to the body of a LaTeX article and records every
/// image it references.
#[derive(Debug, Clone, Default)]
pub struct LatexRenderer {
	images: Vec<String>,
	columns: Vec<Option<Alignment>>,
}

impl LatexRenderer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Image paths referenced so far, in document order.
	pub fn images(&self) -> &[String] {
		&self.images
	}

	/// Wrap a rendered body into a complete document and hand back the
	/// referenced images, leaving the renderer ready for another document.
	pub fn finish(&mut self, body: &str) -> (String, Vec<String>) {
		let document = format!("{PREAMBLE}{}\n\n\\end{{document}}\n", body.trim_end());
		self.columns.clear();
		(document, std::mem::take(&mut self.images))
	}
}

impl Renderer for LatexRenderer {
	type Output = String;

	fn block_code(&mut self, code: &str, _lang: Option<&str>) -> String {
		format!(
			"\\begin{{verbatim}}\n{}\n\\end{{verbatim}}\n\n",
			code.trim_end_matches('\n')
		)
	}

	fn block_quote(&mut self, body: String) -> String {
		format!("\\begin{{quote}}\n{}\n\\end{{quote}}\n\n", body.trim_end())
	}

	fn header(&mut self, text: String, level: u8, _raw: &str) -> String {
		let command = match level {
			1 => "section",
			2 => "subsection",
			3 => "subsubsection",
			4 => "paragraph",
			_ => "subparagraph",
		};
		format!("\\{command}{{{text}}}\n\n")
	}

	fn hrule(&mut self) -> String {
		"\\noindent\\rule{\\textwidth}{0.4pt}\n\n".to_string()
	}

	fn list(&mut self, body: String, ordered: bool) -> String {
		let environment = if ordered { "enumerate" } else { "itemize" };
		format!("\\begin{{{environment}}}\n{body}\\end{{{environment}}}\n\n")
	}

	fn list_item(&mut self, body: String) -> String {
		format!("\\item {}\n", body.trim())
	}

	fn paragraph(&mut self, text: String) -> String {
		format!("{}\n\n", text.trim())
	}

	fn table(&mut self, header: String, body: String) -> String {
		let column_format: String = self
			.columns
			.drain(..)
			.map(|align| match align {
				Some(Alignment::Center) => 'c',
				Some(Alignment::Right) => 'r',
				Some(Alignment::Left) | None => 'l',
			})
			.collect();

		format!(
			"\\begin{{tabular}}{{{column_format}}}\n\\hline\n{header}\\hline\n{body}\\hline\n\\end{{tabular}}\n\n"
		)
	}

	fn table_row(&mut self, content: String) -> String {
		let content = content.strip_suffix(CELL_SEPARATOR).unwrap_or(&content);
		format!("{content} \\\\\n")
	}

	fn table_cell(&mut self, content: String, flags: CellFlags) -> String {
		if flags.header {
			self.columns.push(flags.align);
			format!("\\textbf{{{content}}}{CELL_SEPARATOR}")
		} else {
			format!("{content}{CELL_SEPARATOR}")
		}
	}

	fn double_emphasis(&mut self, text: String) -> String {
		format!("\\textbf{{{text}}}")
	}

	fn emphasis(&mut self, text: String) -> String {
		format!("\\textit{{{text}}}")
	}

	fn codespan(&mut self, text: &str) -> String {
		format!("\\texttt{{{}}}", escape_latex(text.trim_end()))
	}

	fn linebreak(&mut self) -> String {
		"\\\\\n".to_string()
	}

	fn strikethrough(&mut self, text: String) -> String {
		format!("\\sout{{{text}}}")
	}

	fn text(&mut self, text: &str) -> String {
		escape_latex(text)
	}

	fn escape(&mut self, text: &str) -> String {
		escape_latex(text)
	}

	fn link(&mut self, link: &str, _title: Option<&str>, text: String) -> String {
		format!("\\href{{{}}}{{{text}}}", escape_url(link))
	}

	fn image(&mut self, src: &str, title: String) -> String {
		self.images.push(src.to_string());

		let caption = if title.is_empty() {
			String::new()
		} else {
			format!("\\caption{{{title}}}\n")
		};

		format!(
			"\\begin{{figure}}[h]\n\\centering\n\\includegraphics[width=0.8\\textwidth]{{{}}}\n{caption}\\end{{figure}}\n\n",
			escape_url(src)
		)
	}

	fn reflink(&mut self, tag: &str) -> String {
		format!("\\ref{{{tag}}}")
	}

	fn footnote(&mut self, text: String) -> String {
		format!("\\footnote{{{text}}}")
	}

	fn equation(&mut self, tex: &str, tag: Option<&str>) -> String {
		match tag {
			Some(tag) if !tag.is_empty() => {
				format!("\\begin{{equation}}\n\\label{{{tag}}}\n{tex}\n\\end{{equation}}\n\n")
			}
			_ => format!("\\begin{{equation*}}\n{tex}\n\\end{{equation*}}\n\n"),
		}
	}

	fn math(&mut self, tex: &str) -> String {
		format!("${tex}$")
	}

	fn title(&mut self, text: String) -> String {
		format!("\\title{{{text}}}\n\\date{{}}\n\\maketitle\n\n")
	}
}
