use serde::Serialize;

use crate::Alignment;
use crate::CellFlags;
use crate::ElltwoResult;
use crate::Renderer;
use crate::is_safe_link;

/// A node of the rendered document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
	CodeBlock {
		lang: Option<String>,
		code: String,
	},
	BlockQuote {
		children: Vec<Node>,
	},
	Heading {
		level: u8,
		children: Vec<Node>,
	},
	Hrule,
	List {
		ordered: bool,
		children: Vec<Node>,
	},
	ListItem {
		children: Vec<Node>,
	},
	Paragraph {
		children: Vec<Node>,
	},
	Table {
		header: Vec<Node>,
		body: Vec<Node>,
	},
	TableRow {
		children: Vec<Node>,
	},
	TableCell {
		header: bool,
		align: Option<Alignment>,
		children: Vec<Node>,
	},
	Strong {
		children: Vec<Node>,
	},
	Emphasis {
		children: Vec<Node>,
	},
	Code {
		text: String,
	},
	LineBreak,
	Strikethrough {
		children: Vec<Node>,
	},
	Text {
		text: String,
	},
	Link {
		href: String,
		title: Option<String>,
		children: Vec<Node>,
	},
	Image {
		src: String,
		caption: Vec<Node>,
	},
	Reference {
		tag: String,
	},
	Footnote {
		children: Vec<Node>,
	},
	Equation {
		tag: Option<String>,
		tex: String,
	},
	Math {
		tex: String,
	},
	Title {
		children: Vec<Node>,
	},
}

/// Builds a [`Node`] tree instead of text, for hosts that post-process the
/// document themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer;

impl TreeRenderer {
	pub fn new() -> Self {
		Self
	}
}

/// Serialize a rendered tree to JSON.
pub fn to_json(nodes: &[Node]) -> ElltwoResult<String> {
	Ok(serde_json::to_string(nodes)?)
}

impl Renderer for TreeRenderer {
	type Output = Vec<Node>;

	fn block_code(&mut self, code: &str, lang: Option<&str>) -> Vec<Node> {
		vec![Node::CodeBlock {
			lang: lang.map(ToString::to_string),
			code: code.trim_end_matches('\n').to_string(),
		}]
	}

	fn block_quote(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::BlockQuote { children }]
	}

	fn header(&mut self, children: Vec<Node>, level: u8, _raw: &str) -> Vec<Node> {
		vec![Node::Heading { level, children }]
	}

	fn hrule(&mut self) -> Vec<Node> {
		vec![Node::Hrule]
	}

	fn list(&mut self, children: Vec<Node>, ordered: bool) -> Vec<Node> {
		vec![Node::List { ordered, children }]
	}

	fn list_item(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::ListItem { children }]
	}

	fn paragraph(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::Paragraph { children }]
	}

	fn table(&mut self, header: Vec<Node>, body: Vec<Node>) -> Vec<Node> {
		vec![Node::Table { header, body }]
	}

	fn table_row(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::TableRow { children }]
	}

	fn table_cell(&mut self, children: Vec<Node>, flags: CellFlags) -> Vec<Node> {
		vec![Node::TableCell {
			header: flags.header,
			align: flags.align,
			children,
		}]
	}

	fn double_emphasis(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::Strong { children }]
	}

	fn emphasis(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::Emphasis { children }]
	}

	fn codespan(&mut self, text: &str) -> Vec<Node> {
		vec![Node::Code {
			text: text.trim_end().to_string(),
		}]
	}

	fn linebreak(&mut self) -> Vec<Node> {
		vec![Node::LineBreak]
	}

	fn strikethrough(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::Strikethrough { children }]
	}

	fn text(&mut self, text: &str) -> Vec<Node> {
		vec![Node::Text {
			text: text.to_string(),
		}]
	}

	fn escape(&mut self, text: &str) -> Vec<Node> {
		self.text(text)
	}

	fn link(&mut self, link: &str, title: Option<&str>, children: Vec<Node>) -> Vec<Node> {
		let href = if is_safe_link(link) { link } else { "" };
		vec![Node::Link {
			href: href.to_string(),
			title: title.map(ToString::to_string),
			children,
		}]
	}

	fn image(&mut self, src: &str, caption: Vec<Node>) -> Vec<Node> {
		let src = if is_safe_link(src) { src } else { "" };
		vec![Node::Image {
			src: src.to_string(),
			caption,
		}]
	}

	fn reflink(&mut self, tag: &str) -> Vec<Node> {
		vec![Node::Reference {
			tag: tag.to_string(),
		}]
	}

	fn footnote(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::Footnote { children }]
	}

	fn equation(&mut self, tex: &str, tag: Option<&str>) -> Vec<Node> {
		vec![Node::Equation {
			tag: tag.map(ToString::to_string),
			tex: tex.to_string(),
		}]
	}

	fn math(&mut self, tex: &str) -> Vec<Node> {
		vec![Node::Math {
			tex: tex.to_string(),
		}]
	}

	fn title(&mut self, children: Vec<Node>) -> Vec<Node> {
		vec![Node::Title { children }]
	}
}
