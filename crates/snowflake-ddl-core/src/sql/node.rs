// crates/snowflake-ddl-core/src/sql/node.rs
// ============================================================================
// Module: SQL Token Tree
// Description: Render-kind AST nodes and the single interpreter that prints them.
// Purpose: Collapse every statement grammar onto one small rendering schema.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Each option type describes itself as a list of [`Node`]s. A node's variant
//! is its render kind (`static`, `keyword`, `identifier`, `parameter`, `list`,
//! nested struct); [`render_nodes`] is the only code that turns nodes into
//! text. Output is one line: fragments are joined by single spaces, and a
//! fragment starting with a comma attaches to its predecessor without a space.
//! Quoting is not escape-safe: free-text values must not carry the quote
//! character their encoding uses.

use std::borrow::Cow;

// ============================================================================
// SECTION: Encodings
// ============================================================================

/// Quote style applied to a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quotes {
    /// Emit the value verbatim.
    None,
    /// Wrap the value in `'…'`.
    Single,
    /// Wrap the value in `"…"`.
    Double,
    /// Wrap the value in `$$…$$`.
    Dollar,
}

impl Quotes {
    /// Applies the quote style to a value.
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::None => value.to_string(),
            Self::Single => format!("'{value}'"),
            Self::Double => format!("\"{value}\""),
            Self::Dollar => format!("$${value}$$"),
        }
    }
}

/// Value encoding for parameters and list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    /// Quote style for the value.
    pub quotes: Quotes,
    /// Whether `=` separates the keyword and the value.
    pub equals: bool,
    /// Whether the value is wrapped in parentheses.
    pub parentheses: bool,
}

impl Encoding {
    /// `KEYWORD = value`.
    pub const PLAIN: Self = Self {
        quotes: Quotes::None,
        equals: true,
        parentheses: false,
    };
    /// `KEYWORD = 'value'`.
    pub const SINGLE_QUOTES: Self = Self {
        quotes: Quotes::Single,
        equals: true,
        parentheses: false,
    };
    /// `KEYWORD = "value"`.
    pub const DOUBLE_QUOTES: Self = Self {
        quotes: Quotes::Double,
        equals: true,
        parentheses: false,
    };
    /// `KEYWORD = $$value$$`.
    pub const DOLLAR_QUOTES: Self = Self {
        quotes: Quotes::Dollar,
        equals: true,
        parentheses: false,
    };

    /// Drops the `=` between keyword and value.
    #[must_use]
    pub const fn no_equals(mut self) -> Self {
        self.equals = false;
        self
    }

    /// Wraps the value in parentheses.
    #[must_use]
    pub const fn parentheses(mut self) -> Self {
        self.parentheses = true;
        self
    }
}

/// Separator placed between list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `a, b`.
    Comma,
    /// `a b`.
    Space,
}

impl Separator {
    /// Returns the separator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comma => ", ",
            Self::Space => " ",
        }
    }
}

// ============================================================================
// SECTION: Nodes
// ============================================================================

/// One render-kind token in a statement tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Fixed keyword emitted unconditionally.
    Static(Cow<'static, str>),
    /// Keyword emitted because its field is set.
    Keyword(Cow<'static, str>),
    /// Fully qualified identifier with an optional leading keyword.
    Identifier {
        /// Leading keyword, if any.
        keyword: Option<Cow<'static, str>>,
        /// Whether `=` follows the keyword.
        equals: bool,
        /// Fully qualified identifier text.
        value: String,
    },
    /// `KEYWORD = value` with an encoding. An empty keyword emits the value
    /// alone.
    Parameter {
        /// Parameter keyword.
        keyword: Cow<'static, str>,
        /// Unquoted value text.
        value: String,
        /// Value encoding.
        encoding: Encoding,
    },
    /// Sequence of child nodes with a separator and optional parentheses.
    /// Empty children are dropped; a list with no remaining children renders
    /// nothing at all, keyword included.
    List {
        /// Leading keyword, if any.
        keyword: Option<Cow<'static, str>>,
        /// Whether `=` follows the keyword.
        equals: bool,
        /// Child nodes, rendered individually.
        items: Vec<Node>,
        /// Item separator.
        separator: Separator,
        /// Whether the joined items are wrapped in parentheses.
        parentheses: bool,
    },
    /// Nested option structure rendered in declared field order.
    Nested(Vec<Node>),
}

// ============================================================================
// SECTION: Interpreter
// ============================================================================

/// Renders a node sequence into a single whitespace-separated line.
#[must_use]
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        append_fragment(&mut out, &render_node(node));
    }
    out
}

/// Renders a single node. Unset content yields an empty string.
#[must_use]
pub fn render_node(node: &Node) -> String {
    match node {
        Node::Static(text) | Node::Keyword(text) => text.trim().to_string(),
        Node::Identifier {
            keyword,
            equals,
            value,
        } => with_keyword(keyword.as_deref(), *equals, value),
        Node::Parameter {
            keyword,
            value,
            encoding,
        } => {
            let mut text = encoding.quotes.apply(value);
            if encoding.parentheses {
                text = format!("({text})");
            }
            let keyword = if keyword.is_empty() { None } else { Some(keyword.as_ref()) };
            with_keyword(keyword, encoding.equals, &text)
        }
        Node::List {
            keyword,
            equals,
            items,
            separator,
            parentheses,
        } => {
            let rendered: Vec<String> =
                items.iter().map(render_node).filter(|item| !item.is_empty()).collect();
            if rendered.is_empty() {
                return String::new();
            }
            let mut text = rendered.join(separator.as_str());
            if *parentheses {
                text = format!("({text})");
            }
            with_keyword(keyword.as_deref(), *equals, &text)
        }
        Node::Nested(children) => render_nodes(children),
    }
}

/// Prefixes `text` with `keyword` and an optional `=`.
fn with_keyword(keyword: Option<&str>, equals: bool, text: &str) -> String {
    match keyword {
        Some(keyword) if equals => format!("{keyword} = {text}"),
        Some(keyword) => format!("{keyword} {text}"),
        None => text.to_string(),
    }
}

/// Appends a fragment, separating with a space unless it starts with a comma.
fn append_fragment(out: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    if !out.is_empty() && !fragment.starts_with(',') {
        out.push(' ');
    }
    out.push_str(fragment);
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_attach_without_leading_space() {
        let nodes = vec![Node::Static("A".into()), Node::Static(",".into()), Node::Static("B".into())];
        assert_eq!(render_nodes(&nodes), "A, B");
    }

    #[test]
    fn empty_list_drops_its_keyword() {
        let node = Node::List {
            keyword: Some("UNSET".into()),
            equals: false,
            items: vec![Node::Nested(Vec::new())],
            separator: Separator::Comma,
            parentheses: false,
        };
        assert_eq!(render_node(&node), "");
    }
}
