// crates/snowflake-ddl-core/src/sql/builder.rs
// ============================================================================
// Module: SQL Builder
// Description: Field-by-field construction of statement token trees.
// Purpose: Let option types declare their grammar without formatting code.
// Dependencies: crate::sql::node, crate::sql::value, crate::core::identifiers
// ============================================================================

//! ## Overview
//! [`SqlBuilder`] is the declarative surface option types use inside their
//! [`Render`] impls. Each method corresponds to one render kind and pushes a
//! node only when the field is set: `None` options, `false` flags, and empty
//! slices contribute nothing. Declared call order is output order.

use std::borrow::Cow;

use crate::core::identifiers::ObjectIdentifier;
use crate::sql::Render;
use crate::sql::node::Encoding;
use crate::sql::node::Node;
use crate::sql::node::Quotes;
use crate::sql::node::Separator;
use crate::sql::value::SqlValue;

// ============================================================================
// SECTION: Flags
// ============================================================================

/// Field type usable as a keyword toggle.
pub trait Flag {
    /// Returns true when the keyword should be emitted.
    fn is_on(&self) -> bool;
}

impl Flag for bool {
    fn is_on(&self) -> bool {
        *self
    }
}

impl Flag for Option<bool> {
    fn is_on(&self) -> bool {
        matches!(self, Some(true))
    }
}

// ============================================================================
// SECTION: List Options
// ============================================================================

/// Rendering options for sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Item separator.
    pub separator: Separator,
    /// Whether the joined items are parenthesized.
    pub parentheses: bool,
    /// Whether `=` follows the list keyword.
    pub equals: bool,
    /// Quote style applied to each plain item.
    pub quotes: Quotes,
}

impl ListOptions {
    /// `KEYWORD a, b`.
    pub const COMMA: Self = Self {
        separator: Separator::Comma,
        parentheses: false,
        equals: false,
        quotes: Quotes::None,
    };
    /// `KEYWORD (a, b)`.
    pub const COMMA_PARENTHESES: Self = Self {
        separator: Separator::Comma,
        parentheses: true,
        equals: false,
        quotes: Quotes::None,
    };
    /// `KEYWORD = (a, b)`.
    pub const ASSIGNED_PARENTHESES: Self = Self {
        separator: Separator::Comma,
        parentheses: true,
        equals: true,
        quotes: Quotes::None,
    };
    /// `KEYWORD a b`.
    pub const SPACE: Self = Self {
        separator: Separator::Space,
        parentheses: false,
        equals: false,
        quotes: Quotes::None,
    };

    /// Applies a quote style to each item.
    #[must_use]
    pub const fn quoted(mut self, quotes: Quotes) -> Self {
        self.quotes = quotes;
        self
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Accumulates render-kind nodes for one option value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlBuilder {
    /// Nodes in declared order.
    nodes: Vec<Node>,
}

impl SqlBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
        }
    }

    /// Returns the accumulated nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Consumes the builder, returning its nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Pushes a prebuilt node.
    pub fn push(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Emits a fixed keyword unconditionally.
    pub fn static_keyword(&mut self, text: &'static str) -> &mut Self {
        self.push(Node::Static(Cow::Borrowed(text)))
    }

    /// Emits `text` when the flag is on.
    pub fn keyword(&mut self, flag: impl Flag, text: &'static str) -> &mut Self {
        if flag.is_on() {
            self.push(Node::Keyword(Cow::Borrowed(text)));
        }
        self
    }

    /// Emits a keyword whose text is only known at runtime (enum variants
    /// that render as bare keywords).
    pub fn keyword_value<V: SqlValue + ?Sized>(&mut self, value: Option<&V>) -> &mut Self {
        if let Some(value) = value {
            self.push(Node::Keyword(Cow::Owned(value.to_sql())));
        }
        self
    }

    /// Emits a bare fully qualified identifier.
    pub fn identifier<I: ObjectIdentifier + ?Sized>(&mut self, id: &I) -> &mut Self {
        self.push(Node::Identifier {
            keyword: None,
            equals: false,
            value: id.fully_qualified_name(),
        })
    }

    /// Emits `KEYWORD <identifier>` when the identifier is present.
    pub fn identifier_with<I: ObjectIdentifier + ?Sized>(
        &mut self,
        keyword: &'static str,
        id: Option<&I>,
    ) -> &mut Self {
        if let Some(id) = id {
            self.push(Node::Identifier {
                keyword: Some(Cow::Borrowed(keyword)),
                equals: false,
                value: id.fully_qualified_name(),
            });
        }
        self
    }

    /// Emits `KEYWORD = <identifier>` when the identifier is present.
    pub fn identifier_assigned<I: ObjectIdentifier + ?Sized>(
        &mut self,
        keyword: &'static str,
        id: Option<&I>,
    ) -> &mut Self {
        if let Some(id) = id {
            self.push(Node::Identifier {
                keyword: Some(Cow::Borrowed(keyword)),
                equals: true,
                value: id.fully_qualified_name(),
            });
        }
        self
    }

    /// Emits `KEYWORD = value` using `encoding` when the value is present.
    /// The keyword may be computed at runtime (session parameter names, tag
    /// identifiers).
    pub fn parameter<V: SqlValue + ?Sized>(
        &mut self,
        keyword: impl Into<Cow<'static, str>>,
        value: Option<&V>,
        encoding: Encoding,
    ) -> &mut Self {
        if let Some(value) = value {
            self.push(Node::Parameter {
                keyword: keyword.into(),
                value: value.to_sql(),
                encoding,
            });
        }
        self
    }

    /// Emits a bare value with the given quoting when present.
    pub fn value<V: SqlValue + ?Sized>(&mut self, value: Option<&V>, quotes: Quotes) -> &mut Self {
        if let Some(value) = value {
            self.push(Node::Parameter {
                keyword: Cow::Borrowed(""),
                value: value.to_sql(),
                encoding: Encoding {
                    quotes,
                    equals: false,
                    parentheses: false,
                },
            });
        }
        self
    }

    /// Emits a plain sequence of values. Empty slices render nothing.
    pub fn list<V: SqlValue>(
        &mut self,
        keyword: Option<&'static str>,
        items: &[V],
        options: ListOptions,
    ) -> &mut Self {
        if items.is_empty() {
            return self;
        }
        let items = items
            .iter()
            .map(|item| Node::Parameter {
                keyword: Cow::Borrowed(""),
                value: item.to_sql(),
                encoding: Encoding {
                    quotes: options.quotes,
                    equals: false,
                    parentheses: false,
                },
            })
            .collect();
        self.push(Node::List {
            keyword: keyword.map(Cow::Borrowed),
            equals: options.equals,
            items,
            separator: options.separator,
            parentheses: options.parentheses,
        })
    }

    /// Emits a sequence whose items are the nodes pushed by `build`. Each
    /// top-level node pushed becomes one item.
    pub fn list_of(
        &mut self,
        keyword: Option<&'static str>,
        options: ListOptions,
        build: impl FnOnce(&mut Self),
    ) -> &mut Self {
        let mut inner = Self::new();
        build(&mut inner);
        self.push(Node::List {
            keyword: keyword.map(Cow::Borrowed),
            equals: options.equals,
            items: inner.nodes,
            separator: options.separator,
            parentheses: options.parentheses,
        })
    }

    /// Emits a nested option structure when present.
    pub fn nested<R: Render + ?Sized>(&mut self, value: Option<&R>) -> &mut Self {
        if let Some(value) = value {
            let mut inner = Self::new();
            value.render(&mut inner);
            self.push(Node::Nested(inner.nodes));
        }
        self
    }

    /// Groups the nodes pushed by `build` into a single nested node.
    pub fn group(&mut self, build: impl FnOnce(&mut Self)) -> &mut Self {
        let mut inner = Self::new();
        build(&mut inner);
        self.push(Node::Nested(inner.nodes))
    }
}
