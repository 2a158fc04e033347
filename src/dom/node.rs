//! Node representation
//!
//! Uses NodeId (u32) for compact node references. A node's identity is its
//! index in the document arena, which also gives a stable creation order.

use super::strings::Text;

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Element with no content and no closing tag (`br`, `img`, `input`, ...)
    VoidElement,
    /// Element whose content is raw text (`script`, `style`)
    TextElement,
    /// Any other element. Value holds its first text run
    Element,
    /// `<!DOCTYPE ...>`. Value holds the raw doctype text
    Doctype,
    /// Text node. Never produced by the parser, only by the tree API
    Data,
    /// `<![CDATA[...]]>`. Value holds the raw section text
    CData,
    /// `<!--...-->`. Value holds the raw comment text
    Comment,
    /// `<?xml ...?>`. Parameters live in the attributes
    Declaration,
    /// `<?target ...?>`. Name is the target, value the instruction
    ProcessingInstruction,
    /// Document root
    Document,
}

impl NodeKind {
    #[inline]
    pub fn is_element(self) -> bool {
        matches!(
            self,
            NodeKind::VoidElement | NodeKind::TextElement | NodeKind::Element
        )
    }

    /// Short lowercase label, used by the CLI statistics
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::VoidElement => "void-element",
            NodeKind::TextElement => "text-element",
            NodeKind::Element => "element",
            NodeKind::Doctype => "doctype",
            NodeKind::Data => "data",
            NodeKind::CData => "cdata",
            NodeKind::Comment => "comment",
            NodeKind::Declaration => "declaration",
            NodeKind::ProcessingInstruction => "pi",
            NodeKind::Document => "document",
        }
    }

    /// Classify an element by its lowercase name
    pub fn for_element(name: &[u8]) -> NodeKind {
        match name {
            b"area" | b"base" | b"br" | b"col" | b"command" | b"embed" | b"hr" | b"img"
            | b"input" | b"keygen" | b"link" | b"meta" | b"param" | b"source" | b"track"
            | b"wbr" => NodeKind::VoidElement,
            b"script" | b"style" => NodeKind::TextElement,
            _ => NodeKind::Element,
        }
    }
}

/// A `name="value"` pair. Boolean attributes have an empty value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: Text,
    pub value: Text,
}

/// A node in the arena
///
/// Nodes are deliberately not `Clone`: copying goes through
/// `Document::deep_clone`, which registers every copy in the arena.
#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) name: Text,
    pub(crate) value: Text,
    pub(crate) id: Text,
    pub(crate) classes: Vec<Text>,
    pub(crate) attributes: Vec<Attribute>,
    /// Non-owning back-reference; `None` for the root and detached nodes
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            name: Text::EMPTY,
            value: Text::EMPTY,
            id: Text::EMPTY,
            classes: Vec::new(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind.is_element()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    #[inline]
    pub fn name_text(&self) -> Text {
        self.name
    }

    #[inline]
    pub fn value_text(&self) -> Text {
        self.value
    }

    #[inline]
    pub fn id_text(&self) -> Text {
        self.id
    }

    #[inline]
    pub fn class_texts(&self) -> &[Text] {
        &self.classes
    }

    #[inline]
    pub fn attribute_texts(&self) -> &[Attribute] {
        &self.attributes
    }
}
