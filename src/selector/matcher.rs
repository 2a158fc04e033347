//! Selector matching
//!
//! Complex selectors are matched right to left: the last compound must
//! match the candidate, then each combinator walks to the parent, the
//! ancestors or the preceding siblings to find a match for the compound
//! before it.

use std::borrow::Cow;

use memchr::memmem;

use super::parser::{AttrOp, AttributeSelector, Combinator, ComplexSelector, Compound, RelativeSelector, SelectorList, Simple};
use crate::core::chars::is_whitespace;
use crate::dom::document::{Document, ROOT};
use crate::dom::node::NodeId;

impl SelectorList {
    /// Does `id` match any selector in the list?
    pub fn matches(&self, doc: &Document<'_>, id: NodeId) -> bool {
        is_element(doc, id) && self.0.iter().any(|sel| matches_complex(doc, sel, id))
    }

    /// Every matching element in document order
    pub fn select(&self, doc: &Document<'_>) -> Vec<NodeId> {
        doc.descendants(ROOT).filter(|&id| self.matches(doc, id)).collect()
    }
}

#[inline]
fn is_element(doc: &Document<'_>, id: NodeId) -> bool {
    doc.kind(id).map_or(false, |k| k.is_element())
}

fn matches_complex(doc: &Document<'_>, sel: &ComplexSelector, id: NodeId) -> bool {
    matches_at(doc, sel, sel.tail.len(), id)
}

/// Match compound `idx` (0 = head) at `id`, then everything to its left
fn matches_at(doc: &Document<'_>, sel: &ComplexSelector, idx: usize, id: NodeId) -> bool {
    let compound = if idx == 0 { &sel.head } else { &sel.tail[idx - 1].1 };
    if !matches_compound(doc, compound, id) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    match sel.tail[idx - 1].0 {
        Combinator::Descendant => {
            let mut current = element_parent(doc, id);
            while let Some(ancestor) = current {
                if matches_at(doc, sel, idx - 1, ancestor) {
                    return true;
                }
                current = element_parent(doc, ancestor);
            }
            false
        }
        Combinator::Child => element_parent(doc, id).map_or(false, |p| matches_at(doc, sel, idx - 1, p)),
        Combinator::Adjacent => preceding_elements(doc, id)
            .next()
            .map_or(false, |s| matches_at(doc, sel, idx - 1, s)),
        Combinator::Sibling => preceding_elements(doc, id).any(|s| matches_at(doc, sel, idx - 1, s)),
        Combinator::Column => false,
    }
}

fn matches_compound(doc: &Document<'_>, compound: &Compound, id: NodeId) -> bool {
    is_element(doc, id) && compound.0.iter().all(|simple| matches_simple(doc, simple, id))
}

fn matches_simple(doc: &Document<'_>, simple: &Simple, id: NodeId) -> bool {
    match simple {
        Simple::Type(name) => doc.name(id).eq_ignore_ascii_case(name.as_bytes()),
        Simple::Universal => true,
        Simple::Class(class) => doc.contains_class(id, class),
        Simple::Id(value) => doc.id(id) == value.as_bytes(),
        Simple::Attribute(attr) => matches_attribute(doc, attr, id),
        Simple::PseudoClass(name) => matches_pseudo_class(doc, name, id),
        Simple::Is(list) | Simple::Where(list) => list.matches(doc, id),
        Simple::Not(list) => !list.matches(doc, id),
        Simple::Has(relative) => relative.iter().any(|rel| matches_relative(doc, rel, id)),
        Simple::PseudoElement(_) => false,
    }
}

fn matches_pseudo_class(doc: &Document<'_>, name: &str, id: NodeId) -> bool {
    match name {
        "root" => doc.parent(id) == Some(ROOT),
        "first-child" => doc.parent(id).is_some() && preceding_elements(doc, id).next().is_none(),
        "last-child" => doc.parent(id).is_some() && following_elements(doc, id).next().is_none(),
        "empty" => doc.children(id).is_empty() && doc.value(id).is_empty(),
        _ => false,
    }
}

fn matches_relative(doc: &Document<'_>, rel: &RelativeSelector, id: NodeId) -> bool {
    match rel.combinator {
        Combinator::Descendant => doc.descendants(id).any(|d| matches_complex(doc, &rel.selector, d)),
        Combinator::Child => doc
            .children(id)
            .iter()
            .any(|&c| matches_complex(doc, &rel.selector, c)),
        Combinator::Adjacent => following_elements(doc, id)
            .next()
            .map_or(false, |s| matches_complex(doc, &rel.selector, s)),
        Combinator::Sibling => following_elements(doc, id).any(|s| matches_complex(doc, &rel.selector, s)),
        Combinator::Column => false,
    }
}

fn matches_attribute(doc: &Document<'_>, attr: &AttributeSelector, id: NodeId) -> bool {
    let Some(actual) = attribute_value(doc, &attr.name, id) else {
        return false;
    };
    let (actual, expected): (Cow<'_, [u8]>, Cow<'_, [u8]>) = if attr.case_insensitive {
        (
            Cow::Owned(actual.to_ascii_lowercase()),
            Cow::Owned(attr.value.to_ascii_lowercase().into_bytes()),
        )
    } else {
        (actual, Cow::Borrowed(attr.value.as_bytes()))
    };
    let (actual, expected) = (&actual[..], &expected[..]);

    match attr.op {
        AttrOp::Has => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => {
            !expected.is_empty() && actual.split(|&b| is_whitespace(b)).any(|word| word == expected)
        }
        AttrOp::DashMatch => {
            actual == expected
                || (actual.starts_with(expected) && actual.get(expected.len()) == Some(&b'-'))
        }
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Substring => !expected.is_empty() && memmem::find(actual, expected).is_some(),
    }
}

/// Attribute value, with `class` rebuilt from the class tokens
fn attribute_value<'d>(doc: &'d Document<'_>, name: &str, id: NodeId) -> Option<Cow<'d, [u8]>> {
    if name == "class" {
        let classes: Vec<&[u8]> = doc.classes(id).collect();
        if classes.is_empty() {
            return None;
        }
        return Some(Cow::Owned(classes.join(&b' ')));
    }
    doc.attribute(id, name).map(Cow::Borrowed)
}

fn element_parent(doc: &Document<'_>, id: NodeId) -> Option<NodeId> {
    doc.parent(id).filter(|&p| is_element(doc, p))
}

/// Element siblings before `id`, nearest first
fn preceding_elements<'d>(doc: &'d Document<'_>, id: NodeId) -> impl Iterator<Item = NodeId> + 'd {
    let siblings = siblings(doc, id);
    let index = siblings.iter().position(|&s| s == id).unwrap_or(0);
    siblings[..index]
        .iter()
        .rev()
        .copied()
        .filter(move |&s| is_element(doc, s))
}

/// Element siblings after `id`, nearest first
fn following_elements<'d>(doc: &'d Document<'_>, id: NodeId) -> impl Iterator<Item = NodeId> + 'd {
    let siblings = siblings(doc, id);
    let index = siblings.iter().position(|&s| s == id).map_or(siblings.len(), |i| i + 1);
    siblings[index..].iter().copied().filter(move |&s| is_element(doc, s))
}

fn siblings<'d>(doc: &'d Document<'_>, id: NodeId) -> &'d [NodeId] {
    match doc.parent(id) {
        Some(parent) => doc.children(parent),
        None => &[],
    }
}
