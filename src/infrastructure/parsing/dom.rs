//! Small DOM helpers shared by the catalog and detail parsers.

use scraper::{ElementRef, Html, Node, Selector};

use super::{ParsingError, ParsingResult};

/// Compile one configured selector, naming the config field on failure.
pub fn compile_selector(field: &str, css: &str) -> ParsingResult<Selector> {
    Selector::parse(css).map_err(|e| ParsingError::invalid_selector(field, css, e.to_string()))
}

/// Text of every descendant text node, each piece trimmed, concatenated.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Trimmed text pieces joined by single spaces
pub fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `stripped_text` of the first match inside `scope`, if any
pub fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(stripped_text)
}

/// Like [`select_text`] but against the whole document
pub fn document_text(html: &Html, selector: &Selector) -> Option<String> {
    html.select(selector).next().map(stripped_text)
}

pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

/// The element's sole string, descending through single-child wrappers.
///
/// Whitespace-only text and comments do not count as children. Returns
/// `None` when the element has mixed or multiple children.
pub fn sole_string(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children().filter(|child| match child.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(_) => true,
        _ => false,
    });

    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }

    match only.value() {
        Node::Text(text) => Some(text.trim().to_string()),
        Node::Element(_) => ElementRef::wrap(only).and_then(sole_string),
        _ => None,
    }
}

/// First `tag` element whose sole string contains `needle` (case-sensitive)
pub fn find_by_string<'a>(html: &'a Html, tag: &Selector, needle: &str) -> Option<ElementRef<'a>> {
    html.select(tag)
        .find(|element| sole_string(*element).is_some_and(|s| s.contains(needle)))
}

/// First element named `tag` that starts after `start` in document order.
/// Descendants of `start` count as following it.
pub fn find_next<'a>(html: &'a Html, start: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    html.tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != start.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == tag)
}

/// Parent element of `element`, if it has one
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}
