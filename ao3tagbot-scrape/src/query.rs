//! A small CSS-like selector engine over an html5ever DOM.
//!
//! Supports tag names, `#id`, `.class`, `[attr]`, `[attr=value]` (plus the
//! `^=`, `$=` and `*=` forms), and the descendant and `>` child combinators.
//! That is all the archive's markup needs.

use std::{cell::Ref, sync::Arc};

use html5ever::{
    driver::ParseOpts, parse_document, tendril::TendrilSink, tree_builder::TreeBuilderOpts,
};
use markup5ever::Attribute;
use markup5ever_arcdom::{ArcDom, Handle, NodeData};

pub struct Document {
    dom: ArcDom,
}

impl Document {
    /// html5ever recovers from any malformed input, so parsing can't fail.
    pub fn parse(html: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let dom = parse_document(ArcDom::default(), opts).one(html);

        Self { dom }
    }

    pub fn select(&self, selector: &str) -> Vec<Element> {
        Selector::from(selector).find(vec![Arc::clone(&self.dom.document)])
    }

    pub fn select_first(&self, selector: &str) -> Option<Element> {
        self.select(selector).into_iter().next()
    }

    pub fn exists(&self, selector: &str) -> bool {
        !self.select(selector).is_empty()
    }
}

#[derive(Debug, PartialEq, Clone)]
enum AttributeSpec {
    Present,
    Exact(String),
    Starts(String),
    Ends(String),
    Contains(String),
}

impl AttributeSpec {
    fn matches(&self, value: &str) -> bool {
        match self {
            AttributeSpec::Present => true,
            AttributeSpec::Exact(v) => value == v,
            AttributeSpec::Starts(v) => value.starts_with(v.as_str()),
            AttributeSpec::Ends(v) => value.ends_with(v.as_str()),
            AttributeSpec::Contains(v) => value.contains(v.as_str()),
        }
    }
}

/// One compound selector, e.g. `dd.rating.tags` or `a[rel=author]`.
#[derive(Debug, Default, PartialEq, Clone)]
struct Matcher {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<(String, AttributeSpec)>,
    /// Only match direct children of the previous step (`a > b`).
    child: bool,
}

impl Matcher {
    fn parse(input: &str, child: bool) -> Self {
        let mut matcher = Matcher {
            child,
            ..Default::default()
        };

        let mut segments = Vec::new();
        let mut buf = String::new();
        let mut in_brackets = false;

        for c in input.chars() {
            match c {
                '[' => {
                    segments.push(std::mem::take(&mut buf));
                    in_brackets = true;
                }
                ']' if in_brackets => {
                    buf.push(c);
                    segments.push(std::mem::take(&mut buf));
                    in_brackets = false;
                    continue;
                }
                '#' | '.' if !in_brackets => segments.push(std::mem::take(&mut buf)),
                _ => {}
            }

            buf.push(c);
        }
        segments.push(buf);

        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            if let Some(id) = segment.strip_prefix('#') {
                matcher.ids.push(id.to_string());
            } else if let Some(class) = segment.strip_prefix('.') {
                matcher.classes.push(class.to_string());
            } else if let Some(spec) = segment.strip_prefix('[') {
                matcher.add_attribute(spec.trim_end_matches(']'));
            } else if segment != "*" {
                matcher.tag = Some(segment.to_lowercase());
            }
        }

        matcher
    }

    fn add_attribute(&mut self, spec: &str) {
        let (key, spec) = match spec.split_once('=') {
            None => (spec, AttributeSpec::Present),
            Some((key, value)) => {
                let value = value.trim_matches(|c: char| c == '"' || c == '\'').to_string();

                match key.chars().last() {
                    Some('^') => (&key[..key.len() - 1], AttributeSpec::Starts(value)),
                    Some('$') => (&key[..key.len() - 1], AttributeSpec::Ends(value)),
                    Some('*') => (&key[..key.len() - 1], AttributeSpec::Contains(value)),
                    _ => (key, AttributeSpec::Exact(value)),
                }
            }
        };

        self.attributes.push((key.to_string(), spec));
    }

    fn matches(&self, handle: &Handle) -> bool {
        let (name, attrs) = match &handle.data {
            NodeData::Element { name, attrs, .. } => (name, attrs.borrow()),
            _ => return false,
        };

        if let Some(tag) = &self.tag {
            if &*name.local != tag.as_str() {
                return false;
            }
        }

        let ids = get_attr(&attrs, "id").unwrap_or_default();
        if !self.ids.iter().all(|id| ids.split_whitespace().any(|el| el == id)) {
            return false;
        }

        let classes = get_attr(&attrs, "class").unwrap_or_default();
        if !self
            .classes
            .iter()
            .all(|class| classes.split_whitespace().any(|el| el == class))
        {
            return false;
        }

        self.attributes.iter().all(|(key, spec)| {
            get_attr(&attrs, key)
                .map(|value| spec.matches(&value))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, PartialEq)]
struct Selector {
    matchers: Vec<Matcher>,
}

impl From<&str> for Selector {
    fn from(input: &str) -> Self {
        let mut matchers = Vec::new();
        let mut child = false;

        for part in input.replace('>', " > ").split_whitespace() {
            if part == ">" {
                child = true;
                continue;
            }

            matchers.push(Matcher::parse(part, child));
            child = false;
        }

        Selector { matchers }
    }
}

impl Selector {
    fn find(&self, roots: Vec<Handle>) -> Vec<Element> {
        let mut current = roots;

        for matcher in &self.matchers {
            let mut found = Vec::new();

            for node in &current {
                if matcher.child {
                    for child in node.children.borrow().iter() {
                        if matcher.matches(child) {
                            found.push(Arc::clone(child));
                        }
                    }
                } else {
                    collect_descendants(matcher, node, &mut found);
                }
            }

            // Nested matches of a descendant step would otherwise be visited
            // once per matching ancestor.
            let mut seen = Vec::with_capacity(found.len());
            found.retain(|handle| {
                if seen.iter().any(|s| Arc::ptr_eq(s, handle)) {
                    false
                } else {
                    seen.push(Arc::clone(handle));
                    true
                }
            });

            current = found;
        }

        current.into_iter().map(Element::from).collect()
    }
}

/// Document order, parents before their children.
fn collect_descendants(matcher: &Matcher, node: &Handle, found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if matcher.matches(child) {
            found.push(Arc::clone(child));
        }

        collect_descendants(matcher, child, found);
    }
}

fn get_attr(attrs: &Ref<'_, Vec<Attribute>>, name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

#[derive(Debug, Clone)]
pub struct Element {
    handle: Handle,
}

impl From<Handle> for Element {
    fn from(handle: Handle) -> Self {
        Element { handle }
    }
}

impl From<&Handle> for Element {
    fn from(handle: &Handle) -> Self {
        Element {
            handle: Arc::clone(handle),
        }
    }
}

impl Element {
    pub fn name(&self) -> Option<String> {
        match &self.handle.data {
            NodeData::Element { name, .. } => Some(name.local.to_string()),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.handle.data {
            NodeData::Element { attrs, .. } => get_attr(&attrs.borrow(), name),
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// All text below this element, concatenated as-is.
    pub fn text(&self) -> String {
        fn walk(handle: &Handle, buf: &mut String) {
            for child in handle.children.borrow().iter() {
                match &child.data {
                    NodeData::Text { contents } => buf.push_str(&contents.borrow()),
                    NodeData::Element { .. } => walk(child, buf),
                    _ => {}
                }
            }
        }

        let mut buf = String::new();
        walk(&self.handle, &mut buf);
        buf
    }

    /// [`Element::text`] with runs of whitespace collapsed to one space and
    /// the ends trimmed.
    pub fn clean_text(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Child elements, skipping text and comments.
    pub fn children(&self) -> Vec<Element> {
        self.handle
            .children
            .borrow()
            .iter()
            .filter(|n| matches!(n.data, NodeData::Element { .. }))
            .map(Element::from)
            .collect()
    }

    pub fn select(&self, selector: &str) -> Vec<Element> {
        Selector::from(selector).find(vec![Arc::clone(&self.handle)])
    }

    pub fn select_first(&self, selector: &str) -> Option<Element> {
        self.select(selector).into_iter().next()
    }
}
