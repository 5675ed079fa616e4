//! Link footnotes and link resolution.

use crate::dom::Element;

/// The links which were too long to show inline during one rendering pass.
///
/// Indices are 1-based; each distinct target is stored once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkRegistry {
    links: Vec<String>,
}

impl LinkRegistry {
    /// Create an empty registry.
    pub fn new() -> LinkRegistry {
        Default::default()
    }

    /// Return the index of `target`, adding it if it hasn't been seen yet.
    pub fn intern(&mut self, target: &str) -> usize {
        if let Some(pos) = self.links.iter().position(|l| l == target) {
            return pos + 1;
        }
        self.links.push(target.into());
        self.links.len()
    }

    /// The target registered under `index`.
    pub fn resolve(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.links.get(i))
            .map(String::as_str)
    }

    /// All `(index, target)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, l)| (i + 1, l.as_str()))
    }

    /// Number of links registered.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True if no links have been registered.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// The URLs a page was fetched from, used to make `href`/`src` absolute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageUrls {
    base: String,
    root: String,
}

impl PageUrls {
    /// `base` is the directory-ish URL of the page; the root URL (scheme
    /// and host) is derived from it.  A base without a scheme is assumed to
    /// be `https`.
    pub fn new(base: &str) -> PageUrls {
        let (scheme, rest) = base.split_once("://").unwrap_or(("https", base));
        let host = rest.split('/').next().unwrap_or("");
        PageUrls {
            base: base.into(),
            root: format!("{}://{}", scheme, host),
        }
    }

    /// Scheme and host of the base URL.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Make the `attr` attribute of `element` absolute.  A missing
    /// attribute gives an empty string.
    pub fn resolve(&self, element: &Element, attr: &str) -> String {
        match element.get_attr(attr) {
            Some(value) => self.resolve_str(&value.as_text()),
            None => String::new(),
        }
    }

    /// Make `link` absolute.
    pub fn resolve_str(&self, link: &str) -> String {
        if link.starts_with("http") {
            link.into()
        } else if link.starts_with("//") {
            format!("https:{}", link)
        } else if link.starts_with('/') {
            format!("{}{}", self.root, link)
        } else {
            format!("{}{}", self.base, link)
        }
    }
}
