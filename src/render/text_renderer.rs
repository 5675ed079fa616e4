//! The render context and the layout of leaf text.
//!
//! A [`RenderContext`] is a small value which is copied, with one or two
//! changes, on every descent into an element that changes style or
//! nesting.  It knows how much of the terminal width is left after the
//! borders and list markers of the enclosing elements, and lays out text
//! runs into rows which exactly fill the terminal.

use std::rc::Rc;

use unicode_width::UnicodeWidthChar;

use super::{Attr, Attrs, Colour, Line, Style};
use crate::links::{LinkRegistry, PageUrls};
use crate::script::{to_subscript, to_superscript};

const BORDER: Colour = Colour::White;
const LIST_MARKER: Colour = Colour::Magenta;
const SPAN_MARKER: Colour = Colour::Cyan;
const LINK_MARKER: Colour = Colour::Blue;
const RULE: Colour = Colour::Cyan;

/// Width of a character as used for wrapping.  Tabs count as one cell, as
/// they are turned into a single space.
fn char_width(c: char) -> usize {
    if c == '\t' {
        1
    } else {
        UnicodeWidthChar::width(c).unwrap_or(0)
    }
}

fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Split `s` into chunks of at most `width` cells.  This does not look for
/// word boundaries.  A character wider than `width` gets a chunk of its own.
fn hard_wrap(s: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut result = Vec::new();
    let mut start = 0;
    let mut cur_width = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if cur_width + w > width && idx > start {
            result.push(&s[start..idx]);
            start = idx;
            cur_width = 0;
        }
        cur_width += w;
    }
    if start < s.len() {
        result.push(&s[start..]);
    }
    result
}

/// The state threaded through one rendering pass.
#[derive(Clone, Debug)]
pub struct RenderContext {
    urls: Rc<PageUrls>,
    colour: Colour,
    attrs: Attrs,
    container_depth: usize,
    list_depth: usize,
    span_depth: usize,
    link: Option<Rc<str>>,
    superscript: bool,
    subscript: bool,
    terminal_width: usize,
    depth: usize,
}

impl RenderContext {
    /// Create the context for a pass rendering a page fetched from
    /// `base_url` onto a terminal `terminal_width` columns wide.
    pub fn new(base_url: &str, terminal_width: usize) -> RenderContext {
        RenderContext {
            urls: Rc::new(PageUrls::new(base_url)),
            colour: Colour::Green,
            attrs: Attrs::none(),
            container_depth: 0,
            list_depth: 0,
            span_depth: 0,
            link: None,
            superscript: false,
            subscript: false,
            terminal_width,
            depth: 0,
        }
    }

    /// The page URLs for link resolution.
    pub fn urls(&self) -> &PageUrls {
        &self.urls
    }

    /// Current text colour.
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Current text attributes.
    pub fn attrs(&self) -> Attrs {
        self.attrs
    }

    /// Number of enclosing containers.
    pub fn container_depth(&self) -> usize {
        self.container_depth
    }

    /// Number of enclosing lists.
    pub fn list_depth(&self) -> usize {
        self.list_depth
    }

    /// Number of enclosing spans.
    pub fn span_depth(&self) -> usize {
        self.span_depth
    }

    /// The target of the enclosing link, if any.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Number of elements between the pass's top level and here.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Columns used up by borders and list markers.
    pub fn consumed_width(&self) -> usize {
        let consumed = self.container_depth * 2;
        if self.list_depth > 0 {
            consumed + self.list_depth * 4 + 3
        } else {
            consumed
        }
    }

    /// Columns left for content.
    pub fn available_width(&self) -> usize {
        self.terminal_width.saturating_sub(self.consumed_width())
    }

    /// A copy for a child element one level deeper.
    pub fn descend(&self) -> RenderContext {
        RenderContext {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    /// A copy with a different colour.
    pub fn with_colour(&self, colour: Colour) -> RenderContext {
        RenderContext {
            colour,
            ..self.clone()
        }
    }

    /// A copy with `attr` added to the attributes.
    pub fn with_attr(&self, attr: Attr) -> RenderContext {
        RenderContext {
            attrs: self.attrs.with(attr),
            ..self.clone()
        }
    }

    /// A copy with the attributes replaced.
    pub fn with_attrs(&self, attrs: Attrs) -> RenderContext {
        RenderContext {
            attrs,
            ..self.clone()
        }
    }

    /// A copy inside one more container.
    pub fn enter_container(&self) -> RenderContext {
        RenderContext {
            container_depth: self.container_depth + 1,
            ..self.clone()
        }
    }

    /// A copy inside one more list.
    pub fn enter_list(&self) -> RenderContext {
        RenderContext {
            list_depth: self.list_depth + 1,
            ..self.clone()
        }
    }

    /// A copy inside one more span.
    pub fn enter_span(&self) -> RenderContext {
        RenderContext {
            span_depth: self.span_depth + 1,
            ..self.clone()
        }
    }

    /// A copy whose text links to `target`.  An empty target means no link.
    pub fn with_link(&self, target: &str) -> RenderContext {
        RenderContext {
            link: if target.is_empty() {
                None
            } else {
                Some(target.into())
            },
            ..self.clone()
        }
    }

    /// A copy rendering text as superscript.
    pub fn with_superscript(&self) -> RenderContext {
        RenderContext {
            superscript: true,
            ..self.clone()
        }
    }

    /// A copy rendering text as subscript.
    pub fn with_subscript(&self) -> RenderContext {
        RenderContext {
            subscript: true,
            ..self.clone()
        }
    }

    fn style(&self) -> Style {
        Style {
            colour: Some(self.colour),
            attrs: self.attrs,
        }
    }

    /// Lay out a text run into rows.
    ///
    /// The text is split on newlines, and each piece hard wrapped at the
    /// available width.  Each row gets the border/list/span prefix, the
    /// styled text (plus link marker), and padding and closing markers so
    /// that it fills the terminal.  Text which doesn't fit loses closing
    /// borders rather than wrapping.
    pub fn render_text(&self, text: &str, links: &mut LinkRegistry) -> Vec<Line> {
        let width = self.available_width();
        let mut lines = Vec::new();
        for segment in text.split('\n') {
            for chunk in hard_wrap(segment, width) {
                let chunk: String = chunk.split('\t').collect::<Vec<_>>().join(" ");
                lines.push(self.text_line(&chunk, links));
            }
        }
        lines
    }

    fn prefix(&self, line: &mut Line) {
        line.push("|".repeat(self.container_depth), Style::colour(BORDER));
        if self.list_depth > 0 {
            line.push(
                format!("{}-- ", "    ".repeat(self.list_depth)),
                Style::colour(LIST_MARKER),
            );
        }
        line.push("{".repeat(self.span_depth), Style::colour(SPAN_MARKER));
    }

    fn translate(&self, s: &str) -> String {
        if self.superscript {
            s.chars().map(to_superscript).collect()
        } else if self.subscript {
            s.chars().map(to_subscript).collect()
        } else {
            s.into()
        }
    }

    /// Add the link marker for the current link, returning its width.
    fn link_marker(&self, text_width: usize, line: &mut Line, links: &mut LinkRegistry) -> usize {
        let Some(target) = self.link.as_deref() else {
            return 0;
        };
        let inline = format!("[{}]", target);
        let inline_width = str_width(&inline);
        if text_width + inline_width > self.available_width() {
            let marker = format!("[{}]", links.intern(target));
            let width = str_width(&marker);
            line.push(marker, Style::colour(LINK_MARKER).with(Attr::Reverse));
            width
        } else {
            line.push(inline, Style::colour(LINK_MARKER).with(Attr::Underline));
            inline_width
        }
    }

    fn text_line(&self, chunk: &str, links: &mut LinkRegistry) -> Line {
        let mut line = Line::new();
        self.prefix(&mut line);

        let text = self.translate(chunk);
        let text_width = str_width(&text);
        line.push(text, self.style());
        let marker_width = self.link_marker(text_width, &mut line, links);

        let padding = self.available_width() as isize
            - text_width as isize
            - (self.span_depth * 2) as isize
            - marker_width as isize;
        line.push(
            " ".repeat(padding.max(0) as usize),
            Style::colour(self.colour),
        );
        line.push("}".repeat(self.span_depth), Style::colour(SPAN_MARKER));
        let bars = (self.container_depth as isize + padding.min(0)).max(0) as usize;
        line.push("|".repeat(bars), Style::colour(BORDER));
        line
    }

    /// A horizontal rule across the available width.
    pub fn rule(&self) -> Line {
        let bars = "|".repeat(self.container_depth);
        let mut line = Line::new();
        line.push(
            format!(
                "{}{}{}{}",
                bars,
                "    ".repeat(self.list_depth),
                "-".repeat(self.available_width()),
                bars
            ),
            Style::colour(RULE),
        );
        line
    }

    fn border_fill(&self, title: &str, extra: usize) -> String {
        let used = 2 * (self.container_depth + 1) + str_width(title) + extra;
        "-".repeat(self.terminal_width.saturating_sub(used))
    }

    /// The top border of a container opened in this context.
    pub fn container_top(&self, title: &str) -> Line {
        let bars = "|".repeat(self.container_depth);
        let style = Style::colour(BORDER);
        let mut line = Line::new();
        line.push(bars.clone(), style);
        line.push("/", style);
        line.push(format!("{}{}", title, self.border_fill(title, 0)), style);
        line.push("\\", style);
        line.push(bars, style);
        line
    }

    /// The bottom border of a container opened in this context.
    pub fn container_bottom(&self, title: &str) -> Line {
        let bars = "|".repeat(self.container_depth);
        let style = Style::colour(BORDER);
        let mut line = Line::new();
        line.push(bars.clone(), style);
        line.push("\\", style);
        line.push(format!("~{}{}", title, self.border_fill(title, 1)), style);
        line.push("/", style);
        line.push(bars, style);
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn available_width() {
        let ctx = RenderContext::new("https://a.org/", 80);
        assert_eq!(ctx.available_width(), 80);
        let ctx = ctx.enter_container().enter_container();
        assert_eq!(ctx.available_width(), 76);
        let ctx = ctx.enter_list().enter_list();
        assert_eq!(ctx.available_width(), 76 - 11);
        assert_eq!(RenderContext::new("", 4).enter_container().enter_container().enter_container().available_width(), 0);
    }

    #[test]
    fn derived_contexts_leave_parent_alone() {
        let ctx = RenderContext::new("https://a.org/", 80);
        let child = ctx.with_colour(Colour::Red).with_attr(Attr::Bold).enter_span();
        assert_eq!(ctx.colour(), Colour::Green);
        assert!(ctx.attrs().is_empty());
        assert_eq!(ctx.span_depth(), 0);
        assert_eq!(child.colour(), Colour::Red);
        assert!(child.attrs().contains(Attr::Bold));
        assert_eq!(child.span_depth(), 1);

        let inner = ctx.enter_container().enter_list().with_link("/x");
        assert_eq!((inner.container_depth(), inner.list_depth()), (1, 1));
        assert_eq!(inner.link(), Some("/x"));
        assert_eq!(ctx.link(), None);
        assert_eq!(inner.with_link("").link(), None);
    }

    #[test]
    fn short_text_is_one_line() {
        let ctx = RenderContext::new("", 10);
        let mut links = LinkRegistry::new();
        for s in ["a", "hello", "0123456789"] {
            assert_eq!(ctx.render_text(s, &mut links).len(), 1);
        }
    }

    #[test]
    fn long_text_wraps_mid_word() {
        let ctx = RenderContext::new("", 10);
        let mut links = LinkRegistry::new();
        let lines = ctx.render_text("abcdefghijklmno", &mut links);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].fragments()[0].text, "abcdefghij");
        assert_eq!(lines[1].fragments()[0].text, "klmno");
        assert_eq!(texts(&lines), vec!["abcdefghij", "klmno     "]);
    }

    #[test]
    fn newlines_and_tabs() {
        let ctx = RenderContext::new("", 6);
        let mut links = LinkRegistry::new();
        let lines = ctx.render_text("a\tb\n\nc", &mut links);
        assert_eq!(texts(&lines), vec!["a b   ", "c     "]);
        assert!(ctx.render_text("\n", &mut links).is_empty());
    }

    #[test]
    fn nested_prefix_and_suffix() {
        let ctx = RenderContext::new("", 20).enter_container().enter_span();
        let mut links = LinkRegistry::new();
        let lines = ctx.render_text("hi", &mut links);
        assert_eq!(texts(&lines), vec![format!("|{{hi{}}}|", " ".repeat(14))]);
        assert_eq!(lines[0].width(), 20);

        let ctx = RenderContext::new("", 20).enter_list();
        assert_eq!(
            texts(&ctx.render_text("x", &mut links)),
            vec![format!("    -- x{}", " ".repeat(12))]
        );
    }

    #[test]
    fn rows_fill_the_terminal() {
        let ctx = RenderContext::new("", 30).enter_container().enter_container();
        let mut links = LinkRegistry::new();
        for line in ctx.render_text(&"x".repeat(60), &mut links) {
            assert_eq!(line.width(), 30);
        }
    }

    #[test]
    fn inline_link() {
        let ctx = RenderContext::new("", 20).with_link("/a");
        let mut links = LinkRegistry::new();
        let lines = ctx.render_text("go", &mut links);
        assert_eq!(texts(&lines), vec![format!("go[/a]{}", " ".repeat(14))]);
        let marker = &lines[0].fragments()[1];
        assert_eq!(marker.style, Style::colour(Colour::Blue).with(Attr::Underline));
        assert!(links.is_empty());
    }

    #[test]
    fn long_link_becomes_footnote() {
        let target = "https://example.org/a/very/long/path";
        let ctx = RenderContext::new("", 20).enter_container().with_link(target);
        let mut links = LinkRegistry::new();
        let lines = ctx.render_text("go", &mut links);
        assert_eq!(texts(&lines), vec![format!("|go[1]{}|", " ".repeat(13))]);
        assert_eq!(lines[0].fragments()[2].style, Style::colour(Colour::Blue).with(Attr::Reverse));
        // A second run with the same target reuses the footnote.
        ctx.render_text("again", &mut links);
        assert_eq!(links.len(), 1);
        assert_eq!(links.resolve(1), Some(target));
    }

    #[test]
    fn overflow_eats_borders() {
        // The marker doesn't fit after a full-width chunk, so the closing
        // borders give way.
        let ctx = RenderContext::new("", 10).enter_container().enter_container().with_link("x");
        let mut links = LinkRegistry::new();
        let lines = ctx.render_text("abcdef", &mut links);
        assert_eq!(texts(&lines), vec!["||abcdef[1]"]);

        let ctx = RenderContext::new("", 10).enter_container().enter_span().enter_span();
        let lines = ctx.render_text("abcdefgh", &mut links);
        assert_eq!(texts(&lines), vec!["|{{abcdefgh}}"]);
    }

    #[test]
    fn scripts() {
        let ctx = RenderContext::new("", 10);
        let mut links = LinkRegistry::new();
        let sup = ctx.with_superscript().render_text("x2", &mut links);
        assert_eq!(sup[0].fragments()[0].text, "ˣ²");
        let sub = ctx.with_subscript().render_text("H2O", &mut links);
        assert_eq!(sub[0].fragments()[0].text, "H₂O");
    }

    #[test]
    fn rule_spans_available_width() {
        let ctx = RenderContext::new("", 10).enter_container();
        let line = ctx.rule();
        assert_eq!(line.text(), "|--------|");
        assert_eq!(line.fragments().len(), 1);
    }

    #[test]
    fn container_borders() {
        let ctx = RenderContext::new("", 20);
        assert_eq!(ctx.container_top("d").text(), format!("/d{}\\", "-".repeat(17)));
        assert_eq!(ctx.container_bottom("d").text(), format!("\\~d{}/", "-".repeat(16)));
        let inner = ctx.enter_container();
        assert_eq!(inner.container_top("").text(), format!("|/{}\\|", "-".repeat(16)));
        assert_eq!(inner.container_top("").width(), 20);
        assert_eq!(inner.container_bottom("").width(), 20);
    }
}
