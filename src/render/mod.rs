//! The output produced by rendering, and how it is turned into text.
//!
//! The dispatcher builds a tree of [`Nested`] output; [`Nested::flatten`]
//! turns it into a flat list of [`Item`]s in final top-to-bottom order.
//! The text of each [`Fragment`] is written out through a [`Decorator`],
//! which decides how (or whether) styles appear in the output.

pub mod table;
pub mod text_renderer;

/// The colours used when rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Colour {
    /// Code.
    Grey,
    /// Headings and footnote numbers.
    Red,
    /// Ordinary text.
    #[default]
    Green,
    /// Tables.
    Yellow,
    /// Link markers and footnote targets.
    Blue,
    /// Lists.
    Magenta,
    /// Quotes, span markers and horizontal rules.
    Cyan,
    /// Container borders.
    White,
}

/// A text attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attr {
    /// Bold text.
    Bold,
    /// Underlined text.
    Underline,
    /// Reverse video.
    Reverse,
}

/// A set of text attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Attrs {
    /// Bold
    pub bold: bool,
    /// Underline
    pub underline: bool,
    /// Reverse video
    pub reverse: bool,
}

impl Attrs {
    /// The empty set.
    pub fn none() -> Attrs {
        Default::default()
    }

    /// A copy of this set with `attr` added.
    pub fn with(mut self, attr: Attr) -> Attrs {
        match attr {
            Attr::Bold => self.bold = true,
            Attr::Underline => self.underline = true,
            Attr::Reverse => self.reverse = true,
        }
        self
    }

    /// True if `attr` is in the set.
    pub fn contains(&self, attr: Attr) -> bool {
        match attr {
            Attr::Bold => self.bold,
            Attr::Underline => self.underline,
            Attr::Reverse => self.reverse,
        }
    }

    /// True if no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == Attrs::none()
    }
}

/// How a fragment should be shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground colour, or `None` for the terminal default.
    pub colour: Option<Colour>,
    /// Text attributes.
    pub attrs: Attrs,
}

impl Style {
    /// A style with a colour and no attributes.
    pub fn colour(colour: Colour) -> Style {
        Style {
            colour: Some(colour),
            attrs: Attrs::none(),
        }
    }

    /// A copy with `attr` added.
    pub fn with(self, attr: Attr) -> Style {
        Style {
            attrs: self.attrs.with(attr),
            ..self
        }
    }
}

/// A run of text with one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    /// The text.
    pub text: String,
    /// Its style.
    pub style: Style,
}

impl Fragment {
    /// A styled fragment.
    pub fn new(text: impl Into<String>, style: Style) -> Fragment {
        Fragment {
            text: text.into(),
            style,
        }
    }
}

/// One terminal row, made of fragments.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Line {
    fragments: Vec<Fragment>,
}

impl Line {
    /// Create an empty line.
    pub fn new() -> Line {
        Default::default()
    }

    /// Add a fragment.  Empty text is dropped.
    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if !text.is_empty() {
            self.fragments.push(Fragment::new(text, style));
        }
    }

    /// The fragments on this line.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The text of the line, without styles.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Width in terminal cells.
    pub fn width(&self) -> usize {
        use unicode_width::UnicodeWidthStr;
        self.fragments
            .iter()
            .map(|f| UnicodeWidthStr::width(f.text.as_str()))
            .sum()
    }

    /// Write the line through `decorator`, without a line terminator.
    pub fn decorate<D: Decorator + ?Sized>(&self, decorator: &D, out: &mut String) {
        for f in &self.fragments {
            out.push_str(&decorator.decorate(&f.text, &f.style));
        }
    }
}

/// One entry of the flattened output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// A rendered row of text.
    Line(Line),
    /// An image to display, by absolute URL.
    Image(String),
}

/// Output as built by the dispatcher: leaves and (possibly deeply) nested
/// sequences of further output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nested<T> {
    /// A single output item.
    Leaf(T),
    /// A sequence of nested output.
    Seq(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    /// No output.
    pub fn empty() -> Nested<T> {
        Nested::Seq(Vec::new())
    }

    /// Linearise into leaves, in depth-first pre-order.
    pub fn flatten(self) -> Vec<T> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(n) = stack.pop() {
            match n {
                Nested::Leaf(t) => result.push(t),
                Nested::Seq(v) => stack.extend(v.into_iter().rev()),
            }
        }
        result
    }
}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(v: Vec<T>) -> Nested<T> {
        Nested::Seq(v.into_iter().map(Nested::Leaf).collect())
    }
}

/// Flatten possibly absent output; `None` gives nothing.
pub fn flatten<T>(output: Option<Nested<T>>) -> Vec<T> {
    output.map(Nested::flatten).unwrap_or_default()
}

/// Turns styled text into output text.
pub trait Decorator {
    /// Return `text` decorated with `style`.
    fn decorate(&self, text: &str, style: &Style) -> String;
}

impl<F> Decorator for F
where
    F: Fn(&str, &Style) -> String,
{
    fn decorate(&self, text: &str, style: &Style) -> String {
        self(text, style)
    }
}

/// A decorator which drops all styling.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainDecorator;

impl PlainDecorator {
    /// Create a new `PlainDecorator`.
    pub fn new() -> PlainDecorator {
        PlainDecorator
    }
}

impl Decorator for PlainDecorator {
    fn decorate(&self, text: &str, _style: &Style) -> String {
        text.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(i: u32) -> Nested<u32> {
        Nested::Leaf(i)
    }

    fn seq(v: Vec<Nested<u32>>) -> Nested<u32> {
        Nested::Seq(v)
    }

    #[test]
    fn flatten_keeps_order() {
        let tree = seq(vec![
            seq(vec![
                leaf(0),
                leaf(1),
                seq(vec![leaf(2), leaf(3), seq(vec![leaf(4), leaf(5)])]),
                seq(vec![leaf(6), leaf(7)]),
                leaf(8),
            ]),
            leaf(9),
        ]);
        assert_eq!(tree.flatten(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn flatten_nothing() {
        assert_eq!(flatten::<u32>(None), Vec::<u32>::new());
        assert_eq!(flatten(Some(seq(vec![seq(vec![]), seq(vec![])]))), Vec::<u32>::new());
    }

    #[test]
    fn line_drops_empty_fragments() {
        let mut line = Line::new();
        line.push("", Style::colour(Colour::White));
        line.push("ab", Style::default());
        line.push("c", Style::colour(Colour::Red).with(Attr::Bold));
        assert_eq!(line.fragments().len(), 2);
        assert_eq!(line.text(), "abc");
        assert_eq!(line.width(), 3);
    }

    #[test]
    fn closure_decorator() {
        let mut line = Line::new();
        line.push("x", Style::colour(Colour::Red));
        let mut out = String::new();
        line.decorate(&|t: &str, s: &Style| format!("<{:?}>{}", s.colour.unwrap(), t), &mut out);
        assert_eq!(out, "<Red>x");
    }
}
