//! Render HTML as nested boxes on an ANSI terminal.
//!
//! This crate walks an HTML element tree and produces terminal rows which
//! approximate the page's structure: containers become boxes, lists are
//! indented with bullets, spans are bracketed, emphasis and headings are
//! styled, links are marked (with numbered footnotes when they are too
//! long to show inline), and tables are drawn as a simple ASCII grid.
//!
//! # Examples
//!
//! ```rust
//! # use itbrowz::from_read;
//! let html = b"<div id=\"d\"><p>Hello</p></div>";
//! assert_eq!(from_read(&html[..], "https://example.org/", 20).unwrap(),
//!            "\
//! /d-----------------\\
//! |Hello             |
//! \\~d----------------/
//!
//! ");
//! ```
//!
//! The `config` module allows the output to be styled with ANSI escapes,
//! the root element to be chosen, and images to be fetched and displayed.
//!
//! A demonstration program is included as the `itbrowz` example:
//!
//! ```sh
//! $ cargo run --example itbrowz -- -b https://example.org/ page.html
//! [...]
//! ```

#![deny(missing_docs)]

extern crate html5ever;
extern crate unicode_width;

#[macro_use]
mod macros;

#[cfg(unix)]
mod ansi_colours;
pub mod dom;
pub mod image;
pub mod links;
pub mod render;
pub mod script;

#[cfg(unix)]
pub use ansi_colours::AnsiDecorator;
pub use dom::{parse, Document, Element, Node};

use dom::Filter;
use image::{Fetch, ImageViewer, NoViewer};
use links::LinkRegistry;
use render::table::TableData;
use render::text_renderer::RenderContext;
use render::{Attr, Attrs, Colour, Decorator, Item, Line, Nested, PlainDecorator, Style};

use std::io;
use std::io::Write;

/// Errors from rendering HTML
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An element with no defined rendering was found.
    #[error("<{0}> not implemented yet")]
    UnsupportedElement(String),
    /// A table was missing its head or body.
    #[error("Malformed table: {0}")]
    MalformedTable(String),
    /// Fetching an image failed.
    #[error("Failed to fetch {url}")]
    Fetch {
        /// The URL which couldn't be fetched
        url: String,
        /// Why
        #[source]
        source: io::Error,
    },
    /// The elements were nested more deeply than the configured limit.
    #[error("Elements nested more than {0} deep")]
    TooDeep(usize),
    /// An I/O error
    #[error("I/O error")]
    IoError(#[from] io::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        use Error::*;
        match (self, other) {
            (UnsupportedElement(a), UnsupportedElement(b)) => a == b,
            (MalformedTable(a), MalformedTable(b)) => a == b,
            (Fetch { url: a, .. }, Fetch { url: b, .. }) => a == b,
            (TooDeep(a), TooDeep(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Error {}

/// A `Result` with this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

const DEFAULT_WIDTH: usize = 80;
const DEFAULT_MAX_DEPTH: usize = 256;

/// The width of the terminal: `$COLUMNS` if set, else the size reported by
/// the terminal, else 80.
pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&w| w > 0);
    if let Some(width) = from_env {
        return width;
    }
    reported_width()
}

#[cfg(unix)]
fn reported_width() -> usize {
    match termion::terminal_size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        Ok(_) => DEFAULT_WIDTH,
        Err(e) => {
            log::debug!("Can't get terminal size ({}), assuming {}", e, DEFAULT_WIDTH);
            DEFAULT_WIDTH
        }
    }
}

#[cfg(not(unix))]
fn reported_width() -> usize {
    DEFAULT_WIDTH
}

/// The element kinds with a rendering.  Anything else is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ElementKind {
    Container,
    Table,
    Image,
    List,
    Span,
    Sub,
    Sup,
    Emphasis,
    Strong,
    Rule,
    Code,
    Paragraph,
    Label,
    ListItem,
    Link,
    Quote,
    Heading,
    Ignored,
}

impl ElementKind {
    fn from_tag(tag: &str) -> Option<ElementKind> {
        use ElementKind::*;
        Some(match tag {
            "div" | "center" | "header" | "footer" | "main" => Container,
            "table" => Table,
            "img" => Image,
            "ol" | "ul" | "nav" => List,
            "span" => Span,
            "sub" => Sub,
            "sup" => Sup,
            "em" | "i" => Emphasis,
            "strong" | "b" => Strong,
            "hr" => Rule,
            "code" => Code,
            "p" | "button" | "noscript" => Paragraph,
            "label" => Label,
            "li" => ListItem,
            "a" => Link,
            "blockquote" => Quote,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Heading,
            "script" | "ins" | "br" | "wbr" | "style" | "input" | "form" => Ignored,
            _ => return None,
        })
    }
}

/// The title shown in a container's borders.
fn container_title(element: &Element) -> String {
    let title = element
        .get_attr("id")
        .or_else(|| element.get_attr("class"))
        .map(|v| v.as_text().into_owned())
        .unwrap_or_default();
    match element.tag() {
        tag @ ("header" | "footer" | "main") => format!("{} {}", tag, title),
        _ => title,
    }
}

fn leaf_lines(lines: Vec<Line>) -> Nested<Item> {
    lines.into_iter().map(Item::Line).collect::<Vec<_>>().into()
}

/// Which text children an element leaves out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Skip {
    Nothing,
    /// Text which is exactly one newline.
    Newline,
    /// Whitespace-only text.
    Blank,
}

impl Skip {
    fn skips(self, node: &Node) -> bool {
        match self {
            Skip::Nothing => false,
            Skip::Newline => matches!(node, Node::Text(t) if t == "\n"),
            Skip::Blank => node.is_blank_text(),
        }
    }
}

struct Dispatcher<'a> {
    links: &'a mut LinkRegistry,
    max_depth: usize,
}

impl<'a> Dispatcher<'a> {
    fn render(&mut self, node: &Node, ctx: &RenderContext) -> Result<Nested<Item>> {
        let element = match node {
            Node::Text(text) => return Ok(leaf_lines(ctx.render_text(text, self.links))),
            Node::Element(element) => element,
        };
        html_trace!("render: <{}> at depth {}", element.tag(), ctx.depth());
        let kind = ElementKind::from_tag(element.tag())
            .ok_or_else(|| Error::UnsupportedElement(element.tag().into()))?;
        if ctx.depth() >= self.max_depth {
            return Err(Error::TooDeep(self.max_depth));
        }
        let ctx = ctx.descend();

        use ElementKind::*;
        match kind {
            Container => self.container(element, &ctx),
            Table => Ok(leaf_lines(TableData::from_element(element)?.render())),
            Image => {
                let src = ctx.urls().resolve(element, "src");
                if src.is_empty() {
                    log::debug!("Skipping <img> with no src");
                    Ok(Nested::empty())
                } else {
                    Ok(Nested::Leaf(Item::Image(src)))
                }
            }
            List => self.children(element, &ctx.enter_list().with_colour(Colour::Magenta), Skip::Nothing),
            Span => self.children(element, &ctx.enter_span(), Skip::Blank),
            Sub => self.children(element, &ctx.with_subscript(), Skip::Nothing),
            Sup => self.children(element, &ctx.with_superscript(), Skip::Nothing),
            Emphasis => self.children(element, &ctx.with_attr(Attr::Bold), Skip::Nothing),
            Strong => self.children(element, &ctx.with_attr(Attr::Underline), Skip::Nothing),
            Rule => Ok(Nested::Leaf(Item::Line(ctx.rule()))),
            Code => self.children(element, &ctx.with_colour(Colour::Grey), Skip::Nothing),
            Paragraph => self.children(element, &ctx.with_attrs(Attrs::none()), Skip::Nothing),
            // Labels are underlined but keep the surrounding colour.
            Label => self.children(
                element,
                &ctx.with_attrs(Attrs::none().with(Attr::Underline)),
                Skip::Nothing,
            ),
            ListItem => self.children(
                element,
                &ctx.with_attrs(Attrs::none()).with_colour(Colour::Magenta),
                Skip::Nothing,
            ),
            Link => {
                let href = ctx.urls().resolve(element, "href");
                self.children(element, &ctx.with_link(&href), Skip::Nothing)
            }
            Quote => self.children(
                element,
                &ctx.with_attrs(Attrs::none()).with_colour(Colour::Cyan),
                Skip::Nothing,
            ),
            Heading => self.children(
                element,
                &ctx.with_attr(Attr::Reverse).with_colour(Colour::Red),
                Skip::Nothing,
            ),
            Ignored => Ok(Nested::empty()),
        }
    }

    fn children(
        &mut self,
        element: &Element,
        ctx: &RenderContext,
        skip: Skip,
    ) -> Result<Nested<Item>> {
        element
            .children()
            .iter()
            .filter(|child| !skip.skips(child))
            .map(|child| self.render(child, ctx))
            .collect::<Result<Vec<_>>>()
            .map(Nested::Seq)
    }

    fn container(&mut self, element: &Element, ctx: &RenderContext) -> Result<Nested<Item>> {
        let title = container_title(element);
        let contents = self.children(element, &ctx.enter_container(), Skip::Newline)?;
        Ok(Nested::Seq(vec![
            Nested::Leaf(Item::Line(ctx.container_top(&title))),
            contents,
            Nested::Leaf(Item::Line(ctx.container_bottom(&title))),
        ]))
    }
}

/// The output of one rendering pass, before it is written anywhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    blocks: Vec<Vec<Item>>,
    links: LinkRegistry,
}

impl Rendered {
    /// The flattened output of each top-level node.
    pub fn blocks(&self) -> &[Vec<Item>] {
        &self.blocks
    }

    /// The footnoted links.
    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    /// All the rendered text lines, in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flatten().filter_map(|item| match item {
            Item::Line(line) => Some(line),
            Item::Image(_) => None,
        })
    }

    /// One `"<index>: <target>"` line per footnoted link.
    pub fn footnotes(&self) -> Vec<Line> {
        self.links
            .iter()
            .map(|(index, target)| {
                let mut line = Line::new();
                line.push(format!("{}: ", index), Style::colour(Colour::Red));
                line.push(target, Style::colour(Colour::Blue).with(Attr::Underline));
                line
            })
            .collect()
    }
}

/// Render a list of sibling nodes from a page at `base_url`.
fn render_pass(
    nodes: &[Node],
    base_url: &str,
    width: usize,
    max_depth: usize,
) -> Result<Rendered> {
    let ctx = RenderContext::new(base_url, width);
    let mut links = LinkRegistry::new();
    let mut blocks = Vec::new();
    {
        let mut dispatcher = Dispatcher {
            links: &mut links,
            max_depth,
        };
        for node in nodes {
            blocks.push(dispatcher.render(node, &ctx)?.flatten());
        }
    }
    Ok(Rendered { blocks, links })
}

fn write_line<D: Decorator + ?Sized, W: Write>(line: &Line, decorator: &D, out: &mut W) -> Result<()> {
    let mut s = String::new();
    line.decorate(decorator, &mut s);
    s.push('\n');
    out.write_all(s.as_bytes())?;
    Ok(())
}

pub mod config {
    //! Configure a rendering pass using the `Config` type, which can be
    //! constructed using one of the functions in this module.

    use super::*;
    use std::io::Read;

    /// Configure the HTML rendering.
    pub struct Config<D: Decorator> {
        decorator: D,
        width: Option<usize>,
        max_depth: usize,
        root: Option<String>,
        fetcher: Option<Box<dyn Fetch>>,
        viewer: Box<dyn ImageViewer>,
    }

    impl<D: Decorator> Config<D> {
        fn new(decorator: D) -> Config<D> {
            Config {
                decorator,
                width: None,
                max_depth: DEFAULT_MAX_DEPTH,
                root: None,
                fetcher: None,
                viewer: Box::new(NoViewer),
            }
        }

        /// Render for a terminal `width` columns wide instead of asking the
        /// terminal.
        pub fn width(mut self, width: usize) -> Self {
            self.width = Some(width);
            self
        }

        /// Fail passes with elements nested more than `depth` deep.
        pub fn max_depth(mut self, depth: usize) -> Self {
            self.max_depth = depth;
            self
        }

        /// Render only the `div` child of `<body>` with this class (or,
        /// failing that, this id).
        pub fn root(mut self, selector: &str) -> Self {
            self.root = Some(selector.into());
            self
        }

        /// Use `fetcher` to retrieve images.  Without one, images are skipped.
        pub fn image_fetcher(mut self, fetcher: impl Fetch + 'static) -> Self {
            self.fetcher = Some(Box::new(fetcher));
            self
        }

        /// Use `viewer` to display fetched images.
        pub fn image_viewer(mut self, viewer: impl ImageViewer + 'static) -> Self {
            self.viewer = Box::new(viewer);
            self
        }

        /// The nodes of `doc` which will be rendered.
        pub fn root_nodes<'d>(&self, doc: &'d Document) -> &'d [Node] {
            let Some(body) = doc.body() else {
                return &[];
            };
            match self.root {
                None => body.children(),
                Some(ref sel) => {
                    match body
                        .find_child("div", Filter::Class(sel))
                        .or_else(|| body.find_child("div", Filter::Id(sel)))
                    {
                        Some(root) => root.children(),
                        None => {
                            log::warn!("No <div> with class or id {:?}", sel);
                            &[]
                        }
                    }
                }
            }
        }

        /// Render `nodes` from a page at `base_url` without writing anything.
        pub fn render_nodes(&self, nodes: &[Node], base_url: &str) -> Result<Rendered> {
            let width = self.width.unwrap_or_else(terminal_width);
            render_pass(nodes, base_url, width, self.max_depth)
        }

        /// Render `nodes` and write them to `out`, followed by the link
        /// footnotes.  Nothing is written if rendering fails.
        pub fn render_to<W: Write>(mut self, nodes: &[Node], base_url: &str, mut out: W) -> Result<()> {
            let rendered = self.render_nodes(nodes, base_url)?;
            for block in rendered.blocks() {
                for item in block {
                    match item {
                        Item::Line(line) => write_line(line, &self.decorator, &mut out)?,
                        Item::Image(url) => match self.fetcher {
                            Some(ref mut fetcher) => {
                                out.flush()?;
                                image::show_image(url, fetcher.as_mut(), self.viewer.as_mut())?;
                            }
                            None => log::debug!("No image fetcher; skipping {}", url),
                        },
                    }
                }
                out.write_all(b"\n")?;
            }
            for line in rendered.footnotes() {
                write_line(&line, &self.decorator, &mut out)?;
            }
            out.flush()?;
            Ok(())
        }

        /// Parse HTML from `input` and render it to `out`.
        pub fn render_from_read<R: Read, W: Write>(self, input: R, base_url: &str, out: W) -> Result<()> {
            let doc = parse(input)?;
            let nodes = self.root_nodes(&doc);
            self.render_to(nodes, base_url, out)
        }

        /// Parse HTML from `input` and return the rendered text.
        pub fn string_from_read<R: Read>(self, input: R, base_url: &str) -> Result<String> {
            let mut out = Vec::new();
            self.render_from_read(input, base_url, &mut out)?;
            String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
        }
    }

    /// Return a Config which writes plain text.
    pub fn plain() -> Config<PlainDecorator> {
        Config::new(PlainDecorator::new())
    }

    /// Return a Config which writes ANSI coloured text.
    #[cfg(unix)]
    pub fn ansi() -> Config<AnsiDecorator> {
        Config::new(AnsiDecorator::new())
    }

    /// Return a Config initialized with a custom decorator.
    pub fn with_decorator<D: Decorator>(decorator: D) -> Config<D> {
        Config::new(decorator)
    }
}

/// Reads HTML from `input` and returns the rendered text of its body,
/// without colours, for a terminal `width` columns wide.
pub fn from_read<R>(input: R, base_url: &str, width: usize) -> Result<String>
where
    R: io::Read,
{
    config::plain().width(width).string_from_read(input, base_url)
}

/// Reads HTML from `input` and returns the rendered text of its body, with
/// ANSI colours, for a terminal `width` columns wide.
#[cfg(unix)]
pub fn from_read_coloured<R>(input: R, base_url: &str, width: usize) -> Result<String>
where
    R: io::Read,
{
    config::ansi().width(width).string_from_read(input, base_url)
}
