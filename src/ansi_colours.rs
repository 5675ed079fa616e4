//! Convenience helper for producing coloured terminal output.
//!
//! This decorator applies terminal colours and effects (bold, underline
//! and reverse video) using escape sequences written by `termion`.

use termion::color::{self, Fg};
use termion::style;

use crate::render::{Colour, Decorator, Style};

/// A decorator which emits ANSI escape sequences.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiDecorator;

impl AnsiDecorator {
    /// Create a new `AnsiDecorator`.
    pub fn new() -> AnsiDecorator {
        AnsiDecorator
    }
}

fn foreground(colour: Colour) -> String {
    match colour {
        Colour::Grey => format!("{}", Fg(color::LightBlack)),
        Colour::Red => format!("{}", Fg(color::Red)),
        Colour::Green => format!("{}", Fg(color::Green)),
        Colour::Yellow => format!("{}", Fg(color::Yellow)),
        Colour::Blue => format!("{}", Fg(color::Blue)),
        Colour::Magenta => format!("{}", Fg(color::Magenta)),
        Colour::Cyan => format!("{}", Fg(color::Cyan)),
        Colour::White => format!("{}", Fg(color::White)),
    }
}

impl Decorator for AnsiDecorator {
    fn decorate(&self, text: &str, st: &Style) -> String {
        if st.colour.is_none() && st.attrs.is_empty() {
            return text.into();
        }
        let mut result = String::new();
        if let Some(colour) = st.colour {
            result.push_str(&foreground(colour));
        }
        if st.attrs.bold {
            result.push_str(&format!("{}", style::Bold));
        }
        if st.attrs.underline {
            result.push_str(&format!("{}", style::Underline));
        }
        if st.attrs.reverse {
            result.push_str(&format!("{}", style::Invert));
        }
        result.push_str(text);
        result.push_str(&format!("{}", style::Reset));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Attr;

    #[test]
    fn unstyled_text_is_left_alone() {
        assert_eq!(AnsiDecorator.decorate("plain", &Style::default()), "plain");
    }

    #[test]
    fn styled_text_is_reset() {
        let st = Style::colour(Colour::Red).with(Attr::Underline);
        let out = AnsiDecorator.decorate("x", &st);
        assert!(out.starts_with(&format!("{}{}", Fg(color::Red), style::Underline)));
        assert!(out.ends_with(&format!("x{}", style::Reset)));
    }
}
