//! A simple ASCII grid for `<table>`s.
//!
//! Tables are not laid out recursively: the text of each header and body
//! cell is extracted, and the grid is sized so every column fits its widest
//! cell.  Tables don't take part in the nested box borders.

use unicode_width::UnicodeWidthStr;

use super::{Colour, Line, Style};
use crate::dom::Element;
use crate::{Error, Result};

const TABLE: Colour = Colour::Yellow;

/// The cell text of a table: one header row and the body rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableData {
    /// Header cells.
    pub header: Vec<String>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Extract the cells of a `<table>`: `thead > tr > th` for the header
    /// and `tbody > tr > td` for the body.
    pub fn from_element(table: &Element) -> Result<TableData> {
        let head = table
            .find("thead")
            .ok_or_else(|| Error::MalformedTable("no <thead>".into()))?;
        let head_row = head
            .find("tr")
            .ok_or_else(|| Error::MalformedTable("no <tr> in <thead>".into()))?;
        let body = table
            .find("tbody")
            .ok_or_else(|| Error::MalformedTable("no <tbody>".into()))?;
        let header = cell_texts(head_row, "th");
        let rows = body
            .find_all("tr")
            .into_iter()
            .map(|row| cell_texts(row, "td"))
            .collect();
        Ok(TableData { header, rows })
    }

    fn num_columns(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// The width of each column: the widest of its header and body cells.
    /// A table with no body rows is sized by its header alone.
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.num_columns())
            .map(|col| {
                std::iter::once(&self.header)
                    .chain(self.rows.iter())
                    .filter_map(|row| row.get(col))
                    .map(|cell| UnicodeWidthStr::width(cell.as_str()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Lay out the table as divider and data lines.
    pub fn render(&self) -> Vec<Line> {
        let widths = self.column_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(divider(&widths));
        lines.push(data_line(&widths, &self.header));
        lines.push(divider(&widths));
        for row in &self.rows {
            lines.push(data_line(&widths, row));
        }
        lines.push(divider(&widths));
        lines
    }
}

fn cell_texts(row: &Element, tag: &str) -> Vec<String> {
    row.find_all(tag)
        .into_iter()
        .map(|cell| cell.text().trim().to_string())
        .collect()
}

fn divider(widths: &[usize]) -> Line {
    let mut s = String::from("+");
    for &w in widths {
        s.push_str(&"-".repeat(w));
        s.push('+');
    }
    let mut line = Line::new();
    line.push(s, Style::colour(TABLE));
    line
}

fn data_line(widths: &[usize], cells: &[String]) -> Line {
    let mut s = String::from("|");
    for (col, &w) in widths.iter().enumerate() {
        let cell = cells.get(col).map(String::as_str).unwrap_or("");
        s.push_str(cell);
        s.push_str(&" ".repeat(w.saturating_sub(UnicodeWidthStr::width(cell))));
        s.push('|');
    }
    let mut line = Line::new();
    line.push(s, Style::colour(TABLE));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn widths_from_content() {
        let t = TableData {
            header: strings(&["A", "BB"]),
            rows: vec![strings(&["x", "yyy"])],
        };
        assert_eq!(t.column_widths(), vec![1, 3]);
        assert_eq!(
            texts(&t.render()),
            vec!["+-+---+", "|A|BB |", "+-+---+", "|x|yyy|", "+-+---+"]
        );
    }

    #[test]
    fn empty_body_uses_header() {
        let t = TableData {
            header: strings(&["Name", "Id"]),
            rows: vec![],
        };
        assert_eq!(t.column_widths(), vec![4, 2]);
        assert_eq!(
            texts(&t.render()),
            vec!["+----+--+", "|Name|Id|", "+----+--+", "+----+--+"]
        );
    }

    #[test]
    fn ragged_rows_are_padded() {
        let t = TableData {
            header: strings(&["a"]),
            rows: vec![strings(&["bb", "c"]), strings(&[])],
        };
        assert_eq!(t.column_widths(), vec![2, 1]);
        assert_eq!(texts(&t.render())[3], "|bb|c|");
        assert_eq!(texts(&t.render())[4], "|  | |");
    }

    #[test]
    fn extract_cells() {
        let table = Element::new("table")
            .child(
                Element::new("thead").child(
                    Element::new("tr")
                        .child(Element::new("th").child(" Level "))
                        .child(Element::new("th").child("Slots")),
                ),
            )
            .child(
                Element::new("tbody")
                    .child(
                        Element::new("tr")
                            .child(Element::new("td").child("1st"))
                            .child(Element::new("td").child(Element::new("b").child("2"))),
                    )
                    .child(Element::new("tr")),
            );
        let data = TableData::from_element(&table).unwrap();
        assert_eq!(data.header, strings(&["Level", "Slots"]));
        assert_eq!(data.rows, vec![strings(&["1st", "2"]), vec![]]);
    }

    #[test]
    fn missing_sections() {
        let table = Element::new("table").child(Element::new("tbody"));
        assert_eq!(
            TableData::from_element(&table),
            Err(Error::MalformedTable("no <thead>".into()))
        );
        let table = Element::new("table").child(Element::new("thead").child(Element::new("tr")));
        assert_eq!(
            TableData::from_element(&table),
            Err(Error::MalformedTable("no <tbody>".into()))
        );
    }
}
