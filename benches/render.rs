#![feature(test)]
extern crate itbrowz;
extern crate test;

use ::test::Bencher;

use itbrowz::from_read;

const BASE: &str = "https://example.org/";

fn make_html(content: &str) -> String {
    String::from("<html><body>") + content + "</body></html>"
}

fn make_tab(cell: &str, rows: usize, cols: usize) -> String {
    let mut result = String::from("<table><thead><tr>");
    for _ in 0..cols {
        result.push_str("<th>head</th>");
    }
    result.push_str("</tr></thead><tbody>");
    for _ in 0..rows {
        result.push_str("<tr>");
        for _ in 0..cols {
            result.push_str("<td>");
            result.push_str(cell);
            result.push_str("</td>");
        }
        result.push_str("</tr>");
    }
    result.push_str("</tbody></table>");
    result
}

fn make_boxes(depth: usize, content: &str) -> String {
    let mut result = String::new();
    for i in 0..depth {
        result.push_str(&format!("<div id=\"d{}\">", i));
    }
    result.push_str(content);
    for _ in 0..depth {
        result.push_str("</div>");
    }
    result
}

fn make_list(items: usize) -> String {
    let mut result = String::from("<ul>");
    for i in 0..items {
        result.push_str(&format!(
            "<li>item {} <a href=\"/a/rather/long/path/{}\">link</a></li>",
            i, i
        ));
    }
    result.push_str("</ul>");
    result
}

#[bench]
fn bench_empty(b: &mut Bencher) {
    b.iter(|| from_read(make_html("").as_bytes(), BASE, 80));
}

#[bench]
fn bench_tab_2_2(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 2, 2)).as_bytes(), BASE, 80));
}
#[bench]
fn bench_tab_10_10(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 10, 10)).as_bytes(), BASE, 80));
}
#[bench]
fn bench_tab_100_5(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 100, 5)).as_bytes(), BASE, 80));
}

#[bench]
fn bench_boxes_10(b: &mut Bencher) {
    let text = "lorem ipsum ".repeat(50);
    b.iter(|| from_read(make_html(&make_boxes(10, &text)).as_bytes(), BASE, 80));
}
#[bench]
fn bench_boxes_100(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_boxes(100, "x")).as_bytes(), BASE, 300));
}

#[bench]
fn bench_list_links(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_list(200)).as_bytes(), BASE, 60));
}
