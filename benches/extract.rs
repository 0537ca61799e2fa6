// benches/extract.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dawg_scrape::core::html::Selector;
use dawg_scrape::extract::extract_all;

fn synthetic_lines(n: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(n * 2);
    for i in 0..n {
        lines.push(format!("word{i}"));
        if i % 50 == 0 {
            lines.push(format!("missing type {i}"));
        } else {
            lines.push(format!("(noun) \u{201C}word{i}\u{201D} means something \u{2014} roughly {i}."));
        }
    }
    lines
}

fn synthetic_page(n: usize) -> String {
    let mut page = String::from("<html><body><div class=\"container\">");
    for i in 0..n {
        page.push_str(&format!(
            "<div class=\"row\"><div class=\"col-md-3\"><b>word{i}</b></div>\
             <div class=\"col-md-9\"><i>(noun)</i> &ldquo;word{i}&rdquo; means &amp; stuff</div></div>\n"
        ));
    }
    page.push_str("</div></body></html>");
    page
}

fn bench_extract(c: &mut Criterion) {
    let lines = synthetic_lines(5_000);
    c.bench_function("extract_5k", |b| {
        b.iter(|| {
            let (records, stats) = extract_all(black_box(&lines));
            black_box((records.len(), stats.skipped))
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let page = synthetic_page(2_000);
    let selector = Selector::parse("div.row>div").unwrap();
    c.bench_function("select_2k_rows", |b| {
        b.iter(|| black_box(selector.select_text(black_box(&page)).len()))
    });
}

criterion_group!(benches, bench_extract, bench_select);
criterion_main!(benches);
