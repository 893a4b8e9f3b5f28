//! Benchmarks for pdftext extraction performance.
//!
//! Run with: cargo bench
//!
//! Synthetic documents are built in memory with lopdf.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, Stream};

use pdftext::{extract_bytes, ExtractionConfig};

/// Multi-page synthetic PDF with a few lines of text per page.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = LopdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in 0..page_count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for line in 0..20 {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!(
                    "Page {} line {} of benchmark test content.",
                    page + 1,
                    line
                ))],
            ));
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn bench_extract(c: &mut Criterion) {
    let small = create_test_pdf(5);
    let large = create_test_pdf(50);

    c.bench_function("extract_5_pages", |b| {
        b.iter(|| extract_bytes(black_box(&small), &ExtractionConfig::new()).unwrap())
    });

    c.bench_function("extract_50_pages", |b| {
        b.iter(|| extract_bytes(black_box(&large), &ExtractionConfig::new()).unwrap())
    });

    c.bench_function("extract_50_pages_sorted", |b| {
        let config = ExtractionConfig::new().with_sort_by_position(true);
        b.iter(|| extract_bytes(black_box(&large), &config).unwrap())
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
