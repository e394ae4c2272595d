use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gbln::{from_str, to_string, to_string_pretty, Value};

const USER: &str = "user{id<u32>(123) name<s32>(Alice) email<s64>(alice@example.com) active<b>(t)}";

const NESTED: &str = "record{id<u32>(42) metadata{created<s32>(2023-01-01T00:00:00Z) \
                      updated<s32>(2023-12-31T23:59:59Z) version<u16>(3)} \
                      tags<s16>[important verified production]}";

fn products(size: u32) -> Value {
    let mut items = Value::array();
    for i in 0..size {
        let mut product = Value::object();
        product
            .insert("sku", Value::string(format!("SKU{}", i), 16).unwrap())
            .unwrap();
        product
            .insert("name", Value::string(format!("Product {}", i), 32).unwrap())
            .unwrap();
        product
            .insert("price", Value::from(9.99 + f64::from(i)))
            .unwrap();
        product.insert("quantity", Value::from(i)).unwrap();
        items.push(product).unwrap();
    }
    let mut doc = Value::object();
    doc.insert("products", items).unwrap();
    doc
}

fn benchmark_parse_simple(c: &mut Criterion) {
    c.bench_function("parse_simple_object", |b| {
        b.iter(|| from_str(black_box(USER)))
    });
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let doc = from_str(USER).unwrap();

    c.bench_function("serialize_simple_object", |b| {
        b.iter(|| to_string(black_box(&doc)))
    });
}

fn benchmark_parse_nested(c: &mut Criterion) {
    c.bench_function("parse_nested_object", |b| {
        b.iter(|| from_str(black_box(NESTED)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let doc = products(*size);

        group.bench_with_input(BenchmarkId::new("compact", size), &doc, |b, doc| {
            b.iter(|| to_string(black_box(doc)))
        });
        group.bench_with_input(BenchmarkId::new("pretty", size), &doc, |b, doc| {
            b.iter(|| to_string_pretty(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_parse_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&products(*size));

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_typed_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_array");

    let numbers: Vec<String> = (0..100).map(|i: i32| (i * 7919).to_string()).collect();
    let bools: Vec<&str> = (0..100).map(|i| if i % 2 == 0 { "t" } else { "f" }).collect();
    let floats: Vec<String> = (0..100).map(|i| (f64::from(i) * 1.5).to_string()).collect();

    let numbers = format!("xs<i32>[{}]", numbers.join(" "));
    let bools = format!("xs<b>[{}]", bools.join(" "));
    let floats = format!("xs<f64>[{}]", floats.join(" "));

    group.bench_function("parse_integers", |b| {
        b.iter(|| from_str(black_box(&numbers)))
    });

    group.bench_function("parse_booleans", |b| {
        b.iter(|| from_str(black_box(&bools)))
    });

    group.bench_function("parse_floats", |b| {
        b.iter(|| from_str(black_box(&floats)))
    });

    let numbers_doc = from_str(&numbers).unwrap();
    let floats_doc = from_str(&floats).unwrap();

    group.bench_function("serialize_integers", |b| {
        b.iter(|| to_string(black_box(&numbers_doc)))
    });

    group.bench_function("serialize_floats", |b| {
        b.iter(|| to_string(black_box(&floats_doc)))
    });

    group.finish();
}

fn benchmark_utf8_strings(c: &mut Criterion) {
    let text = "北京".repeat(64);
    let input = format!("city<s{}>({})", text.len(), text);

    c.bench_function("parse_utf8_string", |b| {
        b.iter(|| from_str(black_box(&input)))
    });
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let doc = from_str(NESTED).unwrap();
    let json_str = serde_json::to_string(&doc).unwrap();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("gbln_serialize", |b| b.iter(|| to_string(black_box(&doc))));

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&doc)))
    });

    group.bench_function("gbln_parse", |b| b.iter(|| from_str(black_box(NESTED))));

    group.bench_function("json_parse", |b| {
        b.iter(|| serde_json::from_str::<Value>(black_box(&json_str)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    c.bench_function("roundtrip_nested", |b| {
        b.iter(|| {
            let doc = from_str(black_box(NESTED)).unwrap();
            let _text = to_string(black_box(&doc));
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse_simple,
    benchmark_serialize_simple,
    benchmark_parse_nested,
    benchmark_serialize_array,
    benchmark_parse_array,
    benchmark_typed_arrays,
    benchmark_utf8_strings,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);
criterion_main!(benches);
