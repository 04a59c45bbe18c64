use std::fmt::Write as _;
use std::time::Duration;

use cfgparse::{Document, Format};
use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};

fn make_ini(sections: usize, keys: usize) -> String {
    let mut out = String::new();
    for section in 0..sections {
        let _ = writeln!(out, "; section {section}\n[section_{section}]");
        for key in 0..keys {
            let _ = writeln!(out, "key_{key} = value-{section}.{key}");
        }
    }
    out
}

fn make_xml(depth: usize, width: usize) -> String {
    fn element(out: &mut String, depth: usize, width: usize, seed: usize) {
        let _ = write!(out, "<node id=\"{seed}\" kind='n'>");
        if depth == 0 {
            let _ = write!(out, "leaf{seed}");
        } else {
            for idx in 0..width {
                element(out, depth - 1, width, seed * width + idx);
            }
        }
        out.push_str("</node>\n");
    }
    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    element(&mut out, depth, width, 1);
    out
}

fn make_json(depth: usize, width: usize) -> String {
    fn object(out: &mut String, depth: usize, width: usize) {
        out.push('{');
        for idx in 0..width {
            if idx > 0 {
                out.push(',');
            }
            let _ = write!(out, "\"k{idx}\":");
            if depth == 0 {
                let _ = write!(out, "\"v{idx}\"");
            } else if idx % 2 == 0 {
                object(out, depth - 1, width);
            } else {
                out.push_str("[\"a\",\"b\",{\"x\":\"y\"}]");
            }
        }
        out.push('}');
    }
    let mut out = String::new();
    object(&mut out, depth, width);
    out
}

fn bench_parse(group: &mut BenchmarkGroup<'_, WallTime>, name: &str, input: &str, format: Format) {
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function(BenchmarkId::new("parse", name), |b| {
        b.iter(|| {
            let doc = cfgparse::parse(black_box(input), format).unwrap();
            black_box(doc);
        })
    });
}

fn bench_print(group: &mut BenchmarkGroup<'_, WallTime>, name: &str, doc: &Document) {
    let len = doc.print().unwrap().len();
    group.throughput(Throughput::Bytes(len as u64));
    group.bench_function(BenchmarkId::new("print", name), |b| {
        b.iter(|| black_box(doc.print().unwrap()))
    });
}

fn criterion_config() -> Criterion {
    if std::env::var("CFGPARSE_BENCH_MINIMAL").is_ok() {
        Criterion::default()
            .warm_up_time(Duration::from_secs(0))
            .measurement_time(Duration::from_millis(10))
            .sample_size(1)
            .nresamples(1)
    } else {
        Criterion::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let inputs = [
        ("ini", make_ini(200, 12), Format::Ini),
        ("xml", make_xml(5, 4), Format::Xml),
        ("json", make_json(4, 6), Format::Json),
    ];

    let mut group = c.benchmark_group("parse_print");
    for (name, input, format) in &inputs {
        bench_parse(&mut group, name, input, *format);
        let doc = cfgparse::parse(input, *format).unwrap();
        bench_print(&mut group, name, &doc);
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
