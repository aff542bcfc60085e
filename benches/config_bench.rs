use std::fs;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use openerp_config::{Config, ConfigSource, Options, Store};

fn sample_text(entries: usize) -> String {
    let mut text = String::from("# generated\n\n");
    for i in 0..entries {
        text.push_str(&format!("bench.key.{:04}: value {} # note\n", i, i));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = sample_text(1000);

    c.bench_function("store_parse_1000", |b| {
        b.iter(|| {
            let store = Store::parse(black_box(text.as_bytes()), Options::default()).unwrap();
            assert_eq!(store.document().len(), 1002);
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let text = sample_text(1000);
    let store = Store::parse(text.as_bytes(), Options::default()).unwrap();

    c.bench_function("store_render_1000", |b| {
        b.iter(|| {
            let bytes = black_box(&store).to_bytes();
            assert_eq!(bytes.len(), text.len());
        });
    });
}

fn bench_set_existing(c: &mut Criterion) {
    let mut store = Store::parse(sample_text(1000).as_bytes(), Options::default()).unwrap();

    c.bench_function("store_set_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("bench.key.{:04}", i % 1000);
            store.set(black_box(&key), black_box("updated")).unwrap();
            i += 1;
        });
    });
}

fn bench_get(c: &mut Criterion) {
    let store = Store::parse(sample_text(1000).as_bytes(), Options::default()).unwrap();

    c.bench_function("store_get", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("bench.key.{:04}", i % 1000);
            let _ = store.last(black_box(&key));
            i += 1;
        });
    });
}

fn bench_override_get(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let primary = tmp.path().join("bench.cfg");
    let overlay = tmp.path().join("override.cfg");
    fs::write(&primary, sample_text(1000)).unwrap();
    fs::write(&overlay, sample_text(100)).unwrap();

    let mut config = Config::open(&primary).unwrap();
    config.set_override_path(Some(overlay)).unwrap();

    c.bench_function("config_get_with_override", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("bench.key.{:04}", i % 1000);
            let _ = config.get(black_box(&key)).unwrap();
            i += 1;
        });
    });
}

fn bench_save(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bench.cfg");
    fs::write(&path, sample_text(1000)).unwrap();
    let config = Config::open(&path).unwrap();

    c.bench_function("config_save_1000", |b| {
        b.iter(|| {
            config.save().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_render,
    bench_set_existing,
    bench_get,
    bench_override_get,
    bench_save,
);
criterion_main!(benches);
