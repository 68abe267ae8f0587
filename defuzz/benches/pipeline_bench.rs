use criterion::{criterion_group, criterion_main, Criterion};
use defuzz::accelerator::GREEK;
use defuzz::pipeline::propagate;
use defuzz::{Catalog, CatalogEntry, Engine, EquivalencePolicy, Translation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

pub fn removed_accelerator(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("removed_accelerator", |b| {
        b.iter(|| {
            propagate(
                black_box("&Save file..."),
                black_box("Save file"),
                black_box("&Αποθήκευση αρχείου..."),
                &GREEK,
                &mut rng,
            );
        })
    });
}

pub fn added_accelerator(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("added_accelerator", |b| {
        b.iter(|| {
            propagate(
                black_box("Print the current document"),
                black_box("&Print the current document"),
                black_box("Εκτύπωση του τρέχοντος εγγράφου"),
                &GREEK,
                &mut rng,
            );
        })
    });
}

pub fn classify(c: &mut Criterion) {
    let mut engine = Engine::new(EquivalencePolicy::default(), StdRng::seed_from_u64(1));
    let mut entry = CatalogEntry::new("open file:", Translation::Singular("Άνοιγμα Αρχείου".into()));
    entry.previous_msgid = Some("Open File".into());
    entry.needs_review = true;
    c.bench_function("classify", |b| {
        b.iter(|| {
            engine.classify(black_box(&entry));
        })
    });
}

pub fn parse_catalog(c: &mut Criterion) {
    let mut data = String::from("msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n");
    for i in 0..200 {
        data.push_str(&format!(
            "\n#, fuzzy\n#| msgid \"Item {i}...\"\nmsgid \"Item {i}\"\nmsgstr \"Στοιχείο {i}...\"\n"
        ));
    }
    c.bench_function("parse_catalog", |b| {
        b.iter(|| Catalog::from_vec_u8(black_box(data.as_bytes().to_vec())))
    });
}

criterion_group!(
    benches,
    removed_accelerator,
    added_accelerator,
    classify,
    parse_catalog
);
criterion_main!(benches);
