use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sky_units::{parse_unit, to_latex, LatexMode};

fn bench_latex(c: &mut Criterion) {
    let units: Vec<_> = ["km s-1 Mpc-1", "erg / (s cm2 AA)", "deg2", "Jy Hz**(-1/2)", "1e-26 W m-2 Hz-1"]
        .iter()
        .map(|text| parse_unit(text).expect("unit"))
        .collect();
    c.bench_function("latex_display", |b| {
        b.iter(|| {
            for unit in &units {
                let _ = to_latex(black_box(unit), LatexMode::Display).expect("latex");
            }
        });
    });
    c.bench_function("latex_inline", |b| {
        b.iter(|| {
            for unit in &units {
                let _ = to_latex(black_box(unit), LatexMode::Inline).expect("latex");
            }
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_unit", |b| {
        b.iter(|| parse_unit(black_box("erg / (s cm2 AA)")).expect("unit"));
    });
}

criterion_group!(benches, bench_latex, bench_parse);
criterion_main!(benches);
