extern crate criterion;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rulesheet_lib::host::memory::{HostQuirks, MemoryHost};
use rulesheet_lib::host::StyleHost;
use rulesheet_lib::sheet::find_rules;
use rulesheet_lib::style::selector::{swap_adjacent_compound_order, to_canonical_pseudo_form};
use rulesheet_lib::RuleSheet;

fn bench_find_rules(c: &mut Criterion) {
    let mut host = MemoryHost::with_quirks(HostQuirks {
        swap_compound_order: true,
        ..HostQuirks::default()
    });
    let sheet = host.create_owned_sheet("bench").unwrap();
    for i in 0..10_000 {
        host.insert_rule(sheet, i, &format!(".item-{}.state-{}", i, i % 7))
            .unwrap();
    }

    c.bench_function("find_rules_10k", |b| {
        b.iter(|| find_rules(&host, sheet, black_box(".state-3.item-9000")))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let selector = ".nav.open > li.item.active:first-letter, #main.wide .x.y.z:after";
    c.bench_function("swap_adjacent_compound_order", |b| {
        b.iter(|| swap_adjacent_compound_order(black_box(selector)))
    });
    c.bench_function("to_canonical_pseudo_form", |b| {
        b.iter(|| to_canonical_pseudo_form(black_box(selector)))
    });
}

fn bench_get_property(c: &mut Criterion) {
    let mut sheet = RuleSheet::new(MemoryHost::new());
    let mut longhands = Vec::new();
    for side in ["top", "right", "bottom", "left"] {
        longhands.push((format!("border-{}-width", side), "1px"));
        longhands.push((format!("border-{}-style", side), "solid"));
        longhands.push((format!("border-{}-color", side), "red"));
    }
    sheet.set(".frame", longhands).unwrap();

    c.bench_function("get_property_border", |b| {
        b.iter(|| sheet.get_property(black_box(".frame"), "border"))
    });
}

criterion_group!(benches, bench_find_rules, bench_normalize, bench_get_property);
criterion_main!(benches);
