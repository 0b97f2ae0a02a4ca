use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use yomi::algo::agari::agari_structures;
use yomi::algo::fu::FuContext;
use yomi::algo::shanten::{ShantenOptions, calc_normal, shanten};
use yomi::algo::ukeire::ukeire;
use yomi::algo::yaku::best_agari;
use yomi::hand::{Hand, hand};
use yomi::t;

fn shanten_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("shanten");
    for (name, s) in [
        ("tenpai", "123m 456m 789p 11s 23s"),
        ("scattered", "1357m 2468p 1357s 1z"),
        ("chinitsu", "1112345678999m"),
    ] {
        let tehai = hand(s).unwrap();
        group.bench_function(format!("normal/{name}"), |b| {
            b.iter(|| calc_normal(black_box(&tehai), 0));
        });
        let h: Hand = s.parse().unwrap();
        group.bench_function(format!("aggregate/{name}"), |b| {
            b.iter(|| shanten(black_box(&h), ShantenOptions::default()));
        });
    }
    group.finish();
}

fn ukeire_bench(c: &mut Criterion) {
    let h: Hand = "2233m 445p 6789s 55z".parse().unwrap();
    c.bench_function("ukeire", |b| b.iter(|| ukeire(black_box(&h))));
}

fn agari_bench(c: &mut Criterion) {
    let h: Hand = "111222333m 44455p".parse().unwrap();
    c.bench_function("agari_structures", |b| {
        b.iter(|| agari_structures(black_box(&h)));
    });
}

fn yaku_bench(c: &mut Criterion) {
    let h: Hand = "111222333m 44455p".parse().unwrap();
    let ctx = FuContext {
        winning_tile: t!(5p),
        is_tsumo: false,
        bakaze: t!(E),
        jikaze: t!(S),
    };
    c.bench_function("best_agari", |b| {
        b.iter(|| best_agari(black_box(&h), &ctx, 0, 0));
    });
}

criterion_group!(benches, shanten_bench, ukeire_bench, agari_bench, yaku_bench);
criterion_main!(benches);
