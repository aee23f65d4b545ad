use criterion::{Criterion, criterion_group, criterion_main};
use geocoin_core::*;
use std::hint::black_box;

fn bench_nearby_caches(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("nearby_caches/fresh", |b| {
        b.iter(|| {
            let mut session = Session::new(config.clone(), LuckGenerator::from_config(&config));
            black_box(session.nearby_caches())
        })
    });

    c.bench_function("nearby_caches/walking", |b| {
        let mut session = Session::new(config.clone(), LuckGenerator::from_config(&config));
        let mut directions = Direction::ALL.iter().cycle();
        b.iter(|| {
            let direction = *directions.next().unwrap();
            session.dispatch(Command::Step(direction)).unwrap();
            black_box(session.nearby_caches())
        })
    });
}

fn bench_luck(c: &mut Criterion) {
    c.bench_function("luck", |b| b.iter(|| luck(black_box("369894,-1220628,initialValue"))));
}

criterion_group!(benches, bench_nearby_caches, bench_luck);
criterion_main!(benches);
