use chip::{chip8::ChipSet, config::Config, definitions::keyboard, resources::Rom};
use criterion::{criterion_group, criterion_main, Criterion};

const ROM_NAME: &str = "BENCH";

/// Counts V0 up, draws the matching glyph and loops forever.
///
/// ```text
/// 0x200: 00E0  clear
/// 0x202: F029  I = glyph(V0)
/// 0x204: D125  draw at (V1, V2)
/// 0x206: 7001  V0 += 1
/// 0x208: 7104  V1 += 4
/// 0x20A: 1200  loop
/// ```
const PROGRAM: [u8; 12] = [
    0x00, 0xE0, 0xF0, 0x29, 0xD1, 0x25, 0x70, 0x01, 0x71, 0x04, 0x12, 0x00,
];

static BASE_ROM: once_cell::sync::Lazy<Rom> = once_cell::sync::Lazy::new(|| {
    Rom::new(ROM_NAME, PROGRAM.to_vec()).expect("the benchmark program fits into memory")
});

fn get_base() -> Rom {
    BASE_ROM.clone()
}

/// will setup the default configured chip
fn get_default_chip() -> ChipSet {
    ChipSet::new(get_base(), Config::default())
}

pub fn tick_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    let keys = [false; keyboard::SIZE];
    c.bench_function("tick_bench", |b| {
        b.iter(|| {
            let _ = chip.tick(&keys);
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let chip = get_default_chip();
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = format!("{}", chip);
        });
    });
}

criterion_group!(benches, tick_bench, print_bench);
criterion_main!(benches);
