use criterion::{criterion_group, criterion_main, Criterion};

use gtamap_core::{world_to_viewport, CoordinateParser, MapView};
use gtamap_tiles::{visible_tiles, TileCache, TileKey, MAX_NATIVE_ZOOM};

fn bench_visible_tiles(c: &mut Criterion) {
    let mut view = MapView::new(2560, 1440).unwrap();
    view.set_view(world_to_viewport(-218.78, -1703.47), 4.3);

    c.bench_function("visible_tiles_2560x1440", |b| {
        b.iter(|| visible_tiles(&view, MAX_NATIVE_ZOOM));
    });
}

fn bench_cache_churn(c: &mut Criterion) {
    c.bench_function("tile_cache_insert_256", |b| {
        b.iter(|| {
            let mut cache = TileCache::new(64);
            for x in 0..256 {
                cache.insert(TileKey::new(5, x, x / 2), x);
            }
            cache
        });
    });
}

fn bench_parse_import(c: &mut Criterion) {
    let text: String = (0..500)
        .map(|i| format!("{{{}.25, {}.75, 30.0, 90.0}},\n", i * 3 - 700, 1200 - i * 7))
        .collect();
    let parser = CoordinateParser::default();

    c.bench_function("parse_500_brace_tuples", |b| {
        b.iter(|| parser.parse(&text, "Spot", None));
    });
}

criterion_group!(
    benches,
    bench_visible_tiles,
    bench_cache_churn,
    bench_parse_import
);
criterion_main!(benches);
