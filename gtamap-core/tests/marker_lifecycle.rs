use gtamap_core::{
    build_marker, import_batch, viewport_to_world, world_to_viewport, MapView, MarkerError,
    MarkerStore, MemoryStore, MonotonicIds, MARKERS_KEY,
};
use pretty_assertions::assert_eq;

#[test]
fn typed_and_imported_markers_survive_restart() {
    let mut ids = MonotonicIds::new();
    let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();

    let garage = build_marker("-218.784", "-1703.471", "Garage", None, &mut ids, 10).unwrap();
    store.add(garage.clone()).unwrap();

    let batch = import_batch(
        "Config.Spots = { {100.5, 200.25, 0, 0}, {-50, 75.125, 1, 90} }",
        "Spot",
        Some("#34c759"),
        &mut ids,
        11,
    )
    .unwrap();
    assert_eq!(batch.len(), 2);
    store.add_batch(batch).unwrap();

    let backend = store.backend().clone();
    let reloaded = MarkerStore::initialize(backend).unwrap();
    let summary: Vec<_> = reloaded
        .markers()
        .iter()
        .map(|m| (m.display_title().to_string(), m.x, m.y))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Garage".to_string(), -218.78, -1703.47),
            ("Spot".to_string(), 100.5, 200.25),
            ("Spot #2".to_string(), -50.0, 75.13),
        ]
    );
    assert_eq!(reloaded.find(&garage.id), Some(&garage));
}

#[test]
fn failed_import_leaves_store_untouched() {
    let mut ids = MonotonicIds::new();
    let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
    let m = build_marker("1", "2", "One", None, &mut ids, 0).unwrap();
    store.add(m).unwrap();
    let payload = store.backend().get(MARKERS_KEY).map(str::to_string);

    let err = import_batch("no tuples here", "Batch", None, &mut ids, 1).unwrap_err();
    assert!(matches!(err, MarkerError::NoMatchesFound));
    assert!(err.is_validation());
    assert_eq!(store.len(), 1);
    assert_eq!(store.backend().get(MARKERS_KEY).map(str::to_string), payload);
}

#[test]
fn double_click_position_lands_back_on_cursor() {
    let view = MapView::new(1280, 720).unwrap();
    let clicked = view.screen_to_viewport(900.0, 200.0);
    let world = viewport_to_world(clicked.lat, clicked.lng);

    let (sx, sy) = view.viewport_to_screen(world_to_viewport(world.x, world.y));
    // Rounding to hundredths of a game unit is well under a pixel at max zoom.
    assert!((sx - 900.0).abs() < 1.0, "sx = {sx}");
    assert!((sy - 200.0).abs() < 1.0, "sy = {sy}");
}

#[test]
fn huge_coordinates_survive_restart() {
    let mut ids = MonotonicIds::new();
    let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
    store
        .add(build_marker("1", "2", "Keep", None, &mut ids, 0).unwrap())
        .unwrap();

    let typed = build_marker("1e307", "5", "Far", None, &mut ids, 1).unwrap();
    assert_eq!((typed.x, typed.y), (1e307, 5.0));
    store.add(typed).unwrap();

    let batch = import_batch("{1e307, -1e307, 0}", "Edge", None, &mut ids, 2).unwrap();
    assert!(batch.iter().all(|m| m.x.is_finite() && m.y.is_finite()));
    store.add_batch(batch).unwrap();

    let reloaded = MarkerStore::initialize(store.backend().clone()).unwrap();
    let xs: Vec<f64> = reloaded.markers().iter().map(|m| m.x).collect();
    assert_eq!(xs, vec![1.0, 1e307, 1e307]);
}
