use energy_dashboard::dashboard::catalog::{self, MAX_ACTIVE_KPIS};
use energy_dashboard::dashboard::layout::{default_item, Breakpoint, Placement};
use energy_dashboard::dashboard::snapshot::LocalStorage;
use energy_dashboard::dashboard::store::{DashboardStore, RestoreOutcome, KPI_SLOT_CAPACITY};
use std::collections::HashSet;
use tempfile::tempdir;

fn assert_consistent(store: &DashboardStore) {
    let active: HashSet<&str> = store.active_widgets().iter().map(String::as_str).collect();
    assert_eq!(active.len(), store.active_widgets().len(), "duplicate active ids");
    assert!(store.kpi_count() <= MAX_ACTIVE_KPIS);
    assert!(store.removed_kpi_slots().len() <= KPI_SLOT_CAPACITY);
    for bp in Breakpoint::ALL {
        let ids: HashSet<&str> = store.layouts().ids(bp).into_iter().collect();
        assert_eq!(ids, active, "layout {} out of sync", bp.as_str());
        assert_eq!(store.layouts().get(bp).len(), active.len());
    }
    for id in &store.state().minimized_widgets {
        assert!(active.contains(id.as_str()), "{id} minimized but inactive");
    }
}

/// Deterministic pseudo-random walk over the store operations.
#[test]
fn operation_sequences_keep_state_consistent() {
    let dir = tempdir().unwrap();
    let mut store = DashboardStore::new(LocalStorage::new(dir.path()));
    let ids: Vec<&str> = catalog::all().iter().map(|d| d.id).collect();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for step in 0..2_000 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let id = ids[(seed % ids.len() as u64) as usize];
        match (seed >> 8) % 10 {
            0..=5 => {
                store.toggle_widget(id);
            }
            6 | 7 => {
                store.toggle_minimize(id);
            }
            8 => store.toggle_dark_mode(),
            _ if step % 50 == 0 => store.remove_all_widgets(),
            _ => store.reset_layout(),
        }
        assert_consistent(&store);
    }
}

#[test]
fn recycled_kpi_takes_the_freed_slot() {
    let dir = tempdir().unwrap();
    let mut store = DashboardStore::new(LocalStorage::new(dir.path()));
    let before = store
        .layouts()
        .find(Breakpoint::Lg, "naturalGas")
        .cloned()
        .unwrap();
    store.toggle_widget("naturalGas");
    store.toggle_widget("electricFrequency");
    let after = store
        .layouts()
        .find(Breakpoint::Lg, "electricFrequency")
        .cloned()
        .unwrap();
    assert_eq!(after.placement, before.placement);
    assert_eq!((after.w, after.h), (before.w, before.h));
    assert!(store.removed_kpi_slots().is_empty());
}

#[test]
fn charts_never_enter_the_slot_buffer() {
    let dir = tempdir().unwrap();
    let mut store = DashboardStore::new(LocalStorage::new(dir.path()));
    store.toggle_widget("electricityChart");
    store.toggle_widget("capacitiveGauge");
    assert!(store.removed_kpi_slots().is_empty());
    assert_consistent(&store);
}

#[test]
fn reactivated_default_kpi_returns_to_its_default_slot() {
    let dir = tempdir().unwrap();
    let mut store = DashboardStore::new(LocalStorage::new(dir.path()));
    store.toggle_widget("totalConsumption");
    assert!(!store.is_active("totalConsumption"));
    store.toggle_widget("totalConsumption");
    assert!(store.is_active("totalConsumption"));

    let lg = store.layouts().find(Breakpoint::Lg, "totalConsumption").unwrap();
    assert_eq!(lg.placement, Placement::Fixed { x: 0, y: 0.0 });
    assert_eq!((lg.w, lg.h), (3, 1.25));
    for bp in Breakpoint::ALL {
        let item = store.layouts().find(bp, "totalConsumption").unwrap();
        assert_eq!(Some(item), default_item(bp, "totalConsumption").as_ref());
    }
    assert_consistent(&store);

    store.save_snapshot().unwrap();
    let mut restored = DashboardStore::new(LocalStorage::new(dir.path()));
    assert_eq!(restored.restore_snapshot(), RestoreOutcome::Restored);
    assert_eq!(restored.state(), store.state());
}
