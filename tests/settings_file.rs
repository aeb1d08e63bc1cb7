use energy_dashboard::dashboard::store::DashboardStore;
use energy_dashboard::settings::Settings;
use tempfile::tempdir;

#[test]
fn data_dir_setting_points_the_store_at_it() {
    let dir = tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    let data_dir = dir.path().join("data");
    std::fs::write(
        &settings_path,
        format!(r#"{{"data_dir": {:?}}}"#, data_dir.to_str().unwrap()),
    )
    .unwrap();

    let settings = Settings::load(settings_path.to_str().unwrap()).unwrap();
    let mut store = DashboardStore::load(settings.storage());
    store.toggle_dark_mode();
    store.save_snapshot().unwrap();

    assert!(data_dir.join("ew-dashboard-layout-v1.json").exists());
    let reloaded = DashboardStore::load(settings.storage());
    assert!(reloaded.is_dark_mode());
}
