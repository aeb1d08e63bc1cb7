use energy_dashboard::dashboard::seed::{moving_average, DatePreset, SeedData};

#[test]
fn single_day_keeps_half_hour_rows_until_thinned() {
    let seed = SeedData::bundled();
    let range = DatePreset::LastDay.range();
    let raw = seed.series_data(Some(range), 0);
    assert_eq!(raw.len(), 48);
    assert_eq!(raw[0].time, "00:00");
    assert!(raw.iter().all(|p| range.contains(p.timestamp)));
}

#[test]
fn multi_day_range_averages_per_hour() {
    let seed = SeedData::bundled();
    let hourly = seed.series_data(Some(DatePreset::AllThreeDays.range()), 60);
    assert_eq!(hourly.len(), 24);
    assert_eq!(hourly[0].time, "00:00");
    assert_eq!(hourly[23].time, "23:00");
    assert!(hourly
        .iter()
        .all(|p| p.values.len() == seed.series_names().len()));

    let two_hourly = seed.series_data(Some(DatePreset::AllThreeDays.range()), 120);
    assert!(two_hourly.len() < hourly.len());
    assert_eq!(two_hourly.last().map(|p| p.time.as_str()), Some("23:00"));
}

#[test]
fn no_range_means_whole_dataset() {
    let seed = SeedData::bundled();
    assert_eq!(seed.series_data(None, 0).len(), 144);
}

#[test]
fn moving_average_preserves_length() {
    let seed = SeedData::bundled();
    let rows = seed.series_data(Some(DatePreset::LastDay.range()), 60);
    let smoothed = moving_average(&rows, 5);
    assert_eq!(smoothed.len(), rows.len());
    assert_eq!(smoothed[0].time, rows[0].time);
}

#[test]
fn department_totals_cover_every_series() {
    let seed = SeedData::bundled();
    let totals = seed.department_consumption();
    assert_eq!(totals.len(), seed.series_names().len());
    assert!(totals.iter().all(|t| t.value > 0.0));
}
