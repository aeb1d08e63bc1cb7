use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const SEED_JSON: &str = include_str!("../../assets/seed.json");
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Chart intervals offered in the UI, in minutes.
pub const INTERVAL_OPTIONS: [u32; 2] = [60, 120];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiData {
    pub id: String,
    pub title: String,
    pub value: f64,
    pub unit: String,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeSet {
    #[serde(rename = "capacitiveUsage")]
    pub capacitive_usage: GaugeReading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeReading {
    pub current: f64,
    pub max: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub kpis: Vec<KpiData>,
    pub series: Vec<SeriesData>,
    pub gauge: GaugeSet,
}

/// Inclusive date-time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.from && t <= self.to
    }
}

/// One chart row: a label, the timestamp it stands for and one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub time: String,
    pub timestamp: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentTotal {
    pub name: String,
    pub value: f64,
}

/// Quick range choices ending on the last day of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    LastDay,
    LastTwoDays,
    AllThreeDays,
}

impl DatePreset {
    pub const ALL: [DatePreset; 3] = [
        DatePreset::LastDay,
        DatePreset::LastTwoDays,
        DatePreset::AllThreeDays,
    ];

    pub fn days(&self) -> i64 {
        match self {
            DatePreset::LastDay => 1,
            DatePreset::LastTwoDays => 2,
            DatePreset::AllThreeDays => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::LastDay => "28 Sep",
            DatePreset::LastTwoDays => "27-28 Sep",
            DatePreset::AllThreeDays => "26-28 Sep",
        }
    }

    pub fn range(&self) -> DateRange {
        let last = data_end_date();
        let first = last - Duration::days(self.days() - 1);
        DateRange {
            from: start_of_day(first),
            to: end_of_day(last),
        }
    }
}

fn data_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 26).unwrap_or_default()
}

fn data_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 28).unwrap_or_default()
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap_or_default()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

static SEED: Lazy<SeedData> = Lazy::new(|| match SeedData::from_json(SEED_JSON) {
    Ok(data) => data,
    Err(e) => {
        tracing::error!(error = %e, "failed to parse bundled seed data");
        SeedData::empty()
    }
});

impl SeedData {
    /// The dataset bundled with the application.
    pub fn bundled() -> &'static SeedData {
        &SEED
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn empty() -> Self {
        Self {
            kpis: Vec::new(),
            series: Vec::new(),
            gauge: GaugeSet {
                capacitive_usage: GaugeReading {
                    current: 0.0,
                    max: 100.0,
                    unit: "%".into(),
                },
            },
        }
    }

    pub fn kpis(&self) -> &[KpiData] {
        &self.kpis
    }

    pub fn kpi_by_id(&self, id: &str) -> Option<&KpiData> {
        self.kpis.iter().find(|k| k.id == id)
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Chart rows for `range`, averaged per hour-of-day when the range spans
    /// several days, then thinned to one row per `interval_minutes`.
    pub fn series_data(&self, range: Option<DateRange>, interval_minutes: u32) -> Vec<SeriesPoint> {
        let Some(first) = self.series.first() else {
            return Vec::new();
        };

        let mut points: Vec<SeriesPoint> = first
            .points
            .iter()
            .enumerate()
            .filter_map(|(idx, (raw, _))| {
                let Some(timestamp) = parse_timestamp(raw) else {
                    tracing::warn!(timestamp = %raw, "skipping unparseable seed timestamp");
                    return None;
                };
                Some(SeriesPoint {
                    time: timestamp.format("%H:%M").to_string(),
                    timestamp,
                    values: self
                        .series
                        .iter()
                        .map(|s| s.points.get(idx).map(|(_, v)| *v))
                        .collect(),
                })
            })
            .collect();

        if let Some(range) = range {
            points.retain(|p| range.contains(p.timestamp));
            let days: BTreeSet<NaiveDate> = points.iter().map(|p| p.timestamp.date()).collect();
            if days.len() > 1 {
                points = self.average_by_hour(&points);
            }
        }

        downsample(points, interval_minutes)
    }

    fn average_by_hour(&self, points: &[SeriesPoint]) -> Vec<SeriesPoint> {
        let mut groups: BTreeMap<u32, Vec<&SeriesPoint>> = BTreeMap::new();
        for point in points {
            groups.entry(point.timestamp.hour()).or_default().push(point);
        }
        groups
            .into_iter()
            .map(|(hour, members)| {
                let values = (0..self.series.len())
                    .map(|series| {
                        let present: Vec<f64> =
                            members.iter().filter_map(|p| p.values[series]).collect();
                        if present.is_empty() {
                            None
                        } else {
                            Some(round2(present.iter().sum::<f64>() / present.len() as f64))
                        }
                    })
                    .collect();
                SeriesPoint {
                    time: format!("{hour:02}:00"),
                    timestamp: members[0].timestamp,
                    values,
                }
            })
            .collect()
    }

    /// Sum of every series, rounded to two decimals.
    pub fn department_consumption(&self) -> Vec<DepartmentTotal> {
        self.series
            .iter()
            .map(|s| DepartmentTotal {
                name: s.name.clone(),
                value: round2(s.points.iter().map(|(_, v)| v).sum()),
            })
            .collect()
    }

    pub fn capacitive_gauge(&self) -> &GaugeReading {
        &self.gauge.capacitive_usage
    }

    pub fn default_date_range(&self) -> DateRange {
        DateRange {
            from: start_of_day(data_start_date()),
            to: end_of_day(data_end_date()),
        }
    }
}

/// Keep the first row, every row at least `interval_minutes` after the last
/// kept one, and always the final row.
pub fn downsample(points: Vec<SeriesPoint>, interval_minutes: u32) -> Vec<SeriesPoint> {
    if interval_minutes == 0 || points.is_empty() {
        return points;
    }
    let interval = Duration::minutes(i64::from(interval_minutes));
    let last_idx = points.len() - 1;
    let mut kept = Vec::new();
    let mut last_kept: Option<NaiveDateTime> = None;
    for (idx, point) in points.into_iter().enumerate() {
        let due = match last_kept {
            None => true,
            Some(t) => point.timestamp - t >= interval,
        };
        if due {
            last_kept = Some(point.timestamp);
            kept.push(point);
        } else if idx == last_idx {
            kept.push(point);
        }
    }
    kept
}

/// Trailing moving average over `window` rows, per series.
pub fn moving_average(points: &[SeriesPoint], window: usize) -> Vec<SeriesPoint> {
    if window == 0 || points.len() < window {
        return points.to_vec();
    }
    points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let start = (idx + 1).saturating_sub(window);
            let values = point
                .values
                .iter()
                .enumerate()
                .map(|(series, own)| {
                    let present: Vec<f64> = points[start..=idx]
                        .iter()
                        .filter_map(|p| p.values.get(series).copied().flatten())
                        .collect();
                    if present.is_empty() {
                        *own
                    } else {
                        Some(present.iter().sum::<f64>() / present.len() as f64)
                    }
                })
                .collect();
            SeriesPoint {
                values,
                ..point.clone()
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// KPI values prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiDisplay {
    pub id: String,
    pub title: String,
    pub value: String,
    pub unit: String,
    pub change: String,
    pub trend: Trend,
}

impl KpiDisplay {
    pub fn from_kpi(kpi: &KpiData) -> Self {
        Self {
            id: kpi.id.clone(),
            title: kpi.title.clone(),
            value: format_kpi_value(kpi.value),
            unit: kpi.unit.clone(),
            change: format!("{}%", format_percentage(kpi.delta.abs())),
            trend: if kpi.delta < 0.0 { Trend::Down } else { Trend::Up },
        }
    }
}

/// Two decimals with a comma separator: `1234.5` -> `1234,50`.
pub fn format_kpi_value(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

/// Up to two decimals, trailing zeros dropped, `.` thousands grouping and a
/// comma decimal separator: `1234.5` -> `1.234,5`.
pub fn format_percentage(value: f64) -> String {
    let rounded = format!("{:.2}", round2(value));
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        parse_timestamp(raw).unwrap()
    }

    fn tiny() -> SeedData {
        SeedData::from_json(
            r#"{
                "kpis": [{"id": "a", "title": "A", "value": 1.5, "unit": "kWh", "delta": -2.25}],
                "series": [
                    {"name": "s1", "points": [
                        ["2025-09-26T10:00:00", 10.0], ["2025-09-26T10:30:00", 20.0],
                        ["2025-09-27T10:00:00", 30.0], ["2025-09-27T11:00:00", 5.0]
                    ]},
                    {"name": "s2", "points": [
                        ["2025-09-26T10:00:00", 1.0], ["2025-09-26T10:30:00", 2.0],
                        ["2025-09-27T10:00:00", 3.0], ["2025-09-27T11:00:00", 4.0]
                    ]}
                ],
                "gauge": {"capacitiveUsage": {"current": 40, "max": 100, "unit": "%"}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn bundled_seed_parses() {
        let seed = SeedData::bundled();
        assert_eq!(seed.kpis().len(), 13);
        assert!(seed.kpi_by_id("totalConsumption").is_some());
        assert!(!seed.series_names().is_empty());
    }

    #[test]
    fn unfiltered_rows_keep_every_timestamp() {
        let rows = tiny().series_data(None, 0);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].time, "10:30");
        assert_eq!(rows[1].values, vec![Some(20.0), Some(2.0)]);
    }

    #[test]
    fn multi_day_range_averages_per_hour() {
        let seed = tiny();
        let range = DateRange {
            from: ts("2025-09-26T00:00:00"),
            to: ts("2025-09-27T23:59:59"),
        };
        let rows = seed.series_data(Some(range), 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].time, "10:00");
        assert_eq!(rows[0].timestamp, ts("2025-09-26T10:00:00"));
        assert_eq!(rows[0].values, vec![Some(20.0), Some(2.0)]);
        assert_eq!(rows[1].time, "11:00");
        assert_eq!(rows[1].values, vec![Some(5.0), Some(4.0)]);
    }

    #[test]
    fn single_day_range_is_not_averaged() {
        let range = DateRange {
            from: ts("2025-09-26T00:00:00"),
            to: ts("2025-09-26T23:59:59"),
        };
        let rows = tiny().series_data(Some(range), 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time, "10:30");
    }

    #[test]
    fn downsample_keeps_first_and_last() {
        let rows = tiny().series_data(None, 60);
        let times: Vec<_> = rows.iter().map(|r| r.timestamp).collect();
        assert_eq!(
            times,
            vec![
                ts("2025-09-26T10:00:00"),
                ts("2025-09-27T10:00:00"),
                ts("2025-09-27T11:00:00"),
            ]
        );
    }

    #[test]
    fn department_totals_are_rounded() {
        let totals = tiny().department_consumption();
        assert_eq!(totals[0].name, "s1");
        assert_eq!(totals[0].value, 65.0);
        assert_eq!(totals[1].value, 10.0);
    }

    #[test]
    fn moving_average_trails_window() {
        let rows = tiny().series_data(None, 0);
        let smoothed = moving_average(&rows, 2);
        assert_eq!(smoothed[0].values[0], Some(10.0));
        assert_eq!(smoothed[1].values[0], Some(15.0));
        assert_eq!(smoothed[3].values[0], Some(17.5));
        assert_eq!(moving_average(&rows, 5), rows);
    }

    #[test]
    fn kpi_display_formats() {
        let seed = tiny();
        let display = KpiDisplay::from_kpi(seed.kpi_by_id("a").unwrap());
        assert_eq!(display.value, "1,50");
        assert_eq!(display.change, "2,25%");
        assert_eq!(display.trend, Trend::Down);
        assert_eq!(format_percentage(3.0), "3");
        assert_eq!(format_percentage(1234.5), "1.234,5");
        assert_eq!(format_kpi_value(48215.37), "48215,37");
    }

    #[test]
    fn presets_end_on_last_day() {
        let day = DatePreset::LastDay.range();
        assert_eq!(day.from, ts("2025-09-28T00:00:00"));
        assert_eq!(day.to, ts("2025-09-28T23:59:59"));
        assert_eq!(
            DatePreset::AllThreeDays.range(),
            SeedData::bundled().default_date_range()
        );
    }
}
