use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Maximum number of kpi-kind widgets shown at once.
pub const MAX_ACTIVE_KPIS: usize = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Kpi,
    Chart,
    Table,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Kpi => "kpi",
            WidgetKind::Chart => "chart",
            WidgetKind::Table => "table",
        }
    }
}

/// Renderer responsible for drawing a widget. Picked when the catalog entry is
/// defined so the grid never dispatches on id strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    KpiCard,
    ElectricityChart,
    DepartmentChart,
    CapacitiveGauge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: WidgetKind,
    pub description: Option<&'static str>,
    pub default_visible: bool,
    pub tags: &'static [&'static str],
    pub renderer: RendererKind,
}

impl WidgetDefinition {
    const fn kpi(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        default_visible: bool,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            title,
            kind: WidgetKind::Kpi,
            description: Some(description),
            default_visible,
            tags,
            renderer: RendererKind::KpiCard,
        }
    }

    const fn chart(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        tags: &'static [&'static str],
        renderer: RendererKind,
    ) -> Self {
        Self {
            id,
            title,
            kind: WidgetKind::Chart,
            description: Some(description),
            default_visible: true,
            tags,
            renderer,
        }
    }

    pub fn is_kpi(&self) -> bool {
        self.kind == WidgetKind::Kpi
    }

    /// Case-insensitive match against title, description and tags.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self
                .description
                .map(|d| d.to_lowercase().contains(&query))
                .unwrap_or(false)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

static CATALOG: Lazy<Vec<WidgetDefinition>> = Lazy::new(|| {
    vec![
        WidgetDefinition::kpi(
            "totalConsumption",
            "Total Consumption",
            "Total energy consumption (kWh)",
            true,
            &["energy", "consumption"],
        ),
        WidgetDefinition::kpi(
            "topDebi",
            "TOE Value",
            "Tonne of oil equivalent (TOE)",
            true,
            &["toe", "energy"],
        ),
        WidgetDefinition::kpi(
            "carbonFootprint",
            "Total Carbon Footprint",
            "CO2 emissions (tCO2e)",
            true,
            &["carbon", "environment"],
        ),
        WidgetDefinition::kpi(
            "naturalGas",
            "Total Natural Gas Consumption",
            "Natural gas consumption (Sm³)",
            true,
            &["natural gas", "consumption"],
        ),
        WidgetDefinition::kpi(
            "steamConsumption",
            "Total Steam Consumption",
            "Steam consumption",
            true,
            &["steam", "consumption"],
        ),
        WidgetDefinition::kpi(
            "electricityConsumption",
            "Total Electricity Consumption",
            "Electricity consumption (kWh)",
            true,
            &["electricity", "consumption"],
        ),
        WidgetDefinition::kpi(
            "hotWater",
            "Total Hot Water Consumption",
            "Hot water consumption (m³)",
            true,
            &["water", "hot water"],
        ),
        WidgetDefinition::kpi(
            "waterConsumption",
            "Total Water Consumption",
            "Water consumption (m³)",
            true,
            &["water", "consumption"],
        ),
        WidgetDefinition::kpi(
            "electricityProduction",
            "Total Electricity Production",
            "Electricity production (kWh)",
            true,
            &["electricity", "production"],
        ),
        WidgetDefinition::chart(
            "electricityChart",
            "Electricity Consumption Chart",
            "Time series of electricity consumption",
            &["electricity", "chart", "consumption"],
            RendererKind::ElectricityChart,
        ),
        WidgetDefinition::chart(
            "departmentConsumption",
            "Department Energy Consumption",
            "Bar chart of consumption per department",
            &["electricity", "department"],
            RendererKind::DepartmentChart,
        ),
        WidgetDefinition::chart(
            "capacitiveGauge",
            "Capacitive Usage Gauge",
            "Gauge of capacitive consumption",
            &["electricity", "capacitive", "gauge"],
            RendererKind::CapacitiveGauge,
        ),
        WidgetDefinition::kpi(
            "electricPowerFactor",
            "Electric Power Factor",
            "Instantaneous power factor",
            false,
            &["electricity", "power factor"],
        ),
        WidgetDefinition::kpi(
            "electricVoltage",
            "Electric Voltage",
            "Grid voltage (V)",
            false,
            &["electricity", "voltage"],
        ),
        WidgetDefinition::kpi(
            "electricCurrent",
            "Electric Current",
            "Line current (A)",
            false,
            &["electricity", "current"],
        ),
        WidgetDefinition::kpi(
            "electricFrequency",
            "Electric Frequency",
            "Grid frequency (Hz)",
            false,
            &["electricity", "frequency"],
        ),
    ]
});

/// All widget definitions in catalog order.
pub fn all() -> &'static [WidgetDefinition] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static WidgetDefinition> {
    CATALOG.iter().find(|w| w.id == id)
}

pub fn is_kpi(id: &str) -> bool {
    find(id).map(WidgetDefinition::is_kpi).unwrap_or(false)
}
