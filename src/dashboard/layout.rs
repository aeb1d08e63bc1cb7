use crate::dashboard::catalog::WidgetKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Responsive width tiers of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
}

impl Breakpoint {
    /// Widest first.
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
            Breakpoint::Xs => "xs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bp| bp.as_str() == name)
    }

    pub fn cols(&self) -> u32 {
        match self {
            Breakpoint::Lg => 15,
            Breakpoint::Md => 8,
            Breakpoint::Sm => 4,
            Breakpoint::Xs => 1,
        }
    }

    /// Minimum available width in logical pixels for this tier.
    pub fn min_width(&self) -> f32 {
        match self {
            Breakpoint::Lg => 1280.0,
            Breakpoint::Md => 768.0,
            Breakpoint::Sm => 640.0,
            Breakpoint::Xs => 0.0,
        }
    }

    pub fn for_width(width: f32) -> Self {
        Self::ALL
            .into_iter()
            .find(|bp| width >= bp.min_width())
            .unwrap_or(Breakpoint::Xs)
    }
}

/// Where a layout item sits vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Fixed { x: u32, y: f32 },
    /// Placed below existing content once the grid is compacted.
    AppendAfterContent { x: u32 },
}

impl Placement {
    pub fn x(&self) -> u32 {
        match *self {
            Placement::Fixed { x, .. } | Placement::AppendAfterContent { x } => x,
        }
    }

    pub fn y(&self) -> Option<f32> {
        match *self {
            Placement::Fixed { y, .. } => Some(y),
            Placement::AppendAfterContent { .. } => None,
        }
    }

    pub fn is_append(&self) -> bool {
        matches!(self, Placement::AppendAfterContent { .. })
    }
}

/// Placement and size of one widget in one breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayoutItemRepr", into = "LayoutItemRepr")]
pub struct LayoutItem {
    pub id: String,
    pub placement: Placement,
    pub w: u32,
    pub h: f32,
    pub min_w: u32,
    pub min_h: f32,
}

impl LayoutItem {
    pub fn fixed(id: &str, x: u32, y: f32, w: u32, h: f32, min_w: u32, min_h: f32) -> Self {
        Self {
            id: id.to_string(),
            placement: Placement::Fixed { x, y },
            w,
            h,
            min_w,
            min_h,
        }
    }

    pub fn x(&self) -> u32 {
        self.placement.x()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Same geometry with the vertical position left to the compactor.
    pub fn appended(mut self) -> Self {
        self.placement = Placement::AppendAfterContent { x: self.x() };
        self
    }
}

/// On-disk shape. `y: null` marks an item waiting to be appended.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutItemRepr {
    i: String,
    #[serde(default)]
    x: u32,
    #[serde(default)]
    y: Option<f32>,
    w: u32,
    h: f32,
    #[serde(default = "default_min_w")]
    min_w: u32,
    #[serde(default = "default_min_h")]
    min_h: f32,
}

fn default_min_w() -> u32 {
    1
}

fn default_min_h() -> f32 {
    1.0
}

impl From<LayoutItemRepr> for LayoutItem {
    fn from(r: LayoutItemRepr) -> Self {
        let placement = match r.y {
            Some(y) if y.is_finite() => Placement::Fixed { x: r.x, y: y.max(0.0) },
            _ => Placement::AppendAfterContent { x: r.x },
        };
        Self {
            id: r.i,
            placement,
            w: r.w,
            h: r.h,
            min_w: r.min_w,
            min_h: r.min_h,
        }
    }
}

impl From<LayoutItem> for LayoutItemRepr {
    fn from(item: LayoutItem) -> Self {
        Self {
            i: item.id,
            x: item.placement.x(),
            y: item.placement.y(),
            w: item.w,
            h: item.h,
            min_w: item.min_w,
            min_h: item.min_h,
        }
    }
}

/// One layout item per breakpoint for the same widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub lg: LayoutItem,
    pub md: LayoutItem,
    pub sm: LayoutItem,
    pub xs: LayoutItem,
}

impl SlotGroup {
    pub fn from_fn(mut f: impl FnMut(Breakpoint) -> LayoutItem) -> Self {
        Self {
            lg: f(Breakpoint::Lg),
            md: f(Breakpoint::Md),
            sm: f(Breakpoint::Sm),
            xs: f(Breakpoint::Xs),
        }
    }

    pub fn get(&self, bp: Breakpoint) -> &LayoutItem {
        match bp {
            Breakpoint::Lg => &self.lg,
            Breakpoint::Md => &self.md,
            Breakpoint::Sm => &self.sm,
            Breakpoint::Xs => &self.xs,
        }
    }

    /// Re-key every item to `id`, keeping the geometry.
    pub fn with_id(self, id: &str) -> Self {
        Self {
            lg: self.lg.with_id(id),
            md: self.md.with_id(id),
            sm: self.sm.with_id(id),
            xs: self.xs.with_id(id),
        }
    }
}

/// Layout sequences for every breakpoint. All four keys always exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<LayoutItem>>",
    into = "BTreeMap<String, Vec<LayoutItem>>"
)]
pub struct BreakpointLayouts {
    map: BTreeMap<Breakpoint, Vec<LayoutItem>>,
}

impl Default for BreakpointLayouts {
    fn default() -> Self {
        Self {
            map: Breakpoint::ALL.into_iter().map(|bp| (bp, Vec::new())).collect(),
        }
    }
}

impl From<BTreeMap<String, Vec<LayoutItem>>> for BreakpointLayouts {
    fn from(raw: BTreeMap<String, Vec<LayoutItem>>) -> Self {
        let mut layouts = Self::default();
        for (name, items) in raw {
            match Breakpoint::from_name(&name) {
                Some(bp) => layouts.set(bp, items),
                None => tracing::warn!(breakpoint = %name, "unknown breakpoint dropped"),
            }
        }
        layouts
    }
}

impl From<BreakpointLayouts> for BTreeMap<String, Vec<LayoutItem>> {
    fn from(layouts: BreakpointLayouts) -> Self {
        layouts
            .map
            .into_iter()
            .map(|(bp, items)| (bp.as_str().to_string(), items))
            .collect()
    }
}

impl BreakpointLayouts {
    pub fn get(&self, bp: Breakpoint) -> &[LayoutItem] {
        self.map.get(&bp).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, bp: Breakpoint, items: Vec<LayoutItem>) {
        self.map.insert(bp, items);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &[LayoutItem])> {
        self.map.iter().map(|(bp, items)| (*bp, items.as_slice()))
    }

    pub fn find(&self, bp: Breakpoint, id: &str) -> Option<&LayoutItem> {
        self.get(bp).iter().find(|item| item.id == id)
    }

    pub fn ids(&self, bp: Breakpoint) -> Vec<&str> {
        self.get(bp).iter().map(|item| item.id.as_str()).collect()
    }

    /// Append one widget to every breakpoint.
    pub fn insert_group(&mut self, group: SlotGroup) {
        let SlotGroup { lg, md, sm, xs } = group;
        for (bp, item) in [
            (Breakpoint::Lg, lg),
            (Breakpoint::Md, md),
            (Breakpoint::Sm, sm),
            (Breakpoint::Xs, xs),
        ] {
            self.map.entry(bp).or_default().push(item);
        }
    }

    /// Remove one widget from every breakpoint. The removed group is returned
    /// only when the widget was present in all four.
    pub fn remove_widget(&mut self, id: &str) -> Option<SlotGroup> {
        let mut removed: BTreeMap<Breakpoint, LayoutItem> = BTreeMap::new();
        for (bp, items) in self.map.iter_mut() {
            if let Some(pos) = items.iter().position(|item| item.id == id) {
                removed.insert(*bp, items.remove(pos));
            }
        }
        if removed.len() != Breakpoint::ALL.len() {
            return None;
        }
        let mut take = |bp: Breakpoint| removed.remove(&bp);
        Some(SlotGroup {
            lg: take(Breakpoint::Lg)?,
            md: take(Breakpoint::Md)?,
            sm: take(Breakpoint::Sm)?,
            xs: take(Breakpoint::Xs)?,
        })
    }
}

pub const DEFAULT_ACTIVE_WIDGETS: [&str; 12] = [
    "totalConsumption",
    "topDebi",
    "carbonFootprint",
    "naturalGas",
    "electricityChart",
    "departmentConsumption",
    "capacitiveGauge",
    "steamConsumption",
    "electricityConsumption",
    "hotWater",
    "waterConsumption",
    "electricityProduction",
];

type Row = (&'static str, u32, f32, u32, f32, u32, f32);

const DEFAULT_LG: [Row; 12] = [
    ("totalConsumption", 0, 0.0, 3, 1.25, 3, 1.0),
    ("topDebi", 3, 0.0, 3, 1.25, 3, 1.0),
    ("carbonFootprint", 6, 0.0, 3, 1.25, 3, 1.0),
    ("naturalGas", 9, 0.0, 3, 1.25, 3, 1.0),
    ("steamConsumption", 12, 0.0, 3, 1.25, 3, 1.0),
    ("electricityChart", 0, 1.25, 15, 5.0, 10, 4.0),
    ("departmentConsumption", 0, 6.25, 6, 5.0, 5, 4.0),
    ("capacitiveGauge", 6, 6.25, 6, 5.0, 5, 4.0),
    ("electricityConsumption", 12, 6.25, 3, 1.25, 3, 1.0),
    ("hotWater", 12, 7.5, 3, 1.25, 3, 1.0),
    ("waterConsumption", 12, 8.75, 3, 1.25, 3, 1.0),
    ("electricityProduction", 12, 10.0, 3, 1.25, 3, 1.0),
];

const DEFAULT_MD: [Row; 12] = [
    ("totalConsumption", 0, 0.0, 4, 1.5, 3, 1.0),
    ("topDebi", 4, 0.0, 4, 1.5, 3, 1.0),
    ("carbonFootprint", 0, 1.5, 4, 1.5, 3, 1.0),
    ("naturalGas", 4, 1.5, 4, 1.5, 3, 1.0),
    ("steamConsumption", 2, 3.0, 4, 1.5, 3, 1.0),
    ("electricityChart", 0, 4.5, 8, 5.0, 6, 4.0),
    ("departmentConsumption", 0, 9.5, 8, 5.0, 6, 4.0),
    ("capacitiveGauge", 0, 14.5, 8, 5.0, 6, 4.0),
    ("electricityConsumption", 0, 19.5, 4, 1.5, 3, 1.0),
    ("hotWater", 4, 19.5, 4, 1.5, 3, 1.0),
    ("waterConsumption", 0, 21.0, 4, 1.5, 3, 1.0),
    ("electricityProduction", 4, 21.0, 4, 1.5, 3, 1.0),
];

const DEFAULT_SM: [Row; 12] = [
    ("totalConsumption", 0, 0.0, 2, 1.5, 2, 1.0),
    ("topDebi", 2, 0.0, 2, 1.5, 2, 1.0),
    ("carbonFootprint", 0, 1.5, 2, 1.5, 2, 1.0),
    ("naturalGas", 2, 1.5, 2, 1.5, 2, 1.0),
    ("steamConsumption", 0, 3.0, 4, 1.5, 2, 1.0),
    ("electricityChart", 0, 4.5, 4, 5.0, 4, 4.0),
    ("departmentConsumption", 0, 9.5, 4, 5.0, 4, 4.0),
    ("capacitiveGauge", 0, 14.5, 4, 5.0, 4, 4.0),
    ("electricityConsumption", 0, 19.5, 2, 1.5, 2, 1.0),
    ("hotWater", 2, 19.5, 2, 1.5, 2, 1.0),
    ("waterConsumption", 0, 21.0, 2, 1.5, 2, 1.0),
    ("electricityProduction", 2, 21.0, 2, 1.5, 2, 1.0),
];

const DEFAULT_XS: [Row; 12] = [
    ("totalConsumption", 0, 0.0, 1, 1.5, 1, 1.0),
    ("topDebi", 0, 1.5, 1, 1.5, 1, 1.0),
    ("carbonFootprint", 0, 3.0, 1, 1.5, 1, 1.0),
    ("naturalGas", 0, 4.5, 1, 1.5, 1, 1.0),
    ("steamConsumption", 0, 6.0, 1, 1.5, 1, 1.0),
    ("electricityChart", 0, 7.5, 1, 5.0, 1, 4.0),
    ("departmentConsumption", 0, 12.5, 1, 5.0, 1, 4.0),
    ("capacitiveGauge", 0, 17.5, 1, 5.0, 1, 4.0),
    ("electricityConsumption", 0, 22.5, 1, 1.5, 1, 1.0),
    ("hotWater", 0, 24.0, 1, 1.5, 1, 1.0),
    ("waterConsumption", 0, 25.5, 1, 1.5, 1, 1.0),
    ("electricityProduction", 0, 27.0, 1, 1.5, 1, 1.0),
];

fn default_rows(bp: Breakpoint) -> &'static [Row] {
    match bp {
        Breakpoint::Lg => &DEFAULT_LG,
        Breakpoint::Md => &DEFAULT_MD,
        Breakpoint::Sm => &DEFAULT_SM,
        Breakpoint::Xs => &DEFAULT_XS,
    }
}

fn row_to_item(row: &Row) -> LayoutItem {
    let (id, x, y, w, h, min_w, min_h) = *row;
    LayoutItem::fixed(id, x, y, w, h, min_w, min_h)
}

pub fn default_layouts() -> BreakpointLayouts {
    let mut layouts = BreakpointLayouts::default();
    for bp in Breakpoint::ALL {
        layouts.set(bp, default_rows(bp).iter().map(row_to_item).collect());
    }
    layouts
}

/// Hard-coded default position of `id`, if it has one.
pub fn default_item(bp: Breakpoint, id: &str) -> Option<LayoutItem> {
    default_rows(bp)
        .iter()
        .find(|row| row.0 == id)
        .map(row_to_item)
}

/// Kind-dependent footprint for widgets without a default position.
pub fn fallback_item(bp: Breakpoint, id: &str, kind: WidgetKind) -> LayoutItem {
    let chart = kind == WidgetKind::Chart;
    let (w, h, min_w, min_h) = match (bp, chart) {
        (Breakpoint::Lg, true) => (15, 5.0, 10, 4.0),
        (Breakpoint::Lg, false) => (3, 1.25, 3, 1.0),
        (Breakpoint::Md, true) => (8, 5.0, 6, 4.0),
        (Breakpoint::Md, false) => (4, 2.0, 3, 1.0),
        (Breakpoint::Sm, true) => (4, 5.0, 4, 4.0),
        (Breakpoint::Sm, false) => (2, 2.0, 2, 1.0),
        (Breakpoint::Xs, true) => (1, 5.0, 1, 4.0),
        (Breakpoint::Xs, false) => (1, 2.0, 1, 1.0),
    };
    LayoutItem {
        id: id.to_string(),
        placement: Placement::AppendAfterContent { x: 0 },
        w,
        h,
        min_w,
        min_h,
    }
}

/// Position for a newly shown widget when no recycled slot is available.
pub fn initial_slot(id: &str, kind: WidgetKind) -> SlotGroup {
    SlotGroup::from_fn(|bp| {
        default_item(bp, id)
            .map(LayoutItem::appended)
            .unwrap_or_else(|| fallback_item(bp, id, kind))
    })
}

const EPS: f32 = 1e-4;

fn columns_overlap(a: &LayoutItem, b: &LayoutItem) -> bool {
    a.x() < b.x() + b.w && b.x() < a.x() + a.w
}

fn rects_overlap(a: &LayoutItem, b: &LayoutItem) -> bool {
    let (Some(ay), Some(by)) = (a.placement.y(), b.placement.y()) else {
        return false;
    };
    columns_overlap(a, b) && ay < by + b.h - EPS && by < ay + a.h - EPS
}

/// Lowest free row below everything in `items`.
pub fn bottom(items: &[LayoutItem]) -> f32 {
    items
        .iter()
        .filter_map(|item| item.placement.y().map(|y| y + item.h))
        .fold(0.0, f32::max)
}

fn clamp_to_cols(item: &mut LayoutItem, cols: u32) {
    let cols = cols.max(1);
    let floor = item.min_w.clamp(1, cols);
    item.w = item.w.clamp(floor, cols);
    item.h = item.h.max(item.min_h);
    let x = item.x().min(cols - item.w);
    item.placement = match item.placement {
        Placement::Fixed { y, .. } => Placement::Fixed { x, y },
        Placement::AppendAfterContent { .. } => Placement::AppendAfterContent { x },
    };
}

fn compact_with_priority(
    items: &[LayoutItem],
    cols: u32,
    priority: Option<&str>,
) -> Vec<LayoutItem> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (ia, ib) = (&items[a], &items[b]);
        match (ia.placement.y(), ib.placement.y()) {
            (Some(ya), Some(yb)) => ya
                .partial_cmp(&yb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let pa = priority != Some(ia.id.as_str());
                    let pb = priority != Some(ib.id.as_str());
                    pa.cmp(&pb)
                })
                .then_with(|| ia.x().cmp(&ib.x())),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(&b),
        }
    });

    let mut placed: Vec<Option<LayoutItem>> = vec![None; items.len()];
    let mut settled: Vec<LayoutItem> = Vec::with_capacity(items.len());
    for idx in order {
        let mut item = items[idx].clone();
        clamp_to_cols(&mut item, cols);
        let x = item.x();
        let y = settled
            .iter()
            .filter(|other| columns_overlap(&item, other))
            .filter_map(|other| other.placement.y().map(|oy| oy + other.h))
            .fold(0.0, f32::max);
        item.placement = Placement::Fixed { x, y };
        settled.push(item.clone());
        placed[idx] = Some(item);
    }
    placed.into_iter().flatten().collect()
}

/// Vertical compaction. Every item ends up `Fixed`, floating up until it
/// rests on an item sharing one of its columns. Append placements land below
/// all fixed content, in sequence order. Output keeps the input order.
pub fn compact(items: &[LayoutItem], cols: u32) -> Vec<LayoutItem> {
    compact_with_priority(items, cols, None)
}

/// Move `id` to a new cell, pushing colliding items below it, then compact.
pub fn move_item(items: &[LayoutItem], cols: u32, id: &str, x: u32, y: f32) -> Vec<LayoutItem> {
    let mut items = items.to_vec();
    let Some(pos) = items.iter().position(|item| item.id == id) else {
        return items;
    };
    items[pos].placement = Placement::Fixed { x, y: y.max(0.0) };
    clamp_to_cols(&mut items[pos], cols);
    push_colliding_down(&mut items, pos);
    compact_with_priority(&items, cols, Some(id))
}

/// Resize `id`, respecting its minimum size and the column count, then compact.
pub fn resize_item(items: &[LayoutItem], cols: u32, id: &str, w: u32, h: f32) -> Vec<LayoutItem> {
    let mut items = items.to_vec();
    let Some(pos) = items.iter().position(|item| item.id == id) else {
        return items;
    };
    items[pos].w = w;
    items[pos].h = h;
    clamp_to_cols(&mut items[pos], cols);
    push_colliding_down(&mut items, pos);
    compact_with_priority(&items, cols, Some(id))
}

fn push_colliding_down(items: &mut [LayoutItem], pos: usize) {
    let anchor = items[pos].clone();
    let Some(anchor_y) = anchor.placement.y() else {
        return;
    };
    let floor = anchor_y + anchor.h;
    for (idx, item) in items.iter_mut().enumerate() {
        if idx != pos && rects_overlap(&anchor, item) {
            item.placement = Placement::Fixed { x: item.x(), y: floor };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn breakpoint_for_width() {
        assert_eq!(Breakpoint::for_width(1920.0), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(1280.0), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(900.0), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(700.0), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(320.0), Breakpoint::Xs);
    }

    #[test]
    fn defaults_cover_every_breakpoint() {
        let layouts = default_layouts();
        for bp in Breakpoint::ALL {
            let mut ids = layouts.ids(bp);
            ids.sort();
            let mut expected = DEFAULT_ACTIVE_WIDGETS.to_vec();
            expected.sort();
            assert_eq!(ids, expected, "{}", bp.as_str());
        }
    }

    #[test]
    fn append_is_written_as_null_y() {
        let item = LayoutItem::fixed("a", 2, 3.0, 3, 1.25, 3, 1.0).appended();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"i": "a", "x": 2, "y": null, "w": 3, "h": 1.25, "minW": 3, "minH": 1.0})
        );
        let back: LayoutItem = serde_json::from_value(value).unwrap();
        assert_eq!(back.placement, Placement::AppendAfterContent { x: 2 });
    }

    #[test]
    fn unknown_breakpoints_are_ignored_and_missing_filled() {
        let value = json!({
            "lg": [{"i": "a", "x": 0, "y": 0, "w": 3, "h": 1}],
            "xxl": []
        });
        let layouts: BreakpointLayouts = serde_json::from_value(value).unwrap();
        assert_eq!(layouts.ids(Breakpoint::Lg), vec!["a"]);
        assert!(layouts.get(Breakpoint::Xs).is_empty());
        assert_eq!(layouts.iter().count(), 4);
    }

    #[test]
    fn remove_widget_requires_all_breakpoints() {
        let mut layouts = default_layouts();
        let group = layouts.remove_widget("topDebi").unwrap();
        assert_eq!(group.lg.x(), 3);
        assert!(layouts.find(Breakpoint::Md, "topDebi").is_none());

        let mut partial = BreakpointLayouts::default();
        partial.set(Breakpoint::Lg, vec![LayoutItem::fixed("x", 0, 0.0, 1, 1.0, 1, 1.0)]);
        assert!(partial.remove_widget("x").is_none());
        assert!(partial.get(Breakpoint::Lg).is_empty());
    }

    #[test]
    fn initial_slot_uses_default_geometry_appended() {
        let group = initial_slot("capacitiveGauge", WidgetKind::Chart);
        assert_eq!(group.lg.placement, Placement::AppendAfterContent { x: 6 });
        assert_eq!((group.lg.w, group.lg.h), (6, 5.0));

        let synth = initial_slot("electricVoltage", WidgetKind::Kpi);
        assert_eq!((synth.lg.w, synth.lg.h, synth.lg.min_w), (3, 1.25, 3));
        assert_eq!((synth.md.w, synth.md.h), (4, 2.0));
        assert_eq!((synth.xs.w, synth.xs.h), (1, 2.0));
    }

    #[test]
    fn compact_defaults_is_stable() {
        let layouts = default_layouts();
        for bp in Breakpoint::ALL {
            let compacted = compact(layouts.get(bp), bp.cols());
            assert_eq!(compacted, layouts.get(bp), "{}", bp.as_str());
        }
    }

    #[test]
    fn compact_places_appended_below_content() {
        let items = vec![
            LayoutItem::fixed("a", 0, 0.0, 3, 1.25, 3, 1.0),
            LayoutItem::fixed("b", 0, 1.25, 15, 5.0, 10, 4.0),
            LayoutItem::fixed("c", 0, 0.0, 3, 1.25, 3, 1.0).appended(),
        ];
        let compacted = compact(&items, 15);
        assert_eq!(compacted[2].placement, Placement::Fixed { x: 0, y: 6.25 });
        assert_eq!(bottom(&compacted), 7.5);
    }

    #[test]
    fn compact_floats_items_up_and_never_overlaps() {
        let items = vec![
            LayoutItem::fixed("a", 0, 4.0, 3, 1.0, 1, 1.0),
            LayoutItem::fixed("b", 2, 9.0, 3, 2.0, 1, 1.0),
            LayoutItem::fixed("c", 10, 3.0, 5, 1.0, 1, 1.0),
        ];
        let compacted = compact(&items, 15);
        assert_eq!(compacted[0].placement, Placement::Fixed { x: 0, y: 0.0 });
        assert_eq!(compacted[1].placement, Placement::Fixed { x: 2, y: 1.0 });
        assert_eq!(compacted[2].placement, Placement::Fixed { x: 10, y: 0.0 });
        for (i, a) in compacted.iter().enumerate() {
            for b in compacted.iter().skip(i + 1) {
                assert!(!rects_overlap(a, b), "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn compact_clamps_width_and_x_to_columns() {
        let items = vec![LayoutItem::fixed("wide", 6, 0.0, 15, 5.0, 10, 4.0)];
        let compacted = compact(&items, 8);
        assert_eq!(compacted[0].w, 8);
        assert_eq!(compacted[0].x(), 0);
    }

    #[test]
    fn move_pushes_collisions_down() {
        let items = vec![
            LayoutItem::fixed("a", 0, 0.0, 3, 1.0, 1, 1.0),
            LayoutItem::fixed("b", 3, 0.0, 3, 1.0, 1, 1.0),
        ];
        let moved = move_item(&items, 15, "b", 0, 0.0);
        assert_eq!(moved[1].placement, Placement::Fixed { x: 0, y: 0.0 });
        assert_eq!(moved[0].placement, Placement::Fixed { x: 0, y: 1.0 });
    }

    #[test]
    fn resize_respects_minimum() {
        let items = vec![LayoutItem::fixed("a", 0, 0.0, 6, 5.0, 5, 4.0)];
        let resized = resize_item(&items, 15, "a", 2, 1.0);
        assert_eq!((resized[0].w, resized[0].h), (5, 4.0));
    }
}
