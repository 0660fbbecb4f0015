use std::{collections::BTreeMap, time::Duration};

use crate::{
    backends::Instant, perf::PerfCounter, perf::PerfReport,
    world::component::component_kind::ComponentKind,
};

/// Accumulates per-kind frame time and diagnostic counters between reports.
///
/// Frame time is whatever callers measure with `record_duration`, usually on
/// the system clock. The instants given to `new` and `take_report` must come
/// from the same clock, or the ratios mean nothing.
pub struct PerfMonitor {
    diagnostic_mode: bool,
    feature_time: [Duration; ComponentKind::ALL.len()],
    counters: BTreeMap<String, i32>,
    materials_updated: i32,
    period_start: Instant,
}

impl PerfMonitor {
    pub fn new(diagnostic_mode: bool, now: &Instant) -> Self {
        Self {
            diagnostic_mode,
            feature_time: [Duration::ZERO; ComponentKind::ALL.len()],
            counters: BTreeMap::new(),
            materials_updated: 0,
            period_start: *now,
        }
    }

    pub fn diagnostic_mode(&self) -> bool {
        self.diagnostic_mode
    }

    pub fn set_diagnostic_mode(&mut self, enabled: bool) {
        if !enabled {
            self.counters.clear();
        }
        self.diagnostic_mode = enabled;
    }

    pub fn record_duration(&mut self, kind: ComponentKind, duration: Duration) {
        self.feature_time[kind.index()] += duration;
    }

    /// No-op unless diagnostic mode is on
    pub fn increment(&mut self, kind: ComponentKind, counter: PerfCounter) {
        if !self.diagnostic_mode {
            return;
        }
        let label = format!("{}.{}", kind.name(), counter.label());
        *self.counters.entry(label).or_insert(0) += 1;
    }

    /// Counts one sent value of `property` on a material using `shader`. No-op
    /// unless diagnostic mode is on.
    pub fn flag_material_property_updated(&mut self, shader: &str, property: &str) {
        if !self.diagnostic_mode {
            return;
        }
        let label = format!("MaterialProperty.{}.{}", shader, property);
        *self.counters.entry(label).or_insert(0) += 1;
    }

    pub fn add_materials_updated(&mut self, count: usize) {
        self.materials_updated = self
            .materials_updated
            .saturating_add(i32::try_from(count).unwrap_or(i32::MAX));
    }

    /// Builds the report for the period ending at `now` and starts a new one
    pub fn take_report(&mut self, now: &Instant) -> PerfReport {
        let wall_clock = self.period_start.elapsed(now).as_secs_f32();
        let feature_ratios = self
            .feature_time
            .iter()
            .map(|time| {
                if wall_clock > 0.0 {
                    time.as_secs_f32() / wall_clock
                } else {
                    0.0
                }
            })
            .collect();
        let report = PerfReport {
            feature_ratios,
            counters: std::mem::take(&mut self.counters).into_iter().collect(),
            materials_updated: self.materials_updated,
        };

        self.feature_time = [Duration::ZERO; ComponentKind::ALL.len()];
        self.materials_updated = 0;
        self.period_start = *now;
        report
    }
}
