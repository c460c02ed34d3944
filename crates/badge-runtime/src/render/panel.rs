//! E-paper panel renderer.
//!
//! Widgets are drawn into the frame buffer whenever their value changes and
//! their rectangle queued as dirty. At most one queued rectangle is pushed to
//! glass per refresh interval so slow panel refreshes never gate the cycle.
//! A drop in the total (after a reset) redraws the whole panel.

use std::collections::VecDeque;

use badge_telemetry::log_event;
use cb_06_dedup_engine::EngineSnapshot;
use shared_types::Timestamp;

use crate::ports::{DisplayPanel, Rect, Widget};
use crate::scheduler::Cadence;

const SUBSYSTEM: &str = "runtime";

/// Most tick marks a dial can show.
pub const MAX_DIAL_TICKS: u8 = 12;

/// Smallest axis maximum for the history chart.
pub const MIN_CHART_MAX: u16 = 10;

pub const BIG_NUMBER_RECT: Rect = Rect::new(38, 64, 76, 20);
pub const DIAL_RECTS: [Rect; 3] = [
    Rect::new(0, 85, 48, 48),
    Rect::new(52, 104, 48, 48),
    Rect::new(104, 85, 48, 48),
];
pub const CHART_RECT: Rect = Rect::new(15, 16, 122, 41);
pub const BANNER_RECT: Rect = Rect::new(24, 36, 90, 8);
pub const LOW_BATTERY_RECT: Rect = Rect::new(24, 24, 66, 8);

const BANNER_TEXT: &str = "BATT SAVER MODE";
const LOW_BATTERY_TEXT: &str = "LOW BATTERY";

/// Panel timing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Minimum seconds between partial refreshes
    pub refresh_interval: f64,
    /// Same, while in low-power mode
    pub low_power_refresh_interval: f64,
    /// Seconds between history chart redraws
    pub chart_interval: f64,
    /// Chart height in pixels
    pub chart_height: u16,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 15.0,
            low_power_refresh_interval: 5.0 * 60.0,
            chart_interval: 4.0 * 60.0,
            chart_height: 32,
        }
    }
}

/// Bar heights for the chart and the axis label.
///
/// The axis maximum is the tallest column floored at [`MIN_CHART_MAX`]; bars
/// are scaled by `height / max` but never by less than 1, and clipped to the
/// chart height.
pub fn chart_bars(values: &[u16], height: u16) -> (Vec<u16>, u16) {
    let tallest = values.iter().copied().max().unwrap_or(0);
    if tallest == 0 {
        return (vec![0; values.len()], 0);
    }
    let max = tallest.max(MIN_CHART_MAX);
    let scale = (f64::from(height) / f64::from(max)).max(1.0);
    let bars = values
        .iter()
        .map(|&v| ((scale * f64::from(v)) as u16).min(height))
        .collect();
    (bars, max)
}

pub struct PanelRenderer {
    panel: Box<dyn DisplayPanel>,
    config: PanelConfig,
    dirty: VecDeque<Rect>,
    refresh: Cadence,
    chart: Cadence,
    displayed_total: Option<u64>,
    displayed_dials: [u64; 3],
    low_power: bool,
    low_battery: bool,
    /// Panel is out of deep sleep.
    powered: bool,
}

impl PanelRenderer {
    pub fn new(panel: Box<dyn DisplayPanel>, config: PanelConfig) -> Self {
        Self {
            refresh: Cadence::new(config.refresh_interval),
            chart: Cadence::new(config.chart_interval),
            panel,
            config,
            dirty: VecDeque::new(),
            displayed_total: None,
            displayed_dials: [0; 3],
            low_power: false,
            low_battery: false,
            powered: false,
        }
    }

    /// Bring the panel up to date with `snapshot`.
    pub fn render(&mut self, snapshot: &EngineSnapshot, now: Timestamp) {
        if snapshot.is_low_power != self.low_power {
            self.set_low_power(snapshot.is_low_power);
        }
        if self.powered {
            self.check_low_battery();
        }

        match self.displayed_total {
            Some(shown) if snapshot.total_unique < shown => {
                self.draw_everything(snapshot, now);
                return;
            }
            None => {
                self.draw_everything(snapshot, now);
                return;
            }
            Some(shown) if snapshot.total_unique != shown => {
                self.draw_big_number(snapshot.total_unique);
            }
            Some(_) => {}
        }

        self.draw_dials(snapshot, false);
        if self.chart.is_due(now) {
            self.draw_chart(snapshot);
        }
        self.update_dirty_rects(now);
    }

    fn set_low_power(&mut self, low_power: bool) {
        self.low_power = low_power;
        let interval = if low_power {
            self.config.low_power_refresh_interval
        } else {
            self.config.refresh_interval
        };
        self.refresh.set_period(interval);

        let text = if low_power {
            BANNER_TEXT.to_string()
        } else {
            " ".repeat(BANNER_TEXT.len())
        };
        self.panel.draw(BANNER_RECT, &Widget::Banner { text });
        self.ensure_powered();
        self.panel.display_partial(BANNER_RECT);
        if low_power {
            self.panel.busy_wait();
            self.panel.power_down();
            self.powered = false;
        }
        log_event!(info, SUBSYSTEM, "Panel power mode changed", low_power = low_power);
    }

    fn check_low_battery(&mut self) {
        let low_battery = self.panel.low_battery();
        if low_battery == self.low_battery {
            return;
        }
        self.low_battery = low_battery;
        let text = if low_battery {
            LOW_BATTERY_TEXT.to_string()
        } else {
            " ".repeat(LOW_BATTERY_TEXT.len())
        };
        self.panel.draw(LOW_BATTERY_RECT, &Widget::Banner { text });
        self.panel.display_partial(LOW_BATTERY_RECT);
        if low_battery {
            log_event!(warn, SUBSYSTEM, "Panel reports low battery");
        }
    }

    fn ensure_powered(&mut self) {
        if !self.powered {
            self.panel.power_up();
            self.powered = true;
        }
    }

    fn draw_everything(&mut self, snapshot: &EngineSnapshot, now: Timestamp) {
        self.ensure_powered();
        self.draw_chart(snapshot);
        self.draw_big_number(snapshot.total_unique);
        self.draw_dials(snapshot, true);
        self.dirty.clear();
        self.panel.display_full();
        self.chart.mark(now);
        log_event!(debug, SUBSYSTEM, "Full panel redraw", total = snapshot.total_unique);
    }

    fn draw_big_number(&mut self, value: u64) {
        self.panel.draw(BIG_NUMBER_RECT, &Widget::BigNumber { value });
        self.displayed_total = Some(value);
        self.add_dirty_rect(BIG_NUMBER_RECT);
    }

    fn draw_dials(&mut self, snapshot: &EngineSnapshot, force: bool) {
        for (index, &count) in snapshot.dial_buckets.iter().enumerate() {
            if !force && self.displayed_dials[index] == count {
                continue;
            }
            let ticks = count.min(u64::from(MAX_DIAL_TICKS)) as u8;
            self.panel.draw(DIAL_RECTS[index], &Widget::Dial { index, ticks });
            self.displayed_dials[index] = count;
            self.add_dirty_rect(DIAL_RECTS[index]);
        }
    }

    fn draw_chart(&mut self, snapshot: &EngineSnapshot) {
        let values: Vec<u16> = snapshot.history_series.iter().map(|&(_, c)| c).collect();
        let (bars, label_max) = chart_bars(&values, self.config.chart_height);
        self.panel
            .draw(CHART_RECT, &Widget::HistoryChart { bars, label_max });
        self.add_dirty_rect(CHART_RECT);
    }

    fn add_dirty_rect(&mut self, rect: Rect) {
        if !self.dirty.contains(&rect) {
            self.dirty.push_back(rect);
        }
    }

    fn update_dirty_rects(&mut self, now: Timestamp) {
        if self.dirty.is_empty() || !self.refresh.is_due(now) {
            return;
        }
        if let Some(rect) = self.dirty.pop_front() {
            self.ensure_powered();
            self.panel.display_partial(rect);
        }
    }

    pub fn pending_rects(&self) -> usize {
        self.dirty.len()
    }
}
