use badge_telemetry::log_event;

use crate::ports::{DisplayPanel, LedStrip, Rect, Rgb, Widget};

const SUBSYSTEM: &str = "runtime";

/// LED strip that logs each frame.
#[derive(Debug, Clone)]
pub struct TracingLedStrip {
    pixels: usize,
    last: Vec<Rgb>,
}

impl TracingLedStrip {
    pub fn new(pixels: usize) -> Self {
        Self {
            pixels,
            last: vec![(0, 0, 0); pixels],
        }
    }

    pub fn last_frame(&self) -> &[Rgb] {
        &self.last
    }
}

impl LedStrip for TracingLedStrip {
    fn pixel_count(&self) -> usize {
        self.pixels
    }

    fn show(&mut self, pixels: &[Rgb]) {
        let lit = pixels.iter().filter(|&&p| p != (0, 0, 0)).count();
        log_event!(debug, SUBSYSTEM, "LED frame", lit = lit);
        self.last = pixels.to_vec();
    }
}

/// Panel that logs draws and refreshes.
#[derive(Debug, Clone, Default)]
pub struct TracingPanel {
    powered: bool,
    refreshes: u64,
}

impl TracingPanel {
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl DisplayPanel for TracingPanel {
    fn power_up(&mut self) {
        self.powered = true;
    }

    fn draw(&mut self, rect: Rect, widget: &Widget) {
        match widget {
            Widget::BigNumber { value } => {
                log_event!(debug, SUBSYSTEM, "Panel big number", value = *value);
            }
            Widget::Dial { index, ticks } => {
                log_event!(debug, SUBSYSTEM, "Panel dial", index = *index, ticks = *ticks);
            }
            Widget::HistoryChart { bars, label_max } => {
                log_event!(
                    debug,
                    SUBSYSTEM,
                    "Panel history chart",
                    columns = bars.len(),
                    label_max = *label_max
                );
            }
            Widget::Banner { text } => {
                log_event!(debug, SUBSYSTEM, "Panel banner", text = %text.trim());
            }
        }
        log_event!(debug, SUBSYSTEM, "Panel draw", x = rect.x, y = rect.y, w = rect.w, h = rect.h);
    }

    fn display_partial(&mut self, rect: Rect) {
        if !self.powered {
            log_event!(warn, SUBSYSTEM, "Partial refresh on sleeping panel dropped");
            return;
        }
        self.refreshes += 1;
        log_event!(debug, SUBSYSTEM, "Panel partial refresh", x = rect.x, y = rect.y, w = rect.w, h = rect.h);
    }

    fn display_full(&mut self) {
        if !self.powered {
            log_event!(warn, SUBSYSTEM, "Full refresh on sleeping panel dropped");
            return;
        }
        self.refreshes += 1;
        log_event!(debug, SUBSYSTEM, "Panel full refresh");
    }

    fn busy_wait(&mut self) {}

    fn power_down(&mut self) {
        self.powered = false;
        log_event!(debug, SUBSYSTEM, "Panel powered down");
    }

    fn low_battery(&self) -> bool {
        false
    }
}
