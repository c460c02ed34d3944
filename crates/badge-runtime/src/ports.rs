//! Peripheral ports driven by the runtime loop.
//!
//! Production boards implement these over the radio, GPIO, NeoPixel strip and
//! e-paper panel; `adapters` has host-side simulations.

use async_trait::async_trait;
use cb_06_dedup_engine::InputState;
use shared_types::ObservedRecord;

/// One scan window of the radio.
#[async_trait]
pub trait Scanner: Send {
    /// Advertisements heard during the window, in any order. Records weaker
    /// than `min_rssi` are dropped by the adapter.
    async fn scan(&mut self, min_rssi: i16) -> Vec<ObservedRecord>;
}

/// Buttons and the power-saver switch.
pub trait InputSource: Send {
    fn poll(&mut self) -> InputState;
}

/// Colour of one LED.
pub type Rgb = (u8, u8, u8);

/// Addressable LED strip.
pub trait LedStrip: Send {
    fn pixel_count(&self) -> usize;

    /// Latch a full frame; `pixels.len() == pixel_count()`.
    fn show(&mut self, pixels: &[Rgb]);
}

/// Panel region in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

/// Something drawn into the panel frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Centred unique-contact total.
    BigNumber { value: u64 },
    /// Dial `index` with `ticks` marks lit (0..=12).
    Dial { index: usize, ticks: u8 },
    /// History chart: one bar height per column plus the axis label.
    HistoryChart { bars: Vec<u16>, label_max: u16 },
    /// One line of small text; blank text clears it.
    Banner { text: String },
}

/// Bistable display capability set.
///
/// `draw` only touches the frame buffer; nothing changes on glass until
/// `display_partial` or `display_full`.
pub trait DisplayPanel: Send {
    fn power_up(&mut self);

    fn draw(&mut self, rect: Rect, widget: &Widget);

    /// Refresh only `rect`.
    fn display_partial(&mut self, rect: Rect);

    /// Refresh the whole panel.
    fn display_full(&mut self);

    /// Block until the controller finishes the current refresh.
    fn busy_wait(&mut self);

    fn power_down(&mut self);

    /// Controller's low-voltage detect flag.
    fn low_battery(&self) -> bool;
}
