//! Renderers turning engine snapshots into peripheral output.

mod led;
mod panel;

pub use led::{colour_wheel, frame, LedRenderer, HOME_COLOUR};
pub use panel::{
    chart_bars, PanelConfig, PanelRenderer, BANNER_RECT, BIG_NUMBER_RECT, CHART_RECT, DIAL_RECTS,
    MAX_DIAL_TICKS, MIN_CHART_MAX,
};
