//! LED strip renderer: one pixel per active encounter.

use cb_06_dedup_engine::EngineSnapshot;

use crate::ports::{LedStrip, Rgb};

/// Dim blue used for home devices.
pub const HOME_COLOUR: Rgb = (0, 16, 32);

const OFF: Rgb = (0, 0, 0);

/// Colour wheel over 0..=255 (red, green, blue, back to red). Out-of-range
/// positions are dark.
pub fn colour_wheel(pos: i32) -> Rgb {
    if !(0..=255).contains(&pos) {
        return OFF;
    }
    let pos = pos as u8;
    match pos {
        0..=84 => (255 - pos * 3, pos * 3, 0),
        85..=169 => {
            let p = pos - 85;
            (0, 255 - p * 3, p * 3)
        }
        _ => {
            let p = pos - 170;
            (p * 3, 0, 255 - p * 3)
        }
    }
}

/// Frame for `active` encounters of which `home` are home devices. Home
/// pixels come first.
pub fn frame(pixel_count: usize, active: usize, home: usize) -> Vec<Rgb> {
    (0..pixel_count)
        .map(|i| {
            if i < home {
                HOME_COLOUR
            } else if i < active {
                colour_wheel(100 - 10 * i as i32)
            } else {
                OFF
            }
        })
        .collect()
}

/// Pushes frames to the strip only when the counts change.
pub struct LedRenderer {
    strip: Box<dyn LedStrip>,
    displayed: Option<(usize, usize)>,
    /// Last frame sent was all off.
    dark: bool,
}

impl LedRenderer {
    pub fn new(strip: Box<dyn LedStrip>) -> Self {
        Self {
            strip,
            displayed: None,
            dark: false,
        }
    }

    /// Returns whether a frame was sent.
    pub fn render(&mut self, snapshot: &EngineSnapshot) -> bool {
        if snapshot.is_low_power {
            if !self.dark {
                self.show_dark();
            }
            return false;
        }

        let counts = (snapshot.active_count, snapshot.active_home_count);
        if self.displayed == Some(counts) {
            return false;
        }
        let pixels = frame(self.strip.pixel_count(), counts.0, counts.1);
        self.strip.show(&pixels);
        self.displayed = Some(counts);
        self.dark = false;
        true
    }

    /// All pixels off; the next non-low-power render redraws.
    pub fn show_dark(&mut self) {
        let pixels = vec![OFF; self.strip.pixel_count()];
        self.strip.show(&pixels);
        self.displayed = None;
        self.dark = true;
    }

    /// Solid colour flash, used to acknowledge a reset.
    pub fn flash(&mut self, colour: Rgb) {
        let pixels = vec![colour; self.strip.pixel_count()];
        self.strip.show(&pixels);
        self.displayed = None;
        self.dark = colour == OFF;
    }
}
