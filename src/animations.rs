//! Autonomous strip animations.
//!
//! Every animation keeps its own last-update timestamp and only recomputes the
//! target once its period has elapsed, so it can safely be evaluated on every
//! tick of the control loop.

use core::time::Duration;

use crate::led::{ColorTarget, RgbColor, BLACK, GREEN, RED, WHITE};

pub const RAINBOW_STEP_PERIOD: Duration = Duration::from_millis(50);
pub const STROBE_PERIOD: Duration = Duration::from_millis(100);
pub const DOOR_INDICATOR_PERIOD: Duration = Duration::from_millis(100);
pub const CONNECTING_BLINK_PERIOD: Duration = Duration::from_millis(100);

const HUE_DEGREES: u16 = 360;
const HUE_SECTOR: u16 = 60;

/// Fixed-period gate measured against uptime.
#[derive(Debug, Clone, Copy)]
struct Cadence {
    period: Duration,
    last_update: Duration,
}

impl Cadence {
    const fn new(period: Duration) -> Cadence {
        Cadence {
            period,
            last_update: Duration::ZERO,
        }
    }

    fn is_due(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_update) < self.period {
            return false;
        }
        self.last_update = now;
        true
    }
}

/// Cycles the hue one degree per step, keeping the commanded brightness.
#[derive(Debug, Clone)]
pub struct RainbowAnimation {
    cadence: Cadence,
    hue: u16,
}

impl Default for RainbowAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl RainbowAnimation {
    pub const fn new() -> RainbowAnimation {
        RainbowAnimation {
            cadence: Cadence::new(RAINBOW_STEP_PERIOD),
            hue: 0,
        }
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn update(&mut self, now: Duration, target: &mut ColorTarget) {
        if !self.cadence.is_due(now) {
            return;
        }

        self.hue = (self.hue + 1) % HUE_DEGREES;
        target.color = hue_to_rgb(self.hue);
    }
}

/// Flashes between full white and black.
#[derive(Debug, Clone)]
pub struct StrobeAnimation {
    cadence: Cadence,
    on: bool,
}

impl Default for StrobeAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl StrobeAnimation {
    pub const fn new() -> StrobeAnimation {
        StrobeAnimation {
            cadence: Cadence::new(STROBE_PERIOD),
            on: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn update(&mut self, now: Duration, target: &mut ColorTarget) {
        if !self.cadence.is_due(now) {
            return;
        }

        self.on = !self.on;
        target.color = if self.on { WHITE } else { BLACK };
    }
}

/// Shows a door lock as red (locked) or green (unlocked).
#[derive(Debug, Clone)]
pub struct DoorIndicatorAnimation {
    cadence: Cadence,
}

impl Default for DoorIndicatorAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorIndicatorAnimation {
    pub const fn new() -> DoorIndicatorAnimation {
        DoorIndicatorAnimation {
            cadence: Cadence::new(DOOR_INDICATOR_PERIOD),
        }
    }

    pub fn update(&mut self, now: Duration, locked: bool, target: &mut ColorTarget) {
        if !self.cadence.is_due(now) {
            return;
        }

        target.color = if locked { RED } else { GREEN };
    }
}

/// Red blink shown while the network is still coming up.
#[derive(Debug, Clone)]
pub struct ConnectingAnimation {
    cadence: Cadence,
    on: bool,
}

impl Default for ConnectingAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectingAnimation {
    pub const fn new() -> ConnectingAnimation {
        ConnectingAnimation {
            cadence: Cadence::new(CONNECTING_BLINK_PERIOD),
            on: false,
        }
    }

    pub fn update(&mut self, now: Duration, target: &mut ColorTarget) {
        target.brightness = u8::MAX;
        if !self.cadence.is_due(now) {
            return;
        }

        self.on = !self.on;
        target.color = if self.on { RED } else { BLACK };
    }
}

/// Six-sector HSV to RGB conversion at full saturation and value.
///
/// `hue` is in degrees and taken modulo 360.
pub fn hue_to_rgb(hue: u16) -> RgbColor {
    let hue = hue % HUE_DEGREES;
    let sector = hue / HUE_SECTOR;
    let offset = hue % HUE_SECTOR;

    // rounded so neighbouring sectors meet without a jump
    let rising = ((offset * 255 + HUE_SECTOR / 2) / HUE_SECTOR) as u8;
    let falling = 255 - rising;

    let (r, g, b) = match sector {
        0 => (255, rising, 0),
        1 => (falling, 255, 0),
        2 => (0, 255, rising),
        3 => (0, falling, 255),
        4 => (rising, 0, 255),
        _ => (255, 0, falling),
    };

    RgbColor::new(r, g, b)
}
