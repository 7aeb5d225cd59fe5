use anyhow::Result;
use smart_leds::RGB8;

pub type RgbColor = RGB8;

pub const BLACK: RgbColor = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RgbColor = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};
pub const RED: RgbColor = RGB8 { r: 255, g: 0, b: 0 };
pub const GREEN: RgbColor = RGB8 { r: 0, g: 255, b: 0 };

/// Desired steady-state output of the strip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColorTarget {
    pub color: RgbColor,
    pub brightness: u8,
}

impl ColorTarget {
    pub const OFF: ColorTarget = ColorTarget::new(BLACK, 0);

    pub const fn new(color: RgbColor, brightness: u8) -> ColorTarget {
        ColorTarget { color, brightness }
    }
}

/// Output currently driven onto the PWM channels, before brightness scaling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub color: RgbColor,
    pub brightness: u8,
}

impl RenderState {
    pub fn matches(&self, target: &ColorTarget) -> bool {
        self.color == target.color && self.brightness == target.brightness
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    Red,
    Green,
    Blue,
}

/// Hardware sink for the three strip channels.
///
/// Implemented by the LEDC driver on the device and by recording fakes in tests.
pub trait PwmOutput {
    /// Set the duty cycle of `channel` to `duty` (0 = off, 255 = fully on).
    fn set_duty(&mut self, channel: PwmChannel, duty: u8) -> Result<()>;
}
