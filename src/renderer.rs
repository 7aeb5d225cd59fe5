use anyhow::{Context, Result};

use crate::led::{ColorTarget, PwmChannel, PwmOutput, RenderState};

/// Fades the driven output toward the target and writes it to the PWM channels.
#[derive(Debug, Default)]
pub struct Renderer {
    state: RenderState,
}

impl Renderer {
    pub fn new() -> Renderer {
        Renderer {
            state: RenderState::default(),
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Advance one frame and write the duty cycles.
    ///
    /// With `instant` set the output jumps straight to `target`, otherwise each
    /// channel and the brightness move a single unit toward it.
    pub fn render(
        &mut self,
        target: &ColorTarget,
        instant: bool,
        output: &mut impl PwmOutput,
    ) -> Result<()> {
        self.step(target, instant);
        self.write(output)
    }

    pub fn step(&mut self, target: &ColorTarget, instant: bool) {
        if instant {
            self.state.color = target.color;
            self.state.brightness = target.brightness;
            return;
        }

        step_toward(&mut self.state.color.r, target.color.r);
        step_toward(&mut self.state.color.g, target.color.g);
        step_toward(&mut self.state.color.b, target.color.b);
        step_toward(&mut self.state.brightness, target.brightness);
    }

    /// Duty cycles for red, green and blue with brightness applied.
    pub fn duty_cycles(&self) -> [(PwmChannel, u8); 3] {
        let brightness = self.state.brightness;
        [
            (PwmChannel::Red, scale(self.state.color.r, brightness)),
            (PwmChannel::Green, scale(self.state.color.g, brightness)),
            (PwmChannel::Blue, scale(self.state.color.b, brightness)),
        ]
    }

    fn write(&self, output: &mut impl PwmOutput) -> Result<()> {
        for (channel, duty) in self.duty_cycles() {
            output
                .set_duty(channel, duty)
                .with_context(|| format!("Failed to set {:?} duty to {}", channel, duty))?;
        }

        Ok(())
    }
}

fn step_toward(current: &mut u8, target: u8) {
    if *current < target {
        *current += 1;
    } else if *current > target {
        *current -= 1;
    }
}

fn scale(value: u8, brightness: u8) -> u8 {
    // fits: 255 * 255 / 255 == 255
    (u16::from(value) * u16::from(brightness) / 255) as u8
}
