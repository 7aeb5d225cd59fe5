use anyhow::{bail, Result};
use core::time::Duration;
use log::{debug, info};

use crate::animations::{
    ConnectingAnimation, DoorIndicatorAnimation, RainbowAnimation, StrobeAnimation,
};
use crate::led::{ColorTarget, RgbColor};
use crate::message_controller::{Command, Door, LightCommand, StatusCommand};
use crate::mode::Mode;

/// Lock state reported for the two doors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DoorStatus {
    pub w1_locked: bool,
    pub w2_locked: bool,
}

impl DoorStatus {
    pub fn is_locked(&self, door: Door) -> bool {
        match door {
            Door::W1 => self.w1_locked,
            Door::W2 => self.w2_locked,
        }
    }

    fn set_locked(&mut self, door: Door, locked: bool) {
        match door {
            Door::W1 => self.w1_locked = locked,
            Door::W2 => self.w2_locked = locked,
        }
    }
}

/// Mode selector: owns the target, the active mode and the door status.
#[derive(Debug, Clone)]
pub struct LightController {
    mode: Mode,
    target: ColorTarget,
    doors: DoorStatus,
    status_commands_enabled: bool,

    rainbow: RainbowAnimation,
    strobe: StrobeAnimation,
    door_w1: DoorIndicatorAnimation,
    door_w2: DoorIndicatorAnimation,
    connecting: ConnectingAnimation,
}

impl Default for LightController {
    fn default() -> Self {
        Self::new(false)
    }
}

impl LightController {
    pub fn new(status_commands_enabled: bool) -> LightController {
        LightController {
            mode: Mode::Default,
            target: ColorTarget::OFF,
            doors: DoorStatus::default(),
            status_commands_enabled,
            rainbow: RainbowAnimation::new(),
            strobe: StrobeAnimation::new(),
            door_w1: DoorIndicatorAnimation::new(),
            door_w2: DoorIndicatorAnimation::new(),
            connecting: ConnectingAnimation::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> &ColorTarget {
        &self.target
    }

    pub fn doors(&self) -> DoorStatus {
        self.doors
    }

    pub fn status_commands_enabled(&self) -> bool {
        self.status_commands_enabled
    }

    pub fn set_target(&mut self, target: ColorTarget) {
        self.target = target;
    }

    /// Select a mode by its wire index.
    ///
    /// Unknown indices are rejected and leave the current mode in place.
    pub fn set_mode_index(&mut self, index: i64) -> Result<Mode> {
        let Some(mode) = u8::try_from(index).ok().and_then(Mode::from_raw) else {
            bail!("Rejected unknown mode index {}", index);
        };
        self.set_mode(mode);

        Ok(mode)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!("Switching mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Apply a decoded inbound command.
    ///
    /// Returns an error only when a status command carries an unknown mode; all
    /// other fields of that command have been applied by then.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Status(status) => self.apply_status(status),
            Command::Light(light) => {
                self.apply_light(light);
                Ok(())
            }
            Command::DoorLock { door, locked } => {
                match locked {
                    Some(locked) => {
                        debug!("Door {:?} locked: {}", door, locked);
                        self.doors.set_locked(door, locked);
                    }
                    None => debug!("Door {:?} update without lock state, keeping previous", door),
                }
                Ok(())
            }
        }
    }

    fn apply_status(&mut self, status: StatusCommand) -> Result<()> {
        if !self.status_commands_enabled {
            info!("Ignoring status command, status commands are disabled");
            return Ok(());
        }

        set_channels(&mut self.target.color, status.red, status.green, status.blue);
        if let Some(brightness) = status.brightness {
            self.target.brightness = brightness;
        }

        match status.mode {
            Some(index) => self.set_mode_index(index).map(|_| ()),
            None => Ok(()),
        }
    }

    fn apply_light(&mut self, light: LightCommand) {
        set_channels(&mut self.target.color, light.red, light.green, light.blue);
        self.target.brightness = u8::MAX;
        self.set_mode(Mode::Default);
    }

    /// Evaluate the active mode's animation.
    pub fn tick(&mut self, now: Duration) {
        match self.mode {
            Mode::Default => {}
            Mode::Rainbow => self.rainbow.update(now, &mut self.target),
            Mode::Strobe => self.strobe.update(now, &mut self.target),
            Mode::DoorW1 => self
                .door_w1
                .update(now, self.doors.w1_locked, &mut self.target),
            Mode::DoorW2 => self
                .door_w2
                .update(now, self.doors.w2_locked, &mut self.target),
        }
    }

    /// Drive the network-wait blink instead of the active mode.
    pub fn tick_connecting(&mut self, now: Duration) {
        self.connecting.update(now, &mut self.target);
    }

    pub fn renders_instantly(&self) -> bool {
        self.mode.renders_instantly()
    }
}

fn set_channels(color: &mut RgbColor, red: Option<u8>, green: Option<u8>, blue: Option<u8>) {
    if let Some(red) = red {
        color.r = red;
    }
    if let Some(green) = green {
        color.g = green;
    }
    if let Some(blue) = blue {
        color.b = blue;
    }
}
