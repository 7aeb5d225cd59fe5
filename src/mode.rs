use std::fmt;

const MODE_NAME_DEFAULT: &str = "Default";
const MODE_NAME_RAINBOW: &str = "Rainbow";
const MODE_NAME_STROBE: &str = "Strobe";
const MODE_NAME_DOOR_W1: &str = "DoorW1";
const MODE_NAME_DOOR_W2: &str = "DoorW2";

const MODE_ID_DEFAULT: u8 = 0;
const MODE_ID_RAINBOW: u8 = 1;
const MODE_ID_STROBE: u8 = 2;
const MODE_ID_DOOR_W1: u8 = 3;
const MODE_ID_DOOR_W2: u8 = 4;

/// Animation selected for the strip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Color and brightness exactly as last commanded
    #[default]
    Default = MODE_ID_DEFAULT,
    /// Hue cycle at full saturation
    Rainbow = MODE_ID_RAINBOW,
    /// White/black flashing
    Strobe = MODE_ID_STROBE,
    /// Red/green lock indicator for door W1
    DoorW1 = MODE_ID_DOOR_W1,
    /// Red/green lock indicator for door W2
    DoorW2 = MODE_ID_DOOR_W2,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Default,
        Mode::Rainbow,
        Mode::Strobe,
        Mode::DoorW1,
        Mode::DoorW2,
    ];

    pub const fn from_raw(value: u8) -> Option<Mode> {
        Some(match value {
            MODE_ID_DEFAULT => Mode::Default,
            MODE_ID_RAINBOW => Mode::Rainbow,
            MODE_ID_STROBE => Mode::Strobe,
            MODE_ID_DOOR_W1 => Mode::DoorW1,
            MODE_ID_DOOR_W2 => Mode::DoorW2,
            _ => return None,
        })
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Default => MODE_NAME_DEFAULT,
            Mode::Rainbow => MODE_NAME_RAINBOW,
            Mode::Strobe => MODE_NAME_STROBE,
            Mode::DoorW1 => MODE_NAME_DOOR_W1,
            Mode::DoorW2 => MODE_NAME_DOOR_W2,
        }
    }

    /// Modes whose output flips abruptly and must bypass the fade.
    pub const fn renders_instantly(self) -> bool {
        matches!(self, Mode::Strobe)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
