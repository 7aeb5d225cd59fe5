pub mod animations;
pub mod config;
pub mod driver;
pub mod led;
pub mod light_controller;
pub mod message_controller;
pub mod mode;
pub mod renderer;
pub mod status;

pub use driver::{InboundMessage, MessageTransport, TickDriver};
pub use led::{ColorTarget, PwmChannel, PwmOutput, RenderState, RgbColor};
pub use light_controller::{DoorStatus, LightController};
pub use message_controller::{Command, Door, MessageController, Topics};
pub use mode::Mode;
pub use renderer::Renderer;
