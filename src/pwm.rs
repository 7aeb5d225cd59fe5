use anyhow::Result;
use esp_idf_hal::{
    gpio::OutputPin,
    ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution, LEDC},
    peripheral::Peripheral,
    prelude::*,
};
use rgb_ledstrip::{PwmChannel, PwmOutput};

/// Three LEDC channels on one shared 8-bit timer.
pub struct LedcPwm {
    red: LedcDriver<'static>,
    green: LedcDriver<'static>,
    blue: LedcDriver<'static>,
}

impl LedcPwm {
    /// Pins are taken as peripherals, so one GPIO cannot back two channels.
    pub fn new(
        ledc: LEDC,
        red_pin: impl Peripheral<P = impl OutputPin> + 'static,
        green_pin: impl Peripheral<P = impl OutputPin> + 'static,
        blue_pin: impl Peripheral<P = impl OutputPin> + 'static,
        frequency_hz: u32,
    ) -> Result<LedcPwm> {
        // Lives as long as the firmware; dropping it would stop the channels.
        let timer = Box::leak(Box::new(LedcTimerDriver::new(
            ledc.timer0,
            &TimerConfig::default()
                .frequency(frequency_hz.Hz().into())
                .resolution(Resolution::Bits8),
        )?));

        Ok(LedcPwm {
            red: LedcDriver::new(ledc.channel0, &*timer, red_pin)?,
            green: LedcDriver::new(ledc.channel1, &*timer, green_pin)?,
            blue: LedcDriver::new(ledc.channel2, &*timer, blue_pin)?,
        })
    }
}

impl PwmOutput for LedcPwm {
    fn set_duty(&mut self, channel: PwmChannel, duty: u8) -> Result<()> {
        let driver = match channel {
            PwmChannel::Red => &mut self.red,
            PwmChannel::Green => &mut self.green,
            PwmChannel::Blue => &mut self.blue,
        };

        let max_duty = driver.get_max_duty();
        driver.set_duty(u32::from(duty) * max_duty / 255)?;

        Ok(())
    }
}
