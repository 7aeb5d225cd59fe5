use anyhow::{anyhow, bail, Result};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::{modem::Modem, peripheral::Peripheral};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition, wifi::BlockingWifi, wifi::EspWifi,
};
use heapless::String;
use log::info;
use std::{thread::sleep, time::Duration};

const CONNECT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Bring up the station interface and return it with the leased IP address.
///
/// `while_connecting` runs repeatedly until the interface is up.
pub fn connect_to_wifi(
    ssid: &'static str,
    pwd: &'static str,
    modem: impl Peripheral<P = Modem> + 'static,
    sysloop: EspSystemEventLoop,
    mut while_connecting: impl FnMut(),
) -> Result<(Box<EspWifi<'static>>, std::string::String)> {
    info!("Starting wifi connection process");

    check_credentials_not_empty(ssid, pwd)?;

    let nvs = EspDefaultNvsPartition::take()?;
    let mut esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;

    info!("Starting WiFi");
    wifi.start()?;

    info!("Scanning...");
    let ap_infos = wifi.scan()?;
    let channel = ap_infos
        .into_iter()
        .find(|a| a.ssid == ssid)
        .map(|ap_match| ap_match.channel);

    match channel {
        Some(channel) => info!("Found access point {} on channel {}", ssid, channel),
        None => info!(
            "Access point {} not found during scanning, will go with unknown channel",
            ssid
        ),
    }

    let wifi_ssid = String::<32>::try_from(ssid).map_err(|e| anyhow!("Error: {:?}", e))?;
    let wifi_psk = String::<64>::try_from(pwd).map_err(|e| anyhow!("Error: {:?}", e))?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: wifi_ssid,
        password: wifi_psk,
        channel,
        auth_method: AuthMethod::WPA2Personal,
        ..Default::default()
    }))?;

    info!("Connecting WiFi...");
    wifi.wifi_mut().connect()?;

    while !wifi.is_up()? {
        while_connecting();
        sleep(CONNECT_POLL_INTERVAL);
    }

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("Connected to WiFi: {:?}", ip_info);

    Ok((Box::new(esp_wifi), ip_info.ip.to_string()))
}

fn check_credentials_not_empty(ssid: &'static str, pwd: &'static str) -> Result<()> {
    if ssid.is_empty() {
        bail!("Missing WiFi name");
    }

    if pwd.is_empty() {
        bail!("Missing WiFi password");
    }

    Ok(())
}
