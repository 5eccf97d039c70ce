//! Boot-time diagnostics.
//!
//! One log line describing the chip we woke up on: core count, radio
//! features, silicon revision, flash size.  Useful when a board comes back
//! from the field and the serial log is all there is.

#[cfg(target_os = "espidf")]
pub fn log_chip_info() {
    use esp_idf_svc::sys::*;

    let mut chip_info = esp_chip_info_t::default();
    // SAFETY: esp_chip_info only writes the out-param.
    unsafe { esp_chip_info(&mut chip_info) };

    let mut flash_size: u32 = 0;
    // SAFETY: null selects the default flash chip; out-param write only.
    let flash_known =
        unsafe { esp_flash_get_size(core::ptr::null_mut(), &mut flash_size) } == ESP_OK;

    log::info!(
        "chip: {} cores, WiFi{}{}, revision {}, {} flash",
        chip_info.cores,
        if chip_info.features & CHIP_FEATURE_BT != 0 { "/BT" } else { "" },
        if chip_info.features & CHIP_FEATURE_BLE != 0 { "/BLE" } else { "" },
        chip_info.revision,
        if flash_known {
            format!("{}MB", flash_size / (1024 * 1024))
        } else {
            "unknown".to_string()
        },
    );
}

#[cfg(not(target_os = "espidf"))]
pub fn log_chip_info() {
    log::info!("chip: host build, no chip report");
}
