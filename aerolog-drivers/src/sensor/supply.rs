//! Supply voltage from the internal reference
//!
//! The ADC converts against VDDA, so measuring the fixed internal reference
//! gives VDDA back: `vdda = vref * full_scale / raw`.

/// 12-bit ADC full scale
pub const ADC_FULL_SCALE: u32 = 4095;

/// Typical internal reference voltage (STM32F0 datasheet)
pub const VREFINT_TYPICAL_MV: u32 = 1230;

/// VDDA at which the factory `VREFINT_CAL` value was taken
pub const VREFINT_CAL_VDDA_MV: u32 = 3300;

/// Supply voltage from a raw VREFINT conversion, using the typical reference
pub fn supply_mv(vrefint_raw: u16) -> Option<u16> {
    scale(VREFINT_TYPICAL_MV * ADC_FULL_SCALE, vrefint_raw)
}

/// Supply voltage using the factory calibration value
///
/// More accurate than [`supply_mv`]; `vrefint_cal` is the 12-bit VREFINT
/// reading the factory took at 3.3 V.
pub fn supply_mv_calibrated(vrefint_cal: u16, vrefint_raw: u16) -> Option<u16> {
    scale(VREFINT_CAL_VDDA_MV * vrefint_cal as u32, vrefint_raw)
}

fn scale(numerator: u32, raw: u16) -> Option<u16> {
    if raw == 0 {
        return None;
    }
    Some((numerator / raw as u32).min(u16::MAX as u32) as u16)
}
