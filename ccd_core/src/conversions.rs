//! Conversions bridging `ccd_config` types to `ccd_core` types.

use crate::appliers::TimingParameter;
use crate::error::SettingsError;
use crate::integration::Gain;
use crate::settings::TimingSettings;

fn checked_duration(field: &'static str, value: f64) -> Result<f64, SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SettingsError::InvalidDuration { field, value })
    }
}

// ── TimingSettings ───────────────────────────────────────────────────────────

impl TryFrom<&ccd_config::TimingCfg> for TimingSettings {
    type Error = SettingsError;

    fn try_from(c: &ccd_config::TimingCfg) -> Result<Self, Self::Error> {
        let gain = Gain::try_from(c.gain)?;
        let time = checked_duration("integration_time_us", c.integration_time_us)?;
        let mut settings = TimingSettings::new(time, gain);
        for (parameter, (field, value)) in TimingParameter::ALL
            .into_iter()
            .zip(c.optional_durations())
        {
            if let Some(us) = value {
                settings = settings.with(parameter, checked_duration(field, us)?);
            }
        }
        Ok(settings)
    }
}
