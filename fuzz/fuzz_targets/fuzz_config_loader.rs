#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse + validate must never panic; errors are fine.
    if let Ok(cfg) = ccd_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // Anything validate() accepts must convert to typed settings.
            assert!(ccd_core::TimingSettings::try_from(&cfg.timing).is_ok());
        }
    }
});
