//! Property-based tests for configuration module

use super::*;
use proptest::prelude::*;

prop_compose! {
    fn valid_grab_config()(
        min_width in 1u32..2000u32,
        min_height in 1u32..2000u32,
        raise_on_begin in any::<bool>(),
    ) -> GrabConfig {
        GrabConfig {
            min_width,
            min_height,
            raise_on_begin,
        }
    }
}

proptest! {
    #[test]
    fn prop_valid_grab_config_validates(grab in valid_grab_config()) {
        let config = PerchConfig { grab, ..PerchConfig::default() };
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn prop_grab_config_survives_toml(grab in valid_grab_config()) {
        let config = PerchConfig { grab, ..PerchConfig::default() };
        let text = toml::to_string(&config).unwrap();
        let parsed: PerchConfig = toml::from_str(&text).unwrap();
        prop_assert_eq!(parsed.grab, config.grab);
    }
}
