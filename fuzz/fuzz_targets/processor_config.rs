#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_inject::ProcessorConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must also pass validation
    if let Ok(config) = ProcessorConfig::from_json_str(json) {
        assert!(config.validate().is_ok());
        assert!(!config.project_name.is_empty());
    }
});
