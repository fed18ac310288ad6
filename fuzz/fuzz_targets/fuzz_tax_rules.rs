#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; errors are fine.
        if let Ok(rules) = invotax::vat::TaxRules::from_json(s) {
            for country in rules.countries() {
                let _ = rules.rates_for(country, None);
                let _ = rules.currency_for(country);
            }
        }
    }
});
