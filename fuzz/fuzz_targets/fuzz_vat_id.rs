#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = invotax::normalize_vat_id(s);
        assert_eq!(invotax::normalize_vat_id(&normalized), normalized);
        assert_eq!(
            invotax::is_likely_valid_vat(Some(s)),
            invotax::is_likely_valid_vat(Some(&normalized))
        );
        let _ = invotax::vat_country_code(s);
    }
});
