#![no_main]

use libfuzzer_sys::fuzz_target;

const VALID: &str = include_str!("../../tests/fixtures/valid.isdoc");

fn check(xml: &[u8]) {
    if let Ok(invoice) = isdoc::decode(xml) {
        let report = isdoc::validate_invoice(&invoice, &isdoc::ValidationOptions::default());
        assert_eq!(report.valid, report.findings.is_empty());
    }
}

fuzz_target!(|data: &[u8]| {
    check(data);

    // Short inputs double as a unit price, reaching the arithmetic rules
    // with amounts of any magnitude.
    if let Ok(amount) = std::str::from_utf8(data) {
        if amount.len() <= 64 {
            let xml = VALID.replacen(
                "<UnitPrice>1000.00</UnitPrice>",
                &format!("<UnitPrice>{amount}</UnitPrice>"),
                1,
            );
            check(xml.as_bytes());
        }
    }
});
