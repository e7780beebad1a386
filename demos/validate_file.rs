use std::process::ExitCode;

use isdoc::core::*;

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: validate_file <invoice.isdoc> [tolerance]");
        return ExitCode::from(2);
    };

    let mut options = ValidationOptions::default();
    if let Some(tolerance) = std::env::args().nth(2) {
        match tolerance.parse() {
            Ok(t) => options = options.with_tolerance(t),
            Err(e) => {
                eprintln!("invalid tolerance '{tolerance}': {e}");
                return ExitCode::from(2);
            }
        }
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::from(2);
        }
    };

    // ── 1. Parse ──────────────────────────────────────────────────────
    let invoice = match isdoc::decode(&bytes) {
        Ok(inv) => inv,
        Err(e) => {
            println!("=== Parse Error ===");
            println!("  {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("=== {} ({:?}) ===", invoice.id, invoice.document_type);
    println!("  Supplier: {}", invoice.supplier.party_name.name);
    match (&invoice.customer, &invoice.anonymous_customer_party) {
        (Some(customer), _) => println!("  Customer: {}", customer.party_name.name),
        (None, Some(anonymous)) => println!("  Customer: anonymous ({})", anonymous.id),
        (None, None) => {}
    }
    println!("  Lines:    {}", invoice.lines.len());
    println!(
        "  Payable:  {} {}",
        format_amount(invoice.legal_monetary_total.payable_amount),
        invoice.local_currency_code
    );

    // ── 2. Validate ───────────────────────────────────────────────────
    let report = isdoc::validate_invoice(&invoice, &options);
    if report.valid {
        println!("\nValid.");
        return ExitCode::SUCCESS;
    }
    println!("\n=== {} Finding(s) ===", report.findings.len());
    for f in &report.findings {
        println!("  {f}");
    }
    ExitCode::FAILURE
}
