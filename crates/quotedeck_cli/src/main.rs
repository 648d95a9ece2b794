//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quotedeck_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use quotedeck_core::{QuoteDeck, SyncConfig};

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from any embedding UI.
    println!("quotedeck_core ping={}", quotedeck_core::ping());
    println!("quotedeck_core version={}", quotedeck_core::core_version());

    match QuoteDeck::in_memory(SyncConfig::default()) {
        Ok(deck) => {
            println!("quotedeck_core seed_quotes={}", deck.quotes().len());
            println!(
                "quotedeck_core categories={}",
                deck.list_categories().join(",")
            );
        }
        Err(err) => {
            eprintln!("quotedeck_core open failed: {err}");
            std::process::exit(1);
        }
    }
}
