//! List collectors command implementation.

use dtrac_core::CollectorFactory;

fn description(kind: &str) -> &'static str {
    match kind {
        "className" => "class name matches `regex` (case-insensitive)",
        "extends" => "class extends `class`, directly or transitively",
        "implements" => "class implements `interface`, directly or transitively",
        "bool/and" => "every collector in `collectors` matches",
        "bool/or" => "any collector in `collectors` matches",
        "bool/not" => "`collector` does not match",
        _ => "",
    }
}

/// Runs the list-collectors command.
pub fn run() {
    println!("Available collectors:\n");
    println!("{:<12} Description", "Type");
    println!("{}", "-".repeat(80));

    for kind in CollectorFactory::with_builtins().kinds() {
        println!("{:<12} {}", kind, description(kind));
    }

    println!("\nExample:");
    println!("  [[layers.collectors]]");
    println!("  type = \"className\"");
    println!("  regex = \"^App\\\\\\\\Controller\\\\\\\\\"");
}
