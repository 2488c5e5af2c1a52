// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_trip_notes(trips: usize) -> String {
    let mut content = String::from("# Trips\n\n");
    for trip in 0..trips {
        content.push_str(&format!("- trip {trip} {{map}}\n"));
        content.push_str(&format!("  - budget: {}\n", 100 + trip));
        content.push_str("  - days: 3\n");
        content.push_str("  - per day: {budget / days}\n");
        for stop in 0..4 {
            content.push_str(&format!(
                "  - stop {stop}: {:.4}, {:.4}\n",
                50.0 + trip as f64 * 0.01,
                6.0 + stop as f64 * 0.01
            ));
            content.push_str("    - note: {lookup('budget') * 2}\n");
        }
        content.push('\n');
    }
    content
}

#[allow(dead_code)]
pub fn generate_deep_outline(depth: usize) -> String {
    let mut content = String::new();
    for level in 0..depth {
        content.push_str(&"  ".repeat(level));
        content.push_str(&format!("- level{level}: {{{level} + 1}}\n"));
    }
    content
}
