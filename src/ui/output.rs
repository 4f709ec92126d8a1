use crate::featurizer::containers::FeatureSet;
use ansi_term::Colour;
use chrono::Local;
use std::fs;
use std::path::Path;

pub fn print_results(features: &FeatureSet) {
    println!("\n\u{250F}\u{2501}\u{2501}\u{2501}\u{2501} Results \u{2501}\u{2501} {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    print_core(features);
    print_histograms(features);
}

pub fn print_core(features: &FeatureSet) {
    let ratios = features.ratios();

    println!("\u{2503}");
    println!("\u{2503} Capture Source   : {}", Colour::Red.paint(&features.capture_source));
    println!("\u{2503} Vector Length    : {}", Colour::Fixed(226).paint(features.vector.len().to_string()));
    println!("\u{2503} External Fraction: {}", Colour::Fixed(226).paint(format!("{:.3}", ratios[0])));
    println!("\u{2503} TCP Fraction     : {}", Colour::Fixed(226).paint(format!("{:.3}", ratios[1])));
    println!("\u{2503} UDP Fraction     : {}", Colour::Fixed(226).paint(format!("{:.3}", ratios[2])));
    println!("\u{2503} ICMP Fraction    : {}", Colour::Fixed(226).paint(format!("{:.3}", ratios[3])));
    println!("\u{2503} Private Peers    : {}", Colour::Fixed(226).paint(features.other_addresses.join(", ")));
    println!("\u{2503} ");
}

/// Prints the non-zero histogram bins only; with max_port bins per side the
/// full vector is unreadable on a terminal.
pub fn print_histograms(features: &FeatureSet) {
    println!("\u{2503} Source Ports");
    for (port, fraction) in features.source_ports().iter().enumerate() {
        if *fraction > 0.0 {
            println!("\u{2503}   {:>5} : {:.3}", Colour::Green.paint(port.to_string()), fraction);
        }
    }

    println!("\u{2503} Destination Ports");
    for (port, fraction) in features.destination_ports().iter().enumerate() {
        if *fraction > 0.0 {
            println!("\u{2503}   {:>5} : {:.3}", Colour::Green.paint(port.to_string()), fraction);
        }
    }
    println!("\u{2517}\u{2501}\u{2501}\u{2501}\u{2501}");
}

pub fn data_as_json(features: &FeatureSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(features)
}

pub fn data_to_file(json: String, path: &Path) -> std::io::Result<()> {
    log::info!("Writing features to {}", path.display());
    fs::write(path, json)
}
