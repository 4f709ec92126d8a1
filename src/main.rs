mod featurizer;
mod ui;

use clap::{ArgAction, Parser};
use featurizer::core;
use ui::output;

/// flowvec turns captured network sessions into classifier feature vectors
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON session dump to featurize
    #[arg(short = 'f', long, value_parser)]
    file: String,

    /// Capture source MAC; resolved from the sessions when omitted
    #[arg(short = 's', long, value_parser)]
    source: Option<String>,

    /// Maximum port with a dedicated histogram bin, default is 1024
    #[arg(short = 'p', long, default_value_t = core::DEFAULT_MAX_PORT, value_parser)]
    max_port: usize,

    /// Display output as formatted JSON
    #[arg(short = 'j', long, action = ArgAction::SetTrue)]
    json: bool,

    /// Directory to write features.json to
    #[arg(short = 'o', long, value_parser)]
    output_dir: Option<String>,
}

fn main() {
    simple_logger::init_with_env().unwrap();

    let args = Args::parse();
    let out;

    if let Some(out_dir) = args.output_dir.as_deref() {
        log::info!("Output directory {out_dir}");
        let _ = std::fs::create_dir_all(out_dir);
        out = Some(out_dir);
    } else {
        out = None;
    }

    let sessions = match featurizer::utils::load_file(&args.file) {
        Ok(sessions) => sessions,
        Err(err) => {
            log::error!("Error loading session dump: {err}");
            std::process::exit(1);
        }
    };

    let features = core::extract_features(&sessions, args.source.as_deref(), args.max_port);

    // ---- Output ----
    if args.json {
        let json = match output::data_as_json(&features) {
            Ok(json) => json,
            Err(err) => {
                log::error!("Error serializing features: {err}");
                std::process::exit(1);
            }
        };
        if let Some(out_dir) = out {
            let _ = output::data_to_file(json, std::path::Path::new(&format!("{out_dir}/features.json")));
        } else {
            println!("{json}");
        }
    } else {
        output::print_results(&features);
        if let Some(out_dir) = out {
            if let Ok(json) = output::data_as_json(&features) {
                let _ = output::data_to_file(json, std::path::Path::new(&format!("{out_dir}/features.json")));
            }
        }
    }
}
