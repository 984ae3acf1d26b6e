//! CLI tool for dashgrid - runs the grid pipeline and outputs JSON
//!
//! Usage:
//!   dashgrid_cli <config.json> <rows.json>              # Output JSON to stdout
//!   dashgrid_cli <config.json> <rows.json> -o out.json  # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use dashgrid::{DashGrid, GridCapabilities, GridConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: dashgrid_cli <config.json> <rows.json> [-o output.json]");
        std::process::exit(1);
    }

    let config_path = &args[1];
    let rows_path = &args[2];
    let output_path = if args.len() > 4 && args[3] == "-o" {
        Some(&args[4])
    } else {
        None
    };

    // Read inputs
    let config_json = match fs::read_to_string(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", config_path, e);
            std::process::exit(1);
        }
    };
    let rows_json = match fs::read_to_string(rows_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", rows_path, e);
            std::process::exit(1);
        }
    };

    // Run the pipeline
    let mut grid = DashGrid::new(
        GridConfig::from_json_str(&config_json),
        GridCapabilities::default(),
    );
    grid.set_rows_json(&rows_json);

    let layout = grid.column_layout();
    let rows = grid.visible_rows();
    let output = serde_json::json!({
        "headerRows": layout.header_rows,
        "leafColumns": layout.leaves,
        "rows": rows.as_ref(),
    });

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&output) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
