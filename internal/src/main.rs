use std::fs::{self, File};
use std::io::{BufWriter, Read};
use std::path::Path;
use std::sync::Arc;

use solver::telemetry::BufferedTelemetry;
use solver::RunHooks;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <input_file>", args[0]);
        std::process::exit(1)
    }

    let path = &args[1];

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            println!("Error: {}", error);
            std::process::exit(1)
        }
    };

    let mut input_data = String::new();
    file.read_to_string(&mut input_data)
        .expect("Error reading input file");
    let input_data: serde_json::Value =
        serde_json::from_str(&input_data).expect("Error parsing JSON");
    println!("\n---------- RUN: {} ----------", path);

    let telemetry = Arc::new(BufferedTelemetry::new());
    let output = match internal::run(input_data, RunHooks::with_telemetry(telemetry.clone())) {
        Ok(output) => output,
        Err(error) => {
            println!("Error: {}", error);
            std::process::exit(1)
        }
    };

    // output path with sub-directory creation
    let output_dir_name = "output";
    let output_path = ensure_output_path(path, output_dir_name, "output_", "");
    let file = File::create(output_path).expect("Error creating file");
    serde_json::to_writer_pretty(file, &output).expect("Error writing JSON");

    let telemetry_path = ensure_output_path(path, output_dir_name, "telemetry_", ".jsonl");
    let file = File::create(telemetry_path).expect("Error creating file");
    telemetry
        .write_json_lines(BufWriter::new(file))
        .expect("Error writing telemetry");

    std::process::exit(0)
}

fn ensure_output_path(input_path: &str, output_dir_name: &str, prefix: &str, suffix: &str) -> String {
    let file_name = Path::new(input_path)
        .file_name()
        .expect("Error getting file name")
        .to_str()
        .expect("Error converting file name to string");
    let output_path = format!("{}/{}{}{}", output_dir_name, prefix, file_name, suffix);
    if let Some(parent_dir) = Path::new(&output_path).parent() {
        fs::create_dir_all(parent_dir).expect("Error creating directories");
    }
    output_path
}
