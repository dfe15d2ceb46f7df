use std::env;

use swmm_reader::{ObjectKind, SeriesRequest, SwmmReader};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} <catalog|variables|extract> <path-to-out-file> [labels...]",
            args[0]
        );
        eprintln!("  extract labels have the form TYPE,NAME,VARINDEX, e.g. node,C64,1");
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let path = &args[2];

    let reader = match SwmmReader::new(path) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("ERROR: Failed to open output file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    match command {
        "catalog" => {
            println!("TYPE,NAME");
            for kind in ObjectKind::ALL {
                for name in reader.objects(kind) {
                    println!("{},{}", kind, name);
                }
            }
        }
        "variables" => {
            println!("TYPE,DESCRIPTION,VARINDEX");
            for kind in ObjectKind::REPORTED {
                for (index, (_, label)) in reader.variables(kind).iter().enumerate() {
                    println!("{},{},{}", kind, label, index);
                }
            }
        }
        "extract" => {
            let requests: Result<Vec<SeriesRequest>, _> =
                args[3..].iter().map(|label| label.parse()).collect();
            let requests = match requests {
                Ok(requests) => requests,
                Err(e) => {
                    eprintln!("ERROR: {}", e);
                    std::process::exit(1);
                }
            };
            let table = match reader.bulk_series(&requests) {
                Ok(table) => table,
                Err(e) => {
                    eprintln!("ERROR: Extraction failed");
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            };
            let headings: Vec<&str> = table.columns.iter().map(|c| c.label.as_str()).collect();
            println!("Datetime,{}", headings.join(","));
            for (row, timestamp) in table.timestamps.iter().enumerate() {
                let values: Vec<String> = table
                    .columns
                    .iter()
                    .map(|c| c.values[row].to_string())
                    .collect();
                println!("{},{}", timestamp, values.join(","));
            }
        }
        other => {
            eprintln!("ERROR: Unknown command \"{}\"", other);
            std::process::exit(1);
        }
    }
}
