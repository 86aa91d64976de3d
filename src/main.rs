use std::{env, fs, io::Read, process::exit};

use tribit_vm::{format_output, Listing, Machine, MachineConfig};

fn print_usage() {
    println!("Usage:");
    println!("  tribit-vm [options] [listing]");
    println!();
    println!("Reads the listing from stdin when no file is given.");
    println!();
    println!("Options:");
    println!("  --all              Collect every output instead of halting on the first");
    println!("  --max-steps <N>    Abort after N executed instructions");
    println!("  --help, -h         Show this help");
}

fn read_source(path: Option<&String>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path, e))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(source)
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut config = MachineConfig::default();
    let mut path = None;
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--all" => config.halt_on_output = false,
            "--max-steps" => match it.next().map(|n| n.parse::<usize>()) {
                Some(Ok(n)) => config.max_steps = Some(n),
                _ => {
                    eprintln!("Error: --max-steps expects a number");
                    exit(1);
                }
            },
            _ if arg.starts_with('-') => {
                eprintln!("Error: unknown option {}", arg);
                print_usage();
                exit(1);
            }
            _ => path = Some(arg),
        }
    }

    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let listing: Listing = match source.parse() {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            exit(1);
        }
    };

    match Machine::with_config(listing.registers, config).run(&listing.program) {
        Ok(output) => println!("{}", format_output(&output)),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            exit(1);
        }
    }
}
