//! gpgpu kernel translator CLI.

use gpgpuc::commands::{lex_file, pack_file, parse_file, translate_file};
use gpgpuc::DriverError;

fn main() {
    gpgpuc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "translate" => {
            if args.len() < 3 {
                eprintln!("Usage: gpgpuc translate <manifest.json> [-o <out.cl>]");
                std::process::exit(1);
            }
            let mut output = None;
            let mut i = 3;
            while i < args.len() {
                if args[i] == "-o" && i + 1 < args.len() {
                    output = Some(args[i + 1].as_str());
                    i += 2;
                } else {
                    eprintln!("error: unexpected argument '{}'", args[i]);
                    std::process::exit(1);
                }
            }
            translate_file(&args[2], output)
        }
        "pack" => {
            if args.len() < 4 {
                eprintln!("Usage: gpgpuc pack <manifest.json> <args.json>");
                std::process::exit(1);
            }
            pack_file(&args[2], &args[3])
        }
        "lex" | "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: gpgpuc {} <file.js>", args[1]);
                std::process::exit(1);
            }
            if args[1] == "lex" {
                lex_file(&args[2])
            } else {
                parse_file(&args[2])
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        report(&err);
        std::process::exit(1);
    }
}

fn report(err: &DriverError) {
    eprintln!("error: {err}");
}

fn print_usage() {
    println!("gpgpuc - JavaScript kernel subset to OpenCL C");
    println!();
    println!("Usage: gpgpuc <command> [options]");
    println!();
    println!("Commands:");
    println!("  translate <manifest.json> [-o <out.cl>]   Translate a kernel manifest");
    println!("  pack <manifest.json> <args.json>          Pack call arguments as hex");
    println!("  lex <file.js>                             Show the token stream");
    println!("  parse <file.js>                           Show parse statistics");
    println!("  help                                      Show this message");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=gpgpu_codegen=debug) for diagnostics.");
}
