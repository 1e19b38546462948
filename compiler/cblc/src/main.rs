//! cblc: expand COBOL copybooks from the command line.

use cblc::commands::{
    analyze_file, analyze_files, map_offset, parse_options, render_diagnostics, CommandError,
};
use cblc::{init_tracing, AnalysisFragment};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "expand" => {
            let fragment = load(&args[2..], "cblc expand <file> [options]");
            eprint!("{}", render_diagnostics(&fragment.diagnostics));
            print!("{}", fragment.extended_text);
        }
        "check" => {
            let usage = "cblc check <file>... [options]";
            let options = parse_options(&args[2..]).unwrap_or_else(|err| fail(&err, usage));
            let fragments = analyze_files(&options).unwrap_or_else(|err| fail(&err, usage));
            let mut failed = false;
            for fragment in &fragments {
                print!("{}", render_diagnostics(&fragment.diagnostics));
                if fragment.has_errors() {
                    failed = true;
                    continue;
                }
                let copybooks = cbl_ir::copy_nodes(&fragment.root_nodes).count();
                println!("OK: {} ({copybooks} copy statements)", fragment.uri);
            }
            if failed {
                std::process::exit(1);
            }
        }
        "map" => {
            let usage = "cblc map <file> <offset> [options]";
            let options = parse_options(&args[2..]).unwrap_or_else(|err| fail(&err, usage));
            let Some(offset) = options.rest.first() else {
                eprintln!("error: missing offset");
                eprintln!("Usage: {usage}");
                std::process::exit(1);
            };
            let fragment = analyze_file(&options).unwrap_or_else(|err| fail(&err, usage));
            match map_offset(&fragment, offset) {
                Ok(origin) => println!("{origin}"),
                Err(err) => fail(&err, usage),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("cblc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn load(args: &[String], usage: &str) -> AnalysisFragment {
    let options = parse_options(args).unwrap_or_else(|err| fail(&err, usage));
    analyze_file(&options).unwrap_or_else(|err| fail(&err, usage))
}

fn fail(err: &CommandError, usage: &str) -> ! {
    eprintln!("error: {err}");
    if matches!(err, CommandError::Usage(_)) {
        eprintln!("Usage: {usage}");
    }
    std::process::exit(1);
}

fn print_usage() {
    println!("cblc: COBOL copybook expansion");
    println!();
    println!("Usage: cblc <command> <file> [options]");
    println!();
    println!("Commands:");
    println!("  expand <file>           Print the program with every copybook expanded");
    println!("  check <file>...         Report copybook and copy statement diagnostics");
    println!("  map <file> <offset>     Show where an offset of the expanded text comes from");
    println!("  help                    Show this help message");
    println!("  version                 Show version information");
    println!();
    println!("Options:");
    println!("  --copybooks=<dir>       Copybook search directory (repeatable)");
    println!("  --dialect-copybooks=<dialect>:<dir>");
    println!("                          Directory searched first for one dialect's copybooks");
    println!("  --dialect=<names>       Enable dialects: IDMS, DaCo (comma separated)");
    println!("  --mode=<mode>           Copybook processing: enabled (default), disabled");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=cbl_copybook=debug   Log copybook resolution");
    println!("  CBL_LOG_TREE=1                Indent log output by include depth");
    println!();
    println!("Examples:");
    println!("  cblc expand prog.cbl --copybooks=copy");
    println!("  cblc check prog.cbl other.cbl --dialect=IDMS,DaCo");
    println!("  cblc expand prog.cbl --dialect=IDMS --dialect-copybooks=IDMS:idms");
    println!("  cblc map prog.cbl 1024 --copybooks=copy");
}
