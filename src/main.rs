use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::process;

use lineq::{Filter, Lexer, Parser, Stats};

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args[1..]) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("lineq: {}", e);
            process::exit(2);
        }
    }
}

fn run(args: &[String]) -> Result<i32, Box<dyn std::error::Error>> {
    let mut field_delim: Option<u8> = None;
    let mut query_source: Option<String> = None;
    let mut input_files: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if arg == "--help" || arg == "-h" {
            print_help();
            return Ok(0);
        }

        if arg == "--version" {
            println!("lineq {}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }

        if arg == "-F" {
            i += 1;
            if i >= args.len() {
                return Err("option -F requires an argument".into());
            }
            field_delim = Some(parse_delim(&args[i])?);
        } else if let Some(delim) = arg.strip_prefix("-F") {
            field_delim = Some(parse_delim(delim)?);
        } else if arg == "-q" {
            i += 1;
            if i >= args.len() {
                return Err("option -q requires an argument".into());
            }
            query_source = Some(fs::read_to_string(&args[i])?);
        } else if arg == "--" {
            // End of options
            i += 1;
            if query_source.is_none() {
                if i >= args.len() {
                    break;
                }
                query_source = Some(args[i].clone());
                i += 1;
            }
            input_files.extend(args[i..].iter().cloned());
            break;
        } else if arg.starts_with('-') && arg != "-" {
            return Err(format!("unknown option: {}", arg).into());
        } else if query_source.is_none() {
            // First non-option argument is the query
            query_source = Some(arg.clone());
        } else {
            // Rest are input files
            input_files.push(arg.clone());
        }

        i += 1;
    }

    let query_source = query_source.ok_or("no query provided")?;

    // Compile the query; any error here is fatal before a line is read
    let mut lexer = Lexer::new(&query_source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    let query = parser.parse()?;

    let mut filter = Filter::new(query);
    if let Some(delim) = field_delim {
        filter.set_field_delim(delim);
    }

    let stdout = io::stdout();
    let mut output = stdout.lock();
    let stderr = io::stderr();
    let mut diagnostics = stderr.lock();

    let mut matched = 0;
    if input_files.is_empty() {
        let stdin = io::stdin();
        matched += filter.run(stdin.lock(), &mut output, &mut diagnostics)?.matched;
    } else {
        for filename in &input_files {
            let stats: Stats = if filename == "-" {
                let stdin = io::stdin();
                filter.run(stdin.lock(), &mut output, &mut diagnostics)?
            } else {
                let file = File::open(filename)?;
                filter.run(BufReader::new(file), &mut output, &mut diagnostics)?
            };
            matched += stats.matched;
        }
    }

    // Plumbing-friendly exit, like grep: 0 if anything matched, 1 otherwise
    Ok(if matched > 0 { 0 } else { 1 })
}

fn parse_delim(s: &str) -> Result<u8, Box<dyn std::error::Error>> {
    let bytes = s.as_bytes();
    if bytes.len() != 1 {
        return Err(format!("field delimiter must be a single byte: '{}'", s).into());
    }
    Ok(bytes[0])
}

fn print_help() {
    println!(
        r#"Usage: lineq [OPTIONS] 'query' [file ...]

A streaming line filter: tokenizes each line into fields (bare tokens,
quoted strings, numbers, key=value pairs) and prints the lines matched
by the query, unchanged.

Options:
  -F delim       Set the field delimiter (a single byte, default space)
  -q queryfile   Read the query from a file
  --version      Print version information
  --help         Print this help message

Query language:
  key=error && msg~"timeout"      comparison and regex predicates
  retries >= 3 || level in (warn, error)
  -(level=debug)                  negation
  0=error                         0-based positional field reference

Examples:
  lineq 'level=error' app.log
  tail -f app.log | lineq 'status>=500 && path~"^/api"'
  lineq -F, 'user=alice' records.csv
"#
    );
}
