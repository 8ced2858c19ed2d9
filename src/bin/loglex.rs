//! Command-line interface for loglex
//! This binary runs the scrub/scan pipeline over files or stdin so the
//! output of both stages can be inspected.
//!
//! Usage:
//!   loglex scrub `<path>` [--annotations] [--format `<format>`]  - Strip escape sequences
//!   loglex tokens `<path>` [--format `<format>`]                 - Scrub, then classify tokens

use clap::{Arg, ArgAction, Command};
use std::io::{BufRead, BufReader, Read};

use loglex::{scrub, AnnotationList, DataScanner};

fn main() {
    let matches = Command::new("loglex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting scrubbed and tokenized log text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("scrub")
                .about("Strip escape sequences and print the clean text")
                .arg(
                    Arg::new("path")
                        .help("Path to the log file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("annotations")
                        .long("annotations")
                        .short('a')
                        .help("Also print the style/role/origin annotations")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('text' or 'json')")
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Scrub each line, then print its classified tokens")
                .arg(
                    Arg::new("path")
                        .help("Path to the log file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('text' or 'json')")
                        .default_value("text"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("scrub", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            let with_annotations = sub.get_flag("annotations");
            handle_scrub_command(path, format, with_annotations);
        }
        Some(("tokens", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            handle_tokens_command(path, format);
        }
        _ => unreachable!(),
    }
}

/// Read the input line by line, from a file or stdin.
fn read_lines(path: &str) -> Vec<String> {
    let mut source = String::new();
    if path == "-" {
        std::io::stdin()
            .read_to_string(&mut source)
            .unwrap_or_else(|e| {
                eprintln!("Error reading stdin: {}", e);
                std::process::exit(1);
            });
    } else {
        let file = std::fs::File::open(path).unwrap_or_else(|e| {
            eprintln!("Error opening {}: {}", path, e);
            std::process::exit(1);
        });
        let mut reader = BufReader::new(file);
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => source.push_str(&line),
                Err(e) => {
                    eprintln!("Error reading {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
    }
    source.lines().map(str::to_owned).collect()
}

/// Scrub one line, reporting failures on stderr with a nonzero exit.
fn scrub_line(number: usize, line: &str) -> (String, AnnotationList) {
    let mut buffer = line.as_bytes().to_vec();
    let mut annotations = AnnotationList::new();
    if let Err(e) = scrub(&mut buffer, Some(&mut annotations)) {
        eprintln!("Scrub error on line {}: {}", number + 1, e);
        std::process::exit(1);
    }
    let text = String::from_utf8(buffer).unwrap_or_else(|e| {
        eprintln!("Scrub error on line {}: output is not UTF-8: {}", number + 1, e);
        std::process::exit(1);
    });
    (text, annotations)
}

/// Handle the scrub command
fn handle_scrub_command(path: &str, format: &str, with_annotations: bool) {
    for (number, line) in read_lines(path).iter().enumerate() {
        let (text, annotations) = scrub_line(number, line);
        match format {
            "json" => {
                let value = if with_annotations {
                    serde_json::json!({ "text": text, "annotations": annotations })
                } else {
                    serde_json::json!({ "text": text })
                };
                println!("{}", value);
            }
            _ => {
                println!("{}", text);
                if with_annotations {
                    for ann in &annotations {
                        println!("  {:?}", ann);
                    }
                }
            }
        }
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, format: &str) {
    for (number, line) in read_lines(path).iter().enumerate() {
        let (text, _annotations) = scrub_line(number, line);
        let spans: Vec<_> = DataScanner::new(&text).collect();
        match format {
            "json" => {
                let entries: Vec<_> = spans
                    .iter()
                    .map(|span| {
                        serde_json::json!({
                            "name": span.kind.name(),
                            "start": span.start,
                            "end": span.end,
                            "text": span.text(&text),
                        })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(entries));
            }
            _ => {
                for span in &spans {
                    println!(
                        "{}[{},{}) {:?}",
                        span.kind.name(),
                        span.start,
                        span.end,
                        span.text(&text)
                    );
                }
            }
        }
    }
}
