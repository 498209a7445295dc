use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use msgmark_core::{Entity, html, markdown};

#[derive(Clone, Copy)]
enum DialectChoice {
    Html,
    Markdown,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Message {
    text: String,
    entities: Vec<Entity>,
}

fn main() {
    let mut input: Option<String> = None;
    let mut dialect = DialectChoice::Markdown;
    let mut unparse = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--dialect" => {
                dialect = match args.next().as_deref() {
                    Some("html") => DialectChoice::Html,
                    Some("md") | Some("markdown") => DialectChoice::Markdown,
                    _ => {
                        eprintln!("--dialect expects: html | md");
                        print_usage();
                        process::exit(2);
                    }
                };
            }
            "--unparse" => unparse = true,
            _ => {
                if input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
            }
        }
    }

    let source = match input {
        Some(path) => fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(1);
        }),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .unwrap_or_else(|err| {
                    eprintln!("failed to read stdin: {}", err);
                    process::exit(1);
                });
            buffer
        }
    };

    if unparse {
        let message: Message = serde_json::from_str(&source).unwrap_or_else(|err| {
            eprintln!("invalid message JSON: {}", err);
            process::exit(1);
        });
        let rendered = match dialect {
            DialectChoice::Html => html::unparse(&message.text, &message.entities),
            DialectChoice::Markdown => markdown::unparse(&message.text, &message.entities),
        };
        println!("{}", rendered);
        return;
    }

    let (text, entities) = match dialect {
        DialectChoice::Html => html::parse(&source),
        DialectChoice::Markdown => match markdown::parse(&source) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        },
    };
    let message = Message { text, entities };
    match serde_json::to_string_pretty(&message) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("failed to serialize message: {}", err);
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("usage: msgmark-cli [options] [FILE]");
    eprintln!();
    eprintln!("Converts message markup to plain text plus entities (as JSON),");
    eprintln!("or back with --unparse. Reads FILE, or stdin when omitted.");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --dialect html|md   markup dialect (default: md)");
    eprintln!("  --unparse           read {{\"text\", \"entities\"}} JSON, print markup");
    eprintln!("  -h, --help          show this help");
}
