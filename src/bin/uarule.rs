//! uarule: classify user agent strings from the command line.

use ahash::AHashMap;
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uarule::{match_range, CacheConfig, Comparable, DefaultLogger, Parser, ParserConfig};

#[derive(ClapParser)]
#[command(name = "uarule")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Classify user agent strings with ordered regex rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify user agents given as arguments, or one per stdin line
    Parse {
        /// YAML rule definitions (built-in rules when omitted)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Print one JSON object per input
        #[arg(long)]
        json: bool,

        /// Reorder rules by match frequency while parsing
        #[arg(long)]
        sort: bool,

        /// Log every match and miss
        #[arg(short, long)]
        debug: bool,

        /// User agent strings
        inputs: Vec<String>,
    },

    /// Classify stdin lines and report family counts and final rule order
    Stats {
        /// YAML rule definitions (built-in rules when omitted)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Number of families to print
        #[arg(short, long, default_value_t = 20)]
        top: usize,
    },

    /// Check whether a value lies inside an interval expression
    Range {
        /// Interval expression, e.g. "[1.0,2.0)"
        expr: String,

        /// Value to test
        value: String,

        /// Compare as integers instead of dotted versions
        #[arg(long)]
        int: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            rules,
            json,
            sort,
            debug,
            inputs,
        } => {
            let config = ParserConfig::default()
                .with_use_sort(sort)
                .with_debug(debug)
                .with_logger(Arc::new(DefaultLogger));
            parse_inputs(rules.as_deref(), config, json, &inputs)
        }
        Commands::Stats { rules, top } => print_stats(rules.as_deref(), top),
        Commands::Range { expr, value, int } => {
            let value = if int {
                match value.trim().parse::<i64>() {
                    Ok(v) => Comparable::Integer(v),
                    Err(e) => {
                        eprintln!("Error: invalid integer {:?}: {}", value, e);
                        std::process::exit(1);
                    }
                }
            } else {
                Comparable::Version(value)
            };
            let inside = match_range(&expr, &value);
            println!("{}", inside);
            if !inside {
                std::process::exit(1);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_parser(rules: Option<&Path>, config: ParserConfig) -> uarule::Result<Parser> {
    match rules {
        Some(path) => Parser::from_file(path, config),
        None => Parser::from_embedded(config),
    }
}

fn stdin_lines() -> impl Iterator<Item = String> {
    io::stdin()
        .lock()
        .lines()
        .map_while(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
}

fn parse_inputs(
    rules: Option<&Path>,
    config: ParserConfig,
    json: bool,
    inputs: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = load_parser(rules, config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut emit = |line: &str| -> Result<(), Box<dyn std::error::Error>> {
        let ua = parser.parse(line);
        if json {
            serde_json::to_writer(&mut out, &*ua)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", ua)?;
        }
        Ok(())
    };

    if inputs.is_empty() {
        for line in stdin_lines() {
            emit(line.as_str())?;
        }
    } else {
        for line in inputs {
            emit(line.as_str())?;
        }
    }
    Ok(())
}

fn print_stats(rules: Option<&Path>, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    // Every line is counted once per rule scan, so skip the cache
    let config = ParserConfig::default()
        .with_use_sort(true)
        .with_cache(CacheConfig::no_cache());
    let parser = load_parser(rules, config)?;

    let mut families: AHashMap<String, usize> = AHashMap::new();
    let mut total = 0usize;
    for line in stdin_lines() {
        let ua = parser.parse(&line);
        *families.entry(ua.family.clone()).or_default() += 1;
        total += 1;
    }

    let mut counts: Vec<(String, usize)> = families.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!("Classified {} user agents into {} families", total, counts.len());
    for (family, count) in counts.iter().take(top) {
        println!("{:>10}  {}", count, family);
    }

    println!("\nRule order ({} pending misses):", parser.misses());
    for rule in parser.rules().iter().filter(|r| r.matches() > 0) {
        println!("{:>10}  {}", rule.matches(), rule.expr());
    }
    Ok(())
}
