// SPDX-License-Identifier: Apache-2.0

//! `jzon-dump`: parse a jzon document and print it back, or one value of it.
//!
//! ```sh
//! jzon-dump config.jzon
//! jzon-dump config.jzon --key server.ports.0
//! cat config.jzon | RUST_LOG=debug jzon-dump --stats
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use jzon::allocator::Counting;
use jzon::{Allocator, ParserConfig, Value};
use log::info;

mod pretty;

#[derive(Parser)]
#[command(name = "jzon-dump", version, about = "Parse and pretty-print jzon documents")]
struct Cli {
    /// Input file (reads from stdin if omitted)
    input: Option<PathBuf>,

    /// Dotted path of the value to print; numeric segments index arrays
    #[arg(short, long)]
    key: Option<String>,

    /// Deepest table or array nesting accepted
    #[arg(long, default_value_t = jzon::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Report allocator activity on stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let source = match read_input(cli.input.as_ref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Unable to read input: {e}");
            std::process::exit(1);
        }
    };

    let counter = Counting::new();
    let config = ParserConfig::new().with_max_depth(cli.max_depth);
    let root = match jzon::parse_with_config_in(&source, &counter, config) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: jzon parsing failed: {e}");
            std::process::exit(1);
        }
    };
    info!("parsed {} bytes, {} root members", source.len(), root.size());

    let value = match cli.key.as_deref() {
        None => &root,
        Some(path) => match lookup(&root, path) {
            Some(value) => value,
            None => {
                eprintln!("Error: no value at '{path}'");
                std::process::exit(1);
            }
        },
    };

    match pretty::render(value) {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Error: rendering failed: {e}");
            std::process::exit(1);
        }
    }

    if cli.stats {
        eprintln!(
            "allocations: {}, reallocations: {}, live blocks: {}",
            counter.allocations(),
            counter.reallocations(),
            counter.live()
        );
    }
    jzon::free(root);
    if counter.live() != 0 {
        eprintln!("Error: {} blocks still live after free", counter.live());
        std::process::exit(1);
    }
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

/// Follows a dotted path through tables and arrays.
fn lookup<'v, A: Allocator>(root: &'v Value<A>, path: &str) -> Option<&'v Value<A>> {
    path.split('.').try_fold(root, |value, segment| match value {
        Value::Array(array) => array.get(segment.parse().ok()?),
        _ => value.get(segment),
    })
}
