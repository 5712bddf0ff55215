//! txnbuf Shell Binary
//!
//! Line-oriented shell over a single write buffer and an in-memory snapshot.
//! Reads commands from stdin, one per line.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use txnbuf::{
    new_buffer, BackendKind, Comparator, Config, Cursor, MemBuffer, SnapshotCursor, UnionIter,
};

/// txnbuf Shell
#[derive(Parser, Debug)]
#[command(name = "txnbuf-shell")]
#[command(about = "Interactive shell for the txnbuf write buffer")]
#[command(version)]
struct Args {
    /// Key order (asc | desc)
    #[arg(short, long, default_value = "asc")]
    order: Comparator,

    /// Buffer backend (btree | skiplog)
    #[arg(short, long, default_value = "btree")]
    backend: BackendKind,

    /// Initial value log capacity in KB (skiplog backend)
    #[arg(short = 'c', long, default_value = "1024")]
    log_capacity_kb: usize,
}

const HELP: &str = "\
commands:
  set <key> <value>     write to the buffer
  get <key>             read from the buffer
  del <key>             tombstone a buffered key
  snap <key> <value>    add a committed entry to the snapshot
  scan [seed]           iterate the buffer from seed
  union [seed]          iterate buffer over snapshot from seed
  release               clear the buffer
  stats                 entry count and size
  help | quit";

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,txnbuf=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("txnbuf shell v{}", txnbuf::VERSION);
    tracing::info!("Order: {}, backend: {}", args.order, args.backend);

    let config = Config::builder()
        .order(args.order)
        .backend(args.backend)
        .log_capacity(args.log_capacity_kb * 1024)
        .build();

    let mut buffer = new_buffer(&config);
    let mut snapshot: Vec<(String, String)> = Vec::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                std::process::exit(1);
            }
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        let output = match parts.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => HELP.to_string(),
            ["set", key, value] => report(buffer.set(key.as_bytes(), value.as_bytes())),
            ["get", key] => match buffer.get(key.as_bytes()) {
                Ok(v) => String::from_utf8_lossy(v).into_owned(),
                Err(e) => format!("(error) {}", e),
            },
            ["del", key] => report(buffer.delete(key.as_bytes())),
            ["snap", key, value] => {
                snapshot.push((key.to_string(), value.to_string()));
                "OK".to_string()
            }
            ["scan", rest @ ..] if rest.len() <= 1 => {
                let seed = rest.first().map(|s| s.as_bytes());
                let mut cursor = buffer.cursor(seed);
                render(&mut cursor)
            }
            ["union", rest @ ..] if rest.len() <= 1 => {
                let seed = rest.first().map(|s| s.as_bytes());
                union_scan(&*buffer, &snapshot, seed)
            }
            ["release"] => {
                buffer.release();
                "OK".to_string()
            }
            ["stats"] => format!(
                "entries={} size={} order={}",
                buffer.len(),
                buffer.size(),
                buffer.order()
            ),
            _ => "(error) unknown command, try 'help'".to_string(),
        };

        if writeln!(stdout, "{}", output).is_err() {
            break;
        }
    }

    tracing::info!("Shell stopped");
}

fn report(result: txnbuf::Result<()>) -> String {
    match result {
        Ok(()) => "OK".to_string(),
        Err(e) => format!("(error) {}", e),
    }
}

fn union_scan(buffer: &dyn MemBuffer, snapshot: &[(String, String)], seed: Option<&[u8]>) -> String {
    let order = buffer.order();
    let clean = SnapshotCursor::new(
        order,
        snapshot
            .iter()
            .filter(|(k, _)| seed.map_or(true, |s| order.compare(k.as_bytes(), s).is_ge()))
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    match UnionIter::new(buffer.raw_cursor(seed), clean, order) {
        Ok(mut iter) => render(&mut iter),
        Err(e) => format!("(error) {}", e),
    }
}

fn render<C: Cursor + ?Sized>(cursor: &mut C) -> String {
    match txnbuf::cursor::collect(cursor) {
        Ok(entries) if entries.is_empty() => "(empty)".to_string(),
        Ok(entries) => entries
            .iter()
            .map(|(k, v)| {
                format!("{} => {}", String::from_utf8_lossy(k), String::from_utf8_lossy(v))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Err(e) => format!("(error) {}", e),
    }
}
