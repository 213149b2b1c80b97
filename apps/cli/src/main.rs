#![deny(warnings)]

//! Headless CLI: sell desserts from the terminal and print the running totals.

use anyhow::Result;
use dessert_core::dessert_catalog;
use dessert_share::{share_summary, ShareTarget, WriterTarget};
use dessert_store::{SaleState, SaleStateStore};
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    sells: u64,
    interactive: bool,
    share: bool,
    json: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Args {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--sells" => out.sells = it.next().and_then(|s| s.parse().ok()).unwrap_or(0),
            "--interactive" | "-i" => out.interactive = true,
            "--share" => out.share = true,
            "--json" => out.json = true,
            "--version" | "-V" => out.version = true,
            _ => {}
        }
    }
    out
}

fn render_hud(state: &SaleState) -> String {
    format!(
        "Desserts sold: {} | Total revenue: ${} | Now selling: {} ({}) at ${}",
        state.desserts_sold,
        state.revenue,
        state.active_entry.id,
        state.active_entry.image_ref,
        state.active_entry.price
    )
}

/// Drive the store from line-oriented input: blank line or `t` taps, `s`
/// shares, `q` quits.
fn run_interactive<R: BufRead, W: Write>(
    store: &mut SaleStateStore,
    input: R,
    out: &mut W,
    share: &mut dyn ShareTarget,
) -> Result<()> {
    writeln!(out, "{}", render_hud(store.state()))?;
    for line in input.lines() {
        match line?.trim() {
            "" | "t" => {
                let state = store.sell();
                writeln!(out, "{}", render_hud(state))?;
            }
            "s" => {
                if let Err(notice) = share_summary(&mut *share, store.state()) {
                    writeln!(out, "{notice}")?;
                }
            }
            "q" => break,
            other => writeln!(out, "unknown command: {other} (enter/t = tap, s = share, q = quit)")?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup; logs go to stderr so stdout stays parseable with --json
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1));
    if args.version {
        println!(
            "dessert-clicker {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(?args, "starting CLI");

    let mut store = SaleStateStore::new(dessert_catalog());
    for _ in 0..args.sells {
        store.sell();
    }

    let stdout = std::io::stdout();
    if args.interactive {
        let mut share = WriterTarget::new(std::io::stdout());
        run_interactive(&mut store, std::io::stdin().lock(), &mut stdout.lock(), &mut share)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(store.state())?);
    } else if !args.interactive {
        println!("{}", render_hud(store.state()));
    }

    if args.share {
        let mut share = WriterTarget::new(stdout.lock());
        if let Err(notice) = share_summary(&mut share, store.state()) {
            eprintln!("{notice}");
        }
    }
    Ok(())
}
