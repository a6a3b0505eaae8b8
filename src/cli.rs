//! Interactive command-line front end.
//!
//! Reads verbs from stdin against one long-lived session. Unrecognized
//! input is treated as dropped file paths and forwarded to the drop
//! listener, so both intake channels are reachable from a terminal.

use crate::compressor::Compressor;
use crate::core::types::OutputFormat;
use crate::intake::{DropEvent, DropListener};
use crate::processing::SidecarEngine;
use crate::services::{default_output_dir, Notice, NoticeLevel, Notifier};
use crate::utils::format_file_size;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

/// Batch image compression driven by an external engine.
#[derive(Parser, Debug)]
#[command(name = "image-compressor", version, about)]
pub struct CliArgs {
    /// Engine executable invoked once per batch.
    #[arg(long, default_value = "image-engine")]
    pub engine: String,

    /// Output directory; defaults to the system download directory.
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Initial output format (jpg, png or webp).
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Initial encoding quality (1-100).
    #[arg(long)]
    pub quality: Option<u8>,
}

/// Notifier printing to the terminal instead of the log, so background
/// rejections show up inline with command output.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => println!("error: {}", notice.message),
        }
    }
}

/// Runs the interactive session until stdin closes or the user quits.
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let engine = Arc::new(SidecarEngine::new(args.engine));
    let compressor = Arc::new(Compressor::new(engine));

    match args.output_dir.or_else(default_output_dir) {
        Some(dir) => compressor.set_output_dir(dir).await,
        None => warn!("No output directory configured; set one before compressing"),
    }

    if args.format.is_some() || args.quality.is_some() {
        let mut options = compressor.options().await;
        if let Some(format) = args.format {
            options.format = format;
        }
        if let Some(quality) = args.quality {
            options.quality = quality;
        }
        compressor.set_options(options).await?;
    }

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let (drops, events) = mpsc::channel(16);
    let listener = DropListener::bind(compressor.clone(), events, notifier.clone());

    println!("image-compressor ready, type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(input) = lines.next_line().await? {
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        match verb {
            "add" => {
                if rest.is_empty() {
                    println!("usage: add <path>...");
                    continue;
                }
                let paths = rest.split_whitespace().map(str::to_string).collect();
                match compressor.register_paths(paths).await {
                    Ok(added) => println!("{} file(s) added", added),
                    Err(e) => println!("error: {}", e),
                }
            }
            "pick" => match compressor.select_files().await {
                Ok(added) => println!("{} file(s) added", added),
                Err(e) => println!("error: {}", e),
            },
            "dir" => {
                if rest.is_empty() {
                    let dir = compressor.output_dir().await;
                    if dir.is_empty() {
                        println!("no output directory set");
                    } else {
                        println!("{}", dir);
                    }
                } else {
                    compressor.set_output_dir(rest).await;
                    println!("output directory set to {}", rest);
                }
            }
            "pickdir" => match compressor.select_output_dir().await {
                Some(dir) => println!("output directory set to {}", dir),
                None => println!("cancelled"),
            },
            "format" => {
                if rest.is_empty() {
                    println!("{}", compressor.options().await.format);
                    continue;
                }
                match rest.parse::<OutputFormat>() {
                    Ok(format) => {
                        let mut options = compressor.options().await;
                        options.format = format;
                        match compressor.set_options(options).await {
                            Ok(()) => println!("format set to {}", format),
                            Err(e) => println!("error: {}", e),
                        }
                    }
                    Err(e) => println!("error: {}", e),
                }
            }
            "quality" => {
                if rest.is_empty() {
                    println!("{}", compressor.options().await.quality);
                    continue;
                }
                match rest.parse::<u8>() {
                    Ok(quality) => {
                        let mut options = compressor.options().await;
                        options.quality = quality;
                        match compressor.set_options(options).await {
                            Ok(()) => println!("quality set to {}", quality),
                            Err(e) => println!("error: {}", e),
                        }
                    }
                    Err(_) => println!("usage: quality <1-100>"),
                }
            }
            "list" => {
                let files = compressor.files().await;
                if files.is_empty() {
                    println!("no files registered");
                }
                for (index, record) in files.iter().enumerate() {
                    println!(
                        "{:>3}  {:>10}  {}",
                        index,
                        format_file_size(record.size),
                        record.path
                    );
                }
            }
            "remove" => match rest.parse::<usize>() {
                Ok(index) => match compressor.remove_file(index).await {
                    Some(record) => println!("removed {}", record.path),
                    None => println!("no file at index {}", index),
                },
                Err(_) => println!("usage: remove <index>"),
            },
            "clear" => {
                compressor.clear().await;
                println!("list cleared");
            }
            "compress" => match compressor.compress().await {
                Ok(summary) => {
                    for result_line in compressor.results().await {
                        println!("{}", result_line);
                    }
                    notifier.notify(Notice::info(format!(
                        "finished: {} succeeded, {} failed",
                        summary.success, summary.failure
                    )));
                }
                Err(e) => println!("error: {}", e),
            },
            "results" => {
                let stored = compressor.results().await;
                if stored.is_empty() {
                    println!("no results yet");
                }
                for result_line in stored {
                    println!("{}", result_line);
                }
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => {
                // Anything else is taken for a drop gesture.
                let paths = input.split_whitespace().map(str::to_string).collect();
                if drops.send(DropEvent { paths }).await.is_err() {
                    warn!("Drop listener is gone, ignoring input");
                }
            }
        }
    }

    listener.close().await;
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  add <path>...    register images by path");
    println!("  pick             choose images with the system dialog");
    println!("  dir [path]       show or set the output directory");
    println!("  pickdir          choose the output directory with the system dialog");
    println!("  format [fmt]     show or set the output format: jpg, png, webp");
    println!("  quality [1-100]  show or set the encoding quality");
    println!("  list             show registered files");
    println!("  remove <index>   drop one file from the list");
    println!("  clear            empty the list and previous results");
    println!("  compress         run the batch through the engine");
    println!("  results          show result lines from the last run");
    println!("  quit             exit");
    println!("anything else is treated as dropped file paths, whitespace separated");
}
