use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use tracing::info;

use cutout::app::CutoutApp;
use cutout::engine::{self, EngineOptions};
use cutout::fs_utils::default_output_dir;
use cutout::isolate::{self, IsolatedProcessor};
use cutout::logging;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Drop an image onto the window to remove its background"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    engine: EngineOptions,

    /// Directory for result images (defaults to the system temp directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v: debug for this app, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Worker mode: read an image on stdin, write the cutout PNG to stdout
    #[command(hide = true)]
    RemoveBackground,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match args.command {
        Some(Command::RemoveBackground) => run_worker(&args),
        None => match run_gui(args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_worker(args: &Args) -> ExitCode {
    logging::init_worker(args.verbose);
    let code = isolate::serve(
        &mut std::io::stdin().lock(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr(),
        |image| engine::remove_background(&args.engine, image),
    );
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run_gui(args: Args) -> Result<()> {
    logging::init_gui(args.verbose);

    let mut child_args = args.engine.to_args();
    for _ in 0..args.verbose {
        child_args.push("-v".into());
    }
    child_args.push("remove-background".into());
    let processor = IsolatedProcessor::current_exe(child_args)
        .context("Unable to locate the running executable")?;
    let output_dir = args.output_dir.unwrap_or_else(default_output_dir);
    info!(
        output_dir = %output_dir.display(),
        model = %args.engine.model_url,
        "starting"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cutout Background Remover")
            .with_inner_size([500.0, 400.0])
            .with_min_inner_size([500.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Cutout",
        native_options,
        Box::new(move |cc| {
            let app = CutoutApp::new(cc, Arc::new(processor), output_dir);
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))?;

    Ok(())
}
