use std::path::PathBuf;

use avatar_stack::commands::{self, CommandError, RenderOptions};
use avatar_stack::{logging, preferences};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Render and inspect avatar stack scenes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one scene to a PNG file
    Render {
        scene: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Device pixels per logical pixel (defaults to the saved preference)
        #[arg(long)]
        scale: Option<f32>,
    },
    /// Print the arrangement and overflow of a scene without drawing it
    Describe { scene: PathBuf },
    /// Render every *.toml scene in a directory
    Batch {
        dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        scale: Option<f32>,
    },
    /// Show the saved preview preferences
    Config {
        /// Restore the default preferences
        #[arg(long)]
        reset: bool,
    },
}

fn main() -> Result<(), String> {
    logging::init();
    let cli = Cli::parse();
    run(cli).map_err(|err| commands::error_chain(&err))
}

fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Render {
            scene,
            output,
            scale,
        } => {
            let prefs = preferences::load();
            let options = RenderOptions::from_preferences(&prefs, scale);
            commands::render(&scene, &output, &options, commands::image_loader(&prefs))?;
            println!("{}", output.display());
        }
        Commands::Describe { scene } => {
            println!("{}", commands::describe(&scene)?);
        }
        Commands::Batch { dir, output, scale } => {
            let prefs = preferences::load();
            let options = RenderOptions::from_preferences(&prefs, scale);
            let report = commands::batch(&dir, &output, &options, commands::image_loader(&prefs))?;
            for path in &report.rendered {
                println!("{}", path.display());
            }
            for (scene, err) in &report.failed {
                eprintln!("{}: {}", scene.display(), commands::error_chain(err));
            }
            if !report.failed.is_empty() {
                return Err(CommandError::BatchFailed {
                    failed: report.failed.len(),
                    total: report.total(),
                });
            }
        }
        Commands::Config { reset } => {
            let text = if reset {
                commands::reset_config()?
            } else {
                commands::show_config(&preferences::load())?
            };
            println!("{text}");
        }
    }
    Ok(())
}
