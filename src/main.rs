use surround::generator::{self, ProjectSpec};
use surround::utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "surround",
    about = "Scaffold validator/estimator pipeline projects",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new pipeline project from the bundled templates
    Init {
        /// Project name; the directory and crate name are its kebab-case form
        name: String,
        /// Directory the project directory is created in
        #[arg(long, default_value = ".")]
        output: std::path::PathBuf,
        /// Generate the simple entry point bound to this runner type instead of `--mode` dispatch
        #[arg(long, value_name = "TYPE")]
        runner_class: Option<String>,
        /// Module holding the runner type (defaults to the snake_case runner type)
        #[arg(long, value_name = "MODULE", requires = "runner_class")]
        runner_file: Option<String>,
        /// Depend on a local surround checkout instead of the registry release
        #[arg(long, value_name = "DIR")]
        surround_path: Option<std::path::PathBuf>,
        /// Print planned files without writing them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_tracing(args.verbose);

    match args.command {
        Commands::Init {
            name,
            output,
            runner_class,
            runner_file,
            surround_path,
            dry_run,
        } => {
            info!(
                name = %name,
                ?output,
                ?runner_class,
                ?runner_file,
                ?surround_path,
                dry_run,
                "starting init"
            );
            let mut spec = match runner_class.as_deref() {
                Some(class) => ProjectSpec::simple(&name, class, runner_file.as_deref()),
                None => ProjectSpec::mode_dispatch(&name),
            };
            if let Some(path) = surround_path {
                spec = spec.with_surround_path(path);
            }
            let result = generator::generate_project(&spec, &output, dry_run)?;

            for file in &result.files {
                println!("{}", result.project_dir.join(&file.path).display());
            }
            if dry_run {
                info!("dry-run completed; nothing written");
            } else {
                info!(path = %result.project_dir.display(), "project created");
            }
        }
    }

    Ok(())
}
