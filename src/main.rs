use clap::{Args, Parser, Subcommand};
use crudgen::{
    config::{write_config, CodegenConfig, DEFAULT_CONFIG_FILE},
    entity_schema::{list_entity_files, normalize, read_entity, resolve_entity_file},
    page_generator::PageGenerator,
    validation::{validate_entity_file, validate_templates},
    Result,
};
use log::{error, info, LevelFilter};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Parser)]
#[command(name = "crudgen", version, about = "Generate CRUD pages from JHipster entity descriptors")]
struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, global = true, env = "CRUDGEN_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate pages for one entity, or for every descriptor
    Generate {
        /// Entity name (`CallType`, `call-type`); all entities when omitted
        entity: Option<String>,

        /// Overwrite existing route directories
        #[arg(long)]
        force: bool,

        /// Render everything but write nothing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// Check descriptors and templates without writing output
    Validate {
        entity: Option<String>,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// List descriptors and the route each one generates
    List {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Write a default configuration file
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct PathArgs {
    #[arg(long)]
    entities_dir: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    templates_dir: Option<PathBuf>,
}

impl PathArgs {
    fn apply(self, config: &mut CodegenConfig) {
        if let Some(dir) = self.entities_dir {
            config.entities_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(dir) = self.templates_dir {
            config.templates_dir = Some(dir);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(err) = run(cli) {
        error!("{err}");
        process::exit(1);
    }
}

fn load_config(cli_config: &Path, paths: PathArgs) -> Result<CodegenConfig> {
    let mut config = CodegenConfig::load(cli_config)?;
    paths.apply(&mut config);

    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init { force } => {
            write_config(&cli.config, &CodegenConfig::default(), force)?;
            println!("wrote {}", cli.config.display());
        }
        Command::Generate {
            entity,
            force,
            dry_run,
            paths,
        } => {
            let mut config = load_config(&cli.config, paths)?;
            config.force |= force;

            let generator = PageGenerator::new(&config)?.dry_run(dry_run);
            let reports = match entity {
                Some(name) => vec![generator.generate_entity(&name)?],
                None => generator.generate_all()?,
            };

            for report in &reports {
                let verb = if report.dry_run { "would write" } else { "wrote" };
                println!(
                    "{}: {verb} {} files under {}",
                    report.entity,
                    report.files.len(),
                    report.route_dir.display()
                );
            }
        }
        Command::Validate { entity, paths } => {
            let config = load_config(&cli.config, paths)?;

            let source = config.template_source();
            validate_templates(&source)?;
            info!("templates ok ({source})");

            let files = match entity {
                Some(name) => vec![resolve_entity_file(&config.entities_dir, &name)?],
                None => list_entity_files(&config.entities_dir)?,
            };
            for path in &files {
                validate_entity_file(path)?;
                println!("ok {}", path.display());
            }
        }
        Command::List { paths } => {
            let config = load_config(&cli.config, paths)?;

            for path in list_entity_files(&config.entities_dir)? {
                let meta = normalize(&read_entity(&path)?, &config.api_import_base);
                println!(
                    "{:<32} {}",
                    meta.class_name,
                    config.route_dir(&meta.route_name).display()
                );
            }
        }
    }

    Ok(())
}
