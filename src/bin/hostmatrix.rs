//! hostmatrix: CLI tool for querying and editing hostname rule files.

use clap::{Parser, Subcommand, ValueEnum};
use hostmatrix::matrix::is_storable_hostname;
use hostmatrix::{EngineConfig, Matrix, MatrixSnapshot, RequestType, TextCodec};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hostmatrix")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Query and edit hostname rule matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a request and explain the matching rule
    Resolve {
        /// Source hostname
        src: String,

        /// Destination hostname
        des: String,

        /// Request type
        #[arg(default_value = "*")]
        request_type: String,

        /// Rule text files
        #[arg(short, long)]
        rules: Vec<PathBuf>,

        /// Engine config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Block, allow or clear a cell in a rules file
    Toggle {
        /// Action to apply
        #[arg(value_enum)]
        action: ToggleAction,

        /// Source hostname
        src: String,

        /// Destination hostname
        des: String,

        /// Request type
        #[arg(default_value = "*")]
        request_type: String,

        /// Rules file to rewrite
        #[arg(short, long)]
        rules: PathBuf,
    },

    /// Parse a rules file and write it back normalized
    Normalize {
        /// Input rules file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a rules file to a JSON snapshot
    Export {
        /// Input rules file
        #[arg(short, long)]
        input: PathBuf,

        /// Output snapshot file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert a JSON snapshot to a rules file
    Import {
        /// Input snapshot file
        #[arg(short, long)]
        input: PathBuf,

        /// Output rules file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert an obsolete per-hostname selfie to a rules file
    Migrate {
        /// Input legacy JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output rules file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ToggleAction {
    Block,
    Allow,
    Clear,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            src,
            des,
            request_type,
            rules,
            config,
        } => resolve(&src, &des, &request_type, &rules, config.as_deref()),
        Commands::Toggle {
            action,
            src,
            des,
            request_type,
            rules,
        } => toggle(action, &src, &des, &request_type, &rules),
        Commands::Normalize { input, output } => normalize(&input, output.as_deref()),
        Commands::Export { input, output } => export(&input, &output),
        Commands::Import { input, output } => import(&input, &output),
        Commands::Migrate { input, output } => migrate(&input, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_rules(codec: &TextCodec, matrix: &mut Matrix, path: &Path) -> CliResult {
    let text = fs::read_to_string(path)?;
    let stats = codec.parse_into(matrix, &text);
    log::info!(
        "Loaded {:?}: {} rules, {} skipped",
        path,
        stats.applied,
        stats.skipped
    );
    Ok(())
}

fn check_hostnames(src: &str, des: &str) -> CliResult {
    for hostname in [src, des] {
        if !is_storable_hostname(hostname) {
            return Err(format!("invalid hostname: {:?}", hostname).into());
        }
    }
    Ok(())
}

fn resolve(
    src: &str,
    des: &str,
    request_type: &str,
    rules: &[PathBuf],
    config: Option<&Path>,
) -> CliResult {
    check_hostnames(src, des)?;
    let codec = TextCodec::new();
    let config = match config {
        Some(path) => Some(EngineConfig::load(path)?),
        None => None,
    };

    let mut matrix = match &config {
        Some(config) => config.build_matrix(&codec)?,
        None => Matrix::new(),
    };
    for path in rules {
        load_rules(&codec, &mut matrix, path)?;
    }

    let resolution = matrix.resolve_named(src, des, request_type);
    if resolution.request_type.is_none() {
        return Err(format!("unknown request type: {}", request_type).into());
    }

    match resolution.explain().as_str() {
        "" => println!("unresolved"),
        line => println!("{}", line),
    }

    if let Some(config) = &config {
        println!(
            "effective: {}",
            config.default_policy.decide(resolution.state)
        );
    }
    Ok(())
}

fn toggle(action: ToggleAction, src: &str, des: &str, request_type: &str, rules: &Path) -> CliResult {
    check_hostnames(src, des)?;
    let ty: RequestType = request_type.parse()?;
    let codec = TextCodec::new();

    let mut matrix = Matrix::new();
    if rules.exists() {
        load_rules(&codec, &mut matrix, rules)?;
    }

    let changed = match action {
        ToggleAction::Block => matrix.block_cell(src, des, ty),
        ToggleAction::Allow => matrix.allow_cell(src, des, ty),
        ToggleAction::Clear => matrix.clear_cell(src, des, ty),
    };

    if changed {
        fs::write(rules, codec.render(&matrix) + "\n")?;
        println!("Updated {:?}", rules);
    } else {
        println!("No change");
    }
    println!("now: {}", matrix.resolve(src, des, ty).state);
    Ok(())
}

fn normalize(input: &Path, output: Option<&Path>) -> CliResult {
    let codec = TextCodec::new();
    let mut matrix = Matrix::new();
    load_rules(&codec, &mut matrix, input)?;

    let text = codec.render(&matrix);
    match output {
        Some(path) => {
            fs::write(path, text + "\n")?;
            println!("Successfully normalized {:?} -> {:?}", input, path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn export(input: &Path, output: &Path) -> CliResult {
    let codec = TextCodec::new();
    let mut matrix = Matrix::new();
    load_rules(&codec, &mut matrix, input)?;

    fs::write(output, matrix.to_snapshot().to_json()?)?;
    println!("Successfully exported {:?} -> {:?}", input, output);
    Ok(())
}

fn import(input: &Path, output: &Path) -> CliResult {
    let snapshot = MatrixSnapshot::from_json(&fs::read_to_string(input)?)?;
    let matrix = snapshot.to_matrix()?;

    fs::write(output, TextCodec::new().render(&matrix) + "\n")?;
    println!("Successfully imported {:?} -> {:?} ({} keys)", input, output, matrix.len());
    Ok(())
}

fn migrate(input: &Path, output: &Path) -> CliResult {
    let mut matrix = Matrix::new();
    let written = matrix.migrate_legacy(&fs::read_to_string(input)?)?;

    fs::write(output, TextCodec::new().render(&matrix) + "\n")?;
    println!("Successfully migrated {} cells {:?} -> {:?}", written, input, output);
    Ok(())
}
