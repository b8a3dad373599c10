use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use isle_edit::Terrain;
use isle_mesh_cpu::Minimap;
use isle_runtime::{build_mesh_pool, load_script_from_path, replay};
use isle_world::{World, WorldGenParams, load_params_from_path};

#[derive(Parser)]
#[command(name = "isle", about = "Procedural island terrain: generate, inspect and replay edits")]
struct Cli {
    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an island and optionally dump it.
    Generate {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// World generation TOML.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the heightfield as text.
        #[arg(long)]
        ascii: bool,
        /// Export the minimap as a PPM image.
        #[arg(long)]
        minimap: Option<PathBuf>,
    },
    /// Replay an edit script through a host and its peers and compare state hashes.
    Replay {
        script: PathBuf,
        /// Overrides the script's world seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Overrides the script's world generation TOML.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overrides the script's peer count.
        #[arg(long)]
        peers: Option<usize>,
        /// Mesh worker threads.
        #[arg(long, default_value_t = 2)]
        threads: usize,
    },
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            simplelog::WriteLogger::init(
                log::LevelFilter::Debug,
                simplelog::Config::default(),
                File::create(path)?,
            )?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }
    Ok(())
}

fn load_params(config: Option<&Path>) -> Result<WorldGenParams, Box<dyn Error>> {
    match config {
        Some(path) => {
            let params = load_params_from_path(path)?;
            log::info!("loaded world config from {}", path.display());
            Ok(params)
        }
        None => Ok(WorldGenParams::default()),
    }
}

fn generate(seed: u64, config: Option<&Path>, ascii: bool, minimap: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let world = World::new(seed, load_params(config)?);
    let terrain = Terrain::generate(&world);
    if ascii {
        print!("{}", terrain.ascii());
    }
    if let Some(path) = minimap {
        Minimap::new(&terrain).write_ppm(path)?;
        log::info!("minimap written to {}", path.display());
    }
    println!("{:016x}", isle_runtime::terrain_hash(&terrain));
    Ok(())
}

struct ReplayArgs<'a> {
    script: &'a Path,
    seed: Option<u64>,
    config: Option<&'a Path>,
    peers: Option<usize>,
    threads: usize,
}

fn run_replay(args: ReplayArgs<'_>) -> Result<bool, Box<dyn Error>> {
    let script_path = args.script;
    let script = load_script_from_path(script_path)?;
    // Config paths inside a script are relative to the script.
    let config = match args.config {
        Some(p) => Some(p.to_path_buf()),
        None => script.world.as_ref().map(|p| match script_path.parent() {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.clone(),
        }),
    };
    let world = World::new(args.seed.unwrap_or(script.seed), load_params(config.as_deref())?);
    let (peers, threads) = (args.peers, args.threads);
    let peers = peers.unwrap_or(script.peers);
    let outcome = replay(&world, &script.edits, peers, build_mesh_pool(threads)?)?;
    for (i, e) in &outcome.rejected {
        println!("edit {} rejected: {}", i, e);
    }
    println!("host  {:016x}", outcome.host_hash);
    for (i, h) in outcome.peer_hashes.iter().enumerate() {
        println!("peer{} {:016x}", i, h);
    }
    println!(
        "applied {} of {}, {}",
        outcome.applied,
        script.edits.len(),
        if outcome.in_sync() { "in sync" } else { "DESYNC" }
    );
    Ok(outcome.in_sync())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("logging setup failed: {}", e);
    }
    let result = match cli.command {
        Command::Generate {
            seed,
            config,
            ascii,
            minimap,
        } => generate(seed, config.as_deref(), ascii, minimap.as_deref()),
        Command::Replay {
            script,
            seed,
            config,
            peers,
            threads,
        } => match run_replay(ReplayArgs {
            script: &script,
            seed,
            config: config.as_deref(),
            peers,
            threads,
        }) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(2),
            Err(e) => Err(e),
        },
    };
    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
