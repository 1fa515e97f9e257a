//! Hashcash CLI
//!
//! Mints and checks hashcash stamps from the command line.
//!
//! # Commands
//!
//! - `mint` - Mint a stamp for a resource
//! - `verify` - Check a stamp, exit status 1 when it is not worth its bits
//! - `inspect` - Show the fields and digest of a stamp
//! - `benchmark` - Measure hash rate and mint time
//! - `init-config` - Write a default config file

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hashcash::algorithm::{
    parse_date, DatePrecision, MintRequest, MintedStamp, Minter, Stamp, StampFormat, StampHasher,
};
use hashcash::config::{default_config_path, ensure_config_dir, Config};

#[derive(Parser)]
#[command(name = "hashcash")]
#[command(version)]
#[command(about = "Mint and verify hashcash proof-of-work stamps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a stamp for a resource
    Mint {
        /// Resource the stamp is bound to, e.g. an email address
        #[arg(short, long)]
        resource: String,

        /// Leading zero bits (default: from config)
        #[arg(short, long)]
        bits: Option<u32>,

        /// Stamp layout: 0 or 1 (default: from config)
        #[arg(short, long)]
        format: Option<StampFormat>,

        /// Date field width: day, minute or second
        #[arg(long)]
        precision: Option<DatePrecision>,

        /// Stamp date as YYMMDD[hhmm[ss]] (default: now)
        #[arg(long)]
        date: Option<String>,

        /// Number of parallel searches, 0 for one per CPU core (default: from config, or one)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Seed the random source for a reproducible stamp
        #[arg(long)]
        seed: Option<u64>,

        /// Give up after this many attempts
        #[arg(long)]
        max_attempts: Option<u64>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Check a stamp
    Verify {
        /// The stamp, without any header name
        stamp: String,

        /// Bits required of version 0 stamps (default: from config)
        #[arg(long)]
        legacy_bits: Option<u32>,
    },

    /// Show the fields and digest of a stamp
    Inspect {
        /// The stamp, without any header name
        stamp: String,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes to compute
        #[arg(short, long, default_value = "1000000")]
        count: u32,
    },

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Mint {
            resource,
            bits,
            format,
            precision,
            date,
            threads,
            seed,
            max_attempts,
            timeout,
        } => load_config(cli.config.as_ref()).and_then(|mut config| {
            if let Some(attempts) = max_attempts {
                config.max_attempts = attempts;
            }
            if timeout.is_some() {
                config.timeout_secs = timeout;
            }
            if let Some(threads) = threads {
                config.threads = Some(if threads == 0 { num_cpus::get() } else { threads });
            }
            let options = MintOptions {
                resource,
                bits,
                format,
                precision,
                date,
                seed,
            };
            cmd_mint(&config, options)
        }),
        Commands::Verify { stamp, legacy_bits } => {
            load_config(cli.config.as_ref()).and_then(|mut config| {
                if let Some(bits) = legacy_bits {
                    config.legacy_bits = bits;
                }
                cmd_verify(&config, &stamp)
            })
        }
        Commands::Inspect { stamp } => {
            load_config(cli.config.as_ref()).and_then(|config| cmd_inspect(&config, &stamp))
        }
        Commands::Benchmark { count } => {
            load_config(cli.config.as_ref()).and_then(|config| cmd_benchmark(&config, count))
        }
        Commands::InitConfig { force } => cmd_init_config(cli.config, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let path = path.cloned().unwrap_or_else(default_config_path);
    debug!(path = %path.display(), "loading config");
    Config::load_or_default(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

struct MintOptions {
    resource: String,
    bits: Option<u32>,
    format: Option<StampFormat>,
    precision: Option<DatePrecision>,
    date: Option<String>,
    seed: Option<u64>,
}

fn cmd_mint(config: &Config, options: MintOptions) -> anyhow::Result<()> {
    config.validate()?;

    let bits = options.bits.unwrap_or(config.minter.default_bits);
    let format = options.format.unwrap_or(config.minter.default_format);
    let date = match options.date.as_deref() {
        Some(text) => parse_date(text)?,
        None => chrono::Local::now().naive_local(),
    };

    let mut request = MintRequest::new(options.resource, bits, date, format);
    if let Some(precision) = options.precision {
        request = request.with_precision(precision);
    }

    let mut minter = match options.seed {
        Some(seed) => Minter::from_seed(seed).with_config(config.minter.clone()),
        None => Minter::from_entropy_with_config(config.minter.clone())?,
    };

    let limits = config.search_limits();
    let workers = config.threads.unwrap_or(1);
    info!(%format, bits, workers, "minting stamp");

    let start = Instant::now();
    let minted = mint_with_workers(&mut minter, &request, &limits, workers)?;
    let elapsed = start.elapsed();

    info!(
        attempts = minted.attempts,
        elapsed_ms = elapsed.as_millis() as u64,
        "stamp found"
    );
    println!("{}", minted.stamp);

    Ok(())
}

#[cfg(feature = "parallel")]
fn mint_with_workers(
    minter: &mut Minter,
    request: &MintRequest,
    limits: &hashcash::algorithm::SearchLimits,
    workers: usize,
) -> anyhow::Result<MintedStamp> {
    if workers > 1 {
        Ok(minter.mint_parallel(request, limits, workers)?)
    } else {
        Ok(minter.mint(request, limits)?)
    }
}

#[cfg(not(feature = "parallel"))]
fn mint_with_workers(
    minter: &mut Minter,
    request: &MintRequest,
    limits: &hashcash::algorithm::SearchLimits,
    workers: usize,
) -> anyhow::Result<MintedStamp> {
    if workers > 1 {
        tracing::warn!(workers, "built without parallel support, using one search");
    }
    Ok(minter.mint(request, limits)?)
}

fn cmd_verify(config: &Config, stamp: &str) -> anyhow::Result<()> {
    let report = config.verifier().inspect(stamp)?;
    if !report.valid {
        anyhow::bail!(
            "stamp has {} leading zero bits, {} required",
            report.leading_zero_bits,
            report.required_bits
        );
    }
    println!("valid ({} bits)", report.required_bits);
    Ok(())
}

fn cmd_inspect(config: &Config, text: &str) -> anyhow::Result<()> {
    let stamp = Stamp::parse(text)?;
    let report = config.verifier().inspect(text)?;

    println!("Format:        version {}", stamp.format());
    println!("Date:          {}", stamp.date_text());
    if let Ok(date) = stamp.date() {
        println!("               {}", date);
    }
    println!("Resource:      {}", stamp.resource());
    println!("Random:        {}", stamp.random_text());
    match (stamp.counter_text(), stamp.legacy_counter()) {
        (Some(counter), _) => println!("Counter:       {}", counter),
        (None, Some(counter)) => println!("Counter:       {}", counter),
        (None, None) => {}
    }
    println!("Required bits: {}", report.required_bits);
    println!("Digest:        {}", hex::encode(report.digest));
    println!("Zero bits:     {}", report.leading_zero_bits);
    println!("Valid:         {}", report.valid);

    Ok(())
}

fn cmd_benchmark(config: &Config, count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} hashes...", count);

    let mut hasher = StampHasher::new();
    let mut input = b"1:20:240101:foo.bar@foobar.com::benchmark:".to_vec();
    let base = input.len();

    let start = Instant::now();
    for i in 0..count {
        input.truncate(base);
        input.extend_from_slice(&i.to_le_bytes());
        let _ = hasher.hash(&input);
    }
    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total hashes: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);

    let bits = config.minter.default_bits;
    let expected = Duration::from_secs_f64(2f64.powi(bits as i32) / hashrate);
    println!("\nExpected mint time at {} bits: {:.2}s", bits, expected.as_secs_f64());

    Ok(())
}

fn cmd_init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => ensure_config_dir()?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite it.",
            path.display()
        );
    }

    Config::default().save(&path)?;
    println!("Config written to {}", path.display());

    Ok(())
}
