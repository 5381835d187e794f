//! ibmon - live throughput monitor for one InfiniBand / RoCE port.
//!
//! Usage:
//!   ibmon                      # first ACTIVE device, port 1, 1s interval
//!   ibmon -d mlx5_1 -p 2       # explicit device and port
//!   ibmon -i 0.25 -u bytes     # faster refresh, byte units
//!   ibmon --csv rates.csv      # also log every sample to CSV

use std::fs::OpenOptions;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tikv_jemallocator::Jemalloc;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ibmon::collector::{RealFs, SYSFS_IB_ROOT, Sampler, active_devices, resolve_port};
use ibmon::fmt::Units;
use ibmon::storage::DEFAULT_HISTORY_CAPACITY;
use ibmon::tui::{App, AppConfig, Background, CsvConfig, MIN_INTERVAL, install_panic_hook};

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Exit code for invalid arguments.
const EXIT_USAGE: i32 = 2;

/// Longest accepted sampling interval.
const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Copy, ValueEnum)]
enum UnitsArg {
    Bits,
    Bytes,
}

#[derive(Clone, Copy, ValueEnum)]
enum BgArg {
    Black,
    Terminal,
}

/// Live throughput monitor for an InfiniBand port.
#[derive(Parser)]
#[command(name = "ibmon", about = "InfiniBand port throughput monitor")]
struct Args {
    /// Device name (e.g. mlx5_0). Defaults to the first ACTIVE device.
    #[arg(short, long)]
    device: Option<String>,

    /// Port number.
    #[arg(short, long, default_value_t = 1)]
    port: u32,

    /// Sampling interval in seconds.
    #[arg(short, long, default_value_t = 1.0)]
    interval: f64,

    /// Rate units.
    #[arg(short, long, value_enum, default_value_t = UnitsArg::Bits)]
    units: UnitsArg,

    /// Background color mode.
    #[arg(long, value_enum, default_value_t = BgArg::Black)]
    bg: BgArg,

    /// Log every sample to this CSV file.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Append to the CSV file instead of truncating it.
    #[arg(long, requires = "csv")]
    csv_append: bool,

    /// Write the CSV header even when appending.
    #[arg(long, requires = "csv")]
    csv_headers: bool,

    /// Stop after this many seconds (0 = run until quit).
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    duration: f64,

    /// Root of the InfiniBand sysfs tree.
    #[arg(long, default_value = SYSFS_IB_ROOT)]
    sysfs_root: PathBuf,

    /// Number of samples kept for the charts.
    #[arg(long, value_name = "SAMPLES", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history: usize,

    /// Write logs to this file (logs are discarded otherwise).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn usage_error(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(EXIT_USAGE);
}

/// Checks numeric arguments and returns the interval and optional run
/// duration.
fn validate(args: &Args) -> (Duration, Option<Duration>) {
    if args.port == 0 {
        usage_error("--port must be greater than 0");
    }
    if args.history == 0 {
        usage_error("--history must be greater than 0");
    }
    let interval = match parse_seconds(args.interval) {
        Some(d) if args.interval > 0.0 && d <= MAX_INTERVAL => d.max(MIN_INTERVAL),
        _ => usage_error(&format!(
            "--interval must be a positive number of seconds up to {}",
            MAX_INTERVAL.as_secs()
        )),
    };
    let duration = match parse_seconds(args.duration) {
        Some(d) if d.is_zero() => None,
        Some(d) => Some(d),
        None => usage_error("--duration must be a non-negative number of seconds"),
    };
    (interval, duration)
}

/// Converts seconds to a `Duration`; `None` for negative, non-finite or
/// out-of-range values.
fn parse_seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

/// Sets up tracing. The TUI owns the terminal, so output goes to a file or
/// nowhere.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> io::Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
    }
    Ok(())
}

/// Keeps a fatal message on screen when launched from a terminal.
fn wait_for_enter() {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Press Enter to exit.");
        let _ = stdin.lock().read_line(&mut String::new());
    }
}

fn main() {
    let args = Args::parse();
    let (interval, duration) = validate(&args);

    if let Err(e) = init_logging(args.verbose, args.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let fs = RealFs::new();
    let device = match args.device.clone() {
        Some(device) => device,
        None => {
            let devices = active_devices(&fs, &args.sysfs_root);
            if devices.len() > 1 {
                info!(?devices, "several active devices, using {}", devices[0]);
            }
            match devices.into_iter().next() {
                Some(device) => device,
                None => usage_error(&format!(
                    "no ACTIVE device found under {}; use --device",
                    args.sysfs_root.display()
                )),
            }
        }
    };

    let port = match resolve_port(&fs, &args.sysfs_root, &device, args.port) {
        Ok(port) => port,
        Err(e) => {
            eprintln!("Error: {}", e);
            wait_for_enter();
            std::process::exit(1);
        }
    };
    let sampler = match Sampler::prime(&fs, port.paths.clone()) {
        Ok(sampler) => sampler,
        Err(e) => {
            eprintln!("Error: failed to read initial counters: {}", e);
            std::process::exit(1);
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("failed to install signal handler: {}", e);
    }

    let config = AppConfig {
        interval,
        duration,
        units: match args.units {
            UnitsArg::Bits => Units::Bits,
            UnitsArg::Bytes => Units::Bytes,
        },
        background: match args.bg {
            BgArg::Black => Background::Black,
            BgArg::Terminal => Background::Terminal,
        },
        history_capacity: args.history,
        csv: args.csv.map(|path| CsvConfig {
            path,
            append: args.csv_append,
            force_header: args.csv_headers,
        }),
    };

    let app = App::new(fs, port, sampler, config, stop);

    install_panic_hook();
    if let Err(e) = app.run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("ibmon").chain(extra.iter().copied()))
    }

    #[test]
    fn test_parse_seconds_rejects_unrepresentable() {
        assert_eq!(parse_seconds(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(parse_seconds(0.0), Some(Duration::ZERO));
        assert_eq!(parse_seconds(-1.0), None);
        assert_eq!(parse_seconds(f64::NAN), None);
        assert_eq!(parse_seconds(f64::INFINITY), None);
        assert_eq!(parse_seconds(1e20), None);
    }

    #[test]
    fn test_validate_defaults() {
        let (interval, duration) = validate(&args(&[]));
        assert_eq!(interval, Duration::from_secs(1));
        assert_eq!(duration, None);
    }

    #[test]
    fn test_validate_clamps_tiny_interval() {
        let (interval, duration) = validate(&args(&["-i", "1e-10", "--duration", "2.5"]));
        assert_eq!(interval, MIN_INTERVAL);
        assert_eq!(duration, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_validate_keeps_large_representable_duration() {
        // Beyond the range of Instant; the app treats it as unbounded.
        let (_, duration) = validate(&args(&["--duration", "1e19"]));
        assert_eq!(duration, Some(Duration::from_secs(10_000_000_000_000_000_000)));
    }
}
