use raven_deco::{
    DecorationError, Result, config::DecorationConfig, replay::Replay, theme::DecorationTheme,
};
use std::{
    backtrace::Backtrace,
    collections::HashMap,
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: raven-deco [--log-file PATH] [--set decoration.KEY=VALUE]... [SCRIPT]";

#[derive(Debug, Default)]
struct Args {
    log_file: Option<PathBuf>,
    overrides: HashMap<String, String>,
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_backtrace_defaults();
    let args = parse_args(std::env::args().skip(1))?;
    init_logging(args.log_file.as_deref())?;
    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!("panic: {panic_info}\n{backtrace}");
        eprintln!("panic: {panic_info}\n{backtrace}");
    }));

    let config = DecorationConfig::from_values(&args.overrides)?;
    let mut replay = Replay::new(DecorationTheme::new(config));
    let stdout = io::stdout().lock();

    match &args.script {
        Some(path) => {
            tracing::info!(path = %path.display(), "replaying script");
            let file = File::open(path).map_err(|err| {
                DecorationError::Io(format!("failed to open {}: {err}", path.display()))
            })?;
            replay.run(BufReader::new(file), stdout)
        }
        None => {
            tracing::info!("replaying script from stdin");
            replay.run(io::stdin().lock(), stdout)
        }
    }
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            "--log-file" => {
                let path = raw.next().ok_or_else(|| {
                    DecorationError::Config(format!("--log-file needs a path\n{USAGE}"))
                })?;
                args.log_file = Some(PathBuf::from(path));
            }
            "--set" => {
                let pair = raw.next().ok_or_else(|| {
                    DecorationError::Config(format!("--set needs KEY=VALUE\n{USAGE}"))
                })?;
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    DecorationError::Config(format!(
                        "invalid override `{pair}`, expected KEY=VALUE"
                    ))
                })?;
                args.overrides.insert(key.trim().to_owned(), value.to_owned());
            }
            flag if flag.starts_with("--") => {
                return Err(DecorationError::Config(format!(
                    "unknown option `{flag}`\n{USAGE}"
                )));
            }
            _ if args.script.is_none() => args.script = Some(PathBuf::from(arg)),
            _ => {
                return Err(DecorationError::Config(format!(
                    "unexpected argument `{arg}`\n{USAGE}"
                )));
            }
        }
    }

    Ok(args)
}

fn init_backtrace_defaults() {
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        // Safety: called at startup before creating any threads.
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
}

const DEFAULT_LOG_FILTER: &str = concat!("raven_deco=info,", "raven_deco::layout=debug");

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name().ok_or_else(|| {
                DecorationError::Io(format!("log file path {} has no file name", path.display()))
            })?;
            fs::create_dir_all(dir).map_err(|err| {
                DecorationError::Io(format!(
                    "failed to create log directory {}: {err}",
                    dir.display()
                ))
            })?;

            let file_appender = tracing_appender::rolling::never(dir, name);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(file_appender),
            )
        }
        None => None,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        tracing::info!(path = %path.display(), "logging initialized");
    }

    Ok(())
}
