//! `replay` command-line entry point

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use replay_cli::logging::init_tracing;
use replay_cli::{run_simulator, ReplayConfig};
use replay_executor::Fault;
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("replay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Replay pipeline tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("simulate")
                .about("Replay a generated stream and confirm end-of-stream")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("atoms")
                        .long("atoms")
                        .value_parser(value_parser!(u64))
                        .help("Number of recorded atoms to generate"),
                )
                .arg(
                    Arg::new("listeners")
                        .long("listeners")
                        .value_parser(value_parser!(usize))
                        .help("Number of issue listeners to register"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("latency-ms")
                        .long("latency-ms")
                        .value_parser(value_parser!(u64))
                        .help("Delay before each read-back is served"),
                )
                .arg(
                    Arg::new("fault")
                        .long("fault")
                        .value_parser(["none", "corrupt", "abort"])
                        .help("Inject an executor fault"),
                ),
        )
}

/// Merge the config file with command-line overrides
fn load_config(args: &ArgMatches) -> anyhow::Result<ReplayConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ReplayConfig::from_file(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(&atoms) = args.get_one::<u64>("atoms") {
        config.simulate.atoms = atoms;
    }
    if let Some(&listeners) = args.get_one::<usize>("listeners") {
        config.handshake.listeners = listeners;
    }
    if let Some(&seed) = args.get_one::<u64>("seed") {
        config.simulate.seed = seed;
    }
    if let Some(&latency) = args.get_one::<u64>("latency-ms") {
        config.executor.latency_ms = latency;
    }
    if let Some(fault) = args.get_one::<String>("fault") {
        config.executor.fault = match fault.as_str() {
            "corrupt" => Fault::CorruptReadback,
            // Abort halfway through the generated stream.
            "abort" => Fault::AbortAfter {
                commands: config.simulate.atoms / 2,
            },
            _ => Fault::None,
        };
    }
    Ok(config)
}

async fn simulate(args: &ArgMatches) -> anyhow::Result<bool> {
    let config = load_config(args)?;
    init_tracing(&config.log_filter, config.log_json);
    tracing::debug!(?config, "starting simulation");

    let report = run_simulator(config)
        .await
        .context("simulation could not run")?;
    println!("{}", report.generate_text());
    Ok(report.passed())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("simulate", args)) => simulate(args).await,
        _ => Ok(true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "replay failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let matches = cli().get_matches_from([
            "replay",
            "simulate",
            "--atoms",
            "40",
            "--listeners",
            "2",
            "--fault",
            "abort",
        ]);
        let (_, args) = matches.subcommand().unwrap();
        let config = load_config(args).unwrap();

        assert_eq!(config.simulate.atoms, 40);
        assert_eq!(config.handshake.listeners, 2);
        assert_eq!(config.simulate.seed, 42);
        assert_eq!(config.executor.fault, Fault::AbortAfter { commands: 20 });
    }
}
