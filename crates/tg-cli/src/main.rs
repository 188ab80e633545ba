use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tg_cli::{
    evaluate_json, load_config, render_rules, run_demo, verify_file, with_table_override,
    write_output, EvaluateArgs,
};
use tg_guardrail::TableVariant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn table_arg() -> Arg {
    Arg::new("table")
        .long("table")
        .value_parser(value_parser!(TableVariant))
        .help("Canonical rule table: strict or lenient (overrides the config)")
}

fn cli() -> Command {
    Command::new("tracegate")
        .version(tg_cli::VERSION)
        .about("Connection guardrails and a hash-chained decision ledger for traceability graphs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Governance configuration (TOML)"),
        )
        .subcommand(Command::new("rules").about("Print the rule table in effect").arg(table_arg()))
        .subcommand(
            Command::new("evaluate")
                .about("Evaluate one proposed edge and print the result as JSON")
                .arg(Arg::new("source").long("source").required(true).help("Source node type"))
                .arg(Arg::new("target").long("target").required(true).help("Target node type"))
                .arg(Arg::new("source-label").long("source-label").required(true))
                .arg(Arg::new("target-label").long("target-label").required(true))
                .arg(Arg::new("source-id").long("source-id").help("Stable id of the source node"))
                .arg(Arg::new("target-id").long("target-id").help("Stable id of the target node"))
                .arg(table_arg()),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify a ledger export; exits 1 if the chain is broken")
                .arg(
                    Arg::new("export")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Export JSON file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("demo")
                .about("Record the three-decision scenario and print the export")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the export here instead of stdout"),
                ),
        )
}

fn string_arg(args: &ArgMatches, name: &str) -> Option<String> {
    args.get_one::<String>(name).cloned()
}

async fn run(matches: ArgMatches) -> Result<ExitCode> {
    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)).await?;

    match matches.subcommand() {
        Some(("rules", args)) => {
            let config = with_table_override(config, args.get_one::<TableVariant>("table").copied());
            print!("{}", render_rules(&config.rule_table()));
        }
        Some(("evaluate", args)) => {
            let config = with_table_override(config, args.get_one::<TableVariant>("table").copied());
            let eval_args = EvaluateArgs {
                source: string_arg(args, "source").unwrap_or_default(),
                target: string_arg(args, "target").unwrap_or_default(),
                source_label: string_arg(args, "source-label").unwrap_or_default(),
                target_label: string_arg(args, "target-label").unwrap_or_default(),
                source_id: string_arg(args, "source-id"),
                target_id: string_arg(args, "target-id"),
            };
            println!("{}", evaluate_json(&config, &eval_args)?);
        }
        Some(("verify", args)) => {
            let Some(path) = args.get_one::<PathBuf>("export") else {
                anyhow::bail!("missing export path");
            };
            let report = verify_file(path).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
            if !report.passed() {
                return Ok(ExitCode::from(1));
            }
        }
        Some(("demo", args)) => {
            let export = run_demo(&config)?;
            match args.get_one::<PathBuf>("out") {
                Some(path) => write_output(path, &export).await?,
                None => println!("{export}"),
            }
        }
        _ => anyhow::bail!("no subcommand given"),
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli().get_matches()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
