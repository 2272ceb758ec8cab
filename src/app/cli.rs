use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use loto_client::config::GeneratorConfig;

pub const DEFAULT_OWNER: &str = "Yo";

fn filter_args() -> [Arg; 7] {
    [
        Arg::new("sum-min")
            .long("sum-min")
            .value_parser(value_parser!(u16))
            .help("Lowest accepted sum of the six numbers"),
        Arg::new("sum-max")
            .long("sum-max")
            .value_parser(value_parser!(u16))
            .help("Highest accepted sum of the six numbers"),
        Arg::new("no-parity")
            .long("no-parity")
            .action(ArgAction::SetTrue)
            .help("Allow five or six numbers of the same parity"),
        Arg::new("no-endings")
            .long("no-endings")
            .action(ArgAction::SetTrue)
            .help("Allow three or more numbers with the same last digit"),
        Arg::new("no-consecutive")
            .long("no-consecutive")
            .action(ArgAction::SetTrue)
            .help("Allow runs of three consecutive numbers"),
        Arg::new("no-anti-clone")
            .long("no-anti-clone")
            .action(ArgAction::SetTrue)
            .help("Allow exact copies of past drawings"),
        Arg::new("seed")
            .long("seed")
            .value_parser(value_parser!(u64))
            .help("Seed for a reproducible run"),
    ]
}

pub fn cli() -> Command {
    Command::new("loto")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Loto Más combination generator, ledger and match tracker")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Set verbose output level"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Path to loto.toml"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .subcommand(
            Command::new("sync").about("Refresh the stored drawing history").arg(
                Arg::new("source")
                    .long("source")
                    .value_parser(["csv", "remote"])
                    .default_value("csv")
                    .help("Where to read drawings from"),
            ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate combinations for one player")
                .arg(
                    Arg::new("owner")
                        .long("owner")
                        .default_value(DEFAULT_OWNER)
                        .help("Who the combinations are for"),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .value_parser(value_parser!(usize))
                        .help("How many combinations to generate"),
                )
                .args(filter_args()),
        )
        .subcommand(
            Command::new("syndicate")
                .about("Generate one batch and split it among several players")
                .arg(
                    Arg::new("owners")
                        .long("owners")
                        .required(true)
                        .help("Comma separated player names, e.g. \"Ana, Luis\""),
                )
                .arg(
                    Arg::new("per-owner")
                        .long("per-owner")
                        .value_parser(value_parser!(usize))
                        .default_value("1")
                        .help("Combinations per player"),
                )
                .args(filter_args()),
        )
        .subcommand(Command::new("oracle").about("Find ledger entries that matched later drawings"))
        .subcommand(Command::new("vault").about("List the ledger with hit numbers highlighted"))
        .subcommand(Command::new("frequency").about("Show how often each number was drawn"))
        .subcommand(
            Command::new("history").about("Show the latest drawings").arg(
                Arg::new("last")
                    .long("last")
                    .value_parser(value_parser!(i64))
                    .default_value("30")
                    .help("How many drawings to show"),
            ),
        )
}

pub fn log_level(matches: &ArgMatches) -> log::LevelFilter {
    match matches.get_count("verbose") {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Owner labels from a comma separated list; blanks are dropped.
pub fn split_owners(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|owner| !owner.is_empty())
        .collect()
}

/// Generator settings with the command line filter flags applied on top.
pub fn apply_filter_args(matches: &ArgMatches, base: &GeneratorConfig) -> GeneratorConfig {
    let mut config = base.clone();
    if let Some(&sum_min) = matches.get_one::<u16>("sum-min") {
        config.sum_min = sum_min;
    }
    if let Some(&sum_max) = matches.get_one::<u16>("sum-max") {
        config.sum_max = sum_max;
    }
    config.parity &= !matches.get_flag("no-parity");
    config.endings &= !matches.get_flag("no-endings");
    config.consecutive &= !matches.get_flag("no-consecutive");
    config.anti_clone &= !matches.get_flag("no-anti-clone");
    config
}
