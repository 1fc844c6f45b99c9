extern crate combattb;

use std::env;
use std::path::Path;
use std::process;

use anyhow::{Context, anyhow};
use getopts::{Options, ParsingStyle};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use combattb::bio::util::format_fasta;
use combattb::config::Config;
use combattb::constants::FEATURE;
use combattb::ids::derive_dns_id;
use combattb::load::{read_batch, Loader};
use combattb::{canonical_schema, GraphStore};

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_DATABASE_FILE: &str = "combat_tb.sqlite3";

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] ACTION [ARGS]\n\n\
                         Actions:\n    \
                           init                          create the store tables\n    \
                           describe                      print the schema as JSON\n    \
                           load FILE                     load a JSON record batch\n    \
                           residues UNIQUENAME [UP DOWN] print feature residues as FASTA\n    \
                           derive-id NAME                print the UUID derived from NAME",
                        program);
    print!("{}", opts.usage(&brief));
}

fn parse_offset(arg: Option<&String>) -> anyhow::Result<i64> {
    match arg {
        Some(arg) => arg.parse().with_context(|| format!("failed to parse offset: {}", arg)),
        None => Ok(0),
    }
}

fn open_store(config: &Config, maybe_db_file: Option<String>) -> anyhow::Result<GraphStore> {
    let db_file = maybe_db_file.unwrap_or_else(|| config.database_file_or(DEFAULT_DATABASE_FILE));
    let mut store = GraphStore::open(Path::new(&db_file))
        .with_context(|| format!("failed to open {}", db_file))?;
    store.init()?;
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("combattb=info,combat_tb_schema=info"))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();
    let opts = opts.parsing_style(ParsingStyle::StopAtFirstFree);

    opts.optflag("h", "help", "print this help message");
    opts.optflag("V", "version", "print the version");
    opts.optopt("c", "config-file", "JSON configuration file", "CONFIG");
    opts.optopt("d", "database-file", "SQLite database file for the graph store", "DB_FILE");

    let program = args[0].clone();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            print_usage(&program, opts);
            println!("\nerror: {}", e);
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        print_usage(&program, opts);
        process::exit(0);
    }

    if matches.opt_present("version") {
        println!("{} v{}", PKG_NAME, VERSION);
        process::exit(0);
    }

    let config =
        match matches.opt_str("config-file") {
            Some(config_file_name) => Config::read(&config_file_name)
                .with_context(|| format!("failed to read {}", config_file_name))?,
            None => Config::default(),
        };

    let mut remaining_args = matches.free.clone();

    if remaining_args.is_empty() {
        println!("needs an ACTION argument");
        print_usage(&program, opts);
        process::exit(1);
    }

    let action = remaining_args.remove(0);
    let db_file = matches.opt_str("database-file");

    let registry = canonical_schema()?;

    match action.as_str() {
        "init" => {
            let mut store = open_store(&config, db_file)?;
            let organism_ids = Loader::new(&mut store, &registry)
                .load_organisms(&config.organisms)?;
            println!("store initialised with {} organisms", organism_ids.len());
        },
        "describe" => {
            println!("{}", serde_json::to_string_pretty(&registry)?);
        },
        "load" => {
            let file_name = remaining_args.first()
                .ok_or_else(|| anyhow!("load needs a FILE argument"))?;
            let batch = read_batch(Path::new(file_name))
                .with_context(|| format!("failed to read batch {}", file_name))?;
            let mut store = open_store(&config, db_file)?;
            let summary = Loader::new(&mut store, &registry)
                .with_cardinality_check(config.load.check_cardinalities)
                .load_batch(&batch)?;
            println!("loaded {} nodes and {} edges from {}",
                     summary.nodes, summary.edges, file_name);
        },
        "residues" => {
            let uniquename = remaining_args.first()
                .ok_or_else(|| anyhow!("residues needs a UNIQUENAME argument"))?;
            let upstream_offset = parse_offset(remaining_args.get(1))?;
            let downstream_offset = parse_offset(remaining_args.get(2))?;

            let store = open_store(&config, db_file)?;
            let feature_id =
                store.find_by_unique(&registry, FEATURE, "uniquename", &json!(uniquename))?
                .ok_or_else(|| anyhow!("no feature with uniquename: {}", uniquename))?;
            let kind = store.node(feature_id)?.record.kind;
            let residues = store.get_residues(&registry, feature_id,
                                              upstream_offset, downstream_offset)?;
            print!("{}", format_fasta(uniquename, Some(&*kind), &residues,
                                      config.load.fasta_line_width));
        },
        "derive-id" => {
            let name = remaining_args.first()
                .ok_or_else(|| anyhow!("derive-id needs a NAME argument"))?;
            println!("{}", derive_dns_id(name));
        },
        _ => {
            println!("unknown action {}", action);
            print_usage(&program, opts);
            process::exit(1);
        },
    }

    Ok(())
}
