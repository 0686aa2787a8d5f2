use anyhow::{Context, Result};
use structopt::StructOpt;

use covidfilter::{filter_table, table, Params};

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "covidfilter",
    about = "Filter rows of surveillance tables (TSV/CSV) and export them as TSV"
)]
struct Opt {
    #[structopt(long, parse(from_os_str), help = "Table to filter (TSV or CSV)")]
    input: PathBuf,
    #[structopt(
        long,
        help = "Format: 'column:value, ~column:value'. '~' drops matching rows, '' means an empty cell"
    )]
    filter: Option<String>,
    #[structopt(
        long,
        parse(from_os_str),
        help = "Parameter table with 'param' and 'value' columns; its 'filter' entry is used when --filter is absent"
    )]
    config: Option<PathBuf>,
    #[structopt(
        long,
        help = "Identifier columns; rows with a blank value in any of them are dropped"
    )]
    index: Vec<String>,
    #[structopt(long, help = "Columns used to sort the output")]
    sortby: Vec<String>,
    #[structopt(long, parse(from_os_str), help = "TSV file with the filtered rows")]
    output: PathBuf,
    #[structopt(short, long)]
    verbose: bool,
}

fn run(opt: &Opt) -> Result<()> {
    let params = match &opt.config {
        Some(path) => Params::load(path)
            .with_context(|| format!("Reading parameter table {}", path.display()))?,
        None => Params::default(),
    };
    let criteria = opt.filter.as_deref().or_else(|| params.filter());

    let mut tbl = table::load(&opt.input)
        .with_context(|| format!("Loading {}", opt.input.display()))?;
    log::info!("Loaded {} rows from {}", tbl.len(), opt.input.display());

    if !opt.index.is_empty() {
        tbl = tbl.retain_nonblank(&opt.index)?;
    }
    tbl = filter_table(&tbl, criteria).context("Filtering rows")?;
    if !opt.sortby.is_empty() {
        tbl = tbl.sorted_by(&opt.sortby)?;
    }

    table::write_tsv(&tbl, &opt.output)
        .with_context(|| format!("Writing {}", opt.output.display()))?;
    log::info!("Wrote {} rows to {}", tbl.len(), opt.output.display());
    Ok(())
}

fn main() {
    let opt = Opt::from_args();
    let log_level = if opt.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&opt) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
