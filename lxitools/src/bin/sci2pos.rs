//! `sci2pos [-c config.json] [INPUT]`
//!
//! Read a science table as written by `lxi2csv` and print the
//! baseline-corrected x/y hit positions as tab-separated values.
//!
//!     sci2pos run_unit1_sci_output.csv > run_unit1_pos.tsv

use argh::FromArgs;
use anyhow::Result;
use either::{Either, Left, Right};
use std::fs::File;
use std::io::{stdin, stdout, BufReader, Read, Write};

use lxitools::batch;
use lxitools::cfg::DecodeConfig;
use lxitools::{de, ser};

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Compute hit positions from a science table
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// decoding config file (JSON); its histogram and time window apply
    #[argh(option, short = 'c')]
    pub config: Option<String>,
    /// science table; with no input or when input is '-', read from standard input
    #[argh(positional)]
    pub input: Option<String>,
}

fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();
    if args.version {
        let stdout = stdout();
        let mut stdout = stdout.lock();
        writeln!(
            stdout,
            concat!(
                env!("CARGO_BIN_NAME"),
                " ",
                "{}",
            ),
            GIT_VERSION,
        )?;
        return Ok(())
    }

    tracing_subscriber::fmt::init();

    let config = match &args.config {
        Some(p) => DecodeConfig::load(p)?,
        None => DecodeConfig::default(),
    };

    let input: Either<(), String> = match args.input {
        None => Left(()),
        Some(i) if i == "-" => Left(()),
        Some(i) => Right(i),
    };
    let stdin = stdin();
    let iptr: Box<dyn Read> = match input {
        Left(()) => Box::new(stdin.lock()),
        Right(path) => Box::new(BufReader::new(File::open(path)?)),
    };
    let mut rdr = csv::Reader::from_reader(iptr);
    let science = de::sci_csv(&mut rdr)?;
    let science = batch::time_slice(&science, config.t_start, config.t_end);
    let positions = batch::positions(&science, &config.histogram)?;

    let stdout = stdout();
    let stdout = stdout.lock();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(stdout);
    ser::positions_csv(&mut wtr, &science, &positions)?;
    Ok(())
}
