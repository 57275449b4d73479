//! `lxi2csv [-u UNIT] [-c config.json] [-o DIR] [-p] FILE...`
//!
//!     lxi2csv -p -o out/ payload_lexi_unit_2_0123.txt.zst

use argh::FromArgs;
use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use lxitools::batch;
use lxitools::cfg::DecodeConfig;
use lxitools::{de, ser, HardwareUnit};

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Decode raw LEXI logger files into science and housekeeping tables.
/// For each input `name.txt` (or archived `name.txt.zst`), writes
/// `name_sci_output.csv` and `name_hk_output.csv`.
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// decoding config file (JSON)
    #[argh(option, short = 'c')]
    pub config: Option<String>,
    /// hardware unit, 1 or 2 (overrides config and file name)
    #[argh(option, short = 'u')]
    pub unit: Option<HardwareUnit>,
    /// directory to write tables to (defaults to each input's directory)
    #[argh(option, short = 'o')]
    pub out: Option<String>,
    /// also write `name_pos_output.csv` with x/y positions
    #[argh(switch, short = 'p')]
    pub positions: bool,
    /// raw logger files
    #[argh(positional)]
    pub input: Vec<String>,
}

fn stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split('.').next() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => name,
    }
}

fn create(dir: &Path, name: String) -> Result<csv::Writer<BufWriter<File>>> {
    let path = dir.join(name);
    let f = File::create(&path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    info!("writing {}", path.display());
    Ok(csv::Writer::from_writer(BufWriter::new(f)))
}

fn convert(path: &Path, config: &DecodeConfig, args: &CliArgs) -> Result<()> {
    let f = File::open(path)?;
    let compressed = path.extension().map_or(false, |e| e == "zst");
    let buf = de::raw(f, compressed)?;

    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let unit = match args.unit {
        Some(u) => u,
        None => config.resolve_unit(name.as_deref()),
    };
    let products = batch::process(&buf, config, unit)?;

    let dir = match &args.out {
        Some(o) => PathBuf::from(o),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    fs::create_dir_all(&dir)?;
    let stem = stem(path);

    let mut wtr = create(&dir, format!("{}_sci_output.csv", stem))?;
    ser::sci_csv(&mut wtr, &products.science, config.decimals)?;
    let mut wtr = create(&dir, format!("{}_hk_output.csv", stem))?;
    ser::hk_csv(&mut wtr, &products.housekeeping, config.decimals)?;
    if args.positions {
        let mut wtr = create(&dir, format!("{}_pos_output.csv", stem))?;
        ser::positions_csv(&mut wtr, &products.science, &products.positions)?;
    }
    Ok(())
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

    if args.input.is_empty() {
        bail!("no input files given");
    }
    let config = match &args.config {
        Some(p) => DecodeConfig::load(p)?,
        None => DecodeConfig::default(),
    };

    for i in args.input.iter() {
        let path = Path::new(i);
        match fs::metadata(path) {
            Ok(m) => {
                if !m.is_file() {
                    bail!("{} is not a file", i);
                }
            },
            Err(e) => bail!(e),
        }
        convert(path, &config, &args)
            .with_context(|| format!("while converting {}", i))?;
    }
    Ok(())
}
