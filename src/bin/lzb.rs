use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use anyhow::{anyhow, bail, Context, Result};
use lzb::{compress, Config};

const USAGE: &str = "\
usage: lzb [OPTIONS] [INPUT [OUTPUT]]

Pack INPUT (default stdin) into OUTPUT (default stdout).

  -o BITS   match offset width in bits, 0..=16 (default 8; 0 = RLE)
  -l NUM    longest literal block, 1..=32895 (default 255)
  -m NUM    longest match block, 1..=32895 (default 255)
  -A ADDR   address-relative offsets against ring base ADDR (needs -o 8 or -o 16)
  -n        emit offset bytes even for zero-length matches
  -x        complement offset bytes on the wire
  -q        quiet
  -v        report sizes and block counts
  -d        also dump block length histograms
  -h        show this help
";

struct Opts {
    cfg: Config,
    verbosity: u32,
    input: Option<String>,
    output: Option<String>,
}

fn numeric(value: Option<String>, flag: &str) -> Result<u32> {
    let value = value.ok_or_else(|| anyhow!("bad usage: {} needs a value", flag))?;
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.with_context(|| format!("bad usage: {} got a non-numeric value {:?}", flag, value))
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Opts> {
    let mut opts = Opts {
        cfg: Config::default(),
        verbosity: 1,
        input: None,
        output: None,
    };
    let mut files = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => {
                opts.cfg.offset_bits(numeric(args.next(), "-o")?);
            }
            "-l" => {
                opts.cfg.max_literal_len(numeric(args.next(), "-l")?);
            }
            "-m" => {
                opts.cfg.max_match_len(numeric(args.next(), "-m")?);
            }
            "-A" => {
                opts.cfg.relative_base(numeric(args.next(), "-A")?);
            }
            "-n" => {
                opts.cfg.zero_offset(true);
            }
            "-x" => {
                opts.cfg.exor_offset(true);
            }
            "-q" => opts.verbosity = 0,
            "-v" => opts.verbosity = 2,
            "-d" => opts.verbosity = 3,
            "-h" | "--help" => {
                print!("{}", USAGE);
                std::process::exit(0);
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                bail!("bad usage: unknown option {:?}\n{}", arg, USAGE);
            }
            _ => files.push(arg),
        }
    }
    if files.len() > 2 {
        bail!("bad usage: at most one input and one output file\n{}", USAGE);
    }
    let mut files = files.into_iter();
    opts.input = files.next().filter(|f| f != "-");
    opts.output = files.next().filter(|f| f != "-");
    opts.cfg.validate()?;
    Ok(opts)
}

fn read_input(path: &Option<String>) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    match path {
        Some(path) => {
            File::open(path)
                .and_then(|mut f| f.read_to_end(&mut data))
                .with_context(|| format!("cannot read {:?}", path))?;
        }
        None => {
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("cannot read stdin")?;
        }
    }
    Ok(data)
}

fn dump_histogram(kind: &str, hist: &[u32]) {
    eprintln!("{} length histogram:", kind);
    for (len, &count) in hist.iter().enumerate() {
        if count > 0 {
            eprintln!("  {:5}: {}", len, count);
        }
    }
}

fn main() -> Result<()> {
    let opts = parse_args(std::env::args().skip(1))?;
    let data = read_input(&opts.input)?;

    let stats = match &opts.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {:?}", path))?;
            let mut writer = BufWriter::new(file);
            let stats = compress(&opts.cfg, &data, &mut writer)?;
            writer.flush().with_context(|| format!("cannot write {:?}", path))?;
            stats
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let stats = compress(&opts.cfg, &data, &mut writer)?;
            writer.flush().context("cannot write stdout")?;
            stats
        }
    };

    if opts.verbosity == 1 {
        eprintln!(
            "{} -> {} bytes ({:.2}%)",
            stats.input_bytes,
            stats.output_bytes,
            stats.ratio() * 100.0
        );
    } else if opts.verbosity >= 2 {
        eprintln!("{}", stats);
    }
    if opts.verbosity >= 3 {
        dump_histogram("literal", &stats.literal_lengths);
        dump_histogram("match", &stats.match_lengths);
    }
    Ok(())
}
