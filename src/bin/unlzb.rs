use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use anyhow::{anyhow, bail, Context, Result};
use lzb::{decompress, Config};

const USAGE: &str = "\
usage: unlzb [OPTIONS] [INPUT [OUTPUT]]

Unpack INPUT (default stdin) into OUTPUT (default stdout). The options
must match the ones the stream was packed with; nothing in the stream
itself says what they were.

  -o BITS   match offset width in bits, 0..=16 (default 8; 0 = RLE)
  -l NUM    longest literal block, 1..=32895 (default 255)
  -m NUM    longest match block, 1..=32895 (default 255)
  -A ADDR   address-relative offsets against ring base ADDR (needs -o 8 or -o 16)
  -n        offset bytes are present even for zero-length matches
  -x        complement offset bytes before use
  -q        quiet
  -v        report sizes
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

fn run<R: Read, W: Write>(cfg: &Config, reader: R, mut writer: BufWriter<W>) -> Result<u64> {
    let produced = decompress(cfg, reader, &mut writer)?;
    writer.flush().context("cannot write output")?;
    Ok(produced)
}

fn main() -> Result<()> {
    let opts = parse_args(std::env::args().skip(1))?;

    let reader: Box<dyn Read> = match &opts.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {:?}", path))?,
        )),
        None => Box::new(io::stdin()),
    };
    let produced = match &opts.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {:?}", path))?;
            run(&opts.cfg, reader, BufWriter::new(file))?
        }
        None => {
            let stdout = io::stdout();
            run(&opts.cfg, reader, BufWriter::new(stdout.lock()))?
        }
    };

    if opts.verbosity >= 2 {
        eprintln!("{} bytes unpacked", produced);
    }
    Ok(())
}
