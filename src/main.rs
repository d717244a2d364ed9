use clap::{Parser, Subcommand};
use lzodyn::library::LzoLibrary;
use lzodyn::lzop::{LzopReader, LzopStrategy, LzopWriter};
use lzodyn::registry;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lzodyn", about = "LZO codec bridge over a dynamically loaded liblzo2")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into lzop format
    Compress {
        input: PathBuf,
        /// Output path (default: <input>.lzo)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Strategy: lzo1x_1 (default), lzo1x_15, lzo1x_999
        #[arg(short, long, default_value = "lzo1x_1")]
        strategy: String,
        /// Compression level 1-9 (honored by lzo1x_999 only)
        #[arg(short, long)]
        level: Option<i32>,
        /// Block size in KiB
        #[arg(long, default_value = "256")]
        block_size: usize,
    },
    /// Decompress an lzop-format file
    Decompress {
        input: PathBuf,
        /// Output path (default: <input> minus its .lzo suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print both algorithm selector tables
    Algorithms,
    /// Show the resolved native library and its version
    Info,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Commands::Compress { input, output, strategy, level, block_size } => {
            let strategy = LzopStrategy::from_name(&strategy)
                .ok_or_else(|| format!("unknown strategy '{strategy}'"))?;
            if level.is_some() && strategy != LzopStrategy::Lzo1x999 {
                return Err("compression levels are honored by lzo1x_999 only".into());
            }
            let output = output.unwrap_or_else(|| {
                let mut p = input.clone().into_os_string();
                p.push(".lzo");
                PathBuf::from(p)
            });

            let mut reader = BufReader::new(File::open(&input)?);
            let out = BufWriter::new(File::create(&output)?);
            let mut writer = LzopWriter::with_block_size(out, strategy, block_size * 1024)?;
            writer.set_compression_level(level);
            std::io::copy(&mut reader, &mut writer)?;
            writer.finish()?;
            println!("  compressed  {} -> {}", input.display(), output.display());
        }

        Commands::Decompress { input, output } => {
            let output = match output {
                Some(p) => p,
                None => match input
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_suffix(".lzo"))
                {
                    Some(stem) if !stem.is_empty() => input.with_file_name(stem),
                    _ => return Err("cannot infer output name; pass --output".into()),
                },
            };
            let mut reader = LzopReader::new(BufReader::new(File::open(&input)?))?;
            let mut out = BufWriter::new(File::create(&output)?);
            std::io::copy(&mut reader, &mut out)?;
            out.flush()?;
            println!("  decompressed  {} -> {}", input.display(), output.display());
        }

        Commands::Algorithms => {
            println!("compressors ({} selectors):", registry::COMPRESSORS.len());
            for (i, c) in registry::COMPRESSORS.iter().enumerate() {
                match c.fixed_level {
                    Some(l) => println!(
                        "  {i:>2}  {:<22} wrkmem {:>8}  level {l:>2}",
                        c.symbol, c.working_memory
                    ),
                    None => println!(
                        "  {i:>2}  {:<22} wrkmem {:>8}",
                        c.symbol, c.working_memory
                    ),
                }
            }
            println!("decompressors ({} selectors):", registry::DECOMPRESSORS.len());
            for (i, d) in registry::DECOMPRESSORS.iter().enumerate() {
                println!("  {i:>2}  {}", d.symbol);
            }
        }

        Commands::Info => {
            let lib = LzoLibrary::get()?;
            println!("library  {}", lib.path());
            println!("version  {:#06x}", lib.version());
        }
    }
    Ok(())
}
