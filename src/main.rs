use anyhow::{bail, Context, Result};
use distributed_wordcount::discovery::scanner::scan_directory;
use distributed_wordcount::runtime::config::JobConfig;
use distributed_wordcount::runtime::job::run_job;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

fn usage(program: &str) {
    eprintln!(
        "Usage: {} --dir <path> [--workers <n>] [--block-size <bytes>] [--output <file>]",
        program
    );
    eprintln!("Example: {} --dir ./corpus --workers 8", program);
    eprintln!(
        "Example: {} --dir ./corpus --block-size 4096 --output counts.csv",
        program
    );
}

struct CliArgs {
    dir: PathBuf,
    output: Option<PathBuf>,
    config: JobConfig,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut dir: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut config = JobConfig::default();

    let value_of = |i: usize| -> Result<&str> {
        args.get(i + 1)
            .map(String::as_str)
            .with_context(|| format!("{} requires a value", args[i]))
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" => {
                dir = Some(PathBuf::from(value_of(i)?));
                i += 2;
            }
            "--output" => {
                output = Some(PathBuf::from(value_of(i)?));
                i += 2;
            }
            "--workers" => {
                config.workers = value_of(i)?
                    .parse()
                    .context("--workers expects a positive integer")?;
                i += 2;
            }
            "--block-size" => {
                config.block_size = value_of(i)?
                    .parse()
                    .context("--block-size expects a positive integer")?;
                i += 2;
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    let dir = dir.context("--dir is required")?;
    config.validate()?;

    Ok(CliArgs {
        dir,
        output,
        config,
    })
}

fn write_table(out: &mut impl Write, table: &[(String, u64)]) -> Result<()> {
    writeln!(out, "Word, Count")?;
    for (word, count) in table {
        writeln!(out, "{}, {}", word, count)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            usage(&args[0]);
            std::process::exit(1);
        }
    };

    let started = Instant::now();

    let files = scan_directory(&cli.dir).await?;
    let table = run_job(&cli.dir, &files, &cli.config).await?;

    match &cli.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("unable to create {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            write_table(&mut writer, &table)?;
            writer.flush()?;
            tracing::info!("histogram written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = std::io::BufWriter::new(stdout.lock());
            write_table(&mut writer, &table)?;
            writer.flush()?;
        }
    }

    tracing::info!(
        "{} distinct word(s) in {:.3}s",
        table.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
