use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use local_aligner::{
    read_sequences, write_report, Aligner, GapPenalties, ScoringTable, DEFAULT_GAP_EXTEND,
    DEFAULT_GAP_OPEN,
};

/// Smith-Waterman local alignment with affine gap penalties
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File holding sequence A on line 1 and sequence B on line 2
    #[arg(short, long)]
    input: PathBuf,

    /// Whitespace-delimited substitution matrix
    #[arg(short, long)]
    score: PathBuf,

    /// Gap opening penalty
    #[arg(short = 'o', long, default_value_t = DEFAULT_GAP_OPEN, allow_hyphen_values = true)]
    opengap: i32,

    /// Gap extension penalty
    #[arg(short = 'e', long, default_value_t = DEFAULT_GAP_EXTEND, allow_hyphen_values = true)]
    extgap: i32,

    /// Report destination
    #[arg(long, default_value = "output.txt")]
    output: PathBuf,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let table = ScoringTable::from_path(&args.score)?;
    let (seq_a, seq_b) = read_sequences(&args.input)?;

    let aligner = Aligner::new(table).with_gap_penalties(GapPenalties::new(args.opengap, args.extgap));
    let (grid, result) = aligner.align_with_grid(&seq_a, &seq_b)?;

    let mut writer = BufWriter::new(File::create(&args.output)?);
    write_report(&mut writer, &seq_a, &seq_b, &grid, &result)?;
    writer.flush()?;

    println!(
        "Best local alignment score {} written to {}",
        result.score,
        args.output.display()
    );

    Ok(())
}
