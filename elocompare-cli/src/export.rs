/// Result files written at the end of a session.
///
/// Column names and order are fixed; downstream analysis scripts read them
/// by name.
use elocompare_core::{ComparisonRecord, FinalRating};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const RESULTS_HEADER: [&str; 5] = ["Image1", "Image2", "Chosen", "NotChosen", "Rank_diff"];
pub const RANKINGS_HEADER: [&str; 2] = ["Image", "Final Score"];

/// Write the round log, one row per round in round order.
pub fn write_results_csv(path: &Path, records: &[ComparisonRecord]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_results(&mut w, records)?;
    w.flush()
}

/// Write one row per item with its final score.
pub fn write_rankings_csv(path: &Path, ratings: &[FinalRating]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_rankings(&mut w, ratings)?;
    w.flush()
}

pub fn write_results(w: &mut impl Write, records: &[ComparisonRecord]) -> io::Result<()> {
    writeln!(w, "{}", RESULTS_HEADER.join(","))?;
    for r in records {
        writeln!(
            w,
            "{},{},{},{},{}",
            csv_field(&r.item1),
            csv_field(&r.item2),
            csv_field(&r.chosen),
            csv_field(&r.not_chosen),
            format_float(r.rank_displacement),
        )?;
    }
    Ok(())
}

pub fn write_rankings(w: &mut impl Write, ratings: &[FinalRating]) -> io::Result<()> {
    writeln!(w, "{}", RANKINGS_HEADER.join(","))?;
    for r in ratings {
        writeln!(w, "{},{}", csv_field(&r.item), format_float(r.score))?;
    }
    Ok(())
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Shortest round-trip representation, always with a decimal point.
fn format_float(value: f64) -> String {
    format!("{value:?}")
}
