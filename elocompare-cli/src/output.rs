/// Output formatting: terminal table and JSON.
use elocompare_core::{ItemPool, SessionResults};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
pub struct StandingsRow {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    pub comparisons: usize,
    pub wins: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: &'a [StandingsRow],
    rounds: usize,
    k_factor: f64,
    final_rank_displacement: Option<f64>,
}

/// Final standings, best first.
pub fn build_rows(results: &SessionResults, pool: &ItemPool) -> Vec<StandingsRow> {
    results.standings()
        .into_iter()
        .enumerate()
        .map(|(i, r)| StandingsRow {
            rank: i + 1,
            comparisons: pool.games_played(&r.item),
            wins: pool.wins(&r.item),
            score: r.score,
            name: r.item,
        })
        .collect()
}

/// Print results as a formatted terminal table.
pub fn print_table(rows: &[StandingsRow], results: &SessionResults) {
    let name_width = rows.iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!(" # | {:<name_width$} |     Score | Comparisons | Wins", "Item");
    println!("---|-{}-|-----------|-------------|-----", "-".repeat(name_width));

    for r in rows {
        println!(
            "{:>2} | {:<name_width$} | {:>9.2} | {:>11} | {:>4}",
            r.rank, r.name, r.score, r.comparisons, r.wins,
        );
    }

    println!("\n{} items ranked across {} rounds", rows.len(), results.records.len());
    if let Some(last) = results.records.last() {
        println!("Rank displacement in the final round: {:.3}", last.rank_displacement);
    }
}

/// Print results as JSON.
pub fn print_json(rows: &[StandingsRow], results: &SessionResults, k_factor: f64) {
    let output = JsonOutput {
        items: rows,
        rounds: results.records.len(),
        k_factor,
        final_rank_displacement: results.records.last().map(|r| r.rank_displacement),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::fatal(format!("Failed to serialize results: {e}")),
    }
}
