/// Simulated judge for non-interactive runs.
///
/// Every item gets a hidden strength. For a pair (a, b) the judge prefers a
/// with Bradley-Terry probability `s_a / (s_a + s_b)`, and with probability
/// `noise` answers uniformly at random instead. Comparing the final standings
/// against the hidden order shows how well a given round budget and K-factor
/// recover the truth.
use elocompare_core::{Choice, ChoiceProvider, ComparisonRecord, FinalRating};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

pub struct SimulatedJudge {
    strengths: HashMap<String, f64>,
    noise: f64,
    rng: StdRng,
}

impl SimulatedJudge {
    /// Draw log-uniform strengths in [0.1, 10] for every item.
    pub fn random(items: &[String], noise: f64, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };
        let strengths = items.iter()
            .map(|item| (item.clone(), 10f64.powf(rng.random_range(-1.0..=1.0))))
            .collect();
        SimulatedJudge { strengths, noise, rng }
    }

    #[cfg(test)]
    pub fn with_strengths(strengths: HashMap<String, f64>, noise: f64, seed: u64) -> Self {
        SimulatedJudge { strengths, noise, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn strength(&self, item: &str) -> f64 {
        *self.strengths.get(item)
            .unwrap_or_else(|| panic!("No hidden strength for item: {}", item))
    }

    /// Items ordered by hidden strength, strongest first.
    pub fn true_order(&self) -> Vec<String> {
        let mut items: Vec<(&String, f64)> = self.strengths.iter().map(|(k, &v)| (k, v)).collect();
        items.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items.into_iter().map(|(k, _)| k.clone()).collect()
    }
}

impl ChoiceProvider for SimulatedJudge {
    fn choose(&mut self, first: &str, second: &str) -> Choice {
        let p_first = if self.rng.random::<f64>() < self.noise {
            0.5
        } else {
            let (a, b) = (self.strength(first), self.strength(second));
            a / (a + b)
        };
        if self.rng.random::<f64>() < p_first {
            Choice::First
        } else {
            Choice::Second
        }
    }
}

/// Spearman rank correlation between two orderings of the same items.
///
/// 1.0 means identical order, -1.0 means fully reversed.
pub fn rank_agreement(estimated: &[FinalRating], true_order: &[String]) -> f64 {
    let n = true_order.len();
    assert_eq!(estimated.len(), n, "Orderings cover different item sets");
    if n < 2 {
        return 1.0;
    }

    let true_rank: HashMap<&str, usize> = true_order.iter()
        .enumerate()
        .map(|(i, item)| (item.as_str(), i))
        .collect();

    let sum_sq: f64 = estimated.iter()
        .enumerate()
        .map(|(i, r)| {
            let truth = *true_rank.get(r.item.as_str())
                .unwrap_or_else(|| panic!("Item missing from true order: {}", r.item));
            let d = i as f64 - truth as f64;
            d * d
        })
        .sum();

    let n = n as f64;
    1.0 - 6.0 * sum_sq / (n * (n * n - 1.0))
}

/// Mean rank displacement over the last `window` rounds.
pub fn trailing_displacement(records: &[ComparisonRecord], window: usize) -> f64 {
    let tail = &records[records.len().saturating_sub(window)..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().map(|r| r.rank_displacement).sum::<f64>() / tail.len() as f64
}
