use std::collections::HashMap;

use crate::models::{CommitContribution, LanguageStat, Repository, WrappedLanguages};
use crate::taxonomy::language_color;

pub const TOP_LANGUAGE_COUNT: usize = 6;
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Weight given to a language seen only on an owned repository.
const OWNED_ONLY_WEIGHT: u64 = 1;

#[derive(Debug, Clone)]
struct LanguageSignal {
    name: String,
    color: String,
    commit_weight: u64,
    code_size_bytes: u64,
}

/// Insertion-ordered accumulator so ties rank in first-seen order.
#[derive(Default)]
struct LanguageAccumulator {
    signals: Vec<LanguageSignal>,
    index: HashMap<String, usize>,
}

impl LanguageAccumulator {
    fn entry(&mut self, name: &str, color: Option<&str>, initial_weight: u64) -> &mut LanguageSignal {
        if let Some(&i) = self.index.get(name) {
            return &mut self.signals[i];
        }
        self.index.insert(name.to_string(), self.signals.len());
        self.signals.push(LanguageSignal {
            name: name.to_string(),
            color: language_color(name, color),
            commit_weight: initial_weight,
            code_size_bytes: 0,
        });
        let last = self.signals.len() - 1;
        &mut self.signals[last]
    }
}

pub fn aggregate_languages(
    contributions: &[CommitContribution],
    owned: &[Repository],
) -> WrappedLanguages {
    let mut acc = LanguageAccumulator::default();

    for contrib in contributions {
        if let Some(lang) = &contrib.repository.primary_language {
            let signal = acc.entry(&lang.name, lang.color.as_deref(), 0);
            signal.commit_weight += contrib.commits();
        }
    }

    for repo in owned {
        let Some(lang) = &repo.primary_language else {
            continue;
        };
        let signal = acc.entry(&lang.name, lang.color.as_deref(), OWNED_ONLY_WEIGHT);

        // Only the edge matching the primary language contributes size.
        if let Some(languages) = &repo.languages {
            signal.code_size_bytes += languages
                .edges
                .iter()
                .filter(|edge| edge.node.name == lang.name)
                .map(|edge| edge.size)
                .sum::<u64>();
        }
    }

    let distinct = acc.signals.len();
    let total_weight: u64 = acc.signals.iter().map(|s| s.commit_weight).sum();

    let mut ranked = acc.signals;
    ranked.sort_by(|a, b| b.commit_weight.cmp(&a.commit_weight));
    ranked.truncate(TOP_LANGUAGE_COUNT);

    let mut top: Vec<LanguageStat> = ranked
        .into_iter()
        .map(|signal| LanguageStat {
            percentage: percentage_of(signal.commit_weight, total_weight),
            name: signal.name,
            color: signal.color,
            commits: signal.commit_weight,
            code_size: (signal.code_size_bytes > 0).then_some(signal.code_size_bytes),
        })
        .collect();

    absorb_rounding_remainder(&mut top, total_weight);

    let primary = top
        .first()
        .map(|l| l.name.clone())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    WrappedLanguages {
        top,
        total: distinct,
        primary,
    }
}

fn percentage_of(weight: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (weight as f64 / total as f64 * 100.0).round() as u32
}

/// The top language takes the signed difference so the shown set sums to 100.
fn absorb_rounding_remainder(top: &mut [LanguageStat], total_weight: u64) {
    if total_weight == 0 {
        return;
    }
    let sum: i64 = top.iter().map(|l| i64::from(l.percentage)).sum();
    if let Some(first) = top.first_mut() {
        let adjusted = i64::from(first.percentage) + (100 - sum);
        first.percentage = u32::try_from(adjusted.max(0)).unwrap_or(0);
    }
}
