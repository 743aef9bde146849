//! Keyword headline sentiment.
//!
//! Each headline scores `positive hits - negative hits`, where a keyword is a
//! case-insensitive substring of the title and counts at most once. Overlapping
//! keywords (`"lucro"` inside `"lucros"`) are not de-duplicated.

use serde::{Deserialize, Serialize};

use crate::HeadlineRecord;

pub const DEFAULT_HEADLINE_CAP: usize = 7;
pub const DEFAULT_OPTIMISTIC_ABOVE: f64 = 0.3;
pub const DEFAULT_PESSIMISTIC_BELOW: f64 = -0.3;

const POSITIVE_KEYWORDS: &[&str] = &[
    "alta",
    "cresce",
    "lucro",
    "recorde",
    "expansão",
    "melhora",
    "ganhos",
    "supera",
    "dividendos",
    "juros sobre capital próprio",
    "acordo",
    "parceria",
    "aprova",
    "aquisição",
    "receita",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "baixa",
    "perdas",
    "queda",
    "cai",
    "recuo",
    "prejuízo",
    "crise",
    "problemas",
    "alerta",
    "risco",
    "investigação",
    "multa",
    "venda de controle",
    "rejeita",
    "adiamento",
    "dívida",
];

/// Positive and negative keyword sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: POSITIVE_KEYWORDS.iter().map(|kw| (*kw).to_owned()).collect(),
            negative: NEGATIVE_KEYWORDS.iter().map(|kw| (*kw).to_owned()).collect(),
        }
    }
}

impl SentimentLexicon {
    pub fn score_title(&self, title: &str) -> i32 {
        let title = title.to_lowercase();
        count_hits(&title, &self.positive) - count_hits(&title, &self.negative)
    }
}

fn count_hits(title: &str, keywords: &[String]) -> i32 {
    keywords
        .iter()
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty() && title.contains(kw.as_str()))
        .count() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentThresholds {
    pub optimistic_above: f64,
    pub pessimistic_below: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            optimistic_above: DEFAULT_OPTIMISTIC_ABOVE,
            pessimistic_below: DEFAULT_PESSIMISTIC_BELOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentClassification {
    Optimistic,
    Pessimistic,
    Neutral,
}

/// Tone of a single headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineTone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    #[serde(flatten)]
    pub headline: HeadlineRecord,
    pub score: i32,
}

impl ScoredHeadline {
    pub fn tone(&self) -> HeadlineTone {
        match self.score {
            score if score > 0 => HeadlineTone::Positive,
            score if score < 0 => HeadlineTone::Negative,
            _ => HeadlineTone::Neutral,
        }
    }
}

/// Scores the first `cap` headlines in provider order.
pub fn score_headlines(
    headlines: Vec<HeadlineRecord>,
    lexicon: &SentimentLexicon,
    cap: usize,
) -> Vec<ScoredHeadline> {
    headlines
        .into_iter()
        .take(cap)
        .map(|headline| ScoredHeadline {
            score: lexicon.score_title(&headline.title),
            headline,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub mean_score: f64,
    pub classification: SentimentClassification,
    pub headline_count: usize,
}

pub fn summarize(scores: &[i32], thresholds: SentimentThresholds) -> SentimentSummary {
    if scores.is_empty() {
        return SentimentSummary {
            mean_score: 0.0,
            classification: SentimentClassification::Neutral,
            headline_count: 0,
        };
    }

    let total: i64 = scores.iter().map(|score| i64::from(*score)).sum();
    let mean_score = total as f64 / scores.len() as f64;
    let classification = if mean_score > thresholds.optimistic_above {
        SentimentClassification::Optimistic
    } else if mean_score < thresholds.pessimistic_below {
        SentimentClassification::Pessimistic
    } else {
        SentimentClassification::Neutral
    };

    SentimentSummary {
        mean_score,
        classification,
        headline_count: scores.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline(title: &str) -> HeadlineRecord {
        HeadlineRecord {
            title: title.to_owned(),
            source: Some("Valor".to_owned()),
            published: None,
            url: "https://example.invalid/n".to_owned(),
        }
    }

    #[test]
    fn title_without_keywords_scores_zero() {
        let lexicon = SentimentLexicon::default();
        assert_eq!(lexicon.score_title("Assembleia marcada para quinta"), 0);
    }

    #[test]
    fn positive_and_negative_hits_offset() {
        let lexicon = SentimentLexicon::default();
        assert_eq!(lexicon.score_title("Lucro recorde apesar da dívida"), 1);
        assert_eq!(lexicon.score_title("Empresa registra prejuízo e queda"), -2);
    }

    #[test]
    fn keyword_counts_once_per_title() {
        let lexicon = SentimentLexicon {
            positive: vec!["alta".to_owned()],
            negative: Vec::new(),
        };
        assert_eq!(lexicon.score_title("Alta, alta e mais alta"), 1);
    }

    #[test]
    fn matching_is_case_insensitive_and_overlaps_count() {
        let lexicon = SentimentLexicon {
            positive: vec!["LUCRO".to_owned(), "lucros".to_owned()],
            negative: Vec::new(),
        };
        assert_eq!(lexicon.score_title("Lucros sobem"), 2);
    }

    #[test]
    fn empty_keywords_are_ignored() {
        let lexicon = SentimentLexicon {
            positive: vec![String::new(), "  ".to_owned()],
            negative: Vec::new(),
        };
        assert_eq!(lexicon.score_title("qualquer"), 0);
    }

    #[test]
    fn scoring_is_capped() {
        let headlines = (0..10).map(|i| headline(&format!("alta {i}"))).collect();
        let scored = score_headlines(headlines, &SentimentLexicon::default(), 7);
        assert_eq!(scored.len(), 7);
        assert!(scored.iter().all(|item| item.tone() == HeadlineTone::Positive));
    }

    #[test]
    fn empty_summary_is_neutral() {
        let summary = summarize(&[], SentimentThresholds::default());
        assert_eq!(summary.mean_score, 0.0);
        assert_eq!(summary.classification, SentimentClassification::Neutral);
    }

    #[test]
    fn threshold_is_exclusive() {
        let at_boundary = summarize(&[1, 1, 1, 0, 0, 0, 0, 0, 0, 0], SentimentThresholds::default());
        assert_eq!(at_boundary.classification, SentimentClassification::Neutral);

        let above = summarize(&[1, 1, -1], SentimentThresholds::default());
        assert_eq!(above.classification, SentimentClassification::Optimistic);

        let below = summarize(&[-1, -1, -1, 0, 0, 0, 0, 0, 0, 0], SentimentThresholds::default());
        assert_eq!(below.classification, SentimentClassification::Neutral);

        let pessimistic = summarize(&[-1, 0], SentimentThresholds::default());
        assert_eq!(pessimistic.classification, SentimentClassification::Pessimistic);
    }
}
