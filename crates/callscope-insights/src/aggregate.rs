//! Cross-transcript aggregation

use crate::config::InsightsConfig;
use crate::error::InsightsError;
use crate::report::{
    AggregateReport, ModuleInsight, ObjectionInsight, OpportunityInsight, PipelineOverview,
    RankedSuggestion, ThemeInsight,
};
use callscope_domain::traits::AnalysisStore;
use callscope_domain::{
    Level, MarketingSuggestion, ObjectionCategory, OpportunityCategory, StoredAnalysis,
};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Groups values by key, remembering first-seen key order
struct Groups<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<V>,
}

impl<K: Eq + Hash, V> Groups<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let idx = *self.index.entry(key).or_insert_with(|| {
            self.entries.push(init());
            self.entries.len() - 1
        });
        &mut self.entries[idx]
    }

    fn into_values(self) -> Vec<V> {
        self.entries
    }
}

/// Ordered list of distinct strings; blanks are ignored
#[derive(Default)]
struct Distinct(Vec<String>);

impl Distinct {
    fn add(&mut self, value: &str) {
        if !value.is_empty() && !self.0.iter().any(|v| v == value) {
            self.0.push(value.to_string());
        }
    }

    fn first(&self, n: usize) -> Vec<String> {
        self.0.iter().take(n).cloned().collect()
    }
}

/// Running weight total for a group
#[derive(Default)]
struct Weights {
    count: usize,
    total: u32,
}

impl Weights {
    fn add(&mut self, level: Option<Level>) {
        self.count += 1;
        self.total += Level::weight_of(level);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            f64::from(self.total) / self.count as f64
        }
    }

    fn priority_score(&self) -> f64 {
        self.count as f64 * self.mean()
    }
}

struct ObjectionGroup {
    category: ObjectionCategory,
    weights: Weights,
    details: Distinct,
    responses: Distinct,
}

struct OpportunityGroup {
    category: OpportunityCategory,
    weights: Weights,
    details: Distinct,
    modules: Distinct,
}

struct ThemeGroup {
    theme: String,
    weights: Weights,
    rationales: Distinct,
    emotions: Distinct,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

// Descending by score; sort_by is stable so ties keep first-seen order
fn rank_by<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

/// Ranks objections, opportunities, modules, themes and content ideas
/// across stored analyses
pub struct Aggregator {
    config: InsightsConfig,
}

impl Aggregator {
    /// Create an aggregator
    pub fn new(config: InsightsConfig) -> Self {
        Self { config }
    }

    /// Create an aggregator with default limits
    pub fn default_config() -> Self {
        Self::new(InsightsConfig::default())
    }

    /// Aggregate every analysis in a store
    pub fn aggregate_store<S>(&self, store: &S) -> Result<AggregateReport, InsightsError>
    where
        S: AnalysisStore,
        S::Error: std::fmt::Display,
    {
        let analyses = store
            .list_analyses()
            .map_err(|e| InsightsError::Store(e.to_string()))?;
        Ok(self.aggregate(&analyses))
    }

    /// Aggregate the given analyses
    ///
    /// No analyses yields an empty report (see [`AggregateReport::is_empty`]).
    pub fn aggregate(&self, analyses: &[StoredAnalysis]) -> AggregateReport {
        if analyses.is_empty() {
            debug!("No analyses to aggregate");
            return AggregateReport {
                generated_at: now_secs(),
                ..AggregateReport::default()
            };
        }

        let mut objections: Groups<ObjectionCategory, ObjectionGroup> = Groups::new();
        let mut opportunities: Groups<OpportunityCategory, OpportunityGroup> = Groups::new();
        let mut modules: Groups<String, ModuleInsight> = Groups::new();
        let mut themes: Groups<String, ThemeGroup> = Groups::new();
        let mut suggestions: Groups<String, RankedSuggestion> = Groups::new();
        let mut buying_stages: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_confidence = 0.0;

        for stored in analyses {
            let a = &stored.analysis;

            for obj in &a.objections {
                let group = objections.entry(obj.category, || ObjectionGroup {
                    category: obj.category,
                    weights: Weights::default(),
                    details: Distinct::default(),
                    responses: Distinct::default(),
                });
                group.weights.add(obj.severity);
                group.details.add(&obj.detail);
                if let Some(response) = &obj.suggested_response {
                    group.responses.add(response);
                }
            }

            for opp in &a.opportunities {
                let group = opportunities.entry(opp.category, || OpportunityGroup {
                    category: opp.category,
                    weights: Weights::default(),
                    details: Distinct::default(),
                    modules: Distinct::default(),
                });
                group.weights.add(opp.strength);
                group.details.add(&opp.detail);
                for module in &opp.modules_relevant {
                    group.modules.add(module);
                }
            }

            for mention in a.modules_discussed.iter().filter(|m| !m.module.is_empty()) {
                let insight = modules.entry(mention.module.clone(), || ModuleInsight {
                    module: mention.module.clone(),
                    mention_count: 0,
                    interest_breakdown: BTreeMap::new(),
                });
                insight.mention_count += 1;
                let level = mention.interest_level.map_or("unspecified", |l| l.as_str());
                *insight.interest_breakdown.entry(level.to_string()).or_insert(0) += 1;
            }

            for theme in a.messaging_themes.iter().filter(|t| !t.theme.is_empty()) {
                let key: String = theme
                    .theme
                    .to_lowercase()
                    .chars()
                    .take(self.config.theme_key_chars)
                    .collect();
                let group = themes.entry(key, || ThemeGroup {
                    theme: theme.theme.clone(),
                    weights: Weights::default(),
                    rationales: Distinct::default(),
                    emotions: Distinct::default(),
                });
                group.weights.add(theme.priority);
                group.rationales.add(&theme.rationale);
                if let Some(emotion) = &theme.target_emotion {
                    group.emotions.add(emotion);
                }
            }

            for suggestion in &a.marketing_suggestions {
                let ranked = suggestions.entry(suggestion_key(suggestion), || RankedSuggestion {
                    suggestion: suggestion.clone(),
                    frequency: 0,
                });
                ranked.frequency += 1;
            }

            if let Some(signals) = &a.deal_signals {
                let stage = signals.buying_stage.map_or("Unknown", |s| s.as_str());
                *buying_stages.entry(stage.to_string()).or_insert(0) += 1;
                total_confidence += signals.confidence_score.unwrap_or(0.0);
            }
        }

        let mut ranked_objections: Vec<ObjectionInsight> = objections
            .into_values()
            .into_iter()
            .map(|g| ObjectionInsight {
                category: g.category,
                count: g.weights.count,
                avg_severity: round_to(g.weights.mean(), 1),
                top_details: g.details.first(self.config.max_details),
                top_responses: g.responses.first(self.config.max_responses),
                priority_score: g.weights.priority_score(),
            })
            .collect();
        rank_by(&mut ranked_objections, |o| o.priority_score);

        let mut ranked_opportunities: Vec<OpportunityInsight> = opportunities
            .into_values()
            .into_iter()
            .map(|g| OpportunityInsight {
                category: g.category,
                count: g.weights.count,
                avg_strength: round_to(g.weights.mean(), 1),
                top_details: g.details.first(self.config.max_details),
                relevant_modules: g.modules.0,
                priority_score: g.weights.priority_score(),
            })
            .collect();
        rank_by(&mut ranked_opportunities, |o| o.priority_score);

        let mut ranked_modules = modules.into_values();
        rank_by(&mut ranked_modules, |m| m.mention_count as f64);

        let mut ranked_themes: Vec<ThemeInsight> = themes
            .into_values()
            .into_iter()
            .map(|g| ThemeInsight {
                theme: g.theme,
                frequency: g.weights.count,
                avg_priority: round_to(g.weights.mean(), 1),
                rationales: g.rationales.first(self.config.max_rationales),
                emotions: g.emotions.0,
                priority_score: g.weights.priority_score(),
            })
            .collect();
        rank_by(&mut ranked_themes, |t| t.priority_score);

        let mut ranked_suggestions = suggestions.into_values();
        rank_by(&mut ranked_suggestions, |s| {
            (s.frequency as u32 * Level::weight_of(s.suggestion.priority)) as f64
        });
        ranked_suggestions.truncate(self.config.max_suggestions);

        let report = AggregateReport {
            total_transcripts: analyses.len(),
            objections: ranked_objections,
            opportunities: ranked_opportunities,
            modules: ranked_modules,
            messaging_themes: ranked_themes,
            marketing_suggestions: ranked_suggestions,
            pipeline_overview: PipelineOverview {
                buying_stages,
                avg_confidence: round_to(total_confidence / analyses.len() as f64, 2),
            },
            generated_at: now_secs(),
        };

        info!(
            transcripts = report.total_transcripts,
            objection_categories = report.objections.len(),
            suggestions = report.marketing_suggestions.len(),
            "Aggregation complete"
        );

        report
    }
}

fn suggestion_key(suggestion: &MarketingSuggestion) -> String {
    let kind = suggestion.kind.map_or("", |k| k.as_str());
    format!("{}-{}", kind, suggestion.title).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_domain::{AnalysisId, ContentType, StructuredAnalysis};

    fn stored(analysis: StructuredAnalysis) -> StoredAnalysis {
        StoredAnalysis {
            id: AnalysisId::new(),
            title: "call".to_string(),
            source: "manual".to_string(),
            created_at: 0,
            analysis,
        }
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let mut groups: Groups<&str, usize> = Groups::new();
        *groups.entry("b", || 0) += 1;
        *groups.entry("a", || 0) += 1;
        *groups.entry("b", || 0) += 1;
        assert_eq!(groups.into_values(), vec![2, 1]);
    }

    #[test]
    fn test_distinct_ignores_blanks_and_repeats() {
        let mut d = Distinct::default();
        for v in ["x", "", "y", "x", "z"] {
            d.add(v);
        }
        assert_eq!(d.first(2), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(d.0.len(), 3);
    }

    #[test]
    fn test_weights_missing_level_counts_as_one() {
        let mut w = Weights::default();
        w.add(Some(Level::High));
        w.add(None);
        assert_eq!(w.mean(), 2.0);
        assert_eq!(w.priority_score(), 4.0);
    }

    #[test]
    fn test_suggestion_key_is_case_insensitive() {
        let a = MarketingSuggestion {
            kind: Some(ContentType::Webinar),
            title: "Fraud 101".to_string(),
            ..MarketingSuggestion::default()
        };
        let b = MarketingSuggestion {
            title: "FRAUD 101".to_string(),
            ..a.clone()
        };
        assert_eq!(suggestion_key(&a), suggestion_key(&b));
        assert_eq!(suggestion_key(&a), "webinar-fraud 101");
    }

    #[test]
    fn test_empty_input() {
        let report = Aggregator::default_config().aggregate(&[]);
        assert!(report.is_empty());
        assert!(report.objections.is_empty());
        assert_eq!(report.pipeline_overview.avg_confidence, 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.3333, 1), 2.3);
        assert_eq!(round_to(0.456, 2), 0.46);
    }

    #[test]
    fn test_analysis_without_signals_counts_toward_average() {
        let with = stored(StructuredAnalysis {
            deal_signals: Some(callscope_domain::DealSignals {
                confidence_score: Some(0.8),
                ..Default::default()
            }),
            ..StructuredAnalysis::default()
        });
        let without = stored(StructuredAnalysis::default());

        let report = Aggregator::default_config().aggregate(&[with, without]);
        assert_eq!(report.pipeline_overview.avg_confidence, 0.4);
        assert_eq!(report.pipeline_overview.buying_stages.get("Unknown"), Some(&1));
    }
}
