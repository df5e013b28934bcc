//! Combine per-chunk analyses into one record

use crate::config::DedupScope;
use callscope_domain::StructuredAnalysis;
use std::collections::HashSet;

/// Characters of a theme or next step used as its dedup key
pub const SHORT_KEY_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    KeyPhrases,
    Objections,
    Opportunities,
    Modules,
    Themes,
    Suggestions,
    NextSteps,
}

/// Keys already emitted during one merge
struct SeenKeys {
    scope: DedupScope,
    keys: HashSet<(Option<Field>, String)>,
}

impl SeenKeys {
    fn new(scope: DedupScope) -> Self {
        Self {
            scope,
            keys: HashSet::new(),
        }
    }

    /// Record `key`; true when it was not seen before. Empty keys never pass.
    fn admit(&mut self, field: Field, key: String) -> bool {
        if key.is_empty() {
            return false;
        }
        let field = match self.scope {
            DedupScope::Shared => None,
            DedupScope::PerField => Some(field),
        };
        self.keys.insert((field, key))
    }
}

fn full_key(text: &str) -> String {
    text.to_lowercase()
}

fn short_key(text: &str) -> String {
    text.to_lowercase().chars().take(SHORT_KEY_CHARS).collect()
}

/// Merges ordered per-chunk analyses
#[derive(Debug, Clone, Copy, Default)]
pub struct Merger {
    scope: DedupScope,
}

impl Merger {
    /// Create a merger with the given dedup scope
    pub fn new(scope: DedupScope) -> Self {
        Self { scope }
    }

    /// Merge records in chunk order; `None` when there are no records
    ///
    /// A single record is returned as is. Otherwise summaries are joined,
    /// the first named prospect wins, the last record's deal signals win and
    /// list items are concatenated with case-insensitive deduplication.
    pub fn merge(&self, records: Vec<StructuredAnalysis>) -> Option<StructuredAnalysis> {
        if records.len() <= 1 {
            return records.into_iter().next();
        }

        let summary = records
            .iter()
            .map(|r| r.summary.as_str())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let deal_signals = records
            .last()
            .and_then(|r| r.deal_signals.clone())
            .or_else(|| records[0].deal_signals.clone());

        let mut merged = StructuredAnalysis {
            summary,
            prospect: records[0].prospect.clone(),
            deal_signals,
            ..StructuredAnalysis::default()
        };

        let mut seen = SeenKeys::new(self.scope);

        for record in records {
            if !merged.prospect.has_name() && record.prospect.has_name() {
                merged.prospect = merged.prospect.overlay(&record.prospect);
            }

            merged.key_phrases.extend(
                record
                    .key_phrases
                    .into_iter()
                    .filter(|kp| seen.admit(Field::KeyPhrases, full_key(&kp.phrase))),
            );
            merged.objections.extend(
                record
                    .objections
                    .into_iter()
                    .filter(|o| seen.admit(Field::Objections, full_key(&o.detail))),
            );
            merged.opportunities.extend(
                record
                    .opportunities
                    .into_iter()
                    .filter(|o| seen.admit(Field::Opportunities, full_key(&o.detail))),
            );
            merged.modules_discussed.extend(
                record
                    .modules_discussed
                    .into_iter()
                    .filter(|m| seen.admit(Field::Modules, full_key(&m.module))),
            );
            merged.messaging_themes.extend(
                record
                    .messaging_themes
                    .into_iter()
                    .filter(|t| seen.admit(Field::Themes, short_key(&t.theme))),
            );
            merged.marketing_suggestions.extend(
                record
                    .marketing_suggestions
                    .into_iter()
                    .filter(|s| seen.admit(Field::Suggestions, full_key(&s.title))),
            );
            merged.next_steps.extend(
                record
                    .next_steps
                    .into_iter()
                    .filter(|step| seen.admit(Field::NextSteps, short_key(step))),
            );
        }

        Some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_domain::{
        BuyingStage, DealSignals, KeyPhrase, MessagingTheme, Objection, Prospect,
    };

    fn objection(detail: &str) -> Objection {
        Objection {
            detail: detail.to_string(),
            ..Objection::default()
        }
    }

    fn phrase(text: &str) -> KeyPhrase {
        KeyPhrase {
            phrase: text.to_string(),
            ..KeyPhrase::default()
        }
    }

    fn signals(stage: BuyingStage) -> Option<DealSignals> {
        Some(DealSignals {
            buying_stage: Some(stage),
            ..DealSignals::default()
        })
    }

    fn sample() -> StructuredAnalysis {
        StructuredAnalysis {
            summary: "First call.".to_string(),
            key_phrases: vec![phrase("we do it by hand")],
            objections: vec![objection("Too expensive"), objection("Security review")],
            next_steps: vec!["Send pricing".to_string()],
            deal_signals: signals(BuyingStage::Awareness),
            ..StructuredAnalysis::default()
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(Merger::default().merge(Vec::new()).is_none());
    }

    #[test]
    fn test_single_record_unchanged() {
        let record = sample();
        assert_eq!(Merger::default().merge(vec![record.clone()]), Some(record));
    }

    #[test]
    fn test_identical_records_do_not_grow() {
        let record = sample();
        let merged = Merger::default()
            .merge(vec![record.clone(), record.clone()])
            .unwrap();
        assert_eq!(merged.key_phrases.len(), record.key_phrases.len());
        assert_eq!(merged.objections.len(), record.objections.len());
        assert_eq!(merged.next_steps.len(), record.next_steps.len());
        assert_eq!(merged.summary, "First call. First call.");
    }

    #[test]
    fn test_order_preserved_and_case_insensitive() {
        let a = StructuredAnalysis {
            objections: vec![objection("A"), objection("B")],
            ..StructuredAnalysis::default()
        };
        let b = StructuredAnalysis {
            objections: vec![objection("b"), objection("C"), objection("")],
            ..StructuredAnalysis::default()
        };

        let merged = Merger::default().merge(vec![a, b]).unwrap();
        let details: Vec<&str> = merged.objections.iter().map(|o| o.detail.as_str()).collect();
        assert_eq!(details, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_deal_signals_precedence() {
        let first = StructuredAnalysis {
            deal_signals: signals(BuyingStage::Awareness),
            ..StructuredAnalysis::default()
        };
        let last = StructuredAnalysis {
            deal_signals: signals(BuyingStage::Decision),
            ..StructuredAnalysis::default()
        };
        let merged = Merger::default()
            .merge(vec![first.clone(), StructuredAnalysis::default(), last])
            .unwrap();
        assert_eq!(merged.deal_signals, signals(BuyingStage::Decision));

        let merged = Merger::default()
            .merge(vec![first, StructuredAnalysis::default()])
            .unwrap();
        assert_eq!(merged.deal_signals, signals(BuyingStage::Awareness));

        let merged = Merger::default()
            .merge(vec![StructuredAnalysis::default(), StructuredAnalysis::default()])
            .unwrap();
        assert!(merged.deal_signals.is_none());
    }

    #[test]
    fn test_first_named_prospect_wins() {
        let unnamed = StructuredAnalysis {
            prospect: Prospect {
                role: Some("VP Ops".to_string()),
                ..Prospect::default()
            },
            ..StructuredAnalysis::default()
        };
        let named = |name: &str| StructuredAnalysis {
            prospect: Prospect {
                name: Some(name.to_string()),
                company_size: Some("200 staff".to_string()),
                ..Prospect::default()
            },
            ..StructuredAnalysis::default()
        };

        let merged = Merger::default()
            .merge(vec![unnamed, named("Fundkite"), named("Other Co")])
            .unwrap();
        assert_eq!(merged.prospect.name.as_deref(), Some("Fundkite"));
        assert_eq!(merged.prospect.role.as_deref(), Some("VP Ops"));
        assert_eq!(merged.prospect.company_size.as_deref(), Some("200 staff"));
    }

    #[test]
    fn test_shared_scope_dedups_across_fields() {
        let a = StructuredAnalysis {
            key_phrases: vec![phrase("Pricing is too high")],
            ..StructuredAnalysis::default()
        };
        let b = StructuredAnalysis {
            objections: vec![objection("pricing is too high")],
            ..StructuredAnalysis::default()
        };

        let shared = Merger::new(DedupScope::Shared)
            .merge(vec![a.clone(), b.clone()])
            .unwrap();
        assert!(shared.objections.is_empty());

        let per_field = Merger::new(DedupScope::PerField).merge(vec![a, b]).unwrap();
        assert_eq!(per_field.objections.len(), 1);
    }

    #[test]
    fn test_themes_dedup_on_prefix() {
        let prefix = "Speed to offer is the main differentiator";
        let theme = |suffix: &str| MessagingTheme {
            theme: format!("{}{}", prefix, suffix),
            ..MessagingTheme::default()
        };
        let a = StructuredAnalysis {
            messaging_themes: vec![theme(" for MCA funders")],
            ..StructuredAnalysis::default()
        };
        let b = StructuredAnalysis {
            messaging_themes: vec![theme(" in every segment")],
            ..StructuredAnalysis::default()
        };

        let merged = Merger::default().merge(vec![a, b]).unwrap();
        assert_eq!(merged.messaging_themes.len(), 1);
        assert!(merged.messaging_themes[0].theme.ends_with("MCA funders"));
    }
}
