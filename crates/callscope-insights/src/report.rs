//! Cross-transcript insight report

use callscope_domain::{MarketingSuggestion, ObjectionCategory, OpportunityCategory};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rankings computed over every stored analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Number of analyses aggregated
    pub total_transcripts: usize,

    /// Objection categories, highest priority first
    pub objections: Vec<ObjectionInsight>,

    /// Opportunity categories, highest priority first
    pub opportunities: Vec<OpportunityInsight>,

    /// Modules, most mentioned first
    pub modules: Vec<ModuleInsight>,

    /// Messaging themes, highest priority first
    pub messaging_themes: Vec<ThemeInsight>,

    /// Marketing suggestions, highest frequency × priority first
    pub marketing_suggestions: Vec<RankedSuggestion>,

    /// Deal stage distribution
    pub pipeline_overview: PipelineOverview,

    /// When the report was built (Unix seconds)
    pub generated_at: u64,
}

/// One objection category across all analyses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectionInsight {
    /// Category
    pub category: ObjectionCategory,
    /// Number of objections in this category
    pub count: usize,
    /// Mean severity weight (high = 3, medium = 2, otherwise 1), one decimal
    pub avg_severity: f64,
    /// Distinct details, first seen first
    pub top_details: Vec<String>,
    /// Distinct suggested responses, first seen first
    pub top_responses: Vec<String>,
    /// `count × mean severity`
    pub priority_score: f64,
}

/// One opportunity category across all analyses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityInsight {
    /// Category
    pub category: OpportunityCategory,
    /// Number of opportunities in this category
    pub count: usize,
    /// Mean strength weight, one decimal
    pub avg_strength: f64,
    /// Distinct details, first seen first
    pub top_details: Vec<String>,
    /// Every distinct module named as relevant
    pub relevant_modules: Vec<String>,
    /// `count × mean strength`
    pub priority_score: f64,
}

/// One product module across all analyses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleInsight {
    /// Module name as first reported
    pub module: String,
    /// Number of mentions
    pub mention_count: usize,
    /// Mentions per interest level
    pub interest_breakdown: BTreeMap<String, usize>,
}

/// A messaging theme recurring across analyses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeInsight {
    /// Theme text as first reported
    pub theme: String,
    /// Number of occurrences
    pub frequency: usize,
    /// Mean priority weight, one decimal
    pub avg_priority: f64,
    /// Distinct rationales, first seen first
    pub rationales: Vec<String>,
    /// Distinct target emotions
    pub emotions: Vec<String>,
    /// `frequency × mean priority`
    pub priority_score: f64,
}

/// A marketing suggestion with how often it was proposed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSuggestion {
    /// The first occurrence of the suggestion
    #[serde(flatten)]
    pub suggestion: MarketingSuggestion,
    /// Number of analyses proposing it
    pub frequency: usize,
}

/// Where deals stand across all analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOverview {
    /// Analyses per buying stage; `Unknown` when the stage was not reported
    pub buying_stages: BTreeMap<String, usize>,
    /// Mean confidence over all analyses, two decimals
    pub avg_confidence: f64,
}

impl AggregateReport {
    /// Whether there was nothing to aggregate
    pub fn is_empty(&self) -> bool {
        self.total_transcripts == 0
    }

    /// Generate a plain-text summary of the report
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No analyses yet".to_string();
        }

        let mut lines = vec![
            "Sales Insight Summary".to_string(),
            "=====================".to_string(),
            format!("Transcripts analyzed: {}", self.total_transcripts),
            format!(
                "Average deal confidence: {:.2}",
                self.pipeline_overview.avg_confidence
            ),
            String::new(),
        ];

        if !self.pipeline_overview.buying_stages.is_empty() {
            lines.push("Buying stages:".to_string());
            for (stage, count) in &self.pipeline_overview.buying_stages {
                lines.push(format!("  {}: {}", stage, count));
            }
            lines.push(String::new());
        }

        if !self.objections.is_empty() {
            lines.push("Top objections:".to_string());
            for o in &self.objections {
                lines.push(format!(
                    "  {} ({}x, severity {:.1}, score {:.1})",
                    o.category, o.count, o.avg_severity, o.priority_score
                ));
            }
            lines.push(String::new());
        }

        if !self.opportunities.is_empty() {
            lines.push("Top opportunities:".to_string());
            for o in &self.opportunities {
                lines.push(format!(
                    "  {} ({}x, strength {:.1}, score {:.1})",
                    o.category, o.count, o.avg_strength, o.priority_score
                ));
            }
            lines.push(String::new());
        }

        if !self.modules.is_empty() {
            lines.push("Modules discussed:".to_string());
            for m in &self.modules {
                lines.push(format!("  {}: {} mention(s)", m.module, m.mention_count));
            }
            lines.push(String::new());
        }

        if !self.messaging_themes.is_empty() {
            lines.push("Messaging themes:".to_string());
            for t in &self.messaging_themes {
                lines.push(format!("  {} ({}x)", t.theme, t.frequency));
            }
            lines.push(String::new());
        }

        if !self.marketing_suggestions.is_empty() {
            lines.push("Suggested content:".to_string());
            for s in &self.marketing_suggestions {
                let kind = s.suggestion.kind.map_or("Content", |k| k.as_str());
                lines.push(format!(
                    "  [{}] {} ({}x)",
                    kind, s.suggestion.title, s.frequency
                ));
            }
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}
