//! Integration tests for callscope-insights
//!
//! Rankings are computed over analyses persisted in a real SQLite store.

use callscope_domain::traits::AnalysisStore;
use callscope_domain::{
    AnalysisId, BuyingStage, ContentType, DealSignals, InterestLevel, Level, MarketingSuggestion,
    MessagingTheme, ModuleMention, Objection, ObjectionCategory, Opportunity, OpportunityCategory,
    StoredAnalysis, StructuredAnalysis, TranscriptRecord,
};
use callscope_insights::{Aggregator, CollateralWriter, InsightsConfig, InsightsError};
use callscope_llm::MockProvider;
use callscope_store::SqliteStore;
use tempfile::TempDir;

fn objection(category: ObjectionCategory, detail: &str, severity: Option<Level>) -> Objection {
    Objection {
        category,
        detail: detail.to_string(),
        severity,
        ..Objection::default()
    }
}

fn suggestion(kind: ContentType, title: &str, priority: Level) -> MarketingSuggestion {
    MarketingSuggestion {
        kind: Some(kind),
        title: title.to_string(),
        priority: Some(priority),
        ..MarketingSuggestion::default()
    }
}

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
fn test_objections_ranked_by_count_times_severity() {
    let analyses = vec![
        stored(StructuredAnalysis {
            objections: vec![
                objection(ObjectionCategory::Pricing, "Too expensive", Some(Level::High)),
                objection(ObjectionCategory::AlreadyAutomated, "Built in-house", Some(Level::Low)),
            ],
            ..StructuredAnalysis::default()
        }),
        stored(StructuredAnalysis {
            objections: vec![
                objection(ObjectionCategory::Pricing, "Budget frozen", Some(Level::Medium)),
                objection(ObjectionCategory::AlreadyAutomated, "Built in-house", None),
                objection(ObjectionCategory::AlreadyAutomated, "Vendor in place", Some(Level::Low)),
            ],
            ..StructuredAnalysis::default()
        }),
    ];

    let report = Aggregator::default_config().aggregate(&analyses);

    assert_eq!(report.total_transcripts, 2);
    assert_eq!(report.objections.len(), 2);

    let pricing = &report.objections[0];
    assert_eq!(pricing.category, ObjectionCategory::Pricing);
    assert_eq!(pricing.count, 2);
    assert_eq!(pricing.avg_severity, 2.5);
    assert_eq!(pricing.priority_score, 5.0);
    assert_eq!(pricing.top_details, vec!["Too expensive", "Budget frozen"]);

    let automated = &report.objections[1];
    assert_eq!(automated.count, 3);
    assert_eq!(automated.priority_score, 3.0);
    assert_eq!(automated.top_details, vec!["Built in-house", "Vendor in place"]);
}

#[test]
fn test_ties_keep_first_seen_order() {
    let analyses = vec![stored(StructuredAnalysis {
        opportunities: vec![
            Opportunity {
                category: OpportunityCategory::BudgetSignal,
                detail: "Budget approved".to_string(),
                strength: Some(Level::Medium),
                ..Opportunity::default()
            },
            Opportunity {
                category: OpportunityCategory::PainPoint,
                detail: "Manual review".to_string(),
                strength: Some(Level::Medium),
                modules_relevant: vec!["Bank Statement Analyzer".to_string()],
                ..Opportunity::default()
            },
        ],
        ..StructuredAnalysis::default()
    })];

    let report = Aggregator::default_config().aggregate(&analyses);

    assert_eq!(report.opportunities[0].category, OpportunityCategory::BudgetSignal);
    assert_eq!(report.opportunities[1].category, OpportunityCategory::PainPoint);
    assert_eq!(
        report.opportunities[1].relevant_modules,
        vec!["Bank Statement Analyzer"]
    );
}

#[test]
fn test_modules_and_themes() {
    let theme = |text: &str, priority| MessagingTheme {
        theme: text.to_string(),
        rationale: "Came up twice".to_string(),
        priority: Some(priority),
        ..MessagingTheme::default()
    };
    let mention = |name: &str, level| ModuleMention {
        module: name.to_string(),
        interest_level: level,
        ..ModuleMention::default()
    };

    let analyses = vec![
        stored(StructuredAnalysis {
            modules_discussed: vec![
                mention("Fraud Detection", Some(InterestLevel::High)),
                mention("KYC", None),
            ],
            messaging_themes: vec![theme("Speed to decision", Level::High)],
            ..StructuredAnalysis::default()
        }),
        stored(StructuredAnalysis {
            modules_discussed: vec![mention("KYC", Some(InterestLevel::Mentioned))],
            messaging_themes: vec![
                theme("SPEED TO DECISION", Level::Low),
                theme("", Level::High),
            ],
            ..StructuredAnalysis::default()
        }),
    ];

    let report = Aggregator::default_config().aggregate(&analyses);

    assert_eq!(report.modules[0].module, "KYC");
    assert_eq!(report.modules[0].mention_count, 2);
    assert_eq!(report.modules[0].interest_breakdown.get("unspecified"), Some(&1));
    assert_eq!(report.modules[0].interest_breakdown.get("mentioned"), Some(&1));

    assert_eq!(report.messaging_themes.len(), 1);
    let speed = &report.messaging_themes[0];
    assert_eq!(speed.theme, "Speed to decision");
    assert_eq!(speed.frequency, 2);
    assert_eq!(speed.avg_priority, 2.0);
    assert_eq!(speed.rationales, vec!["Came up twice"]);
}

#[test]
fn test_suggestions_deduplicated_and_truncated() {
    let mut suggestions = vec![
        suggestion(ContentType::Webinar, "Fraud 101", Level::Low),
        suggestion(ContentType::Webinar, "fraud 101", Level::High),
    ];
    for i in 0..20 {
        suggestions.push(suggestion(ContentType::BlogPost, &format!("Post {i}"), Level::Medium));
    }
    suggestions.push(suggestion(ContentType::CaseStudy, "Lender story", Level::High));
    let analyses = vec![stored(StructuredAnalysis {
        marketing_suggestions: suggestions,
        ..StructuredAnalysis::default()
    })];

    let report = Aggregator::default_config().aggregate(&analyses);
    let ranked = &report.marketing_suggestions;

    assert_eq!(ranked.len(), 15);
    assert_eq!(ranked[0].suggestion.title, "Lender story");

    // The first occurrence is kept: two mentions at low priority score 2,
    // tying with the posts and keeping its earlier position
    assert_eq!(ranked[1].suggestion.title, "Fraud 101");
    assert_eq!(ranked[1].suggestion.priority, Some(Level::Low));
    assert_eq!(ranked[1].frequency, 2);
    assert_eq!(ranked[2].suggestion.title, "Post 0");
    assert_eq!(ranked[14].suggestion.title, "Post 12");
}

#[test]
fn test_pipeline_overview() {
    let signals = |stage, confidence| DealSignals {
        buying_stage: stage,
        confidence_score: confidence,
        ..DealSignals::default()
    };
    let analyses = vec![
        stored(StructuredAnalysis {
            deal_signals: Some(signals(Some(BuyingStage::Decision), Some(0.9))),
            ..StructuredAnalysis::default()
        }),
        stored(StructuredAnalysis {
            deal_signals: Some(signals(Some(BuyingStage::Decision), Some(0.6))),
            ..StructuredAnalysis::default()
        }),
        stored(StructuredAnalysis {
            deal_signals: Some(signals(None, None)),
            ..StructuredAnalysis::default()
        }),
    ];

    let report = Aggregator::default_config().aggregate(&analyses);

    assert_eq!(report.pipeline_overview.buying_stages.get("Decision"), Some(&2));
    assert_eq!(report.pipeline_overview.buying_stages.get("Unknown"), Some(&1));
    assert_eq!(report.pipeline_overview.avg_confidence, 0.5);
}

#[test]
fn test_aggregate_from_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = SqliteStore::new(temp_dir.path().join("callscope.db")).unwrap();

    let aggregator = Aggregator::new(InsightsConfig::default());
    assert!(aggregator.aggregate_store(&store).unwrap().is_empty());

    for detail in ["Too expensive", "Over budget"] {
        let record = TranscriptRecord::new("Call", "Rep: hi\nProspect: hello", "manual");
        store.insert_transcript(&record).unwrap();
        store
            .save_analysis(&StoredAnalysis {
                id: record.id,
                title: record.title.clone(),
                source: record.source.clone(),
                created_at: record.created_at,
                analysis: StructuredAnalysis {
                    objections: vec![objection(ObjectionCategory::Pricing, detail, None)],
                    ..StructuredAnalysis::default()
                },
            })
            .unwrap();
    }

    let report = aggregator.aggregate_store(&store).unwrap();
    assert_eq!(report.total_transcripts, 2);
    assert_eq!(report.objections[0].count, 2);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["objections"][0]["category"], "Pricing");
}

#[tokio::test]
async fn test_collateral_for_missing_suggestion() {
    let writer = CollateralWriter::with_default_context(
        MockProvider::new("unused"),
        InsightsConfig::default(),
    );
    let analysis = stored(StructuredAnalysis::default());

    let err = writer.generate_for(&analysis, 0, None).await.unwrap_err();
    assert!(matches!(
        err,
        InsightsError::SuggestionNotFound {
            index: 0,
            available: 0
        }
    ));
}
