//! LLM prompt engineering for transcript analysis

use callscope_domain::{
    BuyingStage, ContentType, MarketingSuggestion, ObjectionCategory, OpportunityCategory,
};

/// Built-in description of the product being sold, embedded in every prompt
pub const DEFAULT_PRODUCT_CONTEXT: &str = r#"HyperVerge provides AI Agents for Small Business Underwriting. Key product modules:
1. Application Intake - Email parsing, document classification, PDF extraction, CRM syncing (97% automation, ~30 sec)
2. Cash Flow Analysis - Bank statement analysis, fraud detection, revenue/alt lender identification (98% accuracy, <5 sec)
3. CLEAR/TLO/LexisNexis Review - Risk intelligence, UCCs, liens, criminal records extraction (~15 sec, 80% auto-approved)
4. Industry Classification - AI-based SIC/NAICS prediction from multi-source data (80% top-1 accuracy, ~30-75 sec)

Key value propositions:
- Cuts time-to-offer from hours to minutes
- 1B+ customers onboarded, 450+ enterprise clients
- ISO certified, NIST FRVT #3, DHS S&T benchmarks
- Modular architecture (use entire journey or 1 module)
- No-code workflows via HyperVerge One platform
- Competitive pricing, fastest go-live
- Clients include Kapitus, Expansion Capital Group, Fundkite, HSBC, Revolut

Target personas: Operations, Underwriting, Risk, Product teams at small business lenders/MCA companies.
Common pain points in the market: Manual underwriting TAT, inconsistent formats, scanned PDF parsing, fraud risk, subjective industry tagging, multiple vendor management."#;

/// Builds the analysis prompt for one transcript chunk
///
/// Layout: instructions, product context, JSON schema, `TRANSCRIPT:` marker,
/// an optional positional note for multi-part transcripts, then the chunk.
pub struct PromptBuilder<'a> {
    context: &'a str,
    part: Option<(usize, usize)>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder around a product context block
    pub fn new(context: &'a str) -> Self {
        Self {
            context,
            part: None,
        }
    }

    /// Mark the chunk as part `number` (1-based) of `total`
    ///
    /// The note is only emitted when `total > 1`.
    pub fn with_part(mut self, number: usize, total: usize) -> Self {
        self.part = Some((number, total));
        self
    }

    /// Build the complete analysis prompt
    pub fn build(&self, chunk_text: &str) -> String {
        let schema = analysis_schema();
        let mut prompt = String::with_capacity(
            ANALYSIS_INSTRUCTIONS.len()
                + self.context.len()
                + schema.len()
                + chunk_text.len()
                + 256,
        );

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(self.context.trim());
        prompt.push_str("\n\n");
        prompt.push_str(&schema);
        prompt.push_str("\n\nTRANSCRIPT:\n");

        if let Some((number, total)) = self.part.filter(|&(_, total)| total > 1) {
            prompt.push_str(&format!(
                "\n\n[NOTE: This is part {} of {} of a long transcript. Analyze this section thoroughly.]\n\n",
                number, total
            ));
        }

        prompt.push_str(chunk_text);
        prompt
    }
}

/// Builds the prompt that turns a marketing suggestion into finished content
pub fn collateral_prompt(
    context: &str,
    suggestion: &MarketingSuggestion,
    additional_context: Option<&str>,
) -> String {
    let kind = suggestion.kind.map_or("Unspecified", |k| k.as_str());
    let outline = suggestion
        .outline
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or("None provided");
    let extra = additional_context
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("None");

    format!(
        "{}\n\n{}\n\nCOLLATERAL TYPE: {}\nTITLE: {}\nDESCRIPTION: {}\nADDRESSES: {}\nOUTLINE: {}\nADDITIONAL CONTEXT: {}\n\n{}",
        COLLATERAL_INSTRUCTIONS,
        context.trim(),
        kind,
        suggestion.title,
        suggestion.description,
        suggestion.addresses,
        outline,
        extra,
        COLLATERAL_FORMAT_REMINDER,
    )
}

fn one_of<T: std::fmt::Display>(values: &[T]) -> String {
    let labels: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("One of: {}", labels.join("|"))
}

fn analysis_schema() -> String {
    format!(
        r#"Return a JSON object with EXACTLY this structure. Return ONLY valid JSON, no markdown, no code fences, no commentary before or after:
{{
  "summary": "2-3 sentence summary of the conversation",
  "prospect": {{
    "name": "Company or person name if mentioned",
    "role": "Role/title if mentioned",
    "company_size": "Size indicator if mentioned",
    "industry_segment": "Their specific segment within lending/fintech"
  }},
  "key_phrases": [
    {{"phrase": "exact or near-exact quote", "context": "why this matters", "sentiment": "positive|negative|neutral"}}
  ],
  "objections": [
    {{
      "category": "{objection_categories}",
      "detail": "Specific objection stated",
      "severity": "high|medium|low",
      "suggested_response": "How to counter this objection",
      "quote": "Relevant quote from transcript if available"
    }}
  ],
  "opportunities": [
    {{
      "category": "{opportunity_categories}",
      "detail": "Specific opportunity identified",
      "strength": "high|medium|low",
      "modules_relevant": ["Which product modules address this"],
      "quote": "Relevant quote from transcript if available"
    }}
  ],
  "modules_discussed": [
    {{
      "module": "Module name",
      "interest_level": "high|medium|low|mentioned",
      "context": "How it came up"
    }}
  ],
  "messaging_themes": [
    {{
      "theme": "Core messaging theme derived from this conversation",
      "rationale": "Why this theme resonates based on conversation signals",
      "target_emotion": "What emotion/need this addresses",
      "priority": "high|medium|low"
    }}
  ],
  "marketing_suggestions": [
    {{
      "type": "{content_types}",
      "title": "Suggested title/topic",
      "description": "What it should cover and why",
      "addresses": "Which objection or opportunity this solves",
      "priority": "high|medium|low",
      "outline": "Brief 3-5 point outline of the content"
    }}
  ],
  "next_steps": ["Recommended follow-up actions"],
  "deal_signals": {{
    "buying_stage": "{buying_stages}",
    "urgency": "high|medium|low",
    "confidence_score": 0.0-1.0,
    "blockers": ["Key blockers to closing"]
  }}
}}

Important: If a category has no items, return an empty array. Always return valid JSON. Be thorough but accurate - don't fabricate information not present in the transcript."#,
        objection_categories = one_of(ObjectionCategory::ALL),
        opportunity_categories = one_of(OpportunityCategory::ALL),
        content_types = one_of(ContentType::ALL),
        buying_stages = one_of(BuyingStage::ALL),
    )
}

const ANALYSIS_INSTRUCTIONS: &str = "You are an expert sales intelligence analyst for a B2B SaaS company in fintech/lending automation. Analyze the following sales call transcript and extract structured intelligence.";

const COLLATERAL_INSTRUCTIONS: &str = "You are a fintech B2B marketing expert. Generate detailed marketing collateral based on this brief.";

const COLLATERAL_FORMAT_REMINDER: &str = "Generate the full content for this marketing piece. Make it compelling, data-driven, and specific to the lending/MCA industry. Use concrete numbers from the product's capabilities where relevant. Format it in clean markdown.";
