//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use callscope_domain::{Level, StoredAnalysis};
use callscope_extractor::ChunkFailure;
use callscope_insights::AggregateReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

fn level(level: Option<Level>) -> &'static str {
    level.map_or("-", |l| l.as_str())
}

fn format_timestamp(secs: u64) -> String {
    // Days since epoch to civil date (proleptic Gregorian)
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60
    )
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the analysis list.
    pub fn format_list(&self, analyses: &[StoredAnalysis]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(analyses)?);
        }
        if analyses.is_empty() {
            return Ok(self.colorize("No analyses found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Source", "Created", "Objections", "Stage"]);

        for stored in analyses {
            let a = &stored.analysis;
            let stage = a
                .deal_signals
                .as_ref()
                .and_then(|d| d.buying_stage)
                .map_or("-", |s| s.as_str());
            builder.push_record([
                stored.id.to_string(),
                stored.title.clone(),
                stored.source.clone(),
                format_timestamp(stored.created_at),
                a.objections.len().to_string(),
                stage.to_string(),
            ]);
        }

        Ok(self.render(builder))
    }

    /// Format one analysis in full.
    pub fn format_analysis(&self, stored: &StoredAnalysis) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(stored)?);
        }

        let a = &stored.analysis;
        let mut out = Vec::new();

        out.push(self.colorize(&stored.title, "cyan"));
        out.push(format!(
            "{} · {} · {}",
            stored.id,
            stored.source,
            format_timestamp(stored.created_at)
        ));
        out.push(String::new());
        out.push(a.summary.clone());

        let p = &a.prospect;
        let prospect: Vec<String> = [
            ("Name", &p.name),
            ("Role", &p.role),
            ("Company size", &p.company_size),
            ("Segment", &p.industry_segment),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect();
        if !prospect.is_empty() {
            out.push(String::new());
            out.push(self.heading("Prospect"));
            out.extend(prospect.into_iter().map(|l| format!("  {}", l)));
        }

        if let Some(signals) = &a.deal_signals {
            out.push(String::new());
            out.push(self.heading("Deal signals"));
            out.push(format!(
                "  Stage: {}  Urgency: {}  Confidence: {}",
                signals.buying_stage.map_or("-", |s| s.as_str()),
                level(signals.urgency),
                signals
                    .confidence_score
                    .map_or("-".to_string(), |c| format!("{:.2}", c))
            ));
            for blocker in &signals.blockers {
                out.push(format!("  Blocker: {}", blocker));
            }
        }

        if !a.objections.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Category", "Severity", "Detail", "Suggested response"]);
            for o in &a.objections {
                builder.push_record([
                    o.category.to_string(),
                    level(o.severity).to_string(),
                    o.detail.clone(),
                    o.suggested_response.clone().unwrap_or_default(),
                ]);
            }
            out.push(String::new());
            out.push(self.heading("Objections"));
            out.push(self.render(builder));
        }

        if !a.opportunities.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Category", "Strength", "Detail", "Modules"]);
            for o in &a.opportunities {
                builder.push_record([
                    o.category.to_string(),
                    level(o.strength).to_string(),
                    o.detail.clone(),
                    o.modules_relevant.join(", "),
                ]);
            }
            out.push(String::new());
            out.push(self.heading("Opportunities"));
            out.push(self.render(builder));
        }

        if !a.modules_discussed.is_empty() {
            out.push(String::new());
            out.push(self.heading("Modules discussed"));
            for m in &a.modules_discussed {
                out.push(format!(
                    "  {} ({})",
                    m.module,
                    m.interest_level.map_or("-", |l| l.as_str())
                ));
            }
        }

        if !a.key_phrases.is_empty() {
            out.push(String::new());
            out.push(self.heading("Key phrases"));
            for k in &a.key_phrases {
                out.push(format!("  \"{}\"", k.phrase));
            }
        }

        if !a.messaging_themes.is_empty() {
            out.push(String::new());
            out.push(self.heading("Messaging themes"));
            for t in &a.messaging_themes {
                out.push(format!("  [{}] {}", level(t.priority), t.theme));
            }
        }

        if !a.marketing_suggestions.is_empty() {
            out.push(String::new());
            out.push(self.heading("Marketing suggestions"));
            for (i, s) in a.marketing_suggestions.iter().enumerate() {
                out.push(format!(
                    "  {}. [{}] {} ({})",
                    i,
                    s.kind.map_or("Content", |k| k.as_str()),
                    s.title,
                    level(s.priority)
                ));
            }
        }

        if !a.next_steps.is_empty() {
            out.push(String::new());
            out.push(self.heading("Next steps"));
            for step in &a.next_steps {
                out.push(format!("  - {}", step));
            }
        }

        Ok(out.join("\n"))
    }

    /// Format the cross-transcript report.
    pub fn format_report(&self, report: &AggregateReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }
        if report.is_empty() {
            return Ok(self.colorize(&report.summary(), "yellow"));
        }

        let mut out = vec![
            self.heading(&format!("{} transcript(s) analyzed", report.total_transcripts)),
            format!(
                "Average deal confidence: {:.2}",
                report.pipeline_overview.avg_confidence
            ),
        ];

        if !report.objections.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Objection", "Count", "Avg severity", "Score", "Top detail"]);
            for o in &report.objections {
                builder.push_record([
                    o.category.to_string(),
                    o.count.to_string(),
                    format!("{:.1}", o.avg_severity),
                    format!("{:.1}", o.priority_score),
                    o.top_details.first().cloned().unwrap_or_default(),
                ]);
            }
            out.push(String::new());
            out.push(self.render(builder));
        }

        if !report.opportunities.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Opportunity", "Count", "Avg strength", "Score", "Modules"]);
            for o in &report.opportunities {
                builder.push_record([
                    o.category.to_string(),
                    o.count.to_string(),
                    format!("{:.1}", o.avg_strength),
                    format!("{:.1}", o.priority_score),
                    o.relevant_modules.join(", "),
                ]);
            }
            out.push(String::new());
            out.push(self.render(builder));
        }

        if !report.marketing_suggestions.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Type", "Title", "Priority", "Frequency"]);
            for s in &report.marketing_suggestions {
                builder.push_record([
                    s.suggestion.kind.map_or("-", |k| k.as_str()).to_string(),
                    s.suggestion.title.clone(),
                    level(s.suggestion.priority).to_string(),
                    s.frequency.to_string(),
                ]);
            }
            out.push(String::new());
            out.push(self.render(builder));
        }

        if !report.pipeline_overview.buying_stages.is_empty() {
            out.push(String::new());
            out.push(self.heading("Buying stages"));
            for (stage, count) in &report.pipeline_overview.buying_stages {
                out.push(format!("  {}: {}", stage, count));
            }
        }

        Ok(out.join("\n"))
    }

    /// Describe chunks whose responses could not be used.
    pub fn chunk_failures(&self, failures: &[ChunkFailure], chunks_total: usize) -> String {
        let mut lines = vec![self.warning(&format!(
            "{} of {} chunk(s) could not be parsed and were skipped",
            failures.len(),
            chunks_total
        ))];
        for f in failures {
            lines.push(format!("  chunk {}: {}", f.chunk, f.reason));
        }
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn heading(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
