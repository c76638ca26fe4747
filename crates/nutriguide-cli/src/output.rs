//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use nutriguide_engine::{
    CompatibilityReport, EntityView, GuideItem, GuideReport, Item, SourceAudit,
};
use nutriguide_store::SeedReport;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Pretty-printed JSON, same shape as the HTTP API
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a compatibility report.
    pub fn format_compatibility(&self, report: &CompatibilityReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }

        let mut title = report.ingredient.clone();
        if let Some(category) = &report.category {
            title.push_str(&format!(" ({})", category));
        }

        let mut out = vec![self.colorize(&title, "cyan")];
        out.push(self.section("Beneficial", "green", self.items_table(&report.beneficial)));
        out.push(self.section("Avoid", "red", self.items_table(&report.avoid)));
        Ok(out.join("\n\n"))
    }

    /// Format a multi-condition guide.
    pub fn format_guide(&self, report: &GuideReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }

        let mut out = vec![self.colorize(&format!("Guide for {}", report.diseases.join(", ")), "cyan")];
        if !report.unresolved.is_empty() {
            out.push(self.warning(&format!(
                "No condition matches: {}",
                report.unresolved.join(", ")
            )));
        }
        out.push(self.section("Beneficial", "green", self.guide_table(&report.beneficial)));
        out.push(self.section("Avoid", "red", self.guide_table(&report.avoid)));
        Ok(out.join("\n\n"))
    }

    /// Format the source audit of one interaction.
    pub fn format_sources(&self, audit: &SourceAudit) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(audit);
        }

        if audit.sources.is_empty() {
            return Ok(self.warning(&format!(
                "Interaction {} has no linked sources (Unverified)",
                audit.interaction_id
            )));
        }

        let mut builder = Builder::default();
        builder.push_record(["Rank", "Label", "Publisher", "Year", "URL"]);
        for (rank, source) in audit.sources.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                source.label.clone(),
                source.publisher.clone().unwrap_or_default(),
                source.year.map(|y| y.to_string()).unwrap_or_default(),
                source.url.clone().unwrap_or_default(),
            ]);
        }
        Ok(self.finish(builder))
    }

    /// Format a resolved entity.
    pub fn format_entity(&self, entity: &EntityView) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(entity);
        }

        let mut builder = Builder::default();
        builder.push_record(["Kind", "ID", "Slug", "Name", "Category"]);
        builder.push_record([
            entity.kind.to_string(),
            entity.id.to_string(),
            entity.slug.clone(),
            entity.name.clone(),
            entity.category.clone().unwrap_or_default(),
        ]);
        Ok(self.finish(builder))
    }

    /// Format a seed import summary.
    pub fn seed_report(&self, report: &SeedReport) -> String {
        self.success(&format!(
            "Imported {} ingredient(s), {} condition(s), {} alias(es), {} source(s), {} interaction(s), {} link(s)",
            report.ingredients,
            report.conditions,
            report.aliases,
            report.sources,
            report.interactions,
            report.links
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn section(&self, heading: &str, color: &str, body: Option<String>) -> String {
        let heading = self.colorize(heading, color);
        match body {
            Some(table) => format!("{}\n{}", heading, table),
            None => format!("{}\n  none", heading),
        }
    }

    fn items_table(&self, items: &[Item]) -> Option<String> {
        if items.is_empty() {
            return None;
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Food", "Evidence", "Reason", "Source"]);
        for item in items {
            builder.push_record(item_row(item));
        }
        Some(self.finish(builder))
    }

    fn guide_table(&self, rows: &[GuideItem]) -> Option<String> {
        if rows.is_empty() {
            return None;
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Food", "Evidence", "Reason", "Source", "Conditions"]);
        for row in rows {
            let mut record = item_row(&row.item).to_vec();
            record.push(row.affected_diseases.join(", "));
            builder.push_record(record);
        }
        Some(self.finish(builder))
    }

    fn finish(&self, builder: Builder) -> String {
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
            "red" => text.red().bold().to_string(),
            "green" => text.green().bold().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().bold().to_string(),
            _ => text.to_string(),
        }
    }
}

fn item_row(item: &Item) -> [String; 5] {
    let source = item
        .sources
        .first()
        .map(|s| match &s.url {
            Some(url) => format!("{} <{}>", s.label, url),
            None => s.label.clone(),
        })
        .unwrap_or_default();

    [
        item.interaction_id.to_string(),
        item.food.clone(),
        format!("{} {}", item.severity, item.evidence_label),
        item.reason.clone(),
        source,
    ]
}
