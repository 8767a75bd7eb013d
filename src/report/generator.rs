//! Markdown report generation.
//!
//! This module generates the statistics report for a form from its
//! dashboard, in Markdown or JSON.

use crate::models::{Dashboard, Overview, QuestionStats, QuestionSummary, RecentResponse};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", dashboard.title));
    if let Some(ref description) = dashboard.description {
        output.push_str(&format!("{}\n\n", description));
    }

    output.push_str(&generate_overview_section(&dashboard.overview));
    output.push_str(&generate_questions_section(&dashboard.summary.questions));
    output.push_str(&generate_recent_section(&dashboard.recent_responses));
    output.push_str(&generate_footer(dashboard));

    output
}

/// Generate the overview section.
fn generate_overview_section(overview: &Overview) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Total Responses | Questions | Completion Rate | Status |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {}% | {} {} |\n\n",
        overview.total_responses,
        overview.question_count,
        overview.completion_rate,
        overview.status.emoji(),
        overview.status
    ));

    section
}

/// Generate one block per question, in form order.
fn generate_questions_section(questions: &[QuestionSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Question Statistics\n\n");

    for (i, question) in questions.iter().enumerate() {
        section.push_str(&format!("### {}. {}\n\n", i + 1, question.prompt));
        section.push_str(&generate_stats_block(&question.stats));
    }

    section
}

/// Generate the body for a single question.
fn generate_stats_block(stats: &QuestionStats) -> String {
    let mut block = String::new();

    if stats.is_empty() {
        block.push_str("*No responses yet*\n\n");
        return block;
    }

    match stats {
        QuestionStats::Choice {
            total_answered,
            options,
        } => {
            block.push_str("| Option | Count | Share |\n");
            block.push_str("|:---|:---:|:---:|\n");
            for option in options {
                block.push_str(&format!(
                    "| {} | {} | {}% |\n",
                    escape_cell(&option.option),
                    option.count,
                    option.percentage
                ));
            }
            block.push_str(&format!("\n*{} answers*\n\n", total_answered));
        }
        QuestionStats::Text { answers } => {
            for answer in answers {
                // Keep multi-line answers inside their quote
                block.push_str(&format!("> {}\n\n", answer.replace('\n', "\n> ")));
            }
        }
    }

    block
}

/// Make text safe inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate the recent responses section.
fn generate_recent_section(recent: &[RecentResponse]) -> String {
    if recent.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Recent Responses\n\n");
    for response in recent {
        section.push_str(&format!(
            "- Response #{} ({})\n",
            response.number,
            response.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer(dashboard: &Dashboard) -> String {
    format!(
        "---\n\n*Form `{}`, report generated {} by FormInsight*\n",
        dashboard.form_id,
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}
