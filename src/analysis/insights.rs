//! Template-based insight generation.
//!
//! Produces a short narrative summary of a form's responses from fixed
//! templates. The output is deterministic for a given form; the optional
//! delay only paces the interactive experience.

use crate::analysis::aggregator::percentage;
use crate::models::{Form, Question, QuestionKind};
use std::time::Duration;
use tracing::debug;

/// Text answers averaging more than this many characters count as detailed.
const DETAILED_ANSWER_CHARS: f64 = 50.0;

/// Generate insights for a form after waiting `delay`.
pub async fn generate_insights(form: &Form, delay: Duration) -> String {
    if !delay.is_zero() {
        debug!("Pacing insight generation by {:?}", delay);
        tokio::time::sleep(delay).await;
    }

    render_insights(form)
}

/// Build the insight paragraphs for a form.
pub fn render_insights(form: &Form) -> String {
    let total = form.responses.len();

    if total == 0 {
        return "No responses were collected. Consider extending the collection period or improving distribution channels.".to_string();
    }

    let mut insights = Vec::new();

    insights.push(format!(
        "**Response Overview:** Collected {} anonymous responses, indicating {} engagement.",
        total,
        engagement_level(total)
    ));

    for question in form.questions.iter().filter(|q| q.kind == QuestionKind::Choice) {
        let answers = answers_to(form, question);
        if let Some((answer, pct)) = most_common_answer(&answers) {
            insights.push(format!(
                "**{}:** \"{}\" was the most popular choice ({}% of responses), suggesting this is a key preference among your audience.",
                question.prompt, answer, pct
            ));
        }
    }

    for question in form.questions.iter().filter(|q| q.kind == QuestionKind::Text) {
        let answers = answers_to(form, question);
        if answers.is_empty() {
            continue;
        }

        let chars: usize = answers.iter().map(|a| a.chars().count()).sum();
        let average = chars as f64 / answers.len() as f64;
        if average > DETAILED_ANSWER_CHARS {
            insights.push(format!(
                "**{}:** Responses show high engagement with detailed answers (avg. {} characters), indicating strong interest in this topic.",
                question.prompt,
                average.round() as u64
            ));
        }
    }

    insights.push(format!("**Recommendations:** {}", recommendations(form)));

    insights.join("\n\n")
}

fn engagement_level(total: usize) -> &'static str {
    if total > 20 {
        "strong"
    } else if total > 10 {
        "moderate"
    } else {
        "initial"
    }
}

/// Non-empty answers to a question, in response order.
fn answers_to<'a>(form: &'a Form, question: &Question) -> Vec<&'a str> {
    form.responses
        .iter()
        .filter_map(|r| r.answer_for(&question.id))
        .collect()
}

/// The most frequent answer and its rounded share. Ties go to the answer seen first.
fn most_common_answer<'a>(answers: &[&'a str]) -> Option<(&'a str, u32)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for answer in answers {
        match counts.iter_mut().find(|(a, _)| a == answer) {
            Some((_, count)) => *count += 1,
            None => counts.push((*answer, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (answer, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((answer, count));
        }
    }

    best.map(|(answer, count)| (answer, percentage(count, answers.len())))
}

fn recommendations(form: &Form) -> String {
    let total = form.responses.len();
    let mut recs = Vec::new();

    if total < 10 {
        recs.push("Consider broader distribution to increase sample size");
    }

    if total > 50 {
        recs.push("Strong response rate suggests high market interest - consider follow-up research");
    }

    if form.questions.iter().any(|q| q.kind == QuestionKind::Text) {
        recs.push("Analyze qualitative feedback for deeper insights and feature development opportunities");
    }

    if recs.is_empty() {
        "Consider follow-up surveys to gather more targeted insights.".to_string()
    } else {
        format!("{}.", recs.join(", "))
    }
}
