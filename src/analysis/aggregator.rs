//! Response aggregation and statistics.
//!
//! This module turns the responses collected for a form into
//! per-question summaries and the dashboard numbers built on them.

use crate::models::{
    Dashboard, Form, FormSummary, OptionStat, Overview, Question, QuestionKind, QuestionStats,
    QuestionSummary, RecentResponse,
};
use chrono::{DateTime, Utc};

/// Number of responses listed under "Recent Responses".
pub const RECENT_RESPONSES: usize = 5;

/// Summarize every question of a form, in question order.
pub fn summarize(form: &Form) -> FormSummary {
    let questions = form
        .questions
        .iter()
        .map(|question| QuestionSummary {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            stats: question_stats(form, question),
        })
        .collect();

    FormSummary { questions }
}

/// Aggregate the answers given to a single question.
pub fn question_stats(form: &Form, question: &Question) -> QuestionStats {
    let answers = form
        .responses
        .iter()
        .filter_map(|r| r.answer_for(&question.id));

    match question.kind {
        QuestionKind::Choice => {
            let answers: Vec<&str> = answers.filter(|a| question.has_option(a)).collect();
            let total_answered = answers.len();

            let options = question
                .options
                .iter()
                .map(|option| {
                    let count = answers.iter().filter(|a| **a == option.as_str()).count();
                    OptionStat {
                        option: option.clone(),
                        count,
                        percentage: percentage(count, total_answered),
                    }
                })
                .collect();

            QuestionStats::Choice {
                total_answered,
                options,
            }
        }
        QuestionKind::Text => QuestionStats::Text {
            answers: answers.map(String::from).collect(),
        },
    }
}

/// `count / total` as a whole percentage, rounding halves up. Zero when `total` is zero.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }

    ((count * 200 + total) / (total * 2)) as u32
}

/// The `n` most recent responses, newest first, numbered from the total down.
pub fn recent_responses(form: &Form, n: usize) -> Vec<RecentResponse> {
    let total = form.responses.len();
    let mut sorted: Vec<_> = form.responses.iter().collect();
    // Stable sort keeps insertion order for equal timestamps
    sorted.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    sorted
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, r)| RecentResponse {
            number: total - i,
            response_id: r.id.clone(),
            submitted_at: r.submitted_at,
        })
        .collect()
}

/// Collect everything the stats report shows for a form.
pub fn build_dashboard(form: &Form, generated_at: DateTime<Utc>) -> Dashboard {
    Dashboard {
        form_id: form.id.clone(),
        title: form.title.clone(),
        description: form.description.clone(),
        generated_at,
        overview: Overview::from_form(form),
        summary: summarize(form),
        recent_responses: recent_responses(form, RECENT_RESPONSES),
    }
}
