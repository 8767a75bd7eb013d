//! Plain-text views printed by the CLI.

use crate::models::{Form, QuestionKind};

/// One line per form: status, title, counts and id.
pub fn render_form_list(forms: &[Form]) -> String {
    if forms.is_empty() {
        return "No forms yet. Create one with `forminsight create <FILE>`.\n".to_string();
    }

    let mut out = String::new();
    for form in forms {
        out.push_str(&format!(
            "{} {:<7} {}  ({} questions, {} responses)  {}\n",
            form.status().emoji(),
            form.status().to_string(),
            form.title,
            form.questions.len(),
            form.responses.len(),
            form.id
        ));
        if let Some(ref description) = form.description {
            out.push_str(&format!("     {}\n", description));
        }
    }

    out
}

/// A form as a respondent sees it.
pub fn render_form(form: &Form) -> String {
    let mut out = String::new();

    out.push_str(&format!("📋 {}\n", form.title));
    if let Some(ref description) = form.description {
        out.push_str(&format!("   {}\n", description));
    }

    if !form.is_active {
        out.push_str("\n⛔ This form is closed and is no longer accepting responses.\n");
        return out;
    }

    out.push('\n');
    for (i, question) in form.questions.iter().enumerate() {
        let marker = if question.required { " *" } else { "" };
        out.push_str(&format!("{}. {}{}\n", i + 1, question.prompt, marker));

        match question.kind {
            QuestionKind::Choice => {
                for option in &question.options {
                    out.push_str(&format!("   ( ) {}\n", option));
                }
            }
            QuestionKind::Text => out.push_str(&format!("   [{}]\n", question.kind)),
        }
        out.push_str(&format!("   id: {}\n\n", question.id));
    }

    out.push_str(&format!(
        "Answer with: forminsight submit {} -a 1=<answer> ...\n",
        form.id
    ));

    out
}

/// The share view: link, QR code and a note when the form is closed.
pub fn render_share(form: &Form, url: &str, qr: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("🔗 Share \"{}\"\n\n", form.title));
    if !qr.is_empty() {
        out.push_str(qr);
        if !qr.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(&format!("   {}\n", url));

    if !form.is_active {
        out.push_str(
            "\nNote: This form is currently closed and not accepting responses.\nReopen it to start collecting responses again.\n",
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use chrono::Utc;

    fn create_test_form() -> Form {
        Form {
            id: "form-1".to_string(),
            title: "Team lunch".to_string(),
            description: Some("Friday plans".to_string()),
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    kind: QuestionKind::Choice,
                    prompt: "Where?".to_string(),
                    options: vec!["Pizza".to_string(), "Sushi".to_string()],
                    required: true,
                },
                Question {
                    id: "q2".to_string(),
                    kind: QuestionKind::Text,
                    prompt: "Anything else?".to_string(),
                    options: Vec::new(),
                    required: false,
                },
            ],
            is_active: true,
            created_at: Utc::now(),
            responses: Vec::new(),
        }
    }

    #[test]
    fn test_render_form_list() {
        assert!(render_form_list(&[]).starts_with("No forms yet"));

        let list = render_form_list(&[create_test_form()]);
        assert!(list.contains("Active"));
        assert!(list.contains("Team lunch"));
        assert!(list.contains("(2 questions, 0 responses)"));
        assert!(list.contains("form-1"));
    }

    #[test]
    fn test_render_form() {
        let text = render_form(&create_test_form());
        assert!(text.contains("1. Where? *"));
        assert!(text.contains("   ( ) Pizza"));
        assert!(text.contains("2. Anything else?\n"));
        assert!(text.contains("   [Text Response]"));
    }

    #[test]
    fn test_render_closed_form() {
        let mut form = create_test_form();
        form.is_active = false;

        let text = render_form(&form);
        assert!(text.contains("closed"));
        assert!(!text.contains("Where?"));

        let share = render_share(&form, "http://x/form/form-1", "");
        assert!(share.contains("Note: This form is currently closed"));
    }

    #[test]
    fn test_render_share_without_qr() {
        let share = render_share(&create_test_form(), "http://x/form/form-1", "");
        assert!(share.contains("http://x/form/form-1"));
        assert!(!share.contains("Note:"));
    }
}
