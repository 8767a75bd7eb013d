//! Command handlers.
//!
//! Each handler loads the current store snapshot, performs one operation
//! and saves the resulting snapshot. Handlers return the text to print;
//! success messages go through the notifier.

use crate::analysis::{build_dashboard, generate_insights};
use crate::builder::FormDraft;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::ids::IdGenerator;
use crate::notify::Notifier;
use crate::report;
use crate::share::{encode_qr, share_url, QrFormat, QrOptions};
use crate::store::{FormStore, KeyValueStore, Submission};
use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Everything a command needs to run.
pub struct Context<S, N> {
    pub config: Config,
    pub kv: S,
    pub ids: Box<dyn IdGenerator>,
    pub notifier: N,
    /// Show a spinner while insights are prepared.
    pub show_progress: bool,
}

impl<S: KeyValueStore, N: Notifier> Context<S, N> {
    fn load(&self) -> Result<FormStore> {
        FormStore::load(&self.kv).context("Failed to load forms")
    }

    fn save(&self, store: &FormStore) -> Result<()> {
        store.save(&self.kv).context("Failed to save forms")
    }

    /// Create a form from a definition file. Returns the new form id.
    pub fn create(&mut self, path: &Path) -> Result<String> {
        let draft = FormDraft::load(path)?;
        let store = self.load()?;

        let (store, form_id) = store.create(&draft, &mut *self.ids)?;
        self.save(&store)?;

        self.notifier.success("Form created successfully!");
        Ok(form_id)
    }

    pub fn list(&self) -> Result<String> {
        let store = self.load()?;
        Ok(report::render_form_list(store.forms()))
    }

    pub fn show(&self, form: &str) -> Result<String> {
        let store = self.load()?;
        let form = store.find(form)?;
        Ok(report::render_form(form))
    }

    /// Record a response. Answer keys are question ids or 1-based numbers.
    pub fn submit(&mut self, form: &str, answers: &[(String, String)]) -> Result<String> {
        let store = self.load()?;
        let target = store.find(form)?;

        let mut submission = Submission::new(target.id.clone());
        for (key, value) in answers {
            // Unresolvable keys are passed through and rejected by the store
            let question_id = target
                .resolve_question(key)
                .map(|q| q.id.clone())
                .unwrap_or_else(|| key.clone());
            submission = submission.answer(question_id, value.clone());
        }

        let (store, response_id) = store.append_response(submission, &mut *self.ids)?;
        self.save(&store)?;

        self.notifier.success("Response submitted successfully!");
        Ok(response_id)
    }

    /// Flip a form between active and closed. Returns the new active flag.
    pub fn toggle(&self, form: &str) -> Result<bool> {
        let store = self.load()?;
        let form_id = store.find(form)?.id.clone();

        let store = store.toggle_active(&form_id)?;
        self.save(&store)?;

        let active = store.get(&form_id).is_some_and(|f| f.is_active);
        if active {
            self.notifier.success("Form reopened successfully");
        } else {
            self.notifier.success("Form closed successfully");
        }
        Ok(active)
    }

    pub fn stats(&self, form: &str, format: OutputFormat) -> Result<String> {
        let store = self.load()?;
        let form = store.find(form)?;

        let dashboard = build_dashboard(form, self.ids.now());
        debug!(
            "Dashboard for {}: {} questions, {} responses",
            form.id,
            dashboard.summary.questions.len(),
            dashboard.overview.total_responses
        );

        match format {
            OutputFormat::Json => report::generate_json_report(&dashboard),
            OutputFormat::Markdown => Ok(report::generate_markdown_report(&dashboard)),
        }
    }

    pub async fn insights(&self, form: &str) -> Result<String> {
        let store = self.load()?;
        let form = store.find(form)?;

        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Analyzing responses...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let text = generate_insights(form, self.config.insights.delay()).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        Ok(text)
    }

    /// Share link and terminal QR code; optionally also an SVG file.
    pub async fn share(&self, form: &str, svg: Option<&Path>) -> Result<String> {
        let store = self.load()?;
        let form = store.find(form)?;

        let url = share_url(&self.config.general.base_url, &form.id);
        let options = QrOptions::from(&self.config.share);

        let qr = encode_qr(&url, QrFormat::Terminal, &options).await;

        if let Some(path) = svg {
            let image = encode_qr(&url, QrFormat::Svg, &options).await;
            if image.is_empty() {
                self.notifier.error("Could not generate a QR code image");
            } else {
                std::fs::write(path, image)
                    .with_context(|| format!("Failed to write QR code to {}", path.display()))?;
                info!("QR code written to {}", path.display());
                self.notifier
                    .success(&format!("QR code saved to {}", path.display()));
            }
        }

        Ok(report::render_share(form, &url, &qr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::QuestionStats;
    use crate::notify::RecordingNotifier;
    use crate::store::persist::MemoryStore;
    use crate::store::SubmissionError;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"
title = "Team lunch"

[[questions]]
kind = "choice"
prompt = "Where?"
options = ["Pizza", "Sushi"]
required = true

[[questions]]
kind = "text"
prompt = "Anything else?"
"#;

    fn make_context() -> Context<MemoryStore, RecordingNotifier> {
        let mut config = Config::default();
        config.insights.delay_ms = 0;
        config.general.base_url = "https://forms.example.com/".to_string();

        Context {
            config,
            kv: MemoryStore::default(),
            ids: Box::new(SequentialIds::new("id")),
            notifier: RecordingNotifier::default(),
            show_progress: false,
        }
    }

    fn create_form(ctx: &mut Context<MemoryStore, RecordingNotifier>) -> (TempDir, String) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lunch.toml");
        std::fs::write(&path, DEFINITION).unwrap();
        let id = ctx.create(&path).unwrap();
        (dir, id)
    }

    fn answers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_create_and_list() {
        let mut ctx = make_context();
        let (_dir, id) = create_form(&mut ctx);

        assert_eq!(id, "id-3");
        let list = ctx.list().unwrap();
        assert!(list.contains("Team lunch"));
        assert!(ctx
            .notifier
            .messages
            .borrow()
            .contains(&(true, "Form created successfully!".to_string())));
    }

    #[test]
    fn test_submit_by_number_and_stats() {
        let mut ctx = make_context();
        let (_dir, id) = create_form(&mut ctx);

        ctx.submit("id-3", &answers(&[("1", "Pizza"), ("2", "hello")]))
            .unwrap();
        ctx.submit("id-3", &answers(&[("1", "Pizza")])).unwrap();
        ctx.submit("id-3", &answers(&[("id-1", "Sushi"), ("2", "world")]))
            .unwrap();

        let json = ctx.stats(&id, OutputFormat::Json).unwrap();
        let dashboard: crate::models::Dashboard = serde_json::from_str(&json).unwrap();

        assert_eq!(dashboard.overview.total_responses, 3);
        match dashboard.summary.get("id-1") {
            Some(QuestionStats::Choice { options, .. }) => {
                assert_eq!(options[0].count, 2);
                assert_eq!(options[0].percentage, 67);
                assert_eq!(options[1].percentage, 33);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
        assert_eq!(
            dashboard.summary.get("id-2"),
            Some(&QuestionStats::Text {
                answers: vec!["hello".to_string(), "world".to_string()]
            })
        );
    }

    #[test]
    fn test_submit_errors_are_typed() {
        let mut ctx = make_context();
        let (_dir, id) = create_form(&mut ctx);

        let err = ctx.submit(&id, &answers(&[("2", "no choice")])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SubmissionError>(),
            Some(SubmissionError::MissingRequired { .. })
        ));

        let err = ctx.submit(&id, &answers(&[("9", "x")])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SubmissionError>(),
            Some(&SubmissionError::UnknownQuestion("9".to_string()))
        );

        assert!(ctx.submit("missing", &answers(&[("1", "Pizza")])).is_err());
    }

    #[test]
    fn test_toggle_blocks_submissions() {
        let mut ctx = make_context();
        let (_dir, id) = create_form(&mut ctx);

        assert!(!ctx.toggle(&id).unwrap());
        let err = ctx.submit(&id, &answers(&[("1", "Pizza")])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SubmissionError>(),
            Some(&SubmissionError::FormClosed)
        );
        assert!(ctx.show(&id).unwrap().contains("closed"));

        assert!(ctx.toggle(&id).unwrap());
        assert!(ctx.submit(&id, &answers(&[("1", "Pizza")])).is_ok());
    }

    #[tokio::test]
    async fn test_insights_and_share() {
        let mut ctx = make_context();
        let (dir, id) = create_form(&mut ctx);
        ctx.submit(&id, &answers(&[("1", "Sushi")])).unwrap();

        let insights = ctx.insights(&id).await.unwrap();
        assert!(insights.contains("\"Sushi\" was the most popular choice (100% of responses)"));

        let svg_path = dir.path().join("qr.svg");
        let share = ctx.share(&id, Some(&svg_path)).await.unwrap();
        assert!(share.contains("https://forms.example.com/form/id-3"));
        let svg = std::fs::read_to_string(&svg_path).unwrap();
        assert!(svg.contains("<svg"));
    }
}
