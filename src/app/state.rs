//! Application state
//!
//! All UI state lives in one explicit `AppState` owned by the app. Views
//! read it and change it through the methods below; worker results come
//! back through `AppState::handle_result`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::slider::ComparisonSlider;
use crate::animation::LoadingTicker;
use crate::api::{AspectRatio, Job, JobKind, JobResult};
use crate::error::{AppError, AppResult};
use crate::i18n::{Language, Translations};
use crate::render::{auto_font_size, IconId, ImageArtifact, TextOverlaySpec};
use crate::utils::file::{file_to_data_url, save_download, DataUrlParts, EDITED_FILENAME, GENERATED_FILENAME};

/// Top-level tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Generate,
    Edit,
}

/// Preset edit instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    RemoveBackground,
    Upscale,
    ChangeColor,
}

impl QuickAction {
    pub const ALL: [QuickAction; 3] = [
        QuickAction::RemoveBackground,
        QuickAction::Upscale,
        QuickAction::ChangeColor,
    ];

    /// Instruction sent to the edit model
    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::RemoveBackground => {
                "Remove the background, leaving only the main subject. The new background should be transparent."
            }
            QuickAction::Upscale => {
                "Upscale the image to a higher resolution, enhancing details and clarity without changing the content."
            }
            QuickAction::ChangeColor => "Change the color of ",
        }
    }

    /// Whether the action submits right away; `ChangeColor` needs the user
    /// to finish the sentence first.
    pub fn submits(&self) -> bool {
        !matches!(self, QuickAction::ChangeColor)
    }

    pub fn label(&self, strings: &Translations) -> &'static str {
        match self {
            QuickAction::RemoveBackground => strings.qa_remove_bg,
            QuickAction::Upscale => strings.qa_upscale,
            QuickAction::ChangeColor => strings.qa_color,
        }
    }

    pub fn icon(&self) -> IconId {
        match self {
            QuickAction::RemoveBackground => IconId::RemoveBg,
            QuickAction::Upscale => IconId::Upscale,
            QuickAction::ChangeColor => IconId::ColorPalette,
        }
    }
}

/// True when `result` answers the request recorded in `pending`
fn is_current(pending: Option<Uuid>, result: &JobResult) -> bool {
    if pending == Some(result.id) {
        true
    } else {
        debug!("Dropping stale {:?} result {}", result.kind, result.id);
        false
    }
}

/// Generate tab
#[derive(Debug, Default)]
pub struct GeneratorState {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub error: Option<String>,
    pub image: Option<ImageArtifact>,
    pub notice: Option<String>,
    ticker: Option<LoadingTicker>,
    pending: Option<Uuid>,
}

impl GeneratorState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Current loading message, in the language of `strings`
    pub fn loading_message(&self, strings: &Translations) -> Option<&'static str> {
        self.ticker.as_ref().map(|ticker| ticker.message(strings.loading_gen))
    }

    /// Validate the prompt and build the generate job
    pub fn begin_generate(&mut self, strings: &Translations, interval: Duration, now: Instant) -> AppResult<Job> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            let err = AppError::Validation(strings.gen_error_prompt.to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        let id = Uuid::new_v4();
        let job = Job::Generate {
            id,
            prompt: prompt.to_string(),
            aspect_ratio: self.aspect_ratio,
        };

        self.error = None;
        self.notice = None;
        self.image = None;
        self.pending = Some(id);
        self.ticker = Some(LoadingTicker::start(interval, now));
        Ok(job)
    }

    /// Apply a generate result; returns false if it was stale
    pub fn finish(&mut self, result: JobResult) -> bool {
        if !is_current(self.pending, &result) {
            return false;
        }
        self.pending = None;
        self.ticker = None;

        match result.outcome {
            Ok(artifact) => self.image = Some(artifact),
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Rotate the loading message; returns when the next rotation is due
    pub fn poll_ticker(&mut self, now: Instant, strings: &Translations) -> Option<Instant> {
        let ticker = self.ticker.as_mut()?;
        ticker.poll(now, strings.loading_gen.len());
        Some(ticker.next_deadline())
    }

    /// Write the generated image into `dir`
    pub fn download(&mut self, dir: &Path, strings: &Translations) -> AppResult<PathBuf> {
        let Some(image) = &self.image else {
            return Err(AppError::Validation(strings.download_error_empty.to_string()));
        };
        save_download(dir, GENERATED_FILENAME, image.bytes())
    }
}

/// Edit tab
#[derive(Debug, Default)]
pub struct EditorState {
    /// Path typed into the source field
    pub source_path: String,
    pub prompt: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    /// Overlay inputs
    pub overlay: TextOverlaySpec,
    pub slider: ComparisonSlider,

    source: Option<DataUrlParts>,
    original: Option<ImageArtifact>,
    /// Clean model output, never annotated
    base_edited: Option<ImageArtifact>,
    /// What is shown and downloaded; `base_edited` plus any overlay
    displayed: Option<ImageArtifact>,

    ticker: Option<LoadingTicker>,
    pending_edit: Option<Uuid>,
    pending_overlay: Option<Uuid>,
}

impl EditorState {
    pub fn is_loading(&self) -> bool {
        self.pending_edit.is_some()
    }

    pub fn is_overlay_busy(&self) -> bool {
        self.pending_overlay.is_some()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn original(&self) -> Option<&ImageArtifact> {
        self.original.as_ref()
    }

    pub fn base_edited(&self) -> Option<&ImageArtifact> {
        self.base_edited.as_ref()
    }

    pub fn displayed(&self) -> Option<&ImageArtifact> {
        self.displayed.as_ref()
    }

    /// Both layers of the comparison are available
    pub fn has_comparison(&self) -> bool {
        self.original.is_some() && self.displayed.is_some()
    }

    pub fn loading_message(&self, strings: &Translations) -> Option<&'static str> {
        self.ticker.as_ref().map(|ticker| ticker.message(strings.loading_edit))
    }

    /// Read `source_path` as the new source image
    pub fn load_source(&mut self, strings: &Translations) -> AppResult<()> {
        let path = PathBuf::from(self.source_path.trim());
        let result = Self::read_source(&path, strings);
        match result {
            Ok((parts, artifact)) => {
                info!("Loaded source image {}", path.display());
                self.source = Some(parts);
                self.original = Some(artifact);
                self.base_edited = None;
                self.displayed = None;
                self.error = None;
                self.notice = None;
                self.prompt.clear();
                self.slider.reset();
                self.pending_edit = None;
                self.pending_overlay = None;
                self.ticker = None;
                Ok(())
            }
            Err(e) => {
                warn!("Could not load {}: {}", path.display(), e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn read_source(path: &Path, strings: &Translations) -> AppResult<(DataUrlParts, ImageArtifact)> {
        let parts = file_to_data_url(path)?;
        if !parts.mime_type.starts_with("image/") {
            return Err(AppError::Validation(strings.edit_error_not_image.to_string()));
        }
        let artifact = ImageArtifact::from_base64(&parts.base64, &parts.mime_type)?;
        Ok((parts, artifact))
    }

    /// Build an edit job for the loaded source
    ///
    /// `instruction` overrides the prompt field, as quick actions do.
    pub fn begin_edit(
        &mut self,
        instruction: Option<&str>,
        strings: &Translations,
        interval: Duration,
        now: Instant,
    ) -> AppResult<Job> {
        let instruction = instruction.unwrap_or(self.prompt.as_str()).trim().to_string();
        let Some(source) = self.source.as_ref().filter(|_| !instruction.is_empty()) else {
            return Err(self.reject(strings.edit_error_upload));
        };

        let id = Uuid::new_v4();
        let job = Job::Edit {
            id,
            base64: source.base64.clone(),
            mime_type: source.mime_type.clone(),
            instruction,
        };

        self.error = None;
        self.notice = None;
        self.base_edited = None;
        self.displayed = None;
        self.slider.end_drag();
        self.pending_edit = Some(id);
        self.pending_overlay = None;
        self.ticker = Some(LoadingTicker::start(interval, now));
        Ok(job)
    }

    /// Fill the prompt from a quick action; returns the job if it submits
    pub fn quick_action(
        &mut self,
        action: QuickAction,
        strings: &Translations,
        interval: Duration,
        now: Instant,
    ) -> AppResult<Option<Job>> {
        self.prompt = action.prompt().to_string();
        if !action.submits() {
            return Ok(None);
        }
        self.begin_edit(None, strings, interval, now).map(Some)
    }

    /// Apply an edit result; returns false if it was stale
    pub fn finish_edit(&mut self, result: JobResult) -> bool {
        if !is_current(self.pending_edit, &result) {
            return false;
        }
        self.pending_edit = None;
        self.ticker = None;

        match result.outcome {
            Ok(artifact) => {
                match artifact.dimensions() {
                    Ok((width, _)) => self.overlay.font_size = auto_font_size(width),
                    Err(e) => warn!("Edited image has unreadable dimensions: {}", e),
                }
                self.base_edited = Some(artifact.clone());
                self.displayed = Some(artifact);
                self.slider.reset();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Build an overlay job; always composites onto the clean edit
    pub fn overlay_request(&mut self, strings: &Translations) -> AppResult<Job> {
        if self.overlay.text.trim().is_empty() {
            return Err(self.reject(strings.tool_error_text));
        }
        let Some(base) = self.base_edited.clone() else {
            return Err(self.reject(strings.edit_error_upload));
        };

        let id = Uuid::new_v4();
        self.pending_overlay = Some(id);
        self.error = None;
        Ok(Job::Overlay {
            id,
            base,
            spec: self.overlay.clone(),
        })
    }

    fn reject(&mut self, message: &str) -> AppError {
        self.error = Some(message.to_string());
        AppError::Validation(message.to_string())
    }

    /// Apply an overlay result; returns false if it was stale
    pub fn finish_overlay(&mut self, result: JobResult) -> bool {
        if !is_current(self.pending_overlay, &result) {
            return false;
        }
        self.pending_overlay = None;

        match result.outcome {
            Ok(artifact) => self.displayed = Some(artifact),
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Start dragging the reveal boundary; ignored until an edit exists
    pub fn begin_slider_drag(&mut self) {
        if self.has_comparison() {
            self.slider.begin_drag();
        }
    }

    pub fn poll_ticker(&mut self, now: Instant, strings: &Translations) -> Option<Instant> {
        let ticker = self.ticker.as_mut()?;
        ticker.poll(now, strings.loading_edit.len());
        Some(ticker.next_deadline())
    }

    /// Write the displayed edit, overlay included, into `dir`
    pub fn download(&mut self, dir: &Path, strings: &Translations) -> AppResult<PathBuf> {
        let Some(image) = &self.displayed else {
            return Err(AppError::Validation(strings.download_error_empty.to_string()));
        };
        save_download(dir, EDITED_FILENAME, image.bytes())
    }
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    active_view: ActiveView,
    language: Language,
    pub generator: GeneratorState,
    pub editor: EditorState,
    pub download_dir: PathBuf,
    pub loading_interval: Duration,
}

impl AppState {
    pub fn new(language: Language, download_dir: PathBuf, loading_interval: Duration) -> Self {
        Self {
            active_view: ActiveView::default(),
            language,
            generator: GeneratorState::default(),
            editor: EditorState::default(),
            download_dir,
            loading_interval,
        }
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn set_active_view(&mut self, view: ActiveView) {
        if self.active_view != view {
            debug!("Switching to {:?}", view);
            self.active_view = view;
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            info!("Language: {}", language.code());
            self.language = language;
        }
    }

    pub fn strings(&self) -> &'static Translations {
        self.language.strings()
    }

    /// Route a worker result to the view that asked for it
    pub fn handle_result(&mut self, result: JobResult) -> bool {
        match result.kind {
            JobKind::Generate => self.generator.finish(result),
            JobKind::Edit => self.editor.finish_edit(result),
            JobKind::Overlay => self.editor.finish_overlay(result),
        }
    }

    /// Rotate loading messages; returns the earliest next deadline
    pub fn poll_tickers(&mut self, now: Instant) -> Option<Instant> {
        let strings = self.strings();
        match (self.generator.poll_ticker(now, strings), self.editor.poll_ticker(now, strings)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{apply_overlay, FontBook};
    use std::io::Cursor;

    const INTERVAL: Duration = Duration::from_millis(2500);

    fn strings() -> &'static Translations {
        Language::En.strings()
    }

    fn png(width: u32, height: u32) -> ImageArtifact {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([30, 60, 90, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        ImageArtifact::new(out.into_inner(), "image/png")
    }

    fn loaded_editor(dir: &Path) -> EditorState {
        let path = dir.join("source.png");
        std::fs::write(&path, png(64, 32).bytes()).unwrap();
        let mut editor = EditorState {
            source_path: path.display().to_string(),
            ..Default::default()
        };
        editor.load_source(strings()).unwrap();
        editor
    }

    fn ok(job: &Job, artifact: ImageArtifact) -> JobResult {
        JobResult {
            id: job.id(),
            kind: job.kind(),
            outcome: Ok(artifact),
        }
    }

    #[test]
    fn test_empty_prompt_is_validation_error() {
        let mut generator = GeneratorState::default();
        generator.prompt = "   ".to_string();
        let err = generator.begin_generate(strings(), INTERVAL, Instant::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(generator.error.as_deref(), Some(strings().gen_error_prompt));
        assert!(!generator.is_loading());
    }

    #[test]
    fn test_generate_lifecycle() {
        let mut generator = GeneratorState::default();
        generator.prompt = "a red fox".to_string();
        generator.aspect_ratio = AspectRatio::Landscape16x9;

        let job = generator.begin_generate(strings(), INTERVAL, Instant::now()).unwrap();
        assert!(generator.is_loading());
        assert_eq!(generator.loading_message(strings()), Some(strings().loading_gen[0]));

        assert!(generator.finish(ok(&job, png(4, 4))));
        assert!(!generator.is_loading());
        assert!(generator.loading_message(strings()).is_none());
        assert!(generator.image.is_some());
    }

    #[test]
    fn test_generate_error_is_surfaced() {
        let mut generator = GeneratorState::default();
        generator.prompt = "x".to_string();
        let job = generator.begin_generate(strings(), INTERVAL, Instant::now()).unwrap();
        generator.finish(JobResult {
            id: job.id(),
            kind: JobKind::Generate,
            outcome: Err(AppError::Remote("API key not valid.".to_string())),
        });
        assert_eq!(generator.error.as_deref(), Some("API key not valid."));
        assert!(!generator.is_loading());
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut generator = GeneratorState::default();
        generator.prompt = "first".to_string();
        let first = generator.begin_generate(strings(), INTERVAL, Instant::now()).unwrap();
        generator.prompt = "second".to_string();
        let second = generator.begin_generate(strings(), INTERVAL, Instant::now()).unwrap();

        assert!(!generator.finish(ok(&first, png(2, 2))));
        assert!(generator.is_loading());
        assert!(generator.finish(ok(&second, png(3, 3))));
        assert_eq!(generator.image.unwrap().dimensions().unwrap(), (3, 3));
    }

    #[test]
    fn test_edit_requires_source_and_instruction() {
        let mut editor = EditorState::default();
        editor.prompt = "make it blue".to_string();
        assert!(editor.begin_edit(None, strings(), INTERVAL, Instant::now()).is_err());
        assert_eq!(editor.error.as_deref(), Some(strings().edit_error_upload));

        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor(dir.path());
        assert!(editor.begin_edit(None, strings(), INTERVAL, Instant::now()).is_err());
    }

    #[test]
    fn test_non_image_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let mut editor = EditorState {
            source_path: path.display().to_string(),
            ..Default::default()
        };
        assert!(matches!(editor.load_source(strings()), Err(AppError::Validation(_))));
        assert!(!editor.has_source());
    }

    #[test]
    fn test_edit_result_resets_slider_and_sizes_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor(dir.path());
        editor.prompt = "add a hat".to_string();
        let job = editor.begin_edit(None, strings(), INTERVAL, Instant::now()).unwrap();

        match &job {
            Job::Edit { mime_type, instruction, .. } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(instruction, "add a hat");
            }
            other => panic!("unexpected job {:?}", other),
        }

        editor.slider.begin_drag();
        assert!(editor.finish_edit(ok(&job, png(800, 400))));
        assert_eq!(editor.slider.position(), 50.0);
        assert!(!editor.slider.is_dragging());
        assert_eq!(editor.overlay.font_size, 40);
        assert!(editor.has_comparison());
    }

    #[test]
    fn test_quick_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor(dir.path());

        let none = editor
            .quick_action(QuickAction::ChangeColor, strings(), INTERVAL, Instant::now())
            .unwrap();
        assert!(none.is_none());
        assert_eq!(editor.prompt, "Change the color of ");
        assert!(!editor.is_loading());

        let job = editor
            .quick_action(QuickAction::Upscale, strings(), INTERVAL, Instant::now())
            .unwrap()
            .unwrap();
        assert_eq!(job.kind(), JobKind::Edit);
        assert!(editor.is_loading());
    }

    #[test]
    fn test_slider_drag_needs_an_edit() {
        let mut editor = EditorState::default();
        editor.begin_slider_drag();
        assert!(!editor.slider.is_dragging());
    }

    #[test]
    fn test_overlays_do_not_compound() {
        let fonts = FontBook::bitmap_only();
        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor(dir.path());
        editor.prompt = "edit".to_string();
        let job = editor.begin_edit(None, strings(), INTERVAL, Instant::now()).unwrap();
        let base = png(200, 120);
        editor.finish_edit(ok(&job, base.clone()));

        let run = |job: Job| match job {
            Job::Overlay { id, base, spec } => JobResult {
                id,
                kind: JobKind::Overlay,
                outcome: apply_overlay(&base, &spec, &fonts),
            },
            other => panic!("unexpected job {:?}", other),
        };

        editor.overlay.text = "AAAA".to_string();
        editor.overlay.font_size = 24;
        let first = editor.overlay_request(strings()).unwrap();
        assert!(editor.finish_overlay(run(first)));

        editor.overlay.text = "B".to_string();
        let second = editor.overlay_request(strings()).unwrap();
        match &second {
            Job::Overlay { base: job_base, .. } => assert!(job_base.shares_payload(editor.base_edited().unwrap())),
            other => panic!("unexpected job {:?}", other),
        }
        assert!(editor.finish_overlay(run(second)));

        let expected = apply_overlay(&base, &editor.overlay, &fonts).unwrap();
        let shown = editor.displayed().unwrap().decode().unwrap().to_rgba8();
        assert_eq!(shown, expected.decode().unwrap().to_rgba8());
    }

    #[test]
    fn test_overlay_requires_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor(dir.path());
        assert!(editor.overlay_request(strings()).is_err());
        assert_eq!(editor.error.as_deref(), Some(strings().tool_error_text));
    }

    #[test]
    fn test_new_edit_discards_pending_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor(dir.path());
        editor.prompt = "edit".to_string();
        let job = editor.begin_edit(None, strings(), INTERVAL, Instant::now()).unwrap();
        editor.finish_edit(ok(&job, png(100, 100)));

        editor.overlay.text = "hi".to_string();
        let overlay = editor.overlay_request(strings()).unwrap();
        editor.begin_edit(None, strings(), INTERVAL, Instant::now()).unwrap();
        assert!(!editor.finish_overlay(ok(&overlay, png(100, 100))));
        assert!(editor.displayed().is_none());
    }

    #[test]
    fn test_download_writes_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = GeneratorState {
            image: Some(png(2, 2)),
            ..Default::default()
        };
        let path = generator.download(dir.path(), strings()).unwrap();
        assert_eq!(path.file_name().unwrap(), GENERATED_FILENAME);

        let mut editor = EditorState::default();
        assert!(editor.download(dir.path(), strings()).is_err());
    }

    #[test]
    fn test_empty_download_message_is_translated() {
        let dir = tempfile::tempdir().unwrap();
        let ru = Language::Ru.strings();

        let mut generator = GeneratorState::default();
        let err = generator.download(dir.path(), ru).unwrap_err();
        assert_eq!(err.to_string(), ru.download_error_empty);

        let mut editor = EditorState::default();
        let err = editor.download(dir.path(), ru).unwrap_err();
        assert_eq!(err.to_string(), ru.download_error_empty);
    }

    #[test]
    fn test_loading_message_follows_language() {
        let mut state = AppState::new(Language::En, PathBuf::from("."), INTERVAL);
        state.generator.prompt = "sky".to_string();
        let start = Instant::now();
        state.generator.begin_generate(state.strings(), INTERVAL, start).unwrap();
        assert_eq!(state.generator.loading_message(state.strings()), Some(Language::En.strings().loading_gen[0]));

        state.set_language(Language::Uz);
        let uz = Language::Uz.strings();
        assert_eq!(state.generator.loading_message(state.strings()), Some(uz.loading_gen[0]));

        state.poll_tickers(start + INTERVAL);
        let message = state.generator.loading_message(state.strings()).unwrap();
        assert!(uz.loading_gen.contains(&message));
    }

    #[test]
    fn test_app_state_routing() {
        let mut state = AppState::new(Language::Ru, PathBuf::from("."), INTERVAL);
        assert_eq!(state.strings().tab_edit, Language::Ru.strings().tab_edit);
        state.set_active_view(ActiveView::Edit);
        assert_eq!(state.active_view(), ActiveView::Edit);

        state.generator.prompt = "sky".to_string();
        let strings = state.strings();
        let job = state
            .generator
            .begin_generate(strings, INTERVAL, Instant::now())
            .unwrap();
        assert!(state.handle_result(ok(&job, png(2, 2))));
        assert!(state.generator.image.is_some());
    }
}
