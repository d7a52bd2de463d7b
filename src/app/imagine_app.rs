//! Main application
//!
//! Implements the egui App trait: header with language menu, the Generate
//! and Edit tabs, and the before/after comparison view.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use tracing::{error, info, warn};

use crate::api::{start_worker, AspectRatio, GeminiClient, Job, JobResult, WorkerHandle};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::i18n::{Language, Translations};
use crate::render::compositor::FONT_SIZE_RANGE;
use crate::render::{contain_rect, full_uv, icon, paint_icon, Anchor, FontBook, FontFamily, IconId, ImageArtifact, ImageLoader};
use crate::utils::color::{parse_hex_color, rgb_to_hex};

use super::state::{ActiveView, AppState, EditorState, GeneratorState, QuickAction};

/// Height of the generated image and comparison areas
const PREVIEW_HEIGHT: f32 = 420.0;
/// Height of the source thumbnail in the Edit tab
const SOURCE_HEIGHT: f32 = 200.0;
/// How close to the boundary a press must land to grab it
const HANDLE_GRAB_RADIUS: f32 = 18.0;

const ERROR_FILL: Color32 = Color32::from_rgb(74, 24, 30);
const ERROR_TEXT: Color32 = Color32::from_rgb(255, 176, 176);
const NOTICE_FILL: Color32 = Color32::from_rgb(22, 58, 38);
const NOTICE_TEXT: Color32 = Color32::from_rgb(170, 240, 190);
const BRAND: Color32 = Color32::from_rgb(139, 92, 246);

/// Main application
pub struct ImagineApp {
    state: AppState,
    /// Background worker; `None` if it failed to start
    worker: Option<WorkerHandle>,
    /// Textures for the displayed artifacts
    images: ImageLoader,
    /// Hex field next to the overlay color picker
    color_hex: String,
}

impl ImagineApp {
    /// Create new application
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        api_key: Option<String>,
        initial_image: Option<PathBuf>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let fonts = Arc::new(FontBook::new(&config.font_dirs));
        let worker = GeminiClient::new(&config, api_key)
            .map_err(anyhow::Error::from)
            .and_then(|client| start_worker(client, fonts, Some(cc.egui_ctx.clone())));
        let worker = match worker {
            Ok(worker) => Some(worker),
            Err(e) => {
                error!("Failed to start worker: {:?}", e);
                None
            }
        };

        let mut state = AppState::new(
            config.language,
            config.download_dir.clone(),
            config.loading_message_interval(),
        );

        if let Some(path) = initial_image {
            state.set_active_view(ActiveView::Edit);
            state.editor.source_path = path.display().to_string();
            let strings = state.strings();
            if let Err(e) = state.editor.load_source(strings) {
                warn!("Initial image not loaded: {}", e);
            }
        }

        let color_hex = rgb_to_hex(
            state.editor.overlay.color[0],
            state.editor.overlay.color[1],
            state.editor.overlay.color[2],
        );

        info!("Imagine Art initialized ({})", state.language().code());

        Self {
            state,
            worker,
            images: ImageLoader::new(),
            color_hex,
        }
    }

    /// Send a job to the worker, failing it in place if the worker is gone
    fn dispatch(&mut self, job: Job) {
        let sent = self.worker.as_ref().map(|w| w.submit(job.clone())).unwrap_or(false);
        if !sent {
            self.state.handle_result(JobResult {
                id: job.id(),
                kind: job.kind(),
                outcome: Err(AppError::Remote("The background worker is not running.".to_string())),
            });
        }
    }

    fn drain_results(&mut self) {
        let Some(worker) = &self.worker else { return };
        let mut results = Vec::new();
        while let Some(result) = worker.try_recv() {
            results.push(result);
        }
        for result in results {
            self.state.handle_result(result);
        }
    }

    /// Files dropped on the window become the Edit tab's source
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.state.set_active_view(ActiveView::Edit);
            self.state.editor.source_path = path.display().to_string();
            let strings = self.state.strings();
            let _ = self.state.editor.load_source(strings);
        }
    }
}

impl eframe::App for ImagineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_results();
        self.handle_dropped_files(ctx);

        let now = Instant::now();
        if let Some(deadline) = self.state.poll_tickers(now) {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        let strings = self.state.strings();
        let mut jobs: Vec<Job> = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            header(ui, &mut self.state, strings);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(strings.footer_text).small().weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            tabs(ui, &mut self.state, strings);
            ui.separator();

            let interval = self.state.loading_interval;
            let download_dir = self.state.download_dir.clone();
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                match self.state.active_view() {
                    ActiveView::Generate => generate_view(
                        ui,
                        &mut self.state.generator,
                        &mut self.images,
                        &mut jobs,
                        ViewContext { strings, interval, download_dir: &download_dir },
                    ),
                    ActiveView::Edit => edit_view(
                        ui,
                        &mut self.state.editor,
                        &mut self.images,
                        &mut self.color_hex,
                        &mut jobs,
                        ViewContext { strings, interval, download_dir: &download_dir },
                    ),
                }
            });
        });

        for job in jobs {
            self.dispatch(job);
        }
    }
}

/// Per-frame values every view needs
struct ViewContext<'a> {
    strings: &'static Translations,
    interval: std::time::Duration,
    download_dir: &'a std::path::Path,
}

fn header(ui: &mut Ui, state: &mut AppState, strings: &Translations) {
    ui.horizontal(|ui| {
        ui.add_space(4.0);
        icon(ui, IconId::Logo, 28.0);
        ui.heading(RichText::new(strings.app_name).color(BRAND).strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let current = state.language();
            egui::ComboBox::from_id_salt("language")
                .selected_text(current.native_name())
                .show_ui(ui, |ui| {
                    for language in Language::ALL {
                        if ui.selectable_label(language == current, language.native_name()).clicked() {
                            state.set_language(language);
                        }
                    }
                });
        });
    });
}

fn tabs(ui: &mut Ui, state: &mut AppState, strings: &Translations) {
    ui.horizontal(|ui| {
        for (view, label, icon_id) in [
            (ActiveView::Generate, strings.tab_generate, IconId::Generate),
            (ActiveView::Edit, strings.tab_edit, IconId::Edit),
        ] {
            icon(ui, icon_id, 18.0);
            let selected = state.active_view() == view;
            if ui.selectable_label(selected, RichText::new(label).size(16.0)).clicked() {
                state.set_active_view(view);
            }
            ui.add_space(12.0);
        }
    });
}

/// Dismissible inline message
fn banner(ui: &mut Ui, message: &mut Option<String>, fill: Color32, text: Color32, dismiss: &str) {
    let Some(current) = message.as_deref() else { return };
    let mut close = false;
    egui::Frame::none()
        .fill(fill)
        .rounding(6.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(current).color(text));
                if ui.small_button(dismiss).clicked() {
                    close = true;
                }
            });
        });
    if close {
        *message = None;
    }
}

fn loading_indicator(ui: &mut Ui, message: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.add_space(PREVIEW_HEIGHT / 3.0);
        ui.spinner();
        if let Some(message) = message {
            ui.label(RichText::new(message).italics());
        }
    });
}

fn placeholder(ui: &mut Ui, icon_id: IconId, text: &str) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), PREVIEW_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    let weak = ui.visuals().weak_text_color();
    painter.rect_stroke(rect.shrink(2.0), 12.0, Stroke::new(1.0, weak));
    paint_icon(&painter, Rect::from_center_size(rect.center() - Vec2::new(0.0, 20.0), Vec2::splat(48.0)), icon_id, weak);
    painter.text(
        rect.center() + Vec2::new(0.0, 24.0),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(15.0),
        weak,
    );
}

/// Paint `artifact` contain-fitted into a full-width area
fn show_image(ui: &mut Ui, images: &mut ImageLoader, slot: &str, artifact: &ImageArtifact, height: f32) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
    let ctx = ui.ctx().clone();
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 12.0, ui.visuals().extreme_bg_color);
    if let Some(texture) = images.texture_for(&ctx, slot, artifact) {
        painter.image(texture.id(), contain_rect(texture.size(), rect), full_uv(), Color32::WHITE);
    }
}

fn download_button(ui: &mut Ui, label: &str) -> bool {
    ui.horizontal(|ui| {
        icon(ui, IconId::Download, 18.0);
        ui.button(label).clicked()
    })
    .inner
}

fn generate_view(
    ui: &mut Ui,
    generator: &mut GeneratorState,
    images: &mut ImageLoader,
    jobs: &mut Vec<Job>,
    view: ViewContext<'_>,
) {
    let strings = view.strings;

    ui.label(RichText::new(strings.gen_label_vision).strong());
    ui.add(
        egui::TextEdit::multiline(&mut generator.prompt)
            .hint_text(strings.gen_placeholder)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(6.0);
    ui.label(RichText::new(strings.gen_label_ratio).strong());
    ui.horizontal(|ui| {
        for ratio in AspectRatio::ALL {
            icon(ui, IconId::for_aspect_ratio(ratio), 18.0);
            if ui.selectable_label(generator.aspect_ratio == ratio, ratio.as_str()).clicked() {
                generator.aspect_ratio = ratio;
            }
            ui.add_space(6.0);
        }
    });

    ui.add_space(6.0);
    let enabled = !generator.is_loading() && !generator.prompt.trim().is_empty();
    let clicked = ui
        .horizontal(|ui| {
            icon(ui, IconId::MagicWand, 20.0);
            ui.add_enabled(enabled, egui::Button::new(RichText::new(strings.gen_btn_generate).strong()))
                .clicked()
        })
        .inner;
    if clicked {
        if let Ok(job) = generator.begin_generate(strings, view.interval, Instant::now()) {
            jobs.push(job);
        }
    }

    banner(ui, &mut generator.error, ERROR_FILL, ERROR_TEXT, strings.dismiss);
    banner(ui, &mut generator.notice, NOTICE_FILL, NOTICE_TEXT, strings.dismiss);
    ui.add_space(8.0);

    if generator.is_loading() {
        loading_indicator(ui, generator.loading_message(strings));
    } else if let Some(image) = generator.image.clone() {
        show_image(ui, images, "generated", &image, PREVIEW_HEIGHT);
        if download_button(ui, strings.gen_download_alt) {
            match generator.download(view.download_dir, strings) {
                Ok(path) => generator.notice = Some(format!("{} {}", strings.saved_to, path.display())),
                Err(e) => generator.error = Some(e.to_string()),
            }
        }
    } else {
        placeholder(ui, IconId::Image, strings.gen_waiting);
    }
}

fn edit_view(
    ui: &mut Ui,
    editor: &mut EditorState,
    images: &mut ImageLoader,
    color_hex: &mut String,
    jobs: &mut Vec<Job>,
    view: ViewContext<'_>,
) {
    let strings = view.strings;

    ui.label(RichText::new(strings.edit_source_label).strong());
    ui.horizontal(|ui| {
        icon(ui, IconId::Upload, 18.0);
        let field = ui.add(
            egui::TextEdit::singleline(&mut editor.source_path)
                .hint_text(strings.edit_source_placeholder)
                .desired_width(ui.available_width() - 80.0),
        );
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button(strings.edit_btn_load).clicked() || submitted {
            let _ = editor.load_source(strings);
        }
    });
    ui.label(RichText::new(strings.edit_drop_hint).small().weak());

    if let Some(original) = editor.original().cloned() {
        show_image(ui, images, "original", &original, SOURCE_HEIGHT);
    }

    ui.add_space(6.0);
    let can_edit = editor.has_source() && !editor.is_loading();
    egui::CollapsingHeader::new(strings.edit_quick_title)
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for action in QuickAction::ALL {
                    icon(ui, action.icon(), 18.0);
                    if ui.add_enabled(can_edit, egui::Button::new(action.label(strings))).clicked() {
                        if let Ok(Some(job)) = editor.quick_action(action, strings, view.interval, Instant::now()) {
                            jobs.push(job);
                        }
                    }
                    ui.add_space(8.0);
                }
            });
        });

    ui.label(RichText::new(strings.edit_custom_label).strong());
    ui.add(
        egui::TextEdit::multiline(&mut editor.prompt)
            .hint_text(strings.edit_custom_placeholder)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );

    let enabled = can_edit && !editor.prompt.trim().is_empty();
    let clicked = ui
        .horizontal(|ui| {
            icon(ui, IconId::MagicWand, 20.0);
            ui.add_enabled(enabled, egui::Button::new(RichText::new(strings.edit_btn_edit).strong()))
                .clicked()
        })
        .inner;
    if clicked {
        if let Ok(job) = editor.begin_edit(None, strings, view.interval, Instant::now()) {
            jobs.push(job);
        }
    }

    banner(ui, &mut editor.error, ERROR_FILL, ERROR_TEXT, strings.dismiss);
    banner(ui, &mut editor.notice, NOTICE_FILL, NOTICE_TEXT, strings.dismiss);
    ui.add_space(8.0);

    if editor.is_loading() {
        loading_indicator(ui, editor.loading_message(strings));
    } else if editor.has_comparison() {
        comparison_view(ui, editor, images, strings);
        ui.add_space(8.0);
        overlay_panel(ui, editor, color_hex, jobs, strings);
        ui.add_space(8.0);
        if download_button(ui, strings.tool_btn_save) {
            match editor.download(view.download_dir, strings) {
                Ok(path) => editor.notice = Some(format!("{} {}", strings.saved_to, path.display())),
                Err(e) => editor.error = Some(e.to_string()),
            }
        }
    } else {
        placeholder(ui, IconId::Edit, strings.edit_waiting);
    }
}

/// Original underneath, edited on top clipped at the reveal boundary
fn comparison_view(ui: &mut Ui, editor: &mut EditorState, images: &mut ImageLoader, strings: &Translations) {
    let (Some(original), Some(edited)) = (editor.original().cloned(), editor.displayed().cloned()) else {
        return;
    };

    let (rect, response) = ui.allocate_exact_size(Vec2::new(ui.available_width(), PREVIEW_HEIGHT), Sense::drag());
    let pointer = ui.input(|i| i.pointer.interact_pos());
    let primary_down = ui.input(|i| i.pointer.primary_down());

    if response.hovered() || editor.slider.is_dragging() {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
    }

    if response.drag_started() {
        let near_handle = pointer
            .map(|p| (p.x - editor.slider.reveal_x(rect)).abs() <= HANDLE_GRAB_RADIUS)
            .unwrap_or(false);
        if near_handle {
            editor.begin_slider_drag();
        }
    }
    if let Some(p) = pointer.filter(|_| primary_down) {
        editor.slider.update_from_pointer(p.x, rect);
    }
    if editor.slider.is_dragging() && (!primary_down || !response.contains_pointer()) {
        editor.slider.end_drag();
    }

    let ctx = ui.ctx().clone();
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 12.0, ui.visuals().extreme_bg_color);

    let original_tex = images.texture_for(&ctx, "original", &original).map(|t| (t.id(), t.size()));
    let edited_tex = images.texture_for(&ctx, "edited", &edited).map(|t| (t.id(), t.size()));

    if let Some((id, size)) = original_tex {
        painter.image(id, contain_rect(size, rect), full_uv(), Color32::WHITE);
    }
    if let Some((id, size)) = edited_tex {
        let clip = editor.slider.edited_clip(rect).intersect(rect);
        painter
            .with_clip_rect(clip)
            .image(id, contain_rect(size, rect), full_uv(), Color32::WHITE);
    }

    let label_font = FontId::proportional(13.0);
    painter.text(
        rect.left_top() + Vec2::new(10.0, 10.0),
        Align2::LEFT_TOP,
        strings.edit_label_edited,
        label_font.clone(),
        Color32::WHITE,
    );
    painter.text(
        rect.right_top() + Vec2::new(-10.0, 10.0),
        Align2::RIGHT_TOP,
        strings.edit_label_original,
        label_font,
        Color32::WHITE,
    );

    let x = editor.slider.reveal_x(rect);
    painter.line_segment(
        [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
        Stroke::new(2.0, Color32::WHITE),
    );
    let knob = Pos2::new(x, rect.center().y);
    painter.circle_filled(knob, 16.0, Color32::WHITE);
    paint_icon(
        &painter,
        Rect::from_center_size(knob, Vec2::splat(22.0)),
        IconId::Slider,
        Color32::from_gray(30),
    );
}

fn overlay_panel(
    ui: &mut Ui,
    editor: &mut EditorState,
    color_hex: &mut String,
    jobs: &mut Vec<Job>,
    strings: &Translations,
) {
    egui::CollapsingHeader::new(strings.tool_text_overlay)
        .default_open(true)
        .show(ui, |ui| {
            ui.label(strings.tool_text_label);
            ui.add(
                egui::TextEdit::singleline(&mut editor.overlay.text)
                    .hint_text(strings.tool_text_placeholder)
                    .desired_width(f32::INFINITY),
            );

            ui.horizontal(|ui| {
                ui.label(strings.tool_font_label);
                egui::ComboBox::from_id_salt("overlay_font")
                    .selected_text(editor.overlay.font.display_name())
                    .show_ui(ui, |ui| {
                        for family in FontFamily::ALL {
                            ui.selectable_value(&mut editor.overlay.font, family, family.display_name());
                        }
                    });

                ui.add_space(12.0);
                ui.label(strings.tool_color_label);
                if ui.color_edit_button_srgb(&mut editor.overlay.color).changed() {
                    let [r, g, b] = editor.overlay.color;
                    *color_hex = rgb_to_hex(r, g, b);
                }
                let hex = ui.add(egui::TextEdit::singleline(color_hex).desired_width(72.0));
                if hex.changed() {
                    if let Some((r, g, b)) = parse_hex_color(color_hex) {
                        editor.overlay.color = [r, g, b];
                    }
                }
            });

            ui.add(
                egui::Slider::new(&mut editor.overlay.font_size, FONT_SIZE_RANGE)
                    .text(strings.tool_size_label)
                    .suffix("px"),
            );

            ui.label(strings.tool_pos_label);
            egui::Grid::new("overlay_anchor").spacing([4.0, 4.0]).show(ui, |ui| {
                for anchor in Anchor::ALL {
                    let selected = editor.overlay.anchor == anchor;
                    if ui
                        .selectable_label(selected, strings.positions[anchor.index()])
                        .on_hover_text(anchor.id())
                        .clicked()
                    {
                        editor.overlay.anchor = anchor;
                    }
                    if anchor.index() % 3 == 2 {
                        ui.end_row();
                    }
                }
            });

            ui.horizontal(|ui| {
                icon(ui, IconId::Text, 18.0);
                let enabled = !editor.overlay.text.trim().is_empty() && !editor.is_overlay_busy();
                if ui.add_enabled(enabled, egui::Button::new(strings.tool_btn_add_text)).clicked() {
                    if let Ok(job) = editor.overlay_request(strings) {
                        jobs.push(job);
                    }
                }
                if editor.is_overlay_busy() {
                    ui.spinner();
                }
            });
        });
}
