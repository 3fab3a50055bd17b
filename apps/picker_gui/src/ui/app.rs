use std::time::{Duration, Instant};

use arboard::Clipboard;
use crossbeam_channel::{Receiver, Sender};
use egui::{Align2, Color32, FontId, RichText, TextureHandle};
use picker_core::Settings;
use rand::{rngs::StdRng, SeedableRng};
use shared::protocol::DisplayModel;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{category_label, UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::PickerViewState,
};
use crate::media::{confetti::ConfettiField, logo, sparkles::SparkleField};
use crate::ui::theme;

const CARD_WIDTH: f32 = 460.0;
const LOGO_SIZE: f32 = 120.0;
const BANNER_HEIGHT: f32 = 96.0;
const SHUFFLE_LIST_HEIGHT: f32 = 80.0;

pub struct PickerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: PickerViewState,
    settings: Settings,
    title: String,
    entrants: String,
    logo: Option<TextureHandle>,
    logo_attempted: bool,
    theme_applied: bool,
    confetti: ConfettiField,
    sparkles: Option<SparkleField>,
    sparkles_for: Option<Instant>,
    effects_rng: StdRng,
    viewport: egui::Rect,
    last_frame: Instant,
}

impl PickerApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, settings: Settings) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: PickerViewState::default(),
            settings,
            title: String::new(),
            entrants: String::new(),
            logo: None,
            logo_attempted: false,
            theme_applied: false,
            confetti: ConfettiField::default(),
            sparkles: None,
            sparkles_for: None,
            effects_rng: StdRng::from_os_rng(),
            viewport: egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 900.0)),
            last_frame: Instant::now(),
        }
    }

    fn process_ui_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.ui_rx.try_recv() {
            self.view.apply(event, now);
        }

        for burst in self.view.take_bursts() {
            self.confetti.burst(&burst, self.viewport, &mut self.effects_rng);
        }

        let revealed_at = self.view.revealed_at();
        if revealed_at != self.sparkles_for {
            self.sparkles = revealed_at.map(|_| {
                SparkleField::scatter(
                    [theme::BRAND_BLUE, theme::BRAND_ORANGE],
                    &mut self.effects_rng,
                )
            });
            self.sparkles_for = revealed_at;
        }
    }

    fn ensure_logo(&mut self, ctx: &egui::Context) {
        if self.logo_attempted {
            return;
        }
        self.logo_attempted = true;
        match logo::load_logo_texture(ctx, &self.settings.logo_path) {
            Ok(texture) => self.logo = Some(texture),
            Err(err) => self.view.apply(
                UiEvent::Error(UiError::from_message(UiErrorContext::Logo, format!("{err:#}"))),
                Instant::now(),
            ),
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), LOGO_SIZE + 32.0),
            egui::Sense::hover(),
        );
        ui.painter().rect_filled(rect, 0.0, theme::BRAND_BLUE);
        let logo_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(LOGO_SIZE, LOGO_SIZE));
        match &self.logo {
            Some(texture) => {
                let size = texture.size_vec2();
                let scale = (LOGO_SIZE / size.x.max(size.y)).min(1.0);
                let fitted = egui::Rect::from_center_size(rect.center(), size * scale);
                ui.painter().image(
                    texture.id(),
                    fitted,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                ui.painter().circle_filled(logo_rect.center(), LOGO_SIZE * 0.4, theme::BRAND_ORANGE);
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.view.banner().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::NONE
            .fill(theme::ERROR_FILL)
            .stroke(egui::Stroke::new(1.0, theme::ERROR_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(category_label(banner.category())).strong());
                    ui.label(banner.message());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        dismissed = ui.button("Dismiss").clicked();
                    });
                });
            });
        if dismissed {
            self.view.dismiss_banner();
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, display: &DisplayModel) {
        ui.label(RichText::new(&self.settings.title_label).color(theme::BRAND_BLUE).strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.title)
                .hint_text("Enter event title")
                .desired_width(f32::INFINITY),
        );

        ui.label(RichText::new("Participants").color(theme::BRAND_BLUE).strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.entrants)
                .hint_text("Enter names, one per line")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );

        let button = egui::Button::new(
            RichText::new(display.start_label)
                .color(Color32::WHITE)
                .size(18.0)
                .strong(),
        )
        .fill(theme::BRAND_ORANGE)
        .min_size(egui::vec2(ui.available_width(), 44.0));
        let response = ui.add_enabled(display.start_enabled, button);
        if response.hovered() && display.start_enabled {
            ui.painter().rect_stroke(
                response.rect,
                6.0,
                egui::Stroke::new(2.0, theme::ORANGE_HOVER),
                egui::StrokeKind::Outside,
            );
        }
        if response.clicked() {
            let mut status = String::new();
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::StartDraw {
                    entrants: self.entrants.clone(),
                },
                &mut status,
            );
            if !status.is_empty() {
                self.view.apply(
                    UiEvent::Error(UiError::from_message(UiErrorContext::General, status)),
                    Instant::now(),
                );
            }
        }
    }

    fn show_stage_card(&self, ui: &mut egui::Ui, display: &DisplayModel, now: Instant) {
        let Some(message) = display.stage_message else {
            return;
        };
        egui::Frame::NONE
            .fill(theme::STAGE_CARD_FILL)
            .stroke(egui::Stroke::new(2.0, theme::BRAND_BLUE))
            .corner_radius(6.0)
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(message).color(theme::BRAND_BLUE).strong());
                    if display.show_shuffle {
                        egui::ScrollArea::vertical()
                            .max_height(SHUFFLE_LIST_HEIGHT)
                            .enable_scrolling(false)
                            .show(ui, |ui| {
                                for name in &display.shuffled_names {
                                    ui.label(RichText::new(name).color(theme::BRAND_ORANGE));
                                }
                            });
                    }

                    let progress = self.view.stage_progress(
                        now,
                        Duration::from_millis(self.settings.stage_delay_ms),
                    );
                    let (track, _) = ui.allocate_exact_size(
                        egui::vec2(ui.available_width(), 8.0),
                        egui::Sense::hover(),
                    );
                    ui.painter().rect_filled(track, 4.0, theme::PROGRESS_TRACK);
                    let mut filled = track;
                    filled.set_width(track.width() * progress);
                    ui.painter().rect_filled(filled, 4.0, theme::BRAND_BLUE);
                });
            });
    }

    fn show_winner_banner(&mut self, ui: &mut egui::Ui, display: &DisplayModel, now: Instant) {
        let Some(winner) = display.winner.as_deref() else {
            return;
        };
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), BANNER_HEIGHT),
            egui::Sense::hover(),
        );

        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(rect.left_top(), theme::BRAND_BLUE);
        mesh.colored_vertex(rect.right_top(), theme::BRAND_ORANGE);
        mesh.colored_vertex(rect.right_bottom(), theme::BRAND_ORANGE);
        mesh.colored_vertex(rect.left_bottom(), theme::BRAND_BLUE);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        ui.painter().add(egui::Shape::mesh(mesh));

        if let (Some(sparkles), Some(revealed_at)) = (&self.sparkles, self.view.revealed_at()) {
            let elapsed = now.saturating_duration_since(revealed_at).as_secs_f32();
            sparkles.paint(ui.painter(), rect, elapsed);
        }

        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            format!("Winner: {winner}"),
            FontId::proportional(24.0),
            Color32::WHITE,
        );

        if ui.button("Copy winner").clicked() {
            self.copy_winner(winner);
        }
    }

    fn copy_winner(&mut self, winner: &str) {
        let copied = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(winner.to_owned()));
        match copied {
            Ok(()) => self.view.set_status(format!("Copied '{winner}' to the clipboard")),
            Err(err) => self.view.apply(
                UiEvent::Error(UiError::from_message(
                    UiErrorContext::CopyWinner,
                    format!("clipboard unavailable: {err}"),
                )),
                Instant::now(),
            ),
        }
    }

    fn show_main(&mut self, ctx: &egui::Context, now: Instant) {
        let display = self.view.display();
        let panel = egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.set_max_width(CARD_WIDTH);
                    egui::Frame::NONE
                        .fill(theme::CARD_BACKGROUND)
                        .corner_radius(10.0)
                        .shadow(egui::Shadow {
                            offset: [0, 4],
                            blur: 12,
                            spread: 0,
                            color: Color32::from_black_alpha(30),
                        })
                        .show(ui, |ui| {
                            self.show_header(ui);
                            egui::Frame::NONE
                                .inner_margin(egui::Margin::same(24))
                                .show(ui, |ui| {
                                    ui.vertical_centered(|ui| {
                                        ui.label(
                                            RichText::new(&self.settings.heading)
                                                .size(28.0)
                                                .strong()
                                                .color(theme::BRAND_BLUE),
                                        );
                                        ui.label(
                                            RichText::new(&self.settings.subheading)
                                                .color(theme::MUTED_TEXT),
                                        );
                                    });
                                    ui.add_space(12.0);
                                    self.show_status_banner(ui);
                                    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                                        self.show_form(ui, &display);
                                        ui.add_space(12.0);
                                        self.show_stage_card(ui, &display, now);
                                        self.show_winner_banner(ui, &display, now);
                                    });
                                    if let Some(status) = self.view.status() {
                                        ui.add_space(8.0);
                                        ui.label(RichText::new(status).small().color(theme::MUTED_TEXT));
                                    }
                                });
                        });
                });
            });
        });
        self.viewport = panel.response.rect;
    }

    fn paint_confetti(&mut self, ctx: &egui::Context, dt: f32) {
        self.confetti.update(dt);
        if self.confetti.is_active() {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("confetti"),
            ));
            self.confetti.paint(&painter);
        }
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }
        self.ensure_logo(ctx);
        self.process_ui_events();
        self.show_main(ctx, now);
        self.paint_confetti(ctx, dt);

        let display = self.view.display();
        if display.stage.is_some() || display.winner.is_some() || self.confetti.is_active() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl Drop for PickerApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
