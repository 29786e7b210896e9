//! App shell: renders the current session state and feeds interaction back
//! through the controller.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::MessageRole;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{
    AppPhase, ChatTurn, SessionState, Toast, ToastSeverity, THINKING_PLACEHOLDER,
};

pub struct DocChatApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: SessionState,
    composer: String,
}

impl DocChatApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: SessionState::new(),
            composer: String::new(),
        }
    }

    fn submit_upload(&mut self, selected: Vec<PathBuf>, now: Instant) {
        let Some(cmd) = self.state.request_upload(selected, now) else {
            return;
        };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.state.abort_dispatch(err.user_message(), now);
        }
    }

    fn submit_ask(&mut self, now: Instant) {
        let Some(cmd) = self.state.request_ask(&self.composer) else {
            return;
        };
        // Cleared before the response arrives, as the request is queued.
        self.composer.clear();
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.state.abort_dispatch(err.user_message(), now);
        }
    }

    fn submit_summarize(&mut self, now: Instant) {
        let Some(cmd) = self.state.request_summarize() else {
            return;
        };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.state.abort_dispatch(err.user_message(), now);
        }
    }

    fn render_fatal(&self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(140.0);
                ui.heading("Startup failure");
                ui.add_space(8.0);
                ui.colored_label(ui.visuals().error_fg_color, message);
            });
        });
    }

    fn render_hero(&mut self, ctx: &egui::Context, now: Instant) {
        let opacity = self.state.hero_opacity(now);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_opacity(opacity);
            ui.vertical_centered(|ui| {
                ui.add_space(160.0);
                ui.label(egui::RichText::new("RentAI Pro").size(44.0).strong());
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("Upload your lease and ask anything about it.").size(16.0),
                );
                ui.add_space(28.0);
                let button = egui::Button::new(egui::RichText::new("Get Started").size(18.0));
                if ui.add(button).clicked() {
                    self.state.begin_hero_fade(now);
                }
            });
        });
        if self.state.is_hero_fading() {
            ctx.request_repaint();
        }
    }

    fn render_welcome(&mut self, ctx: &egui::Context, now: Instant, hovering_files: bool) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(90.0);
                ui.heading("Upload your documents");
                ui.add_space(16.0);

                let stroke = if hovering_files {
                    egui::Stroke::new(2.0, ui.visuals().selection.bg_fill)
                } else {
                    egui::Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color)
                };
                let zone = egui::Frame::new()
                    .stroke(stroke)
                    .corner_radius(egui::CornerRadius::same(10))
                    .inner_margin(egui::Margin::symmetric(48, 36))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("📄  Drop PDF files here").size(18.0));
                        ui.add_space(4.0);
                        ui.label(egui::RichText::new("or click to browse").weak());
                    });

                if zone.response.interact(egui::Sense::click()).clicked() {
                    if let Some(selected) = rfd::FileDialog::new()
                        .add_filter("PDF files", &["pdf"])
                        .pick_files()
                    {
                        self.submit_upload(selected, now);
                    }
                }

                if self.state.busy() {
                    ui.add_space(16.0);
                    ui.spinner();
                }
            });
        });
    }

    fn render_chat(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("documents_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} document(s) loaded",
                        self.state.documents().len()
                    ))
                    .strong(),
                );
                for doc in self.state.documents() {
                    ui.label(egui::RichText::new(format!("📄 {}", doc.name)).weak());
                }
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("composer_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("📝 Summarize").clicked() {
                    self.submit_summarize(now);
                }
            });
            ui.add_space(4.0);

            let row_height = 56.0;
            let (response, clicked_send) = ui
                .horizontal(|ui| {
                    let send_width = 72.0;
                    let text_width =
                        ui.available_width() - send_width - ui.spacing().item_spacing.x;
                    let response = ui.add_sized(
                        [text_width, row_height],
                        egui::TextEdit::multiline(&mut self.composer)
                            .id_salt("composer_text")
                            .hint_text(
                                "Ask about your documents (Enter to send, Shift+Enter for newline)",
                            ),
                    );
                    let clicked_send = ui
                        .add_sized([send_width, row_height], egui::Button::new("Send"))
                        .clicked();
                    (response, clicked_send)
                })
                .inner;

            let send_shortcut = response.has_focus()
                && ui.input(|i| {
                    composer_send_shortcut(i.key_pressed(egui::Key::Enter), i.modifiers.shift)
                });

            if clicked_send || send_shortcut {
                self.submit_ask(now);
                response.request_focus();
            }
            ui.add_space(6.0);
        });

        let scroll_requested = self.state.take_scroll_to_bottom();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for turn in self.state.transcript() {
                        render_turn(ui, turn);
                    }
                    if self.state.is_thinking() {
                        render_turn(
                            ui,
                            &ChatTurn {
                                role: MessageRole::Assistant,
                                text: THINKING_PLACEHOLDER.to_string(),
                            },
                        );
                    }
                    ui.add_space(8.0);
                    if scroll_requested {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.state.toasts().is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toast_overlay"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.state.toasts() {
                    render_toast(ui, toast);
                    ui.add_space(6.0);
                }
            });
    }
}

impl eframe::App for DocChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply_event(event, now);
        }
        self.state.tick(now);

        // Backend events arrive on a worker thread; poll for them even when
        // no input is flowing.
        ctx.request_repaint_after(Duration::from_millis(120));

        if let Some(message) = self.state.fatal().map(str::to_owned) {
            self.render_fatal(ctx, &message);
            return;
        }

        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() && self.state.phase() == AppPhase::Welcome {
            self.submit_upload(dropped, now);
        }

        match self.state.phase() {
            AppPhase::Hero => self.render_hero(ctx, now),
            AppPhase::Welcome => self.render_welcome(ctx, now, hovering_files),
            AppPhase::Chat => self.render_chat(ctx, now),
        }

        self.render_toasts(ctx);
    }
}

/// Enter sends; Shift+Enter inserts a newline instead.
pub(crate) fn composer_send_shortcut(enter_pressed: bool, shift_held: bool) -> bool {
    enter_pressed && !shift_held
}

fn render_turn(ui: &mut egui::Ui, turn: &ChatTurn) {
    let (avatar, fill) = match turn.role {
        MessageRole::User => ("👤", ui.visuals().code_bg_color),
        MessageRole::Assistant => ("🤖", ui.visuals().faint_bg_color),
    };
    ui.add_space(6.0);
    ui.horizontal_top(|ui| {
        ui.label(egui::RichText::new(avatar).size(20.0));
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() - 48.0);
                ui.label(&turn.text);
            });
    });
}

fn render_toast(ui: &mut egui::Ui, toast: &Toast) {
    let accent = match toast.severity {
        ToastSeverity::Info => egui::Color32::from_rgb(70, 130, 200),
        ToastSeverity::Success => egui::Color32::from_rgb(60, 150, 90),
        ToastSeverity::Error => egui::Color32::from_rgb(190, 70, 70),
    };
    egui::Frame::new()
        .fill(ui.visuals().extreme_bg_color)
        .stroke(egui::Stroke::new(1.0, accent))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.colored_label(accent, &toast.text);
        });
}
