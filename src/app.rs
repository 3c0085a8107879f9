//! Main application UI.
//! Draws the current view of `AppState` every frame and forwards user events to it.

use chrono::{DateTime, Local};
use eframe::egui;
use egui::{Color32, RichText};
use linkdeck_app::database::Theme;
use linkdeck_app::models::Millis;
use linkdeck_app::models::review_state::now_millis;
use linkdeck_app::state::{AppState, FollowUp, Mode, Transition, View};
use std::time::{Duration, Instant};

const NOTICE_DURATION: Duration = Duration::from_secs(3);
const CORRECT: Color32 = Color32::from_rgb(46, 125, 50);
const INCORRECT: Color32 = Color32::from_rgb(183, 28, 28);

/// Formats a millisecond timestamp as local date and time
fn format_millis(ms: Millis) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => {
            let local: DateTime<Local> = utc.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        None => "unknown".to_string(),
    }
}

pub struct LinkdeckApp {
    state: AppState,
    pending: Option<(Instant, FollowUp)>,
    /// Serial of the notice on screen and when it goes away.
    notice_until: Option<(u64, Instant)>,

    deck_input: String,
    link_input: String,
    shared_link: Option<String>,
    show_about: bool,
    show_reset_confirmation: bool,
}

impl eframe::App for LinkdeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_pending(ctx);

        ctx.set_visuals(match self.state.theme() {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });

        self.render_nav(ctx);
        self.render_notice(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.state.mode() {
            Mode::Create => self.render_create(ui),
            _ => self.render_study(ui),
        });

        self.render_dialogs(ctx);
    }
}

impl LinkdeckApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            pending: None,
            notice_until: None,
            deck_input: String::new(),
            link_input: String::new(),
            shared_link: None,
            show_about: false,
            show_reset_confirmation: false,
        }
    }

    /// Resumes a deferred transition once its delay has passed
    fn run_pending(&mut self, ctx: &egui::Context) {
        let Some((deadline, follow_up)) = self.pending else {
            return;
        };
        let now = Instant::now();
        if now >= deadline {
            self.pending = None;
            let transition = self.state.resume(follow_up, now_millis());
            self.apply(transition, ctx);
        } else {
            ctx.request_repaint_after(deadline - now);
        }
    }

    fn apply(&mut self, transition: Transition, ctx: &egui::Context) {
        if let Transition::Deferred { delay, follow_up } = transition {
            self.pending = Some((Instant::now() + delay, follow_up));
            ctx.request_repaint_after(delay);
        }
    }

    fn set_mode(&mut self, mode: Mode, ctx: &egui::Context) {
        // Any timer left from the previous mode is dropped with it
        self.pending = None;
        let transition = self.state.set_mode(mode, now_millis());
        self.apply(transition, ctx);
    }

    fn render_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let current = self.state.mode();
                for (mode, label) in [
                    (Mode::Create, "Create"),
                    (Mode::Flashcards, "Flashcards"),
                    (Mode::Learn, "Learn"),
                    (Mode::Review, "Review"),
                ] {
                    if ui.selectable_label(current == mode, label).clicked() {
                        self.set_mode(mode, ui.ctx());
                    }
                }

                ui.separator();

                if ui.button("Share").clicked() {
                    if let Some(link) = self.state.share_link() {
                        ui.ctx().output_mut(|o| o.copied_text = link.clone());
                        self.state.set_notice("Share link copied to clipboard!");
                        self.shared_link = Some(link);
                    }
                }

                let theme_label = match self.state.theme() {
                    Theme::Dark => "☀ Light",
                    Theme::Light => "🌙 Dark",
                };
                if ui.button(theme_label).clicked() {
                    self.state.toggle_theme();
                }

                if ui.button("About").clicked() {
                    self.show_about = true;
                }
            });

            let deck = self.state.deck();
            if !deck.is_empty() {
                ui.label(format!(
                    "{} cards, {} due now",
                    deck.len(),
                    self.state.due_count(now_millis())
                ));
            }
        });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        if self.state.notice().is_none() {
            self.notice_until = None;
            return;
        }

        let now = Instant::now();
        let serial = self.state.notice_serial();
        let until = match self.notice_until {
            Some((shown, until)) if shown == serial => until,
            _ => {
                let until = now + NOTICE_DURATION;
                self.notice_until = Some((serial, until));
                until
            }
        };
        if now >= until {
            self.state.dismiss_notice();
            self.notice_until = None;
            return;
        }
        ctx.request_repaint_after(until - now);

        let mut dismiss = false;
        egui::TopBottomPanel::bottom("notice").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.state.notice().unwrap_or_default());
                if ui.small_button("✖").clicked() {
                    dismiss = true;
                }
            });
        });
        if dismiss {
            self.state.dismiss_notice();
            self.notice_until = None;
        }
    }

    /// Renders the deck creation screen
    fn render_create(&mut self, ui: &mut egui::Ui) {
        ui.heading("Create a Deck");
        ui.label("One card per line, written as: term | definition");

        ui.add(
            egui::TextEdit::multiline(&mut self.deck_input)
                .desired_rows(12)
                .desired_width(f32::INFINITY)
                .hint_text("Dog | Canine\nCat | Feline"),
        );

        let mut settings = self.state.deck().settings;
        ui.checkbox(&mut settings.shuffle_on_load, "Shuffle cards on load");
        ui.checkbox(&mut settings.start_side_is_term, "Show the term side first");
        if settings != self.state.deck().settings {
            self.state.set_settings(settings);
        }

        ui.horizontal(|ui| {
            if ui.button("Load Deck").clicked() {
                if let Err(e) = self.state.import_text(&self.deck_input, now_millis()) {
                    self.state.set_notice(e.to_string());
                }
            }
            if ui.button("From File…").clicked() {
                self.load_text_file();
            }
        });

        ui.separator();

        ui.heading("Open a Shared Deck");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.link_input);
            if ui.button("Open").clicked() && !self.link_input.trim().is_empty() {
                self.state.open_link(&self.link_input, now_millis());
                self.link_input.clear();
            }
        });
    }

    /// Fills the deck text area from a file picked in a native dialog
    fn load_text_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text files", &["txt"])
            .pick_file()
        else {
            return;
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => self.deck_input = text,
            Err(e) => {
                tracing::warn!("Could not read {}: {e}", path.display());
                self.state
                    .set_notice(format!("Could not read {}: {e}", path.display()));
            }
        }
    }

    fn render_study(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.is_busy();
        let mut flip = false;
        let mut step: Option<isize> = None;
        let mut choice: Option<String> = None;
        let mut restart = false;
        let mut go_to: Option<Mode> = None;

        match self.state.view() {
            View::Create => {}
            View::Empty => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("This deck is empty");
                    ui.label("Create a deck or open a shared link to start studying.");
                    if ui.button("Create a Deck").clicked() {
                        go_to = Some(Mode::Create);
                    }
                });
            }
            View::Flashcard {
                front,
                back,
                flipped,
                review,
                position,
                total,
            } => {
                let text = if flipped { back } else { front };
                let mut rich = RichText::new(text).size(28.0);
                if busy {
                    rich = rich.weak();
                }
                let card = egui::Button::new(rich)
                    .min_size(egui::vec2(ui.available_width(), 240.0));
                if ui.add(card).clicked() {
                    flip = true;
                }

                ui.horizontal(|ui| {
                    if ui.add_enabled(!busy, egui::Button::new("◀ Prev")).clicked() {
                        step = Some(-1);
                    }
                    ui.label(format!("{position} / {total}"));
                    if ui.add_enabled(!busy, egui::Button::new("Next ▶")).clicked() {
                        step = Some(1);
                    }
                });

                let reviewed = review
                    .last_reviewed
                    .map(format_millis)
                    .unwrap_or_else(|| "never".to_string());
                ui.label(format!(
                    "Score {}/5, last reviewed {reviewed}, next review {}",
                    review.score,
                    format_millis(review.next_review)
                ));
            }
            View::LearnDisabled { cards, needed } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("Quiz unavailable");
                    ui.label(format!(
                        "Quizzes need at least {needed} cards. This deck has {cards}."
                    ));
                });
            }
            View::Question {
                question,
                feedback,
                progress,
            } => {
                if let Some(progress) = progress {
                    ui.label(progress);
                }
                ui.add_space(10.0);
                ui.heading(&question.prompt);
                ui.add_space(10.0);

                for option in &question.options {
                    let mut button = egui::Button::new(option.as_str())
                        .min_size(egui::vec2(ui.available_width(), 36.0));
                    if let Some(feedback) = feedback {
                        if *option == feedback.answer {
                            button = button.fill(CORRECT);
                        } else if *option == feedback.chosen {
                            button = button.fill(INCORRECT);
                        }
                    }
                    if ui.add_enabled(feedback.is_none(), button).clicked() {
                        choice = Some(option.clone());
                    }
                }

                if let Some(feedback) = feedback {
                    ui.add_space(10.0);
                    let color = if feedback.correct { CORRECT } else { INCORRECT };
                    ui.label(RichText::new(feedback.message()).color(color).strong());
                }
            }
            View::SessionComplete(summary) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("Session complete!");
                    ui.label(format!(
                        "{} cards mastered with {} answers ({} misses).",
                        summary.cards, summary.answers, summary.misses
                    ));
                    ui.add_space(20.0);
                    if ui.button("Restart Session").clicked() {
                        restart = true;
                    }
                    if ui.button("Back to Flashcards").clicked() {
                        go_to = Some(Mode::Flashcards);
                    }
                });
            }
        }

        if self.state.mode() != Mode::Create {
            ui.add_space(20.0);
            ui.separator();
            if ui.button("Reset Progress").clicked() {
                self.show_reset_confirmation = true;
            }
        }

        // Execute deferred actions
        let ctx = ui.ctx().clone();
        if flip {
            self.state.flip();
        }
        if let Some(step) = step {
            let transition = if step < 0 {
                self.state.prev_card()
            } else {
                self.state.next_card()
            };
            self.apply(transition, &ctx);
        }
        if let Some(choice) = choice {
            let transition = self.state.answer(&choice, now_millis());
            self.apply(transition, &ctx);
        }
        if restart {
            self.pending = None;
            let transition = self.state.restart_session(now_millis());
            self.apply(transition, &ctx);
        }
        if let Some(mode) = go_to {
            self.set_mode(mode, &ctx);
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(link) = &mut self.shared_link {
            let mut close = false;
            egui::Window::new("Share Link")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Copied to the clipboard. You can also select it here:");
                    ui.add(egui::TextEdit::singleline(link).desired_width(360.0));
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            if close {
                self.shared_link = None;
            }
        }

        if self.show_reset_confirmation {
            egui::Window::new("Reset all progress?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_reset_confirmation = false;
                        }
                        if ui.button("Yes").clicked() {
                            self.show_reset_confirmation = false;
                            self.pending = None;
                            self.state.reset_progress(now_millis());
                        }
                    });
                });
        }

        if self.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Write a deck as lines of 'term | definition' and study it as flip cards.");
                    ui.label(
                        "Learn drills every card once in random order; missed cards come back later in the session.",
                    );
                    ui.label("Review always asks the weakest card that is due.");
                    ui.label("Share puts the whole deck in a link. Progress stays on this machine.");
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_about = false;
                    }
                });
        }
    }
}
