use crate::conversation::{Conversation, ConversationId, MessageOrigin};
use crate::event::AppEvent;
use crate::persona::{Persona, PersonaCatalog};
use crate::responder::{ReplyScheduler, Responder};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Picker,
    Chat,
}

pub struct SohbetApp {
    rx: Receiver<AppEvent>,
    scheduler: Box<dyn ReplyScheduler>,
    responder: Arc<Responder>,
    catalog: Arc<PersonaCatalog>,
    theme: Theme,
    screen: Screen,
    conversation: Option<Conversation>,
    next_conversation: u64,
    pending_replies: usize,
    scroll_to_bottom: bool,
}

impl SohbetApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        scheduler: Box<dyn ReplyScheduler>,
        responder: Arc<Responder>,
        catalog: Arc<PersonaCatalog>,
        initial_persona: Option<String>,
    ) -> Self {
        let mut app = Self {
            rx,
            scheduler,
            responder,
            catalog,
            theme: Theme::default(),
            screen: Screen::Picker,
            conversation: None,
            next_conversation: 0,
            pending_replies: 0,
            scroll_to_bottom: false,
        };

        if let Some(requested) = initial_persona {
            app.open_chat(&requested);
        }

        app
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn open_chat(&mut self, requested: &str) {
        let persona_id = self.catalog.resolve(requested).id.clone();
        let welcome = self.responder.welcome_for(&persona_id);
        let id = ConversationId(self.next_conversation);
        self.next_conversation += 1;

        info!("opening chat with persona {persona_id}");
        self.conversation = Some(Conversation::open(id, persona_id, welcome));
        self.pending_replies = 0;
        self.screen = Screen::Chat;
        self.scroll_to_bottom = true;
    }

    fn close_chat(&mut self) {
        // Pending replies become stale once the conversation is gone; they
        // are dropped in apply_event when they fire.
        self.conversation = None;
        self.pending_replies = 0;
        self.screen = Screen::Picker;
    }

    fn submit_draft(&mut self) {
        let Some(conversation) = self.conversation.as_mut() else {
            return;
        };

        if conversation.submit(self.scheduler.as_ref()) {
            self.pending_replies += 1;
            self.scroll_to_bottom = true;
        }
    }

    fn drain_events(&mut self, ctx: Option<&egui::Context>) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: Option<&egui::Context>) {
        match event {
            AppEvent::BotReply { conversation, text } => {
                let Some(live) = self.conversation.as_mut() else {
                    debug!("dropping reply for closed conversation {conversation:?}");
                    return;
                };
                if live.id() != conversation {
                    debug!("dropping stale reply for conversation {conversation:?}");
                    return;
                }

                live.push_bot_reply(text);
                self.pending_replies = self.pending_replies.saturating_sub(1);
                self.scroll_to_bottom = true;
                if let Some(ctx) = ctx {
                    ctx.request_repaint();
                }
            }
        }
    }

    fn avatar(&self, ui: &mut egui::Ui, persona: &Persona) {
        egui::Frame::new()
            .fill(self.theme.accent(persona.accent))
            .corner_radius(egui::CornerRadius::same(16))
            .inner_margin(egui::Margin::symmetric(8, 5))
            .show(ui, |ui| {
                ui.label(RichText::new(&persona.emoji).size(16.0));
            });
    }

    fn render_picker(&mut self, ctx: &egui::Context) {
        let mut picked: Option<String> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(self.theme.spacing_12);
            ui.heading("Sohbet");
            ui.label(RichText::new("Bir asistan seçin").color(self.theme.text_muted));
            ui.add_space(self.theme.spacing_12);

            for persona in self.catalog.personas() {
                let response = self
                    .theme
                    .card_frame()
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.horizontal(|ui| {
                            self.avatar(ui, persona);
                            ui.vertical(|ui| {
                                ui.strong(&persona.display_name);
                                ui.label(
                                    RichText::new(&persona.status_line)
                                        .color(self.theme.text_muted)
                                        .small(),
                                );
                            });
                        });
                    })
                    .response;

                if response.interact(egui::Sense::click()).clicked() {
                    picked = Some(persona.id.clone());
                }
                ui.add_space(self.theme.spacing_8);
            }
        });

        if let Some(id) = picked {
            self.open_chat(&id);
        }
    }

    fn render_chat(&mut self, ctx: &egui::Context) {
        let Some(persona_id) = self.conversation.as_ref().map(|c| c.persona_id().to_string())
        else {
            self.screen = Screen::Picker;
            return;
        };
        let persona = self.catalog.resolve(&persona_id).clone();

        let mut go_back = false;
        egui::TopBottomPanel::top("chat_header").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_4);
            ui.horizontal(|ui| {
                if ui.button("‹").clicked() {
                    go_back = true;
                }
                self.avatar(ui, &persona);
                ui.vertical(|ui| {
                    ui.strong(&persona.display_name);
                    ui.label(
                        RichText::new(&persona.status_line)
                            .color(self.theme.text_muted)
                            .small(),
                    );
                });
            });
            ui.add_space(self.theme.spacing_4);
        });

        let mut send_now = false;
        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
            let Some(conversation) = self.conversation.as_mut() else {
                return;
            };

            ui.add_space(self.theme.spacing_8);
            ui.horizontal(|ui| {
                let composer = self.theme.composer_frame();
                let response = composer
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::singleline(conversation.draft_mut())
                                .desired_width(ui.available_width() - 72.0)
                                .frame(false)
                                .hint_text("Mesajınızı yazın..."),
                        )
                    })
                    .inner;
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send_now = true;
                    response.request_focus();
                }

                let clicked = ui
                    .add_enabled(conversation.can_submit(), egui::Button::new("Gönder"))
                    .clicked();
                send_now |= clicked;
            });
            ui.add_space(self.theme.spacing_8);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.add_space(self.theme.spacing_8);
                    let Some(conversation) = self.conversation.as_ref() else {
                        return;
                    };

                    for message in conversation.messages() {
                        self.render_message_row(ui, &persona, message);
                        ui.add_space(self.theme.spacing_8);
                    }

                    if self.scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        });
        self.scroll_to_bottom = false;

        if send_now {
            self.submit_draft();
        }
        if go_back {
            self.close_chat();
        }
    }

    fn render_message_row(
        &self,
        ui: &mut egui::Ui,
        persona: &Persona,
        message: &crate::conversation::Message,
    ) {
        let timestamp = message.sent_at.format("%H:%M").to_string();
        let max_width = ui.available_width() * 0.8;

        match message.origin {
            MessageOrigin::User => {
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    self.theme
                        .user_bubble_frame(self.theme.accent(persona.accent))
                        .show(ui, |ui| {
                            ui.set_max_width(max_width);
                            ui.label(
                                RichText::new(&message.text).color(self.theme.text_on_accent),
                            );
                            ui.label(
                                RichText::new(timestamp)
                                    .color(self.theme.text_on_accent)
                                    .small(),
                            );
                        });
                });
            }
            MessageOrigin::Bot => {
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    self.theme.bot_bubble_frame().show(ui, |ui| {
                        ui.set_max_width(max_width);
                        ui.label(&message.text);
                        ui.label(
                            RichText::new(timestamp)
                                .color(self.theme.text_muted)
                                .small(),
                        );
                    });
                });
            }
        }
    }
}

impl eframe::App for SohbetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(Some(ctx));

        if self.pending_replies > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        match self.screen {
            Screen::Picker => self.render_picker(ctx),
            Screen::Chat => self.render_chat(ctx),
        }
    }
}
