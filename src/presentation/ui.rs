use crate::application::auth_service::AuthGateway;
use crate::application::navigation::Navigator;
use crate::application::trailer_service::{TrailerService, TrailerState, TrailerView, BACK_STEPS};
use crate::domain::models::*;
use crate::domain::traits::ConfigStore;
use eframe::egui;
use std::collections::VecDeque;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

// --- Enums for Async Communication ---
pub enum AppMessage {
    SignupFinished {
        session: Option<AuthSession>,
        result: AppResult<UserProfile>,
    },
    LoginFinished(AppResult<AuthSession>),
    TrailerFetched {
        generation: u64,
        outcome: AppResult<Option<TrailerMetadata>>,
    },
    ConfigSaved,
    ConfigSaveFailed(String),
}

// --- Notification System ---
#[derive(Clone)]
struct Notification {
    message: String,
    kind: NotificationKind,
    created_at: Instant,
    ttl: Duration,
}

#[derive(Clone, PartialEq)]
enum NotificationKind {
    Info,
    Success,
    Error,
}

// --- Login form ---
#[derive(Default)]
struct LoginForm {
    is_signup_mode: bool,
    name: String,
    email: String,
    password: String,
}

// --- Main App Struct ---
pub struct StreamletApp {
    // Services
    auth_gateway: Arc<AuthGateway>,
    trailer_service: Arc<TrailerService>,
    config_store: Arc<dyn ConfigStore>,

    // State
    config: AppConfig,
    navigator: Navigator,
    trailer_view: Option<TrailerView>,
    next_generation: u64,

    // UI State & feedback
    form: LoginForm,
    content_id_input: String,
    is_submitting: bool,
    notifications: VecDeque<Notification>,

    // Async Runtime & Communication
    rt: Runtime,
    tx: mpsc::Sender<AppMessage>,
    rx: mpsc::Receiver<AppMessage>,
}

impl StreamletApp {
    pub fn new(
        auth_gateway: Arc<AuthGateway>,
        trailer_service: Arc<TrailerService>,
        config_store: Arc<dyn ConfigStore>,
        config: AppConfig,
        rt: Runtime,
    ) -> Self {
        let (tx, rx) = mpsc::channel();

        let initial_route = match config.session.clone() {
            Some(session) => {
                log::info!("Restoring session for {}", session.uid);
                rt.block_on(auth_gateway.restore_session(session));
                Route::Home
            }
            None => Route::Login,
        };

        let mut app = Self {
            auth_gateway,
            trailer_service,
            config_store,
            navigator: Navigator::new(initial_route),
            trailer_view: None,
            next_generation: 0,
            form: LoginForm::default(),
            content_id_input: String::new(),
            is_submitting: false,
            notifications: VecDeque::new(),
            rt,
            tx,
            rx,
            config,
        };

        let missing = app.config.missing_settings();
        if !missing.is_empty() {
            app.add_notification(
                format!("Missing settings: {}", missing.join(", ")),
                NotificationKind::Error,
            );
        }

        app
    }

    // --- Action Dispatchers (Spawn Async Tasks) ---

    fn dispatch_save_config(&self) {
        let tx = self.tx.clone();
        let store = self.config_store.clone();
        let config = self.config.clone();

        self.rt.spawn(async move {
            match store.save(&config) {
                Ok(_) => tx.send(AppMessage::ConfigSaved).ok(),
                Err(e) => tx.send(AppMessage::ConfigSaveFailed(e.to_string())).ok(),
            };
        });
    }

    fn dispatch_signup(&mut self) {
        if self.is_submitting {
            return;
        }
        self.is_submitting = true;

        let tx = self.tx.clone();
        let gateway = self.auth_gateway.clone();
        let name = self.form.name.trim().to_string();
        let email = self.form.email.trim().to_string();
        let password = self.form.password.clone();

        self.rt.spawn(async move {
            let result = gateway.signup(&name, &email, &password).await;
            let session = gateway.current_session().await;
            tx.send(AppMessage::SignupFinished { session, result }).ok();
        });
    }

    fn dispatch_login(&mut self) {
        if self.is_submitting {
            return;
        }
        self.is_submitting = true;

        let tx = self.tx.clone();
        let gateway = self.auth_gateway.clone();
        let email = self.form.email.trim().to_string();
        let password = self.form.password.clone();

        self.rt.spawn(async move {
            let result = gateway.login(&email, &password).await;
            tx.send(AppMessage::LoginFinished(result)).ok();
        });
    }

    fn dispatch_logout(&mut self) {
        let gateway = self.auth_gateway.clone();
        self.rt.spawn(async move {
            gateway.logout().await;
        });

        self.config.session = None;
        self.dispatch_save_config();
        self.navigate_to_root(Route::Login);
        self.add_notification("Signed out".into(), NotificationKind::Info);
    }

    // --- Navigation ---

    fn open_player(&mut self, id: String) {
        if id.is_empty() {
            self.add_notification("Enter a title id".into(), NotificationKind::Error);
            return;
        }
        self.navigator.push(Route::Player { id });
        self.sync_trailer_view();
    }

    fn navigate_back(&mut self, steps: usize) {
        self.navigator.back(steps);
        self.sync_trailer_view();
    }

    fn navigate_to_root(&mut self, route: Route) {
        self.navigator.replace_all(route);
        self.sync_trailer_view();
    }

    /// Keeps exactly one trailer view alive while the player route is current.
    fn sync_trailer_view(&mut self) {
        let id = match self.navigator.current() {
            Route::Player { id } => id.clone(),
            _ => {
                self.trailer_view = None;
                return;
            }
        };

        if self.trailer_view.as_ref().is_some_and(|v| v.id() == id) {
            return;
        }

        self.next_generation += 1;
        let tx = self.tx.clone();
        self.trailer_view = Some(TrailerView::open(
            id,
            self.next_generation,
            self.trailer_service.clone(),
            self.rt.handle(),
            move |generation, outcome| {
                tx.send(AppMessage::TrailerFetched {
                    generation,
                    outcome,
                })
                .ok();
            },
        ));
    }

    // --- Helper Methods ---

    fn add_notification(&mut self, message: String, kind: NotificationKind) {
        self.notifications.push_back(Notification {
            message,
            kind,
            created_at: Instant::now(),
            ttl: Duration::from_secs(4),
        });
        if self.notifications.len() > 5 {
            self.notifications.pop_front();
        }
    }

    fn signed_in(&mut self, session: AuthSession) {
        self.config.session = Some(session);
        self.dispatch_save_config();
        self.form = LoginForm::default();
        self.navigate_to_root(Route::Home);
    }

    fn handle_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                AppMessage::SignupFinished { session, result } => {
                    self.is_submitting = false;
                    match result {
                        Ok(profile) => {
                            self.add_notification(
                                format!("Welcome, {}!", profile.name),
                                NotificationKind::Success,
                            );
                        }
                        Err(e) => {
                            log::warn!("Sign-up error: {:?}", e);
                            self.add_notification(e.user_message(), NotificationKind::Error);
                        }
                    }
                    // The account exists whenever the provider issued a session.
                    if let Some(session) = session {
                        self.signed_in(session);
                    }
                }
                AppMessage::LoginFinished(Ok(session)) => {
                    self.is_submitting = false;
                    self.signed_in(session);
                    self.add_notification("Signed in".into(), NotificationKind::Success);
                }
                AppMessage::LoginFinished(Err(e)) => {
                    self.is_submitting = false;
                    log::warn!("Sign-in error: {:?}", e);
                    self.add_notification(e.user_message(), NotificationKind::Error);
                }
                AppMessage::TrailerFetched {
                    generation,
                    outcome,
                } => {
                    if let Some(view) = self.trailer_view.as_mut() {
                        view.apply(generation, outcome);
                    }
                }
                AppMessage::ConfigSaved => {}
                AppMessage::ConfigSaveFailed(e) => {
                    self.add_notification(
                        format!("Could not save settings: {}", e),
                        NotificationKind::Error,
                    );
                }
            }
        }
    }
}

// --- UI Implementation ---
impl eframe::App for StreamletApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. Process Async Messages
        self.handle_messages();

        // 2. Keep polling while something is in flight
        let awaiting_trailer = self
            .trailer_view
            .as_ref()
            .is_some_and(|v| v.state() == &TrailerState::Awaiting);
        if self.is_submitting || awaiting_trailer {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if !self.notifications.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        // 3. UI Styling
        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);
        ctx.set_style(style);

        // 4. Notifications Overlay
        self.render_notifications(ctx);

        // 5. Header
        self.render_header(ctx, awaiting_trailer);

        // 6. Main Content
        let route = self.navigator.current().clone();
        egui::CentralPanel::default().show(ctx, |ui| match route {
            Route::Login => self.ui_login(ui),
            Route::Home => self.ui_home(ui),
            Route::Player { .. } => self.ui_player(ui),
        });
    }
}

impl StreamletApp {
    // --- UI Sections ---

    fn render_header(&self, ctx: &egui::Context, busy: bool) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("🎬 Streamlet").strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(session) = &self.config.session {
                        ui.label(
                            egui::RichText::new(format!("👤 {}", session.email))
                                .strong()
                                .color(ui.visuals().text_color()),
                        );
                    } else {
                        ui.label(egui::RichText::new("Not signed in").weak());
                    }

                    if self.is_submitting || busy {
                        ui.spinner();
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn render_notifications(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.created_at) < n.ttl);

        if self.notifications.is_empty() {
            return;
        }

        let window_rect = ctx.available_rect();
        let mut y_offset = window_rect.max.y - 20.0;

        for notification in self.notifications.iter().rev() {
            let (bg_color, border_color) = match notification.kind {
                NotificationKind::Info => (
                    egui::Color32::from_rgba_unmultiplied(40, 80, 120, 230),
                    egui::Color32::from_rgb(70, 130, 180),
                ),
                NotificationKind::Success => (
                    egui::Color32::from_rgba_unmultiplied(30, 80, 40, 230),
                    egui::Color32::from_rgb(76, 175, 80),
                ),
                NotificationKind::Error => (
                    egui::Color32::from_rgba_unmultiplied(100, 30, 30, 230),
                    egui::Color32::from_rgb(200, 60, 60),
                ),
            };

            egui::Area::new(egui::Id::new(format!(
                "toast_{:?}",
                notification.created_at
            )))
            .anchor(
                egui::Align2::RIGHT_BOTTOM,
                egui::vec2(-10.0, y_offset - window_rect.max.y),
            )
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .corner_radius(4)
                    .inner_margin(egui::Margin::symmetric(10, 6))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let icon = match notification.kind {
                                NotificationKind::Info => "ℹ",
                                NotificationKind::Success => "✅",
                                NotificationKind::Error => "⚠",
                            };
                            ui.label(icon);
                            ui.label(
                                egui::RichText::new(&notification.message)
                                    .color(egui::Color32::WHITE),
                            );
                        });
                    });
            });

            y_offset -= 40.0;
        }
    }

    fn ui_login(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading(if self.form.is_signup_mode {
                "Sign Up"
            } else {
                "Sign In"
            });
            ui.add_space(20.0);

            egui::Grid::new("login_grid")
                .num_columns(2)
                .spacing([10.0, 10.0])
                .show(ui, |ui| {
                    if self.form.is_signup_mode {
                        ui.label("Your name:");
                        ui.text_edit_singleline(&mut self.form.name);
                        ui.end_row();
                    }

                    ui.label("Email:");
                    ui.text_edit_singleline(&mut self.form.email);
                    ui.end_row();

                    ui.label("Password:");
                    ui.add(egui::TextEdit::singleline(&mut self.form.password).password(true));
                    ui.end_row();
                });

            ui.add_space(10.0);

            let label = if self.form.is_signup_mode {
                "Sign Up"
            } else {
                "Sign In"
            };
            let btn = egui::Button::new(label).min_size(egui::vec2(120.0, 40.0));
            if ui.add_enabled(!self.is_submitting, btn).clicked() {
                if self.form.is_signup_mode {
                    self.dispatch_signup();
                } else {
                    self.dispatch_login();
                }
            }

            ui.add_space(10.0);
            let toggle = if self.form.is_signup_mode {
                "Already have an account? Sign In"
            } else {
                "New here? Sign Up Now"
            };
            if ui.link(toggle).clicked() {
                self.form.is_signup_mode = !self.form.is_signup_mode;
            }
        });
    }

    fn ui_home(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Featured Titles");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🚪 Sign Out").clicked() {
                    self.dispatch_logout();
                }
            });
        });

        ui.separator();
        ui.add_space(10.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            let titles = self.config.featured_titles.clone();
            if titles.is_empty() {
                ui.label(egui::RichText::new("No featured titles configured.").weak());
            }
            for id in titles {
                egui::Frame::group(ui.style())
                    .inner_margin(12.0)
                    .corner_radius(6)
                    .fill(ui.style().visuals.faint_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new("🎞").size(24.0));
                            ui.label(format!("Title #{}", id));
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("▶ Trailer").clicked() {
                                        self.open_player(id.clone());
                                    }
                                },
                            );
                        });
                    });
                ui.add_space(8.0);
            }

            ui.add_space(20.0);
            egui::CollapsingHeader::new("🔎 Open by title id")
                .default_open(false)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut self.content_id_input)
                            .on_hover_text("e.g. 550");
                        if ui.button("Open").clicked() {
                            let id = self.content_id_input.trim().to_string();
                            self.open_player(id);
                        }
                    });
                });
        });
    }

    fn ui_player(&mut self, ui: &mut egui::Ui) {
        if ui.button("⬅ Back").clicked() {
            self.navigate_back(BACK_STEPS);
            return;
        }

        let state = match &self.trailer_view {
            Some(view) => view.state().clone(),
            None => TrailerState::Awaiting,
        };

        ui.add_space(10.0);
        egui::Frame::group(ui.style())
            .inner_margin(16.0)
            .corner_radius(8)
            .fill(ui.style().visuals.faint_bg_color)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                match &state {
                    TrailerState::Awaiting => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.add(egui::Spinner::new().size(40.0));
                            ui.add_space(40.0);
                        });
                    }
                    TrailerState::Unavailable => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.heading("No trailer available");
                            ui.add_space(40.0);
                        });
                    }
                    TrailerState::Loaded(meta) => {
                        let url = meta.embed_url();
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            let btn = egui::Button::new(
                                egui::RichText::new("▶ Play trailer").size(18.0),
                            )
                            .min_size(egui::vec2(180.0, 50.0));
                            if ui.add(btn).clicked() {
                                if let Err(e) = webbrowser::open(&url) {
                                    log::warn!("Could not open {}: {}", url, e);
                                    self.add_notification(
                                        "Could not open the browser".into(),
                                        NotificationKind::Error,
                                    );
                                }
                            }
                            ui.label(egui::RichText::new(&url).monospace().weak().small());
                            ui.add_space(20.0);
                        });
                    }
                }
            });

        if let TrailerState::Loaded(meta) = &state {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(meta.published_date()).weak());
                ui.separator();
                ui.label(egui::RichText::new(&meta.name).strong());
                ui.separator();
                ui.label(&meta.video_type);
            });
        }
    }
}
