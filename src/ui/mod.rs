//! Egui-based UI for the App Inspector.
//!
//! This module defines the application state, the eframe App implementation,
//! and wires UI actions to background tasks defined in ui::tasks.

use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use eframe::{App, egui};

use crate::config::Config;
use crate::detail::DetailBuilder;
use crate::inspector::PackageInspector;
use crate::launch::LaunchGateway;
use crate::source::{Launcher, PackageSource};
use crate::store::{CollectionStore, DetailSlot};
use crate::style::set_inspector_style;
use crate::types::{ProgressUpdate, TaskKind};

mod list;
mod panels;
pub mod tasks;

/// Handles background tasks need; cheap to clone into worker threads.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<CollectionStore>,
    pub detail: Arc<DetailSlot>,
    pub inspector: PackageInspector,
    pub details: DetailBuilder,
    pub gateway: LaunchGateway,
    pub progress_tx: mpsc::Sender<ProgressUpdate>,
}

/// UI-only state: widget buffers and the status log.
pub struct GuiState {
    pub query: String,
    pub show_all_permissions: bool,
    pub show_all_activities: bool,

    // progress channel
    pub progress_rx: mpsc::Receiver<ProgressUpdate>,
    pub current_task: TaskKind,
    pub current_message: String,
    pub task_running: bool,

    // status log
    pub status_msgs: Vec<String>,
}

impl GuiState {
    pub fn new(progress_rx: mpsc::Receiver<ProgressUpdate>) -> Self {
        Self {
            query: String::new(),
            show_all_permissions: false,
            show_all_activities: false,
            progress_rx,
            current_task: TaskKind::Idle,
            current_message: String::new(),
            task_running: false,
            status_msgs: Vec::new(),
        }
    }

    /// Fold pending progress messages into the status fields.
    pub fn drain_progress(&mut self) {
        while let Ok(update) = self.progress_rx.try_recv() {
            self.current_task = update.kind.clone();
            self.current_message = update.message.clone();
            self.task_running = !update.finished;
            if let Some(err) = update.error {
                self.status_msgs.push(format!("Error: {}", err));
            } else if update.finished {
                self.status_msgs.push(update.message);
            }
        }
    }

    pub fn last_status(&self) -> Option<&str> {
        self.status_msgs.last().map(String::as_str)
    }
}

/// Main eframe application that renders and controls the UI.
pub struct AppInspectorApp {
    pub state: Arc<Mutex<GuiState>>,
    pub services: Services,
}

impl AppInspectorApp {
    /// Build the app around a registry and launcher and kick off the first scan.
    pub fn new(config: &Config, source: Arc<dyn PackageSource>, launcher: Arc<dyn Launcher>) -> Self {
        let (tx, rx) = mpsc::channel();
        let inspector = PackageInspector::new(source);
        let services = Services {
            store: Arc::new(CollectionStore::new(config.show_system_apps)),
            detail: Arc::new(DetailSlot::new()),
            details: DetailBuilder::new(inspector.clone()).with_chunk_size(config.digest_chunk_size),
            inspector,
            gateway: LaunchGateway::new(launcher),
            progress_tx: tx,
        };
        tasks::spawn_refresh_apps(&services);
        Self {
            state: Arc::new(Mutex::new(GuiState::new(rx))),
            services,
        }
    }
}

/// Egui frame update: handles theme, progress messages, and UI layout.
impl App for AppInspectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        set_inspector_style(ctx);

        self.state.lock().unwrap().drain_progress();

        panels::top::show(ctx, self);
        panels::bottom::show(ctx, self);
        panels::side::show(ctx, self);
        panels::central::show(ctx, self);

        // background workers publish without waking the UI
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
