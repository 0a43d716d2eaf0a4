use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context};
use log::{error, info};

use crate::config::DashboardConfig;
use crate::graph::RelationGraph;
use crate::interaction::{BubbleExplorer, OrbitCamera, SelectionChange};
use crate::payload::{NetworkPayload, PayloadSet, load_payloads};
use crate::physics::ForceSimulation;
use crate::schedule::{FrameLoop, RepaintScheduler};

mod bubble_view;
mod details;
mod fps;
mod network_view;
mod panels;
mod render_utils;
mod search;

pub struct DashboardApp {
    config: DashboardConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<PayloadSet, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<PayloadSet, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Network,
    Campaigns,
}

struct ViewModel {
    tab: Tab,
    network: Option<NetworkView>,
    campaigns: Option<CampaignView>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    network_paused: bool,
    last_selection: Option<SelectionChange>,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

/// 3D relationship graph. Dropping it stops its frame loop.
struct NetworkView {
    payload: Arc<NetworkPayload>,
    graph: RelationGraph,
    simulation: ForceSimulation<3>,
    camera: OrbitCamera,
    frames: FrameLoop<RepaintScheduler>,
    selected: Option<usize>,
    last_tick: Duration,
}

/// Campaign bubbles with drill-down. Dropping it stops its frame loop.
struct CampaignView {
    explorer: BubbleExplorer,
    frames: FrameLoop<RepaintScheduler>,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let state = Self::start_load(&config);
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(config: &DashboardConfig) -> Receiver<Result<PayloadSet, String>> {
        let (tx, rx) = mpsc::channel();
        let paths = config.paths.clone();

        thread::spawn(move || {
            let result = load_payloads(&paths).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(config: &DashboardConfig) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(config),
        }
    }

    fn ready_state(
        result: Result<PayloadSet, String>,
        ctx: &Context,
        config: &DashboardConfig,
    ) -> AppState {
        match result {
            Ok(payloads) => {
                info!("payloads ready");
                AppState::Ready(Box::new(ViewModel::new(payloads, ctx, config)))
            }
            Err(message) => {
                error!("failed to load payloads: {message}");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(Self::ready_state(result, ctx, &self.config));
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading SentinelX payloads...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint_after(Duration::from_millis(50));
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load SentinelX payloads");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.config));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.config, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.config));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(Self::ready_state(result, ctx, &self.config));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(Duration::from_millis(50));
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
