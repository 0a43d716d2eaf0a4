use std::collections::VecDeque;
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout, Ui};
use log::info;

use crate::config::DashboardConfig;
use crate::interaction::{OrbitCamera, SelectionChange};
use crate::payload::PayloadSet;
use crate::util::display_name;

use super::{CampaignView, NetworkView, Tab, ViewModel};

const SEARCH_RESULT_ROWS: usize = 12;

impl ViewModel {
    pub(super) fn new(payloads: PayloadSet, ctx: &Context, config: &DashboardConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("layout seed {seed}");

        let network = payloads
            .network
            .map(|payload| NetworkView::new(Arc::new(payload), ctx, config.force, seed));
        let campaigns = payloads
            .campaigns
            .map(|catalog| CampaignView::new(Arc::new(catalog), ctx, config.bubble, seed));
        let tab = if network.is_none() && campaigns.is_some() {
            Tab::Campaigns
        } else {
            Tab::Network
        };

        Self {
            tab,
            network,
            campaigns,
            search: String::new(),
            search_match_cache: None,
            network_paused: false,
            last_selection: None,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(super) fn show(
        &mut self,
        ctx: &Context,
        config: &DashboardConfig,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.update_fps_counter(ctx);
        self.sync_frame_loops();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("SentinelX");
                    ui.separator();
                    ui.selectable_value(&mut self.tab, Tab::Network, "Network graph");
                    ui.selectable_value(&mut self.tab, Tab::Campaigns, "Campaigns");
                    ui.separator();
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload payloads"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.fps_display_text());
                        if let Some(text) = self.selection_text() {
                            ui.separator();
                            ui.label(text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui, config));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Network => {
                let matches = self.cached_search_matches();
                match self.network.as_mut() {
                    Some(network) => network.draw(ui, matches.as_deref()),
                    None => Self::draw_missing(ui, "No network graph payload was provided."),
                }
            }
            Tab::Campaigns => match self.campaigns.as_mut() {
                Some(campaigns) => {
                    if let Some(change) = campaigns.draw(ui) {
                        self.record_selection(change);
                    }
                }
                None => Self::draw_missing(ui, "No campaign payload was provided."),
            },
        });
    }

    /// Only the visible tab keeps its frame loop running.
    fn sync_frame_loops(&mut self) {
        if let Some(network) = self.network.as_mut() {
            let wanted = self.tab == Tab::Network && !self.network_paused;
            if wanted && !network.frames.is_running() {
                network.frames.resume();
            } else if !wanted && network.frames.is_running() {
                network.frames.pause();
            }
        }

        if let Some(campaigns) = self.campaigns.as_mut() {
            let wanted = self.tab == Tab::Campaigns;
            if wanted && !campaigns.frames.is_running() {
                campaigns.frames.resume();
            } else if !wanted && campaigns.frames.is_running() {
                campaigns.frames.pause();
            }
        }
    }

    fn draw_missing(ui: &mut Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading(message);
            ui.label("Pass the payload path on the command line and reload.");
        });
    }

    pub(super) fn record_selection(&mut self, change: SelectionChange) {
        info!(
            "campaign selection: {} view, {}",
            change.view.label(),
            change.selected.as_deref().unwrap_or("nothing selected")
        );
        self.last_selection = Some(change);
    }

    fn selection_text(&self) -> Option<String> {
        match self.tab {
            Tab::Network => {
                let network = self.network.as_ref()?;
                let entity = &network.graph.entities[network.selected?];
                Some(format!("{}: {}", entity.kind.label(), entity.name))
            }
            Tab::Campaigns => {
                let change = self.last_selection.as_ref()?;
                Some(match &change.selected {
                    Some(selected) => {
                        format!("{} view: {}", change.view.label(), display_name(selected))
                    }
                    None => format!("{} view", change.view.label()),
                })
            }
        }
    }

    fn draw_controls(&mut self, ui: &mut Ui, config: &DashboardConfig) {
        match self.tab {
            Tab::Network => self.draw_network_controls(ui, config),
            Tab::Campaigns => self.draw_campaign_controls(ui),
        }
    }

    fn draw_network_controls(&mut self, ui: &mut Ui, config: &DashboardConfig) {
        ui.heading("Network Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search entities")
            .on_hover_text("Fuzzy-highlight campaigns, users and keywords by name.");
        ui.text_edit_singleline(&mut self.search);

        let matches = self.cached_search_matches();
        let Some(network) = self.network.as_mut() else {
            ui.label("No network graph loaded.");
            return;
        };

        if let Some(matches) = matches {
            let mut ids = matches.iter().copied().collect::<Vec<_>>();
            ids.sort_unstable();
            ui.small(format!("{} matches", ids.len()));
            for id in ids.into_iter().take(SEARCH_RESULT_ROWS) {
                let entity = &network.graph.entities[id];
                let is_selected = network.selected == Some(id);
                if ui
                    .selectable_label(is_selected, format!("{}  ({})", entity.name, entity.kind.label()))
                    .clicked()
                {
                    network.select(Some(id));
                }
            }
        }

        ui.separator();
        ui.label("Physics");
        let mut force = network.simulation.config();
        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut force.repulsion, 0.0..=2.0).text("repulsion"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut force.attraction, 0.0..=0.05)
                    .text("attraction")
                    .fixed_decimals(4),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut force.centering, 0.0..=0.01)
                    .text("centering")
                    .fixed_decimals(4),
            )
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut force.damping, 0.5..=0.995).text("damping"))
            .changed();
        if changed {
            network.simulation.set_config(force);
        }

        ui.horizontal_wrapped(|ui| {
            let pause_label = if self.network_paused { "Resume" } else { "Pause" };
            if ui.button(pause_label).clicked() {
                self.network_paused = !self.network_paused;
            }
            if ui.button("Reset forces").clicked() {
                network.simulation.set_config(config.force);
            }
            if ui.button("Reseed layout").clicked() {
                network.reseed(rand::random());
            }
            if ui.button("Reset camera").clicked() {
                network.camera = OrbitCamera::default();
            }
        });

        ui.add_space(4.0);
        ui.small(format!(
            "{}  |  ticks {}  |  energy {:.3}",
            network.simulation.phase().label(),
            network.simulation.ticks(),
            network.simulation.kinetic_energy()
        ));
        ui.small(format!("camera distance {:.1}", network.camera.distance()));
        ui.small("Drag to orbit, right-drag to pan, scroll to zoom.");
    }

    fn draw_campaign_controls(&mut self, ui: &mut Ui) {
        ui.heading("Campaigns");
        ui.separator();
        ui.add_space(4.0);

        let Some(campaigns) = self.campaigns.as_mut() else {
            ui.label("No campaign payload loaded.");
            return;
        };

        let mut change = None;
        let active = campaigns
            .explorer
            .active_global()
            .map(|global| global.name.clone());

        if active.is_some() && ui.button("← Back to Global").clicked() {
            change = campaigns.back();
        }

        let layout = campaigns.explorer.simulation();
        ui.small(format!(
            "layout {}  |  heat {:.3}",
            layout.phase().label(),
            layout.heat()
        ));

        let catalog = Arc::clone(campaigns.explorer.catalog());
        egui::ScrollArea::vertical()
            .id_salt("global_campaigns_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for global in &catalog.globals {
                    let is_active = active.as_deref() == Some(global.name.as_str());
                    let label = format!("{}  ({})", display_name(&global.name), global.locals.len());
                    if ui.selectable_label(is_active, label).clicked() && !is_active {
                        change = campaigns.drill_down(&global.name);
                    }
                }
            });

        if let Some(change) = change {
            self.record_selection(change);
        }
    }
}
