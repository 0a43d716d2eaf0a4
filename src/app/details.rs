use eframe::egui::{self, RichText, Ui};

use crate::graph::EntityKind;
use crate::interaction::SelectionChange;
use crate::util::display_name;

use super::render_utils::label_color;
use super::{CampaignView, NetworkView, Tab, ViewModel};

const NEIGHBOR_ROWS: usize = 64;

impl ViewModel {
    pub(super) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        match self.tab {
            Tab::Network => match self.network.as_mut() {
                Some(network) => network.draw_details(ui),
                None => {
                    ui.label("No network graph loaded.");
                }
            },
            Tab::Campaigns => match self.campaigns.as_mut() {
                Some(campaigns) => {
                    if let Some(change) = campaigns.draw_details(ui) {
                        self.record_selection(change);
                    }
                }
                None => {
                    ui.label("No campaign payload loaded.");
                }
            },
        }
    }
}

impl NetworkView {
    fn draw_summary(&self, ui: &mut Ui) {
        ui.label("Click a node to inspect it.");
        ui.add_space(6.0);
        ui.label(format!(
            "Campaigns: {}",
            self.graph.count_of(EntityKind::Campaign)
        ));
        ui.label(format!("Users: {}", self.graph.count_of(EntityKind::User)));
        ui.label(format!(
            "Keywords: {}",
            self.graph.count_of(EntityKind::Keyword)
        ));
        ui.label(format!("Edges: {}", self.graph.edges.len()));
        ui.label(format!(
            "Indexed hate words: {}",
            self.payload.hate_words.len()
        ));
    }

    fn draw_details(&mut self, ui: &mut Ui) {
        let Some(selected) = self.selected else {
            self.draw_summary(ui);
            return;
        };
        let Some(entity) = self.graph.entities.get(selected).cloned() else {
            ui.label("Selected entity no longer exists in the graph.");
            return;
        };

        ui.label(RichText::new(entity.name.as_str()).strong());
        ui.small(entity.kind.label());
        ui.add_space(6.0);

        let neighbors = self.graph.neighbors(selected).to_vec();
        ui.label(format!("Connections: {}", neighbors.len()));

        let mut pinned = self.simulation.is_pinned(selected);
        if ui
            .checkbox(&mut pinned, "Pin in place")
            .on_hover_text("Pinned nodes keep their position while the rest of the layout moves.")
            .changed()
        {
            self.simulation.set_pinned(selected, pinned);
        }

        if entity.kind == EntityKind::Keyword {
            ui.separator();
            ui.label(RichText::new("Keyword usage").strong());
            match self.payload.hate_word(&entity.name) {
                Some(usage) if !usage.users.is_empty() => {
                    for user in &usage.users {
                        let campaigns = user
                            .campaigns
                            .iter()
                            .map(|campaign| display_name(campaign))
                            .collect::<Vec<_>>()
                            .join(", ");
                        ui.label(format!("{}: {campaigns}", user.name));
                    }
                }
                _ => {
                    ui.label("No usage recorded for this keyword.");
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("Connected entities").strong());
        if neighbors.is_empty() {
            ui.label("No connections.");
            return;
        }

        let mut next = None;
        egui::ScrollArea::vertical()
            .id_salt("neighbor_scroll")
            .max_height(360.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for &neighbor in neighbors.iter().take(NEIGHBOR_ROWS) {
                    let Some(other) = self.graph.entities.get(neighbor) else {
                        continue;
                    };
                    if ui
                        .link(format!("{}  ({})", other.name, other.kind.label()))
                        .clicked()
                    {
                        next = Some(neighbor);
                    }
                }
                if neighbors.len() > NEIGHBOR_ROWS {
                    ui.small(format!("and {} more", neighbors.len() - NEIGHBOR_ROWS));
                }
            });

        if next.is_some() {
            self.select(next);
        }
    }
}

impl CampaignView {
    fn draw_details(&mut self, ui: &mut Ui) -> Option<SelectionChange> {
        let Some(global) = self.explorer.active_global().cloned() else {
            let catalog = self.explorer.catalog();
            ui.label(format!("Global campaigns: {}", catalog.globals.len()));
            ui.label(format!(
                "Local campaigns: {}",
                catalog
                    .globals
                    .iter()
                    .map(|global| global.locals.len())
                    .sum::<usize>()
            ));
            ui.add_space(6.0);
            ui.label("Click a bubble to drill into its local campaigns.");
            return None;
        };

        ui.label(RichText::new(display_name(&global.name)).strong());
        ui.small(format!("{} local campaigns", global.locals.len()));

        let mut change = None;
        if ui.button("← Back to Global").clicked() {
            change = self.back();
        }

        ui.separator();
        match self.explorer.selected_local() {
            Some(local) => {
                ui.label(RichText::new(display_name(&local.name)).strong());
                ui.label(format!("Label: {}", local.label.as_str()));
                ui.label(format!("Tweets: {}", local.descriptions.len()));
                ui.add_space(4.0);
                egui::ScrollArea::vertical()
                    .id_salt("tweet_scroll")
                    .max_height(420.0)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for description in &local.descriptions {
                            ui.label(description.as_str());
                            ui.separator();
                        }
                    });
            }
            None => {
                for local in &global.locals {
                    ui.horizontal(|ui| {
                        ui.colored_label(label_color(local.label), "●");
                        ui.label(format!(
                            "{}  ({})",
                            display_name(&local.name),
                            local.descriptions.len()
                        ));
                    });
                }
            }
        }

        change
    }
}
