use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, Context, FontId, Sense, Stroke, Ui};
use log::info;

use crate::config::BubbleConfig;
use crate::interaction::{BubbleExplorer, SelectionChange, ViewLevel};
use crate::payload::CampaignCatalog;
use crate::physics::Viewport;
use crate::schedule::{FrameLoop, RepaintScheduler};
use crate::util::{display_name, truncate_label};

use super::CampaignView;
use super::render_utils::{draw_background, label_color};

impl CampaignView {
    pub(super) fn new(
        catalog: Arc<CampaignCatalog>,
        ctx: &Context,
        config: BubbleConfig,
        seed: u64,
    ) -> Self {
        info!("campaign view ready: {} global campaigns", catalog.globals.len());
        Self {
            explorer: BubbleExplorer::new(catalog, Viewport::new(800.0, 600.0), config, seed),
            frames: FrameLoop::start(RepaintScheduler::new(ctx.clone()), "campaigns"),
        }
    }

    pub(super) fn back(&mut self) -> Option<SelectionChange> {
        let change = self.explorer.back();
        if change.is_some() {
            self.frames.resume();
        }
        change
    }

    pub(super) fn drill_down(&mut self, global: &str) -> Option<SelectionChange> {
        let change = self.explorer.drill_down(global);
        if change.is_some() {
            self.frames.resume();
        }
        change
    }

    pub(super) fn draw(&mut self, ui: &mut Ui) -> Option<SelectionChange> {
        let mut change = None;

        if self.explorer.view_level() == ViewLevel::Local {
            ui.horizontal(|ui| {
                if ui.button("← Back to Global").clicked() {
                    change = self.back();
                }
                if let Some(global) = self.explorer.active_global() {
                    ui.label(display_name(&global.name));
                }
            });
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.explorer.simulation().nodes().is_empty() {
            let message = match self.explorer.view_level() {
                ViewLevel::Global => "Campaign payload has no global campaigns.",
                ViewLevel::Local => "This campaign has no local campaigns.",
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(15.0),
                Color32::from_gray(180),
            );
            return change;
        }

        self.explorer.resize(Viewport::new(rect.width(), rect.height()));
        if self.frames.frame_due() {
            self.explorer.tick();
        }

        let origin = rect.min.to_vec2();
        let selected = self.explorer.selection().selected;
        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| self.explorer.simulation().hit_test(pointer - origin));
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        for (index, node) in self.explorer.simulation().nodes().iter().enumerate() {
            let center = node.position.to_pos2() + origin;
            let is_selected = selected.as_deref() == Some(node.datum.id.as_str());
            let stroke = if is_selected || hovered == Some(index) {
                Stroke::new(3.0, Color32::from_rgb(245, 206, 93))
            } else {
                Stroke::new(2.0, Color32::WHITE)
            };

            painter.circle_filled(center, node.radius, label_color(node.datum.label));
            painter.circle_stroke(center, node.radius, stroke);

            let font_size = (node.radius / 5.0).max(10.0);
            let max_chars = ((node.radius * 2.0) / (font_size * 0.55)).max(3.0) as usize;
            painter.text(
                center,
                Align2::CENTER_CENTER,
                truncate_label(&display_name(&node.datum.id), max_chars),
                FontId::proportional(font_size),
                Color32::WHITE,
            );
        }

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(clicked) = self.explorer.click(pointer - origin)
        {
            self.frames.resume();
            change = Some(clicked);
        }

        change
    }
}
