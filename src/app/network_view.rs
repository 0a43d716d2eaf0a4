use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui::{self, Align2, Color32, Context, FontId, Rect, Sense, Stroke, Ui, vec2};
use log::info;

use crate::config::ForceConfig;
use crate::graph::RelationGraph;
use crate::interaction::{OrbitCamera, Projected};
use crate::payload::NetworkPayload;
use crate::physics::{ForceSimulation, step};
use crate::schedule::{FrameLoop, RepaintScheduler};

use super::NetworkView;
use super::render_utils::{circle_visible, dim_color, draw_background, entity_color, entity_size};

impl NetworkView {
    pub(super) fn new(
        payload: Arc<NetworkPayload>,
        ctx: &Context,
        config: ForceConfig,
        seed: u64,
    ) -> Self {
        let graph = RelationGraph::build(&payload);
        let simulation = ForceSimulation::seeded(&graph, config, seed);
        info!(
            "network view ready: {} entities, {} edges",
            graph.len(),
            graph.edges.len()
        );

        Self {
            payload,
            graph,
            simulation,
            camera: OrbitCamera::default(),
            frames: FrameLoop::start(RepaintScheduler::new(ctx.clone()), "network"),
            selected: None,
            last_tick: Default::default(),
        }
    }

    /// Reseeds the layout with the same graph and forces.
    pub(super) fn reseed(&mut self, seed: u64) {
        self.simulation = ForceSimulation::seeded(&self.graph, self.simulation.config(), seed);
        info!("network layout reseeded ({seed})");
    }

    pub(super) fn select(&mut self, selected: Option<usize>) {
        self.selected = selected.filter(|&id| id < self.graph.len());
    }

    /// Selected entity plus its direct neighbours.
    fn highlight_set(&self) -> Option<HashSet<usize>> {
        let selected = self.selected?;
        let mut set = self
            .graph
            .neighbors(selected)
            .iter()
            .copied()
            .collect::<HashSet<_>>();
        set.insert(selected);
        Some(set)
    }

    fn handle_camera_input(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            self.camera.orbit(response.drag_delta(), rect.height());
        }
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan(response.drag_delta(), rect.height());
        }
        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            self.camera.zoom(scroll);
        }
    }

    pub(super) fn draw(&mut self, ui: &mut Ui, search_matches: Option<&HashSet<usize>>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Network payload has no campaigns.",
                FontId::proportional(15.0),
                Color32::from_gray(180),
            );
            return;
        }

        self.camera.resize(rect.width(), rect.height());
        self.handle_camera_input(ui, rect, &response);

        if self.frames.frame_due() {
            let dt = ui
                .ctx()
                .input(|input| input.stable_dt)
                .clamp(1.0 / 240.0, 1.0 / 20.0);
            let started = Instant::now();
            self.simulation = step(std::mem::take(&mut self.simulation), dt);
            self.last_tick = started.elapsed();
        }
        if self.camera.update() || response.dragged() {
            ui.ctx().request_repaint();
        }

        let snapshot = self.simulation.snapshot();
        let projected = snapshot
            .positions
            .iter()
            .map(|(_, position)| self.camera.project(position, rect))
            .collect::<Vec<Option<Projected>>>();
        let radii = snapshot
            .positions
            .iter()
            .zip(&projected)
            .map(|((entity, _), projection)| {
                let kind = self.graph.entities[*entity].kind;
                projection.map_or(0.0, |projection| {
                    (entity_size(kind) * projection.scale).clamp(1.5, 60.0)
                })
            })
            .collect::<Vec<_>>();

        let highlight = self.highlight_set();
        let focus_active = highlight.is_some() || search_matches.is_some();

        for &(source, target) in &snapshot.edges {
            let (Some(Some(start)), Some(Some(end))) = (projected.get(source), projected.get(target))
            else {
                continue;
            };

            let is_related = highlight
                .as_ref()
                .is_some_and(|set| set.contains(&source) && set.contains(&target));
            let stroke = if is_related {
                Stroke::new(1.8, Color32::from_rgba_unmultiplied(246, 206, 104, 210))
            } else if focus_active {
                Stroke::new(0.8, Color32::from_rgba_unmultiplied(255, 255, 255, 18))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 38))
            };
            painter.line_segment([start.pos, end.pos], stroke);
        }

        // Far to near.
        let mut draw_order = (0..projected.len())
            .filter(|&index| {
                projected[index]
                    .is_some_and(|projection| circle_visible(rect, projection.pos, radii[index]))
            })
            .collect::<Vec<_>>();
        draw_order.sort_by(|a, b| {
            let depth = |index: usize| projected[index].map_or(0.0, |projection| projection.depth);
            depth(*b).total_cmp(&depth(*a))
        });

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| {
            draw_order
                .iter()
                .rev()
                .copied()
                .find(|&index| {
                    projected[index]
                        .is_some_and(|projection| projection.pos.distance(pointer) <= radii[index])
                })
        });
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        for &index in &draw_order {
            let Some(projection) = projected[index] else {
                continue;
            };
            let entity = &self.graph.entities[snapshot.positions[index].0];
            let is_selected = self.selected == Some(entity.id);
            let is_related = highlight.as_ref().is_some_and(|set| set.contains(&entity.id));
            let is_match = search_matches.is_some_and(|matches| matches.contains(&entity.id));

            let base = entity_color(entity.kind);
            let color = if is_selected {
                Color32::from_rgb(245, 206, 93)
            } else if hovered == Some(index) {
                Color32::from_rgb(255, 164, 101)
            } else if is_related || is_match {
                base
            } else if focus_active {
                dim_color(base, 0.35)
            } else {
                base
            };

            let radius = radii[index];
            painter.circle_filled(projection.pos, radius, color);
            if self.simulation.is_pinned(index) {
                painter.circle_stroke(projection.pos, radius + 2.0, Stroke::new(1.2, Color32::WHITE));
            }

            if is_selected || is_related || is_match || hovered == Some(index) {
                painter.text(
                    projection.pos + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    entity.name.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered {
            let entity = &self.graph.entities[snapshot.positions[index].0];
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  links {}",
                    entity.name,
                    entity.kind.label(),
                    self.graph.neighbors(entity.id).len()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let clicked = hovered.map(|index| snapshot.positions[index].0);
            if clicked.is_some() && clicked == self.selected {
                self.select(None);
            } else {
                self.select(clicked);
            }
        }
    }
}
