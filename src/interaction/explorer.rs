use std::sync::Arc;

use eframe::egui::Pos2;
use log::info;

use crate::config::BubbleConfig;
use crate::graph::{BubbleKind, BubbleView, build_bubbles};
use crate::payload::{CampaignCatalog, GlobalCampaign, LocalCampaign};
use crate::physics::{BubbleSimulation, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewLevel {
    Global,
    Local,
}

impl ViewLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
        }
    }
}

/// Emitted whenever the active view or the selected bubble changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub view: ViewLevel,
    pub selected: Option<String>,
}

/// Drill-down state for the campaign bubbles. The catalog is held for the
/// explorer's whole life, so moving between views never reloads it.
pub struct BubbleExplorer {
    catalog: Arc<CampaignCatalog>,
    view: BubbleView,
    selected: Option<String>,
    simulation: BubbleSimulation,
    parked_global: Option<BubbleSimulation>,
    config: BubbleConfig,
    seed: u64,
}

impl BubbleExplorer {
    pub fn new(
        catalog: Arc<CampaignCatalog>,
        viewport: Viewport,
        config: BubbleConfig,
        seed: u64,
    ) -> Self {
        let view = BubbleView::Global;
        let simulation =
            BubbleSimulation::new(build_bubbles(&catalog, &view), viewport, config, seed);

        Self {
            catalog,
            view,
            selected: None,
            simulation,
            parked_global: None,
            config,
            seed,
        }
    }

    /// Handles a click at `point` in viewport coordinates.
    pub fn click(&mut self, point: Pos2) -> Option<SelectionChange> {
        let index = self.simulation.hit_test(point)?;
        let node = &self.simulation.nodes()[index];
        let id = node.datum.id.clone();
        match node.datum.kind {
            BubbleKind::Global => self.drill_down(&id),
            BubbleKind::Local => self.select_local(&id),
        }
    }

    /// Switches to the local view of `global`, rebuilding the bubbles from
    /// the cached catalog.
    pub fn drill_down(&mut self, global: &str) -> Option<SelectionChange> {
        if self.catalog.global(global).is_none() {
            return None;
        }

        let view = BubbleView::Local {
            global: global.to_owned(),
        };
        let data = build_bubbles(&self.catalog, &view);
        let viewport = self.simulation.viewport();
        let local = BubbleSimulation::new(data, viewport, self.config, self.seed);
        let previous = std::mem::replace(&mut self.simulation, local);
        if self.view == BubbleView::Global {
            self.parked_global = Some(previous);
        }

        info!(
            "drilled into {global}: {} local campaigns",
            self.simulation.nodes().len()
        );
        self.view = view;
        self.selected = Some(global.to_owned());
        Some(self.selection())
    }

    fn select_local(&mut self, local: &str) -> Option<SelectionChange> {
        if self.selected.as_deref() == Some(local) {
            return None;
        }

        self.selected = Some(local.to_owned());
        Some(self.selection())
    }

    /// Returns to the global view, restoring its previous layout when one
    /// was kept.
    pub fn back(&mut self) -> Option<SelectionChange> {
        if self.view == BubbleView::Global {
            return None;
        }

        let viewport = self.simulation.viewport();
        let mut global = self.parked_global.take().unwrap_or_else(|| {
            BubbleSimulation::new(
                build_bubbles(&self.catalog, &BubbleView::Global),
                viewport,
                self.config,
                self.seed,
            )
        });
        global.resize(viewport);

        info!("back to global campaigns");
        self.simulation = global;
        self.view = BubbleView::Global;
        self.selected = None;
        Some(self.selection())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.simulation.resize(viewport);
    }

    pub fn tick(&mut self) {
        self.simulation.tick();
    }

    pub fn selection(&self) -> SelectionChange {
        SelectionChange {
            view: self.view_level(),
            selected: self.selected.clone(),
        }
    }

    pub fn view_level(&self) -> ViewLevel {
        match self.view {
            BubbleView::Global => ViewLevel::Global,
            BubbleView::Local { .. } => ViewLevel::Local,
        }
    }

    pub fn simulation(&self) -> &BubbleSimulation {
        &self.simulation
    }

    pub fn catalog(&self) -> &Arc<CampaignCatalog> {
        &self.catalog
    }

    pub fn active_global(&self) -> Option<&GlobalCampaign> {
        match &self.view {
            BubbleView::Global => None,
            BubbleView::Local { global } => self.catalog.global(global),
        }
    }

    pub fn selected_local(&self) -> Option<&LocalCampaign> {
        let global = self.active_global()?;
        global.local(self.selected.as_deref()?)
    }
}
