mod app;
mod config;
mod graph;
mod interaction;
mod payload;
mod physics;
mod schedule;
mod util;

use std::path::PathBuf;

use clap::Parser;

use config::{BubbleConfig, DashboardConfig, ForceConfig};
use payload::PayloadPaths;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Network graph payload (`{"campaign": {...}, "hatewords": {...}}`).
    #[arg(long)]
    network_graph: Option<PathBuf>,

    /// Campaign payload (`{global: {local: {label, tdescription}}}`).
    #[arg(long)]
    campaigns: Option<PathBuf>,

    #[arg(long, default_value_t = ForceConfig::default().repulsion)]
    repulsion: f32,

    #[arg(long, default_value_t = ForceConfig::default().attraction)]
    attraction: f32,

    #[arg(long, default_value_t = ForceConfig::default().centering)]
    centering: f32,

    /// Velocity kept per frame; must stay below 1.
    #[arg(long, default_value_t = ForceConfig::default().damping)]
    damping: f32,

    /// Seed for initial node placement. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

impl Args {
    fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            paths: PayloadPaths {
                network_graph: self.network_graph.clone(),
                campaigns: self.campaigns.clone(),
            },
            force: ForceConfig {
                repulsion: self.repulsion,
                attraction: self.attraction,
                centering: self.centering,
                damping: self.damping,
                ..ForceConfig::default()
            }
            .sanitized(),
            bubble: BubbleConfig::default(),
            seed: self.seed,
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.dashboard_config();
    log::info!(
        "starting SentinelX viewer (network: {:?}, campaigns: {:?})",
        config.paths.network_graph,
        config.paths.campaigns
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "SentinelX",
        options,
        Box::new(move |cc| Ok(Box::new(app::DashboardApp::new(cc, config)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_reach_force_config() {
        let args = Args::parse_from([
            "sentinelx",
            "--network-graph",
            "graph.json",
            "--damping",
            "1.5",
            "--attraction",
            "0.01",
            "--seed",
            "9",
        ]);
        let config = args.dashboard_config();

        assert_eq!(config.paths.network_graph, Some(PathBuf::from("graph.json")));
        assert!(config.paths.campaigns.is_none());
        assert!(config.force.damping < 1.0);
        assert_eq!(config.force.attraction, 0.01);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn defaults_match_force_defaults() {
        let config = Args::parse_from(["sentinelx"]).dashboard_config();
        assert_eq!(config.force, ForceConfig::default());
    }
}
