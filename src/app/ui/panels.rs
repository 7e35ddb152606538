use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::rates::{DEFAULT_SATELLITES, RateTable};

use super::super::{ChartMode, DataSources, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(table: RateTable, sources: &DataSources) -> Self {
        let shown = DEFAULT_SATELLITES
            .iter()
            .map(|&code| code.to_owned())
            .filter(|code| table.rate(code).is_some())
            .collect::<Vec<_>>();

        Self {
            requested: sources.requested.clone(),
            history_path: sources.history_path.clone(),
            history_currency: sources.requested.clone(),
            table,
            mode: ChartMode::ForceGraph,
            shown,
            usd_amount: 1.0,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            link_distance: 100.0,
            charge_strength: -350.0,
            collide: true,
            graph_dirty: true,
            layout: None,
            layout_error: None,
            drag_node: None,
            history: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        let (node_count, edge_count) = self.graph_counts();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("fx-orbit");
                    ui.separator();
                    ui.label(format!("base: {}", self.table.base));
                    ui.label(format!("rates: {}", self.table.rate_count()));
                    if self.mode == ChartMode::ForceGraph {
                        ui.label(format!("nodes: {node_count}"));
                        ui.label(format!("edges: {edge_count}"));
                        if let Some(layout) = &self.layout
                            && !layout.is_settled()
                        {
                            ui.label(format!("energy: {:.3}", layout.alpha()));
                        }
                    }
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload rates"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("selected: {}", self.requested));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.mode {
            ChartMode::ForceGraph => self.draw_graph(ui),
            ChartMode::History => self.draw_chart(ui),
        });
    }
}
