use crate::sim::{CurrencyNode, ForceLayout, LayoutConfig};

use super::super::ViewModel;

impl ViewModel {
    fn graph_currencies(&self) -> (Vec<CurrencyNode>, Vec<(String, String)>) {
        let base = self.table.base.clone();
        let mut currencies = vec![CurrencyNode {
            code: base.clone(),
            rate: 1.0,
            is_base: true,
        }];
        let mut edges = Vec::new();

        let mut satellites = self.shown.clone();
        if !satellites.iter().any(|code| code == &self.requested) {
            satellites.push(self.requested.clone());
        }

        for code in satellites {
            if code == base {
                continue;
            }
            let Some(rate) = self.table.rate(&code) else {
                continue;
            };

            edges.push((base.clone(), code.clone()));
            currencies.push(CurrencyNode {
                code,
                rate,
                is_base: false,
            });
        }

        (currencies, edges)
    }

    pub(in crate::app) fn rebuild_layout(&mut self) {
        let (currencies, edges) = self.graph_currencies();
        let config = LayoutConfig {
            link_distance: self.link_distance,
            charge_strength: self.charge_strength,
            collide: self.collide,
            ..LayoutConfig::default()
        };

        match ForceLayout::new(currencies, &edges, config) {
            Ok(layout) => {
                self.layout = Some(layout);
                self.layout_error = None;
            }
            Err(error) => {
                log::warn!("could not build the rate graph: {error}");
                self.layout = None;
                self.layout_error = Some(error.to_string());
            }
        }

        self.drag_node = None;
        self.graph_dirty = false;
    }

    pub(in crate::app) fn graph_counts(&self) -> (usize, usize) {
        self.layout
            .as_ref()
            .map(|layout| (layout.nodes().len(), layout.edges().len()))
            .unwrap_or((0, 0))
    }
}
