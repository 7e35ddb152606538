use eframe::egui::{self, Align, Layout, Slider, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::format_rate;

use super::super::{ChartMode, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Rate Explorer");
        ui.separator();
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.mode, ChartMode::ForceGraph, "Force graph")
                .on_hover_text("Radial graph of the base currency and its satellites.");
            ui.selectable_value(&mut self.mode, ChartMode::History, "History")
                .on_hover_text("One-year rate history of the selected currency.");
        });

        ui.separator();

        ui.label("Currency");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy-search currency codes, then click one to select it.");
        self.draw_currency_rows(ui);

        ui.separator();

        ui.label("Convert from USD");
        ui.horizontal(|ui| {
            ui.add(
                egui::DragValue::new(&mut self.usd_amount)
                    .speed(1.0)
                    .range(0.0..=1_000_000_000.0)
                    .prefix("$ "),
            );
            ui.label(format!("to {}", self.requested));
        });
        ui.label(self.conversion_text());

        ui.separator();

        ui.collapsing("Layout tuning", |ui| {
            let link_slider = ui
                .add(
                    Slider::new(&mut self.link_distance, 40.0..=200.0)
                        .text("Link distance")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Rest length of the spoke between the base and each satellite.");

            let charge_slider = ui
                .add(
                    Slider::new(&mut self.charge_strength, -600.0..=-50.0)
                        .text("Charge")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How strongly nodes push away from each other.");

            let collide_box = ui
                .checkbox(&mut self.collide, "Collision separation")
                .on_hover_text("Keep node circles from overlapping.");

            if link_slider.changed() || charge_slider.changed() || collide_box.changed() {
                self.graph_dirty = true;
            }
        });
    }

    fn draw_currency_rows(&mut self, ui: &mut Ui) {
        let query = self.search.trim().to_owned();
        let matcher = SkimMatcherV2::default();

        let mut rows = self
            .table
            .rates
            .iter()
            .filter_map(|(code, &rate)| {
                let score = if query.is_empty() {
                    0
                } else {
                    matcher.fuzzy_match(code, &query).or_else(|| {
                        matcher.fuzzy_match(code, &query.to_ascii_uppercase())
                    })?
                };
                Some((code.clone(), rate, score))
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

        if rows.is_empty() {
            ui.label("No currency matches the search.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("currency_rows")
            .max_height(220.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (code, rate, _score) in &rows {
                    let is_selected = self.requested == *code;
                    let row_response = ui
                        .horizontal(|ui| {
                            let row = ui.selectable_label(is_selected, code.as_str()).clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(format_rate(*rate));
                            });
                            row
                        })
                        .inner;

                    if row_response {
                        clicked = Some(code.clone());
                    }
                }
            });

        if let Some(code) = clicked {
            self.select_currency(code);
        }
    }

    fn select_currency(&mut self, code: String) {
        if self.table.rate(&code).is_none() || code == self.table.base {
            return;
        }

        if !self.shown.iter().any(|shown| shown == &code) {
            self.shown.push(code.clone());
        }
        if self.requested != code {
            self.requested = code;
            self.graph_dirty = true;
        }
    }

    fn conversion_text(&self) -> String {
        if self.usd_amount <= 0.0 {
            return "Please enter a valid USD amount.".to_owned();
        }

        match self.table.rate(&self.requested) {
            Some(rate) => format!(
                "{} {} is equal to {:.2} {}.",
                self.usd_amount, self.table.base, self.usd_amount * rate, self.requested
            ),
            None => "Invalid currency code.".to_owned(),
        }
    }
}
