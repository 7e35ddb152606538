use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::rates::{RateHistory, RateTable, load_rate_table};
use crate::sim::ForceLayout;

mod chart;
mod graph;
mod render_utils;
mod ui;

#[derive(Clone)]
pub struct DataSources {
    pub rates_path: Option<String>,
    pub history_path: Option<String>,
    pub requested: String,
}

pub struct FxOrbitApp {
    sources: DataSources,
    state: AppState,
    reload_rx: Option<Receiver<Result<RateTable, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<RateTable, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChartMode {
    ForceGraph,
    History,
}

struct ViewModel {
    table: RateTable,
    mode: ChartMode,
    requested: String,
    shown: Vec<String>,
    usd_amount: f32,
    search: String,
    pan: Vec2,
    zoom: f32,
    link_distance: f32,
    charge_strength: f32,
    collide: bool,
    graph_dirty: bool,
    layout: Option<ForceLayout>,
    layout_error: Option<String>,
    drag_node: Option<String>,
    history: Option<RateHistory>,
    history_path: Option<String>,
    history_currency: String,
}

impl FxOrbitApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, sources: DataSources) -> Self {
        let state = Self::start_load(sources.clone());
        Self {
            sources,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(sources: DataSources) -> Receiver<Result<RateTable, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_rate_table(sources.rates_path.as_deref())
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(sources: DataSources) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(sources),
        }
    }
}

impl eframe::App for FxOrbitApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(table) => {
                            AppState::Ready(Box::new(ViewModel::new(table, &self.sources)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading exchange rates...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load exchange rates");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.sources.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.sources.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(table) => AppState::Ready(Box::new(ViewModel::new(
                                    table,
                                    &self.sources,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background rate loader disconnected".to_owned(),
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
