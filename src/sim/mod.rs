mod forces;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use thiserror::Error;

use crate::util::stable_pair;
use forces::{
    accumulate_center_force, accumulate_charge_force, accumulate_link_force, resolve_collisions,
};

pub use forces::COLLIDE_MARGIN;

pub const BASE_RADIUS: f32 = 12.0;
const SATELLITE_RADIUS_MIN: f32 = 6.0;
const SATELLITE_RADIUS_MAX: f32 = 25.0;

/// Input node for the layout: a currency and its USD rate.
#[derive(Clone, Debug)]
pub struct CurrencyNode {
    pub code: String,
    pub rate: f32,
    pub is_base: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("edge references unknown currency {0}")]
    UnknownEdgeEndpoint(String),
    #[error("duplicate currency {0}")]
    DuplicateCode(String),
    #[error("currency {code} has non-positive rate {rate}")]
    NonPositiveRate { code: String, rate: f32 },
    #[error("layout requires at least one node")]
    EmptyGraph,
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub center: Vec2,
    pub center_strength: f32,
    pub collide: bool,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub reheat_alpha: f32,
    pub velocity_retention: f32,
    pub max_speed: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            link_strength: 0.1,
            charge_strength: -350.0,
            center: Vec2::ZERO,
            center_strength: 0.1,
            collide: true,
            alpha_decay: 0.99,
            alpha_min: 1e-3,
            reheat_alpha: 0.3,
            velocity_retention: 0.6,
            max_speed: 40.0,
        }
    }
}

#[derive(Debug)]
pub struct LayoutNode {
    pub code: String,
    pub rate: f32,
    pub is_base: bool,
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
}

/// Iterative force-directed layout over a currency graph.
///
/// Energy ("alpha") starts at 1 and decays geometrically each step; forces
/// are scaled by the current alpha, so the layout settles once alpha falls
/// below `alpha_min`. Setting a pin where none existed re-energizes a
/// settled layout; a pinned node tracks its pin exactly until released.
#[derive(Debug)]
pub struct ForceLayout {
    nodes: Vec<LayoutNode>,
    edges: Vec<(usize, usize)>,
    index_by_code: HashMap<String, usize>,
    config: LayoutConfig,
    alpha: f32,
}

impl ForceLayout {
    pub fn new(
        currencies: Vec<CurrencyNode>,
        edges: &[(String, String)],
        config: LayoutConfig,
    ) -> Result<Self, ConfigError> {
        if currencies.is_empty() {
            return Err(ConfigError::EmptyGraph);
        }

        let mut index_by_code = HashMap::with_capacity(currencies.len());
        for (index, currency) in currencies.iter().enumerate() {
            if !(currency.rate > 0.0) || !currency.rate.is_finite() {
                return Err(ConfigError::NonPositiveRate {
                    code: currency.code.clone(),
                    rate: currency.rate,
                });
            }
            if index_by_code.insert(currency.code.clone(), index).is_some() {
                return Err(ConfigError::DuplicateCode(currency.code.clone()));
            }
        }

        let edges = edges
            .iter()
            .map(|(source, target)| {
                let source = *index_by_code
                    .get(source)
                    .ok_or_else(|| ConfigError::UnknownEdgeEndpoint(source.clone()))?;
                let target = *index_by_code
                    .get(target)
                    .ok_or_else(|| ConfigError::UnknownEdgeEndpoint(target.clone()))?;
                Ok((source, target))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let (min_rate, max_rate) = currencies
            .iter()
            .filter(|currency| !currency.is_base)
            .fold((f32::INFINITY, 0.0_f32), |(min, max), currency| {
                (min.min(currency.rate), max.max(currency.rate))
            });

        let satellite_count = currencies
            .iter()
            .filter(|currency| !currency.is_base)
            .count()
            .max(1);

        let mut satellite_slot = 0usize;
        let nodes = currencies
            .into_iter()
            .map(|currency| {
                let radius = if currency.is_base {
                    BASE_RADIUS
                } else {
                    satellite_radius(currency.rate, min_rate, max_rate)
                };

                let position = if currency.is_base {
                    Vec2::ZERO
                } else {
                    let angle = (satellite_slot as f32 / satellite_count as f32)
                        * std::f32::consts::TAU;
                    satellite_slot += 1;
                    let (jx, jy) = stable_pair(&currency.code);
                    vec2(angle.cos(), angle.sin()) * config.link_distance
                        + vec2(jx * 12.0, jy * 12.0)
                };

                LayoutNode {
                    code: currency.code,
                    rate: currency.rate,
                    is_base: currency.is_base,
                    radius,
                    position,
                    velocity: Vec2::ZERO,
                    pin: None,
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            nodes,
            edges,
            index_by_code,
            config,
            alpha: 1.0,
        })
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    /// Advances the simulation one tick. Returns false once settled; a
    /// settled tick does not touch any position.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }

        let alpha = self.alpha;
        let config = self.config;

        accumulate_link_force(
            &mut self.nodes,
            &self.edges,
            config.link_distance,
            config.link_strength,
            alpha,
        );
        accumulate_charge_force(&mut self.nodes, config.charge_strength, alpha);
        accumulate_center_force(&mut self.nodes, config.center, config.center_strength, alpha);

        let max_speed_sq = config.max_speed * config.max_speed;
        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut velocity = node.velocity * config.velocity_retention;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= config.max_speed / speed_sq.sqrt();
            }

            node.velocity = velocity;
            node.position += velocity;
        }

        if config.collide {
            resolve_collisions(&mut self.nodes);
        }

        self.alpha *= config.alpha_decay;
        true
    }

    pub fn drag_start(&mut self, code: &str) {
        if let Some(&index) = self.index_by_code.get(code) {
            let position = self.nodes[index].position;
            self.pin_node(index, position);
        }
    }

    pub fn drag_move(&mut self, code: &str, position: Vec2) {
        if let Some(&index) = self.index_by_code.get(code) {
            self.pin_node(index, position);
        }
    }

    pub fn drag_end(&mut self, code: &str) {
        if let Some(&index) = self.index_by_code.get(code) {
            self.nodes[index].pin = None;
        }
    }

    fn pin_node(&mut self, index: usize, position: Vec2) {
        let node = &mut self.nodes[index];
        if node.pin.is_none() {
            // A fresh pin re-energizes a settled layout.
            self.alpha = self.alpha.max(self.config.reheat_alpha);
        }
        node.pin = Some(position);
        node.position = position;
        node.velocity = Vec2::ZERO;
    }
}

fn normalize_log(rate: f32, min: f32, max: f32) -> f32 {
    let min = (min.max(f32::MIN_POSITIVE)) as f64;
    let max = (max.max(f32::MIN_POSITIVE)) as f64;
    let rate = (rate.max(f32::MIN_POSITIVE)) as f64;

    let denominator = max.ln() - min.ln();
    if denominator.abs() < f64::EPSILON {
        return 0.5;
    }

    ((rate.ln() - min.ln()) / denominator).clamp(0.0, 1.0) as f32
}

fn satellite_radius(rate: f32, min_rate: f32, max_rate: f32) -> f32 {
    SATELLITE_RADIUS_MIN
        + normalize_log(rate, min_rate, max_rate) * (SATELLITE_RADIUS_MAX - SATELLITE_RADIUS_MIN)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn star(rates: &[(&str, f32)]) -> (Vec<CurrencyNode>, Vec<(String, String)>) {
        let mut currencies = vec![CurrencyNode {
            code: "USD".to_owned(),
            rate: 1.0,
            is_base: true,
        }];
        let mut edges = Vec::new();
        for &(code, rate) in rates {
            currencies.push(CurrencyNode {
                code: code.to_owned(),
                rate,
                is_base: false,
            });
            edges.push(("USD".to_owned(), code.to_owned()));
        }
        (currencies, edges)
    }

    fn default_star() -> ForceLayout {
        let (currencies, edges) = star(&[
            ("JPY", 157.5),
            ("EUR", 0.93),
            ("GBP", 0.79),
            ("CAD", 1.37),
            ("CHF", 0.89),
            ("AUD", 1.5),
            ("CNY", 7.25),
            ("INR", 83.5),
            ("BRL", 5.42),
            ("MXN", 18.45),
        ]);
        ForceLayout::new(currencies, &edges, LayoutConfig::default()).unwrap()
    }

    fn run_to_settle(layout: &mut ForceLayout) {
        for _ in 0..10_000 {
            if !layout.step() {
                return;
            }
        }
        panic!("layout did not settle within 10k steps");
    }

    fn node<'a>(layout: &'a ForceLayout, code: &str) -> &'a LayoutNode {
        layout
            .nodes()
            .iter()
            .find(|node| node.code == code)
            .expect("node exists")
    }

    #[test]
    fn settles_and_stays_put() {
        let mut layout = default_star();
        run_to_settle(&mut layout);
        assert!(layout.is_settled());

        let frozen = layout
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        for _ in 0..10 {
            assert!(!layout.step());
        }
        for (node, position) in layout.nodes().iter().zip(frozen) {
            assert_eq!(node.position, position);
        }
    }

    #[test]
    fn no_overlap_after_settle() {
        let mut layout = default_star();
        run_to_settle(&mut layout);

        let nodes = layout.nodes();
        for from in 0..nodes.len() {
            for to in (from + 1)..nodes.len() {
                let distance = (nodes[from].position - nodes[to].position).length();
                let min_distance =
                    nodes[from].radius + nodes[to].radius + (COLLIDE_MARGIN * 2.0);
                assert!(
                    distance >= min_distance - 1e-3,
                    "{} and {} overlap: {distance} < {min_distance}",
                    nodes[from].code,
                    nodes[to].code
                );
            }
        }
    }

    #[test]
    fn pinned_node_tracks_the_pin_exactly() {
        let mut layout = default_star();
        let target = vec2(42.0, -17.0);

        layout.drag_start("JPY");
        layout.drag_move("JPY", target);
        for _ in 0..50 {
            layout.step();
            assert_eq!(node(&layout, "JPY").position, target);
        }

        layout.drag_end("JPY");
        assert!(node(&layout, "JPY").pin.is_none());
    }

    #[test]
    fn fresh_pin_reenergizes_a_settled_layout() {
        let mut layout = default_star();
        run_to_settle(&mut layout);
        assert!(!layout.step());

        layout.drag_start("EUR");
        assert!(layout.alpha() >= 0.3);
        assert!(layout.step());

        // Moving an existing pin must not reheat again.
        let alpha_before = layout.alpha();
        layout.drag_move("EUR", vec2(5.0, 5.0));
        assert_eq!(layout.alpha(), alpha_before);
    }

    #[test]
    fn single_satellite_degenerates_cleanly() {
        let (currencies, edges) = star(&[("EUR", 0.93)]);
        let mut layout = ForceLayout::new(currencies, &edges, LayoutConfig::default()).unwrap();
        run_to_settle(&mut layout);

        let distance =
            (node(&layout, "USD").position - node(&layout, "EUR").position).length();
        assert!(distance > 1.0, "nodes collapsed to {distance}");
    }

    #[test]
    fn zero_edge_node_is_still_pushed_clear() {
        let (mut currencies, edges) = star(&[("EUR", 0.93)]);
        currencies.push(CurrencyNode {
            code: "CHF".to_owned(),
            rate: 0.89,
            is_base: false,
        });

        let mut layout = ForceLayout::new(currencies, &edges, LayoutConfig::default()).unwrap();
        run_to_settle(&mut layout);

        let nodes = layout.nodes();
        for from in 0..nodes.len() {
            for to in (from + 1)..nodes.len() {
                let distance = (nodes[from].position - nodes[to].position).length();
                let min_distance =
                    nodes[from].radius + nodes[to].radius + (COLLIDE_MARGIN * 2.0);
                assert!(distance >= min_distance - 1e-3);
            }
        }
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let (currencies, mut edges) = star(&[("EUR", 0.93)]);
        edges.push(("USD".to_owned(), "XYZ".to_owned()));

        let error = ForceLayout::new(currencies, &edges, LayoutConfig::default()).unwrap_err();
        assert!(matches!(error, ConfigError::UnknownEdgeEndpoint(code) if code == "XYZ"));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        for bad in [0.0, -5.0, f32::NAN] {
            let (currencies, edges) = star(&[("EUR", bad)]);
            let error =
                ForceLayout::new(currencies, &edges, LayoutConfig::default()).unwrap_err();
            assert!(matches!(error, ConfigError::NonPositiveRate { code, .. } if code == "EUR"));
        }
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let (mut currencies, edges) = star(&[("EUR", 0.93)]);
        currencies.push(CurrencyNode {
            code: "EUR".to_owned(),
            rate: 1.1,
            is_base: false,
        });

        let error = ForceLayout::new(currencies, &edges, LayoutConfig::default()).unwrap_err();
        assert!(matches!(error, ConfigError::DuplicateCode(code) if code == "EUR"));
    }

    #[test]
    fn empty_graph_is_rejected() {
        let error = ForceLayout::new(Vec::new(), &[], LayoutConfig::default()).unwrap_err();
        assert!(matches!(error, ConfigError::EmptyGraph));
    }

    #[test]
    fn satellite_radius_spans_the_configured_range() {
        assert_abs_diff_eq!(satellite_radius(0.79, 0.79, 1380.5), 6.0, epsilon = 1e-4);
        assert_abs_diff_eq!(satellite_radius(1380.5, 0.79, 1380.5), 25.0, epsilon = 1e-4);
        // A flat domain maps to the middle of the range.
        assert_abs_diff_eq!(satellite_radius(1.0, 1.0, 1.0), 15.5, epsilon = 1e-4);

        let mid = satellite_radius(33.0, 0.79, 1380.5);
        assert!(mid > 6.0 && mid < 25.0);
    }
}
