use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, pos2, vec2};

use crate::rates::{date_for_day, load_history, synthetic_history};
use crate::util::format_rate;

use super::ViewModel;
use super::render_utils::LINE_COLOR;

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 24.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 40.0;
const SYNTHETIC_DAYS: u64 = 365;

impl ViewModel {
    /// Rebuilds the cached history when the selected currency changed.
    /// A history file from the command line only covers the currency it was
    /// requested for; every other currency gets the synthetic series.
    fn ensure_history(&mut self) {
        if self
            .history
            .as_ref()
            .is_some_and(|history| history.currency == self.requested)
        {
            return;
        }

        let loaded = if self.requested == self.history_currency {
            self.history_path.as_deref().and_then(|path| {
                match load_history(path, &self.requested) {
                    Ok(history) => Some(history),
                    Err(error) => {
                        log::warn!("{error:#}; falling back to synthetic history");
                        None
                    }
                }
            })
        } else {
            None
        };

        self.history = Some(loaded.unwrap_or_else(|| {
            let anchor = self.table.rate(&self.requested).unwrap_or(1.0);
            let end = chrono::Local::now().date_naive();
            synthetic_history(&self.requested, anchor, end, SYNTHETIC_DAYS)
        }));
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        self.ensure_history();

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

        let base = self.table.base.clone();
        let Some(history) = self.history.as_ref() else {
            return;
        };
        let Some((first_day, last_day)) = history.day_span() else {
            ui.label("No history samples for the selected currency.");
            return;
        };

        let plot = Rect::from_min_max(
            pos2(rect.left() + MARGIN_LEFT, rect.top() + MARGIN_TOP),
            pos2(rect.right() - MARGIN_RIGHT, rect.bottom() - MARGIN_BOTTOM),
        );
        let day_span = (last_day - first_day).max(1.0);
        let max_rate = history.max_rate() * 1.1;
        if max_rate <= 0.0 {
            return;
        }

        let x_for_day =
            |day: f64| plot.left() + (((day - first_day) / day_span) as f32) * plot.width();
        let y_for_rate = |rate: f32| plot.bottom() - (rate / max_rate) * plot.height();
        let day_for_x = |x: f32| first_day + (((x - plot.left()) / plot.width()) as f64) * day_span;

        let grid_stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
        let axis_stroke = Stroke::new(1.0, Color32::from_gray(140));
        let label_font = FontId::proportional(11.0);
        let label_color = Color32::from_gray(180);

        painter.line_segment(
            [plot.left_top(), plot.left_bottom()],
            axis_stroke,
        );
        painter.line_segment(
            [plot.left_bottom(), plot.right_bottom()],
            axis_stroke,
        );

        for tick in 0..=4 {
            let fraction = tick as f32 / 4.0;

            let y = plot.bottom() - fraction * plot.height();
            painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid_stroke);
            painter.text(
                pos2(plot.left() - 6.0, y),
                Align2::RIGHT_CENTER,
                format_axis_rate(fraction * max_rate),
                label_font.clone(),
                label_color,
            );

            let day = first_day + (fraction as f64) * day_span;
            let x = x_for_day(day);
            painter.line_segment([pos2(x, plot.bottom()), pos2(x, plot.bottom() + 4.0)], axis_stroke);
            if let Some(date) = date_for_day(day) {
                painter.text(
                    pos2(x, plot.bottom() + 8.0),
                    Align2::CENTER_TOP,
                    date.format("%b %d").to_string(),
                    label_font.clone(),
                    label_color,
                );
            }
        }

        let points = history
            .samples
            .iter()
            .map(|sample| pos2(x_for_day(sample.day), y_for_rate(sample.rate)))
            .collect::<Vec<Pos2>>();
        if points.len() > 1 {
            painter.add(egui::Shape::line(
                points.clone(),
                Stroke::new(2.0, LINE_COLOR),
            ));
        }
        for point in &points {
            painter.circle_filled(*point, 1.5, LINE_COLOR);
        }

        painter.text(
            pos2(plot.center().x, rect.top() + 8.0),
            Align2::CENTER_TOP,
            format!("{base} to {} exchange rate", history.currency),
            FontId::proportional(15.0),
            Color32::from_gray(230),
        );

        let hover = response
            .hover_pos()
            .filter(|pos| plot.contains(*pos))
            .and_then(|pos| history.nearest(day_for_x(pos.x)).ok());
        if let Some(sample) = hover {
            let x = x_for_day(sample.day);
            painter.line_segment(
                [pos2(x, plot.top()), pos2(x, plot.bottom())],
                Stroke::new(1.0, Color32::from_gray(200)),
            );
            painter.circle_filled(pos2(x, y_for_rate(sample.rate)), 4.0, Color32::WHITE);

            let date_label = date_for_day(sample.day)
                .map(|date| date.to_string())
                .unwrap_or_else(|| format!("day {}", sample.day));
            painter.text(
                plot.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{date_label}  |  1 {base} = {} {}",
                    format_rate(sample.rate),
                    history.currency
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}

fn format_axis_rate(rate: f32) -> String {
    if rate >= 100.0 {
        format!("{rate:.0}")
    } else {
        format!("{rate:.2}")
    }
}
