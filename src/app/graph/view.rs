use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::util::format_rate;

use super::super::ViewModel;
use super::super::render_utils::{
    BASE_COLOR, REQUESTED_COLOR, SATELLITE_COLOR, blend_color, draw_background, screen_to_world,
    world_to_screen,
};

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_layout();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let pan = self.pan;
        let zoom = self.zoom;
        let base = self.table.base.clone();
        let requested = self.requested.clone();

        if let Some(error) = &self.layout_error {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("Rate graph unavailable: {error}"),
                FontId::proportional(13.0),
                Color32::from_rgb(240, 140, 130),
            );
            return;
        }
        let Some(layout) = self.layout.as_mut() else {
            ui.label("No currencies matched the current rate table.");
            return;
        };

        let stepping = layout.step();
        if stepping || response.dragged() {
            ui.ctx().request_repaint();
        }

        let screen_positions = layout
            .nodes()
            .iter()
            .map(|node| world_to_screen(rect, pan, zoom, node.position))
            .collect::<Vec<_>>();
        let screen_radii = layout
            .nodes()
            .iter()
            .map(|node| (node.radius * zoom).clamp(2.5, 70.0))
            .collect::<Vec<_>>();

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered =
            pointer.and_then(|pos| Self::hovered_node(pos, &screen_positions, &screen_radii));

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            let code = layout.nodes()[index].code.clone();
            layout.drag_start(&code);
            self.drag_node = Some(code);
        }
        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(code) = self.drag_node.clone()
            && let Some(pointer_pos) = response.interact_pointer_pos()
        {
            layout.drag_move(&code, screen_to_world(rect, pan, zoom, pointer_pos));
        }
        if response.drag_stopped_by(egui::PointerButton::Primary)
            && let Some(code) = self.drag_node.take()
        {
            layout.drag_end(&code);
        }

        for &(source, target) in layout.edges() {
            painter.line_segment(
                [screen_positions[source], screen_positions[target]],
                Stroke::new(1.5, Color32::from_rgba_unmultiplied(153, 153, 153, 153)),
            );
        }

        for (index, node) in layout.nodes().iter().enumerate() {
            let position = screen_positions[index];
            let radius = screen_radii[index];

            let fill = if node.is_base {
                BASE_COLOR
            } else if node.code == requested {
                REQUESTED_COLOR
            } else {
                SATELLITE_COLOR
            };
            let fill = if hovered == Some(index) {
                blend_color(fill, Color32::WHITE, 0.25)
            } else {
                fill
            };

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            painter.text(
                position + vec2(radius + 4.0, 0.0),
                Align2::LEFT_CENTER,
                &node.code,
                FontId::proportional(12.0),
                Color32::from_gray(225),
            );
        }

        if let Some(index) = hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let node = &layout.nodes()[index];
            let readout = if node.is_base {
                format!("{}  |  base currency", node.code)
            } else {
                format!(
                    "{}  |  1 {base} = {} {}",
                    node.code,
                    format_rate(node.rate),
                    node.code
                )
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                readout,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
