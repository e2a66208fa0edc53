use egui_plot::{Corner, Legend, Line, LineStyle as PlotLineStyle, MarkerShape, Plot, Points};
use svg_export::LegendAnchor;

use crate::app::common::color32;
use crate::app::components::{LineStyle, Marker};

use super::logic::{PlotPlan, DEFAULT_MARKER_SIZE};

impl super::Plotter {
    /// Draw the plan at its figure size. Series are painted in z-order.
    pub fn render(&mut self, plan: &PlotPlan, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| ui.heading(&plan.title));

        Plot::new(("plot", self.generation))
            .width(plan.width_px as f32)
            .height(plan.height_px as f32)
            .x_axis_label(plan.x_label.clone())
            .y_axis_label(plan.y_label.clone())
            .legend(Legend::default().position(legend_corner(plan.legend)))
            .show(ui, |plot_ui| {
                for s in plan.draw_order() {
                    let Some(color) = color32(&s.style.color, s.style.alpha) else {
                        log::warn!("cannot draw {:?} with colour {}", s.file, s.style.color);
                        continue;
                    };
                    let points: Vec<[f64; 2]> = s
                        .points
                        .iter()
                        .filter(|[x, y]| x.is_finite() && y.is_finite())
                        .copied()
                        .collect();
                    if let Some(ls) = s.style.linestyle {
                        plot_ui.line(
                            Line::new(points.clone())
                                .color(color)
                                .width(plan.pt_to_px(s.style.linewidth) as f32)
                                .style(line_style(ls))
                                .name(&s.label),
                        );
                    }
                    if let Some(marker) = s.style.marker {
                        let size = s.style.markersize.unwrap_or(DEFAULT_MARKER_SIZE);
                        plot_ui.points(
                            Points::new(points)
                                .shape(marker_shape(marker))
                                .radius(plan.pt_to_px(size) as f32 / 2.0)
                                .filled(true)
                                .color(color)
                                .name(&s.label),
                        );
                    }
                }
            });
    }
}

/// egui_plot only places legends in corners; pick the closest one.
fn legend_corner(anchor: LegendAnchor) -> Corner {
    use LegendAnchor as L;
    match anchor {
        L::Best | L::UpperRight | L::Right | L::CenterRight | L::Center => Corner::RightTop,
        L::UpperLeft | L::CenterLeft | L::UpperCenter => Corner::LeftTop,
        L::LowerLeft | L::LowerCenter => Corner::LeftBottom,
        L::LowerRight => Corner::RightBottom,
    }
}

fn line_style(ls: LineStyle) -> PlotLineStyle {
    match ls {
        LineStyle::Solid => PlotLineStyle::Solid,
        LineStyle::Dashed => PlotLineStyle::dashed_loose(),
        // No dash-dot pattern on screen; the SVG export has one.
        LineStyle::DashDot => PlotLineStyle::dashed_dense(),
        LineStyle::Dotted => PlotLineStyle::dotted_dense(),
    }
}

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Square => MarkerShape::Square,
        Marker::TriangleUp => MarkerShape::Up,
        Marker::TriangleDown => MarkerShape::Down,
        Marker::Diamond => MarkerShape::Diamond,
        Marker::Cross => MarkerShape::Cross,
        Marker::Plus => MarkerShape::Plus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_anchor_has_a_corner() {
        assert!(matches!(legend_corner(LegendAnchor::Best), Corner::RightTop));
        assert!(matches!(legend_corner(LegendAnchor::LowerRight), Corner::RightBottom));
        assert!(matches!(legend_corner(LegendAnchor::CenterLeft), Corner::LeftTop));
        assert!(matches!(legend_corner(LegendAnchor::LowerCenter), Corner::LeftBottom));
    }
}
