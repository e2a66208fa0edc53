use std::fmt::Write;

use crate::svg::{self, opts, Params, Tag};

/// The basic plotting primitive. Can be converted into a Vec of `svg::Tag`.
trait Element {
    /// Convert `Element` into a Vec of `svg::Tag`.
    ///
    /// All elements are placed relative to an axis which itself is sized and
    /// placed relative to a figure. For correct placement, the axis and figure
    /// thus have to be passed into the function.
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>>;
}

type Tags = Vec<Box<dyn svg::RenderTag>>;

// Approximate pixel metrics of 10pt text, used to size the legend box.
const LEGEND_CHAR_WIDTH: f64 = 7.0;
const LEGEND_ENTRY_HEIGHT: f64 = 18.0;
const LEGEND_SAMPLE_WIDTH: f64 = 30.0;
const LEGEND_PADDING: f64 = 6.0;

// ----------------------------------------------------------------------------
//
//
// Figure
//
//
// ----------------------------------------------------------------------------

/// The Figure defines the overall size of a plot and holds the axes.
pub struct Figure {
    width: u64,
    height: u64,
    title: String,
    axes: Vec<Axis>,
}

impl Figure {
    pub fn empty(width: u64, height: u64) -> Self {
        Self {
            width,
            height,
            title: String::new(),
            axes: Vec::new(),
        }
    }

    pub fn new(width: u64, height: u64) -> Self {
        let mut fig = Self::empty(width, height);
        fig.add_axis(Axis::default());
        fig
    }

    pub fn with_title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.title);
        self
    }

    pub fn add_axis(&mut self, ax: Axis) {
        self.axes.push(ax);
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Render this `Figure` to raw SVG markup.
    pub fn render(&self) -> String {
        let mut root = Tag::<svg::Svg>::new(self.width, self.height, None);
        root.add_child(Tag::<svg::Rect>::new(
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
            opts(&[("fill", "white")]),
        ));
        if !self.title.is_empty() {
            let top = self
                .axes
                .iter()
                .map(|ax| ax.v)
                .reduce(f64::min)
                .unwrap_or(0.1);
            root.add_child(Tag::<svg::Text>::new(
                self.width as f64 * 0.5,
                self.height as f64 * top * 0.7,
                0.0,
                &self.title,
                opts(&[("text-anchor", "middle"), ("font-size", "12pt")]),
            ));
        }
        for ax in self.axes.iter() {
            root.add_children(ax.to_tags(self));
        }
        log::debug!(
            "rendering {}x{} figure with {} axes",
            self.width,
            self.height,
            self.axes.len()
        );
        crate::svg::render(&root)
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

// ----------------------------------------------------------------------------
//
//
// Legend placement
//
//
// ----------------------------------------------------------------------------

/// Where the legend is anchored inside the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegendAnchor {
    /// The anchor overlapping the fewest data points.
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl LegendAnchor {
    pub const ALL: [LegendAnchor; 11] = [
        LegendAnchor::Best,
        LegendAnchor::UpperRight,
        LegendAnchor::UpperLeft,
        LegendAnchor::LowerLeft,
        LegendAnchor::LowerRight,
        LegendAnchor::Right,
        LegendAnchor::CenterLeft,
        LegendAnchor::CenterRight,
        LegendAnchor::LowerCenter,
        LegendAnchor::UpperCenter,
        LegendAnchor::Center,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LegendAnchor::Best => "best",
            LegendAnchor::UpperRight => "upper right",
            LegendAnchor::UpperLeft => "upper left",
            LegendAnchor::LowerLeft => "lower left",
            LegendAnchor::LowerRight => "lower right",
            LegendAnchor::Right => "right",
            LegendAnchor::CenterLeft => "center left",
            LegendAnchor::CenterRight => "center right",
            LegendAnchor::LowerCenter => "lower center",
            LegendAnchor::UpperCenter => "upper center",
            LegendAnchor::Center => "center",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.label() == label.trim())
    }

    /// Upper left corner (u from the left, v from the bottom, both normalized
    /// to the axis) of a legend box of the given normalized size.
    ///
    /// `Best` is placed like `UpperRight`; resolve it with [`Axis`] first.
    fn corner(&self, w: f64, h: f64, pad_u: f64, pad_v: f64) -> (f64, f64) {
        let left = pad_u;
        let right = 1.0 - pad_u - w;
        let hcenter = 0.5 - w / 2.0;
        let top = 1.0 - pad_v;
        let bottom = pad_v + h;
        let vcenter = 0.5 + h / 2.0;
        use LegendAnchor as L;
        match self {
            L::Best | L::UpperRight => (right, top),
            L::UpperLeft => (left, top),
            L::LowerLeft => (left, bottom),
            L::LowerRight => (right, bottom),
            L::Right | L::CenterRight => (right, vcenter),
            L::CenterLeft => (left, vcenter),
            L::LowerCenter => (hcenter, bottom),
            L::UpperCenter => (hcenter, top),
            L::Center => (hcenter, vcenter),
        }
    }
}

impl std::fmt::Display for LegendAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ----------------------------------------------------------------------------
//
//
// Axis
//
//
// ----------------------------------------------------------------------------

/// The container for plots and other elements.
pub struct Axis {
    legend: Option<LegendAnchor>,
    draw_xaxis: bool,
    draw_yaxis: bool,
    elements: Vec<Text>,
    xlabel: String,
    ylabel: String,
    height: f64,
    limits: [f64; 4],
    plots: Vec<LinePlot>,
    style: svg::Params,
    pub ticks: Ticks,
    /// u coordinate for placement in Figure, normalized to [0, 1]
    u: f64,
    /// v coordinate for placement in Figure, normalized to [0, 1]
    v: f64,
    width: f64,
}

impl Axis {
    pub fn new(u: f64, v: f64, width: f64, height: f64) -> Self {
        Axis {
            u,
            v,
            width,
            height,
            limits: [0.0, 1.0, 0.0, 1.0],
            ticks: Default::default(),
            legend: None,
            draw_xaxis: true,
            draw_yaxis: true,
            plots: Vec::new(),
            elements: Vec::new(),
            style: element_opts(&[("fill", "none"), ("stroke", "black")]),
            xlabel: String::new(),
            ylabel: String::new(),
        }
    }

    pub fn xlim(&mut self, xmin: f64, xmax: f64) {
        self.limits[0] = xmin;
        self.limits[1] = xmax;
    }

    pub fn ylim(&mut self, ymin: f64, ymax: f64) {
        self.limits[2] = ymin;
        self.limits[3] = ymax;
    }

    pub fn limits(&self) -> [f64; 4] {
        self.limits
    }

    pub fn add_line(&mut self, line: LinePlot) {
        self.plots.push(line);
    }

    pub fn plots(&self) -> &[LinePlot] {
        &self.plots
    }

    pub fn add_label(&mut self, text: &str, u: f64, v: f64) {
        self.elements.push(Text {
            text: text.to_owned(),
            u,
            v,
            angle: 0.0,
            style: Params::new(),
        });
    }

    pub fn with_xlim(mut self, xmin: f64, xmax: f64) -> Self {
        self.xlim(xmin, xmax);
        self.autoticks();
        self
    }

    pub fn with_xlabel(mut self, text: &str) -> Self {
        text.clone_into(&mut self.xlabel);
        self
    }

    pub fn with_ylim(mut self, ymin: f64, ymax: f64) -> Self {
        self.ylim(ymin, ymax);
        self.autoticks();
        self
    }

    pub fn with_ylabel(mut self, text: &str) -> Self {
        text.clone_into(&mut self.ylabel);
        self
    }

    pub fn draw_xaxis(mut self, should_draw: bool) -> Self {
        self.draw_xaxis = should_draw;
        self
    }

    pub fn draw_yaxis(mut self, should_draw: bool) -> Self {
        self.draw_yaxis = should_draw;
        self
    }

    pub fn with_x_minor_ticks(mut self, num: usize) -> Self {
        self.ticks.x_num_minor = num;
        self
    }

    pub fn with_y_minor_ticks(mut self, num: usize) -> Self {
        self.ticks.y_num_minor = num;
        self
    }

    pub fn with_legend(mut self, anchor: LegendAnchor) -> Self {
        self.legend = Some(anchor);
        self
    }

    pub fn with_lineplot(mut self, line: LinePlot) -> Self {
        self.add_line(line);
        self
    }

    pub fn insert_into(self, fig: &mut Figure) {
        fig.add_axis(self);
    }

    /// Fit the limits to the finite data of all plots, with a 5 % margin on
    /// every side, and recompute the ticks.
    pub fn autoscale(&mut self) {
        let finite_points = self.plots.iter().flat_map(|p| {
            p.xs.iter()
                .zip(p.ys.iter())
                .filter(|(x, y)| x.is_finite() && y.is_finite())
        });
        let mut bounds: Option<[f64; 4]> = None;
        for (&x, &y) in finite_points {
            bounds = Some(match bounds {
                Some([x0, x1, y0, y1]) => [x0.min(x), x1.max(x), y0.min(y), y1.max(y)],
                None => [x, x, y, y],
            });
        }
        let padded = |lo: f64, hi: f64| {
            if hi > lo {
                let margin = 0.05 * (hi - lo);
                (lo - margin, hi + margin)
            } else {
                (lo - 0.5, lo + 0.5)
            }
        };
        let [x0, x1, y0, y1] = bounds.unwrap_or([0.05, 0.95, 0.05, 0.95]);
        let (xmin, xmax) = padded(x0, x1);
        let (ymin, ymax) = padded(y0, y1);
        self.xlim(xmin, xmax);
        self.ylim(ymin, ymax);
        self.autoticks();
    }

    fn autoticks(&mut self) {
        let [xmin, xmax, ymin, ymax] = self.limits_ordered();

        // Choosing a multiplicator for the stepsize is done depending
        // on whether the figure is in portrait or landscape format.
        let (mx, my) = if self.width < self.height {
            (5.0, 2.5)
        } else {
            (2.5, 5.0)
        };

        self.ticks.xpos = tick_positions(xmin, xmax, mx);
        self.ticks.ypos = tick_positions(ymin, ymax, my);
    }

    fn transformations(
        &self,
        fig: &Figure,
    ) -> (
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
    ) {
        let (fw, fh) = (fig.width, fig.height);
        let (au, av, aw, ah) = (self.u, self.v, self.width, self.height);
        let [xmin, xmax, ymin, ymax] = self.limits;

        let x = move |u| fw as f64 * (au + u * aw);
        let y = move |v| fh as f64 * (av + v * ah);
        let u = move |x| (x - xmin) / (xmax - xmin);
        let v = move |y| 1.0 - (y - ymin) / (ymax - ymin);

        (x, y, u, v)
    }

    /// Plots in drawing order: ascending z-order, insertion order among equals.
    fn plots_by_zorder(&self) -> Vec<&LinePlot> {
        let mut plots: Vec<_> = self.plots.iter().collect();
        plots.sort_by(|a, b| a.zorder.total_cmp(&b.zorder));
        plots
    }

    /// Convert `Axis` into a Vec of `svg::Tag`.
    ///
    /// Since we only need the figure for placing `Axis`, `Axis` is not an
    /// `Element` and implements this function without using the trait.
    fn to_tags(&self, fig: &Figure) -> Tags {
        let (w, h) = (fig.width as f64, fig.height as f64);

        let mut children: Tags = Vec::new();
        children.push(Box::new(Tag::<svg::Rect>::new(
            w * self.u,
            h * self.v,
            self.width * w,
            self.height * h,
            Some(self.style.clone()),
        )));
        children.extend(self.elements.iter().flat_map(|el| el.to_tags(self, fig)));
        children.extend(
            self.plots_by_zorder()
                .into_iter()
                .flat_map(|el| el.to_tags(self, fig)),
        );

        // Add axis labels.
        if self.draw_xaxis && !self.xlabel.is_empty() {
            let xlabel = Text {
                text: self.xlabel.to_owned(),
                u: 0.5,
                v: -0.12,
                angle: 0.0,
                style: element_opts(&[("text-anchor", "middle")]),
            }
            .to_tags(self, fig);
            children.extend(xlabel);
        }
        if self.draw_yaxis && !self.ylabel.is_empty() {
            let y_tick_label_width = self.ticks.y_tick_label_character_width();
            let ylabel = Text {
                text: self.ylabel.to_owned(),
                u: -0.075 - 0.012 * y_tick_label_width as f64,
                v: 0.5,
                angle: 270.0,
                style: element_opts(&[("text-anchor", "middle")]),
            }
            .to_tags(self, fig);
            children.extend(ylabel);
        }

        if let Some(anchor) = self.legend {
            children.extend(self.legend_tags(anchor, fig));
        }
        children.extend(self.ticks.to_tags(self, fig));

        let mut group = Tag::<svg::Group>::new(None);
        group.add_children(children);
        vec![Box::new(group)]
    }

    /// Normalized (width, height) of the legend box and the padding to the
    /// axis frame, or `None` if no plot has a name.
    fn legend_size(&self, fig: &Figure) -> Option<(f64, f64, f64, f64)> {
        let names: Vec<_> = self
            .plots
            .iter()
            .filter(|p| !p.name.is_empty())
            .map(|p| p.name.chars().count())
            .collect();
        let longest = *names.iter().max()?;
        let ax_w = fig.width as f64 * self.width;
        let ax_h = fig.height as f64 * self.height;
        let w = (LEGEND_SAMPLE_WIDTH + 3.0 * LEGEND_PADDING + longest as f64 * LEGEND_CHAR_WIDTH)
            / ax_w;
        let h = (names.len() as f64 * LEGEND_ENTRY_HEIGHT + LEGEND_PADDING) / ax_h;
        Some((w, h, LEGEND_PADDING / ax_w, LEGEND_PADDING / ax_h))
    }

    /// Resolve `Best` to the anchor whose box covers the fewest data points.
    pub fn resolve_legend_anchor(&self, anchor: LegendAnchor, fig: &Figure) -> LegendAnchor {
        if anchor != LegendAnchor::Best {
            return anchor;
        }
        let Some((w, h, pad_u, pad_v)) = self.legend_size(fig) else {
            return LegendAnchor::UpperRight;
        };
        let [xmin, xmax, ymin, ymax] = self.limits_ordered();
        let points: Vec<(f64, f64)> = self
            .plots
            .iter()
            .flat_map(|p| p.xs.iter().zip(p.ys.iter()))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| ((x - xmin) / (xmax - xmin), (y - ymin) / (ymax - ymin)))
            .collect();

        // Same candidate order as the anchors are listed, minus `Best`.
        let mut best = (usize::MAX, LegendAnchor::UpperRight);
        for candidate in LegendAnchor::ALL.into_iter().skip(1) {
            let (u0, v0) = candidate.corner(w, h, pad_u, pad_v);
            let covered = points
                .iter()
                .filter(|(u, v)| *u >= u0 && *u <= u0 + w && *v <= v0 && *v >= v0 - h)
                .count();
            if covered < best.0 {
                best = (covered, candidate);
            }
        }
        best.1
    }

    fn legend_tags(&self, anchor: LegendAnchor, fig: &Figure) -> Tags {
        let Some((w, h, pad_u, pad_v)) = self.legend_size(fig) else {
            return Vec::new();
        };
        let anchor = self.resolve_legend_anchor(anchor, fig);
        let (u0, v0) = anchor.corner(w, h, pad_u, pad_v);
        let (x, y, _, _) = self.transformations(fig);
        let ax_w = fig.width as f64 * self.width;
        let ax_h = fig.height as f64 * self.height;

        let mut tags: Tags = Vec::new();
        tags.push(Box::new(Tag::<svg::Rect>::new(
            x(u0),
            y(1.0 - v0),
            w * ax_w,
            h * ax_h,
            opts(&[
                ("fill", "white"),
                ("fill-opacity", "0.8"),
                ("stroke", "lightgray"),
            ]),
        )));

        let sample_w = LEGEND_SAMPLE_WIDTH / ax_w;
        let entry_h = LEGEND_ENTRY_HEIGHT / ax_h;
        for (i, p) in self.plots.iter().filter(|p| !p.name.is_empty()).enumerate() {
            let v_mid = v0 - pad_v / 2.0 - (i as f64 + 0.5) * entry_h;
            let (xa, xb, ym) = (
                x(u0 + pad_u),
                x(u0 + pad_u + sample_w),
                y(1.0 - v_mid),
            );
            if p.dash.is_some() {
                tags.push(Box::new(Tag::<svg::Line>::new(
                    xa,
                    xb,
                    ym,
                    ym,
                    Some(p.line_style()),
                )));
            }
            if let Some(shape) = p.marker {
                tags.extend(shape.to_tags((xa + xb) / 2.0, ym, p.marker_size, p.marker_style()));
            }
            tags.extend(
                Text {
                    text: p.name.to_owned(),
                    u: u0 + 2.0 * pad_u + sample_w,
                    v: v_mid - 0.3 * entry_h,
                    angle: 0.0,
                    style: element_opts(&[("text-anchor", "start"), ("font-size", "10pt")]),
                }
                .to_tags(self, fig),
            );
        }
        tags
    }

    fn limits_ordered(&self) -> [f64; 4] {
        let [xmin, xmax, ymin, ymax] = self.limits;
        let (xmin, xmax) = (xmin.min(xmax), xmin.max(xmax));
        let (ymin, ymax) = (ymin.min(ymax), ymin.max(ymax));
        [xmin, xmax, ymin, ymax]
    }
}

impl Default for Axis {
    fn default() -> Self {
        Axis::new(0.125, 0.12, 0.825, 0.76)
    }
}

impl From<[f64; 4]> for Axis {
    fn from(pos_and_dims: [f64; 4]) -> Self {
        let [u, v, width, height] = pos_and_dims;
        Self::new(u, v, width, height)
    }
}

// ----------------------------------------------------------------------------
//
//
// Text
//
//
// ----------------------------------------------------------------------------

/// Text element for placing labels in the axis (also axes labels).
struct Text {
    text: String,
    u: f64,
    v: f64,
    angle: f64,
    style: svg::Params,
}

impl Element for Text {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Tags {
        let (x, y, _, _) = ax.transformations(fig);
        vec![Box::new(Tag::<svg::Text>::new(
            x(self.u),
            y(1.0 - self.v),
            self.angle,
            &self.text,
            Some(self.style.clone()),
        ))]
    }
}

// ----------------------------------------------------------------------------
//
//
// Ticks
//
//
// ----------------------------------------------------------------------------

/// The ticks of the axes. Includes ticks and tick labels.
pub struct Ticks {
    pub xpos: Vec<f64>,
    pub ypos: Vec<f64>,
    pub x_num_minor: usize,
    pub y_num_minor: usize,
    color: String,
    linewidth: f64,
}

impl Default for Ticks {
    fn default() -> Self {
        Self {
            xpos: Vec::new(),
            ypos: Vec::new(),
            x_num_minor: 3,
            y_num_minor: 3,
            color: "black".to_string(),
            linewidth: 1.0,
        }
    }
}

impl Element for Ticks {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Tags {
        let (x, y, u, v) = ax.transformations(fig);

        let width_param = format!("{}", self.linewidth);
        let style = [
            ("stroke", &self.color[..]),
            ("stroke-width", &width_param[..]),
        ];
        let style_minor = [("stroke", "lightgray"), ("stroke-width", &width_param[..])];
        let style_xtick_label = [("text-anchor", "middle")];
        let style_ytick_label = [("text-anchor", "end")];

        let mut xticks: Tags = Vec::new();
        let mut yticks: Tags = Vec::new();

        let (xtick_labels, ytick_labels) = self.format_ticks();

        if ax.draw_xaxis {
            let mut iter = self.xpos.iter().zip(xtick_labels).peekable();
            while let Some((&xi, li)) = iter.next() {
                let lt = Tag::<svg::Line>::new(x(u(xi)), x(u(xi)), y(0.99), y(1.01), opts(&style));
                let tt = Tag::<svg::Text>::new(x(u(xi)), y(1.06), 0.0, &li, opts(&style_xtick_label));
                xticks.push(Box::new(lt));
                xticks.push(Box::new(tt));

                // Draw minor ticks.
                if let Some((&xj, _)) = iter.peek() {
                    if self.x_num_minor == 0 {
                        continue;
                    }
                    let step = (xj - xi) / (self.x_num_minor as f64 + 1.0);
                    for i in 1..=self.x_num_minor {
                        let xm = x(u(xi + i as f64 * step));
                        let lt = Tag::<svg::Line>::new(xm, xm, y(0.99), y(1.01), opts(&style_minor));
                        xticks.push(Box::new(lt));
                    }
                }
            }
        }

        if ax.draw_yaxis {
            let mut iter = self.ypos.iter().zip(ytick_labels).peekable();
            while let Some((&yi, li)) = iter.next() {
                let lt =
                    Tag::<svg::Line>::new(x(-0.005), x(0.005), y(v(yi)), y(v(yi)), opts(&style));
                let tt = Tag::<svg::Text>::new(
                    x(-0.02),
                    y(v(yi) + 0.015),
                    0.0,
                    &li,
                    opts(&style_ytick_label),
                );
                yticks.push(Box::new(lt));
                yticks.push(Box::new(tt));

                // Draw minor ticks.
                if let Some((&yj, _)) = iter.peek() {
                    if self.y_num_minor == 0 {
                        continue;
                    }
                    let step = (yj - yi) / (self.y_num_minor as f64 + 1.0);
                    for i in 1..=self.y_num_minor {
                        let ym = y(v(yi + i as f64 * step));
                        let lt = Tag::<svg::Line>::new(x(-0.005), x(0.005), ym, ym, opts(&style_minor));
                        yticks.push(Box::new(lt));
                    }
                }
            }
        }

        xticks.extend(yticks);
        xticks
    }
}

impl Ticks {
    fn format_ticks(&self) -> (Vec<String>, Vec<String>) {
        (format_ticks(&self.xpos), format_ticks(&self.ypos))
    }

    fn y_tick_label_character_width(&self) -> usize {
        let (_, labels) = self.format_ticks();
        labels.iter().map(|lab| lab.len()).max().unwrap_or(0)
    }
}

// ----------------------------------------------------------------------------
//
//
// LinePlot
//
//
// ----------------------------------------------------------------------------

/// Dash pattern of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl Dash {
    /// SVG `stroke-dasharray`, scaled with the line width.
    pub fn dasharray(&self, linewidth: f64) -> Option<String> {
        let pattern: &[f64] = match self {
            Dash::Solid => return None,
            Dash::Dashed => &[3.7, 1.6],
            Dash::DashDot => &[6.4, 1.6, 1.0, 1.6],
            Dash::Dotted => &[1.0, 1.65],
        };
        let scale = linewidth.max(0.1);
        let mut raw = String::new();
        for seg in pattern {
            write!(raw, "{} ", seg * scale).expect("Failed to write into string.");
        }
        raw.pop();
        Some(raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
}

impl MarkerShape {
    /// Tags for one marker of diameter `size` centered at (cx, cy), in pixels.
    fn to_tags(&self, cx: f64, cy: f64, size: f64, style: Params) -> Tags {
        let r = size / 2.0;
        let polygon = |points: &[(f64, f64)], style: Params| -> Box<dyn svg::RenderTag> {
            Box::new(Tag::<svg::Polygon>::new(
                points.iter().map(|(px, _)| *px),
                points.iter().map(|(_, py)| *py),
                Some(style),
            ))
        };
        match self {
            MarkerShape::Circle => vec![Box::new(Tag::<svg::Circle>::new(cx, cy, r, Some(style)))],
            MarkerShape::Square => vec![Box::new(Tag::<svg::Rect>::new(
                cx - r,
                cy - r,
                size,
                size,
                Some(style),
            ))],
            MarkerShape::TriangleUp => {
                vec![polygon(&[(cx, cy - r), (cx + r, cy + r), (cx - r, cy + r)], style)]
            }
            MarkerShape::TriangleDown => {
                vec![polygon(&[(cx, cy + r), (cx + r, cy - r), (cx - r, cy - r)], style)]
            }
            MarkerShape::Diamond => vec![polygon(&[
                (cx, cy - r),
                (cx + r, cy),
                (cx, cy + r),
                (cx - r, cy),
            ], style)],
            MarkerShape::Cross => vec![
                Box::new(Tag::<svg::Line>::new(cx - r, cx + r, cy - r, cy + r, Some(style.clone()))),
                Box::new(Tag::<svg::Line>::new(cx - r, cx + r, cy + r, cy - r, Some(style))),
            ],
            MarkerShape::Plus => vec![
                Box::new(Tag::<svg::Line>::new(cx - r, cx + r, cy, cy, Some(style.clone()))),
                Box::new(Tag::<svg::Line>::new(cx, cx, cy - r, cy + r, Some(style))),
            ],
        }
    }
}

/// A series of points drawn as a line, markers, or both.
#[derive(Clone, Debug)]
pub struct LinePlot {
    xs: Vec<f64>,
    ys: Vec<f64>,
    color: String,
    linewidth: f64,
    dash: Option<Dash>,
    opacity: f64,
    marker: Option<MarkerShape>,
    marker_size: f64,
    zorder: f64,
    name: String,
}

impl LinePlot {
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            color: "black".to_string(),
            linewidth: 1.0,
            dash: Some(Dash::Solid),
            opacity: 1.0,
            marker: None,
            marker_size: 6.0,
            zorder: 2.0,
            name: String::new(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.set_color(color);
        self
    }

    pub fn with_linewidth(mut self, linewidth: f64) -> Self {
        self.set_linewidth(linewidth);
        self
    }

    /// `None` draws no connecting line.
    pub fn with_dash(mut self, dash: Option<Dash>) -> Self {
        self.dash = dash;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Marker shape and its diameter in pixels.
    pub fn with_marker(mut self, marker: Option<MarkerShape>, size: f64) -> Self {
        self.marker = marker;
        self.marker_size = size;
        self
    }

    pub fn with_zorder(mut self, zorder: f64) -> Self {
        self.zorder = zorder;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self
    }

    pub fn set_color(&mut self, color: &str) {
        color.clone_into(&mut self.color);
    }

    pub fn set_linewidth(&mut self, linewidth: f64) {
        self.linewidth = linewidth;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert_into(self, mut ax: Axis) -> Axis {
        ax.add_line(self);
        ax
    }

    fn line_style(&self) -> Params {
        let mut style = element_opts(&[
            ("stroke", &self.color),
            ("stroke-width", &format!("{}", self.linewidth)),
            ("stroke-opacity", &format!("{}", self.opacity)),
        ]);
        if let Some(dasharray) = self.dash.and_then(|dash| dash.dasharray(self.linewidth)) {
            style.insert("stroke-dasharray".to_string(), dasharray);
        }
        style
    }

    fn marker_style(&self) -> Params {
        element_opts(&[
            ("fill", &self.color),
            ("stroke", &self.color),
            ("opacity", &format!("{}", self.opacity)),
        ])
    }

    /// Split the data at non-finite values, which would break a polyline.
    fn finite_segments(&self) -> Vec<(Vec<f64>, Vec<f64>)> {
        let mut segments = vec![(Vec::new(), Vec::new())];
        for (x, y) in self.xs.iter().zip(self.ys.iter()) {
            if x.is_finite() && y.is_finite() {
                if let Some((xs, ys)) = segments.last_mut() {
                    xs.push(*x);
                    ys.push(*y);
                }
            } else if segments.last().is_some_and(|(xs, _)| !xs.is_empty()) {
                segments.push((Vec::new(), Vec::new()));
            }
        }
        segments.retain(|(xs, _)| xs.len() > 1 || (self.marker.is_some() && !xs.is_empty()));
        segments
    }
}

impl Element for LinePlot {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Tags {
        let (x, y, u, v) = ax.transformations(fig);
        let mut svg_tags: Tags = Vec::new();
        let segments = self.finite_segments();
        if self.dash.is_some() {
            for (xs, ys) in segments.iter().filter(|(xs, _)| xs.len() > 1) {
                svg_tags.push(Box::new(Tag::<svg::Polyline>::new(
                    xs.iter().map(|xi| x(u(*xi))),
                    ys.iter().map(|yi| y(v(*yi))),
                    Some(self.line_style()),
                )));
            }
        }
        if let Some(shape) = self.marker {
            let style = self.marker_style();
            for (xs, ys) in segments.iter() {
                for (xi, yi) in xs.iter().zip(ys.iter()) {
                    svg_tags.extend(shape.to_tags(
                        x(u(*xi)),
                        y(v(*yi)),
                        self.marker_size,
                        style.clone(),
                    ));
                }
            }
        }
        svg_tags
    }
}

// ----------------------------------------------------------------------------
//
//
// Helpers
//
//
// ----------------------------------------------------------------------------

/// Generate svg::Params from a slice of pairs.
pub fn element_opts(items: &[(&str, &str)]) -> svg::Params {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const MAX_TICKS: i64 = 20;

/// Roughly 3 to 10 evenly spaced tick positions within [min, max].
fn tick_positions(min: f64, max: f64, mult: f64) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return Vec::new();
    }
    let span_mag = span.log10().floor() as i32;
    let mut step = 10.0f64.powi(span_mag - 1) * mult;
    while span / step <= 3.0 {
        step /= 2.0;
    }
    while span / step > 10.0 {
        step *= 2.0;
    }

    let first = (min / step).ceil();
    // Steps below the resolution of `first` cannot be told apart.
    if !first.is_finite() || first + 1.0 == first {
        return Vec::new();
    }
    let n = ((max / step).floor() - first) as i64;
    (0..=n.clamp(-1, MAX_TICKS))
        .map(|i| {
            let x = (first + i as f64) * step;
            // Avoid printing -0.
            if x == 0.0 {
                0.0
            } else {
                x
            }
        })
        .filter(|x| *x <= max)
        .collect()
}

fn format_ticks(tick_positions: &[f64]) -> Vec<String> {
    if tick_positions.is_empty() {
        return Vec::new();
    }
    let (_magnitude_min, _magnitude_max, mag_increment) =
        ticks_magnitude_and_increment(tick_positions);

    let fmt_fun = match mag_increment {
        i8::MIN..=-4 => |z| format!("{z:.2e}"),
        -3 => |z| format!("{z:.4}"),
        -2 => |z| format!("{z:.3}"),
        -1 => |z| format!("{z:.1}"),
        0 => |z| format!("{z:.1}"),
        1..=4 => |z| format!("{z:.0}"),
        5..=i8::MAX => |z| format!("{z:.0e}"),
    };

    tick_positions.iter().map(fmt_fun).collect()
}

fn ticks_magnitude_and_increment(tick_positions: &[f64]) -> (i8, i8, i8) {
    let (magnitude_min, magnitude_max) =
        tick_positions
            .iter()
            .filter(|y| **y != 0.0)
            .fold((f64::MAX, f64::MIN), |mut acc, x| {
                let mag_x = x.abs().log10();
                if mag_x < acc.0 {
                    acc.0 = mag_x
                };
                if mag_x > acc.1 {
                    acc.1 = mag_x
                };
                acc
            });
    let mag_increment = if tick_positions.len() < 2 {
        0.0
    } else {
        let n = tick_positions.len() - 1;
        let acc: f64 = tick_positions
            .iter()
            .zip(tick_positions.iter().skip(1))
            .map(|(zi, zj)| (zj - zi).abs())
            .sum();
        (acc / n as f64).log10()
    };
    (
        magnitude_min.floor() as i8,
        magnitude_max.floor() as i8,
        mag_increment.floor() as i8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_magnitude_and_increment_1() {
        let pos = vec![0.001, 0.002, 0.003, 0.004];
        let (magnitude_min, magnitude_max, mag_increment) = ticks_magnitude_and_increment(&pos);
        assert_eq!(mag_increment, -3);
        assert_eq!(magnitude_min, -3);
        assert_eq!(magnitude_max, -3);
    }

    #[test]
    fn test_ticks_magnitude_and_increment_2() {
        let pos = vec![10000.0, 12000.0, 14000.0, 16000.0, 18000.0, 20000.0];
        let (magnitude_min, magnitude_max, mag_increment) = ticks_magnitude_and_increment(&pos);
        assert_eq!(mag_increment, 3);
        assert_eq!(magnitude_min, 4);
        assert_eq!(magnitude_max, 4);
    }

    #[test]
    fn test_format_single_tick_does_not_panic() {
        assert_eq!(format_ticks(&[5.0]).len(), 1);
        assert!(format_ticks(&[]).is_empty());
    }

    #[test]
    fn test_tick_positions_lie_within_limits() {
        let pos = tick_positions(-0.3, 9.7, 2.5);
        assert!(pos.len() >= 3 && pos.len() <= 11, "{pos:?}");
        assert!(pos.iter().all(|p| *p >= -0.3 && *p <= 9.7));
        assert!(tick_positions(1.0, 1.0, 2.5).is_empty());
    }

    #[test]
    fn test_tick_positions_at_huge_magnitude_terminate() {
        assert!(tick_positions(1e19, 1e19 + 4096.0, 2.5).len() <= MAX_TICKS as usize + 1);
        let pos = tick_positions(1e6, 1e6 + 10.0, 2.5);
        assert!(pos.len() >= 3 && pos.len() <= 11, "{pos:?}");
    }

    #[test]
    fn test_render_narrow_range_at_huge_magnitude() {
        let mut ax =
            Axis::default().with_lineplot(LinePlot::new(&[1e19, 1e19 + 4096.0], &[1.0, 2.0]));
        ax.autoscale();
        let mut fig = Figure::empty(300, 200);
        ax.insert_into(&mut fig);
        assert!(fig.render().contains("<polyline"));
    }

    #[test]
    fn test_dasharray_scales_with_linewidth() {
        assert_eq!(Dash::Solid.dasharray(2.0), None);
        assert_eq!(Dash::Dashed.dasharray(2.0).as_deref(), Some("7.4 3.2"));
        assert_eq!(Dash::Dotted.dasharray(1.0).as_deref(), Some("1 1.65"));
    }

    #[test]
    fn test_legend_anchor_labels_round_trip() {
        for anchor in LegendAnchor::ALL {
            assert_eq!(LegendAnchor::from_label(anchor.label()), Some(anchor));
        }
        assert_eq!(LegendAnchor::from_label("nowhere"), None);
    }

    #[test]
    fn test_autoscale_adds_margin_and_ignores_nan() {
        let mut ax = Axis::default()
            .with_lineplot(LinePlot::new(&[0.0, 10.0, f64::NAN], &[1.0, 3.0, 100.0]));
        ax.autoscale();
        let [xmin, xmax, ymin, ymax] = ax.limits();
        assert!((xmin + 0.5).abs() < 1e-12);
        assert!((xmax - 10.5).abs() < 1e-12);
        assert!((ymin - 0.9).abs() < 1e-12);
        assert!((ymax - 3.1).abs() < 1e-12);
    }

    #[test]
    fn test_best_legend_avoids_data() {
        // Data crowded in the upper right corner.
        let xs: Vec<f64> = (0..50).map(|i| 8.0 + i as f64 * 0.04).collect();
        let ys: Vec<f64> = (0..50).map(|i| 8.0 + i as f64 * 0.04).collect();
        let mut ax = Axis::default()
            .with_lineplot(LinePlot::new(&[0.0], &[0.0]))
            .with_lineplot(LinePlot::new(&xs, &ys).with_name("crowded"));
        ax.autoscale();
        let fig = Figure::empty(600, 400);
        let anchor = ax.resolve_legend_anchor(LegendAnchor::Best, &fig);
        assert_ne!(anchor, LegendAnchor::UpperRight);
        assert_eq!(
            ax.resolve_legend_anchor(LegendAnchor::LowerCenter, &fig),
            LegendAnchor::LowerCenter
        );
    }

    #[test]
    fn test_render_orders_plots_by_zorder() {
        let mut ax = Axis::default()
            .with_xlabel("time")
            .with_ylabel("value")
            .with_legend(LegendAnchor::UpperLeft)
            .with_lineplot(
                LinePlot::new(&[0.0, 1.0], &[0.0, 1.0])
                    .with_color("#aa0000")
                    .with_zorder(5.0)
                    .with_name("top"),
            )
            .with_lineplot(
                LinePlot::new(&[0.0, 1.0], &[1.0, 0.0])
                    .with_color("#0000aa")
                    .with_name("bottom"),
            );
        ax.autoscale();
        let mut fig = Figure::empty(600, 400).with_title("Plot & more");
        ax.insert_into(&mut fig);
        let raw = fig.render();

        let top = raw.find("<polyline").and_then(|i| raw[i..].find("#aa0000").map(|j| i + j));
        let bottom = raw.find("#0000aa");
        assert!(bottom.unwrap() < top.unwrap());
        assert!(raw.contains(">Plot &amp; more</text>"));
        assert!(raw.contains(">time</text>"));
        assert!(raw.contains(">value</text>"));
        assert!(raw.contains(">top</text>"));
        assert!(raw.contains(">bottom</text>"));
    }

    #[test]
    fn test_markers_without_line() {
        let plot = LinePlot::new(&[0.0, 1.0, 2.0], &[0.0, f64::NAN, 2.0])
            .with_dash(None)
            .with_marker(Some(MarkerShape::Circle), 6.0);
        let mut ax = Axis::default().with_lineplot(plot);
        ax.autoscale();
        let mut fig = Figure::empty(300, 200);
        ax.insert_into(&mut fig);
        let raw = fig.render();
        assert!(!raw.contains("<polyline"));
        assert_eq!(raw.matches("<circle").count(), 2);
    }

    #[test]
    fn test_nan_splits_line_into_segments() {
        let plot = LinePlot::new(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, f64::NAN, 3.0, 4.0]);
        let segments = plot.finite_segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].0, vec![0.0, 1.0]);
        assert_eq!(segments[1].1, vec![3.0, 4.0]);
    }
}
