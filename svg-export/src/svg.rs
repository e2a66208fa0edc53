// This code is a thin Rust wrapper to handle SVG tags
// and render them to raw SVG markup.

use std::fmt::Write;

// ----------------------------------------------------------------------------
//
//
// Rust representation and rendering of SVG tags.
//
//
// ----------------------------------------------------------------------------

/// Attributes and style properties. Ordered, so the markup is reproducible.
pub type Params = std::collections::BTreeMap<String, String>;

pub trait RenderTag: std::fmt::Debug {
    fn render(&self, buf: &mut String);
}

impl<T> RenderTag for Tag<T>
where
    T: Identifier + std::fmt::Debug,
{
    fn render(&self, buf: &mut String) {
        write!(buf, "<{}", self.kind.identifier()).expect(FAILED_STRING_WRITE);
        for (k, v) in self.parameters.iter() {
            write!(buf, " {k}=\"{v}\"").expect(FAILED_STRING_WRITE);
        }
        if !self.style.is_empty() {
            write!(buf, " style=\"").expect(FAILED_STRING_WRITE);
            for (k, v) in self.style.iter() {
                write!(buf, "{k}:{v};").expect(FAILED_STRING_WRITE);
            }
            // Remove surplus semicolon.
            buf.pop();
            write!(buf, "\"").expect(FAILED_STRING_WRITE);
        }
        if !self.closing {
            write!(buf, " /").expect(FAILED_STRING_WRITE);
        }
        write!(buf, ">").expect(FAILED_STRING_WRITE);
        for c in self.children.iter() {
            c.render(buf);
        }
        if self.closing {
            write!(buf, "</{}>", self.kind.identifier()).expect(FAILED_STRING_WRITE);
        }
    }
}

impl RenderTag for String {
    fn render(&self, buf: &mut String) {
        buf.push_str(&escape(self));
    }
}

pub fn render(svg_tag: &Tag<Svg>) -> String {
    let mut raw_svg = String::new();
    svg_tag.render(&mut raw_svg);
    raw_svg
}

/// Escape characters with a meaning in XML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug)]
pub struct Tag<T>
where
    T: std::fmt::Debug,
{
    parameters: Params,
    style: Params,
    children: Vec<Box<dyn RenderTag>>,
    closing: bool,
    kind: T,
}

impl<T> Tag<T>
where
    T: std::fmt::Debug,
{
    fn with_kind(kind: T, parameters: Params, style: Option<Params>, closing: bool) -> Self {
        Self {
            parameters,
            style: style.unwrap_or_default(),
            children: Vec::new(),
            closing,
            kind,
        }
    }

    pub fn add_child(&mut self, child: impl RenderTag + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn add_children(&mut self, children: Vec<Box<dyn RenderTag>>) {
        self.children.extend(children);
    }
}

// ----------------------------------------------------------------------------
//
//
// Creation of `new` tags.
//
//
// ----------------------------------------------------------------------------

impl Tag<Svg> {
    pub fn new(width: u64, height: u64, style: Option<Params>) -> Self {
        let parameters = params(&[
            ("width", format!("{width}")),
            ("height", format!("{height}")),
            ("viewBox", format!("0 0 {width} {height}")),
            ("xmlns", "http://www.w3.org/2000/svg".to_string()),
        ]);
        Self::with_kind(Svg {}, parameters, style, true)
    }
}

impl Tag<Group> {
    pub fn new(style: Option<Params>) -> Self {
        Self::with_kind(Group {}, Params::new(), style, true)
    }
}

impl Tag<Circle> {
    pub fn new(cx: f64, cy: f64, r: f64, style: Option<Params>) -> Self {
        let parameters = params(&[
            ("cx", format!("{cx}")),
            ("cy", format!("{cy}")),
            ("r", format!("{r}")),
        ]);
        Self::with_kind(Circle {}, parameters, style, false)
    }
}

impl Tag<Rect> {
    pub fn new(x: f64, y: f64, width: f64, height: f64, style: Option<Params>) -> Self {
        let parameters = params(&[
            ("x", format!("{x}")),
            ("y", format!("{y}")),
            ("width", format!("{width}")),
            ("height", format!("{height}")),
        ]);
        Self::with_kind(Rect {}, parameters, style, false)
    }
}

impl Tag<Text> {
    pub fn new(x: f64, y: f64, angle: f64, text: &str, style: Option<Params>) -> Self {
        let parameters = params(&[("transform", format!("translate({x},{y}) rotate({angle})"))]);
        let mut res = Self::with_kind(Text {}, parameters, style, true);
        res.add_child(text.to_string());
        res
    }
}

impl Tag<Line> {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, style: Option<Params>) -> Self {
        let parameters = params(&[
            ("x1", format!("{x1}")),
            ("x2", format!("{x2}")),
            ("y1", format!("{y1}")),
            ("y2", format!("{y2}")),
            ("stroke", "black".to_string()),
        ]);
        Self::with_kind(Line {}, parameters, style, false)
    }
}

impl Tag<Polyline> {
    pub fn new(
        xs: impl IntoIterator<Item = f64>,
        ys: impl IntoIterator<Item = f64>,
        style: Option<Params>,
    ) -> Self {
        let parameters = params(&[
            ("points", points_attribute(xs, ys)),
            ("fill", "none".to_string()),
        ]);
        Self::with_kind(Polyline {}, parameters, style, false)
    }
}

impl Tag<Polygon> {
    pub fn new(
        xs: impl IntoIterator<Item = f64>,
        ys: impl IntoIterator<Item = f64>,
        style: Option<Params>,
    ) -> Self {
        let parameters = params(&[("points", points_attribute(xs, ys))]);
        Self::with_kind(Polygon {}, parameters, style, false)
    }
}

fn points_attribute(xs: impl IntoIterator<Item = f64>, ys: impl IntoIterator<Item = f64>) -> String {
    let mut raw_points = String::new();
    for (x, y) in xs.into_iter().zip(ys) {
        write!(raw_points, "{x},{y} ").expect(FAILED_STRING_WRITE);
    }
    raw_points.pop();
    raw_points
}

// ----------------------------------------------------------------------------
//
//
// SVG tag kinds and their str representation (`identifier`)
//
//
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct Svg {}
#[derive(Debug)]
pub struct Group {}
#[derive(Debug)]
pub struct Circle {}
#[derive(Debug)]
pub struct Rect {}
#[derive(Debug)]
pub struct Text {}
#[derive(Debug)]
pub struct Line {}
#[derive(Debug)]
pub struct Polyline {}
#[derive(Debug)]
pub struct Polygon {}

pub trait Identifier {
    fn identifier(&self) -> &'static str;
}

macro_rules! identifier {
    ($kind:ty, $name:literal) => {
        impl Identifier for $kind {
            fn identifier(&self) -> &'static str {
                $name
            }
        }
    };
}

identifier!(Svg, "svg");
identifier!(Group, "g");
identifier!(Circle, "circle");
identifier!(Rect, "rect");
identifier!(Text, "text");
identifier!(Line, "line");
identifier!(Polyline, "polyline");
identifier!(Polygon, "polygon");

const FAILED_STRING_WRITE: &str = "Failed to write into string.";

fn params(items: &[(&str, String)]) -> Params {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn opts(items: &[(&str, &str)]) -> Option<Params> {
    Some(
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_tags() {
        let mut svg = Tag::<Svg>::new(400, 300, None);
        let rect = Tag::<Rect>::new(0.0, 0.0, 400.0, 300.0, opts(&[("fill", "red")]));
        let text = Tag::<Text>::new(200.0, 150.0, 0.0, "a < b & c", None);
        svg.add_child(rect);
        svg.add_child(text);

        let raw = render(&svg);
        assert!(raw.starts_with("<svg height=\"300\""));
        assert!(raw.contains("<rect height=\"300\" width=\"400\" x=\"0\" y=\"0\" style=\"fill:red\" />"));
        assert!(raw.contains(">a &lt; b &amp; c</text>"));
        assert!(raw.ends_with("</svg>"));
    }

    #[test]
    fn test_polyline_points() {
        let line = Tag::<Polyline>::new([0.0, 1.5], [2.0, 3.0], None);
        let mut raw = String::new();
        line.render(&mut raw);
        assert_eq!(raw, "<polyline fill=\"none\" points=\"0,2 1.5,3\" />");
    }

    #[test]
    fn test_style_is_rendered_in_key_order() {
        let circle = Tag::<Circle>::new(1.0, 2.0, 3.0, opts(&[("stroke", "b"), ("fill", "a")]));
        let mut raw = String::new();
        circle.render(&mut raw);
        assert!(raw.contains("style=\"fill:a;stroke:b\""));
    }
}
