//! SVG generation from layout results

use crate::layout::geometry::estimate_text_width;
use crate::layout::{BoxLayout, BoxMetrics, DiagramLayout, FrameLayout, LinkLayout, Point, TextAnchor};
use crate::model::LinkKind;
use crate::stylesheet::Stylesheet;

use super::icons;
use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push(&mut self, element: String) {
        let indent = self.indent_str();
        self.elements.push(format!("{}{}", indent, element));
    }

    /// Add the open arrowhead and the containment diamond marker definitions
    pub fn add_markers(&mut self) {
        let prefix = self.prefix();
        let stroke = escape_attr(&self.config.line_color);
        self.defs.push(format!(
            r#"<marker id="{prefix}arrow" markerWidth="12" markerHeight="12" refX="10" refY="6" orient="auto" markerUnits="strokeWidth">
      <path d="M0,0 L10,6 L0,12" fill="none" stroke="{stroke}" stroke-width="1.5"/>
    </marker>"#
        ));
        self.defs.push(format!(
            r#"<marker id="{prefix}diamond" markerWidth="12" markerHeight="12" refX="0" refY="6" orient="auto" markerUnits="strokeWidth">
      <path d="M0,6 L6,0 L12,6 L6,12 z" fill="{stroke}"/>
    </marker>"#
        ));
    }

    /// Add the text classes used by boxes, links and the frame
    pub fn add_text_styles(&mut self, metrics: &BoxMetrics) {
        let p = self.prefix();
        let font_family = self.config.font_family.clone();
        let label_size = self.config.label_font_size;
        let frame_size = self.config.frame_font_size;
        self.styles.extend([
            format!("text {{ font-family: {}; }}", font_family),
            format!(
                ".{p}stereotype {{ font-size: {}px; fill: #333; }}",
                fmt_number(metrics.font_size_stereotype)
            ),
            format!(
                ".{p}classname {{ font-size: {}px; font-weight: bold; }}",
                fmt_number(metrics.font_size_title)
            ),
            format!(
                ".{p}attribute {{ font-size: {}px; fill: #333; }}",
                fmt_number(metrics.font_size)
            ),
            format!(
                ".{p}link-label {{ font-size: {}px; fill: #000; }}",
                fmt_number(label_size)
            ),
            format!(
                ".{p}frame-title {{ font-size: {}px; font-weight: bold; }}",
                fmt_number(frame_size)
            ),
        ]);
    }

    /// Add a white rectangle covering the whole canvas
    pub fn add_background(&mut self) {
        self.push(r#"<rect width="100%" height="100%" fill="white"/>"#.to_string());
    }

    /// Add a rectangle; `attrs` holds extra presentation attributes
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, attrs: &str) {
        self.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            fmt_number(x),
            fmt_number(y),
            fmt_number(w),
            fmt_number(h),
            attrs
        ));
    }

    /// Add a circle element
    pub fn add_circle(&mut self, cx: f64, cy: f64, r: f64, attrs: &str) {
        self.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
            fmt_number(cx),
            fmt_number(cy),
            fmt_number(r),
            attrs
        ));
    }

    /// Add a line element
    pub fn add_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, attrs: &str) {
        self.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            fmt_number(x1),
            fmt_number(y1),
            fmt_number(x2),
            fmt_number(y2),
            attrs
        ));
    }

    /// Add a path through `points`
    pub fn add_path(&mut self, points: &[Point], attrs: &str) {
        self.push(format!(r#"<path d="{}"{}/>"#, path_to_d(points), attrs));
    }

    /// Add a text element; `class` is prefixed with the class prefix
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, class: Option<&str>, attrs: &str) {
        let class_attr = class
            .map(|c| format!(r#" class="{}{}""#, self.prefix(), c))
            .unwrap_or_default();
        self.push(format!(
            r#"<text{} x="{}" y="{}"{}>{}</text>"#,
            class_attr,
            fmt_number(x),
            fmt_number(y),
            attrs,
            escape_text(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[String]) {
        let id_attr = id
            .map(|i| format!(r#" id="{}""#, escape_attr(i)))
            .unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, escape_attr(&classes.join(" ")))
        };

        self.push(format!("<g{}{}>", id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push("</g>".to_string());
    }

    /// Build the final SVG string
    pub fn build(self, width: f64, height: f64) -> String {
        let nl = self.newline();
        let inner = if self.config.pretty_print { "    " } else { "" };
        let outer = if self.config.pretty_print { "  " } else { "" };

        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        let (w, h) = (fmt_number(width), fmt_number(height));
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str(outer);
            svg.push_str("<defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str(inner);
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(outer);
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        if !self.styles.is_empty() {
            svg.push_str(outer);
            svg.push_str("<style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str(inner);
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str(outer);
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a diagram with the default stylesheet
pub fn render_svg(layout: &DiagramLayout, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(layout, config, &Stylesheet::default())
}

/// Render a diagram, filling boxes from `stylesheet`
///
/// Links are drawn before boxes so box fills cover route ends.
pub fn render_svg_with_stylesheet(
    layout: &DiagramLayout,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());

    builder.add_markers();
    builder.add_text_styles(&layout.metrics);
    builder.add_background();

    render_frame(&layout.frame, &mut builder);

    for link in &layout.links {
        render_link(link, &mut builder);
    }

    for nav_box in &layout.boxes {
        render_box(nav_box, &layout.metrics, stylesheet, &mut builder);
    }

    builder.build(layout.width, layout.height)
}

/// UML package frame: body rectangle, title tab and `pkg` title
fn render_frame(frame: &FrameLayout, builder: &mut SvgBuilder) {
    let stroke = stroke_attr(builder.config());
    let font_size = builder.config().frame_font_size;
    let b = &frame.bounds;
    let tab_top = b.y - frame.tab_height;
    let tab_width = estimate_text_width(&frame.title, font_size) + 20.0;

    builder.add_rect(b.x, b.y, b.width, b.height, &format!(r#" fill="none"{}"#, stroke));
    builder.add_path(
        &[
            Point::new(b.x, b.y),
            Point::new(b.x, tab_top),
            Point::new(b.x + tab_width, tab_top),
            Point::new(b.x + tab_width + 10.0, b.y),
        ],
        &format!(r#" fill="none"{}"#, stroke),
    );
    builder.add_text(&frame.title, b.x + 10.0, tab_top + 17.0, Some("frame-title"), "");
}

fn render_link(link: &LinkLayout, builder: &mut SvgBuilder) {
    if !link.is_routed() {
        return;
    }

    let prefix = builder.prefix();
    let config = builder.config();
    let mut attrs = format!(
        r#" fill="none" stroke="{}" stroke-width="{}""#,
        escape_attr(&config.line_color),
        fmt_number(config.line_width)
    );
    if link.kind == LinkKind::Containment {
        attrs.push_str(&format!(r#" marker-start="url(#{prefix}diamond)""#));
    }
    attrs.push_str(&format!(r#" marker-end="url(#{prefix}arrow)""#));

    builder.start_group(
        None,
        &[
            format!("{}link", prefix),
            format!("{}link-{}", prefix, link.kind.as_str()),
        ],
    );
    builder.add_path(&link.path, &attrs);

    if let Some(label) = &link.label {
        let anchor = match label.anchor {
            TextAnchor::Start => "",
            TextAnchor::Middle => r#" text-anchor="middle" dominant-baseline="middle""#,
        };
        builder.add_text(
            &label.text,
            label.position.x,
            label.position.y,
            Some("link-label"),
            anchor,
        );
    }

    builder.end_group();
}

fn render_box(
    nav_box: &BoxLayout,
    metrics: &BoxMetrics,
    stylesheet: &Stylesheet,
    builder: &mut SvgBuilder,
) {
    let prefix = builder.prefix();
    let mut classes = vec![
        format!("{}box", prefix),
        format!("{}{}", prefix, nav_box.stereotype.as_str()),
    ];
    if nav_box.is_landmark {
        classes.push(format!("{}landmark", prefix));
    }

    let b = &nav_box.bounds;
    let stroke = stroke_attr(builder.config());

    builder.start_group(Some(nav_box.id_str()), &classes);
    builder.add_rect(
        b.x,
        b.y,
        b.width,
        b.height,
        &format!(
            r#" fill="{}"{}"#,
            escape_attr(stylesheet.fill_for(nav_box.stereotype)),
            stroke
        ),
    );

    let center_x = b.x + b.width / 2.0;
    let stereotype_y = b.y + metrics.box_padding_y + metrics.font_size_stereotype;
    builder.add_text(
        &nav_box.stereotype.label(),
        center_x,
        stereotype_y,
        Some("stereotype"),
        r#" text-anchor="middle""#,
    );
    let name_y = stereotype_y + metrics.font_size_title + 3.0;
    builder.add_text(
        &nav_box.name,
        center_x,
        name_y,
        Some("classname"),
        r#" text-anchor="middle""#,
    );

    if !nav_box.attributes.is_empty() {
        let separator_y = b.y + metrics.header_height;
        builder.add_line(b.x, separator_y, b.right(), separator_y, &stroke);
        let mut attr_y = separator_y + metrics.box_padding_y + metrics.font_size;
        for attr in &nav_box.attributes {
            builder.add_text(attr, b.x + metrics.box_padding_x, attr_y, Some("attribute"), "");
            attr_y += metrics.attr_line_height;
        }
    }

    // icon sits just outside the top-right corner
    let icon_size = builder.config().icon_size;
    let icon_x = b.right() - icon_size - 4.0;
    let icon_y = b.y - icon_size - 4.0;
    icons::stereotype_icon(builder, nav_box.stereotype, icon_x, icon_y, icon_size);

    if nav_box.is_entry {
        render_entry_marker(builder, icon_x, icon_y, icon_size);
    }

    builder.end_group();
}

/// Filled circle joined to a hollow square, left of the stereotype icon
fn render_entry_marker(builder: &mut SvgBuilder, icon_x: f64, icon_y: f64, icon_size: f64) {
    let config = builder.config();
    let color = escape_attr(&config.line_color);
    let radius = config.entry_circle_radius;
    let square = config.entry_square_size;

    let x = icon_x - square - radius - 10.0;
    let y = icon_y + (icon_size - square) / 2.0;
    let mid_y = y + square / 2.0;

    builder.add_circle(x + radius, mid_y, radius, &format!(r#" fill="{}""#, color));
    builder.add_line(
        x + radius * 2.0,
        mid_y,
        x + radius * 2.0 + 4.0,
        mid_y,
        &format!(r#" stroke="{}" stroke-width="1.5""#, color),
    );
    builder.add_rect(
        x + radius * 2.0 + 4.0,
        y,
        square,
        square,
        &format!(r#" fill="white" stroke="{}" stroke-width="1.5""#, color),
    );
}

fn stroke_attr(config: &SvgConfig) -> String {
    format!(r#" stroke="{}""#, escape_attr(&config.line_color))
}

/// Format a coordinate with at most three decimals and no trailing zeros
pub(crate) fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Convert a path of points to an SVG path d attribute
fn path_to_d(path: &[Point]) -> String {
    let Some((first, rest)) = path.split_first() else {
        return String::new();
    };

    let mut d = format!("M{},{}", fmt_number(first.x), fmt_number(first.y));
    for point in rest {
        d.push_str(&format!(" L{},{}", fmt_number(point.x), fmt_number(point.y)));
    }
    d
}

/// Escape text content
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value
pub(crate) fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BoundingBox, LabelLayout};
    use crate::model::{Identifier, NavBox, Stereotype};

    fn diagram(boxes: Vec<BoxLayout>, links: Vec<LinkLayout>) -> DiagramLayout {
        DiagramLayout {
            boxes,
            links,
            frame: FrameLayout {
                title: "pkg Test".to_string(),
                bounds: BoundingBox::new(15.0, 40.0, 400.0, 300.0),
                tab_height: 25.0,
            },
            width: 430.0,
            height: 355.0,
            metrics: BoxMetrics::default(),
        }
    }

    fn placed(nav_box: NavBox, x: f64, y: f64) -> BoxLayout {
        let mut b = BoxLayout::sized(&nav_box, 120.0, 40.0);
        b.bounds = BoundingBox::new(x, y, 120.0, 40.0);
        b
    }

    fn link(kind: LinkKind, path: Vec<Point>) -> LinkLayout {
        LinkLayout {
            from: Identifier::new("A"),
            to: Identifier::new("B"),
            kind,
            path,
            label: None,
        }
    }

    #[test]
    fn test_path_to_d() {
        let path = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.5),
        ];
        assert_eq!(path_to_d(&path), "M0,0 L100,0 L100,100.5");
        assert_eq!(path_to_d(&[]), "");
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(100.0), "100");
        assert_eq!(fmt_number(14.0 * 0.2), "2.8");
        assert_eq!(fmt_number(1.0 / 3.0), "0.333");
        assert_eq!(fmt_number(-0.0001), "0");
        assert_eq!(fmt_number(f64::NAN), "0");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("a < b"), "a &lt; b");
        assert_eq!(escape_text("a & b"), "a &amp; b");
        assert_eq!(escape_text("<<menu>>"), "&lt;&lt;menu&gt;&gt;");
        assert_eq!(escape_text(r#"say "hi""#), r#"say "hi""#);
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_document_structure() {
        let svg = render_svg(&diagram(vec![], vec![]), &SvgConfig::default());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"width="430" height="355""#));
        assert!(svg.contains(r#"<marker id="nav-arrow""#));
        assert!(svg.contains(r#"<marker id="nav-diamond""#));
        assert!(svg.contains(r#"<rect width="100%" height="100%" fill="white"/>"#));
        assert!(svg.contains(">pkg Test</text>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_not_standalone_omits_declaration() {
        let config = SvgConfig::default().with_standalone(false);
        let svg = render_svg(&diagram(vec![], vec![]), &config);
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn test_box_group() {
        let nav_box = NavBox::new("Cart", Stereotype::Query)
            .with_attributes(vec!["- items: List<Item>".to_string()])
            .with_landmark(true);
        let svg = render_svg(&diagram(vec![placed(nav_box, 100.0, 100.0)], vec![]), &SvgConfig::default());

        assert!(svg.contains(r#"<g id="Cart" class="nav-box nav-query nav-landmark">"#));
        assert!(svg.contains(r##"fill="#CCFFCC""##));
        assert!(svg.contains("&lt;&lt;query&gt;&gt;</text>"));
        assert!(svg.contains("- items: List&lt;Item&gt;</text>"));
        // separator at y + header height
        assert!(svg.contains(r#"<line x1="100" y1="140" x2="220" y2="140""#));
        // query icon at (220 - 18, 100 - 18)
        assert!(svg.contains(r#"<rect x="202" y="82" width="14" height="14""#));
        assert!(svg.contains(">?</text>"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_entry_marker() {
        let nav_box = NavBox::new("Login", Stereotype::NavigationClass).with_entry(true);
        let svg = render_svg(&diagram(vec![placed(nav_box, 100.0, 100.0)], vec![]), &SvgConfig::default());

        // icon at x 202, marker starts at 202 - 8 - 5 - 10 = 179
        assert!(svg.contains(r##"<circle cx="184" cy="89" r="5" fill="#000000"/>"##));
        assert!(svg.contains(r#"<rect x="193" y="85" width="8" height="8" fill="white""#));
    }

    #[test]
    fn test_link_groups_and_markers() {
        let path = vec![Point::new(0.0, 0.0), Point::new(0.0, 50.0)];
        let svg = render_svg(
            &diagram(
                vec![],
                vec![
                    link(LinkKind::Navigation, path.clone()),
                    link(LinkKind::Containment, path),
                ],
            ),
            &SvgConfig::default(),
        );

        assert!(svg.contains(r#"<g class="nav-link nav-link-navigation">"#));
        assert!(svg.contains(r#"<g class="nav-link nav-link-containment">"#));
        assert_eq!(svg.matches("marker-end=\"url(#nav-arrow)\"").count(), 2);
        assert_eq!(svg.matches("marker-start=\"url(#nav-diamond)\"").count(), 1);
    }

    #[test]
    fn test_unrouted_link_is_skipped() {
        let mut unrouted = link(LinkKind::Navigation, vec![Point::new(1.0, 1.0)]);
        unrouted.label = Some(LabelLayout {
            text: "- lost".to_string(),
            position: Point::new(1.0, 1.0),
            anchor: TextAnchor::Start,
        });
        let svg = render_svg(&diagram(vec![], vec![unrouted]), &SvgConfig::default());
        assert!(!svg.contains(r#"<g class="nav-link"#));
        assert!(!svg.contains("- lost"));
    }

    #[test]
    fn test_link_label_anchor() {
        let mut labelled = link(
            LinkKind::Process,
            vec![Point::new(0.0, 0.0), Point::new(0.0, 50.0)],
        );
        labelled.label = Some(LabelLayout {
            text: "<<processlink>> {ok}".to_string(),
            position: Point::new(10.0, 25.0),
            anchor: TextAnchor::Middle,
        });
        let svg = render_svg(&diagram(vec![], vec![labelled]), &SvgConfig::default());
        assert!(svg.contains(
            r#"<text class="nav-link-label" x="10" y="25" text-anchor="middle" dominant-baseline="middle">&lt;&lt;processlink&gt;&gt; {ok}</text>"#
        ));
    }

    #[test]
    fn test_links_drawn_before_boxes() {
        let nav_box = NavBox::new("A", Stereotype::Menu);
        let svg = render_svg(
            &diagram(
                vec![placed(nav_box, 0.0, 0.0)],
                vec![link(LinkKind::Navigation, vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)])],
            ),
            &SvgConfig::default(),
        );
        let link_at = svg.find(r#"<g class="nav-link"#).expect("link group");
        let box_at = svg.find(r#"<g id="A""#).expect("box group");
        assert!(link_at < box_at);
    }

    #[test]
    fn test_custom_prefix_and_stylesheet() {
        let mut stylesheet = Stylesheet::default();
        stylesheet
            .colors
            .insert("menu".to_string(), "#ABCDEF".to_string());
        let config = SvgConfig::default().without_class_prefix().with_pretty_print(false);
        let svg = render_svg_with_stylesheet(
            &diagram(vec![placed(NavBox::new("M", Stereotype::Menu), 0.0, 30.0)], vec![]),
            &config,
            &stylesheet,
        );
        assert!(svg.contains(r#"<g id="M" class="box menu">"#));
        assert!(svg.contains(r##"fill="#ABCDEF""##));
        assert!(!svg.contains("\n  <g"));
    }
}
