//! End-to-end pipeline tests against a deterministic layout engine

mod common;

use common::{assert_close, login_menu, StackEngine};
use nav_diagram::layout::{self, TextAnchor};
use nav_diagram::{
    load_model, render_model, LayoutConfig, NavLink, RenderConfig, RenderError, SvgConfig,
};
use pretty_assertions::assert_eq;

#[test]
fn test_login_menu_document() {
    let rendered = render_model(&login_menu(), &RenderConfig::default(), &StackEngine)
        .expect("Should render");
    let svg = &rendered.svg;

    assert!(rendered.warnings.is_empty());
    assert!(svg.contains(r#"width="364" height="420" viewBox="0 0 364 420""#));
    assert!(svg.contains("pkg Shop"));
    assert_eq!(svg.matches(r#"class="nav-box "#).count(), 2);
    assert_eq!(svg.matches(r#"<g class="nav-link "#).count(), 1);
    assert!(svg.contains(r#"marker-end="url(#nav-arrow)""#));

    // entry marker on Login only: one filled circle beside a hollow square
    assert_eq!(svg.matches("<circle").count(), 1);
    let login = svg
        .split(r#"<g id="Login""#)
        .nth(1)
        .and_then(|rest| rest.split("</g>").next())
        .expect("Login group");
    assert!(login.contains("<circle"));
    assert!(login.contains(r##"fill="white" stroke="#000000" stroke-width="1.5""##));
}

#[test]
fn test_box_positions_and_canvas() {
    let config = LayoutConfig::default();
    let (diagram, _) = layout::compute(&login_menu(), &config, &StackEngine).expect("Should layout");

    let login = &diagram.boxes[0].bounds;
    let menu = &diagram.boxes[1].bounds;
    // content starts at the margin, then everything moves under the frame tab
    assert_close(login.x, 15.0 + 100.0);
    assert_close(login.y, 15.0 + 25.0 + 100.0 + 20.0);
    assert_close(menu.x, login.x + 7.0);
    assert_close(menu.y - login.y, 105.0);

    assert_close(diagram.width, 364.0);
    assert_close(diagram.height, 420.0);
    assert_close(diagram.width, login.right() + 100.0 + 15.0);
    assert_close(diagram.height, menu.bottom() + 100.0 + 15.0);

    let frame = &diagram.frame.bounds;
    assert_eq!((frame.x, frame.y), (15.0, 40.0));
    assert_close(frame.width, 334.0);
    assert_close(frame.height, 365.0);
}

#[test]
fn test_route_ends_on_box_sides() {
    let (diagram, _) = layout::compute(&login_menu(), &LayoutConfig::default(), &StackEngine)
        .expect("Should layout");
    let login = &diagram.boxes[0].bounds;
    let menu = &diagram.boxes[1].bounds;
    let path = &diagram.links[0].path;

    assert_eq!(path.len(), 2);
    assert_close(path[0].y, login.bottom());
    assert_close(path[1].y, menu.y);
}

#[test]
fn test_dangling_link_is_dropped() {
    let model = load_model(
        r#"
pages:
  A:
  B:
links:
  - { from: A, to: C }
"#,
    )
    .expect("Should load");

    let rendered =
        render_model(&model, &RenderConfig::default(), &StackEngine).expect("Should render");
    assert_eq!(rendered.svg.matches(r#"class="nav-box "#).count(), 2);
    assert_eq!(rendered.svg.matches(r#"<g class="nav-link "#).count(), 0);
    assert_eq!(rendered.warnings.len(), 1);
    assert_eq!(
        rendered.warnings[0].to_string(),
        "link 'A' -> 'C' dropped: unknown box 'C' (did you mean: A, B?)"
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let mut model = login_menu();
    model.add_link(NavLink::new("Menu", "Login").with_name("logout"));
    let config = RenderConfig::default();

    let first = render_model(&model, &config, &StackEngine).expect("Should render");
    let second = render_model(&model, &config, &StackEngine).expect("Should render");
    assert_eq!(first.svg, second.svg);
}

#[test]
fn test_scale_cancels_out() {
    let model = login_menu();
    let (at_72, _) =
        layout::compute(&model, &LayoutConfig::default(), &StackEngine).expect("Should layout");
    let (at_144, _) = layout::compute(&model, &LayoutConfig::default().with_scale(144.0), &StackEngine)
        .expect("Should layout");

    assert_close(at_144.width, at_72.width);
    assert_close(at_144.height, at_72.height);
    assert_close(at_144.boxes[1].bounds.y, at_72.boxes[1].bounds.y);
}

#[test]
fn test_margin_adds_twice_per_dimension() {
    let model = login_menu();
    let (wide, _) =
        layout::compute(&model, &LayoutConfig::default(), &StackEngine).expect("Should layout");
    let (narrow, _) = layout::compute(&model, &LayoutConfig::default().with_margin(40.0), &StackEngine)
        .expect("Should layout");

    assert_close(wide.width - narrow.width, 120.0);
    assert_close(wide.height - narrow.height, 120.0);
    assert_close(narrow.boxes[0].bounds.x, 15.0 + 40.0);
}

#[test]
fn test_labelled_link_is_rejoined_at_spacer() {
    let mut model = login_menu();
    model.links[0] = NavLink::new("Login", "Menu").with_name("go");
    let (diagram, _) =
        layout::compute(&model, &LayoutConfig::default(), &StackEngine).expect("Should layout");

    let link = &diagram.links[0];
    // two halves of two points each share the junction
    assert_eq!(link.path.len(), 3);
    let label = link.label.as_ref().expect("label");
    assert_eq!(label.text, "- go");
    assert_eq!(label.anchor, TextAnchor::Middle);
    assert_close(label.position.x, link.path[1].x);
    assert_close(label.position.y, link.path[1].y);
    assert!(label.position.x > diagram.boxes[0].bounds.right());
}

#[test]
fn test_labelled_link_without_spacers_uses_placer() {
    let mut model = login_menu();
    model.links[0] = NavLink::new("Login", "Menu").with_name("go");
    let config = LayoutConfig::default().with_label_spacers(false);
    let (diagram, _) = layout::compute(&model, &config, &StackEngine).expect("Should layout");

    let link = &diagram.links[0];
    assert_eq!(link.path.len(), 2);
    let label = link.label.as_ref().expect("label");
    assert_eq!(label.anchor, TextAnchor::Start);
}

#[test]
fn test_empty_model_renders_frame_only() {
    let model = load_model("name: Empty\n").expect("Should load");
    let rendered =
        render_model(&model, &RenderConfig::default(), &StackEngine).expect("Should render");

    assert!(rendered.svg.contains("pkg Empty"));
    assert!(rendered.svg.contains(r#"viewBox="0 0 430 355""#));
    assert_eq!(rendered.svg.matches(r#"class="nav-box "#).count(), 0);
}

#[test]
fn test_compact_output() {
    let config = RenderConfig::new()
        .with_svg(SvgConfig::new().with_standalone(false).with_pretty_print(false));
    let rendered = render_model(&login_menu(), &config, &StackEngine).expect("Should render");
    assert!(rendered.svg.starts_with("<svg"));
    assert!(!rendered.svg.contains("</g>\n"));
}

#[test]
fn test_unplaceable_engine_error_propagates() {
    let config = RenderConfig::new()
        .with_layout(LayoutConfig::default().with_engine_command("nav-diagram-no-such-engine"));
    let result = nav_diagram::render_with_config(common::LOGIN_MENU, &config);
    assert!(matches!(result, Err(RenderError::Layout(_))));
}
