//! Pointer sequences against a laid-out tree: clicks land on the node under
//! the pointer whatever the pan and zoom, drags never click.

use eframe::egui::{Pos2, pos2, vec2};
use mindmap_view::layout::{LayoutNode, LayoutParams, layout_tree};
use mindmap_view::test_support::FixedWidthMeasure;
use mindmap_view::tree::{NodeId, TreeBuilder, TreeNode};
use mindmap_view::view::{
    ModifierKey, PointerPhase, ViewState, ViewportConfig, ViewportEvent, hit_test, visible_tree,
};
use proptest::prelude::*;

fn sample_tree() -> TreeNode {
    let mut builder = TreeBuilder::new();
    builder.node("checkout", |b| {
        vec![
            b.node("cart", |b| {
                vec![
                    b.leaf("adds an item"),
                    b.leaf("removes the last item and shows the empty state"),
                ]
            }),
            b.node("payment", |b| {
                vec![
                    b.leaf("rejects an expired card"),
                    b.node("3ds", |b| vec![b.leaf("redirects to the issuer")]),
                ]
            }),
            b.leaf("shows a receipt"),
        ]
    })
}

fn view_with_ratio(pixel_ratio: f32) -> ViewState {
    ViewState::new(
        ViewportConfig {
            pixel_ratio,
            ..ViewportConfig::default()
        },
        Default::default(),
    )
}

fn layout_for(tree: &TreeNode, view: &ViewState) -> LayoutNode {
    let visible = visible_tree(tree, view).expect("empty search keeps the root");
    layout_tree(
        &FixedWidthMeasure::new(8.0),
        &visible,
        LayoutParams {
            max_width: 200.0,
            font_size: 16.0,
        },
    )
}

fn flatten(node: &LayoutNode, out: &mut Vec<LayoutNode>) {
    out.push(node.clone());
    for child in &node.nodes {
        flatten(child, out);
    }
}

/// Screen point showing `content` under the view's current transform.
fn screen_point(view: &ViewState, content: Pos2) -> Pos2 {
    let surface = view.viewport().state().content_to_surface(content);
    (surface.to_vec2() / view.viewport().config().pixel_ratio).to_pos2()
}

/// Drags from the origin by `offset` and zooms with the modifier held, so
/// the transform under test comes from real input.
fn move_camera(view: &mut ViewState, offset: (f32, f32), wheel: f32) {
    view.handle_input(ViewportEvent::PointerDown(pos2(400.0, 300.0)));
    view.handle_input(ViewportEvent::PointerMove(pos2(400.0 + offset.0, 300.0 + offset.1)));
    view.handle_input(ViewportEvent::PointerUp(pos2(400.0 + offset.0, 300.0 + offset.1)));

    view.handle_input(ViewportEvent::KeyDown(ModifierKey::Control));
    view.handle_input(ViewportEvent::Wheel {
        delta: vec2(0.0, wheel),
    });
    view.handle_input(ViewportEvent::KeyUp(ModifierKey::Control));
}

fn click(view: &mut ViewState, down: Pos2, up: Pos2) -> Option<Pos2> {
    view.handle_input(ViewportEvent::PointerDown(down));
    view.handle_input(ViewportEvent::PointerMove(up));
    view.handle_input(ViewportEvent::PointerUp(up)).click
}

proptest! {
    #[test]
    fn click_hits_the_node_under_the_pointer(
        pick in any::<prop::sample::Index>(),
        offset in (-300.0f32..300.0, -300.0f32..300.0),
        wheel in -600.0f32..600.0,
        pixel_ratio in prop::sample::select(vec![1.0f32, 1.5, 2.0]),
        jitter in (-4.0f32..4.0, -4.0f32..4.0),
    ) {
        let tree = sample_tree();
        let mut view = view_with_ratio(pixel_ratio);
        move_camera(&mut view, offset, wheel);

        let layout = layout_for(&tree, &view);
        let mut nodes = Vec::new();
        flatten(&layout, &mut nodes);
        let target = &nodes[pick.index(nodes.len())];

        let down = screen_point(&view, target.rect().center());
        // The drag pans with the pointer, so the release maps back to the
        // same content point.
        let up = down + vec2(jitter.0, jitter.1) * 0.01;
        let point = click(&mut view, down, up);

        prop_assert!(point.is_some());
        let point = point.unwrap_or_default();
        prop_assert_eq!(hit_test(&layout, point), Some(target.id));
    }
}

proptest! {
    #[test]
    fn drag_past_threshold_never_clicks(
        start in (0.0f32..800.0, 0.0f32..600.0),
        travel in prop::sample::select(vec![6.0f32, 40.0, -6.0, -12.0]),
        vertical in any::<bool>(),
    ) {
        let mut view = view_with_ratio(2.0);
        let down = pos2(start.0, start.1);
        let up = if vertical {
            down + vec2(0.0, travel)
        } else {
            down + vec2(travel, 0.0)
        };

        let pan_before = view.viewport().state().pan;
        prop_assert_eq!(click(&mut view, down, up), None);
        prop_assert_ne!(view.viewport().state().pan, pan_before);
        prop_assert_eq!(view.viewport().phase(), PointerPhase::Idle);
    }
}

#[test]
fn clicking_a_branch_collapses_it_and_clicking_again_restores_it() {
    let tree = sample_tree();
    let mut view = view_with_ratio(2.0);
    let before = layout_for(&tree, &view);
    let payment = &before.nodes[1];
    assert_eq!(payment.nodes.len(), 2);

    let at = screen_point(&view, payment.rect().center());
    let point = click(&mut view, at, at).expect("stationary press is a click");
    let id = hit_test(&before, point).expect("press lands on payment");
    assert_eq!(id, payment.id);
    assert!(view.toggle_collapsed(id));

    let collapsed = layout_for(&tree, &view);
    assert!(collapsed.nodes[1].collapsed);
    assert_eq!(collapsed.nodes[1].hidden_descendants, 3);
    assert!(collapsed.nodes[1].nodes.is_empty());

    // Collapsing shrinks the root's subtree, so everything moved.
    let at = screen_point(&view, collapsed.nodes[1].rect().center());
    let point = click(&mut view, at, at).expect("stationary press is a click");
    let id = hit_test(&collapsed, point).expect("press lands on collapsed payment");
    assert!(!view.toggle_collapsed(id));
    assert_eq!(layout_for(&tree, &view), before);
}

#[test]
fn travel_of_exactly_the_threshold_is_a_drag() {
    let mut view = view_with_ratio(1.0);
    assert_eq!(click(&mut view, pos2(100.0, 100.0), pos2(105.0, 100.0)), None);
    assert_eq!(click(&mut view, pos2(100.0, 100.0), pos2(100.0, 95.0)), None);
    assert!(click(&mut view, pos2(100.0, 100.0), pos2(104.0, 96.0)).is_some());
}

#[test]
fn click_on_background_hits_nothing() {
    let tree = sample_tree();
    let mut view = view_with_ratio(1.0);
    let layout = layout_for(&tree, &view);

    let below_everything = pos2(layout.x, layout.y + layout.tree_height + 50.0);
    let at = screen_point(&view, below_everything);
    let point = click(&mut view, at, at).expect("stationary press is a click");
    assert_eq!(hit_test(&layout, point), None::<NodeId>);
}

#[test]
fn pointer_leave_abandons_the_press() {
    let mut view = view_with_ratio(1.0);
    view.handle_input(ViewportEvent::PointerDown(pos2(10.0, 10.0)));
    view.handle_input(ViewportEvent::PointerLeave);
    let response = view.handle_input(ViewportEvent::PointerUp(pos2(10.0, 10.0)));
    assert_eq!(response.click, None);
}
