//! Pointer flows through a settled scene. With the default view transform screen and
//! world coordinates coincide, so node positions double as click targets.

use artist_network::{
    ConnectionRecord, InteractionOutcome, LayoutConfig, NetworkScene, PointerEvent, Role,
};
use eframe::egui::{Pos2, pos2, vec2};

fn settled_scene() -> NetworkScene {
    let mut scene = NetworkScene::new(LayoutConfig::default(), vec2(800.0, 600.0));
    scene.set_data(
        Some("Vincent van Gogh"),
        &[
            ConnectionRecord::new("Paul Gauguin")
                .with_score(8.0)
                .with_summary("Shared the Yellow House in Arles"),
            ConnectionRecord::new("Theo van Gogh").with_score(8.0),
        ],
    );
    scene.run_until_idle(5_000);
    scene
}

fn screen_position(scene: &NetworkScene, index: usize) -> Pos2 {
    scene.frame().screen_position(index).unwrap()
}

fn click(scene: &mut NetworkScene, at: Pos2) -> InteractionOutcome {
    scene.handle_pointer(PointerEvent::Down(at));
    scene.handle_pointer(PointerEvent::Up(at))
}

const EMPTY_SPOT: Pos2 = Pos2::new(5.0, 5.0);

#[test]
fn clicking_a_then_b_selects_b() {
    let mut scene = settled_scene();

    let first = screen_position(&scene, 1);
    assert_eq!(click(&mut scene, first), InteractionOutcome::Selected(1));
    let detail = scene.selected_detail().unwrap();
    assert_eq!(detail.display_name, "Paul Gauguin");
    assert_eq!(detail.anchor, first);
    assert_eq!(
        detail.detail.and_then(|detail| detail.summary).as_deref(),
        Some("Shared the Yellow House in Arles")
    );

    let second = screen_position(&scene, 2);
    assert_eq!(click(&mut scene, second), InteractionOutcome::Selected(2));
    assert_eq!(scene.selected_detail().map(|detail| detail.index), Some(2));
    assert!(scene.frame().nodes[2].selected);
    assert!(!scene.frame().nodes[1].selected);
}

#[test]
fn focal_click_selects_without_dragging() {
    let mut scene = settled_scene();
    let focal = screen_position(&scene, 0);

    assert_eq!(
        scene.handle_pointer(PointerEvent::Down(focal)),
        InteractionOutcome::None
    );
    scene.handle_pointer(PointerEvent::Move(focal + vec2(80.0, 0.0)));
    assert_eq!(screen_position(&scene, 0), focal);
    scene.handle_pointer(PointerEvent::Up(focal + vec2(80.0, 0.0)));

    assert_eq!(click(&mut scene, focal), InteractionOutcome::Selected(0));
    let detail = scene.selected_detail().unwrap();
    assert_eq!(detail.role, Role::Focal);
    assert!(detail.detail.is_none());
}

#[test]
fn pan_keeps_selection_and_plain_background_click_clears_it() {
    let mut scene = settled_scene();
    let node = screen_position(&scene, 1);
    click(&mut scene, node);

    scene.handle_pointer(PointerEvent::Down(EMPTY_SPOT));
    assert_eq!(
        scene.handle_pointer(PointerEvent::Move(EMPTY_SPOT + vec2(40.0, 25.0))),
        InteractionOutcome::Panned
    );
    assert_eq!(
        scene.handle_pointer(PointerEvent::Up(EMPTY_SPOT + vec2(40.0, 25.0))),
        InteractionOutcome::None
    );
    assert_eq!(scene.interaction().selected(), Some(1));
    assert_eq!(scene.interaction().transform().translation, vec2(40.0, 25.0));

    assert_eq!(
        click(&mut scene, EMPTY_SPOT),
        InteractionOutcome::SelectionCleared
    );
    assert!(scene.selected_detail().is_none());
}

#[test]
fn wheel_zoom_counts_as_gesture_and_stays_in_bounds() {
    let mut scene = settled_scene();
    let node = screen_position(&scene, 1);
    click(&mut scene, node);

    scene.handle_pointer(PointerEvent::Down(EMPTY_SPOT));
    assert_eq!(
        scene.handle_pointer(PointerEvent::Wheel {
            pos: pos2(400.0, 300.0),
            delta: -500.0,
        }),
        InteractionOutcome::Zoomed
    );
    scene.handle_pointer(PointerEvent::Up(EMPTY_SPOT));
    assert_eq!(scene.interaction().selected(), Some(1));

    for _ in 0..50 {
        scene.handle_pointer(PointerEvent::Wheel {
            pos: pos2(400.0, 300.0),
            delta: -2_000.0,
        });
    }
    assert_eq!(scene.interaction().transform().scale, 8.0);

    for _ in 0..50 {
        scene.handle_pointer(PointerEvent::Wheel {
            pos: pos2(400.0, 300.0),
            delta: 2_000.0,
        });
    }
    assert_eq!(scene.interaction().transform().scale, 0.1);
}

#[test]
fn drag_pins_under_pointer_and_release_lets_go() {
    let mut scene = settled_scene();
    let start = screen_position(&scene, 1);
    let target = pos2(120.0, 90.0);

    assert_eq!(
        scene.handle_pointer(PointerEvent::Down(start)),
        InteractionOutcome::DragStarted(1)
    );
    assert!(scene.is_running());
    assert_eq!(
        scene.handle_pointer(PointerEvent::Move(target)),
        InteractionOutcome::Dragged(1)
    );

    scene.run_until_idle(100);
    assert_eq!(screen_position(&scene, 1), target);
    assert!(scene.frame().nodes[1].pinned);

    assert_eq!(
        scene.handle_pointer(PointerEvent::Up(target)),
        InteractionOutcome::DragEnded(1)
    );
    assert!(!scene.frame().nodes[1].pinned);
    assert_eq!(scene.interaction().selected(), None);
    assert_eq!(scene.simulation().unwrap().energy_target(), 0.0);

    scene.run_until_idle(5_000);
    assert!(!scene.is_running());
    assert_ne!(screen_position(&scene, 1), target);
}

#[test]
fn zoomed_view_hit_tests_in_world_space() {
    let mut scene = settled_scene();
    scene.handle_pointer(PointerEvent::Wheel {
        pos: pos2(0.0, 0.0),
        delta: -500.0,
    });
    let transform = scene.interaction().transform();
    assert!(transform.scale > 1.0);

    let node = screen_position(&scene, 2);
    assert_eq!(
        scene
            .interaction()
            .hit_test(scene.simulation().unwrap(), node),
        Some(2)
    );
    assert_eq!(click(&mut scene, node), InteractionOutcome::Selected(2));
}

#[test]
fn new_data_clears_stale_selection() {
    let mut scene = settled_scene();
    let node = screen_position(&scene, 2);
    click(&mut scene, node);

    scene.set_data(Some("Claude Monet"), &[ConnectionRecord::new("Renoir")]);
    assert!(scene.selected_detail().is_none());
    assert!(!scene.interaction().is_pressed());
}

#[test]
fn inverted_zoom_bounds_from_config_do_not_crash_the_wheel() {
    let config: LayoutConfig =
        toml::from_str("[interaction]\nmin_scale = 5.0\nmax_scale = 2.0\n").unwrap();
    let mut scene = NetworkScene::new(config, vec2(800.0, 600.0));
    scene.set_data(Some("Vincent van Gogh"), &[ConnectionRecord::new("Theo van Gogh")]);

    assert_eq!(
        scene.handle_pointer(PointerEvent::Wheel {
            pos: pos2(400.0, 300.0),
            delta: -100.0,
        }),
        InteractionOutcome::Zoomed
    );
    let scale = scene.interaction().transform().scale;
    assert!((2.0..=5.0).contains(&scale), "scale {scale}");
    assert_eq!(scene.config().interaction.min_scale, 2.0);
}
