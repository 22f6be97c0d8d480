use eframe::egui::{self, InputState, Pos2, Rect, Response, Ui};

use artist_network::{InteractionOutcome, PointerEvent};

use super::super::ViewModel;

/// The slice of one frame's pointer input the canvas reacts to, in screen coordinates.
#[derive(Clone, Copy, Debug, Default)]
struct PointerFrame {
    press_origin: Option<Pos2>,
    primary_pressed: bool,
    primary_released: bool,
    moving: bool,
    latest_pos: Option<Pos2>,
    hover_pos: Option<Pos2>,
    scroll: f32,
}

impl PointerFrame {
    fn read(input: &InputState) -> Self {
        Self {
            press_origin: input.pointer.press_origin(),
            primary_pressed: input.pointer.primary_pressed(),
            primary_released: input.pointer.primary_released(),
            moving: input.pointer.is_moving(),
            latest_pos: input.pointer.latest_pos().or_else(|| input.pointer.interact_pos()),
            hover_pos: input.pointer.hover_pos(),
            scroll: input.raw_scroll_delta.y,
        }
    }
}

/// Primary-button and wheel input over the canvas as scene events, in canvas-local
/// coordinates. `hovered` must come from `Response::hovered`, which is false while another
/// layer (the detail popup) sits under the pointer. `pressed` is whether the scene is
/// already tracking a press.
fn pointer_events(
    frame: PointerFrame,
    rect: Rect,
    hovered: bool,
    pressed: bool,
) -> Vec<PointerEvent> {
    let local = |pos: Pos2| (pos - rect.min).to_pos2();
    let mut events = Vec::new();

    if hovered
        && frame.primary_pressed
        && let Some(origin) = frame.press_origin
        && rect.contains(origin)
    {
        events.push(PointerEvent::Down(local(origin)));
    }
    let pressed = pressed || !events.is_empty();

    if pressed
        && frame.moving
        && let Some(pos) = frame.latest_pos
    {
        events.push(PointerEvent::Move(local(pos)));
    }

    if pressed && frame.primary_released {
        let pos = frame.latest_pos.unwrap_or_else(|| rect.center());
        events.push(PointerEvent::Up(local(pos)));
    }

    if hovered
        && frame.scroll.abs() > f32::EPSILON
        && let Some(pos) = frame.hover_pos
    {
        // egui scrolls up with positive deltas; zooming in wants a negative wheel delta.
        events.push(PointerEvent::Wheel {
            pos: local(pos),
            delta: -frame.scroll,
        });
    }

    events
}

impl ViewModel {
    /// Returns whether the interaction wants another frame (a press is in progress).
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &Response,
    ) -> bool {
        let pressed = self.scene.interaction().is_pressed();
        let hovered = response.hovered();
        let frame = ui.input(PointerFrame::read);
        let events = pointer_events(frame, rect, hovered, pressed);

        for event in events {
            let outcome = self.scene.handle_pointer(event);
            if outcome != InteractionOutcome::None {
                tracing::trace!(?event, ?outcome, "pointer event");
            }
        }

        self.hovered = frame
            .hover_pos
            .filter(|pos| hovered && rect.contains(*pos))
            .and_then(|pos| {
                let simulation = self.scene.simulation()?;
                self.scene
                    .interaction()
                    .hit_test(simulation, (pos - rect.min).to_pos2())
            });

        if self.scene.interaction().dragging().is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        self.scene.interaction().is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(800.0, 600.0))
    }

    fn press_at(pos: Pos2) -> PointerFrame {
        PointerFrame {
            press_origin: Some(pos),
            primary_pressed: true,
            latest_pos: Some(pos),
            hover_pos: Some(pos),
            ..PointerFrame::default()
        }
    }

    #[test]
    fn press_on_canvas_is_local_down() {
        let events = pointer_events(press_at(pos2(150.0, 80.0)), canvas(), true, false);
        assert_eq!(events, vec![PointerEvent::Down(pos2(50.0, 30.0))]);
    }

    #[test]
    fn press_on_overlapping_popup_never_reaches_scene() {
        let frame = PointerFrame {
            scroll: 40.0,
            ..press_at(pos2(150.0, 80.0))
        };
        assert!(pointer_events(frame, canvas(), false, false).is_empty());

        let release = PointerFrame {
            primary_released: true,
            latest_pos: Some(pos2(150.0, 80.0)),
            ..PointerFrame::default()
        };
        assert!(pointer_events(release, canvas(), false, false).is_empty());
    }

    #[test]
    fn press_in_progress_keeps_tracking_off_canvas() {
        let frame = PointerFrame {
            moving: true,
            primary_released: true,
            latest_pos: Some(pos2(40.0, 20.0)),
            ..PointerFrame::default()
        };
        let events = pointer_events(frame, canvas(), false, true);
        assert_eq!(
            events,
            vec![
                PointerEvent::Move(pos2(-60.0, -30.0)),
                PointerEvent::Up(pos2(-60.0, -30.0)),
            ]
        );
    }

    #[test]
    fn wheel_delta_is_inverted() {
        let frame = PointerFrame {
            hover_pos: Some(pos2(500.0, 350.0)),
            scroll: 12.0,
            ..PointerFrame::default()
        };
        assert_eq!(
            pointer_events(frame, canvas(), true, false),
            vec![PointerEvent::Wheel {
                pos: pos2(400.0, 300.0),
                delta: -12.0,
            }]
        );
    }
}
