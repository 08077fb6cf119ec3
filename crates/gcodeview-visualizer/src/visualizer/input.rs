//! Toolkit-independent input dispatch
//!
//! The host converts its native pointer and keyboard events into
//! [`InputEvent`] values once, at the boundary. [`InputDispatcher`] turns them
//! into calls on a [`ViewTarget`] and reports whether a redraw is needed.

use gcodeview_core::{EventCallback, Key, Modifiers, PointerButton, Result, ViewCommand};
use gcodeview_settings::InputSettings;
use glam::DVec2;
use tracing::{trace, warn};

/// Pointer and keyboard events in window pixels (Y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    DragStart {
        button: PointerButton,
        position: DVec2,
        modifiers: Modifiers,
    },
    DragMove {
        button: PointerButton,
        position: DVec2,
    },
    DragEnd {
        button: PointerButton,
    },
    /// Positive `delta` scrolls away from the user (zoom in / layer up)
    Wheel {
        delta: f64,
        position: DVec2,
        modifiers: Modifiers,
    },
    Key {
        key: Key,
        modifiers: Modifiers,
    },
    DoubleClick {
        button: PointerButton,
        position: DVec2,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

/// What a drag session controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Rotate,
    Pan,
}

/// The single active drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub button: PointerButton,
    /// Last pointer position seen by the session
    pub anchor: DVec2,
}

/// Outcome of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// The view changed and should be repainted
    pub redraw: bool,
    /// The event was consumed
    pub handled: bool,
}

impl Response {
    pub const IGNORED: Self = Self {
        redraw: false,
        handled: false,
    };

    pub fn handled(redraw: bool) -> Self {
        Self {
            redraw,
            handled: true,
        }
    }
}

/// Operations the dispatcher drives. Implemented by the viewer; tests use
/// recording doubles.
pub trait ViewTarget {
    fn input_settings(&self) -> &InputSettings;

    /// Centre of the current viewport in pixels
    fn viewport_center(&self) -> DVec2;

    fn rotate_begin(&mut self, pixel: DVec2);

    /// Returns whether the orientation changed
    fn rotate_to(&mut self, pixel: DVec2) -> bool;

    fn rotate_end(&mut self);

    /// Pan by a raw pixel delta
    fn pan_pixels(&mut self, delta: DVec2) -> bool;

    /// Pan so the scene point under `from` ends up under `to`
    fn pan_plane(&mut self, from: DVec2, to: DVec2) -> bool;

    /// Zoom towards the scene point under `pixel`
    fn zoom_at(&mut self, factor: f64, pixel: DVec2) -> Result<()>;

    fn step_layer_up(&mut self) -> bool;

    fn step_layer_down(&mut self) -> bool;

    fn fit_to_model(&mut self) -> bool;

    fn reset_view(&mut self);

    fn resize(&mut self, width: f64, height: f64);
}

/// Routes [`InputEvent`]s to a [`ViewTarget`], tracking the drag session.
#[derive(Default)]
pub struct InputDispatcher {
    session: Option<DragSession>,
    pick_callback: Option<EventCallback<InputEvent>>,
}

impl std::fmt::Debug for InputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDispatcher")
            .field("session", &self.session)
            .field("pick_callback", &self.pick_callback.is_some())
            .finish()
    }
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive double-click events untouched
    pub fn set_pick_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&InputEvent) + 'static,
    {
        self.pick_callback = Some(Box::new(callback));
    }

    pub fn clear_pick_callback(&mut self) {
        self.pick_callback = None;
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Drop the active drag, if any
    pub fn cancel_drag<T: ViewTarget + ?Sized>(&mut self, target: &mut T) {
        if let Some(session) = self.session.take() {
            if session.kind == DragKind::Rotate {
                target.rotate_end();
            }
            trace!("Drag {:?} cancelled", session.kind);
        }
    }

    pub fn handle<T: ViewTarget + ?Sized>(&mut self, target: &mut T, event: &InputEvent) -> Response {
        match *event {
            InputEvent::DragStart {
                button, position, ..
            } => self.drag_start(target, button, position),
            InputEvent::DragMove { button, position } => self.drag_move(target, button, position),
            InputEvent::DragEnd { button } => self.drag_end(target, button),
            InputEvent::Wheel {
                delta,
                position,
                modifiers,
            } => self.wheel(target, delta, position, modifiers),
            InputEvent::Key { key, modifiers } => self.key(target, key, modifiers),
            InputEvent::DoubleClick { .. } => match self.pick_callback.as_mut() {
                Some(callback) => {
                    callback(event);
                    Response::handled(false)
                }
                None => Response::IGNORED,
            },
            InputEvent::Resize { width, height } => {
                target.resize(width, height);
                Response::handled(true)
            }
        }
    }

    fn drag_kind<T: ViewTarget + ?Sized>(target: &T, button: PointerButton) -> Option<DragKind> {
        let settings = target.input_settings();
        if button == settings.rotate_button {
            Some(DragKind::Rotate)
        } else if button == settings.pan_button {
            Some(DragKind::Pan)
        } else {
            None
        }
    }

    fn begin_session<T: ViewTarget + ?Sized>(
        &mut self,
        target: &mut T,
        kind: DragKind,
        button: PointerButton,
        position: DVec2,
    ) {
        self.cancel_drag(target);
        if kind == DragKind::Rotate {
            target.rotate_begin(position);
        }
        self.session = Some(DragSession {
            kind,
            button,
            anchor: position,
        });
        trace!("Drag {:?} started with {} button", kind, button);
    }

    fn drag_start<T: ViewTarget + ?Sized>(
        &mut self,
        target: &mut T,
        button: PointerButton,
        position: DVec2,
    ) -> Response {
        let Some(kind) = Self::drag_kind(target, button) else {
            return Response::IGNORED;
        };
        self.begin_session(target, kind, button, position);
        Response::handled(false)
    }

    fn drag_move<T: ViewTarget + ?Sized>(
        &mut self,
        target: &mut T,
        button: PointerButton,
        position: DVec2,
    ) -> Response {
        let Some(kind) = Self::drag_kind(target, button) else {
            return Response::IGNORED;
        };

        let anchor = match self.session {
            Some(session) if session.kind == kind => session.anchor,
            _ => {
                // Motion without a press (or for another button) opens a session here
                self.begin_session(target, kind, button, position);
                return Response::handled(false);
            }
        };

        let changed = match kind {
            DragKind::Rotate => target.rotate_to(position),
            DragKind::Pan if target.input_settings().plane_projected_pan => {
                target.pan_plane(anchor, position)
            }
            DragKind::Pan => target.pan_pixels(position - anchor),
        };

        if let Some(session) = self.session.as_mut() {
            session.anchor = position;
        }
        Response::handled(changed)
    }

    fn drag_end<T: ViewTarget + ?Sized>(&mut self, target: &mut T, button: PointerButton) -> Response {
        let Some(kind) = Self::drag_kind(target, button) else {
            return Response::IGNORED;
        };
        if self.session.is_some_and(|session| session.kind == kind) {
            self.cancel_drag(target);
        }
        Response::handled(false)
    }

    fn wheel<T: ViewTarget + ?Sized>(
        &mut self,
        target: &mut T,
        delta: f64,
        position: DVec2,
        modifiers: Modifiers,
    ) -> Response {
        if delta == 0.0 || !delta.is_finite() {
            return Response::IGNORED;
        }

        let settings = target.input_settings();
        let (layer_modifier, wheel_factor) =
            (settings.layer_wheel_modifier, settings.wheel_zoom_factor);

        if modifiers.contains(layer_modifier) {
            let changed = if delta > 0.0 {
                target.step_layer_up()
            } else {
                target.step_layer_down()
            };
            return Response::handled(changed);
        }

        let factor = if delta > 0.0 {
            wheel_factor
        } else {
            1.0 / wheel_factor
        };
        self.zoom(target, factor, position)
    }

    fn key<T: ViewTarget + ?Sized>(
        &mut self,
        target: &mut T,
        key: Key,
        modifiers: Modifiers,
    ) -> Response {
        let settings = target.input_settings();
        let Some(command) = settings.command_for(key) else {
            return Response::IGNORED;
        };
        let step = if modifiers.contains(settings.precision_modifier) {
            settings.precision_zoom_step
        } else {
            settings.zoom_step
        };
        trace!("Key {} -> {}", key, command);

        match command {
            ViewCommand::LayerUp => Response::handled(target.step_layer_up()),
            ViewCommand::LayerDown => Response::handled(target.step_layer_down()),
            ViewCommand::ZoomIn => {
                let center = target.viewport_center();
                self.zoom(target, step, center)
            }
            ViewCommand::ZoomOut => {
                let center = target.viewport_center();
                self.zoom(target, 1.0 / step, center)
            }
            ViewCommand::Fit => Response::handled(target.fit_to_model()),
            ViewCommand::Reset => {
                target.reset_view();
                Response::handled(true)
            }
        }
    }

    fn zoom<T: ViewTarget + ?Sized>(&mut self, target: &mut T, factor: f64, pixel: DVec2) -> Response {
        match target.zoom_at(factor, pixel) {
            Ok(()) => Response::handled(true),
            Err(e) => {
                warn!("Zoom rejected: {}", e);
                Response::handled(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodeview_core::Modifier;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        RotateBegin(DVec2),
        RotateTo(DVec2),
        RotateEnd,
        PanPixels(DVec2),
        PanPlane(DVec2, DVec2),
        Zoom(f64, DVec2),
        LayerUp,
        LayerDown,
        Fit,
        Reset,
        Resize(f64, f64),
    }

    #[derive(Default)]
    struct Recorder {
        settings: InputSettings,
        calls: Vec<Call>,
    }

    impl ViewTarget for Recorder {
        fn input_settings(&self) -> &InputSettings {
            &self.settings
        }

        fn viewport_center(&self) -> DVec2 {
            DVec2::new(400.0, 300.0)
        }

        fn rotate_begin(&mut self, pixel: DVec2) {
            self.calls.push(Call::RotateBegin(pixel));
        }

        fn rotate_to(&mut self, pixel: DVec2) -> bool {
            self.calls.push(Call::RotateTo(pixel));
            true
        }

        fn rotate_end(&mut self) {
            self.calls.push(Call::RotateEnd);
        }

        fn pan_pixels(&mut self, delta: DVec2) -> bool {
            self.calls.push(Call::PanPixels(delta));
            true
        }

        fn pan_plane(&mut self, from: DVec2, to: DVec2) -> bool {
            self.calls.push(Call::PanPlane(from, to));
            true
        }

        fn zoom_at(&mut self, factor: f64, pixel: DVec2) -> Result<()> {
            self.calls.push(Call::Zoom(factor, pixel));
            Ok(())
        }

        fn step_layer_up(&mut self) -> bool {
            self.calls.push(Call::LayerUp);
            true
        }

        fn step_layer_down(&mut self) -> bool {
            self.calls.push(Call::LayerDown);
            false
        }

        fn fit_to_model(&mut self) -> bool {
            self.calls.push(Call::Fit);
            true
        }

        fn reset_view(&mut self) {
            self.calls.push(Call::Reset);
        }

        fn resize(&mut self, width: f64, height: f64) {
            self.calls.push(Call::Resize(width, height));
        }
    }

    fn press(button: PointerButton, x: f64, y: f64) -> InputEvent {
        InputEvent::DragStart {
            button,
            position: DVec2::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    fn motion(button: PointerButton, x: f64, y: f64) -> InputEvent {
        InputEvent::DragMove {
            button,
            position: DVec2::new(x, y),
        }
    }

    #[test]
    fn test_rotate_drag_lifecycle() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        dispatcher.handle(&mut target, &press(PointerButton::Primary, 10.0, 10.0));
        let response = dispatcher.handle(&mut target, &motion(PointerButton::Primary, 20.0, 15.0));
        assert!(response.redraw);
        dispatcher.handle(
            &mut target,
            &InputEvent::DragEnd {
                button: PointerButton::Primary,
            },
        );

        assert_eq!(
            target.calls,
            vec![
                Call::RotateBegin(DVec2::new(10.0, 10.0)),
                Call::RotateTo(DVec2::new(20.0, 15.0)),
                Call::RotateEnd,
            ]
        );
        assert!(dispatcher.session().is_none());
    }

    #[test]
    fn test_pan_drag_uses_incremental_pixel_deltas() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        dispatcher.handle(&mut target, &press(PointerButton::Secondary, 100.0, 100.0));
        dispatcher.handle(&mut target, &motion(PointerButton::Secondary, 110.0, 95.0));
        dispatcher.handle(&mut target, &motion(PointerButton::Secondary, 112.0, 95.0));

        assert_eq!(
            target.calls,
            vec![
                Call::PanPixels(DVec2::new(10.0, -5.0)),
                Call::PanPixels(DVec2::new(2.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_plane_projected_pan() {
        let mut target = Recorder::default();
        target.settings.plane_projected_pan = true;
        let mut dispatcher = InputDispatcher::new();

        dispatcher.handle(&mut target, &press(PointerButton::Secondary, 1.0, 2.0));
        dispatcher.handle(&mut target, &motion(PointerButton::Secondary, 3.0, 4.0));

        assert_eq!(
            target.calls,
            vec![Call::PanPlane(DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0))]
        );
    }

    #[test]
    fn test_motion_without_press_opens_session() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        let response = dispatcher.handle(&mut target, &motion(PointerButton::Primary, 5.0, 5.0));
        assert!(!response.redraw);
        assert_eq!(
            dispatcher.session().map(|s| s.kind),
            Some(DragKind::Rotate)
        );
        assert_eq!(target.calls, vec![Call::RotateBegin(DVec2::new(5.0, 5.0))]);
    }

    #[test]
    fn test_conflicting_press_cancels_session() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        dispatcher.handle(&mut target, &press(PointerButton::Primary, 0.0, 0.0));
        dispatcher.handle(&mut target, &press(PointerButton::Secondary, 0.0, 0.0));
        assert_eq!(dispatcher.session().map(|s| s.kind), Some(DragKind::Pan));

        // Releasing the other button leaves the pan session alone
        dispatcher.handle(
            &mut target,
            &InputEvent::DragEnd {
                button: PointerButton::Primary,
            },
        );
        assert!(dispatcher.session().is_some());
        assert_eq!(
            target.calls,
            vec![Call::RotateBegin(DVec2::ZERO), Call::RotateEnd]
        );
    }

    #[test]
    fn test_unbound_button_is_ignored() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        let response = dispatcher.handle(&mut target, &press(PointerButton::Middle, 0.0, 0.0));
        assert_eq!(response, Response::IGNORED);
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_wheel_zooms_towards_cursor() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();
        let at = DVec2::new(120.0, 80.0);

        dispatcher.handle(
            &mut target,
            &InputEvent::Wheel {
                delta: 1.0,
                position: at,
                modifiers: Modifiers::NONE,
            },
        );
        dispatcher.handle(
            &mut target,
            &InputEvent::Wheel {
                delta: -1.0,
                position: at,
                modifiers: Modifiers::NONE,
            },
        );

        assert_eq!(
            target.calls,
            vec![Call::Zoom(1.05, at), Call::Zoom(1.0 / 1.05, at)]
        );
    }

    #[test]
    fn test_wheel_with_modifier_steps_layers() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        let up = dispatcher.handle(
            &mut target,
            &InputEvent::Wheel {
                delta: 2.0,
                position: DVec2::ZERO,
                modifiers: Modifiers::SHIFT,
            },
        );
        let down = dispatcher.handle(
            &mut target,
            &InputEvent::Wheel {
                delta: -2.0,
                position: DVec2::ZERO,
                modifiers: Modifiers::SHIFT,
            },
        );

        assert!(up.redraw);
        assert!(down.handled && !down.redraw);
        assert_eq!(target.calls, vec![Call::LayerUp, Call::LayerDown]);
    }

    #[test]
    fn test_key_commands() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();
        let center = DVec2::new(400.0, 300.0);
        let key = |key| InputEvent::Key {
            key,
            modifiers: Modifiers::NONE,
        };

        dispatcher.handle(&mut target, &key(Key::Char('u')));
        dispatcher.handle(&mut target, &key(Key::Down));
        dispatcher.handle(&mut target, &key(Key::PageDown));
        dispatcher.handle(
            &mut target,
            &InputEvent::Key {
                key: Key::Char('-'),
                modifiers: Modifiers::CONTROL,
            },
        );
        dispatcher.handle(&mut target, &key(Key::Char('f')));
        dispatcher.handle(&mut target, &key(Key::Char('R')));
        let unbound = dispatcher.handle(&mut target, &key(Key::Char('q')));

        assert_eq!(unbound, Response::IGNORED);
        assert_eq!(
            target.calls,
            vec![
                Call::LayerUp,
                Call::LayerDown,
                Call::Zoom(1.1, center),
                Call::Zoom(1.0 / 1.05, center),
                Call::Fit,
                Call::Reset,
            ]
        );
    }

    #[test]
    fn test_custom_layer_modifier() {
        let mut target = Recorder::default();
        target.settings.layer_wheel_modifier = Modifier::Alt;
        let mut dispatcher = InputDispatcher::new();

        dispatcher.handle(
            &mut target,
            &InputEvent::Wheel {
                delta: 1.0,
                position: DVec2::ZERO,
                modifiers: Modifiers::SHIFT,
            },
        );
        assert_eq!(target.calls, vec![Call::Zoom(1.05, DVec2::ZERO)]);
    }

    #[test]
    fn test_double_click_goes_to_pick_callback() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();
        let event = InputEvent::DoubleClick {
            button: PointerButton::Primary,
            position: DVec2::new(7.0, 9.0),
        };

        assert_eq!(dispatcher.handle(&mut target, &event), Response::IGNORED);

        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        dispatcher.set_pick_callback(move |e: &InputEvent| sink.borrow_mut().push(*e));

        let response = dispatcher.handle(&mut target, &event);
        assert!(response.handled && !response.redraw);
        assert_eq!(*picked.borrow(), vec![event]);
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_resize_requests_redraw() {
        let mut target = Recorder::default();
        let mut dispatcher = InputDispatcher::new();

        let response = dispatcher.handle(
            &mut target,
            &InputEvent::Resize {
                width: 1024.0,
                height: 768.0,
            },
        );
        assert!(response.redraw);
        assert_eq!(target.calls, vec![Call::Resize(1024.0, 768.0)]);
    }
}
