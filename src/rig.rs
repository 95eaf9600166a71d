// rig.rs — gesture signal subscriptions on the camera rig

use crate::gesture::GestureEvent;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The two inbound signals a camera rig exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSignal {
    Start,
    Move,
}

impl GestureEvent {
    pub fn signal(&self) -> GestureSignal {
        match self {
            GestureEvent::Start => GestureSignal::Start,
            GestureEvent::Move { .. } => GestureSignal::Move,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type GestureListener = Box<dyn FnMut(GestureEvent)>;

/// A camera rig node the viewer can observe.
///
/// The rig is owned elsewhere; subscribers only add and remove listeners.
/// Both methods take `&self` because the rig is shared between the input
/// layer that fires signals and the bindings that observe them.
pub trait CameraRig {
    fn add_listener(&self, signal: GestureSignal, listener: GestureListener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

type SharedListener = Rc<RefCell<GestureListener>>;

/// In-process rig that dispatches emitted events to its listeners.
#[derive(Default)]
pub struct SignalRig {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, GestureSignal, SharedListener)>>,
}

impl SignalRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `event` at every listener of its signal.
    ///
    /// Listeners may add or remove subscriptions while being called; the
    /// change applies from the next emit.
    pub fn emit(&self, event: GestureEvent) {
        let signal = event.signal();
        let targets: Vec<SharedListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();

        for listener in targets {
            match listener.try_borrow_mut() {
                Ok(mut callback) => (*callback)(event),
                Err(_) => log::warn!("skipping re-entrant {:?} gesture listener", signal),
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl CameraRig for SignalRig {
    fn add_listener(&self, signal: GestureSignal, listener: GestureListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, signal, Rc::new(RefCell::new(listener))));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _, _)| *lid != id);
    }
}

/// Scoped subscription to a rig's gesture signals.
///
/// Both listeners are registered in [`RigBinding::bind`] and removed when the
/// binding is dropped, whichever way that happens.
pub struct RigBinding {
    rig: Rc<dyn CameraRig>,
    listeners: Vec<ListenerId>,
}

impl RigBinding {
    pub fn bind(rig: Rc<dyn CameraRig>, on_start: GestureListener, on_move: GestureListener) -> Self {
        let listeners = vec![
            rig.add_listener(GestureSignal::Start, on_start),
            rig.add_listener(GestureSignal::Move, on_move),
        ];
        log::debug!("bound {} gesture listeners to camera rig", listeners.len());
        Self { rig, listeners }
    }
}

impl Drop for RigBinding {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.rig.remove_listener(id);
        }
        log::debug!("released camera rig gesture listeners");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_only_matching_signal() {
        let rig = SignalRig::new();
        let starts = Rc::new(Cell::new(0));
        let moves = Rc::new(Cell::new(0));
        {
            let starts = Rc::clone(&starts);
            rig.add_listener(GestureSignal::Start, Box::new(move |_| starts.set(starts.get() + 1)));
        }
        {
            let moves = Rc::clone(&moves);
            rig.add_listener(GestureSignal::Move, Box::new(move |_| moves.set(moves.get() + 1)));
        }

        rig.emit(GestureEvent::Start);
        rig.emit(GestureEvent::Move { multiplier: Some(1.1) });
        rig.emit(GestureEvent::Move { multiplier: None });

        assert_eq!(starts.get(), 1);
        assert_eq!(moves.get(), 2);
    }

    #[test]
    fn dropping_binding_removes_its_listeners() {
        let rig = Rc::new(SignalRig::new());
        let binding = RigBinding::bind(rig.clone(), Box::new(|_| {}), Box::new(|_| {}));
        assert_eq!(rig.listener_count(), 2);
        drop(binding);
        assert_eq!(rig.listener_count(), 0);
    }

    #[test]
    fn listener_may_unsubscribe_itself() {
        let rig = Rc::new(SignalRig::new());
        let slot: Rc<RefCell<Option<RigBinding>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let binding = RigBinding::bind(
            rig.clone(),
            Box::new(move |_| {
                inner.borrow_mut().take();
            }),
            Box::new(|_| {}),
        );
        *slot.borrow_mut() = Some(binding);

        rig.emit(GestureEvent::Start);
        assert_eq!(rig.listener_count(), 0);
    }
}
