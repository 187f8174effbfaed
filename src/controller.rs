//! Message-driven controllers bound to DOM events.
//!
//! A controller owns the state for one concern. DOM listeners translate raw events into the
//! controller's `Message` type and hand them to [`Controller::update`]. Deferred callbacks
//! (timers) keep only a [`Scope`], so they never extend the controller's lifetime.
//!
//! Messages sent while the controller is already updating are queued and delivered, in order,
//! once the running `update` returns.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::error::SiteResult;

pub trait Controller: Sized + 'static {
    type Message;

    fn update(&mut self, msg: Self::Message, scope: &Scope<Self>);
}

struct Shared<C: Controller> {
    controller: RefCell<C>,
    queue: RefCell<VecDeque<C::Message>>,
}

/// Strong, shared ownership of an installed controller.
pub struct Handle<C: Controller> {
    inner: Rc<Shared<C>>,
}

impl<C: Controller> Handle<C> {
    pub fn new(controller: C) -> Self {
        Self {
            inner: Rc::new(Shared {
                controller: RefCell::new(controller),
                queue: RefCell::new(VecDeque::new()),
            }),
        }
    }

    pub fn scope(&self) -> Scope<C> {
        Scope {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn send_message(&self, msg: C::Message) {
        self.scope().send_message(msg);
    }

    pub fn borrow(&self) -> Ref<'_, C> {
        self.inner.controller.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, C> {
        self.inner.controller.borrow_mut()
    }
}

impl<C: Controller> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub struct Scope<C: Controller> {
    inner: Weak<Shared<C>>,
}

impl<C: Controller> Scope<C> {
    /// Queues `msg` and drains the queue unless an `update` further up the stack already is.
    pub fn send_message(&self, msg: C::Message) {
        let Some(shared) = self.inner.upgrade() else {
            log::debug!("message dropped, controller already torn down");
            return;
        };
        shared.queue.borrow_mut().push_back(msg);
        loop {
            let Ok(mut controller) = shared.controller.try_borrow_mut() else {
                log::debug!("controller busy, message queued");
                return;
            };
            let Some(next) = shared.queue.borrow_mut().pop_front() else {
                return;
            };
            controller.update(next, self);
        }
    }
}

impl<C: Controller> Clone for Scope<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A controller together with the listeners feeding it. Dropping it unregisters the listeners.
pub struct Installed<C: Controller> {
    pub handle: Handle<C>,
    listeners: Vec<Listener>,
}

impl<C: Controller> Installed<C> {
    pub fn new(handle: Handle<C>, listeners: Vec<Listener>) -> Self {
        Self { handle, listeners }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// A registered DOM listener, removed again when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: F,
    ) -> SiteResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        if let Err(e) = self.target.remove_event_listener_with_callback(self.event, callback) {
            log::warn!("could not remove {} listener: {:?}", self.event, e);
        }
    }
}

/// Routes `event` on `target` to the controller behind `scope`. `map` returning `None` means
/// the event is not for this controller.
pub fn listen<C, F>(
    target: &EventTarget,
    event: &'static str,
    scope: &Scope<C>,
    map: F,
) -> SiteResult<Listener>
where
    C: Controller,
    F: Fn(Event) -> Option<C::Message> + 'static,
{
    bind(target, event, false, scope, map)
}

/// Same as [`listen`] but registered passive, for scroll-rate events.
pub fn listen_passive<C, F>(
    target: &EventTarget,
    event: &'static str,
    scope: &Scope<C>,
    map: F,
) -> SiteResult<Listener>
where
    C: Controller,
    F: Fn(Event) -> Option<C::Message> + 'static,
{
    bind(target, event, true, scope, map)
}

fn bind<C, F>(
    target: &EventTarget,
    event: &'static str,
    passive: bool,
    scope: &Scope<C>,
    map: F,
) -> SiteResult<Listener>
where
    C: Controller,
    F: Fn(Event) -> Option<C::Message> + 'static,
{
    let scope = scope.clone();
    Listener::new(target, event, passive, move |e: Event| {
        if let Some(msg) = map(e) {
            scope.send_message(msg);
        }
    })
}
