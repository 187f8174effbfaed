use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::config::SiteConfig;
use crate::controller::{Controller, Handle, Scope};
use crate::dom;
use crate::error::SiteResult;

pub const REVEAL_SELECTOR: &str = ".reveal";
pub const VISIBLE_CLASS: &str = "visible";

/// One element's reveal flag. It only ever goes from hidden to revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
    revealed: bool,
}

impl RevealState {
    pub fn from_revealed(revealed: bool) -> Self {
        Self { revealed }
    }

    pub fn is_revealed(self) -> bool {
        self.revealed
    }

    /// Returns true only for the intersection that performs the transition.
    pub fn on_intersection(&mut self, intersecting: bool) -> bool {
        if intersecting && !self.revealed {
            self.revealed = true;
            true
        } else {
            false
        }
    }
}

pub struct Intersection {
    pub target: Element,
    pub intersecting: bool,
}

pub enum RevealMsg {
    Entries {
        entries: Vec<Intersection>,
        observer: IntersectionObserver,
    },
}

#[derive(Default)]
pub struct RevealController {
    revealed: usize,
}

impl RevealController {
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    fn handle_entries(&mut self, entries: Vec<Intersection>, observer: &IntersectionObserver) {
        for Intersection { target, intersecting } in entries {
            let mut state = RevealState::from_revealed(target.class_list().contains(VISIBLE_CLASS));
            if state.on_intersection(intersecting) {
                dom::set_class(&target, VISIBLE_CLASS, true);
                observer.unobserve(&target);
                self.revealed += 1;
            }
        }
    }
}

impl Controller for RevealController {
    type Message = RevealMsg;

    fn update(&mut self, msg: RevealMsg, _scope: &Scope<Self>) {
        match msg {
            RevealMsg::Entries { entries, observer } => self.handle_entries(entries, &observer),
        }
    }
}

/// Live observation of the `.reveal` elements. Dropping it disconnects the observer.
pub struct Revealer {
    pub handle: Handle<RevealController>,
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Revealer {
    pub fn install(document: &Document, config: &SiteConfig) -> SiteResult<Self> {
        let targets = dom::query_all::<Element>(document, REVEAL_SELECTOR)?;
        let handle = Handle::new(RevealController::default());

        let scope = handle.scope();
        let on_entries = move |entries: Array, observer: IntersectionObserver| {
            let entries = entries
                .iter()
                .map(|entry| entry.unchecked_into::<IntersectionObserverEntry>())
                .map(|entry| Intersection {
                    target: entry.target(),
                    intersecting: entry.is_intersecting(),
                })
                .collect();
            scope.send_message(RevealMsg::Entries { entries, observer });
        };
        let callback =
            Closure::wrap(Box::new(on_entries) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
        options.set_root_margin(&config.reveal_root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for target in &targets {
            observer.observe(target);
        }

        log::debug!("observing {} reveal targets", targets.len());
        Ok(Self {
            handle,
            observer,
            _callback: callback,
        })
    }
}

impl Drop for Revealer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_intersection_reveals() {
        let mut state = RevealState::default();
        assert!(!state.on_intersection(false));
        assert!(!state.is_revealed());
        assert!(state.on_intersection(true));
        assert!(state.is_revealed());
    }

    #[test]
    fn reveal_happens_at_most_once_and_never_reverts() {
        let mut state = RevealState::default();
        let transitions = [true, false, true, true, false]
            .into_iter()
            .filter(|&hit| state.on_intersection(hit))
            .count();
        assert_eq!(transitions, 1);
        assert!(state.is_revealed());
    }

    #[test]
    fn already_revealed_element_is_ignored() {
        let mut state = RevealState::from_revealed(true);
        assert!(!state.on_intersection(true));
        assert!(state.is_revealed());
    }
}
