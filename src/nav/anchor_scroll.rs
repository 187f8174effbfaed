use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::controller::{listen, Controller, Handle, Installed, Scope};
use crate::dom::{self, ids};
use crate::error::SiteResult;

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// The id an in-page `href` points at. Bare `#` and non-fragment links yield `None`.
pub fn fragment_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some("") | None => None,
        Some(id) => Some(id),
    }
}

/// Document-absolute landing position for a target, leaving room for the fixed header.
pub fn landing_offset(target_viewport_top: f64, scroll_y: f64, header_height: f64) -> f64 {
    target_viewport_top + scroll_y - header_height
}

pub enum AnchorMsg {
    Clicked { href: String, event: Event },
}

pub struct SmoothAnchorScroller {
    window: Window,
    document: Document,
    last_target: Option<f64>,
}

impl SmoothAnchorScroller {
    pub fn install(window: &Window, document: &Document) -> SiteResult<Installed<Self>> {
        let anchors = dom::query_all::<Element>(document, ANCHOR_SELECTOR)?;
        let handle = Handle::new(Self {
            window: window.clone(),
            document: document.clone(),
            last_target: None,
        });
        let scope = handle.scope();

        let listeners = anchors
            .iter()
            .map(|anchor| {
                listen(anchor, "click", &scope, |event| {
                    let href = anchor_of(&event)?.get_attribute("href")?;
                    Some(AnchorMsg::Clicked { href, event })
                })
            })
            .collect::<SiteResult<Vec<_>>>()?;

        log::debug!("smooth scrolling wired on {} anchors", anchors.len());
        Ok(Installed::new(handle, listeners))
    }

    /// Position of the most recent smooth scroll request.
    pub fn last_target(&self) -> Option<f64> {
        self.last_target
    }

    fn header_height(&self) -> f64 {
        dom::find_by_id::<HtmlElement>(&self.document, ids::HEADER)
            .map(|header| f64::from(header.offset_height()))
            .unwrap_or(0.0)
    }

    /// Returns the scroll position requested, or `None` when the click is left to the browser.
    pub fn scroll_to_fragment(&mut self, href: &str, event: Option<&Event>) -> Option<f64> {
        let id = fragment_target(href)?;
        let target = self.document.get_element_by_id(id)?;
        if let Some(event) = event {
            event.prevent_default();
        }

        let top = landing_offset(
            target.get_bounding_client_rect().top(),
            dom::scroll_y(&self.window),
            self.header_height(),
        );
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);

        log::debug!("smooth scroll to #{} at {}", id, top);
        self.last_target = Some(top);
        Some(top)
    }
}

impl Controller for SmoothAnchorScroller {
    type Message = AnchorMsg;

    fn update(&mut self, msg: AnchorMsg, _scope: &Scope<Self>) {
        match msg {
            AnchorMsg::Clicked { href, event } => {
                self.scroll_to_fragment(&href, Some(&event));
            }
        }
    }
}

/// The anchor the listener is attached to; `href` is read at click time.
fn anchor_of(event: &Event) -> Option<Element> {
    event.current_target()?.dyn_into::<Element>().ok()
}
