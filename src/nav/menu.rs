use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Node};

use crate::controller::{listen, Controller, Handle, Installed, Scope};
use crate::dom::{self, ids};
use crate::error::SiteResult;

pub const MENU_OPEN_CLASS: &str = "open";
pub const HAMBURGER_ACTIVE_CLASS: &str = "active";
pub const CLOSING_LINKS: &str = ".nav__link, .nav__cta";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn facets(self) -> MenuFacets {
        MenuFacets {
            menu_open_class: self.open,
            hamburger_active_class: self.open,
            aria_expanded: if self.open { "true" } else { "false" },
            body_overflow: if self.open { Some("hidden") } else { None },
        }
    }
}

/// Everything the open flag is mirrored into. Always derived as a whole from [`MenuState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuFacets {
    pub menu_open_class: bool,
    pub hamburger_active_class: bool,
    pub aria_expanded: &'static str,
    pub body_overflow: Option<&'static str>,
}

impl MenuFacets {
    pub fn is_consistent(&self) -> bool {
        let open = self.menu_open_class;
        self.hamburger_active_class == open
            && (self.aria_expanded == "true") == open
            && self.body_overflow.is_some() == open
    }
}

pub enum MenuMsg {
    Toggle,
    Close,
}

pub struct MenuController {
    state: MenuState,
    menu: Element,
    hamburger: Element,
    body: Option<HtmlElement>,
}

impl MenuController {
    pub fn install(document: &Document) -> SiteResult<Installed<Self>> {
        let menu = dom::by_id::<Element>(document, ids::NAV_MENU)?;
        let hamburger = dom::by_id::<Element>(document, ids::HAMBURGER)?;
        let links = dom::query_all::<Element>(document, CLOSING_LINKS)?;

        let handle = Handle::new(Self {
            state: MenuState::default(),
            menu: menu.clone(),
            hamburger: hamburger.clone(),
            body: document.body(),
        });
        let scope = handle.scope();

        let mut listeners = Vec::with_capacity(links.len() + 2);
        listeners.push(listen(&hamburger, "click", &scope, |_| Some(MenuMsg::Toggle))?);
        for link in &links {
            listeners.push(listen(link, "click", &scope, |_| Some(MenuMsg::Close))?);
        }
        listeners.push(listen(document, "click", &scope, move |e: Event| {
            is_outside_click(&e, &menu, &hamburger).then_some(MenuMsg::Close)
        })?);

        log::debug!("menu wired with {} closing links", links.len());
        Ok(Installed::new(handle, listeners))
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    fn render(&self) {
        let facets = self.state.facets();
        dom::set_class(&self.menu, MENU_OPEN_CLASS, facets.menu_open_class);
        dom::set_class(&self.hamburger, HAMBURGER_ACTIVE_CLASS, facets.hamburger_active_class);
        if let Err(e) = self.hamburger.set_attribute("aria-expanded", facets.aria_expanded) {
            log::warn!("aria-expanded update failed: {:?}", e);
        }
        if let Some(body) = &self.body {
            match facets.body_overflow {
                Some(value) => dom::set_style(body, "overflow", value),
                None => dom::clear_style(body, "overflow"),
            }
        }
    }
}

impl Controller for MenuController {
    type Message = MenuMsg;

    fn update(&mut self, msg: MenuMsg, _scope: &Scope<Self>) {
        match msg {
            MenuMsg::Toggle => self.state.toggle(),
            MenuMsg::Close => self.state.close(),
        }
        self.render();
    }
}

/// A click counts as outside only when its target lies in neither the menu nor the toggle,
/// so the toggle's own click bubbling to the document never closes the menu again.
fn is_outside_click(event: &Event, menu: &Element, hamburger: &Element) -> bool {
    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
    let target = target.as_ref();
    !menu.contains(target) && !hamburger.contains(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed_and_consistent() {
        let state = MenuState::default();
        assert!(!state.is_open());
        let facets = state.facets();
        assert!(facets.is_consistent());
        assert_eq!(facets.aria_expanded, "false");
        assert_eq!(facets.body_overflow, None);
    }

    #[test]
    fn toggle_opens_every_facet() {
        let mut state = MenuState::default();
        state.toggle();
        assert_eq!(
            state.facets(),
            MenuFacets {
                menu_open_class: true,
                hamburger_active_class: true,
                aria_expanded: "true",
                body_overflow: Some("hidden"),
            }
        );
    }

    #[test]
    fn close_is_idempotent() {
        let mut state = MenuState::default();
        state.close();
        state.close();
        assert!(!state.is_open());
        state.toggle();
        state.close();
        state.close();
        assert!(!state.is_open());
    }

    #[test]
    fn facets_stay_consistent_over_any_sequence() {
        // Every 8-step sequence of toggles and closes.
        for pattern in 0u32..256 {
            let mut state = MenuState::default();
            let mut expected = false;
            for step in 0..8 {
                if pattern & (1 << step) != 0 {
                    state.toggle();
                    expected = !expected;
                } else {
                    state.close();
                    expected = false;
                }
                assert!(state.facets().is_consistent());
                assert_eq!(state.is_open(), expected);
            }
        }
    }
}
