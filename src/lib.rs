use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, PageTransitionEvent, Window};

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod reveal;

pub mod nav {
    pub mod active_link;
    pub mod anchor_scroll;
    pub mod menu;
    pub mod scroll_chrome;
}

pub mod contact {
    pub mod form;
    pub mod machine;
    pub mod submit;
    pub mod validation;
}

use config::SiteConfig;
use contact::form::ContactFormController;
use contact::submit::SimulatedSubmitter;
use controller::Installed;
use error::SiteResult;
use nav::active_link::ActiveLinkTracker;
use nav::anchor_scroll::SmoothAnchorScroller;
use nav::menu::MenuController;
use nav::scroll_chrome::ScrollChrome;
use reveal::Revealer;

const BANNER_STYLE: &str = "color:#FEC422; font-size:18px; font-weight:bold; \
    background:#031E3B; padding:8px 16px; border-radius:6px;";

thread_local! {
    static SITE: RefCell<Option<Site>> = RefCell::new(None);
    static TEARDOWN_WIRED: Cell<bool> = Cell::new(false);
}

/// Every enhancement installed on the current page. Dropping it unregisters all listeners,
/// disconnects the reveal observer and cancels pending form timers.
pub struct Site {
    pub chrome: Option<Installed<ScrollChrome>>,
    pub menu: Option<Installed<MenuController>>,
    pub reveal: Option<Revealer>,
    pub active_link: Option<Installed<ActiveLinkTracker>>,
    pub contact: Option<Installed<ContactFormController>>,
    pub anchors: Option<Installed<SmoothAnchorScroller>>,
}

impl Site {
    /// Installs each enhancement on its own; one missing element only skips its component.
    pub fn install(window: &Window, document: &Document, config: SiteConfig) -> Self {
        let config = Rc::new(config);
        let submitter = Box::new(SimulatedSubmitter::new(config.submit_latency_ms));
        let chrome = ScrollChrome::install(window, document, config.clone());
        let active_link = ActiveLinkTracker::install(window, document, config.clone());
        let contact = ContactFormController::install(document, config.clone(), submitter);
        Self {
            chrome: installed("scroll chrome", chrome),
            menu: installed("menu", MenuController::install(document)),
            reveal: installed("reveal", Revealer::install(document, &config)),
            active_link: installed("active link", active_link),
            contact: installed("contact form", contact).flatten(),
            anchors: installed("anchor scroll", SmoothAnchorScroller::install(window, document)),
        }
    }

    pub fn installed_count(&self) -> usize {
        [
            self.chrome.is_some(),
            self.menu.is_some(),
            self.reveal.is_some(),
            self.active_link.is_some(),
            self.contact.is_some(),
            self.anchors.is_some(),
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }
}

fn installed<T>(name: &str, result: SiteResult<T>) -> Option<T> {
    match result {
        Ok(component) => {
            debug!("{} installed", name);
            Some(component)
        }
        Err(e) => {
            warn!("{} skipped: {}", name, e);
            None
        }
    }
}

/// Boots with the configuration found on the page body.
pub fn boot() -> SiteResult<()> {
    let document = dom::document()?;
    let config = SiteConfig::from_document(&document);
    boot_with(config)
}

/// Installs now, or on `DOMContentLoaded` when the document is still parsing.
pub fn boot_with(config: SiteConfig) -> SiteResult<()> {
    let document = dom::document()?;
    if document.ready_state() != "loading" {
        return start(config);
    }

    debug!("document still loading, deferring install");
    let deferred = Closure::once_into_js(move || {
        if let Err(e) = start(config) {
            log::error!("Deferred boot failed: {}", e);
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        deferred.unchecked_ref(),
        &options,
    )?;
    Ok(())
}

fn start(config: SiteConfig) -> SiteResult<()> {
    let window = dom::window()?;
    let document = dom::document()?;

    let site = Site::install(&window, &document, config);
    info!("Site enhancements ready ({} of 6 installed)", site.installed_count());
    // A second boot replaces, and so tears down, the previous install.
    let previous = SITE.with(|slot| slot.borrow_mut().replace(site));
    drop(previous);

    wire_teardown(&window)?;
    gloo_console::log!("%cSoftsy 🚀", BANNER_STYLE);
    Ok(())
}

/// Registers the page-lifetime `pagehide` hook once. Pages entering the back/forward cache
/// keep their enhancements.
fn wire_teardown(window: &Window) -> SiteResult<()> {
    if TEARDOWN_WIRED.with(|wired| wired.replace(true)) {
        return Ok(());
    }
    let on_pagehide = Closure::wrap(Box::new(move |e: Event| {
        let persisted = e
            .dyn_ref::<PageTransitionEvent>()
            .map(|e| e.persisted())
            .unwrap_or(false);
        if !persisted {
            teardown();
        }
    }) as Box<dyn FnMut(Event)>);
    window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())?;
    on_pagehide.forget();
    Ok(())
}

/// Drops the installed site, if any.
pub fn teardown() {
    let site = SITE.with(|slot| slot.borrow_mut().take());
    if site.is_some() {
        info!("Tearing down site enhancements");
    }
    drop(site);
}

pub fn with_site<R>(f: impl FnOnce(&Site) -> R) -> Option<R> {
    SITE.with(|slot| slot.borrow().as_ref().map(f))
}
