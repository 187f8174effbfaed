use std::rc::Rc;

use web_sys::{Document, HtmlElement, Window};

use crate::config::SiteConfig;
use crate::controller::{listen_passive, Controller, Handle, Installed, Scope};
use crate::dom;
use crate::error::SiteResult;

pub const SECTION_SELECTOR: &str = "section[id]";
pub const LINK_SELECTOR: &str = ".nav__link";

/// A section's vertical extent, `[top, top + height)`, read from live layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Highlight {
    /// Nothing matched; whatever is highlighted stays highlighted.
    Keep,
    Set(String),
}

/// Last containing span wins, spans being in document order.
pub fn pick_highlight(spans: &[SectionSpan], scroll_y: f64, lookup_offset: f64) -> Highlight {
    let lookup = scroll_y + lookup_offset;
    spans
        .iter()
        .filter(|span| span.contains(lookup))
        .last()
        .map(|span| Highlight::Set(span.id.clone()))
        .unwrap_or(Highlight::Keep)
}

struct TrackedSection {
    element: HtmlElement,
    id: String,
    link: HtmlElement,
}

pub enum ActiveLinkMsg {
    Recompute,
}

pub struct ActiveLinkTracker {
    window: Window,
    sections: Vec<TrackedSection>,
    links: Vec<HtmlElement>,
    config: Rc<SiteConfig>,
    active: Option<String>,
}

impl ActiveLinkTracker {
    pub fn install(
        window: &Window,
        document: &Document,
        config: Rc<SiteConfig>,
    ) -> SiteResult<Installed<Self>> {
        let links = dom::query_all::<HtmlElement>(document, LINK_SELECTOR)?;
        // Sections without a matching nav link never take part.
        let sections = dom::query_all::<HtmlElement>(document, SECTION_SELECTOR)?
            .into_iter()
            .filter_map(|element| {
                let id = element.id();
                let href = format!("#{}", id);
                let link = links
                    .iter()
                    .find(|link| link.get_attribute("href").as_deref() == Some(href.as_str()))?
                    .clone();
                Some(TrackedSection { element, id, link })
            })
            .collect::<Vec<_>>();

        log::debug!("tracking {} linked sections", sections.len());
        let handle = Handle::new(Self {
            window: window.clone(),
            sections,
            links,
            config,
            active: None,
        });
        handle.send_message(ActiveLinkMsg::Recompute);

        let scroll = listen_passive(window, "scroll", &handle.scope(), |_| {
            Some(ActiveLinkMsg::Recompute)
        })?;
        Ok(Installed::new(handle, vec![scroll]))
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn spans(&self) -> Vec<SectionSpan> {
        self.sections
            .iter()
            .map(|section| SectionSpan {
                id: section.id.clone(),
                top: f64::from(section.element.offset_top()),
                height: f64::from(section.element.offset_height()),
            })
            .collect()
    }

    pub fn recompute(&mut self, scroll_y: f64) -> Highlight {
        let highlight = pick_highlight(&self.spans(), scroll_y, self.config.active_lookup_offset);
        if let Highlight::Set(id) = &highlight {
            for link in &self.links {
                dom::remove_attribute(link, "style");
            }
            if let Some(section) = self.sections.iter().find(|s| &s.id == id) {
                dom::set_style(&section.link, "color", &self.config.active_link_color);
            }
            if self.active.as_ref() != Some(id) {
                log::debug!("active section -> {}", id);
            }
            self.active = Some(id.clone());
        }
        highlight
    }
}

impl Controller for ActiveLinkTracker {
    type Message = ActiveLinkMsg;

    fn update(&mut self, msg: ActiveLinkMsg, _scope: &Scope<Self>) {
        match msg {
            ActiveLinkMsg::Recompute => {
                self.recompute(dom::scroll_y(&self.window));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(id: &str, top: f64, height: f64) -> SectionSpan {
        SectionSpan {
            id: id.to_string(),
            top,
            height,
        }
    }

    fn three_sections() -> Vec<SectionSpan> {
        vec![
            span("hero", 0.0, 600.0),
            span("services", 600.0, 800.0),
            span("contact", 1400.0, 500.0),
        ]
    }

    #[test]
    fn lookup_adds_offset_to_scroll() {
        let spans = three_sections();
        assert_eq!(pick_highlight(&spans, 0.0, 100.0), Highlight::Set("hero".into()));
        // 499 + 100 = 599 is still hero, 500 + 100 = 600 is services.
        assert_eq!(pick_highlight(&spans, 499.0, 100.0), Highlight::Set("hero".into()));
        assert_eq!(pick_highlight(&spans, 500.0, 100.0), Highlight::Set("services".into()));
        assert_eq!(pick_highlight(&spans, 1350.0, 100.0), Highlight::Set("contact".into()));
    }

    #[test]
    fn interval_is_half_open() {
        let s = span("a", 100.0, 50.0);
        assert!(s.contains(100.0));
        assert!(s.contains(149.9));
        assert!(!s.contains(150.0));
        assert!(!s.contains(99.9));
    }

    #[test]
    fn no_match_keeps_previous_highlight() {
        let spans = vec![span("a", 0.0, 100.0), span("b", 300.0, 100.0)];
        assert_eq!(pick_highlight(&spans, 100.0, 100.0), Highlight::Keep);
        assert_eq!(pick_highlight(&spans, 5000.0, 100.0), Highlight::Keep);
        assert_eq!(pick_highlight(&[], 0.0, 100.0), Highlight::Keep);
    }

    #[test]
    fn overlap_resolves_to_last_in_document_order() {
        let spans = vec![
            span("first", 0.0, 1000.0),
            span("second", 200.0, 400.0),
            span("third", 900.0, 100.0),
        ];
        assert_eq!(pick_highlight(&spans, 200.0, 100.0), Highlight::Set("second".into()));
        assert_eq!(pick_highlight(&spans, 850.0, 100.0), Highlight::Set("third".into()));
        assert_eq!(pick_highlight(&spans, 0.0, 0.0), Highlight::Set("first".into()));
    }
}
