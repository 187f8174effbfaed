use std::rc::Rc;

use web_sys::{Document, HtmlElement, Window};

use crate::config::SiteConfig;
use crate::controller::{listen_passive, Controller, Handle, Installed, Scope};
use crate::dom::{self, ids};
use crate::error::SiteResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shadow {
    Flat,
    Elevated,
}

impl Shadow {
    /// Elevated strictly above the threshold, so an offset equal to it stays flat.
    pub fn for_offset(offset: f64, threshold: f64) -> Self {
        if offset > threshold {
            Shadow::Elevated
        } else {
            Shadow::Flat
        }
    }

    pub fn css(self, config: &SiteConfig) -> &str {
        match self {
            Shadow::Flat => &config.shadow_flat,
            Shadow::Elevated => &config.shadow_elevated,
        }
    }
}

pub enum ChromeMsg {
    Scrolled,
}

pub struct ScrollChrome {
    window: Window,
    header: HtmlElement,
    config: Rc<SiteConfig>,
}

impl ScrollChrome {
    pub fn install(
        window: &Window,
        document: &Document,
        config: Rc<SiteConfig>,
    ) -> SiteResult<Installed<Self>> {
        let header = dom::by_id::<HtmlElement>(document, ids::HEADER)?;
        let handle = Handle::new(Self {
            window: window.clone(),
            header,
            config,
        });
        // Pages restored mid-scroll start with the right chrome.
        handle.send_message(ChromeMsg::Scrolled);

        let scroll =
            listen_passive(window, "scroll", &handle.scope(), |_| Some(ChromeMsg::Scrolled))?;
        Ok(Installed::new(handle, vec![scroll]))
    }

    pub fn apply(&self, offset: f64) -> Shadow {
        let shadow = Shadow::for_offset(offset, self.config.shadow_threshold);
        dom::set_style(&self.header, "box-shadow", shadow.css(&self.config));
        shadow
    }
}

impl Controller for ScrollChrome {
    type Message = ChromeMsg;

    fn update(&mut self, msg: ChromeMsg, _scope: &Scope<Self>) {
        match msg {
            ChromeMsg::Scrolled => {
                self.apply(dom::scroll_y(&self.window));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_up_to_and_including_threshold() {
        for offset in [0.0, 1.0, 19.9, 20.0] {
            assert_eq!(Shadow::for_offset(offset, 20.0), Shadow::Flat, "offset {}", offset);
        }
    }

    #[test]
    fn elevated_past_threshold() {
        for offset in [20.01, 21.0, 500.0, 1e6] {
            assert_eq!(Shadow::for_offset(offset, 20.0), Shadow::Elevated, "offset {}", offset);
        }
    }

    #[test]
    fn css_comes_from_config() {
        let config = SiteConfig::default();
        assert_eq!(Shadow::Flat.css(&config), "0 2px 20px rgba(0,0,0,.2)");
        assert_eq!(Shadow::Elevated.css(&config), "0 4px 30px rgba(0,0,0,.35)");
    }
}
