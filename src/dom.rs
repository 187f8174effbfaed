use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use crate::error::{SiteError, SiteResult};

/// Element ids the page markup has to provide.
pub mod ids {
    pub const HEADER: &str = "header";
    pub const HAMBURGER: &str = "hamburger";
    pub const NAV_MENU: &str = "navMenu";
    pub const CONTACT_FORM: &str = "contactForm";
    pub const FORM_SUCCESS: &str = "formSuccess";
    pub const FORM_ERROR: &str = "formError";
    pub const FIELD_NAME: &str = "nome";
    pub const FIELD_EMAIL: &str = "email";
    pub const FIELD_MESSAGE: &str = "mensagem";
    pub const SPIN_STYLE: &str = "spin-style";
}

pub fn window() -> SiteResult<Window> {
    web_sys::window().ok_or(SiteError::NoDocument)
}

pub fn document() -> SiteResult<Document> {
    window()?.document().ok_or(SiteError::NoDocument)
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Looks up a required element and casts it to `T`.
pub fn by_id<T: JsCast>(document: &Document, id: &'static str) -> SiteResult<T> {
    document
        .get_element_by_id(id)
        .ok_or(SiteError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| SiteError::UnexpectedElement(id))
}

pub fn find_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> SiteResult<Vec<T>> {
    Ok(collect_nodes(document.query_selector_all(selector)?))
}

/// Keeps only the nodes that cast to `T`.
pub fn collect_nodes<T: JsCast>(list: NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, on) {
        log::warn!("class `{}` toggle failed: {:?}", class, e);
    }
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("style `{}` update failed: {:?}", property, e);
    }
}

pub fn clear_style(element: &HtmlElement, property: &str) {
    if let Err(e) = element.style().remove_property(property) {
        log::warn!("style `{}` removal failed: {:?}", property, e);
    }
}

pub fn remove_attribute(element: &Element, name: &str) {
    if let Err(e) = element.remove_attribute(name) {
        log::warn!("attribute `{}` removal failed: {:?}", name, e);
    }
}
