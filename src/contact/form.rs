use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Array, Function, Object, Reflect};
use web_sys::{
    Document, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use super::machine::{Completion, FormMachine, FormPhase, SubmitStep};
use super::submit::{PendingSubmission, SubmitError, Submitter};
use super::validation::{ContactFields, FieldId};
use crate::config::SiteConfig;
use crate::controller::{listen, Controller, Handle, Installed, Scope};
use crate::dom::{self, ids};
use crate::error::{SiteError, SiteResult};

pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";
pub const INDICATOR_ACTIVE_CLASS: &str = "active";

const SHAKE_FRAMES: [&str; 5] = [
    "translateX(0)",
    "translateX(-6px)",
    "translateX(6px)",
    "translateX(-4px)",
    "translateX(0)",
];

const SPIN_KEYFRAMES: &str = "@keyframes spin { to { transform: rotate(360deg); } }";

const SPINNER_SVG: &str = concat!(
    r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" "#,
    r#"stroke-width="2" style="animation:spin .6s linear infinite">"#,
    r#"<path d="M21 12a9 9 0 1 1-9-9" stroke-linecap="round"/></svg>"#,
);

fn loading_markup(label: &str) -> String {
    format!("{} {}", SPINNER_SVG, label)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    Success,
    Failure,
}

impl Indicator {
    fn element_id(self) -> &'static str {
        match self {
            Indicator::Success => ids::FORM_SUCCESS,
            Indicator::Failure => ids::FORM_ERROR,
        }
    }
}

enum Field {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl Field {
    fn lookup(document: &Document, id: &'static str) -> SiteResult<Self> {
        if let Some(input) = dom::find_by_id::<HtmlInputElement>(document, id) {
            return Ok(Field::Input(input));
        }
        if let Some(area) = dom::find_by_id::<HtmlTextAreaElement>(document, id) {
            return Ok(Field::TextArea(area));
        }
        match document.get_element_by_id(id) {
            Some(_) => Err(SiteError::UnexpectedElement(id)),
            None => Err(SiteError::MissingElement(id)),
        }
    }

    fn value(&self) -> String {
        match self {
            Field::Input(input) => input.value(),
            Field::TextArea(area) => area.value(),
        }
    }

    fn element(&self) -> &HtmlElement {
        match self {
            Field::Input(input) => input.as_ref(),
            Field::TextArea(area) => area.as_ref(),
        }
    }
}

pub enum FormMsg {
    Submit(Event),
    Completed(Result<(), SubmitError>),
    HideIndicator(Indicator),
}

pub struct ContactFormController {
    document: Document,
    form: HtmlFormElement,
    button: Option<HtmlButtonElement>,
    fields: Vec<(FieldId, Field)>,
    config: Rc<SiteConfig>,
    machine: FormMachine,
    submitter: Box<dyn Submitter>,
    pending: Option<PendingSubmission>,
    original_label: Option<String>,
    indicator: Option<(Indicator, Timeout)>,
    marked: Vec<FieldId>,
}

impl ContactFormController {
    /// `Ok(None)` when the page has no contact form.
    pub fn install(
        document: &Document,
        config: Rc<SiteConfig>,
        submitter: Box<dyn Submitter>,
    ) -> SiteResult<Option<Installed<Self>>> {
        let Some(form) = dom::find_by_id::<HtmlFormElement>(document, ids::CONTACT_FORM) else {
            log::debug!("no contact form on this page");
            return Ok(None);
        };
        let fields = FieldId::ALL
            .into_iter()
            .map(|id| Field::lookup(document, id.element_id()).map(|field| (id, field)))
            .collect::<SiteResult<Vec<_>>>()?;
        let button = form
            .query_selector(SUBMIT_BUTTON)?
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        if button.is_none() {
            log::warn!("contact form has no submit button");
        }

        let handle = Handle::new(Self {
            document: document.clone(),
            form: form.clone(),
            button,
            fields,
            config,
            machine: FormMachine::default(),
            submitter,
            pending: None,
            original_label: None,
            indicator: None,
            marked: Vec::new(),
        });
        let submit = listen(&form, "submit", &handle.scope(), |e| Some(FormMsg::Submit(e)))?;
        Ok(Some(Installed::new(handle, vec![submit])))
    }

    pub fn phase(&self) -> FormPhase {
        self.machine.phase()
    }

    pub fn marked_fields(&self) -> &[FieldId] {
        &self.marked
    }

    pub fn visible_indicator(&self) -> Option<Indicator> {
        self.indicator.as_ref().map(|(kind, _)| *kind)
    }

    fn read_fields(&self) -> ContactFields {
        let mut fields = ContactFields::default();
        for (id, field) in &self.fields {
            let value = field.value();
            match id {
                FieldId::Name => fields.name = value,
                FieldId::Email => fields.email = value,
                FieldId::Message => fields.message = value,
            }
        }
        fields
    }

    fn field(&self, id: FieldId) -> Option<&HtmlElement> {
        self.fields
            .iter()
            .find(|(field_id, _)| *field_id == id)
            .map(|(_, field)| field.element())
    }

    fn clear_marks(&mut self) {
        for (_, field) in &self.fields {
            dom::clear_style(field.element(), "border-color");
        }
        self.marked.clear();
    }

    fn mark_invalid(&mut self, invalid: Vec<FieldId>) {
        for id in &invalid {
            if let Some(field) = self.field(*id) {
                dom::set_style(field, "border-color", &self.config.error_border_color);
            }
        }
        self.marked = invalid;
        for id in &self.marked {
            if let Some(field) = self.field(*id) {
                if let Err(e) = shake(field, self.config.shake_duration_ms) {
                    log::warn!("shake on #{} failed: {}", id.element_id(), e);
                }
            }
        }
    }

    fn on_submit(&mut self, event: Event, scope: &Scope<Self>) {
        event.prevent_default();
        let fields = self.read_fields();
        match self.machine.submit(fields) {
            SubmitStep::Ignored => log::debug!("submit ignored, already sending"),
            SubmitStep::Rejected(report) => {
                log::info!("Contact form rejected: {:?}", report.errors());
                self.clear_marks();
                self.mark_invalid(report.invalid_fields());
            }
            SubmitStep::Accepted(fields) => {
                self.clear_marks();
                self.begin_loading();
                let scope = scope.clone();
                let pending = self.submitter.submit(
                    fields,
                    Box::new(move |outcome| scope.send_message(FormMsg::Completed(outcome))),
                );
                self.pending = Some(pending);
            }
        }
    }

    fn begin_loading(&mut self) {
        let Some(button) = &self.button else {
            return;
        };
        button.set_disabled(true);
        self.original_label = Some(button.inner_html());
        button.set_inner_html(&loading_markup(&self.config.loading_label));
        if let Err(e) = self.ensure_spin_style() {
            log::warn!("spin style not injected: {}", e);
        }
    }

    fn end_loading(&mut self) {
        let Some(button) = &self.button else {
            return;
        };
        button.set_disabled(false);
        if let Some(label) = self.original_label.take() {
            button.set_inner_html(&label);
        }
    }

    fn ensure_spin_style(&self) -> SiteResult<()> {
        if self.document.get_element_by_id(ids::SPIN_STYLE).is_some() {
            return Ok(());
        }
        let head = self.document.head().ok_or(SiteError::MissingElement("head"))?;
        let style = self.document.create_element("style")?;
        style.set_id(ids::SPIN_STYLE);
        style.set_text_content(Some(SPIN_KEYFRAMES));
        head.append_child(&style)?;
        Ok(())
    }

    fn on_completed(&mut self, outcome: Result<(), SubmitError>, scope: &Scope<Self>) {
        self.pending = None;
        match self.machine.complete(outcome) {
            Completion::Succeeded => {
                log::info!("Contact form sent");
                self.end_loading();
                self.form.reset();
                self.show_indicator(Indicator::Success, scope);
            }
            Completion::Failed(e) => {
                log::warn!("Contact form failed: {}", e);
                self.end_loading();
                self.show_indicator(Indicator::Failure, scope);
            }
            Completion::Stale => log::debug!("stale submit completion ignored"),
        }
    }

    fn show_indicator(&mut self, kind: Indicator, scope: &Scope<Self>) {
        // Replacing the slot drops, and so cancels, the previous hide timer.
        if let Some((previous, _)) = self.indicator.take() {
            if previous != kind {
                self.set_indicator(previous, false);
            }
        }
        self.set_indicator(kind, true);
        let scope = scope.clone();
        let hide = Timeout::new(self.config.indicator_visible_ms, move || {
            scope.send_message(FormMsg::HideIndicator(kind));
        });
        self.indicator = Some((kind, hide));
    }

    /// Looks the element up again each time; it may have left the page meanwhile.
    fn set_indicator(&self, kind: Indicator, visible: bool) {
        match self.document.get_element_by_id(kind.element_id()) {
            Some(el) => dom::set_class(&el, INDICATOR_ACTIVE_CLASS, visible),
            None => log::debug!("indicator #{} not on page", kind.element_id()),
        }
    }

    fn on_hide_indicator(&mut self, kind: Indicator) {
        if self.visible_indicator() == Some(kind) {
            self.indicator = None;
            self.set_indicator(kind, false);
        }
    }
}

impl Controller for ContactFormController {
    type Message = FormMsg;

    fn update(&mut self, msg: FormMsg, scope: &Scope<Self>) {
        match msg {
            FormMsg::Submit(event) => self.on_submit(event, scope),
            FormMsg::Completed(outcome) => self.on_completed(outcome, scope),
            FormMsg::HideIndicator(kind) => self.on_hide_indicator(kind),
        }
    }
}

impl Drop for ContactFormController {
    fn drop(&mut self) {
        if self.pending.take().is_some() {
            self.machine.abort();
            // The button outlives this controller and a later install reads its label.
            self.end_loading();
            log::debug!("pending submission cancelled");
        }
    }
}

fn js_object(entries: &[(&str, JsValue)]) -> SiteResult<Object> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object)
}

/// Runs the horizontal shake through `Element.animate`.
fn shake(field: &HtmlElement, duration_ms: f64) -> SiteResult<()> {
    let frames = Array::new();
    for transform in SHAKE_FRAMES {
        let frame: JsValue = js_object(&[("transform", JsValue::from_str(transform))])?.into();
        frames.push(&frame);
    }
    let options = js_object(&[
        ("duration", JsValue::from_f64(duration_ms)),
        ("easing", JsValue::from_str("ease-in-out")),
    ])?;

    let animate = Reflect::get(field, &JsValue::from_str("animate"))?
        .dyn_into::<Function>()
        .map_err(|_| SiteError::Js("Element.animate is not available".into()))?;
    animate.call2(field, &frames, &options)?;
    Ok(())
}
