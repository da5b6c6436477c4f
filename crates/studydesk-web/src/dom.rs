#![forbid(unsafe_code)]

//! Element registry for the live document.
//!
//! [`Page::collect`] runs the registration pass: every selector of the
//! document contract is queried once and the matches are kept in document
//! order, so the indices in [`Target`] resolve to the same elements the
//! listeners were attached to.

use std::cell::RefCell;
use std::collections::BTreeMap;

use studydesk_core::bindings::selectors as sel;
use studydesk_core::layout::{ContentAction, ContentButton};
use studydesk_core::nav::SectionOffset;
use studydesk_core::notify::NotificationId;
use studydesk_core::search::CardText;
use studydesk_core::{Effect, PageLayout, Target};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    ScrollBehavior, ScrollToOptions, Window,
};

/// Every element matching `selector`, in document order.
pub(crate) fn all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub(crate) fn one(document: &Document, selector: &str) -> Result<Option<HtmlElement>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

fn text_of(el: &Element, selector: &str) -> String {
    el.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|child| child.text_content())
        .unwrap_or_default()
}

/// Current value of a text control, falling back to its text content.
pub(crate) fn control_value(el: &HtmlElement) -> String {
    if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else {
        el.text_content().unwrap_or_default()
    }
}

pub(crate) struct Page {
    window: Window,
    document: Document,
    body: Option<HtmlElement>,
    navbar: Option<HtmlElement>,
    hamburger: Option<HtmlElement>,
    nav_menu: Option<HtmlElement>,
    nav_links: Vec<HtmlElement>,
    sections: Vec<HtmlElement>,
    tab_buttons: Vec<HtmlElement>,
    tab_panels: Vec<HtmlElement>,
    modal: Option<HtmlElement>,
    modal_title: Option<HtmlElement>,
    modal_content: Option<HtmlElement>,
    content_buttons: Vec<HtmlElement>,
    cards: Vec<HtmlElement>,
    hero: Option<HtmlElement>,
    floating_cards: Vec<HtmlElement>,
    reveal: Vec<HtmlElement>,
    counters: Vec<HtmlElement>,
    lazy_images: Vec<HtmlElement>,
    /// Required fields of every validated form.
    form_fields: Vec<Vec<HtmlElement>>,
    editor: Option<HtmlElement>,
    output: Option<HtmlElement>,
    run_button: Option<HtmlElement>,
    reset_button: Option<HtmlElement>,
    clear_button: Option<HtmlElement>,
    status: Option<HtmlElement>,
    has_search: bool,
    has_theme_toggle: bool,
    notifications: RefCell<BTreeMap<NotificationId, HtmlElement>>,
}

impl Page {
    pub(crate) fn collect(window: Window, document: Document) -> Result<Self, JsValue> {
        let mut form_fields = Vec::new();
        for form in all(&document, sel::VALIDATED_FORM)? {
            let list = form.query_selector_all(sel::REQUIRED_FIELD)?;
            form_fields.push(
                (0..list.length())
                    .filter_map(|idx| list.get(idx))
                    .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
                    .collect(),
            );
        }

        Ok(Self {
            body: document.body(),
            navbar: one(&document, sel::NAVBAR)?,
            hamburger: one(&document, sel::HAMBURGER)?,
            nav_menu: one(&document, sel::NAV_MENU)?,
            nav_links: all(&document, sel::NAV_LINK)?,
            sections: all(&document, sel::SECTION)?,
            tab_buttons: all(&document, sel::TAB_BUTTON)?,
            tab_panels: all(&document, sel::TAB_PANEL)?,
            modal: one(&document, sel::MODAL)?,
            modal_title: one(&document, sel::MODAL_TITLE)?,
            modal_content: one(&document, sel::MODAL_CONTENT)?,
            content_buttons: all(&document, sel::CONTENT_BUTTON)?,
            cards: all(&document, sel::CARD)?,
            hero: one(&document, sel::HERO)?,
            floating_cards: all(&document, sel::FLOATING_CARD)?,
            reveal: all(&document, sel::REVEAL)?,
            counters: all(&document, sel::COUNTER)?,
            lazy_images: all(&document, sel::LAZY_IMAGE)?,
            form_fields,
            editor: one(&document, sel::PY_EDITOR)?,
            output: one(&document, sel::PY_OUTPUT)?,
            run_button: one(&document, sel::PY_RUN)?,
            reset_button: one(&document, sel::PY_RESET)?,
            clear_button: one(&document, sel::PY_CLEAR)?,
            status: one(&document, sel::PY_STATUS)?,
            has_search: one(&document, sel::SEARCH_INPUT)?.is_some(),
            has_theme_toggle: one(&document, sel::THEME_TOGGLE)?.is_some(),
            notifications: RefCell::new(BTreeMap::new()),
            window,
            document,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn modal(&self) -> Option<&HtmlElement> {
        self.modal.as_ref()
    }

    pub(crate) fn reveal(&self) -> &[HtmlElement] {
        &self.reveal
    }

    pub(crate) fn counters(&self) -> &[HtmlElement] {
        &self.counters
    }

    pub(crate) fn lazy_images(&self) -> &[HtmlElement] {
        &self.lazy_images
    }

    /// Static description handed to the page model.
    pub(crate) fn layout(&self, saved_theme: Option<String>) -> PageLayout {
        let is_active = |el: &HtmlElement| el.class_list().contains("active");
        PageLayout {
            nav_links: self
                .nav_links
                .iter()
                .map(|link| link.get_attribute("href").unwrap_or_default())
                .collect(),
            tab_triggers: self
                .tab_buttons
                .iter()
                .map(|btn| btn.get_attribute("data-tab").unwrap_or_default())
                .collect(),
            tab_panels: self.tab_panels.iter().map(|panel| panel.id()).collect(),
            initial_tab_trigger: self.tab_buttons.iter().position(is_active),
            initial_tab_panel: self.tab_panels.iter().position(is_active),
            content_buttons: self.content_buttons.iter().map(content_button).collect(),
            cards: self
                .cards
                .iter()
                .map(|card| CardText::new(text_of(card, "h3"), text_of(card, "p")))
                .collect(),
            has_hero: self.hero.is_some(),
            floating_cards: self.floating_cards.len(),
            counters: self
                .counters
                .iter()
                .map(|el| el.text_content().unwrap_or_default())
                .collect(),
            reveal_elements: self.reveal.len(),
            lazy_images: self.lazy_images.len(),
            has_execution_panel: self.editor.is_some()
                && self.output.is_some()
                && self.run_button.is_some()
                && self.reset_button.is_some()
                && self.status.is_some(),
            has_clear_button: self.clear_button.is_some(),
            has_search: self.has_search,
            has_theme_toggle: self.has_theme_toggle,
            saved_theme,
            forms: self.form_fields.iter().map(Vec::len).collect(),
        }
    }

    /// Top offset of every `section`, measured now. Sections without an id
    /// still take part in the scan.
    pub(crate) fn section_offsets(&self) -> Vec<SectionOffset> {
        self.sections
            .iter()
            .map(|section| {
                let top = f64::from(section.offset_top());
                match section.get_attribute("id") {
                    Some(id) => SectionOffset::new(id, top),
                    None => SectionOffset::anonymous(top),
                }
            })
            .collect()
    }

    pub(crate) fn editor_source(&self) -> String {
        self.editor.as_ref().map(control_value).unwrap_or_default()
    }

    pub(crate) fn form_values(&self, form: usize) -> Vec<String> {
        self.form_fields
            .get(form)
            .map(|fields| fields.iter().map(control_value).collect())
            .unwrap_or_default()
    }

    fn element(&self, target: Target) -> Option<HtmlElement> {
        let found = match target {
            Target::Body => self.body.clone(),
            Target::Navbar => self.navbar.clone(),
            Target::Hamburger => self.hamburger.clone(),
            Target::NavMenu => self.nav_menu.clone(),
            Target::NavLink(idx) => self.nav_links.get(idx).cloned(),
            Target::TabButton(idx) => self.tab_buttons.get(idx).cloned(),
            Target::TabPanel(idx) => self.tab_panels.get(idx).cloned(),
            Target::Modal => self.modal.clone(),
            Target::ModalTitle => self.modal_title.clone(),
            Target::ModalContent => self.modal_content.clone(),
            Target::ContentButton(idx) => self.content_buttons.get(idx).cloned(),
            Target::Card(idx) => self.cards.get(idx).cloned(),
            Target::Hero => self.hero.clone(),
            Target::FloatingCard(idx) => self.floating_cards.get(idx).cloned(),
            Target::Reveal(idx) => self.reveal.get(idx).cloned(),
            Target::Counter(idx) => self.counters.get(idx).cloned(),
            Target::LazyImage(idx) => self.lazy_images.get(idx).cloned(),
            Target::FormField { form, field } => self
                .form_fields
                .get(form)
                .and_then(|fields| fields.get(field))
                .cloned(),
            Target::RunButton => self.run_button.clone(),
            Target::PyStatus => self.status.clone(),
            Target::PyOutput => self.output.clone(),
            Target::Notification(id) => self.notifications.borrow().get(&id).cloned(),
        };
        if found.is_none() {
            tracing::debug!(?target, "effect target not in document");
        }
        found
    }

    /// Apply one DOM effect. Effects the shell handles elsewhere are ignored.
    pub(crate) fn patch(&self, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::SetClass { target, class, on } => {
                if let Some(el) = self.element(target) {
                    el.class_list().toggle_with_force(class, on)?;
                }
            }
            Effect::SetText { target, text } => {
                if let Some(el) = self.element(target) {
                    el.set_text_content(Some(&text));
                }
            }
            Effect::SetHtml { target, html } => {
                if let Some(el) = self.element(target) {
                    el.set_inner_html(&html);
                }
            }
            Effect::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.element(target) {
                    el.style().set_property(property, &value)?;
                }
            }
            Effect::SetDisabled { target, disabled } => {
                if let Some(el) = self.element(target) {
                    el.toggle_attribute_with_force("disabled", disabled)?;
                }
            }
            Effect::AppendLog { stream, text } => {
                if let Some(output) = self.element(Target::PyOutput) {
                    let line = self.document.create_element("div")?;
                    line.set_class_name(stream.css_class());
                    line.set_text_content(Some(&text));
                    output.append_child(&line)?;
                    output.set_scroll_top(output.scroll_height());
                }
            }
            Effect::ClearLog => {
                if let Some(output) = self.element(Target::PyOutput) {
                    output.set_inner_html("");
                }
            }
            Effect::ScrollTo { top } => {
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(ScrollBehavior::Smooth);
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            Effect::OpenDownload { href } => self.open_download(&href)?,
            Effect::MountNotification {
                id,
                severity,
                html,
                style,
            } => {
                let Some(body) = self.body.as_ref() else {
                    return Ok(());
                };
                let el = self
                    .document
                    .create_element("div")?
                    .dyn_into::<HtmlElement>()
                    .map_err(JsValue::from)?;
                el.set_class_name(&format!("notification notification-{}", severity.as_str()));
                el.set_inner_html(&html);
                el.set_attribute("style", &style)?;
                body.append_child(&el)?;
                self.notifications.borrow_mut().insert(id, el);
            }
            Effect::RemoveNotification(id) => {
                if let Some(el) = self.notifications.borrow_mut().remove(&id) {
                    el.remove();
                }
            }
            Effect::LoadImage(idx) => {
                if let Some(img) = self.element(Target::LazyImage(idx)) {
                    if let Some(src) = img.get_attribute("data-src") {
                        img.set_attribute("src", &src)?;
                    }
                    img.class_list().remove_1("lazy")?;
                }
            }
            other => tracing::debug!(?other, "not a DOM effect"),
        }
        Ok(())
    }

    /// Navigate through a transient anchor so popup blockers treat it as a
    /// user-initiated link.
    fn open_download(&self, href: &str) -> Result<(), JsValue> {
        let Some(body) = self.body.as_ref() else {
            return Ok(());
        };
        let anchor = self
            .document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(JsValue::from)?;
        anchor.set_href(href);
        anchor.set_target("_blank");
        anchor.set_rel("noopener");
        body.append_child(&anchor)?;
        anchor.click();
        anchor.remove();
        Ok(())
    }
}

fn content_button(btn: &HtmlElement) -> ContentButton {
    let action = if btn.class_list().contains(sel::DOWNLOAD_BUTTON_CLASS) {
        ContentAction::Download
    } else {
        ContentAction::Preview
    };
    ContentButton {
        action,
        subject: btn
            .get_attribute("data-subject")
            .or_else(|| btn.get_attribute("data-type"))
            .unwrap_or_default(),
        remote_token: btn
            .closest(sel::CARD)
            .ok()
            .flatten()
            .and_then(|card| card.get_attribute("data-drive-id")),
        label: btn.text_content().unwrap_or_default(),
    }
}
