//! The page markup and how panel state maps onto it.

use anyhow::Result;
use pastebin_lite_common::ui::{Panels, MAX_VIEWS_LABEL, TTL_LABEL};
use web_sys::{
    Document, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, Node,
};

use crate::util::{append_all, element, set_shown, text_element};

pub struct Page {
    pub title: HtmlElement,

    pub content: HtmlTextAreaElement,
    pub ttl: HtmlInputElement,
    pub max_views: HtmlInputElement,
    pub create: HtmlButtonElement,
    create_error: HtmlElement,
    success: HtmlElement,
    link: HtmlAnchorElement,
    created_id: HtmlElement,

    pub search: HtmlInputElement,
    pub fetch: HtmlButtonElement,
    fetch_error: HtmlElement,
    result: HtmlElement,
    views: HtmlElement,
    expiry: HtmlElement,
    read_area: HtmlTextAreaElement,
}

impl Page {
    /// Builds the page under `root`.
    pub fn build(document: &Document, root: &Node) -> Result<Self> {
        let container: HtmlElement = element(document, "div", "container")?;

        let header: HtmlElement = element(document, "header", "")?;
        let title: HtmlElement = text_element(document, "h1", "", "Pastebin Lite")?;
        let subtitle: HtmlElement = text_element(
            document,
            "p",
            "subtitle",
            "Secure, temporary text sharing with auto-expiry.",
        )?;
        append_all(&header, &[&title, &subtitle])?;

        let grid: HtmlElement = element(document, "div", "grid-layout")?;

        // Create card
        let create_card: HtmlElement = element(document, "div", "card")?;
        let create_heading: HtmlElement = text_element(document, "h2", "", "Create New Paste")?;
        let content: HtmlTextAreaElement = element(document, "textarea", "input-area")?;
        content.set_placeholder("Paste your code or text here...");

        let options: HtmlElement = element(document, "div", "options-row")?;
        let (ttl_group, ttl) = number_input(document, TTL_LABEL, "e.g. 60")?;
        let (max_views_group, max_views) = number_input(document, MAX_VIEWS_LABEL, "e.g. 5")?;
        append_all(&options, &[&ttl_group, &max_views_group])?;

        let create: HtmlButtonElement = element(document, "button", "primary-btn")?;
        let create_error: HtmlElement = element(document, "div", "error-msg")?;

        let success: HtmlElement = element(document, "div", "success-box")?;
        let success_heading: HtmlElement =
            text_element(document, "strong", "", "Paste Created Successfully!")?;
        let url_display: HtmlElement = element(document, "div", "url-display")?;
        let link: HtmlAnchorElement = element(document, "a", "")?;
        link.set_target("_blank");
        link.set_rel("noreferrer");
        append_all(&url_display, &[&link])?;
        let created_id: HtmlElement = element(document, "p", "created-id")?;
        append_all(&success, &[&success_heading, &url_display, &created_id])?;

        append_all(
            &create_card,
            &[
                &create_heading,
                &content,
                &options,
                &create,
                &create_error,
                &success,
            ],
        )?;

        // Retrieve card
        let retrieve_card: HtmlElement = element(document, "div", "card")?;
        let retrieve_heading: HtmlElement = text_element(document, "h2", "", "Retrieve Paste")?;
        let search_bar: HtmlElement = element(document, "div", "search-bar")?;
        let search: HtmlInputElement = element(document, "input", "")?;
        search.set_type("text");
        search.set_placeholder("Enter Paste ID (e.g. a8s7d9f8)");
        let fetch: HtmlButtonElement = element(document, "button", "primary-btn")?;
        append_all(&search_bar, &[&search, &fetch])?;
        let fetch_error: HtmlElement = element(document, "div", "error-msg")?;

        let result: HtmlElement = element(document, "div", "result-section")?;
        let tags: HtmlElement = element(document, "div", "meta-tags")?;
        let views: HtmlElement = element(document, "span", "tag")?;
        let expiry: HtmlElement = element(document, "span", "tag")?;
        append_all(&tags, &[&views, &expiry])?;
        let read_area: HtmlTextAreaElement = element(document, "textarea", "read-area")?;
        read_area.set_read_only(true);
        append_all(&result, &[&tags, &read_area])?;

        append_all(
            &retrieve_card,
            &[&retrieve_heading, &search_bar, &fetch_error, &result],
        )?;

        append_all(&grid, &[&create_card, &retrieve_card])?;
        append_all(&container, &[&header, &grid])?;
        append_all(root, &[&container])?;

        Ok(Self {
            title,
            content,
            ttl,
            max_views,
            create,
            create_error,
            success,
            link,
            created_id,
            search,
            fetch,
            fetch_error,
            result,
            views,
            expiry,
            read_area,
        })
    }

    /// Brings the markup in line with `panels`. Inputs are only written when
    /// they differ, so typing is never disturbed.
    pub fn render(&self, panels: &Panels) {
        let composer = &panels.composer;
        sync_value(&self.content.value(), &composer.content, |v| {
            self.content.set_value(v);
        });
        self.create.set_text_content(Some(composer.button_label()));
        self.create.set_disabled(!composer.can_submit());
        show_error(&self.create_error, composer.error());

        match composer.created() {
            Some(created) => {
                self.link.set_href(created.link.as_str());
                self.link.set_text_content(Some(created.link.as_str()));
                self.created_id
                    .set_text_content(Some(format!("ID: {}", created.paste.id).as_str()));
                set_shown(&self.success, true);
            }
            None => set_shown(&self.success, false),
        }

        let viewer = &panels.viewer;
        sync_value(&self.search.value(), &viewer.search_id, |v| {
            self.search.set_value(v);
        });
        self.fetch.set_text_content(Some(viewer.button_label()));
        self.fetch.set_disabled(viewer.is_busy());
        show_error(&self.fetch_error, viewer.error());

        match viewer.retrieved() {
            Some(paste) => {
                self.views.set_text_content(Some(paste.views_label().as_str()));
                self.expiry.set_text_content(Some(paste.expiry_label().as_str()));
                self.read_area.set_value(&paste.content);
                set_shown(&self.result, true);
            }
            None => {
                self.read_area.set_value("");
                set_shown(&self.result, false);
            }
        }
    }
}

fn number_input(
    document: &Document,
    label: &str,
    placeholder: &str,
) -> Result<(HtmlElement, HtmlInputElement)> {
    let group: HtmlElement = element(document, "div", "input-group")?;
    let label: HtmlElement = text_element(document, "label", "", label)?;
    let input: HtmlInputElement = element(document, "input", "")?;
    input.set_type("number");
    input.set_placeholder(placeholder);
    append_all(&group, &[&label, &input])?;
    Ok((group, input))
}

fn sync_value(current: &str, wanted: &str, set: impl FnOnce(&str)) {
    if current != wanted {
        set(wanted);
    }
}

fn show_error(element: &HtmlElement, error: Option<&str>) {
    element.set_text_content(error);
    set_shown(element, error.is_some());
}
