use anyhow::{anyhow, Result};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, Node};

/// Creates a `<tag>` with the given class, cast to the element type the
/// caller expects.
pub fn element<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T> {
    let element = document
        .create_element(tag)
        .map_err(|_| anyhow!("Failed to create <{tag}>"))?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    element
        .dyn_into()
        .map_err(|_| anyhow!("<{tag}> has an unexpected element type"))
}

/// Like [`element`], with text content.
pub fn text_element<T: JsCast>(document: &Document, tag: &str, class: &str, text: &str) -> Result<T> {
    let element: HtmlElement = element(document, tag, class)?;
    element.set_text_content(Some(text));
    element
        .dyn_into()
        .map_err(|_| anyhow!("<{tag}> has an unexpected element type"))
}

pub fn append_all(parent: &Node, children: &[&Node]) -> Result<()> {
    for child in children {
        parent
            .append_child(child)
            .map_err(|_| anyhow!("Failed to attach element"))?;
    }
    Ok(())
}

/// Registers `handler` for `event` for the lifetime of the page.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, closure.into_js_value().unchecked_ref())
        .map_err(|_| anyhow!("Failed to listen for {event}"))
}

pub fn set_shown(element: &HtmlElement, shown: bool) {
    element.set_hidden(!shown);
}
