#![warn(clippy::nursery, clippy::pedantic)]

// Pastebin Lite Web Frontend
// Copyright (C) 2026  Pastebin Lite contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use gloo_console::{error, log};
use pastebin_lite_common::config;
use pastebin_lite_common::route::{Route, RouteTracker};
use pastebin_lite_common::ui::Panels;
use pastebin_lite_common::{Client, Url};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Location, Window};

use crate::util::listen;
use crate::view::Page;

mod util;
mod view;

/// Backend base URL, fixed when the bundle is built.
const API_URL: Option<&str> = option_env!("PASTEBIN_API_URL");

fn window() -> Window {
    web_sys::window().expect("Failed to get a reference of the window")
}

fn location() -> Location {
    window().location()
}

struct App {
    client: Client,
    origin: Url,
    page: Page,
    panels: RefCell<Panels>,
    routes: RefCell<RouteTracker>,
}

impl App {
    fn render(&self) {
        self.page.render(&self.panels.borrow());
    }
}

#[wasm_bindgen]
pub fn start() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    if let Err(e) = mount() {
        error!(format!("[rs] Failed to start: {e:#}"));
    }
}

fn mount() -> Result<()> {
    let client = Client::new(config::api_url(API_URL)?)?;
    log!(format!("[rs] Using backend at {}", client.base_url()));

    let origin = location()
        .origin()
        .map_err(|_| anyhow!("Failed to read page origin"))?;
    let origin = Url::parse(&origin).context("Page origin is not a valid url")?;

    let document = window().document().context("Missing document")?;
    let root = match document.get_element_by_id("root") {
        Some(root) => root,
        None => document
            .body()
            .context("Page has neither #root nor a body")?
            .into(),
    };

    let app = Rc::new(App {
        client,
        origin,
        page: Page::build(&document, &root)?,
        panels: RefCell::new(Panels::default()),
        routes: RefCell::new(RouteTracker::new()),
    });

    bind_inputs(&app)?;

    let on_create = Rc::clone(&app);
    listen(&app.page.create, "click", move |_| create(&on_create))?;

    let on_fetch = Rc::clone(&app);
    listen(&app.page.fetch, "click", move |_| retrieve(&on_fetch, None))?;

    let on_title = Rc::clone(&app);
    listen(&app.page.title, "click", move |_| go_home(&on_title))?;

    let on_history = Rc::clone(&app);
    listen(&window(), "popstate", move |_| follow_route(&on_history))?;

    app.render();
    follow_route(&app);
    Ok(())
}

fn bind_inputs(app: &Rc<App>) -> Result<()> {
    let handle = Rc::clone(app);
    listen(&app.page.content, "input", move |_| {
        handle.panels.borrow_mut().composer.content = handle.page.content.value();
        handle.render();
    })?;

    let handle = Rc::clone(app);
    listen(&app.page.ttl, "input", move |_| {
        handle.panels.borrow_mut().composer.ttl = handle.page.ttl.value();
    })?;

    let handle = Rc::clone(app);
    listen(&app.page.max_views, "input", move |_| {
        handle.panels.borrow_mut().composer.max_views = handle.page.max_views.value();
    })?;

    let handle = Rc::clone(app);
    listen(&app.page.search, "input", move |_| {
        handle.panels.borrow_mut().viewer.search_id = handle.page.search.value();
    })?;

    Ok(())
}

fn create(app: &Rc<App>) {
    let request = app.panels.borrow_mut().composer.begin();
    app.render();

    let Some(paste) = request else {
        return;
    };

    let app = Rc::clone(app);
    spawn_local(async move {
        let result = app.client.create_paste(&paste).await;
        if let Err(e) = &result {
            log!(format!("[rs] Create failed: {e:?}"));
        }
        app.panels.borrow_mut().composer.finish(result, &app.origin);
        app.render();
    });
}

fn retrieve(app: &Rc<App>, id_override: Option<&str>) {
    let request = app.panels.borrow_mut().viewer.begin(id_override);
    app.render();

    let Some(id) = request else {
        return;
    };

    let app = Rc::clone(app);
    spawn_local(async move {
        let result = app.client.get_paste(&id).await;
        if let Err(e) = &result {
            log!(format!("[rs] Fetch of {id} failed: {e:?}"));
        }

        let new_path = app.panels.borrow_mut().viewer.finish(&id, result);
        if let Some(path) = new_path {
            app.routes.borrow_mut().rewrote(&id);
            if window()
                .history()
                .and_then(|history| {
                    history.replace_state_with_url(&JsValue::NULL, "", Some(path.as_str()))
                })
                .is_err()
            {
                error!("[rs] Failed to update the address bar");
            }
        }
        app.render();
    });
}

/// Fetches the paste named by the address bar, once per id.
fn follow_route(app: &Rc<App>) {
    let path = location().pathname().unwrap_or_default();
    let id = app.routes.borrow_mut().observe(&Route::from_path(&path));
    if let Some(id) = id {
        retrieve(app, Some(id.as_str()));
    }
}

fn go_home(app: &Rc<App>) {
    let home = Route::Home;
    if window()
        .history()
        .and_then(|history| {
            history.push_state_with_url(&JsValue::NULL, "", Some(home.path().as_str()))
        })
        .is_err()
    {
        error!("[rs] Failed to navigate home");
        return;
    }
    app.routes.borrow_mut().reset();
}
