#![warn(clippy::nursery, clippy::pedantic)]
#![deny(unsafe_code)]

// Pastebin Lite CLI Client
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

use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use atty::Stream;
use clap::Parser;
use indicatif::ProgressBar;
use pastebin_lite_common::config::{self, DEFAULT_API_URL};
use pastebin_lite_common::route::paste_id;
use pastebin_lite_common::ui::{Composer, Viewer};
use pastebin_lite_common::{Client, CreatedPaste, Url};
use tracing::{debug, Level};

#[derive(Parser)]
#[clap(version, about)]
struct Opts {
    /// The Pastebin Lite backend to talk to.
    #[clap(long, env = "PASTEBIN_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    /// Log requests to stderr.
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    action: Action,
}

#[derive(Parser)]
enum Action {
    /// Uploads a paste and prints its shareable link.
    Create {
        /// Seconds until the paste expires.
        #[clap(long)]
        ttl: Option<String>,
        /// How many times the paste may be viewed.
        #[clap(long)]
        max_views: Option<String>,
        /// Web front end that share links should point at.
        #[clap(long, env = "PASTEBIN_WEB_URL")]
        web_url: Option<Url>,
        /// File to upload. Reads stdin if omitted.
        path: Option<PathBuf>,
    },
    /// Prints a paste. Counts as a view.
    Get {
        /// A paste id or share link.
        paste: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if opts.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let client = Client::new(config::api_url(Some(opts.api_url.as_str()))?)?;
    debug!(api_url = %client.base_url(), "configured backend");

    match opts.action {
        Action::Create {
            ttl,
            max_views,
            web_url,
            path,
        } => {
            handle_create(
                &client,
                read_content(path)?,
                ttl.unwrap_or_default(),
                max_views.unwrap_or_default(),
                web_url,
            )
            .await
        }
        Action::Get { paste } => handle_get(&client, &paste).await,
    }?;

    Ok(())
}

fn read_content(path: Option<PathBuf>) -> Result<String> {
    if let Some(path) = path {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    if atty::is(Stream::Stdin) {
        bail!("Nothing to upload. Pass a file or pipe text on stdin.");
    }

    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read stdin")?;
    Ok(content)
}

async fn handle_create(
    client: &Client,
    content: String,
    ttl: String,
    max_views: String,
    web_url: Option<Url>,
) -> Result<()> {
    let mut composer = Composer::new();
    composer.content = content;
    composer.ttl = ttl;
    composer.max_views = max_views;

    let paste = match composer.begin() {
        Some(paste) => paste,
        None => match composer.error() {
            Some(e) => bail!("{e}"),
            None => bail!("Refusing to upload an empty paste."),
        },
    };

    let spinner = spinner(composer.button_label());
    let result = client.create_paste(&paste).await;
    spinner.finish_and_clear();

    let origin = web_url
        .or_else(|| result.as_ref().ok().and_then(server_link))
        .unwrap_or_else(|| client.base_url().clone());
    composer.finish(result, &origin);

    if let Some(e) = composer.error() {
        bail!("{e}");
    }

    let created = composer
        .created()
        .context("Server accepted the paste but sent no id")?;
    println!("{}", created.link);
    eprintln!("ID: {}", created.paste.id);

    Ok(())
}

/// The server's own link for a paste, used as the share link origin when no
/// web front end is configured.
fn server_link(paste: &CreatedPaste) -> Option<Url> {
    paste.url.as_deref().and_then(|url| Url::parse(url).ok())
}

async fn handle_get(client: &Client, input: &str) -> Result<()> {
    let id = paste_id(input).with_context(|| format!("{input:?} is not a paste id or link"))?;

    let mut viewer = Viewer::new();
    let id = viewer
        .begin(Some(id.as_str()))
        .context("Nothing to fetch")?;

    let spinner = spinner("Fetching paste...");
    let result = client.get_paste(&id).await;
    spinner.finish_and_clear();

    viewer.finish(&id, result);

    if let Some(e) = viewer.error() {
        bail!("{e}");
    }

    let paste = viewer.retrieved().context("Server sent no paste")?;
    std::io::stdout().write_all(paste.content.as_bytes())?;
    if atty::is(Stream::Stdout) && !paste.content.ends_with('\n') {
        println!();
    }

    eprintln!("{}", paste.views_label());
    eprintln!("{}", paste.expiry_label());

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
