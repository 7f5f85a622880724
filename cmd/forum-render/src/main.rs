//! # forum-render
//!
//! Renders a post body read from stdin the same way the forum does when a
//! post is saved, using the settings from `forum.toml` / `FORUM__*`.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use configs::ForumSettings;
use domains::MarkupMode;
use services::PostRenderer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "forum-render", version, about)]
struct Cli {
    /// Markup of the input (`bbcode` or `markdown`); defaults to the configured markup
    #[arg(long, short)]
    markup: Option<String>,

    /// Settings file to load instead of `forum.toml`
    #[arg(long, short, env = "FORUM_CONFIG")]
    config: Option<PathBuf>,

    /// Do not replace emoticons with images
    #[arg(long)]
    no_smilies: bool,

    /// Print the tag-free text instead of HTML
    #[arg(long)]
    text: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    if std::env::var("FORUM_LOG_JSON").is_ok_and(|v| v == "1") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut settings = ForumSettings::load(cli.config.as_deref()).context("loading forum settings")?;
    if cli.no_smilies {
        settings.smilies_support = false;
    }

    let markup = match cli.markup.as_deref() {
        Some(m) => m.parse::<MarkupMode>()?,
        None => settings.default_markup,
    };

    let mut body = String::new();
    io::stdin().read_to_string(&mut body).context("reading post body from stdin")?;

    let renderer = PostRenderer::from_settings(&settings)?;
    let html = renderer.render_html(&body, markup);
    tracing::info!(%markup, input = body.len(), output = html.len(), "rendered post");

    let mut stdout = io::stdout().lock();
    if cli.text {
        writeln!(stdout, "{}", services::strip_tags(&html))?;
    } else {
        writeln!(stdout, "{html}")?;
    }
    Ok(())
}
