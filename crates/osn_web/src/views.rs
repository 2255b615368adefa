//! Server-rendered HTML for the create and list views. Markup lives in
//! `templates/`; askama escapes every interpolated value unless a template
//! marks it `safe`.

use askama::Template;
use chrono::NaiveDateTime;
use osn_core::{ArticleSummary, Error, ProjectStats, Result};
use osn_scrapers::CurationOutcome;

use crate::state::View;

pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

fn nav(current: View) -> Vec<NavItem> {
    View::ALL
        .iter()
        .map(|v| NavItem {
            path: v.path(),
            label: v.label(),
            active: *v == current,
        })
        .collect()
}

/// A rendered article. `html` comes from `markdown::to_html`, which escapes
/// raw HTML in the source.
pub struct ArticleCard {
    pub title: String,
    pub meta: Vec<String>,
    pub html: String,
}

#[derive(Template)]
#[template(path = "create.html")]
struct CreateTemplate<'a> {
    title: &'static str,
    nav: Vec<NavItem>,
    action: &'static str,
    notices: Vec<&'a str>,
    text: &'a str,
    card: Option<&'a ArticleCard>,
    projects: &'a [ProjectStats],
    companies: &'a [String],
    saved: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "list.html")]
struct ListTemplate<'a> {
    title: &'static str,
    nav: Vec<NavItem>,
    action: &'static str,
    create_path: &'static str,
    query: &'a str,
    cards: Vec<ArticleCard>,
    total: usize,
}

fn render(page: impl Template) -> Result<String> {
    page.render().map_err(|e| Error::External(e.into()))
}

fn format_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

pub fn create_page(text: &str, outcome: Option<&CurationOutcome>, extra_notices: &[String]) -> Result<String> {
    let article = outcome.map(|o| &o.article);
    let card = article
        .filter(|a| !a.title.is_empty() && !a.body.is_empty())
        .map(|a| ArticleCard {
            title: a.title.clone(),
            meta: vec![
                format!("📅 {}", format_time(&a.created_at)),
                format!("👀 Projects: {}", a.projects.len()),
                format!("🏢 Companies: {}", a.companies.len()),
            ],
            html: markdown::to_html(&a.body),
        });

    render(CreateTemplate {
        title: View::Create.label(),
        nav: nav(View::Create),
        action: View::Create.path(),
        notices: extra_notices
            .iter()
            .chain(outcome.into_iter().flat_map(|o| o.notices.iter()))
            .map(String::as_str)
            .collect(),
        text,
        card: card.as_ref(),
        projects: article.map(|a| a.projects.as_slice()).unwrap_or_default(),
        companies: article.map(|a| a.companies.as_slice()).unwrap_or_default(),
        saved: outcome.and_then(|o| o.filename.as_deref()),
    })
}

/// `cards` pairs each summary with the article's full Markdown.
pub fn list_page(query: &str, cards: &[(ArticleSummary, String)], total: usize) -> Result<String> {
    let cards = cards
        .iter()
        .map(|(summary, source)| ArticleCard {
            title: summary.title.clone(),
            meta: vec![format!("📅 Published {}", format_time(&summary.created_at))],
            html: markdown::to_html(source),
        })
        .collect();

    render(ListTemplate {
        title: View::List.label(),
        nav: nav(View::List),
        action: View::List.path(),
        create_path: View::Create.path(),
        query,
        cards,
        total,
    })
}
