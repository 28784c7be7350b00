//! Non-interactive rendering of a page state.
//!
//! `--print` writes the flowed page plus a short header, `--json` writes a
//! [`Report`] through `serde_json`. Both reflect the model after the optional
//! starting category and search have been applied.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::app::{Model, ViewState};
use crate::page::Page;
use crate::search::{METHOD_CLASS, MethodEntry};
use crate::stats::MethodStats;

/// Width used to flow the page when there is no terminal.
pub const REPORT_WIDTH: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Carries the search-match emphasis.
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub methods: Vec<MethodReport>,
}

/// Snapshot of what the page currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub file: String,
    /// One of `default`, `category`, `search`, `no-results`.
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub matched_methods: usize,
    pub no_results: bool,
    pub visible_sections: Vec<SectionReport>,
    pub stats: MethodStats,
}

impl Report {
    pub fn from_model(model: &Model) -> Self {
        let (state, category, query) = match &model.view {
            ViewState::Default => ("default", None, None),
            ViewState::Category(category) => ("category", Some(category.clone()), None),
            ViewState::Search { query, .. } => ("search", None, Some(query.clone())),
            ViewState::NoResults { query } => ("no-results", None, Some(query.clone())),
        };
        let visible_sections: Vec<SectionReport> = model
            .page
            .visible_sections()
            .into_iter()
            .map(|section| section_report(&model.page, section))
            .collect();
        let matched_methods = model
            .last_outcome
            .as_ref()
            .filter(|_| query.is_some())
            .map_or(0, |outcome| outcome.matched_methods);

        Self {
            file: model.file_path.display().to_string(),
            state,
            category,
            query,
            matched_methods,
            no_results: model.page.is_no_results_visible(),
            visible_sections,
            stats: model.stats.clone(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

fn section_report(page: &Page, section: crate::dom::NodeId) -> SectionReport {
    let dom = page.dom();
    let methods = dom
        .query_class(section, METHOD_CLASS)
        .into_iter()
        .map(|node| {
            let entry = MethodEntry::read(dom, node);
            MethodReport {
                name: entry.name.trim().to_string(),
                description: entry
                    .description
                    .map(|description| description.trim().to_string()),
                matched: page.is_emphasized(node),
            }
        })
        .collect();
    SectionReport {
        id: dom.attr(section, "id").map(ToOwned::to_owned),
        category: page.category(section).map(ToOwned::to_owned),
        methods,
    }
}

/// The flowed page under a one-line header.
pub fn render_text(model: &Model) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", model.file_path.display(), model.view.label());
    let _ = writeln!(out, "{}", model.stats.total_line());
    out.push('\n');
    out.push_str(&model.flow.plain_text());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::app::App;

    const FIXTURE: &str = include_str!("../tests/fixtures/reference.html");

    fn report_model(category: Option<&str>, search: Option<&str>) -> Model {
        let page = Page::attach(crate::dom::parse_html(FIXTURE).unwrap());
        App::new(PathBuf::from("reference.html"))
            .with_category(category.map(ToOwned::to_owned))
            .with_search(search.map(ToOwned::to_owned))
            .prepare_model(page, (REPORT_WIDTH, 50))
    }

    #[test]
    fn test_default_report_lists_intro_only() {
        let report = Report::from_model(&report_model(None, None));
        assert_eq!(report.state, "default");
        assert_eq!(report.visible_sections.len(), 1);
        assert_eq!(report.visible_sections[0].id.as_deref(), Some("intro"));
        assert!(report.visible_sections[0].methods.is_empty());
        assert_eq!(report.stats.total(), 12);
    }

    #[test]
    fn test_search_report_marks_matches() {
        let report = Report::from_model(&report_model(None, Some("Playlist")));
        assert_eq!(report.state, "search");
        assert_eq!(report.query.as_deref(), Some("playlist"));
        assert_eq!(report.matched_methods, 3);
        let ids: Vec<_> = report
            .visible_sections
            .iter()
            .filter_map(|section| section.id.as_deref())
            .collect();
        assert_eq!(ids, ["list", "playlist"]);
        assert!(
            report
                .visible_sections
                .iter()
                .flat_map(|section| &section.methods)
                .all(|method| method.matched)
        );
    }

    #[test]
    fn test_category_report_and_json_shape() {
        let report = Report::from_model(&report_model(Some("playlist"), None));
        assert_eq!(report.category.as_deref(), Some("playlist"));
        assert_eq!(report.matched_methods, 0);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["state"], "category");
        assert_eq!(json["visible_sections"][0]["methods"][0]["name"], "create_Playlist");
        assert_eq!(json["stats"]["total"], 12);
        assert!(json.get("query").is_none());
    }

    #[test]
    fn test_no_results_report() {
        let model = report_model(None, Some("zzz-no-match"));
        let report = Report::from_model(&model);
        assert_eq!(report.state, "no-results");
        assert!(report.no_results);
        assert!(report.visible_sections.is_empty());

        let text = render_text(&model);
        assert!(text.starts_with("reference.html: No results for"));
        assert!(text.contains("Try the following:"));
    }
}
