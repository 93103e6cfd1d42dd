use std::path::PathBuf;

use tracker_core::{text, AppViewModel, ResultsView, SiteOptionView, StatusIndicator, TrackingView};

/// What the terminal should do to catch up with a new view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Line(String),
    Progress {
        job_id: String,
        label: &'static str,
        percent: u8,
        details: String,
    },
    FinishProgress(String),
    AbandonProgress(String),
    ClearProgress,
    Saved(PathBuf),
}

/// Diffs `view` against the last rendered one. With no previous view
/// everything visible is rendered.
pub fn render(prev: Option<&AppViewModel>, view: &AppViewModel) -> Vec<TerminalCommand> {
    let mut cmds = Vec::new();

    if prev.map_or(true, |p| p.sites != view.sites) {
        cmds.extend(render_sites(&view.sites));
    }

    match prev {
        None => cmds.push(TerminalCommand::Line(format_form(view))),
        Some(p) => {
            if p.selected_site != view.selected_site {
                if let Some(label) = selected_label(view) {
                    cmds.push(TerminalCommand::Line(format!("Site: {label}")));
                }
            }
            if p.submit_label != view.submit_label && view.submit_label == text::SUBMIT_BUSY {
                cmds.push(TerminalCommand::Line(text::SUBMIT_BUSY.to_string()));
            }
        }
    }

    match (prev.and_then(|p| p.tracking.as_ref()), view.tracking.as_ref()) {
        (before, Some(now)) if before != Some(now) => cmds.push(render_tracking(now)),
        (Some(_), None) => cmds.push(TerminalCommand::ClearProgress),
        _ => {}
    }

    if let Some(results) = &view.results {
        if prev.map_or(true, |p| p.results.as_ref() != Some(results)) {
            cmds.extend(render_results(results));
        }
    }

    if let Some(p) = prev {
        if p.download_label != view.download_label && view.download_label == text::DOWNLOAD_BUSY {
            cmds.push(TerminalCommand::Line(text::DOWNLOAD_BUSY.to_string()));
        }
    }
    if let Some(path) = &view.last_download {
        if prev.map_or(true, |p| p.last_download.as_ref() != Some(path)) {
            cmds.push(TerminalCommand::Saved(path.clone()));
        }
    }

    cmds
}

fn render_sites(sites: &[SiteOptionView]) -> Vec<TerminalCommand> {
    if let [only] = sites {
        if !only.enabled {
            return vec![TerminalCommand::Line(only.label.clone())];
        }
    }
    let entries: Vec<_> = sites.iter().filter(|site| !site.key.is_empty()).collect();
    if entries.is_empty() {
        return Vec::new();
    }
    std::iter::once(TerminalCommand::Line("Sites disponíveis:".to_string()))
        .chain(
            entries
                .into_iter()
                .map(|site| TerminalCommand::Line(format!("  - {}: {}", site.key, site.label))),
        )
        .collect()
}

fn selected_label(view: &AppViewModel) -> Option<&str> {
    let key = view.selected_site.as_deref()?;
    view.sites
        .iter()
        .find(|site| site.key == key)
        .map(|site| site.label.as_str())
}

fn format_form(view: &AppViewModel) -> String {
    format!(
        "Site: {} | Termo: {:?} | {}",
        selected_label(view).unwrap_or("-"),
        view.search_term,
        if view.submit_enabled {
            "pronto"
        } else {
            view.submit_label
        }
    )
}

fn render_tracking(tracking: &TrackingView) -> TerminalCommand {
    let label = tracking.indicator.label();
    if let Some(error) = &tracking.error {
        return TerminalCommand::AbandonProgress(format!("{label} {error}"));
    }
    if tracking.indicator == StatusIndicator::Completed {
        return TerminalCommand::FinishProgress(format!("{label} {}", tracking.details));
    }
    TerminalCommand::Progress {
        job_id: tracking.job_id.to_string(),
        label,
        percent: tracking.progress,
        details: tracking.details.clone(),
    }
}

fn render_results(results: &ResultsView) -> Vec<TerminalCommand> {
    let mut cmds = vec![TerminalCommand::Line(results.plain_summary.clone())];
    for (i, row) in results.plain_rows.iter().enumerate() {
        cmds.push(TerminalCommand::Line(format!("{:2}. {}", i + 1, row.name)));
        cmds.push(TerminalCommand::Line(format!("    Preço: {}", row.price)));
        cmds.push(TerminalCommand::Line(format!(
            "    Avaliação: {} | Vendas: {}",
            row.rating, row.sales
        )));
        cmds.push(TerminalCommand::Line(format!("    Link: {}", row.link)));
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracker_core::{update, AppState, JobId, LaunchTicket, Msg, Site, StatusReport};
    use tracker_core::{Item, JobStatus};

    fn apply(state: AppState, msgs: Vec<Msg>) -> AppState {
        msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
    }

    fn tracking_state() -> AppState {
        apply(
            AppState::new(),
            vec![
                Msg::SitesLoaded(Ok(vec![Site::new("shop_a", "Shop A")])),
                Msg::SiteSelected("shop_a".to_string()),
                Msg::SearchTermChanged("phone".to_string()),
                Msg::SubmitClicked,
                Msg::JobCreated {
                    ticket: LaunchTicket(1),
                    result: Ok(JobId::from("J1")),
                },
            ],
        )
    }

    #[test]
    fn first_render_lists_sites_and_form() {
        let state = apply(
            AppState::new(),
            vec![Msg::SitesLoaded(Ok(vec![Site::new("shop_a", "Shop A")]))],
        );
        let cmds = render(None, &state.view());
        assert_eq!(
            cmds,
            vec![
                TerminalCommand::Line("Sites disponíveis:".to_string()),
                TerminalCommand::Line("  - shop_a: Shop A".to_string()),
                TerminalCommand::Line("Site: - | Termo: \"\" | pronto".to_string()),
            ]
        );
    }

    #[test]
    fn unavailable_catalog_renders_its_label() {
        let state = apply(AppState::new(), vec![Msg::SitesLoaded(Err("down".to_string()))]);
        let cmds = render(None, &state.view());
        assert_eq!(
            cmds[0],
            TerminalCommand::Line(text::SITES_UNAVAILABLE.to_string())
        );
    }

    #[test]
    fn unchanged_view_renders_nothing() {
        let view = tracking_state().view();
        assert_eq!(render(Some(&view), &view), Vec::new());
    }

    #[test]
    fn status_updates_move_the_progress_bar() {
        let before = tracking_state();
        let prev = before.view();
        let mut report = StatusReport::new(JobStatus::Running);
        report.progress = Some(40);
        report.message = Some("Página 2".to_string());
        let (after, _) = update(
            before,
            Msg::StatusFetched {
                job_id: JobId::from("J1"),
                result: Ok(report),
            },
        );
        assert_eq!(
            render(Some(&prev), &after.view()),
            vec![TerminalCommand::Progress {
                job_id: "J1".to_string(),
                label: text::STATUS_RUNNING,
                percent: 40,
                details: "Página 2".to_string(),
            }]
        );
    }

    #[test]
    fn completion_finishes_bar_and_prints_rows() {
        let before = tracking_state();
        let prev = before.view();
        let mut report = StatusReport::new(JobStatus::Completed);
        report.progress = Some(100);
        report.items = Some(vec![Item {
            name: Some("X".to_string()),
            price: Some("$10".to_string()),
            link: Some("http://x".to_string()),
            ..Item::default()
        }]);
        let (after, _) = update(
            before,
            Msg::StatusFetched {
                job_id: JobId::from("J1"),
                result: Ok(report),
            },
        );
        let cmds = render(Some(&prev), &after.view());
        assert_eq!(
            cmds,
            vec![
                TerminalCommand::FinishProgress(format!(
                    "{} {}",
                    text::STATUS_COMPLETED,
                    text::DETAILS_DEFAULT
                )),
                TerminalCommand::Line("1 produtos encontrados para 'phone' em Shop A".to_string()),
                TerminalCommand::Line(" 1. X".to_string()),
                TerminalCommand::Line("    Preço: $10".to_string()),
                TerminalCommand::Line("    Avaliação: N/A | Vendas: N/A".to_string()),
                TerminalCommand::Line("    Link: http://x".to_string()),
            ]
        );
    }

    #[test]
    fn rows_print_without_markup_escaping() {
        let before = tracking_state();
        let prev = before.view();
        let mut report = StatusReport::new(JobStatus::Completed);
        report.items = Some(vec![Item {
            name: Some("Tom & Jerry <DVD>".to_string()),
            link: Some("http://x/?a=1&b=2".to_string()),
            ..Item::default()
        }]);
        let (after, _) = update(
            before,
            Msg::StatusFetched {
                job_id: JobId::from("J1"),
                result: Ok(report),
            },
        );
        let cmds = render(Some(&prev), &after.view());
        assert!(cmds.contains(&TerminalCommand::Line(" 1. Tom & Jerry <DVD>".to_string())));
        assert!(cmds.contains(&TerminalCommand::Line("    Link: http://x/?a=1&b=2".to_string())));
    }

    #[test]
    fn job_error_abandons_bar_with_message() {
        let before = tracking_state();
        let prev = before.view();
        let mut report = StatusReport::new(JobStatus::Error);
        report.message = Some("Timeout".to_string());
        let (after, _) = update(
            before,
            Msg::StatusFetched {
                job_id: JobId::from("J1"),
                result: Ok(report),
            },
        );
        assert_eq!(
            render(Some(&prev), &after.view()),
            vec![TerminalCommand::AbandonProgress(format!(
                "{} Timeout",
                text::STATUS_ERROR
            ))]
        );
    }

    #[test]
    fn new_search_clears_progress() {
        let before = tracking_state();
        let prev = before.view();
        let (after, _) = update(before, Msg::NewSearchClicked);
        let cmds = render(Some(&prev), &after.view());
        assert!(cmds.contains(&TerminalCommand::ClearProgress));
    }
}
