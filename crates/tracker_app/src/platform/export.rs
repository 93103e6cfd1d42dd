use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracker_core::{JobId, ResultsView};
use tracker_engine::ArtifactSaver;
use tracker_logging::tracker_info;

#[derive(Debug, Serialize)]
struct SavedResults<'a> {
    job_id: &'a str,
    site: &'a str,
    termo_busca: &'a str,
    saved_at: String,
    summary: &'a str,
    total_produtos: usize,
    produtos: Vec<SavedProduct<'a>>,
}

/// One row with the values as the API sent them.
#[derive(Debug, Serialize)]
struct SavedProduct<'a> {
    nome: &'a str,
    preco: &'a str,
    link: &'a str,
    avaliacao: &'a str,
    vendas: &'a str,
}

/// Search identity recorded next to the rows.
pub struct ExportContext<'a> {
    pub job_id: &'a JobId,
    pub site: &'a str,
    pub term: &'a str,
}

/// `resultados_{term}_{timestamp}.json` with whitespace in the term folded to `_`.
pub fn default_export_name(term: &str, now: DateTime<Local>) -> String {
    let term: String = term
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("resultados_{}_{}.json", term, now.format("%Y%m%d_%H%M%S"))
}

pub fn save_results(
    target: &Path,
    context: &ExportContext<'_>,
    results: &ResultsView,
) -> Result<PathBuf> {
    let saved = SavedResults {
        job_id: context.job_id.as_str(),
        site: context.site,
        termo_busca: context.term,
        saved_at: Utc::now().to_rfc3339(),
        summary: &results.plain_summary,
        total_produtos: results.plain_rows.len(),
        produtos: results
            .plain_rows
            .iter()
            .map(|row| SavedProduct {
                nome: &row.name,
                preco: &row.price,
                link: &row.link,
                avaliacao: &row.rating,
                vendas: &row.sales,
            })
            .collect(),
    };
    let content = serde_json::to_vec_pretty(&saved).context("serializing results")?;

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = target
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid export path {}", target.display()))?;
    let path = ArtifactSaver::new(dir)
        .save(filename, &content)
        .with_context(|| format!("writing {}", target.display()))?;
    tracker_info!("Results of job {} exported to {:?}", context.job_id, path);
    Ok(path)
}
