use crate::JobId;

const ARTIFACT_PREFIX: &str = "scraping_results_";
const ARTIFACT_EXTENSION: &str = "xlsx";

/// Deterministic artifact name for a job: `scraping_results_{id}.xlsx`.
///
/// Characters that are unsafe in file names are replaced with `_`.
pub fn download_filename(job_id: &JobId) -> String {
    let id: String = job_id
        .as_str()
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    format!("{ARTIFACT_PREFIX}{id}.{ARTIFACT_EXTENSION}")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_contains_job_id_and_extension() {
        let name = download_filename(&JobId::from("3f2a-77"));
        assert_eq!(name, "scraping_results_3f2a-77.xlsx");
    }

    #[test]
    fn path_separators_are_neutralised() {
        let name = download_filename(&JobId::from("../etc/passwd"));
        assert_eq!(name, "scraping_results_.._etc_passwd.xlsx");
    }
}
