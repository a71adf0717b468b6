//! Screening report rendering.
//!
//! Consumes the company profile and the ordered summary rows and
//! produces a display artifact: a company header block followed by the
//! owner table. Purely presentational; no business logic lives here.

use std::path::{Path, PathBuf};

use tracing::info;

use keypeople_shared::{Company, KeyPeopleError, OwnerSummaryRow, Result};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Html,
}

impl ReportFormat {
    /// File extension for the rendered report.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

// ---------------------------------------------------------------------------
// Markdown rendering
// ---------------------------------------------------------------------------

/// Render the report as Markdown: header block plus owner table.
pub fn render_markdown(company: &Company, rows: &[OwnerSummaryRow]) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Key People Screening Report: {}\n\n", company.display_name));
    out.push_str(&format!("![logo]({})\n\n", company.logo_url));
    out.push_str(&format!("{}\n\n", company.short_description));
    out.push_str(&format!(
        "Company type: {} · [Profile]({})\n\n",
        company.company_type, company.craft_url
    ));

    out.push_str("| Owner | Ownership % | Degrees | Matched Name | Confidence | Datasets |\n");
    out.push_str("|---|---|---|---|---|---|\n");

    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.owner_name,
            row.ownership_percentage,
            row.degree_of_separation,
            row.matched_name.as_deref().unwrap_or("—"),
            row.match_confidence
                .map(|s| s.to_string())
                .unwrap_or_else(|| "—".into()),
            if row.datasets.is_empty() {
                "—".into()
            } else {
                row.datasets.join(", ")
            },
        ));
    }

    out.push_str(&format!(
        "\nGenerated by keypeople {} on {}\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y-%m-%d"),
    ));

    out
}

// ---------------------------------------------------------------------------
// HTML rendering
// ---------------------------------------------------------------------------

/// Render the report as a self-contained single HTML page.
pub fn render_html(company: &Company, rows: &[OwnerSummaryRow]) -> String {
    let mut table_rows = String::new();
    for row in rows {
        table_rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&row.owner_name),
            row.ownership_percentage,
            row.degree_of_separation,
            row.matched_name.as_deref().map(escape).unwrap_or_else(|| "—".into()),
            row.match_confidence
                .map(|s| s.to_string())
                .unwrap_or_else(|| "—".into()),
            escape(&row.datasets.join(", ")),
        ));
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Key People Report: {name}</title>
  <style>
    body {{ font-family: sans-serif; max-width: 56rem; margin: 2rem auto; }}
    header {{ display: flex; align-items: center; gap: 1rem; }}
    header img {{ height: 3rem; }}
    table {{ border-collapse: collapse; width: 100%; margin-top: 1rem; }}
    th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
  </style>
</head>
<body>
  <header>
    <img src="{logo}" alt="{name} logo">
    <div>
      <h1>{name}</h1>
      <p>Key People Screening Report</p>
    </div>
  </header>
  <p>{description}</p>
  <table>
    <thead>
      <tr><th>Owner</th><th>Ownership %</th><th>Degrees</th><th>Matched Name</th><th>Confidence</th><th>Datasets</th></tr>
    </thead>
    <tbody>
{table_rows}    </tbody>
  </table>
  <footer><p>Generated by keypeople {version} on {date}</p></footer>
</body>
</html>
"#,
        name = escape(&company.display_name),
        logo = escape(&company.logo_url),
        description = escape(&company.short_description),
        table_rows = table_rows,
        version = env!("CARGO_PKG_VERSION"),
        date = chrono::Utc::now().format("%Y-%m-%d"),
    )
}

/// Minimal HTML escaping for text content and attribute values.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// File output
// ---------------------------------------------------------------------------

/// Render and write the report file, returning its path.
///
/// The file is named `<slug>-screening.<ext>` inside `dir`, which is
/// created if needed.
pub fn write_report(
    dir: &Path,
    company: &Company,
    rows: &[OwnerSummaryRow],
    format: ReportFormat,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| KeyPeopleError::io(dir, e))?;

    let path = dir.join(format!("{}-screening.{}", company.slug, format.extension()));
    let content = match format {
        ReportFormat::Markdown => render_markdown(company, rows),
        ReportFormat::Html => render_html(company, rows),
    };

    std::fs::write(&path, content).map_err(|e| KeyPeopleError::io(&path, e))?;
    info!(?path, rows = rows.len(), "report written");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_company() -> Company {
        Company {
            id: 60903,
            display_name: "JFrog".into(),
            short_description: "Software supply chain platform.".into(),
            slug: "jfrog".into(),
            craft_url: "https://craft.co/jfrog".into(),
            logo_url: "https://images.craft.co/images/jfrog-logo.png".into(),
            company_type: "Public".into(),
        }
    }

    fn matched_row() -> OwnerSummaryRow {
        OwnerSummaryRow {
            owner_name: "Yaochu Yang".into(),
            ownership_percentage: 0.35,
            degree_of_separation: 1,
            matched_name: Some("Shlomi Ben Haim".into()),
            match_confidence: Some(100),
            datasets: vec!["RRE".into()],
        }
    }

    fn unmatched_row() -> OwnerSummaryRow {
        OwnerSummaryRow {
            owner_name: "Simo He".into(),
            ownership_percentage: 0.17,
            degree_of_separation: 1,
            matched_name: None,
            match_confidence: None,
            datasets: vec![],
        }
    }

    #[test]
    fn markdown_has_header_and_one_row_per_owner() {
        let md = render_markdown(&test_company(), &[matched_row(), unmatched_row()]);

        assert!(md.starts_with("# Key People Screening Report: JFrog"));
        assert!(md.contains("| Yaochu Yang | 0.35 | 1 | Shlomi Ben Haim | 100 | RRE |"));
        assert!(md.contains("| Simo He | 0.17 | 1 | — | — | — |"));
    }

    #[test]
    fn html_escapes_content() {
        let mut company = test_company();
        company.display_name = "Smith & Sons <Ltd>".into();

        let html = render_html(&company, &[matched_row()]);
        assert!(html.contains("Smith &amp; Sons &lt;Ltd&gt;"));
        assert!(!html.contains("<Ltd>"));
    }

    #[test]
    fn html_renders_rows_in_order() {
        let html = render_html(&test_company(), &[matched_row(), unmatched_row()]);
        let first = html.find("Yaochu Yang").expect("first row present");
        let second = html.find("Simo He").expect("second row present");
        assert!(first < second);
    }

    #[test]
    fn write_report_uses_slug_and_extension() {
        let dir = std::env::temp_dir().join("keypeople-report-test");
        let path = write_report(&dir, &test_company(), &[matched_row()], ReportFormat::Markdown)
            .expect("write report");

        assert!(path.ends_with("jfrog-screening.md"));
        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("Yaochu Yang"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
