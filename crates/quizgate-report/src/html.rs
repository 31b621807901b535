//! HTML attempts report.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use quizgate_core::model::AttemptRecord;
use quizgate_core::report::{AssessmentStats, AttemptSummary};

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report over a set of attempts.
pub fn generate_html(summary: &AttemptSummary, records: &[AttemptRecord]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>quizgate attempts report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Attempts report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} attempts | {} users | pass mark {}% | {}</p>\n",
        summary.total_attempts,
        summary.distinct_users,
        summary.pass_threshold,
        summary.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p>Average score <strong>{:.1}%</strong>, pass rate <strong>{:.1}%</strong></p>\n",
        summary.average_score,
        summary.pass_rate * 100.0
    ));

    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Assessment</th><th>Attempts</th><th>Average</th><th>Best</th><th>Passed</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for stats in &summary.per_assessment {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}%</td><td>{}</td></tr>\n",
            html_escape(&stats.assessment_title),
            stats.attempts,
            stats.average_score,
            stats.best_score,
            stats.passed,
        ));
    }
    html.push_str("</tbody></table>\n");

    if !summary.per_assessment.is_empty() {
        html.push_str(&generate_bar_chart(&summary.per_assessment));
    }

    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Attempts</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Assessment</th><th onclick=\"sortTable(1)\">User</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Taken</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in records {
        let class = if r.score >= summary.pass_threshold {
            "pass"
        } else {
            "fail"
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">{}%</td><td>{}</td></tr>\n",
            html_escape(&r.assessment_title),
            html_escape(&r.user_name),
            class,
            r.score,
            r.taken_at.format("%Y-%m-%d %H:%M")
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(summary).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(
    summary: &AttemptSummary,
    records: &[AttemptRecord],
    path: &Path,
) -> Result<()> {
    let html = generate_html(summary, records);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Horizontal bars of the average score per assessment.
fn generate_bar_chart(per_assessment: &[AssessmentStats]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = per_assessment.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, stats) in per_assessment.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let score = stats.average_score / 100.0;
        let width = (score * max_width as f64) as usize;

        let color = if score >= 0.8 {
            "#98CD00"
        } else if score >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&stats.assessment_title)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stats.average_score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #ecfccb; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #365314; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizgate_core::model::{AssessmentDefinition, UserContext};

    fn records() -> Vec<AttemptRecord> {
        let ux = AssessmentDefinition::new("a_ux", "UX <Basics>", vec![]);
        let fe = AssessmentDefinition::new("a_fe", "Frontend Basics", vec![]);
        let student = UserContext {
            id: "u_1".into(),
            name: "Student One".into(),
        };
        vec![
            AttemptRecord::new(&ux, &student, 100),
            AttemptRecord::new(&fe, &student, 33),
        ]
    }

    #[test]
    fn html_report_contains_required_elements() {
        let records = records();
        let summary = AttemptSummary::compute(&records, 50);
        let html = generate_html(&summary, &records);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Student One"));
        assert!(html.contains("Frontend Basics"));
        assert!(html.contains("<svg"));
        assert!(html.contains("class=\"fail\">33%"));
    }

    #[test]
    fn titles_are_escaped() {
        let records = records();
        let html = generate_html(&AttemptSummary::compute(&records, 50), &records);
        assert!(html.contains("UX &lt;Basics&gt;"));
        assert!(!html.contains("UX <Basics>"));
    }

    #[test]
    fn empty_report_has_no_chart() {
        let html = generate_html(&AttemptSummary::compute(&[], 50), &[]);
        assert!(html.contains("0 attempts"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn html_report_write_to_file() {
        let records = records();
        let summary = AttemptSummary::compute(&records, 50);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&summary, &records, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }

    #[test]
    fn escape_all_specials() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }
}
