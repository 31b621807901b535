//! Printable certificate of completion.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::html::html_escape;

/// What a certificate says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub recipient: String,
    /// Course title, or `None` for the general completion wording.
    pub course: Option<String>,
    pub issued_on: NaiveDate,
}

impl Certificate {
    pub fn new(recipient: impl Into<String>, course: Option<String>, issued_on: NaiveDate) -> Self {
        Self {
            recipient: recipient.into(),
            course: course.filter(|c| !c.trim().is_empty()),
            issued_on,
        }
    }

    /// Issued today (UTC).
    pub fn today(recipient: impl Into<String>, course: Option<String>) -> Self {
        Self::new(recipient, course, chrono::Utc::now().date_naive())
    }

    pub fn to_html(&self) -> String {
        let (subtitle, body) = match &self.course {
            Some(course) => (
                "This certifies that",
                format!(
                    "has completed the course <strong>{}</strong>",
                    html_escape(course)
                ),
            ),
            None => (
                "This is to certify that",
                "has successfully completed the required courses".to_string(),
            ),
        };

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<title>Certificate</title>\n");
        html.push_str("<style>\n");
        html.push_str(CSS);
        html.push_str("</style>\n");
        html.push_str("</head>\n<body>\n<div class=\"cert\">\n");
        html.push_str("<div class=\"title\">Certificate of Completion</div>\n");
        html.push_str(&format!("<div class=\"subtitle\">{subtitle}</div>\n"));
        html.push_str(&format!(
            "<div class=\"name\">{}</div>\n",
            html_escape(&self.recipient)
        ));
        html.push_str(&format!("<div class=\"course\">{body}</div>\n"));
        html.push_str(&format!(
            "<div class=\"footer\">Issued on {}</div>\n",
            self.issued_on.format("%Y-%m-%d")
        ));
        html.push_str("</div>\n<script>setTimeout(() => window.print(), 200)</script>\n");
        html.push_str("</body>\n</html>");
        html
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_html())
            .with_context(|| format!("failed to write certificate to {}", path.display()))?;
        Ok(())
    }
}

const CSS: &str = r#"
body { font-family: 'Segoe UI', Tahoma, sans-serif; background: #FFFADC; margin: 0; padding: 30px; }
.cert { width: 900px; margin: 40px auto; padding: 40px; border-radius: 16px; border: 8px solid #B6F500; background: white; text-align: center; box-shadow: 0 12px 30px rgba(0,0,0,0.08); }
.title { font-size: 28px; font-weight: 700; color: #0f1720; }
.name { font-size: 32px; font-weight: 800; margin-top: 18px; color: #0f1720; }
.course { margin-top: 12px; font-size: 18px; color: #374151; }
.footer { margin-top: 30px; color: #6b7280; font-size: 13px; }
@media print { body { background: white; } .cert { box-shadow: none; } }
"#;
