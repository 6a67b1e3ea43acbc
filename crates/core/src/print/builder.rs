use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::candidates::asset_url;
use crate::catalog::Item;

use super::{PrintDocument, PrintError, PrintType};

const STYLE: &str = r#"
    body { font-family: 'Times New Roman', serif; margin: 20px; line-height: 1.4; }
    .question { page-break-inside: avoid; margin-bottom: 30px; border-bottom: 2px solid #000; padding-bottom: 20px; }
    .question:last-child { border-bottom: none; margin-bottom: 0; }
    .question-header { margin-bottom: 15px; }
    .question-title { font-size: 16pt; font-weight: bold; margin-bottom: 10px; color: #000; }
    .metadata { font-size: 10pt; color: #666; margin-bottom: 10px; }
    .content-section { margin-bottom: 20px; }
    .content-section h3 { font-size: 12pt; font-weight: bold; border-bottom: 1px solid #000; padding-bottom: 5px; margin-bottom: 10px; }
    img { max-width: 100%; height: auto; border: 1px solid #ccc; margin: 10px 0; }
    .fallback { font-style: italic; color: #666; padding: 10px; background-color: #f5f5f5; }
    @media print {
        .question { page-break-after: always; }
        .question:last-child { page-break-after: avoid; }
        body { margin: 10px; }
    }
"#;

/// Hides a broken image and reveals the fallback block right after it.
const ONERROR: &str = "this.style.display='none'; this.nextElementSibling.style.display='block';";

/// Render `items` into a standalone printable HTML page.
///
/// Image sources are absolute under `asset_base` so the page resolves
/// its images wherever it is opened from.
pub fn build_print_document(
    items: &[Item],
    print_type: Option<PrintType>,
    include_metadata: bool,
    asset_base: &str,
    generated_at: DateTime<Utc>,
) -> Result<PrintDocument, PrintError> {
    if items.is_empty() {
        return Err(PrintError::SelectionEmpty);
    }
    let print_type = print_type.ok_or(PrintError::NoPrintType)?;

    let title = format!("Question Bank - Print ({} questions)", items.len());
    let mut html = String::with_capacity(2048 + items.len() * 1024);

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(&title),
        STYLE
    );
    let _ = write!(
        html,
        "<h1>Question Bank Print - {}</h1>\n<p>Total Questions: {} | Print Type: {}</p>\n<hr>\n",
        generated_at.format("%Y-%m-%d"),
        items.len(),
        print_type
    );

    for (index, item) in items.iter().enumerate() {
        render_section(
            &mut html,
            index + 1,
            item,
            print_type,
            include_metadata,
            asset_base,
        );
    }

    html.push_str("</body>\n</html>\n");

    Ok(PrintDocument {
        title,
        html,
        item_count: items.len(),
        print_type,
        generated_at,
    })
}

fn render_section(
    html: &mut String,
    position: usize,
    item: &Item,
    print_type: PrintType,
    include_metadata: bool,
    asset_base: &str,
) {
    html.push_str("<div class=\"question\">\n<div class=\"question-header\">\n");
    let title = if item.title.is_empty() {
        format!("Q{}", item.number)
    } else {
        item.title.clone()
    };
    let _ = writeln!(
        html,
        "<div class=\"question-title\">Question {}: {}</div>",
        position,
        escape_html(&title)
    );

    if include_metadata {
        let _ = writeln!(
            html,
            "<div class=\"metadata\">Subject: {} | Year: {} | Topic: {} | Difficulty: {}</div>",
            escape_html(&item.subject),
            escape_html(&item.year),
            escape_html(&item.topic),
            item.difficulty
        );
    }
    html.push_str("</div>\n");

    if print_type.includes_questions() {
        html.push_str("<div class=\"content-section\">\n<h3>Question</h3>\n");
        render_image(
            html,
            asset_base,
            &item.question_path,
            &format!("Question {}", item.number),
            "Question image could not be loaded",
        );
        html.push_str("</div>\n");
    }

    if print_type.includes_mark_schemes() {
        html.push_str("<div class=\"content-section\">\n<h3>Mark Scheme</h3>\n");
        if item.has_mark_scheme {
            render_image(
                html,
                asset_base,
                &item.mark_scheme_path,
                &format!("Mark Scheme {}", item.number),
                "Mark scheme image could not be loaded",
            );
        } else {
            html.push_str(
                "<div class=\"fallback\">No mark scheme available for this question</div>\n",
            );
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");
}

fn render_image(html: &mut String, asset_base: &str, path: &str, alt: &str, failure_text: &str) {
    let _ = writeln!(
        html,
        "<img src=\"{}\" alt=\"{}\" onerror=\"{}\">",
        escape_html(&asset_url(asset_base, path)),
        escape_html(alt),
        ONERROR
    );
    let _ = writeln!(
        html,
        "<div class=\"fallback\" style=\"display: none;\">{}: {}</div>",
        failure_text,
        escape_html(path)
    );
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
