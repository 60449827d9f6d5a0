//! Server-rendered HTML for the editing UI
//!
//! Deliberately no-frills: page-number placeholders instead of thumbnails,
//! one form per action, a handful of inline styles. No template engine;
//! two screens do not warrant one.

/// One row of the page table.
pub struct PageRow {
    /// Current 1-based position
    pub position: u32,
    /// Original page number, for the "p.N" label
    pub label: u32,
    /// Effective rotation in degrees
    pub rotation: i64,
}

/// Upload form shown at `/`.
pub fn render_index(max_upload_mb: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>pagedeck</title></head>
<body>
<h1>pagedeck</h1>
<p>Delete, rotate, and reorder PDF pages. Uploads up to {max_upload_mb} MB.</p>
<form method="post" action="/upload" enctype="multipart/form-data">
  <input type="file" name="pdf" accept=".pdf" required>
  <button type="submit">Upload</button>
</form>
</body>
</html>
"#
    )
}

/// Edit screen: the page table with per-page action forms.
pub fn render_edit(id: &str, filename: &str, rows: &[PageRow]) -> String {
    let page_count = rows.len();
    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"><title>pagedeck - {title}</title>
<style>
  body {{ font-family: monospace; }}
  table {{ border-collapse: collapse; margin: 1em 0; }}
  th, td {{ border: 1px solid #999; padding: 6px 12px; text-align: center; }}
  .actions form {{ display: inline; }}
</style>
</head>
<body>
<h1>{title} ({page_count} pages)</h1>

<form method="get" action="/download/{id}">
  <button type="submit">Download edited PDF</button>
</form>
<hr>

<table>
<tr><th>#</th><th>Original page</th><th>Rotation</th><th>Actions</th></tr>
"#,
        title = escape_html(filename),
    );

    for row in rows {
        let position = row.position;
        html.push_str(&format!(
            r#"<tr>
  <td>{position}</td>
  <td>p.{label}</td>
  <td>{rotation}&deg;</td>
  <td class="actions">
    <form method="post" action="/edit/{id}/rotate/{position}">
      <button title="Rotate clockwise 90 degrees">&#8635; Rotate</button>
    </form>
    <form method="post" action="/edit/{id}/delete/{position}">
      <button title="Delete this page">&#10005; Delete</button>
    </form>
"#,
            label = row.label,
            rotation = row.rotation,
        ));
        if position > 1 {
            html.push_str(&format!(
                r#"    <form method="post" action="/edit/{id}/move/{position}">
      <input type="hidden" name="to" value="{}">
      <button title="Move one position up">&#9650; Up</button>
    </form>
"#,
                position - 1,
            ));
        }
        if (position as usize) < page_count {
            html.push_str(&format!(
                r#"    <form method="post" action="/edit/{id}/move/{position}">
      <input type="hidden" name="to" value="{}">
      <button title="Move one position down">&#9660; Down</button>
    </form>
"#,
                position + 1,
            ));
        }
        html.push_str("  </td>\n</tr>\n");
    }

    html.push_str(
        r#"</table>

<a href="/">&larr; Edit another PDF</a>
</body>
</html>
"#,
    );
    html
}

/// Minimal HTML escaping for user-controlled text (the uploaded filename).
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
