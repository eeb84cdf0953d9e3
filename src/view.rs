//! HTML rendering of the status page
//!
//! Pure string assembly so it can be tested without any I/O. The page is
//! one heading per container with a list of clickable
//! `proto://hostname:port` links.

use crate::orchestrator::ContainerPortSummary;

/// Escape text for interpolation into HTML body or attribute context.
fn escape(text: &str) -> String {
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

/// Render the full status page.
pub fn render_page(summaries: &[ContainerPortSummary], hostname: &str, version: &str) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head><title>Running Containers</title></head>\n<body>\n\
         <h1>Exposed Ports for Running Containers</h1>\n",
    );

    if summaries.is_empty() {
        page.push_str("<p>No containers with detected HTTP/HTTPS ports.</p>\n");
    }

    for summary in summaries {
        let name = escape(&summary.name);
        page.push_str(&format!("<h2>{}</h2>\n<ul>\n", name));
        for (scheme, port) in &summary.ports {
            let host = escape(hostname);
            page.push_str(&format!(
                "<li><a href=\"{scheme}://{host}:{port}\">{name}:{port}</a></li>\n"
            ));
        }
        page.push_str("</ul>\n");
    }

    page.push_str(&format!(
        "<footer><small>portscope v{}</small></footer>\n</body>\n</html>\n",
        escape(version)
    ));
    page
}

/// Render the error page shown when the Docker daemon is unreachable.
pub fn render_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Running Containers</title></head>\n<body>\n\
         <h1>Container inventory unavailable</h1>\n<p>{}</p>\n</body>\n</html>\n",
        escape(message)
    )
}
