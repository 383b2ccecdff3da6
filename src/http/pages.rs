//! Minimal server-rendered pages.
//!
//! Plain HTML with no client-side assets. User-facing strings are Norwegian,
//! carried over from the original product.

use std::fmt::Write;

use crate::registry::Flow;

/// Transient user-facing notice carried in redirect query parameters.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: &str, message: impl Into<String>) -> Self {
        Self {
            level: level.to_string(),
            message: message.into(),
        }
    }

    /// Query string fragment for a redirect carrying this notice.
    pub fn to_query(&self) -> String {
        format!(
            "notice={}&level={}",
            urlencode(&self.message),
            urlencode(&self.level)
        )
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*byte as char)
            }
            b' ' => out.push_str("%20"),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

fn notice_block(notice: Option<&Notice>) -> String {
    match notice {
        Some(n) => format!(
            "<p class=\"notice {}\">{}</p>\n",
            escape(&n.level),
            escape(&n.message)
        ),
        None => String::new(),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"no\">\n<head><meta charset=\"utf-8\">\
         <title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Dashboard listing all triggerable flows.
pub fn dashboard(flows: &[Flow], notice: Option<&Notice>) -> String {
    let mut body = String::new();
    body.push_str(&notice_block(notice));
    body.push_str("<h1>Flyter</h1>\n");
    if flows.is_empty() {
        body.push_str("<p>Ingen flyter er konfigurert.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for flow in flows {
            let _ = write!(
                body,
                "<li><a href=\"/flow/{}\">{}</a><br>{}</li>\n",
                urlencode(&flow.id),
                escape(&flow.title),
                escape(&flow.description)
            );
        }
        body.push_str("</ul>\n");
    }
    page("Flyter", &body)
}

/// Trigger form for one flow.
pub fn flow_form(flow: &Flow, notice: Option<&Notice>) -> String {
    let mut body = String::new();
    body.push_str(&notice_block(notice));
    let _ = write!(
        body,
        "<h1>{}</h1>\n<p>{}</p>\n\
         <form method=\"post\" action=\"/trigger/{}\">\n\
         <label>Navn <input type=\"text\" name=\"name\"></label>\n\
         <label>Kode <input type=\"password\" name=\"key\"></label>\n\
         <button type=\"submit\">Trigg flyt</button>\n</form>\n\
         <p><a href=\"/\">Tilbake</a></p>\n",
        escape(&flow.title),
        escape(&flow.description),
        urlencode(&flow.id)
    );
    page(&flow.title, &body)
}
