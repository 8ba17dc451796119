//! Request scripts.
//!
//! A script holds one request per line: a method, a path and an optional JSON
//! body, e.g. `POST /api/stack/s1/push {"value": 3}`. Blank lines and lines
//! starting with `#` are skipped. Every request runs against one fresh
//! registry, in order.

use std::io::Write;

use anyhow::{Context, Result, bail};
use dsengine::{
    Registry,
    api::{self, Method},
};
use serde_json::{Value as Json, json};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    /// 1-based line number in the script.
    pub line: usize,
    /// Request method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Request body; `null` when omitted.
    pub body: Json,
}

/// Parse a whole script, failing on the first malformed line.
pub fn parse(source: &str) -> Result<Vec<ScriptRequest>> {
    let mut requests = Vec::new();
    for (i, text) in source.lines().enumerate() {
        let line = i + 1;
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let (method, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let rest = rest.trim_start();
        let (path, body) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if path.is_empty() {
            bail!("line {line}: expected `METHOD /path [json]`, got `{text}`");
        }
        if !path.starts_with('/') {
            bail!("line {line}: path must start with '/', got `{path}`");
        }
        let method: Method = method
            .parse()
            .with_context(|| format!("line {line}: bad method"))?;
        let body = api::parse_body(body)
            .with_context(|| format!("line {line}: bad body"))?;
        requests.push(ScriptRequest {
            line,
            method,
            path: path.to_string(),
            body,
        });
    }
    Ok(requests)
}

/// Run a script, writing one JSON object per request to `out`.
///
/// Returns the number of requests that did not succeed.
pub fn run(source: &str, out: &mut dyn Write, pretty: bool) -> Result<usize> {
    let requests = parse(source)?;
    let mut registry = Registry::new();
    let mut failed = 0;
    for req in &requests {
        let response = api::handle(&mut registry, req.method, &req.path, &req.body);
        if !response.is_success() {
            failed += 1;
        }
        let record = json!({
            "line": req.line,
            "request": format!("{} {}", req.method, req.path),
            "status": response.status,
            "body": response.body,
        });
        let rendered = if pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            record.to_string()
        };
        writeln!(out, "{rendered}").context("failed to write output")?;
    }
    Ok(failed)
}
