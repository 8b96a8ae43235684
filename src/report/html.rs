use std::fmt::Write;

use super::{
    Summary,
    text::{bytes, millis},
};
use crate::html::escape;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin-bottom:2rem}\
th,td{border:1px solid #ccc;padding:.4rem .8rem;text-align:left}\
th{background:#7d64ff;color:#fff}\
.pass{color:#1a7f37}.fail{color:#cf222e}";

impl Summary {
    /// Standalone page with a metrics table and a checks table.
    pub fn to_html(&self) -> String {
        let mut page = String::new();
        // writing into a String cannot fail
        let _ = self.write_html(&mut page);
        page
    }

    fn write_html(&self, out: &mut String) -> std::fmt::Result {
        let name = escape(&self.root_group.name);
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(
            out,
            "<head><meta charset=\"utf-8\"><title>{name} load test</title><style>{STYLE}</style></head>"
        )?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1>{name}</h1>")?;
        writeln!(
            out,
            "<p>Ran for {}.</p>",
            millis(self.state.test_run_duration_ms)
        )?;

        let m = &self.metrics;
        let d = &m.http_req_duration.values;
        let rows = [
            (
                "checks",
                format!("{:.2}%", m.checks.values.rate * 100.0),
                format!("✓ {} ✗ {}", m.checks.values.passes, m.checks.values.fails),
            ),
            (
                "data_received",
                bytes(m.data_received.values.count),
                format!("{}/s", bytes(m.data_received.values.rate as u64)),
            ),
            (
                "http_req_duration",
                format!("avg={}", millis(d.avg)),
                format!(
                    "min={} med={} max={} p(90)={} p(95)={}",
                    millis(d.min),
                    millis(d.med),
                    millis(d.max),
                    millis(d.p90),
                    millis(d.p95)
                ),
            ),
            (
                "http_req_failed",
                format!("{:.2}%", m.http_req_failed.values.rate * 100.0),
                format!(
                    "✓ {} ✗ {}",
                    m.http_req_failed.values.passes, m.http_req_failed.values.fails
                ),
            ),
            (
                "http_reqs",
                m.http_reqs.values.count.to_string(),
                format!("{:.2}/s", m.http_reqs.values.rate),
            ),
            (
                "iterations",
                m.iterations.values.count.to_string(),
                format!("{:.2}/s", m.iterations.values.rate),
            ),
        ];

        writeln!(out, "<h2>Metrics</h2>")?;
        writeln!(out, "<table class=\"metrics\">")?;
        writeln!(out, "<tr><th>metric</th><th>value</th><th>details</th></tr>")?;
        for (metric, value, details) in rows {
            writeln!(
                out,
                "<tr><td>{metric}</td><td>{}</td><td>{}</td></tr>",
                escape(&value),
                escape(&details)
            )?;
        }
        writeln!(out, "</table>")?;

        writeln!(out, "<h2>Checks</h2>")?;
        writeln!(out, "<table class=\"checks\">")?;
        writeln!(out, "<tr><th>check</th><th>passes</th><th>fails</th></tr>")?;
        for check in &self.root_group.checks {
            let class = if check.fails == 0 { "pass" } else { "fail" };
            writeln!(
                out,
                "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&check.name),
                check.passes,
                check.fails
            )?;
        }
        writeln!(out, "</table>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }
}
