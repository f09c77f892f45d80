//! Check report rendering
//!
//! Renders a [`CheckReport`] into the console text printed after a check.
//! Sections are separated by a blank line and always appear in the same order.

use console::style;
use sc_core::{CheckReport, EnvDiagnostics, ProbeResult, Verdict};

/// Render the full report. `colors` forces ANSI styling on or off.
pub fn render(report: &CheckReport, colors: bool) -> String {
    let mut lines = Vec::new();

    env_lines(&mut lines, &report.env);

    let identity = &report.identity;
    lines.push("Caller identity:".to_string());
    lines.push(format!("  Account: {}", identity.account.as_deref().unwrap_or("-")));
    lines.push(format!("  Arn: {}", identity.arn.as_deref().unwrap_or("-")));
    lines.push(format!("  UserId: {}", identity.user_id.as_deref().unwrap_or("-")));
    lines.push(String::new());

    lines.push("EC2 region:".to_string());
    lines.push(match &report.instance_region {
        Ok(region) => region.clone(),
        Err(e) => format!("Does not appear to be an EC2 instance: {e}"),
    });
    lines.push(String::new());

    lines.push("Bucket region:".to_string());
    lines.push(report.bucket_region.clone());
    lines.push(String::new());

    lines.push("S3 Operations:".to_string());
    for probe in report.probes.iter() {
        probe_lines(&mut lines, probe, colors);
    }
    lines.push(String::new());

    lines.push("Access sufficient for the following CockroachDB capabilities:".to_string());
    lines.extend(report.verdicts.iter().map(|v| verdict_line(v, colors)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn env_lines(lines: &mut Vec<String>, env: &EnvDiagnostics) {
    if env.proxy.is_empty() {
        lines.push("No environment variables that contain 'proxy' or 'PROXY'".to_string());
    } else {
        lines.push("Environment variables that contain 'proxy' or 'PROXY':".to_string());
        lines.extend(env.proxy.iter().map(|(name, value)| format!("  {name}={value}")));
    }
    lines.push(String::new());

    if env.aws.is_empty() {
        lines.push("No AWS_ prefixed environment variables".to_string());
    } else {
        lines.push("Environment variables that are prefixed with 'AWS_':".to_string());
        lines.extend(env.aws.iter().map(|(name, value)| format!("  {name}={value}")));
    }
    lines.push(String::new());
}

fn probe_lines(lines: &mut Vec<String>, probe: &ProbeResult, colors: bool) {
    let label = probe.operation.label();
    match &probe.error {
        None => {
            let ok = style("successful").green().bold().force_styling(colors);
            lines.push(format!("{label} -- {ok}"));
        }
        Some(e) => {
            let failed = style("failed with error:").red().bold().force_styling(colors);
            lines.push(format!("{label} -- {failed}"));
            lines.extend(e.to_string().lines().map(|line| format!("  {line}")));
        }
    }
}

fn verdict_line(verdict: &Verdict, colors: bool) -> String {
    let label = verdict.capability.label();
    let status = if verdict.sufficient {
        style("sufficient").green().bold()
    } else {
        style("not sufficient").red().bold()
    };
    format!("{label} -- {}", status.force_styling(colors))
}
