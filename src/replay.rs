//! Scripted controller input for headless sessions.
//!
//! One sample per line: `now_ms,stick_x,stick_y,trigger,a,b`. Blank lines,
//! `#` comments and a leading header row are skipped. Between samples the
//! last one is held.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context, Result};
use homebase::input::RawControls;

const HEADER: &str = "now_ms,stick_x,stick_y,trigger,a,b";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptSample {
    pub at_ms: u64,
    pub controls: RawControls,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptSample>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_script(BufReader::new(file))
        .with_context(|| format!("invalid script {}", path.display()))
}

pub fn parse_script(reader: impl BufRead) -> Result<Vec<ScriptSample>> {
    let mut out: Vec<ScriptSample> = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("line {line_no}: read failed"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.replace(' ', "") == HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 6 {
            bail!("line {line_no}: expected 6 columns, got {}", parts.len());
        }
        let at_ms: u64 = parts[0]
            .parse()
            .with_context(|| format!("line {line_no}: bad now_ms `{}`", parts[0]))?;
        if let Some(previous) = out.last() {
            if at_ms < previous.at_ms {
                bail!("line {line_no}: time goes backwards ({at_ms} < {})", previous.at_ms);
            }
        }

        let analog = |idx: usize, name: &str| -> Result<f32> {
            parts[idx]
                .parse::<f32>()
                .with_context(|| format!("line {line_no}: bad {name} `{}`", parts[idx]))
        };
        out.push(ScriptSample {
            at_ms,
            controls: RawControls {
                stick_x: analog(1, "stick_x")?,
                stick_y: analog(2, "stick_y")?,
                trigger: analog(3, "trigger")?,
                button_a: analog(4, "a")?,
                button_b: analog(5, "b")?,
            },
        });
    }
    Ok(out)
}

/// Expands a sparse script into one sample per tick, holding the latest
/// sample between entries.
pub fn frames(script: &[ScriptSample], tick_ms: u64) -> Vec<(u64, RawControls)> {
    let Some(last) = script.last() else {
        return Vec::new();
    };
    let tick_ms = tick_ms.max(1);

    let mut out = Vec::new();
    let mut cursor = 0usize;
    let mut held = RawControls::default();
    let mut now = 0u64;
    while now <= last.at_ms {
        while cursor < script.len() && script[cursor].at_ms <= now {
            held = script[cursor].controls;
            cursor += 1;
        }
        out.push((now, held));
        now += tick_ms;
    }
    out
}
