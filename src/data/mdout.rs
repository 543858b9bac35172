//! AMBER mdout energy block parsing.
//!
//! Each energy block starts with an `NSTEP =` line followed by
//! `KEY = value` pairs. Parsing stops at the `A V E R A G E S` section so the
//! trailing averages and fluctuations are not mistaken for samples.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Column-oriented energy samples, one entry per complete energy block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySeries {
    pub nstep: Vec<u64>,
    pub time_ps: Vec<f64>,
    pub temperature: Vec<f64>,
    pub etot: Vec<f64>,
    pub ektot: Vec<f64>,
    pub eptot: Vec<f64>,
    /// Only blocks that report a density (constant-pressure runs)
    pub density: Vec<f64>,
    /// Bond-stretch component energy; EHBOND is a separate term
    pub bond: Vec<f64>,
    pub angle: Vec<f64>,
    /// A field overflowed its format width (`****`), usually a blown-up run
    pub overflow: bool,
}

impl EnergySeries {
    pub fn len(&self) -> usize {
        self.nstep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nstep.is_empty()
    }

    /// Named scalar field, as used by the `energy` report
    pub fn field(&self, name: &str) -> Option<&[f64]> {
        match name.to_ascii_lowercase().as_str() {
            "time" | "time_ps" => Some(&self.time_ps),
            "temp" | "temperature" => Some(&self.temperature),
            "etot" => Some(&self.etot),
            "ektot" => Some(&self.ektot),
            "eptot" => Some(&self.eptot),
            "density" => Some(&self.density),
            "bond" => Some(&self.bond),
            "angle" => Some(&self.angle),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Block {
    nstep: Option<u64>,
    time_ps: Option<f64>,
    temperature: Option<f64>,
    etot: Option<f64>,
    ektot: Option<f64>,
    eptot: Option<f64>,
    density: Option<f64>,
    bond: Option<f64>,
    angle: Option<f64>,
}

impl Block {
    fn flush_into(self, series: &mut EnergySeries) {
        if let (Some(nstep), Some(time), Some(temp), Some(etot), Some(ektot), Some(eptot)) = (
            self.nstep,
            self.time_ps,
            self.temperature,
            self.etot,
            self.ektot,
            self.eptot,
        ) {
            series.nstep.push(nstep);
            series.time_ps.push(time);
            series.temperature.push(temp);
            series.etot.push(etot);
            series.ektot.push(ektot);
            series.eptot.push(eptot);
            series.density.extend(self.density);
            series.bond.extend(self.bond);
            series.angle.extend(self.angle);
        }
    }
}

/// `KEY = value` pairs on one line; keys may contain spaces ("1-4 NB")
fn key_values(line: &str) -> Vec<(String, &str)> {
    let segments: Vec<&str> = line.split('=').collect();
    let mut pairs = Vec::new();
    for i in 0..segments.len().saturating_sub(1) {
        let key = if i == 0 {
            segments[0].trim()
        } else {
            let seg = segments[i].trim_start();
            match seg.find(char::is_whitespace) {
                Some(pos) => seg[pos..].trim(),
                None => "",
            }
        };
        let value = segments[i + 1].split_whitespace().next().unwrap_or("");
        if !key.is_empty() {
            pairs.push((key.to_string(), value));
        }
    }
    pairs
}

pub fn parse_mdout(text: &str) -> Result<EnergySeries> {
    let mut series = EnergySeries::default();
    let mut block: Option<Block> = None;

    for line in text.lines() {
        if line.contains("A V E R A G E S") {
            break;
        }
        if line.contains("***") {
            series.overflow = true;
        }
        for (key, value) in key_values(line) {
            if key == "NSTEP" {
                if let Some(done) = block.take() {
                    done.flush_into(&mut series);
                }
                block = Some(Block {
                    nstep: value.parse().ok(),
                    ..Block::default()
                });
                continue;
            }
            let Some(current) = block.as_mut() else {
                continue;
            };
            let parsed = value.parse::<f64>().ok();
            match key.as_str() {
                "TIME(PS)" => current.time_ps = parsed,
                "TEMP(K)" => current.temperature = parsed,
                "Etot" => current.etot = parsed,
                "EKtot" => current.ektot = parsed,
                "EPtot" => current.eptot = parsed,
                "Density" => current.density = parsed,
                "BOND" => current.bond = parsed,
                "ANGLE" => current.angle = parsed,
                _ => {}
            }
        }
    }
    if let Some(done) = block.take() {
        done.flush_into(&mut series);
    }

    if series.overflow {
        tracing::warn!(samples = series.len(), "mdout contains overflowed fields (****)");
    }
    Ok(series)
}

pub fn load_mdout<P: AsRef<Path>>(path: P) -> Result<EnergySeries> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let series = parse_mdout(&text)?;
    tracing::debug!(path = %path.display(), samples = series.len(), "Parsed mdout energies");
    Ok(series)
}
