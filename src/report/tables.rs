use crate::analysis::{
    EnergyReport, PairReport, ParameterReport, RmsdReport, RmsfReport, SeriesReport,
};
use std::fmt::Write;

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn render_series(report: &SeriesReport) -> String {
    let mut out = String::new();
    let s = &report.summary;
    let b = &report.block_average;
    let _ = writeln!(out, "=== {} ===", report.name);
    let _ = writeln!(out, "  Samples: {}", s.count);
    let _ = writeln!(out, "  Mean: {:.4} ± {:.4} (SEM, {} blocks)", b.grand_mean, b.standard_error, b.block_count());
    let _ = writeln!(out, "  Std: {:.4}  Range: [{:.4}, {:.4}]", s.std_dev, s.min, s.max);
    let _ = writeln!(
        out,
        "  Drift: {:.4}/ns (R² = {:.3})",
        report.drift_per_ns, report.drift.r_squared
    );
    let _ = writeln!(
        out,
        "  Early/late mean: {:.4} / {:.4} (split at {})",
        report.equilibration.early_mean, report.equilibration.late_mean, report.equilibration.split_index
    );
    let _ = writeln!(out, "  Normality p: {:.3}  Entropy: {:.3} bits", report.normality.p_value, report.entropy_bits);
    let _ = writeln!(out, "  Converged: {}  Stable: {}", flag(report.converged), flag(report.stable));
    out
}

pub fn render_rmsd(report: &RmsdReport) -> String {
    let mut out = render_series(&report.series);
    let _ = writeln!(out, "  Frames: {} ({} failed)", report.frames.len(), report.failed_frames);
    for frame in report.frames.iter().filter(|f| f.error.is_some()) {
        let _ = writeln!(
            out,
            "    frame {}: {}",
            frame.frame,
            frame.error.as_deref().unwrap_or_default()
        );
    }
    out
}

pub fn render_pair(report: &PairReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} vs {} ===", report.x_name, report.y_name);
    let _ = writeln!(
        out,
        "  Pearson r: {:.4} (p ≈ {:.2e}, n = {})",
        report.correlation.r, report.correlation.p_value, report.correlation.n
    );
    let _ = writeln!(out, "  Mutual information: {:.4} bits", report.mutual_information_bits);
    let _ = writeln!(
        out,
        "  Entropy: {:.4} / {:.4} bits",
        report.x_entropy_bits, report.y_entropy_bits
    );
    out
}

/// Energy fields as a markdown table
pub fn render_energy(report: &EnergyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Energy blocks: {}", report.steps);
    if report.overflow {
        let _ = writeln!(out, "WARNING: overflowed fields (****) in the log");
    }
    let _ = writeln!(out, "| Field | Mean | Std | SEM | Drift (/ns) | Converged |");
    let _ = writeln!(out, "|-------|------|-----|-----|-------------|-----------|");
    for field in &report.fields {
        let _ = writeln!(
            out,
            "| {} | {:.4} | {:.4} | {:.4} | {:.4} | {} |",
            field.name,
            field.summary.mean,
            field.summary.std_dev,
            field.block_average.standard_error,
            field.drift_per_ns,
            flag(field.converged)
        );
    }
    if let Some(deviation) = report.temperature_deviation {
        let _ = writeln!(out, "Temperature deviation from target: {:.2} K", deviation);
    }
    if let Some(tail) = &report.density_tail {
        let _ = writeln!(out, "Final density: {:.4} ± {:.4} g/cm³ (last {})", tail.mean, tail.std_dev, tail.count);
    }
    for scan in report.spikes.iter().filter(|s| !s.spikes.is_empty()) {
        let _ = writeln!(
            out,
            "Spikes in {} (> {:.4}): {} at samples {:?}",
            scan.field,
            scan.spikes.threshold,
            scan.spikes.indices.len(),
            scan.spikes.indices
        );
    }
    out
}

/// Bond parameters as a markdown table, one row per bond
pub fn render_bonds(report: &ParameterReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Temperature: {:.1} K", report.temperature_k);
    let _ = writeln!(out, "| System | Ligand | r0 (Å) | k | ν (cm⁻¹) | Period (fs) | RMS fluct. (Å) | Quality |");
    let _ = writeln!(out, "|--------|--------|--------|---|----------|-------------|----------------|---------|");
    for system in &report.systems {
        for bond in &system.bonds {
            let _ = writeln!(
                out,
                "| {} | {} | {:.3} | {:.1} | {:.1} | {:.1} | {:.3} | {:.0} |",
                system.name,
                bond.ligand,
                bond.r0,
                bond.k,
                bond.mode.wavenumber_cm1,
                bond.mode.period_fs,
                bond.fluctuation,
                bond.quality.combined
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Overall literature agreement:");
    for system in report.ranked() {
        let status = system.status.as_deref().unwrap_or("-");
        match system.overall_quality {
            Some(q) => {
                let _ = writeln!(out, "  {} [{}, {}]: {:.1}/100", system.name, system.oxidation_state, status, q);
            }
            None => {
                let _ = writeln!(out, "  {} [{}, {}]: no bonds", system.name, system.oxidation_state, status);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "| System | CN | Mean r0 (Å) | Std r0 | Range r0 | CV (%) | Asymmetry | Stability score |");
    let _ = writeln!(out, "|--------|----|-------------|--------|----------|--------|-----------|-----------------|");
    for system in &report.systems {
        if let (Some(g), Some(score)) = (&system.geometry, &system.stability_score) {
            let _ = writeln!(
                out,
                "| {} | {} | {:.3} | {:.3} | {:.3} | {:.1} | {:.3} | {:.2} |",
                system.name,
                g.coordination_number,
                g.mean_r0,
                g.std_r0,
                g.range_r0,
                g.cv_percent,
                g.asymmetry,
                score.total
            );
        }
    }
    out
}

pub fn render_rmsf(report: &RmsfReport) -> String {
    let mut out = String::new();
    let s = &report.summary;
    let _ = writeln!(out, "=== RMSF ===");
    let _ = writeln!(out, "  Residues: {}", s.count);
    if let Some(frames) = report.frames_used {
        let _ = writeln!(out, "  Frames: {} ({} skipped)", frames, report.skipped_frames.len());
    }
    let _ = writeln!(out, "  Global RMSF: {:.2} ± {:.2} Å", s.mean, s.std_dev);
    if let Some(lid) = &report.lid {
        let _ = writeln!(out, "  Lid region ({}-{}):", lid.start, lid.end);
        let _ = writeln!(out, "    Mean RMSF: {:.2} Å", lid.mean);
        let _ = writeln!(out, "    Max RMSF:  {:.2} Å (residue {})", lid.peak.rmsf, lid.peak.residue);
    }
    if !report.active_site.is_empty() {
        let _ = writeln!(out, "  Active site residues:");
        for site in &report.active_site {
            let _ = writeln!(out, "    Res {}: {:.2} Å", site.residue, site.rmsf);
        }
    }
    let _ = writeln!(
        out,
        "  Flexibility hotspots (>{:.1} Å): {} residues",
        report.hotspot_threshold,
        report.hotspots.len()
    );
    for region in &report.regions {
        if region.start == region.end {
            let _ = writeln!(out, "    {} ({:.2} Å)", region.start, region.max_rmsf);
        } else {
            let _ = writeln!(out, "    {}-{} (max: {:.2} Å)", region.start, region.end, region.max_rmsf);
        }
    }
    out
}

pub fn print_series(report: &SeriesReport) {
    print!("{}", render_series(report));
}

pub fn print_rmsd(report: &RmsdReport) {
    print!("{}", render_rmsd(report));
}

pub fn print_pair(report: &PairReport) {
    print!("{}", render_pair(report));
}

pub fn print_energy(report: &EnergyReport) {
    print!("{}", render_energy(report));
}

pub fn print_bonds(report: &ParameterReport) {
    print!("{}", render_bonds(report));
}

pub fn print_rmsf(report: &RmsfReport) {
    print!("{}", render_rmsf(report));
}
