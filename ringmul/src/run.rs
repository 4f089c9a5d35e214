// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run a multiplication as described by [`Settings`].

use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use approx::relative_eq;
use ringmul_engine::engine::Engine;
use ringmul_engine::transfer_error;
use ringmul_engine::types::RingResult;
use ringmul_models::baseline::run_synchronous;
use ringmul_models::element::{Element, ElementType};
use ringmul_models::matrix::Matrix;
use ringmul_models::participant::ParticipantReport;
use ringmul_models::pipeline::{PipelineConfig, run_pipelined};
use ringmul_models::source::{FileSource, MatrixSource};
use ringmul_models::store::save;
use ringmul_track::info;

use crate::settings::{Mode, Settings};

/// Relative tolerance when comparing real products.
const REAL_TOLERANCE: f64 = 1e-9;

/// How two products are compared when verifying.
pub trait Verify: Element {
    fn agrees_with(self, other: Self) -> bool;
}

impl Verify for i32 {
    fn agrees_with(self, other: Self) -> bool {
        self == other
    }
}

impl Verify for f64 {
    fn agrees_with(self, other: Self) -> bool {
        relative_eq!(self, other, max_relative = REAL_TOLERANCE)
    }
}

/// Check that `product` agrees with the `reference` element by element.
pub fn verify_product<E>(product: &Matrix<E>, reference: &Matrix<E>) -> RingResult
where
    E: Verify,
{
    if product.rows() != reference.rows() || product.cols() != reference.cols() {
        return transfer_error!(
            "product is {}x{} but the baseline is {}x{}",
            product.rows(),
            product.cols(),
            reference.rows(),
            reference.cols()
        );
    }
    for row in 0..product.rows() {
        for col in 0..product.cols() {
            let (got, expected) = (product[(row, col)], reference[(row, col)]);
            if !got.agrees_with(expected) {
                return transfer_error!(
                    "product differs from the baseline at ({row}, {col}): {got} != {expected}"
                );
            }
        }
    }
    Ok(())
}

/// What a run measured.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub mode: Mode,
    pub element_type: ElementType,

    /// Per-participant reports of a pipelined run.
    pub reports: Vec<ParticipantReport>,

    /// Duration of the baseline multiply, if it was run.
    pub baseline_elapsed: Option<Duration>,

    /// Whether the pipelined product was checked against the baseline.
    pub verified: bool,
}

/// Run the multiplication and write the product to `settings.path_c`.
///
/// Nothing is written if any step fails.
pub fn run(settings: &Settings, engine: &mut Engine) -> RingResult<RunSummary> {
    settings.validate()?;
    match settings.element_type {
        ElementType::Integer => run_typed::<i32>(settings, engine),
        ElementType::Real => run_typed::<f64>(settings, engine),
    }
}

fn run_typed<E>(settings: &Settings, engine: &mut Engine) -> RingResult<RunSummary>
where
    E: Verify,
{
    let dims = settings.dims();
    let source: Rc<dyn MatrixSource<E>> = Rc::new(FileSource::new(
        settings.path_a.clone(),
        settings.path_b.clone(),
        dims,
    ));

    let mut summary = RunSummary {
        mode: settings.mode,
        element_type: E::TYPE,
        reports: Vec::new(),
        baseline_elapsed: None,
        verified: false,
    };

    let config = PipelineConfig::new(dims, settings.ring_size).with_root(settings.root);
    let run_baseline = |summary: &mut RunSummary| -> RingResult<Matrix<E>> {
        let baseline = run_synchronous(source.as_ref(), dims)?;
        summary.baseline_elapsed = Some(baseline.elapsed);
        Ok(baseline.product)
    };
    let run_ring = |summary: &mut RunSummary, engine: &mut Engine| -> RingResult<Matrix<E>> {
        let outcome = run_pipelined(engine, &config, source.clone())?;
        summary.reports = outcome.reports;
        Ok(outcome.product)
    };

    let product = match settings.mode {
        Mode::Synchronous => run_baseline(&mut summary)?,
        Mode::Pipelined => run_ring(&mut summary, &mut *engine)?,
    };
    if settings.verify {
        match settings.mode {
            Mode::Synchronous => {
                verify_product(&run_ring(&mut summary, &mut *engine)?, &product)?;
            }
            Mode::Pipelined => verify_product(&product, &run_baseline(&mut summary)?)?,
        }
        summary.verified = true;
        info!(engine.top() ; "pipelined product matches the baseline");
    }

    save(&settings.path_c, &product)?;
    info!(engine.top() ; "wrote {}", settings.path_c.display());
    Ok(summary)
}

/// Write the timing summary of a run.
pub fn write_summary<W>(summary: &RunSummary, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "{} multiplication ({})",
        match summary.mode {
            Mode::Synchronous => "synchronous",
            Mode::Pipelined => "pipelined",
        },
        summary.element_type
    )?;
    for report in &summary.reports {
        writeln!(
            out,
            "  participant {}: {:.6} s",
            report.rank,
            report.elapsed.as_secs_f64()
        )?;
    }
    if let Some(elapsed) = summary.baseline_elapsed {
        writeln!(out, "  baseline: {:.6} s", elapsed.as_secs_f64())?;
    }
    if summary.verified {
        writeln!(out, "  verified against the baseline")?;
    }
    Ok(())
}
