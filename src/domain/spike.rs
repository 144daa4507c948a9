//! Short-horizon spike detection.
//!
//! Compares the current price against a small newest-first window of
//! recent samples and picks the sample with the largest absolute move.
//! The provider's own 1-hour change acts as a second signal so fast moves
//! are caught even before the local window has history.

use rust_decimal::Decimal;

use super::sample::PriceSample;

/// Largest move found in a window, with the sample it was measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMove<'a> {
    /// `(current - reference.price) / reference.price * 100`.
    pub change_percent: Decimal,
    pub reference: &'a PriceSample,
}

/// Outcome of evaluating one asset against the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeAssessment<'a> {
    pub window_move: WindowMove<'a>,
    pub spiking: bool,
}

/// Percent change from `past` to `current`. `None` when `past` is not positive.
#[must_use]
pub fn percent_change(current: Decimal, past: Decimal) -> Option<Decimal> {
    if past <= Decimal::ZERO {
        return None;
    }
    (current - past)
        .checked_div(past)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Find the window sample whose percent difference from `current_price`
/// has the largest absolute value.
///
/// `window` is expected newest-first. On exact ties the first sample
/// encountered wins. Returns `None` for an empty window (or one with no
/// usable prices); callers skip detection in that case.
#[must_use]
pub fn max_window_move(current_price: Decimal, window: &[PriceSample]) -> Option<WindowMove<'_>> {
    let mut best: Option<WindowMove<'_>> = None;

    for sample in window {
        let Some(change_percent) = percent_change(current_price, sample.price) else {
            continue;
        };
        let replace = match &best {
            None => true,
            Some(current_best) => change_percent.abs() > current_best.change_percent.abs(),
        };
        if replace {
            best = Some(WindowMove {
                change_percent,
                reference: sample,
            });
        }
    }

    best
}

/// True when either the window move or the provider's 1-hour change
/// reaches `threshold` in absolute value.
#[must_use]
pub fn crosses_threshold(
    window_change: Decimal,
    change_1h: Option<Decimal>,
    threshold: Decimal,
) -> bool {
    window_change.abs() >= threshold || change_1h.is_some_and(|c| c.abs() >= threshold)
}

/// Run the detector for one asset.
///
/// Returns `None` when the window is empty.
#[must_use]
pub fn assess<'a>(
    current_price: Decimal,
    current_change_1h: Option<Decimal>,
    window: &'a [PriceSample],
    threshold: Decimal,
) -> Option<SpikeAssessment<'a>> {
    let window_move = max_window_move(current_price, window)?;
    let spiking = crosses_threshold(window_move.change_percent, current_change_1h, threshold);
    Some(SpikeAssessment {
        window_move,
        spiking,
    })
}
