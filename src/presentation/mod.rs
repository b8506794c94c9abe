//! Turns a [`BootstrapResult`] into display text and chart specifications. Reads the
//! result only.

pub mod charts;
pub mod summary;

use crate::analysis::bootstrap::BootstrapResult;
use charts::ChartSpecs;
use summary::SummaryView;

pub fn render(result: &BootstrapResult) -> (SummaryView, ChartSpecs) {
    (
        SummaryView::from_result(result),
        ChartSpecs::from_result(result),
    )
}
