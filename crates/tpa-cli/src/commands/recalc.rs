//! `tpa recalc` -- recompute every bracket's score against current results.

use tpa_engine::scorer;

use crate::cli::{OutputFormat, RecalcArgs};
use crate::data;
use crate::error::Result;
use crate::output::Output;

pub fn run_recalc(args: &RecalcArgs, format: OutputFormat) -> Result<()> {
    let state = data::load_tournament(args.data.as_deref())?;
    let brackets = data::load_brackets(args.brackets.as_deref())?;

    let changes = scorer::recalculate_all_scores(&state, &brackets);

    let output = Output::new(format);
    if output.is_json() {
        output.print_json(&changes);
    } else {
        crate::output::render_recalc_table(&changes);
    }

    Ok(())
}
