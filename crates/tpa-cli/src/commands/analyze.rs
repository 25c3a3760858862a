//! `tpa analyze` -- run the full possibility-space analysis.

use tpa_engine::report;

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::data;
use crate::error::Result;
use crate::output::Output;

pub fn run_analyze(args: &AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let state = data::load_tournament(args.data.as_deref())?;
    let brackets = data::load_brackets(args.brackets.as_deref())?;

    let analysis = report::analyze(&state, &brackets, None)?;

    let output = Output::new(format);
    if output.is_json() {
        output.print_json(&analysis);
    } else {
        crate::output::render_analysis_table(&analysis, args.top, args.detailed, &state, &brackets);
    }

    Ok(())
}
