//! Report generation port trait.

use crate::domain::analysis::Analysis;
use crate::domain::error::TrendscopeError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Port for rendering an analysis.
pub trait ReportPort {
    fn render(&self, symbol: &str, analysis: &Analysis) -> String;

    /// Default implementation: writes the rendered report to `output_path`,
    /// or to stdout when no path is given.
    fn write(
        &self,
        symbol: &str,
        analysis: &Analysis,
        output_path: Option<&Path>,
    ) -> Result<(), TrendscopeError> {
        let content = self.render(symbol, analysis);
        match output_path {
            Some(path) => fs::write(path, content)?,
            None => std::io::stdout().lock().write_all(content.as_bytes())?,
        }
        Ok(())
    }
}
