//! Fixed-width table describing every variable of a dataset.

use std::fs;
use std::path::Path;

use crate::error::DataResult;
use crate::source::VariableInfo;

/// Width of the rule drawn under each row.
const RULE_WIDTH: usize = 205;

/// Render one row per variable: name, units, dimensions, shape, description,
/// each followed by a horizontal rule.
pub fn variable_table(variables: &[VariableInfo]) -> String {
    let rule = "\u{2500}".repeat(RULE_WIDTH);
    let mut out = String::new();
    for var in variables {
        let dims = format!("({})", var.dims.join(", "));
        let shape = format!(
            "({})",
            var.shape
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        out.push_str(&format!(
            "{:22}{:20}{:60}{:20}{}\n",
            var.name,
            var.units.as_deref().unwrap_or(" "),
            dims,
            shape,
            var.description.as_deref().unwrap_or(" ")
        ));
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

/// Write the variable table to a file, replacing it.
pub fn write_variable_table(path: &Path, variables: &[VariableInfo]) -> DataResult<()> {
    fs::write(path, variable_table(variables))?;
    Ok(())
}
