//! apply_filter

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::ToolError;
use crate::format::ImageKind;
use crate::mcp::registry::ToolInput;
use crate::output::{open_image, save_image};
use crate::raster::filter::{
    apply, Filter, FilterOptions, MAX_BRIGHTNESS, MAX_CONTRAST, MAX_SIGMA,
};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFilterInput {
    /// Image to filter.
    pub input_path: PathBuf,

    /// Where to write the result. Parent directories are created.
    pub output_path: PathBuf,

    /// Filter to apply.
    pub filter: Filter,

    /// Filter parameters; each filter has its own default.
    #[serde(default)]
    pub options: FilterOptions,
}

impl ToolInput for ApplyFilterInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        if let Some(sigma) = self.options.sigma {
            // Subnormal sigmas make the gaussian kernel degenerate
            if !(sigma.is_normal() && sigma > 0.0 && sigma <= MAX_SIGMA) {
                return Err(ToolError::invalid(
                    tool,
                    format!("options.sigma must be greater than 0 and at most {}", MAX_SIGMA),
                ));
            }
        }
        if let Some(amount) = self.options.amount {
            let range = match self.filter {
                // Contrast is a signed percentage
                Filter::Contrast => -MAX_CONTRAST..=MAX_CONTRAST,
                _ => 0.0..=MAX_BRIGHTNESS,
            };
            if !range.contains(&amount) {
                return Err(ToolError::invalid(
                    tool,
                    format!(
                        "options.amount {} is out of range for {} ({} to {})",
                        amount,
                        self.filter,
                        range.start(),
                        range.end()
                    ),
                ));
            }
        }
        Ok(())
    }
}

pub fn run_apply_filter(input: ApplyFilterInput) -> Result<String, ToolError> {
    let source = open_image(&input.input_path)?;
    let filtered = apply(&source, input.filter, &input.options);
    save_image(&filtered, &input.output_path, ImageKind::from_path(&input.output_path))?;

    tracing::debug!(filter = %input.filter, options = ?input.options, "Applied filter");
    Ok(format!("Applied {} filter and saved to {}", input.filter, input.output_path.display()))
}
