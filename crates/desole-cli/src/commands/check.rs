//! Check command - Test text against the noise filter

use anyhow::Result;
use clap::Args;
use desole_agent::NoiseFilter;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Message or stack text to check
    text: String,
}

impl CheckCommand {
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        formatter.noise_check(&self.text, NoiseFilter::is_noise(&self.text));

        Ok(())
    }
}
