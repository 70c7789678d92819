use std::path::PathBuf;

use clap::Args;
use stegalab_core::{CodecOptions, EmbeddingPlan};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::CliResult;

/// Shows how much every method can hide in an image
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Carrier image (png, jpg, jpeg, bmp or gif)
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Units")]
    units: usize,
    #[tabled(rename = "Bits per unit")]
    bits_per_unit: usize,
    #[tabled(rename = "Capacity (bits)")]
    capacity: usize,
    #[tabled(rename = "Max message (bytes)")]
    max_bytes: usize,
}

impl From<EmbeddingPlan> for Row {
    fn from(plan: EmbeddingPlan) -> Self {
        Row {
            method: plan.method.to_string(),
            units: plan.units,
            bits_per_unit: plan.bits_per_unit,
            capacity: plan.capacity_bits(),
            max_bytes: plan.max_message_bytes(),
        }
    }
}

impl CapacityArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        let plans = stegalab_core::commands::capacity(&self.media, &options)?;

        let mut table = Table::new(plans.into_iter().map(Row::from));
        table.with(Style::rounded());
        println!("{table}");

        Ok(())
    }
}
