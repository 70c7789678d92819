use std::path::PathBuf;

use clap::Args;
use stegalab_core::api::compare::CompareRow;
use stegalab_core::CodecOptions;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{format_psnr, format_ssim};
use crate::CliResult;

/// Runs every method on one carrier and prints a comparison table
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Carrier image (png, jpg, jpeg, bmp or gif), used readonly.
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Folder for the <stem>_<method>.png outputs, defaults to the carrier's folder
    #[arg(short = 'o', long = "out", value_name = "output folder")]
    pub output_folder: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message", required = true)]
    pub message: Option<String>,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Encode (s)")]
    encode_time: String,
    #[tabled(rename = "Decode (s)")]
    decode_time: String,
    #[tabled(rename = "SSIM")]
    ssim: String,
    #[tabled(rename = "PSNR")]
    psnr: String,
    #[tabled(rename = "Recovered")]
    recovered: String,
    #[tabled(rename = "Output / Error")]
    detail: String,
}

impl From<CompareRow> for Row {
    fn from(row: CompareRow) -> Self {
        let method = row.method.to_string();
        match row.outcome {
            Ok(report) => Row {
                method,
                encode_time: format!("{:.3}", report.encode_time.as_secs_f64()),
                decode_time: format!("{:.3}", report.decode_time.as_secs_f64()),
                ssim: format_ssim(report.quality.ssim),
                psnr: format_psnr(report.quality.psnr),
                recovered: if report.recovered_ok { "yes" } else { "no" }.to_string(),
                detail: report.output.display().to_string(),
            },
            Err(e) => Row {
                method,
                encode_time: "-".to_string(),
                decode_time: "-".to_string(),
                ssim: "-".to_string(),
                psnr: "-".to_string(),
                recovered: "-".to_string(),
                detail: e.to_string(),
            },
        }
    }
}

impl CompareArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        let rows = stegalab_core::commands::compare(
            &self.media,
            self.output_folder.as_deref(),
            self.message,
            options,
        )?;

        let mut table = Table::new(rows.into_iter().map(Row::from));
        table.with(Style::rounded());
        println!("{table}");

        Ok(())
    }
}
