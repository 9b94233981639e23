//! In-process XLSX workbook writer.

use async_trait::async_trait;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use crate::error::{EngineError, EngineResult};
use crate::models::TabularArtifact;

use super::SpreadsheetEmitter;

/// Background colours cycled through by team number.
const TEAM_COLORS: [u32; 18] = [
    0xFFFFCC, 0xAECF00, 0x66FFFF, 0x66FF99, 0x00CCFF, 0xCC99FF, 0xFF99CC, 0xDD4814, 0xFFD320,
    0x99FF33, 0xCCFFFF, 0x99CCCC, 0x9999FF, 0xFF9999, 0x993300, 0x83CAFF, 0xFFFF00, 0x808080,
];

const TEAM_COLUMN: &str = "coffee team";
const SWAP_GROUP_COLUMN: &str = "swap group";

/// Writes the artifact as a single-sheet workbook.
///
/// The first column is left-aligned, the others are centred, and the
/// `coffee team` or `swap group` column is tinted by its number so groups
/// stand out.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxEmitter;

impl XlsxEmitter {
    /// Builds the workbook bytes.
    pub fn render(artifact: &TabularArtifact) -> EngineResult<Vec<u8>> {
        Self::write_workbook(artifact).map_err(|e| EngineError::EmitterError {
            diagnostic: e.to_string(),
        })
    }

    fn write_workbook(artifact: &TabularArtifact) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let center = Format::new().set_align(FormatAlign::Center);
        let team_column = artifact
            .header()
            .iter()
            .position(|column| column == TEAM_COLUMN || column == SWAP_GROUP_COLUMN);

        for (r, row) in artifact.all_rows().enumerate() {
            let r = u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (c, value) in row.iter().enumerate() {
                let c = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
                if r > 0 && Some(usize::from(c)) == team_column {
                    let format = center.clone().set_background_color(team_color(value));
                    worksheet.write_string_with_format(r, c, value, &format)?;
                } else if c == 0 {
                    worksheet.write_string(r, c, value)?;
                } else {
                    worksheet.write_string_with_format(r, c, value, &center)?;
                }
            }
        }

        for (c, column) in artifact.header().iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
            worksheet.set_column_width(c, column_width(column))?;
        }

        workbook.save_to_buffer()
    }
}

fn team_color(label: &str) -> Color {
    match label.trim().parse::<usize>() {
        Ok(number) => Color::RGB(TEAM_COLORS[number % TEAM_COLORS.len()]),
        Err(_) => Color::White,
    }
}

fn column_width(column: &str) -> f64 {
    match column {
        "name" => 30.0,
        TEAM_COLUMN | SWAP_GROUP_COLUMN => 15.0,
        "replaces" => 30.0,
        _ => 40.0,
    }
}

#[async_trait]
impl SpreadsheetEmitter for XlsxEmitter {
    async fn emit(&self, artifact: &TabularArtifact) -> EngineResult<Vec<u8>> {
        Self::render(artifact)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}
