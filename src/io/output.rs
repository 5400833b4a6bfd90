use crate::report::{format_statistic, CycleReport, FlatTable, ReportTable, ScoreStatistics};
use crate::scoring::FortificationBand;
use clap::ValueEnum;
use colored::*;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Terminal,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name {
            "terminal" => Some(OutputFormat::Terminal),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

pub trait ReportWriter {
    fn write_reports(&mut self, reports: &[CycleReport]) -> anyhow::Result<()>;
}

/// Full reports as a pretty-printed JSON array, one element per cycle.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[CycleReport]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(reports)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// One flat table across every cycle. The header is written once and each
/// row carries its `cycle_id`.
pub struct CsvWriter<W: Write> {
    writer: W,
    table: ReportTable,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W, table: ReportTable) -> Self {
        Self { writer, table }
    }
}

impl<W: Write> ReportWriter for CsvWriter<W> {
    fn write_reports(&mut self, reports: &[CycleReport]) -> anyhow::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(&mut self.writer);

        if reports.is_empty() {
            // Header only, so the file is still self-describing.
            CycleReport::empty("")
                .flat_table(self.table)
                .write_csv(&mut csv_writer, true)?;
        }
        for (idx, report) in reports.iter().enumerate() {
            report
                .flat_table(self.table)
                .write_csv(&mut csv_writer, idx == 0)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    table: Option<ReportTable>,
    plain: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, table: Option<ReportTable>, plain: bool) -> Self {
        Self {
            writer,
            table,
            plain,
        }
    }

    fn render(&self, flat: &FlatTable) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.plain {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            })
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(flat.headers.iter().map(|h| Cell::new(h)));
        for row in &flat.rows {
            table.add_row(row.iter().map(|cell| Cell::new(cell)));
        }
        table
    }

    fn write_header(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        let title = format!("Fortimap Cycle {}", report.cycle_id);
        let rule = "=".repeat(title.len());
        if self.plain {
            writeln!(self.writer, "{title}")?;
            writeln!(self.writer, "{rule}")?;
        } else {
            writeln!(self.writer, "{}", title.bold().blue())?;
            writeln!(self.writer, "{}", rule.blue())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_ranking(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        let table = self.render(&report.ranking_table());
        writeln!(self.writer, "Ranking ({} companies):", report.companies.len())?;
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        writeln!(self.writer, "Summary:")?;
        writeln!(
            self.writer,
            "  Final score: {}",
            describe_statistics(summary.final_score.as_ref())
        )?;
        writeln!(
            self.writer,
            "  Product tests: {}",
            describe_statistics(summary.product_test_score.as_ref())
        )?;

        let mut bands = Table::new();
        bands
            .load_preset(if self.plain {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            })
            .set_header(vec!["band", "product tests"]);
        for band in [
            FortificationBand::FullyFortified,
            FortificationBand::AdequatelyFortified,
            FortificationBand::PartlyFortified,
            FortificationBand::InadequatelyFortified,
            FortificationBand::NotFortified,
            FortificationBand::NotAvailable,
        ] {
            let count = summary.band_count(band);
            let mut cell = Cell::new(band.label());
            if !self.plain {
                cell = cell.fg(band_color(band));
            }
            bands.add_row(vec![cell, Cell::new(count)]);
        }
        writeln!(self.writer, "{bands}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_variance(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        let flagged: Vec<_> = report
            .variance_flags
            .iter()
            .filter(|f| f.exceeded_threshold)
            .collect();
        if flagged.is_empty() {
            let line = format!(
                "No variance flags ({} pairs compared)",
                report.variance_flags.len()
            );
            if self.plain {
                writeln!(self.writer, "{line}")?;
            } else {
                writeln!(self.writer, "{}", line.green())?;
            }
            writeln!(self.writer)?;
            return Ok(());
        }

        let heading = format!(
            "Variance flags ({} of {} pairs):",
            flagged.len(),
            report.variance_flags.len()
        );
        if self.plain {
            writeln!(self.writer, "{heading}")?;
        } else {
            writeln!(self.writer, "{}", heading.red().bold())?;
        }
        for flag in flagged {
            writeln!(
                self.writer,
                "  - {} {}: {:.2} vs {:.2} (delta {:.2}, threshold {:.2})",
                flag.company_id,
                flag.metric_pair_label,
                flag.metric_a,
                flag.metric_b,
                flag.delta,
                flag.threshold
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_diagnostics(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        if report.diagnostics.is_empty() {
            return Ok(());
        }
        let heading = format!("Data-quality diagnostics ({}):", report.diagnostics.len());
        if self.plain {
            writeln!(self.writer, "{heading}")?;
        } else {
            writeln!(self.writer, "{}", heading.yellow())?;
        }
        for (kind, count) in report.diagnostics.counts_by_kind() {
            writeln!(self.writer, "  {kind}: {count}")?;
        }
        let unmapped = report.diagnostics.unmapped_labels();
        if !unmapped.is_empty() {
            writeln!(self.writer, "  unmapped labels: {}", unmapped.join(", "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_reports(&mut self, reports: &[CycleReport]) -> anyhow::Result<()> {
        if reports.is_empty() {
            writeln!(self.writer, "No assessment cycles found.")?;
            return Ok(());
        }

        for report in reports {
            self.write_header(report)?;
            match self.table {
                Some(table) => {
                    let rendered = self.render(&report.flat_table(table));
                    writeln!(self.writer, "{rendered}")?;
                    writeln!(self.writer)?;
                }
                None => {
                    self.write_ranking(report)?;
                    self.write_summary(report)?;
                    self.write_variance(report)?;
                    self.write_diagnostics(report)?;
                }
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn describe_statistics(stats: Option<&ScoreStatistics>) -> String {
    match stats {
        Some(s) => format!(
            "mean {} | median {} | min {} | max {}",
            format_statistic(s.mean),
            format_statistic(s.median),
            format_statistic(s.min),
            format_statistic(s.max)
        ),
        None => "n/a".to_string(),
    }
}

fn band_color(band: FortificationBand) -> Color {
    match band {
        FortificationBand::FullyFortified | FortificationBand::AdequatelyFortified => Color::Green,
        FortificationBand::PartlyFortified => Color::Yellow,
        FortificationBand::InadequatelyFortified | FortificationBand::NotFortified => Color::Red,
        FortificationBand::NotAvailable => Color::Grey,
    }
}

/// Writer for `format`. CSV needs a table; it defaults to the ranking.
pub fn create_writer<'a>(
    format: OutputFormat,
    table: Option<ReportTable>,
    plain: bool,
    destination: Box<dyn Write + 'a>,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Csv => Box::new(CsvWriter::new(
            destination,
            table.unwrap_or(ReportTable::Ranking),
        )),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination, table, plain)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{RowFilter, Snapshot};
    use crate::pipeline::{compute_all_cycles, EngineSettings};
    use crate::scoring::VarianceThresholds;

    fn reports() -> Vec<CycleReport> {
        let snapshot = Snapshot::from_json_str(
            r#"{
                "scores": [
                    {"company_id": "a", "company_name": "Alpha", "category": "PMS", "type": "IVC", "score": 10, "cycle_id": "2023"},
                    {"company_id": "a", "category": "PMS", "type": "SAT", "score": 14, "cycle_id": "2023"},
                    {"company_id": "b", "category": "PMS", "type": "IVC", "score": 5, "cycle_id": "2024"}
                ]
            }"#,
        )
        .unwrap();
        let settings = EngineSettings::new(
            VarianceThresholds {
                self_vs_validated_points: 10.0,
                validated_vs_expert_points: 10.0,
                pillar_percent: 5.0,
            },
            RowFilter::default(),
        );
        compute_all_cycles(&snapshot, &settings)
    }

    fn render(format: OutputFormat, table: Option<ReportTable>) -> String {
        let mut buffer = Vec::new();
        create_writer(format, table, true, Box::new(&mut buffer))
            .write_reports(&reports())
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn csv_has_single_header_and_cycle_column() {
        let output = render(OutputFormat::Csv, Some(ReportTable::Ranking));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("cycle_id,rank,company_id"));
        assert!(lines[1].starts_with("2023,1,a,Alpha"));
        assert!(lines[2].starts_with("2024,1,b,b"));
    }

    #[test]
    fn json_is_an_array_of_cycles() {
        let output = render(OutputFormat::Json, None);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let cycles = value.as_array().unwrap();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0]["cycle_id"], "2023");
        assert_eq!(cycles[0]["companies"][0]["validated_total"], 10.0);
    }

    #[test]
    fn terminal_lists_flagged_pairs() {
        let output = render(OutputFormat::Terminal, None);
        assert!(output.contains("Fortimap Cycle 2023"));
        assert!(output.contains("PMS SAT vs IVC (%)"));
        assert!(output.contains("No variance flags"));
    }

    #[test]
    fn config_format_names() {
        assert_eq!(OutputFormat::from_config_name("csv"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_config_name("xml"), None);
    }
}
