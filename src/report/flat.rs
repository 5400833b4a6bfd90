//! CSV-ready flat tables.
//!
//! Every cell is a plain string. Scores and percentages use two decimals,
//! aggregate statistics use one, and unknown values print as "—".

use super::CycleReport;
use crate::core::{Channel, Pillar};
use crate::scoring::slot_labels;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

pub const UNKNOWN_CELL: &str = "—";

pub fn format_score(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        UNKNOWN_CELL.to_string()
    }
}

pub fn format_optional_score(value: Option<f64>) -> String {
    value.map(format_score).unwrap_or_else(|| UNKNOWN_CELL.to_string())
}

pub fn format_statistic(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", value)
    } else {
        UNKNOWN_CELL.to_string()
    }
}

fn format_flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => UNKNOWN_CELL.to_string(),
    }
}

/// Which table to flatten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportTable {
    Ranking,
    Triangulation,
    Variance,
    ProductTests,
    Summary,
    Pillars,
}

/// A header row plus data rows of primitive strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FlatTable {
    fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append this table to a CSV stream, optionally preceded by its header.
    pub fn write_csv<W: Write>(
        &self,
        writer: &mut csv::Writer<W>,
        include_header: bool,
    ) -> Result<()> {
        if include_header {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        Ok(())
    }
}

fn headers(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

impl CycleReport {
    pub fn flat_table(&self, table: ReportTable) -> FlatTable {
        match table {
            ReportTable::Ranking => self.ranking_table(),
            ReportTable::Triangulation => self.triangulation_table(),
            ReportTable::Variance => self.variance_table(),
            ReportTable::ProductTests => self.product_test_table(),
            ReportTable::Summary => self.summary_table(),
            ReportTable::Pillars => self.pillar_table(),
        }
    }

    pub fn ranking_table(&self) -> FlatTable {
        let mut table = FlatTable::new(headers(&[
            "cycle_id",
            "rank",
            "company_id",
            "company",
            "tier",
            "size_category",
            "sat_total",
            "ivc_total",
            "pt_score",
            "ieg_total",
            "final_score",
        ]));
        for record in &self.companies {
            table.rows.push(vec![
                self.cycle_id.clone(),
                record.rank.to_string(),
                record.company_id.clone(),
                record.name.clone(),
                record.tier.clone().unwrap_or_else(|| UNKNOWN_CELL.to_string()),
                record
                    .size_category
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CELL.to_string()),
                format_score(record.self_reported_total),
                format_score(record.validated_total),
                format_optional_score(record.pt_score),
                format_score(record.expert_total),
                format_score(record.final_score),
            ]);
        }
        table
    }

    pub fn triangulation_table(&self) -> FlatTable {
        let mut labels = vec!["cycle_id".to_string(), "company_id".to_string(), "company".to_string()];
        labels.extend(slot_labels());
        let mut table = FlatTable::new(labels);
        for record in &self.triangulation {
            let mut row = vec![
                self.cycle_id.clone(),
                record.company_id.clone(),
                record.company_name.clone(),
            ];
            row.extend(
                record
                    .slots()
                    .iter()
                    .map(|cell| format_optional_score(cell.value())),
            );
            table.rows.push(row);
        }
        table
    }

    pub fn variance_table(&self) -> FlatTable {
        let mut table = FlatTable::new(headers(&[
            "cycle_id",
            "company_id",
            "metric_pair",
            "metric_a",
            "metric_b",
            "delta",
            "threshold",
            "flagged",
        ]));
        for flag in &self.variance_flags {
            table.rows.push(vec![
                self.cycle_id.clone(),
                flag.company_id.clone(),
                flag.metric_pair_label.clone(),
                format_score(flag.metric_a),
                format_score(flag.metric_b),
                format_score(flag.delta),
                format_score(flag.threshold),
                format_flag(Some(flag.exceeded_threshold)),
            ]);
        }
        table
    }

    pub fn product_test_table(&self) -> FlatTable {
        let mut table = FlatTable::new(headers(&[
            "cycle_id",
            "company_id",
            "brand_id",
            "brand",
            "food_vehicle",
            "pt_score",
            "band_percent",
            "compliance_band",
            "narrative_band",
            "aflatoxin_compliant",
        ]));
        for test in &self.product_tests {
            table.rows.push(vec![
                self.cycle_id.clone(),
                test.company_id.clone(),
                test.brand_id.clone(),
                test.brand_name.clone(),
                test.food_vehicle.label().to_string(),
                format_score(test.pt_score),
                format_optional_score(test.band_percent),
                test.compliance_band.label().to_string(),
                test.narrative_band.label().to_string(),
                format_flag(test.aflatoxin_compliant),
            ]);
        }
        table
    }

    pub fn summary_table(&self) -> FlatTable {
        let mut table = FlatTable::new(headers(&[
            "cycle_id", "metric", "mean", "median", "min", "max",
        ]));
        let summary = &self.summary;
        let metrics = [
            ("final_score", summary.final_score),
            ("sat_total", summary.self_reported_total),
            ("ivc_total", summary.validated_total),
            ("pt_score", summary.product_test_score),
            ("ieg_total", summary.expert_total),
        ];
        for (name, stats) in metrics {
            let cells = match stats {
                Some(s) => vec![
                    format_statistic(s.mean),
                    format_statistic(s.median),
                    format_statistic(s.min),
                    format_statistic(s.max),
                ],
                None => vec![UNKNOWN_CELL.to_string(); 4],
            };
            let mut row = vec![self.cycle_id.clone(), name.to_string()];
            row.extend(cells);
            table.rows.push(row);
        }
        table
    }

    /// Pillar × channel cells, one row per company and pillar in rank order.
    pub fn pillar_table(&self) -> FlatTable {
        let mut table = FlatTable::new(headers(&[
            "cycle_id",
            "company_id",
            "pillar",
            "max_weight",
            "sat",
            "ivc",
            "ieg",
        ]));
        for record in &self.companies {
            for pillar in Pillar::ALL {
                let mut row = vec![
                    self.cycle_id.clone(),
                    record.company_id.clone(),
                    pillar.code().to_string(),
                    format_score(pillar.max_weight()),
                ];
                row.extend(
                    Channel::ALL
                        .iter()
                        .map(|channel| format_optional_score(record.pillar_score(pillar, *channel))),
                );
                table.rows.push(row);
            }
        }
        table
    }
}
