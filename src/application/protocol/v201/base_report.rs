//! GetBaseReport → NotifyReport chunking (spec.md §4.4, §8 law #5).

use serde::{Deserialize, Serialize};

const CHUNK_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportBase {
    ConfigurationInventory,
    FullInventory,
    SummaryInventory,
}

impl ReportBase {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ConfigurationInventory" => Some(Self::ConfigurationInventory),
            "FullInventory" => Some(Self::FullInventory),
            "SummaryInventory" => Some(Self::SummaryInventory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDatum {
    pub component: String,
    pub variable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// `GetBaseReport.conf` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetBaseReportStatus {
    Accepted,
    NotSupported,
    EmptyResultSet,
}

/// Assembles the report-item list for `reportBase` out of the three source
/// sets every report shape draws from, per spec.md §4.4's bullet list.
pub fn collect_report_items(
    report_base: Option<ReportBase>,
    identity_items: &[ReportDatum],
    configuration_items: &[ReportDatum],
    availability_items: &[ReportDatum],
) -> (GetBaseReportStatus, Vec<ReportDatum>) {
    let report_base = match report_base {
        Some(rb) => rb,
        None => return (GetBaseReportStatus::NotSupported, Vec::new()),
    };

    let items: Vec<ReportDatum> = match report_base {
        ReportBase::ConfigurationInventory => configuration_items.to_vec(),
        ReportBase::FullInventory => identity_items
            .iter()
            .chain(configuration_items)
            .chain(availability_items)
            .cloned()
            .collect(),
        ReportBase::SummaryInventory => identity_items.iter().chain(availability_items).cloned().collect(),
    };

    if items.is_empty() {
        (GetBaseReportStatus::EmptyResultSet, items)
    } else {
        (GetBaseReportStatus::Accepted, items)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyReportChunk {
    pub seq_no: u32,
    pub report_data: Vec<ReportDatum>,
    pub tbc: bool,
}

/// Chunks `items` into `NotifyReport` requests at ≤100 items each, with
/// strictly increasing `seqNo` from 0 and `tbc = true` on all but the last
/// (spec.md §8 law #5). When `items` is empty a single empty-bodied chunk
/// is emitted to close the sequence, matching the GetBaseReport note.
pub fn build_notify_report_chunks(items: Vec<ReportDatum>) -> Vec<NotifyReportChunk> {
    if items.is_empty() {
        return vec![NotifyReportChunk {
            seq_no: 0,
            report_data: Vec::new(),
            tbc: false,
        }];
    }

    let chunks: Vec<&[ReportDatum]> = items.chunks(CHUNK_SIZE).collect();
    let last_index = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| NotifyReportChunk {
            seq_no: index as u32,
            report_data: chunk.to_vec(),
            tbc: index != last_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<ReportDatum> {
        (0..n)
            .map(|i| ReportDatum {
                component: "Connector".into(),
                variable: format!("Item{i}"),
                value: None,
            })
            .collect()
    }

    #[test]
    fn unknown_report_base_is_not_supported() {
        let (status, items) = collect_report_items(None, &[], &[], &[]);
        assert_eq!(status, GetBaseReportStatus::NotSupported);
        assert!(items.is_empty());
    }

    #[test]
    fn empty_result_set_reported() {
        let (status, _) = collect_report_items(Some(ReportBase::ConfigurationInventory), &[], &[], &[]);
        assert_eq!(status, GetBaseReportStatus::EmptyResultSet);
    }

    #[test]
    fn s6_scenario_chunks_250_items_into_three_notify_reports() {
        let chunks = build_notify_report_chunks(items(250));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.iter().map(|c| c.report_data.len()).collect::<Vec<_>>(), vec![100, 100, 50]);
        assert_eq!(chunks.iter().map(|c| c.seq_no).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(chunks.iter().map(|c| c.tbc).collect::<Vec<_>>(), vec![true, true, false]);
    }

    #[test]
    fn empty_report_still_sends_one_closing_notify_report() {
        let chunks = build_notify_report_chunks(Vec::new());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].report_data.is_empty());
        assert!(!chunks[0].tbc);
    }

    #[test]
    fn exact_multiple_of_chunk_size_has_no_trailing_empty_chunk() {
        let chunks = build_notify_report_chunks(items(200));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].report_data.len(), 100);
        assert!(!chunks[1].tbc);
    }
}
