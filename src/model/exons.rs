//! Exon aggregation: coding/non-coding precedence and per-type interval merging.

use std::collections::HashSet;

use crate::chromosome::global_position;
use crate::error::Error;
use crate::gtf::entry::{ExonFeature, ExonType};
use crate::interval::{self, Interval};

use super::types::Exon;

/// Build the exon list of one transcript from its exon-like rows.
///
/// A transcript with any CDS or UTR row is coding: its CDS and UTR rows are
/// merged per type and its plain exon rows are discarded. Otherwise the plain
/// exon rows are merged. The result is ordered by start.
pub fn collect_transcript_exons(chrom: &str, rows: &[&ExonFeature]) -> Result<Vec<Exon>, Error> {
    let intervals = to_intervals(rows);
    let is_coding = rows.iter().any(|r| r.feature_type.is_coding());

    let mut merged = if is_coding {
        let mut coding = interval::merge_tagged(&intervals, ExonType::Cds);
        coding.extend(interval::merge_tagged(&intervals, ExonType::Utr));
        coding
    } else {
        interval::merge_tagged(&intervals, ExonType::Exon)
    };
    merged.sort_by_key(|i| (i.start, i.tag));

    to_exons(chrom, &merged)
}

/// Build the exon list of one gene from the exon-like rows of all its transcripts.
///
/// The list is `merge(CDS) ++ merge(UTR) ++ merge(exons of non-coding transcripts)`.
/// Exon rows of transcripts that have a CDS or UTR row are left out so the
/// same region is not reported twice. The three groups are concatenated
/// without merging across types.
pub fn collect_gene_exons(chrom: &str, rows: &[&ExonFeature]) -> Result<Vec<Exon>, Error> {
    let coding_transcripts: HashSet<&str> = rows
        .iter()
        .filter(|r| r.feature_type.is_coding())
        .map(|r| r.transcript_id.as_str())
        .collect();

    let intervals = to_intervals(rows);
    let non_coding: Vec<Interval> = rows
        .iter()
        .filter(|r| !coding_transcripts.contains(r.transcript_id.as_str()))
        .map(|r| to_interval(r))
        .collect();

    let mut merged = interval::merge_tagged(&intervals, ExonType::Cds);
    merged.extend(interval::merge_tagged(&intervals, ExonType::Utr));
    merged.extend(interval::merge(&non_coding));

    to_exons(chrom, &merged)
}

fn to_interval(row: &ExonFeature) -> Interval {
    Interval::new(row.start, row.stop, Some(row.feature_type))
}

fn to_intervals(rows: &[&ExonFeature]) -> Vec<Interval> {
    rows.iter().map(|r| to_interval(r)).collect()
}

fn to_exons(chrom: &str, intervals: &[Interval]) -> Result<Vec<Exon>, Error> {
    intervals
        .iter()
        .map(|i| {
            Ok(Exon {
                feature_type: i.tag.unwrap_or(ExonType::Exon),
                start: i.start,
                stop: i.stop,
                xstart: global_position(chrom, i.start)?,
                xstop: global_position(chrom, i.stop)?,
            })
        })
        .collect()
}
