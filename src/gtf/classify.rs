//! Feature classification: splits raw rows into genes, transcripts and exon-like
//! rows, and separates identifier versions from accessions.

use crate::accession::split_version;
use crate::error::Error;

use super::entry::{
    ClassifiedFeatures, ExonFeature, FeatureKind, FeatureRow, GeneFeature, TranscriptFeature,
};

/// Classify raw GTF rows by feature kind.
pub fn classify(rows: impl IntoIterator<Item = FeatureRow>) -> Result<ClassifiedFeatures, Error> {
    let mut features = ClassifiedFeatures::default();

    for row in rows {
        let (gene_id, gene_version) = split_version(&row.gene_id);
        let gene_id = gene_id.to_string();
        let gene_version = gene_version.map(str::to_string);

        match row.kind {
            FeatureKind::Gene => features.genes.push(GeneFeature {
                gene_id,
                gene_version,
                gene_symbol: row.gene_name,
                chrom: row.chrom,
                strand: row.strand,
                start: row.start,
                stop: row.stop,
            }),
            FeatureKind::Transcript => {
                let raw = transcript_id(&row)?;
                let (transcript_id, transcript_version) = split_version(raw);
                features.transcripts.push(TranscriptFeature {
                    transcript_id: transcript_id.to_string(),
                    transcript_version: transcript_version.map(str::to_string),
                    gene_id,
                    chrom: row.chrom,
                    strand: row.strand,
                    start: row.start,
                    stop: row.stop,
                });
            }
            FeatureKind::ExonLike(feature_type) => {
                let transcript_id = split_version(transcript_id(&row)?).0.to_string();
                features.exons.push(ExonFeature {
                    feature_type,
                    transcript_id,
                    gene_id,
                    chrom: row.chrom,
                    strand: row.strand,
                    start: row.start,
                    stop: row.stop,
                });
            }
        }
    }

    Ok(features)
}

fn transcript_id(row: &FeatureRow) -> Result<&str, Error> {
    row.transcript_id.as_deref().ok_or_else(|| {
        Error::Parse(format!(
            "{:?} row of gene {} has no transcript_id",
            row.kind, row.gene_id
        ))
    })
}
