//! Hierarchy assembly: attaches exon lists to transcripts and transcripts to genes.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::chromosome::global_position;
use crate::context::ExecutionContext;
use crate::error::Error;
use crate::gtf::entry::{ClassifiedFeatures, ExonFeature, GeneFeature, TranscriptFeature};

use super::exons::{collect_gene_exons, collect_transcript_exons};
use super::types::{GeneVersionRecord, TranscriptRecord};

/// Exon-like rows keyed by (parent accession, chromosome).
type ExonGroups<'a> = HashMap<(&'a str, &'a str), Vec<&'a ExonFeature>>;

/// Build one [`GeneVersionRecord`] per gene of a single annotation release.
///
/// Transcripts and exon rows whose gene is missing from the release are
/// dropped and counted. When an accession occurs more than once (PAR copies
/// on X and Y) the copy with the lowest global start is kept. Records are
/// returned sorted by gene_id.
pub fn assemble(
    ctx: &ExecutionContext,
    features: ClassifiedFeatures,
) -> Result<Vec<GeneVersionRecord>, Error> {
    let ClassifiedFeatures {
        genes,
        transcripts,
        exons,
    } = features;
    let before = ctx.diagnostics().snapshot();

    let genes = keep_lowest_position(
        ctx,
        "gene",
        genes,
        |g| g.gene_id.as_str(),
        |g| global_position(&g.chrom, g.start),
    )?;
    // Orphans go before any position is computed: their contig may be unmapped
    let transcripts: Vec<TranscriptFeature> = transcripts
        .into_iter()
        .filter(|t| {
            let known = genes.contains_key(&t.gene_id);
            if !known {
                ctx.diagnostics().record(&Error::MissingGeneReference {
                    child: t.transcript_id.clone(),
                    gene_id: t.gene_id.clone(),
                });
            }
            known
        })
        .collect();
    let transcripts = keep_lowest_position(
        ctx,
        "transcript",
        transcripts,
        |t| t.transcript_id.as_str(),
        |t| global_position(&t.chrom, t.start),
    )?;

    let mut gene_exon_rows: ExonGroups<'_> = HashMap::new();
    let mut transcript_exon_rows: ExonGroups<'_> = HashMap::new();
    for row in &exons {
        if !genes.contains_key(&row.gene_id) {
            ctx.diagnostics().record(&Error::MissingGeneReference {
                child: format!(
                    "{} {}:{}-{} of {}",
                    row.feature_type, row.chrom, row.start, row.stop, row.transcript_id
                ),
                gene_id: row.gene_id.clone(),
            });
            continue;
        }
        gene_exon_rows
            .entry((row.gene_id.as_str(), row.chrom.as_str()))
            .or_default()
            .push(row);
        transcript_exon_rows
            .entry((row.transcript_id.as_str(), row.chrom.as_str()))
            .or_default()
            .push(row);
    }

    let transcripts: Vec<TranscriptFeature> = transcripts.into_values().collect();

    let transcript_records: Vec<TranscriptRecord> = ctx.install(|| {
        transcripts
            .par_iter()
            .map(|t| build_transcript(t, &transcript_exon_rows))
            .collect::<Result<Vec<_>, Error>>()
    })?;

    let mut by_gene: HashMap<String, Vec<TranscriptRecord>> = HashMap::new();
    for record in transcript_records {
        by_gene.entry(record.gene_id.clone()).or_default().push(record);
    }

    let work: Vec<(GeneFeature, Vec<TranscriptRecord>)> = genes
        .into_values()
        .map(|gene| {
            let transcripts = by_gene.remove(&gene.gene_id).unwrap_or_default();
            (gene, transcripts)
        })
        .collect();

    let records = ctx.install(|| {
        work.into_par_iter()
            .map(|(gene, transcripts)| build_gene(gene, transcripts, &gene_exon_rows))
            .collect::<Result<Vec<_>, Error>>()
    })?;

    let after = ctx.diagnostics().snapshot();
    let missing = after.missing_gene_references - before.missing_gene_references;
    if missing > 0 {
        log::warn!("{missing} transcript/exon rows reference genes absent from the annotation");
    }
    Ok(records)
}

fn build_transcript(
    transcript: &TranscriptFeature,
    exon_rows: &ExonGroups<'_>,
) -> Result<TranscriptRecord, Error> {
    let chrom = transcript.chrom.as_str();
    let exons = match exon_rows.get(&(transcript.transcript_id.as_str(), chrom)) {
        Some(rows) => collect_transcript_exons(chrom, rows)?,
        None => Vec::new(),
    };

    Ok(TranscriptRecord {
        transcript_id: transcript.transcript_id.clone(),
        transcript_version: transcript.transcript_version.clone(),
        gene_id: transcript.gene_id.clone(),
        chrom: transcript.chrom.clone(),
        strand: transcript.strand,
        start: transcript.start,
        stop: transcript.stop,
        xstart: global_position(chrom, transcript.start)?,
        xstop: global_position(chrom, transcript.stop)?,
        exons,
        refseq_id: None,
        refseq_version: None,
    })
}

fn build_gene(
    gene: GeneFeature,
    mut transcripts: Vec<TranscriptRecord>,
    exon_rows: &ExonGroups<'_>,
) -> Result<GeneVersionRecord, Error> {
    let exons = match exon_rows.get(&(gene.gene_id.as_str(), gene.chrom.as_str())) {
        Some(rows) => collect_gene_exons(&gene.chrom, rows)?,
        None => Vec::new(),
    };
    transcripts.sort_by(|a, b| {
        (a.start, &a.transcript_id).cmp(&(b.start, &b.transcript_id))
    });

    let xstart = global_position(&gene.chrom, gene.start)?;
    let xstop = global_position(&gene.chrom, gene.stop)?;
    Ok(GeneVersionRecord {
        gene_id: gene.gene_id,
        gene_version: gene.gene_version,
        gene_symbol: gene.gene_symbol,
        chrom: gene.chrom,
        strand: gene.strand,
        start: gene.start,
        stop: gene.stop,
        xstart,
        xstop,
        exons,
        transcripts,
        canonical_transcript_id: None,
    })
}

/// Key items by accession, keeping the one with the lowest global start.
fn keep_lowest_position<T>(
    ctx: &ExecutionContext,
    what: &str,
    items: Vec<T>,
    id: impl Fn(&T) -> &str,
    xstart: impl Fn(&T) -> Result<i64, Error>,
) -> Result<BTreeMap<String, T>, Error> {
    let mut kept: BTreeMap<String, (i64, T)> = BTreeMap::new();
    for item in items {
        let position = xstart(&item)?;
        match kept.entry(id(&item).to_string()) {
            Entry::Vacant(slot) => {
                slot.insert((position, item));
            }
            Entry::Occupied(mut slot) => {
                ctx.diagnostics().record_duplicate(what, slot.key());
                if position < slot.get().0 {
                    slot.insert((position, item));
                }
            }
        }
    }
    Ok(kept.into_iter().map(|(k, (_, item))| (k, item)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtf::entry::ExonType;
    use crate::strand::Strand;

    fn gene(id: &str, chrom: &str, start: u32, stop: u32) -> GeneFeature {
        GeneFeature {
            gene_id: id.to_string(),
            gene_version: Some("1".to_string()),
            gene_symbol: Some(format!("SYM_{id}")),
            chrom: chrom.to_string(),
            strand: Strand::Forward,
            start,
            stop,
        }
    }

    fn transcript(id: &str, gene_id: &str, start: u32, stop: u32) -> TranscriptFeature {
        TranscriptFeature {
            transcript_id: id.to_string(),
            transcript_version: Some("2".to_string()),
            gene_id: gene_id.to_string(),
            chrom: "1".to_string(),
            strand: Strand::Forward,
            start,
            stop,
        }
    }

    fn exon(t: ExonType, transcript_id: &str, gene_id: &str, start: u32, stop: u32) -> ExonFeature {
        ExonFeature {
            feature_type: t,
            transcript_id: transcript_id.to_string(),
            gene_id: gene_id.to_string(),
            chrom: "1".to_string(),
            strand: Strand::Forward,
            start,
            stop,
        }
    }

    fn gene_g() -> ClassifiedFeatures {
        ClassifiedFeatures {
            genes: vec![gene("G", "1", 10, 50)],
            transcripts: vec![transcript("B", "G", 40, 50), transcript("A", "G", 10, 30)],
            exons: vec![
                exon(ExonType::Cds, "A", "G", 10, 20),
                exon(ExonType::Cds, "A", "G", 25, 30),
                exon(ExonType::Exon, "A", "G", 10, 30),
                exon(ExonType::Exon, "B", "G", 40, 50),
            ],
        }
    }

    #[test]
    fn gene_with_coding_and_non_coding_transcripts() {
        let ctx = ExecutionContext::sequential().unwrap();
        let records = assemble(&ctx, gene_g()).unwrap();
        assert_eq!(records.len(), 1);

        let g = &records[0];
        assert_eq!(g.gene_id, "G");
        assert_eq!(g.xstart, 1_000_000_010);
        let gene_spans: Vec<(u32, u32)> = g.exons.iter().map(|e| (e.start, e.stop)).collect();
        assert_eq!(gene_spans, vec![(10, 20), (25, 30), (40, 50)]);

        // Sorted by start: A before B
        assert_eq!(g.transcripts.len(), 2);
        assert_eq!(g.transcripts[0].transcript_id, "A");
        let a_spans: Vec<(u32, u32)> =
            g.transcripts[0].exons.iter().map(|e| (e.start, e.stop)).collect();
        assert_eq!(a_spans, vec![(10, 20), (25, 30)]);
        let b_spans: Vec<(u32, u32)> =
            g.transcripts[1].exons.iter().map(|e| (e.start, e.stop)).collect();
        assert_eq!(b_spans, vec![(40, 50)]);
        assert!(g.transcripts.iter().all(|t| t.refseq_id.is_none()));
    }

    #[test]
    fn orphan_transcript_dropped_and_counted() {
        let ctx = ExecutionContext::sequential().unwrap();
        let mut features = gene_g();
        features.transcripts.push(transcript("ORPHAN", "MISSING", 1, 5));
        features.exons.push(exon(ExonType::Exon, "ORPHAN", "MISSING", 1, 5));

        let records = assemble(&ctx, features).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transcripts.len(), 2);
        assert_eq!(ctx.diagnostics().snapshot().missing_gene_references, 2);
    }

    #[test]
    fn orphan_on_unmapped_contig_is_dropped_not_fatal() {
        let ctx = ExecutionContext::sequential().unwrap();
        let mut features = gene_g();
        let mut orphan = transcript("ORPHAN", "MISSING", 1, 5);
        orphan.chrom = "KI270706.1".to_string();
        features.transcripts.push(orphan);
        let mut orphan_exon = exon(ExonType::Exon, "ORPHAN", "MISSING", 1, 5);
        orphan_exon.chrom = "KI270706.1".to_string();
        features.exons.push(orphan_exon);

        let records = assemble(&ctx, features).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transcripts.len(), 2);
        assert_eq!(ctx.diagnostics().snapshot().missing_gene_references, 2);
    }

    #[test]
    fn gene_without_transcripts_or_exons() {
        let ctx = ExecutionContext::sequential().unwrap();
        let features = ClassifiedFeatures {
            genes: vec![gene("LONELY", "2", 5, 9)],
            ..Default::default()
        };
        let records = assemble(&ctx, features).unwrap();
        assert!(records[0].transcripts.is_empty());
        assert!(records[0].exons.is_empty());
    }

    #[test]
    fn duplicate_par_gene_keeps_lowest_position() {
        let ctx = ExecutionContext::sequential().unwrap();
        let features = ClassifiedFeatures {
            genes: vec![gene("PAR", "Y", 100, 200), gene("PAR", "X", 100, 200)],
            ..Default::default()
        };
        let records = assemble(&ctx, features).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chrom, "X");
        assert_eq!(ctx.diagnostics().snapshot().duplicate_records, 1);
    }

    #[test]
    fn sorted_by_gene_id_and_parallel_matches_sequential() {
        let build = |threads| {
            let ctx = ExecutionContext::new(threads).unwrap();
            let mut features = gene_g();
            features.genes.push(gene("C", "3", 1, 2));
            features.genes.push(gene("E", "X", 1, 2));
            assemble(&ctx, features).unwrap()
        };
        let sequential = build(1);
        let ids: Vec<&str> = sequential.iter().map(|g| g.gene_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "E", "G"]);
        assert_eq!(build(4), sequential);
    }

    #[test]
    fn invalid_chromosome_is_fatal() {
        let ctx = ExecutionContext::sequential().unwrap();
        let features = ClassifiedFeatures {
            genes: vec![gene("G", "GL000009.2", 1, 2)],
            ..Default::default()
        };
        assert!(matches!(
            assemble(&ctx, features),
            Err(Error::InvalidChromosome(_))
        ));
    }
}
