//! GTF reader: converts GENCODE/Ensembl GTF annotations into classified feature rows.

pub mod classify;
pub mod entry;
pub mod parser;

use std::io::BufRead;
use std::path::Path;

use crate::error::Error;
use crate::text_file;

use entry::{ClassifiedFeatures, FeatureRow};
use parser::ParsedLine;

/// Parse GTF from a buffered reader.
pub fn parse_gtf<R: BufRead>(reader: R) -> Result<Vec<FeatureRow>, Error> {
    let mut rows = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;
        match parser::parse_line(&line)
            .map_err(|e| Error::Parse(format!("{e} (line {line_num}: {line})")))?
        {
            ParsedLine::Row(row) => rows.push(*row),
            ParsedLine::Discarded | ParsedLine::Comment => continue,
        }
    }

    Ok(rows)
}

/// Read and classify a GTF file. Paths ending in `.gz` are decompressed.
pub fn load_features(path: &Path) -> Result<ClassifiedFeatures, Error> {
    let rows = parse_gtf(text_file::open(path)?)?;
    log::info!("{}: {} feature rows", path.display(), rows.len());
    classify::classify(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    const GTF: &str = "\
##description: test
chr1\tHAVANA\tgene\t11869\t14409\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; gene_name \"DDX11L1\";
chr1\tHAVANA\ttranscript\t11869\t14409\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; transcript_id \"ENST00000456328.2\"; gene_name \"DDX11L1\";
chr1\tHAVANA\texon\t11869\t12227\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; transcript_id \"ENST00000456328.2\"; exon_number 1;
chr1\tHAVANA\texon\t12613\t12721\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; transcript_id \"ENST00000456328.2\"; exon_number 2;
chr1\tHAVANA\tstop_codon\t12719\t12721\t.\t+\t0\tgene_id \"ENSG00000223972.5\"; transcript_id \"ENST00000456328.2\";
";

    #[test]
    fn parse_worked_example() {
        let rows = parse_gtf(Cursor::new(GTF)).unwrap();
        assert_eq!(rows.len(), 4);

        let features = classify::classify(rows).unwrap();
        assert_eq!(features.genes.len(), 1);
        assert_eq!(features.transcripts.len(), 1);
        assert_eq!(features.exons.len(), 2);
        assert_eq!(features.exons[1].start, 12613);
    }

    #[test]
    fn load_gzip_file() {
        let f = tempfile::Builder::new().suffix(".gtf.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(f.reopen().unwrap(), Compression::fast());
        encoder.write_all(GTF.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let features = load_features(f.path()).unwrap();
        assert_eq!(features.genes.len(), 1);
        assert_eq!(features.transcripts.len(), 1);
        assert_eq!(features.exons.len(), 2);
    }

    #[test]
    fn error_reports_line_number() {
        let gtf = "chr1\tHAVANA\tgene\tabc\t14409\t.\t+\t.\tgene_id \"G.1\";\n";
        let err = parse_gtf(Cursor::new(gtf)).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn load_plain_file() {
        let mut f = tempfile::Builder::new().suffix(".gtf").tempfile().unwrap();
        f.write_all(GTF.as_bytes()).unwrap();
        let features = load_features(f.path()).unwrap();
        assert_eq!(features.genes[0].gene_symbol.as_deref(), Some("DDX11L1"));
    }
}
