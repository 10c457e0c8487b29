//! Versioned accession handling ("ENSG00000223972.5" → accession + version).

/// Splits `ACCESSION.VERSION` at the first dot.
///
/// Returns the accession and the version when a non-empty suffix is present.
/// PAR-tagged GENCODE identifiers keep their tag in the version
/// (`ENSG00000182378.14_PAR_Y` → `ENSG00000182378`, `14_PAR_Y`).
#[must_use]
pub fn split_version(id: &str) -> (&str, Option<&str>) {
    match id.split_once('.') {
        Some((accession, version)) if !version.is_empty() => (accession, Some(version)),
        Some((accession, _)) => (accession, None),
        None => (id, None),
    }
}

/// Strips the version suffix from an accession.
#[must_use]
pub fn strip_version(id: &str) -> &str {
    split_version(id).0
}
