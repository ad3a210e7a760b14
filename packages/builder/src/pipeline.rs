//! Build pipeline that ties all components together.
//!
//! Every fatal precondition (document index, terminology size) is checked
//! before the first output is written, so a failed build leaves previous
//! outputs untouched. A document whose file is missing or unreadable is
//! skipped with a warning and the remaining documents are still built.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::annotate::{collect_units, AnnotationStats, Annotator};
use crate::config::{require_input, validate_slug, BuildPaths};
use crate::content::{assign_heading_ids, parse_markdown, render_html};
use crate::error::Result;
use crate::excerpts::extract_excerpts;
use crate::linker::{CrossReferenceLinker, ExternalRegistry, TermLinker};
use crate::search::{build_search_index, check_terminology};
use crate::sections::extract_sections;
use crate::types::{
    AddressableUnit, Document, DocumentIndexEntry, Excerpt, Section, TermRecord, TerminologyFile,
};

/// Excerpts keyed by document slug, then anchor identifier.
pub type ExcerptMap = BTreeMap<String, BTreeMap<String, Excerpt>>;

/// Addressable units keyed by document slug.
pub type UnitMap = BTreeMap<String, Vec<AddressableUnit>>;

/// Everything derived from one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub slug: String,
    pub html: String,
    pub excerpts: BTreeMap<String, Excerpt>,
    pub sections: Vec<Section>,
    pub units: Vec<AddressableUnit>,
    pub stats: AnnotationStats,
    /// External citation links made.
    pub links: usize,
    /// Defined-term links made.
    pub term_links: usize,
}

/// Summary of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub documents: usize,
    /// Indexed documents whose file was missing or unreadable.
    pub skipped: usize,
    pub anchors: usize,
    pub links: usize,
    pub term_links: usize,
    pub excerpts: usize,
    pub sections: usize,
    /// Documents in the search index; `None` when no index was built.
    pub index_documents: Option<usize>,
}

impl BuildReport {
    fn add(&mut self, processed: &ProcessedDocument) {
        self.documents += 1;
        self.anchors += processed.stats.anchors();
        self.links += processed.links;
        self.term_links += processed.term_links;
        self.excerpts += processed.excerpts.len();
        self.sections += processed.sections.len();
    }
}

/// Annotate, link and render one document and derive its excerpts and sections.
///
/// Citations are linked before terms, so a term inside a citation stays part
/// of the citation link. All traversal state is local, so documents can be
/// processed independently.
#[must_use]
pub fn process_document(
    document: &Document,
    annotator: &Annotator,
    linker: &CrossReferenceLinker,
    terms: &TermLinker,
) -> ProcessedDocument {
    let mut tree = parse_markdown(&document.content_markdown);
    assign_heading_ids(&mut tree);
    let stats = annotator.annotate(&mut tree);
    let links = linker.link_tree(&mut tree);
    let term_links = terms.link_tree(&mut tree);

    let html = render_html(&tree);
    let excerpts = extract_excerpts(&tree);
    let units = collect_units(&tree, &excerpts);
    let sections = extract_sections(document);

    tracing::info!(
        slug = %document.slug,
        anchors = stats.anchors(),
        excerpts = excerpts.len(),
        sections = sections.len(),
        links,
        term_links,
        "Processed document"
    );
    if stats.duplicates > 0 || stats.unmatched > 0 {
        tracing::debug!(
            slug = %document.slug,
            duplicates = stats.duplicates,
            unmatched = stats.unmatched,
            "Absorbed annotation anomalies"
        );
    }

    ProcessedDocument {
        slug: document.slug.clone(),
        html,
        excerpts,
        sections,
        units,
        stats,
        links,
        term_links,
    }
}

/// Load the document index and validate its slugs.
pub fn load_document_index(path: &Path) -> Result<Vec<DocumentIndexEntry>> {
    require_input("document index", path)?;
    let entries: Vec<DocumentIndexEntry> = serde_json::from_str(&fs::read_to_string(path)?)?;
    for entry in &entries {
        validate_slug(&entry.slug)?;
    }
    Ok(entries)
}

/// Load the terminology dataset in either of its accepted shapes.
pub fn load_terminology(path: &Path) -> Result<Vec<TermRecord>> {
    require_input("terminology dataset", path)?;
    let file: TerminologyFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(file.into_records())
}

/// Load the external document registry. A missing file yields an empty
/// registry, which disables citation linking.
pub fn load_external_registry(path: &Path) -> Result<ExternalRegistry> {
    if !path.is_file() {
        tracing::warn!(
            path = %path.display(),
            "External document registry not found, citations will not be linked"
        );
        return Ok(ExternalRegistry::default());
    }
    ExternalRegistry::load(path)
}

/// Load one document; the file is released once parsed.
pub fn load_document(path: &Path) -> Result<Document> {
    require_input("document", path)?;
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load every indexed document. Missing or invalid files are skipped with a
/// warning.
///
/// Output paths use the validated index slug, which wins over the file's own.
fn load_documents(paths: &BuildPaths, entries: &[DocumentIndexEntry]) -> Vec<Document> {
    entries
        .iter()
        .filter_map(|entry| {
            let path = paths.document(&entry.slug);
            let mut document = match load_document(&path) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(
                        slug = %entry.slug,
                        path = %path.display(),
                        error = %e,
                        "Skipping document that could not be loaded"
                    );
                    return None;
                }
            };
            if document.slug != entry.slug {
                tracing::warn!(
                    index = %entry.slug,
                    file = %document.slug,
                    "Document slug differs from index entry, using the index slug"
                );
                document.slug.clone_from(&entry.slug);
            }
            Some(document)
        })
        .collect()
}

/// Locally hosted document identifiers, e.g. `910/2014`.
fn hosted_ids(documents: &[Document]) -> Vec<String> {
    documents.iter().map(Document::hosted_id).collect()
}

/// Run the full build: content, excerpts, units, sections and search index.
pub fn build(paths: &BuildPaths, progress: impl Fn(&str)) -> Result<BuildReport> {
    progress("Loading document index...");
    let entries = load_document_index(&paths.document_index())?;

    progress("Loading terminology...");
    let terms = load_terminology(&paths.terminology())?;
    check_terminology(&terms)?;

    let registry = load_external_registry(&paths.external_documents())?;

    progress("Loading documents...");
    let documents = load_documents(paths, &entries);

    let annotator = Annotator::default();
    let linker = CrossReferenceLinker::new(registry, hosted_ids(&documents));
    let term_linker = TermLinker::new(&terms);
    tracing::debug!(spellings = term_linker.len(), "Built term matcher");

    let mut report = BuildReport {
        skipped: entries.len() - documents.len(),
        ..BuildReport::default()
    };
    let mut processed = Vec::with_capacity(documents.len());
    for document in &documents {
        progress(&format!("Processing {}...", document.slug));
        let result = process_document(document, &annotator, &linker, &term_linker);
        report.add(&result);
        processed.push(result);
    }

    progress("Building search index...");
    let sections: Vec<Section> = processed
        .iter()
        .flat_map(|p| p.sections.iter().cloned())
        .collect();
    let index = build_search_index(&sections, &terms)?;
    report.index_documents = Some(index.len());

    progress("Writing outputs...");
    for result in &processed {
        write_atomic(&paths.content_output(&result.slug), &result.html)?;
    }
    write_atomic(
        &paths.excerpts_output(),
        &serde_json::to_string_pretty(&excerpt_map(&processed))?,
    )?;
    write_atomic(
        &paths.units_output(),
        &serde_json::to_string_pretty(&unit_map(&processed))?,
    )?;
    write_atomic(
        &paths.sections_output(),
        &serde_json::to_string_pretty(&sections)?,
    )?;
    write_atomic(&paths.search_index_output(), &index.to_json()?)?;

    tracing::info!(?report, "Build complete");
    Ok(report)
}

/// Build only the excerpt map.
pub fn build_excerpts(paths: &BuildPaths, progress: impl Fn(&str)) -> Result<BuildReport> {
    progress("Loading document index...");
    let entries = load_document_index(&paths.document_index())?;

    progress("Loading documents...");
    let documents = load_documents(paths, &entries);

    let annotator = Annotator::default();
    let linker = CrossReferenceLinker::default();
    let term_linker = TermLinker::default();

    let mut report = BuildReport {
        skipped: entries.len() - documents.len(),
        ..BuildReport::default()
    };
    let mut processed = Vec::with_capacity(documents.len());
    for document in &documents {
        progress(&format!("Processing {}...", document.slug));
        let result = process_document(document, &annotator, &linker, &term_linker);
        report.add(&result);
        processed.push(result);
    }

    progress("Writing excerpts...");
    write_atomic(
        &paths.excerpts_output(),
        &serde_json::to_string_pretty(&excerpt_map(&processed))?,
    )?;

    Ok(report)
}

/// Excerpts of all documents that have at least one.
fn excerpt_map(processed: &[ProcessedDocument]) -> ExcerptMap {
    processed
        .iter()
        .filter(|p| !p.excerpts.is_empty())
        .map(|p| (p.slug.clone(), p.excerpts.clone()))
        .collect()
}

/// Addressable units of all documents that have at least one.
fn unit_map(processed: &[ProcessedDocument]) -> UnitMap {
    processed
        .iter()
        .filter(|p| !p.units.is_empty())
        .map(|p| (p.slug.clone(), p.units.clone()))
        .collect()
}

/// Write a file atomically: temp file, sync, rename.
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = dir.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("content").join("910-2014.html");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("content").join(".910-2014.html.tmp").exists());
    }

    #[test]
    fn test_process_document() {
        let markdown = "# Regulation\n\n### Article 5\n**Obligations**\n\n1. Providers shall comply with Article 6(7) of Regulation (EU) 2022/1925 without undue delay.\n   - (a) notify the supervisory body;\n";
        let document = Document::new("2024-1183", DocumentType::Regulation, "Regulation", "eIDAS 2", markdown);
        let registry = ExternalRegistry::new(vec![crate::types::ExternalDocument {
            id: "2022/1925".to_string(),
            aliases: Vec::new(),
            celex: "32022R1925".to_string(),
            title: "Digital Markets Act".to_string(),
            short_name: "DMA".to_string(),
        }]);
        let linker = CrossReferenceLinker::new(registry, vec!["2024/1183".to_string()]);
        let terms = TermLinker::new(&[TermRecord {
            id: "supervisory-body".to_string(),
            term: "supervisory body".to_string(),
            aliases: Vec::new(),
            sources: Vec::new(),
        }]);

        let processed = process_document(&document, &Annotator::default(), &linker, &terms);
        assert_eq!(processed.stats.anchors(), 2);
        assert_eq!(processed.links, 1);
        assert_eq!(processed.term_links, 1);
        assert!(processed.html.contains("data-term-id=\"supervisory-body\""));
        assert!(processed.html.contains("id=\"article-5-para-1\""));
        assert!(processed.html.contains("id=\"article-5-para-1-point-a\""));
        assert!(processed.html.contains("CELEX:32022R1925#006.007"));
        assert!(processed.excerpts.contains_key("article-5-para-1"));
        assert_eq!(processed.sections[0].id, "2024-1183#article-5");
        assert_eq!(processed.units.len(), 3);
    }

    #[test]
    fn test_load_documents_skips_unreadable_files() {
        let dir = tempdir().unwrap();
        let paths = BuildPaths::new(dir.path(), None);
        let good = Document::new("910-2014", DocumentType::Regulation, "eIDAS", "eIDAS", "Text");
        write_atomic(&paths.document("910-2014"), &serde_json::to_string(&good).unwrap()).unwrap();
        write_atomic(&paths.document("2019-882"), "{ not json").unwrap();

        let entries: Vec<DocumentIndexEntry> = serde_json::from_str(
            r#"[
                {"slug":"910-2014","type":"regulation","title":"eIDAS","shortTitle":"eIDAS"},
                {"slug":"2019-882","type":"directive","title":"EAA","shortTitle":"EAA"},
                {"slug":"2022-2555","type":"directive","title":"NIS2","shortTitle":"NIS2"}
            ]"#,
        )
        .unwrap();

        let documents = load_documents(&paths, &entries);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].slug, "910-2014");
    }

    #[test]
    fn test_missing_registry_is_empty() {
        let dir = tempdir().unwrap();
        let registry = load_external_registry(&dir.path().join("missing.yaml")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_slug_in_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regulations-index.json");
        fs::write(
            &path,
            r#"[{"slug":"../x","type":"regulation","title":"T","shortTitle":"S"}]"#,
        )
        .unwrap();
        assert!(load_document_index(&path).is_err());
    }
}
