//! File-level export and merge, plus the default output naming used by the command line tool.
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use crate::container::ShapeFile;
use crate::diag::Diagnostics;
use crate::document::PhyModelDocument;
use crate::error::Result;
use crate::export::{self, Export};
use crate::import;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// `Car.Shape.Gbx` -> `Car.Shape.json`.  Inputs without a `.gbx` extension get `.json`
/// appended instead.
pub fn document_path(input: &Path) -> PathBuf {
    if has_extension(input, "gbx") {
        input.with_extension("json")
    } else {
        append_extension(input, "json")
    }
}

/// `Car.Shape.json` -> `Car.Shape.json.Gbx`.
pub fn merged_path(document: &Path) -> PathBuf {
    append_extension(document, "Gbx")
}

/// Orders a pair of merge arguments as `(document, base)`.  The document is whichever path ends
/// in `.json`; if neither or both do, the first one.
pub fn merge_order<'a>(a: &'a Path, b: &'a Path) -> (&'a Path, &'a Path) {
    if !has_extension(a, "json") && has_extension(b, "json") {
        (b, a)
    } else {
        (a, b)
    }
}

/// Reads the shape record in `input` and writes its document to `output`.
pub fn export_file(input: &Path, output: &Path) -> Result<Export> {
    let file = ShapeFile::read(input)?;
    tracing::info!("Exporting {:?} (record v{}) -> {:?}", input, file.record.version, output);

    let export = export::export_record(&file.record);
    let json = export.document.to_json()?;
    fs::write(output, json)?;
    Ok(export)
}

/// Applies the document at `document` over the record in `base` and writes the result to
/// `output`.  Nothing is written unless the whole merge succeeds.
pub fn merge_files(document: &Path, base: &Path, output: &Path) -> Result<Diagnostics> {
    let text = fs::read_to_string(document)?;
    let doc = PhyModelDocument::from_json(&text)?;
    import::check_version(&doc)?;

    let mut file = ShapeFile::read(base)?;
    tracing::info!("Merging {:?} over {:?} (record v{}) -> {:?}",
        document, base, file.record.version, output);

    let diags = import::merge_document(&doc, &mut file.record)?;
    file.write(output)?;
    Ok(diags)
}
