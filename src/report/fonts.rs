//! Font discovery for the PDF renderer.
//!
//! genpdf embeds TrueType fonts, so a regular/bold/italic/bold-italic set has
//! to be found on disk. Directories are searched in this order:
//! `SALES_REPORT_FONTS_DIR`, the configured `report.fonts_dir`,
//! `assets/fonts` next to the executable, `assets/fonts` in the crate, and
//! finally a few well-known system font directories.

use crate::error::ReportError;
use genpdf::fonts::{FontData, FontFamily};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit font directory.
pub const FONTS_DIR_ENV: &str = "SALES_REPORT_FONTS_DIR";

struct FamilyFiles {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

impl FamilyFiles {
    fn files(&self) -> [&'static str; 4] {
        [self.regular, self.bold, self.italic, self.bold_italic]
    }
}

const FAMILIES: &[FamilyFiles] = &[
    FamilyFiles {
        name: "Roboto",
        regular: "Roboto-Regular.ttf",
        bold: "Roboto-Bold.ttf",
        italic: "Roboto-Italic.ttf",
        bold_italic: "Roboto-BoldItalic.ttf",
    },
    FamilyFiles {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    FamilyFiles {
        name: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
    FamilyFiles {
        name: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn font_directory_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push_unique(&mut candidates, path);
    }

    if let Some(path) = configured {
        push_unique(&mut candidates, path.to_path_buf());
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(
        &mut candidates,
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    );

    for dir in SYSTEM_FONT_DIRS {
        push_unique(&mut candidates, PathBuf::from(dir));
    }

    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            push_unique(&mut candidates, root.join("Fonts"));
        }
    }

    candidates
}

fn complete_family(directory: &Path) -> Option<&'static FamilyFiles> {
    FAMILIES.iter().find(|family| {
        family
            .files()
            .iter()
            .all(|file| directory.join(file).is_file())
    })
}

fn load_font(directory: &Path, file: &str) -> Result<FontData, ReportError> {
    let path = directory.join(file);
    FontData::load(&path, None)
        .map_err(|err| ReportError::Render(format!("failed to load font {}: {}", path.display(), err)))
}

fn load_family(directory: &Path, family: &FamilyFiles) -> Result<FontFamily<FontData>, ReportError> {
    Ok(FontFamily {
        regular: load_font(directory, family.regular)?,
        bold: load_font(directory, family.bold)?,
        italic: load_font(directory, family.italic)?,
        bold_italic: load_font(directory, family.bold_italic)?,
    })
}

/// Locate and load the first complete font family.
pub fn load_font_family(configured: Option<&Path>) -> Result<FontFamily<FontData>, ReportError> {
    let candidates = font_directory_candidates(configured);

    for directory in &candidates {
        if let Some(family) = complete_family(directory) {
            debug!("Using font family '{}' from {}", family.name, directory.display());
            return load_family(directory, family);
        }
    }

    let checked = candidates
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Err(ReportError::Render(format!(
        "no usable font family found. Checked: {}. Set {} or report.fonts_dir to a directory with Liberation Sans, DejaVu Sans or Roboto TTF files",
        checked, FONTS_DIR_ENV
    )))
}

/// Whether any complete font family can be found.
#[allow(dead_code)] // Lets rendering tests skip on machines without fonts
pub fn fonts_available(configured: Option<&Path>) -> bool {
    font_directory_candidates(configured)
        .iter()
        .any(|directory| complete_family(directory).is_some())
}
