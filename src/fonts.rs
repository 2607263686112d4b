//! Font discovery for the stamp glyphs.
//!
//! Fonts live under per-style subdirectories of the font root
//! (`fonts/industrial`, `fonts/monospace`, `fonts/default`). Discovery never
//! fails: if the requested style has no usable fonts we fall back to all
//! style directories, and if nothing is found at all the catalog hands out
//! the renderer's built-in face.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use log::{debug, warn};
use rand::{Rng, rngs::SmallRng};

pub const FONT_STYLES: [&str; 3] = ["industrial", "monospace", "default"];

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontChoice {
    /// A discovered font file.
    File(PathBuf),
    /// The renderer's default face.
    Builtin,
}

pub struct FontCatalog {
    fonts: Vec<PathBuf>,
}

impl FontCatalog {
    pub fn discover(root: &Path, style: &str) -> Self {
        let mut fonts = scan_dir(&root.join(style));
        if fonts.is_empty() {
            for fallback in FONT_STYLES {
                fonts.extend(scan_dir(&root.join(fallback)));
            }
            fonts.sort();
            fonts.dedup();
        }
        if fonts.is_empty() {
            warn!("no usable fonts under {}, falling back to built-in face", root.display());
        } else {
            debug!("discovered {} font(s) for style {style:?}", fonts.len());
        }
        Self { fonts }
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Uniform pick over the discovered fonts; `Builtin` when there are none.
    pub fn pick(&self, rng: &mut SmallRng) -> FontChoice {
        if self.fonts.is_empty() {
            FontChoice::Builtin
        } else {
            FontChoice::File(self.fonts[rng.random_range(0..self.fonts.len())].clone())
        }
    }

    #[cfg(test)]
    pub(crate) fn from_paths(fonts: Vec<PathBuf>) -> Self {
        Self { fonts }
    }
}

/// Recursive listing of parseable font files under `dir`.
fn scan_dir(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            found.extend(scan_dir(&path));
            continue;
        }
        let ext_ok = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if !ext_ok {
            continue;
        }
        match fs::read(&path).ok().and_then(|bytes| FontArc::try_from_vec(bytes).ok()) {
            Some(_) => found.push(path),
            None => warn!("skipping unparseable font file {}", path.display()),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn empty_root_degrades_to_builtin() {
        let catalog = FontCatalog::discover(Path::new("/nonexistent/fonts"), "industrial");
        assert!(catalog.is_empty());
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(catalog.pick(&mut rng), FontChoice::Builtin);
    }

    #[test]
    fn pick_is_uniform_over_listed_fonts() {
        let paths: Vec<PathBuf> =
            (0..3).map(|i| PathBuf::from(format!("/fonts/f{i}.ttf"))).collect();
        let catalog = FontCatalog::from_paths(paths.clone());
        let mut rng = SmallRng::seed_from_u64(9);
        let mut seen = [false; 3];
        for _ in 0..200 {
            match catalog.pick(&mut rng) {
                FontChoice::File(p) => {
                    let idx = paths.iter().position(|q| *q == p).unwrap();
                    seen[idx] = true;
                }
                FontChoice::Builtin => panic!("builtin despite non-empty catalog"),
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
