//! Template store: loads template documents from a directory and seeds
//! built-in defaults when none exist.
//!
//! One JSON document per template; the file stem is the template's lookup
//! name. A malformed document is skipped with a warning so one bad file
//! never takes the booth down. Custom templates added at runtime are
//! persisted back to the same directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::template::{Template, TemplateDoc};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// In-memory template map plus the directory it mirrors.
///
/// Read-mostly after [`load`](TemplateStore::load); the only mutation is
/// [`add_custom`](TemplateStore::add_custom), which the caller must not
/// run concurrently with in-flight compose calls against the same store.
pub struct TemplateStore {
    dir: PathBuf,
    templates: BTreeMap<String, Template>,
}

impl TemplateStore {
    /// Scan `dir` for `*.json` template documents, creating the directory
    /// and seeding the built-in defaults first when it is missing or empty.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut store = Self {
            dir,
            templates: BTreeMap::new(),
        };

        if !store.has_documents() {
            store.seed_defaults()?;
        }
        store.scan();
        Ok(store)
    }

    /// Persist a new template document and register it. Errors (an
    /// unwritable directory, typically) are returned, never panicked.
    pub fn add_custom(&mut self, name: &str, template: Template) -> Result<(), StoreError> {
        let doc = TemplateDoc::from(&template);
        let json = serde_json::to_string_pretty(&doc)?;
        fs::write(self.dir.join(format!("{name}.json")), json)?;

        info!(name, "custom template added");
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Lookup names in stable (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Name → description pairs for display.
    pub fn descriptions(&self) -> BTreeMap<&str, &str> {
        self.templates
            .iter()
            .map(|(name, t)| (name.as_str(), t.description.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// The directory backing this store; background image references in
    /// templates are resolved relative to it.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn has_documents(&self) -> bool {
        document_files(&self.dir).next().is_some()
    }

    fn seed_defaults(&self) -> Result<(), StoreError> {
        for (name, doc) in defaults::built_in() {
            let path = self.dir.join(format!("{name}.json"));
            fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        }
        info!(dir = %self.dir.display(), "default templates created");
        Ok(())
    }

    fn scan(&mut self) {
        for path in document_files(&self.dir) {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_document(&path) {
                Ok(template) => {
                    info!(name = stem, "loaded template");
                    self.templates.insert(stem.to_string(), template);
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping malformed template document");
                }
            }
        }
    }
}

fn document_files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
}

#[derive(Error, Debug)]
enum DocumentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Convert(#[from] crate::template::TemplateError),
}

fn load_document(path: &Path) -> Result<Template, DocumentError> {
    let raw = fs::read_to_string(path)?;
    let doc: TemplateDoc = serde_json::from_str(&raw)?;
    Ok(Template::try_from(doc)?)
}

/// The built-in default templates, written out as wire documents on first
/// run. Values are the booth's stock layouts; the dual template pairs a
/// front and side view with a divider between them.
mod defaults {
    use serde_json::{Value, json};

    pub(super) fn built_in() -> Vec<(&'static str, Value)> {
        vec![
            ("default", default_mugshot()),
            ("school", school_event()),
            ("party", party_mugshot()),
            ("dual_photo", dual_mugshot()),
        ]
    }

    fn default_mugshot() -> Value {
        json!({
            "name": "Default Mugshot",
            "description": "Basic mugshot template",
            "image_position": {"x": 100, "y": 150, "width": 400, "height": 500},
            "background": {"color": [240, 240, 240], "image": null},
            "text_elements": [
                {"type": "title", "text": "COUNTY JAIL", "position": [300, 50],
                 "font_size": 36, "color": [0, 0, 0], "font_weight": "bold"},
                {"type": "charge", "text": "CAFETERIA BANDIT", "position": [300, 700],
                 "font_size": 24, "color": [200, 0, 0], "font_weight": "normal"},
                {"type": "date", "text": "{event_date}", "position": [300, 750],
                 "font_size": 18, "color": [0, 0, 0], "font_weight": "normal"},
                {"type": "school", "text": "{school_name}", "position": [300, 800],
                 "font_size": 20, "color": [50, 50, 150], "font_weight": "bold"}
            ],
            "decorative_elements": [
                {"type": "height_chart", "position": [50, 150], "height": 500},
                {"type": "border", "width": 5, "color": [0, 0, 0]}
            ],
            "final_size": [600, 850]
        })
    }

    fn school_event() -> Value {
        json!({
            "name": "School Event",
            "description": "School-themed mugshot template",
            "image_position": {"x": 100, "y": 150, "width": 400, "height": 500},
            "background": {"color": [250, 250, 250], "image": null},
            "text_elements": [
                {"type": "title", "text": "{school_name}", "position": [300, 30],
                 "font_size": 32, "color": [0, 50, 100], "font_weight": "bold"},
                {"type": "subtitle", "text": "DETENTION CENTER", "position": [300, 70],
                 "font_size": 24, "color": [150, 0, 0], "font_weight": "bold"},
                {"type": "charge", "text": "HOMEWORK AVOIDER", "position": [300, 700],
                 "font_size": 22, "color": [180, 0, 0], "font_weight": "normal"},
                {"type": "event", "text": "{event_name}", "position": [300, 740],
                 "font_size": 18, "color": [0, 0, 0], "font_weight": "normal"},
                {"type": "date", "text": "{event_date}", "position": [300, 770],
                 "font_size": 16, "color": [100, 100, 100], "font_weight": "normal"}
            ],
            "decorative_elements": [
                {"type": "height_chart", "position": [50, 150], "height": 500},
                {"type": "school_logo", "position": [500, 30], "size": [80, 80]}
            ],
            "final_size": [600, 850]
        })
    }

    fn party_mugshot() -> Value {
        json!({
            "name": "Party Mugshot",
            "description": "Fun party-themed template",
            "image_position": {"x": 100, "y": 150, "width": 400, "height": 500},
            "background": {"color": [255, 240, 200], "image": null},
            "text_elements": [
                {"type": "title", "text": "PARTY POLICE", "position": [300, 50],
                 "font_size": 36, "color": [255, 100, 50], "font_weight": "bold"},
                {"type": "charge", "text": "EXCESSIVE FUN", "position": [300, 700],
                 "font_size": 24, "color": [200, 50, 150], "font_weight": "normal"},
                {"type": "date", "text": "{event_date}", "position": [300, 750],
                 "font_size": 18, "color": [100, 50, 200], "font_weight": "normal"}
            ],
            "decorative_elements": [
                {"type": "height_chart", "position": [50, 150], "height": 500},
                {"type": "party_border", "width": 8, "color": [255, 100, 50]}
            ],
            "final_size": [600, 850]
        })
    }

    fn dual_mugshot() -> Value {
        json!({
            "name": "Front and Side",
            "description": "Classic two-view mugshot (front and profile)",
            "dual_photo": true,
            "image_positions": [
                {"name": "front_view", "x": 80, "y": 150, "width": 400, "height": 500},
                {"name": "side_view", "x": 560, "y": 150, "width": 400, "height": 500}
            ],
            "background": {"color": [235, 235, 235], "image": null},
            "text_elements": [
                {"type": "title", "text": "COUNTY JAIL", "position": [420, 50],
                 "font_size": 36, "color": [0, 0, 0], "font_weight": "bold"},
                {"type": "school", "text": "{school_name}", "position": [420, 700],
                 "font_size": 22, "color": [50, 50, 150], "font_weight": "bold"},
                {"type": "event", "text": "{event_name}", "position": [420, 740],
                 "font_size": 18, "color": [0, 0, 0], "font_weight": "normal"},
                {"type": "date", "text": "{event_date}", "position": [420, 780],
                 "font_size": 18, "color": [0, 0, 0], "font_weight": "normal"}
            ],
            "decorative_elements": [
                {"type": "height_chart", "position": [30, 150], "height": 500},
                {"type": "divider_line", "start": [520, 150], "end": [520, 650],
                 "width": 3, "color": [120, 120, 120]},
                {"type": "border", "width": 5, "color": [0, 0, 0]}
            ],
            "final_size": [1040, 850]
        })
    }
}
