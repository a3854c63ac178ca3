//! Template rendering
//!
//! Wraps Tera with the configured template search path. Engines are built
//! fresh for each use so edits written through the admin surface are visible
//! on the next render; previews are per-request objects and nothing here is
//! cached across requests.

use crate::error::Result;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tera::{Context, Tera};

/// Build a Tera engine over the template search path.
///
/// Directories are loaded in order; a template name present in several
/// directories resolves to the first one, matching path resolution in
/// [`crate::store::FileStore`].
pub fn build_engine(dirs: &[PathBuf]) -> Result<Tera> {
    let mut engine = Tera::default();
    // Later extends do not overwrite earlier templates, so iterating in
    // search-path order keeps first-hit-wins semantics.
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let glob = format!("{}/**/*", dir.display());
        let parsed = Tera::parse(&glob)?;
        engine.extend(&parsed)?;
    }
    engine.build_inheritance_chains()?;
    Ok(engine)
}

/// Render a template file from the search path with the given context.
pub fn render_file(dirs: &[PathBuf], name: &str, context: &Map<String, Value>) -> Result<String> {
    let engine = build_engine(dirs)?;
    let rendered = engine.render(name, &to_context(context)?)?;
    Ok(rendered.trim().to_string())
}

/// Render a template source string (record subjects and bodies).
pub fn render_str(source: &str, context: &Map<String, Value>, autoescape: bool) -> Result<String> {
    let rendered = Tera::one_off(source, &to_context(context)?, autoescape)?;
    Ok(rendered.trim().to_string())
}

/// Merge the sample context with per-request extra parameters; extras win.
pub fn merge_context(
    context: &Map<String, Value>,
    extra: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = context.clone();
    for (key, value) in extra {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// First directory on the search path containing `name`, if any.
pub fn resolve_path(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn to_context(map: &Map<String, Value>) -> Result<Context> {
    Context::from_value(Value::Object(map.clone())).map_err(Into::into)
}
