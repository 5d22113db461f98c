//! Collection of the files esbuild wrote into a staging directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bundler::{BuildRequest, OutputFile, PLACEHOLDER_OUTDIR};
use crate::error::CompileError;

const SCRIPT_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

/// Reads every file under `staging` into an [`OutputFile`].
///
/// Artifacts are reported under the request's `outdir` rather than the
/// staging path. The entry point's bundle comes first, then other scripts
/// (split chunks), then assets and source maps, each group in path order.
pub(crate) fn collect(
    staging: &Path,
    request: &BuildRequest,
) -> Result<Vec<OutputFile>, CompileError> {
    let mut relative = Vec::new();
    walk(staging, staging, &mut relative)?;

    let primary = primary_name(request);
    relative.sort_by(|left, right| {
        rank(left, &primary)
            .cmp(&rank(right, &primary))
            .then_with(|| left.cmp(right))
    });

    let outdir = Path::new(request.outdir().unwrap_or(PLACEHOLDER_OUTDIR));
    relative
        .into_iter()
        .map(|name| {
            let full = staging.join(&name);
            let bytes = fs::read(&full).map_err(|err| unusable(full.clone(), err))?;
            let text = if name == primary {
                String::from_utf8(bytes).map_err(|err| CompileError::InvalidOutput {
                    message: err.to_string(),
                })?
            } else {
                String::from_utf8_lossy(&bytes).into_owned()
            };
            Ok(OutputFile::new(outdir.join(name), text))
        })
        .collect()
}

/// File name esbuild gives the first entry point's bundle.
pub(crate) fn primary_name(request: &BuildRequest) -> PathBuf {
    let mut name = request
        .entry_points()
        .first()
        .and_then(|entry| entry.file_stem().map(ToOwned::to_owned))
        .unwrap_or_else(|| "stdin".into());
    name.push(".js");
    PathBuf::from(name)
}

fn rank(name: &Path, primary: &Path) -> u8 {
    if name == primary {
        return 0;
    }
    let is_script = name
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext));
    if is_script { 1 } else { 2 }
}

fn walk(root: &Path, dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), CompileError> {
    let entries = fs::read_dir(dir).map_err(|err| unusable(dir.to_path_buf(), err))?;
    for item in entries {
        let entry = item.map_err(|err| unusable(dir.to_path_buf(), err))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|err| unusable(path.clone(), err))?;
        if file_type.is_dir() {
            walk(root, &path, found)?;
        } else if let Ok(name) = path.strip_prefix(root) {
            found.push(name.to_path_buf());
        }
    }
    Ok(())
}

fn unusable(path: PathBuf, err: std::io::Error) -> CompileError {
    CompileError::OutputDirectory {
        path,
        source: Arc::new(err),
    }
}
