//! Recursive tree mirroring: render text files, copy binary files.

use crate::template::{self, RenderOptions};
use crate::vars::Variables;
use anyhow::{Context as _, Result};
use content_inspector::{ContentType, inspect};
use std::path::Path;

/// Bytes examined when deciding whether a file is binary.
const SNIFF_WINDOW: usize = 1024;

/// Recursively mirror the tree at `src` into `dst`.
///
/// Every subdirectory is created under `dst` (already-existing directories
/// are not an error). Files that sniff as binary are copied byte-for-byte;
/// everything else is read as UTF-8, rendered through the template
/// pipeline with `vars` and `options`, and written under the same relative
/// path and name. Include resolution uses the current working directory
/// plus `options.search_paths`, not the individual file's directory.
///
/// Symlinks within the source tree are *followed*: [`Path::is_dir`] is
/// used, so directory symlinks are recursed into and their contents
/// materialised rather than copying the link itself.
///
/// The first failing entry aborts the walk; files already written stay in
/// place.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or read, a file
/// cannot be read, copied, or written, a text file is not valid UTF-8, or
/// rendering fails.
pub fn mirror_tree(
    src: &Path,
    dst: &Path,
    vars: &Variables,
    options: &RenderOptions,
) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            mirror_tree(&src_path, &dst_path, vars, options)?;
        } else {
            mirror_file(&src_path, &dst_path, vars, options)?;
        }
    }
    Ok(())
}

/// Copies or renders a single file depending on a content sniff.
fn mirror_file(src: &Path, dst: &Path, vars: &Variables, options: &RenderOptions) -> Result<()> {
    let bytes = std::fs::read(src).with_context(|| format!("reading {}", src.display()))?;
    if is_binary(&bytes) {
        tracing::debug!("copying binary {}", src.display());
        std::fs::copy(src, dst)
            .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
        return Ok(());
    }

    tracing::debug!("rendering {}", src.display());
    let source = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", src.display()))?;
    let rendered = template::render_str(&source, vars, options)
        .with_context(|| format!("rendering {}", src.display()))?;
    std::fs::write(dst, rendered).with_context(|| format!("writing {}", dst.display()))
}

/// Content sniff on the leading bytes: anything that is not UTF-8 text
/// (with or without BOM) is treated as binary. UTF-16 and friends are
/// deliberately binary here, matching the null-byte heuristic this
/// decision historically used.
fn is_binary(bytes: &[u8]) -> bool {
    let window = bytes.get(..SNIFF_WINDOW).unwrap_or(bytes);
    !matches!(inspect(window), ContentType::UTF_8 | ContentType::UTF_8_BOM)
}
