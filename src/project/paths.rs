//! Layout alignment for the top-level build request.
//!
//! Relative layout directories are anchored at the directory of the
//! requested descriptor; absolute declarations pass through unchanged.
//! Ancestors finished standalone skip this step and keep their declared
//! values.

use crate::descriptor::SourceLayout;
use std::path::Path;

/// Anchor each relative layout directory at `base`.
#[must_use]
pub fn align_layout(layout: &SourceLayout, base: &Path) -> SourceLayout {
    SourceLayout {
        source_dir: layout.source_dir.as_deref().map(|dir| align(dir, base)),
        test_source_dir: layout.test_source_dir.as_deref().map(|dir| align(dir, base)),
        script_source_dir: layout.script_source_dir.as_deref().map(|dir| align(dir, base)),
    }
}

fn align(dir: &str, base: &Path) -> String {
    let path = Path::new(dir);
    if path.is_absolute() {
        dir.to_string()
    } else {
        base.join(path).to_string_lossy().into_owned()
    }
}
