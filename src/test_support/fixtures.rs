//! Manifest fixtures shared by tests.

use std::path::{Path, PathBuf};

/// A small but complete manifest: built-ins, kinds, a conditional block,
/// build options and configuration messages.
pub const SAMPLE_MANIFEST: &str = r#"
[plugin]
name = "Sample"
externals = ["Core", "CoreUObject", "Engine", "UnrealEd", "Slate"]

[[module]]
name = "SampleCore"
public = ["Core", "CoreUObject", "Engine"]
messages = ["configuring SampleCore"]

[module.build]
pch = "explicit-or-shared"
private-pch-header = "Public/SampleMinimal.h"
public-include-paths = ["SampleCore/Public"]

[[module]]
name = "SampleRuntime"
public = ["SampleCore"]

[[module.conditional]]
when = "editor"
private = ["UnrealEd"]

[[module]]
name = "SampleEditor"
kind = "editor"
private = ["SampleRuntime", "Slate", "UnrealEd"]
"#;

/// Write `contents` as `Modules.toml` inside `dir` and return its path.
pub fn write_manifest(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("Modules.toml");
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
    path
}
