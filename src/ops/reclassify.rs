//! Test manifest reclassification.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{Manifest, MigrateError, RuleSet};

/// Turn the library targets in one manifest into test targets.
///
/// Returns whether the file changed. A manifest with no library targets is
/// left byte-for-byte as it was.
pub fn reclassify_manifest(path: &Path, rules: &RuleSet) -> Result<bool> {
    let src = std::fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
    let mut manifest = Manifest::parse(&src).map_err(|source| MigrateError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;

    let changed = manifest.set_kind(&rules.library_kind, &rules.test_kind);
    if changed == 0 {
        tracing::debug!("{} already reclassified", path.display());
        return Ok(false);
    }

    std::fs::write(path, manifest.render()).map_err(|e| MigrateError::io(path, e))?;
    tracing::debug!("reclassified {} target(s) in {}", changed, path.display());
    Ok(true)
}

/// Reclassify the manifest in every directory.
///
/// Every directory must already have a manifest; a missing one is a
/// `NotFound` error. Returns the manifests that changed.
pub fn reclassify(dirs: &BTreeSet<PathBuf>, rules: &RuleSet) -> Result<Vec<PathBuf>> {
    let mut changed = Vec::new();

    for dir in dirs {
        let path = dir.join(&rules.manifest_name);
        if reclassify_manifest(&path, rules)? {
            changed.push(path);
        }
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::synthesize::synthesize;
    use crate::test_support::TreeFixture;

    fn dirs(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
        paths.iter().cloned().collect()
    }

    #[test]
    fn test_reclassify_generated_manifest() {
        let tree = TreeFixture::new().file("test/a/FooTest.java").build();
        let rules = RuleSet::default();
        let set = dirs(&[tree.path("test/a")]);
        synthesize(&set, &rules).unwrap();

        let changed = reclassify(&set, &rules).unwrap();
        assert_eq!(changed, vec![tree.path("test/a/BUILD")]);

        let manifest = Manifest::parse(&tree.read("test/a/BUILD")).unwrap();
        let target = manifest.target("a").unwrap();
        assert_eq!(target.kind, "java_test");
        assert_eq!(target.sources, vec!["*.java"]);
    }

    #[test]
    fn test_reclassify_is_idempotent() {
        let tree = TreeFixture::new().file("test/a/FooTest.java").build();
        let rules = RuleSet::default();
        let set = dirs(&[tree.path("test/a")]);
        synthesize(&set, &rules).unwrap();

        reclassify(&set, &rules).unwrap();
        let once = tree.read("test/a/BUILD");

        let changed = reclassify(&set, &rules).unwrap();
        assert!(changed.is_empty());
        assert_eq!(tree.read("test/a/BUILD"), once);
    }

    #[test]
    fn test_reclassify_keeps_resolver_edges() {
        let tree = TreeFixture::new()
            .file_with(
                "test/a/BUILD",
                r#"package(default_visibility = ["//:__subpackages__"])

java_library(
    name = "a",
    srcs = glob(["*.java"]),
    deps = [
        "//lib/a",
        "@maven//:junit_junit",
    ],
)
"#,
            )
            .build();
        let rules = RuleSet::default();

        assert!(reclassify_manifest(&tree.path("test/a/BUILD"), &rules).unwrap());

        let manifest = Manifest::parse(&tree.read("test/a/BUILD")).unwrap();
        let target = manifest.target("a").unwrap();
        assert_eq!(target.kind, "java_test");
        assert_eq!(target.deps, vec!["//lib/a", "@maven//:junit_junit"]);
    }

    #[test]
    fn test_reclassify_updates_rule_load() {
        let tree = TreeFixture::new()
            .file_with(
                "test/a/BUILD",
                "load(\"@rules_java//java:defs.bzl\", \"java_library\")\n\
                 java_library(name = \"a\", srcs = glob([\"*.java\"]))\n",
            )
            .build();

        assert!(reclassify_manifest(&tree.path("test/a/BUILD"), &RuleSet::default()).unwrap());

        assert_eq!(
            tree.read("test/a/BUILD"),
            "load(\"@rules_java//java:defs.bzl\", \"java_test\")\n\
             java_test(name = \"a\", srcs = glob([\"*.java\"]))\n"
        );
    }

    #[test]
    fn test_reclassify_keeps_inner_comments() {
        let tree = TreeFixture::new()
            .file_with(
                "test/a/BUILD",
                r#"java_library(
    name = "a",
    # keep: needed by reflection
    deps = [
        "//lib/a",  # shared fixtures
    ],
)
"#,
            )
            .build();

        assert!(reclassify_manifest(&tree.path("test/a/BUILD"), &RuleSet::default()).unwrap());

        let out = tree.read("test/a/BUILD");
        assert!(out.starts_with("java_test(\n"));
        assert!(out.contains("    # keep: needed by reflection\n    deps = [\n"));
        assert!(out.contains("        \"//lib/a\", # shared fixtures\n"));
    }

    #[test]
    fn test_missing_manifest_is_not_found() {
        let tree = TreeFixture::new().file("test/a/FooTest.java").build();
        let set = dirs(&[tree.path("test/a")]);

        let err = reclassify(&set, &RuleSet::default()).unwrap_err();
        assert!(err.downcast_ref::<MigrateError>().unwrap().is_not_found());
    }

    #[test]
    fn test_malformed_manifest_is_reported() {
        let tree = TreeFixture::new()
            .file_with("test/a/BUILD", "java_library(name = \"a\"")
            .build();

        let err = reclassify_manifest(&tree.path("test/a/BUILD"), &RuleSet::default()).unwrap_err();
        match err.downcast_ref::<MigrateError>() {
            Some(MigrateError::Manifest { path, .. }) => {
                assert_eq!(path, &tree.path("test/a/BUILD"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
