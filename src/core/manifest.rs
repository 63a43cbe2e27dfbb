//! Per-directory build manifests.
//!
//! A [`Manifest`] wraps a parsed [`BuildFile`] and knows about the one thing
//! this tool cares about: the `package(default_visibility = ...)` statement
//! and the target rules inside it. Anything else in the file (comments,
//! resolver-added attributes) is carried through untouched, and `load`
//! statements follow the rules when their kind changes.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::build_file::{Argument, BuildFile, Call, Expr, ManifestError, Statement};
use crate::core::rules::RuleSet;
use crate::util::fs::glob_files;

/// A build manifest for one unit directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    file: BuildFile,
}

/// A read-only view of one target rule in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDecl {
    /// Rule name, e.g. `java_library`
    pub kind: String,
    pub name: Option<String>,
    /// Source patterns from `srcs`, either `glob([...])` patterns or plain
    /// file names.
    pub sources: Vec<String>,
    pub deps: Vec<String>,
}

impl Manifest {
    /// Generate the manifest for a unit directory whose base name is `name`.
    pub fn generate(name: &str, rules: &RuleSet) -> Self {
        let package = Call::new("package").kwarg(
            "default_visibility",
            Expr::str_list([rules.visibility.as_str()]),
        );
        let target = Call::new(rules.library_kind.as_str())
            .kwarg("name", Expr::str(name))
            .kwarg(
                "srcs",
                Expr::Call(Call::new("glob").positional(Expr::str_list([rules.source_glob()]))),
            );

        Manifest {
            file: BuildFile {
                statements: vec![Statement::Call(package), Statement::Call(target)],
            },
        }
    }

    pub fn parse(src: &str) -> Result<Self, ManifestError> {
        Ok(Manifest {
            file: BuildFile::parse(src)?,
        })
    }

    pub fn render(&self) -> String {
        self.file.render()
    }

    /// The package default visibility, if declared.
    pub fn visibility(&self) -> Option<Vec<String>> {
        self.file
            .calls()
            .find(|c| c.function == "package")
            .and_then(|c| c.get("default_visibility"))
            .map(Expr::string_items)
    }

    /// Every rule call that declares a named target.
    pub fn targets(&self) -> Vec<TargetDecl> {
        self.file
            .calls()
            .filter(|c| c.function != "package" && c.function != "load")
            .filter(|c| c.get("name").is_some())
            .map(|c| TargetDecl {
                kind: c.function.clone(),
                name: c.get("name").and_then(Expr::as_str).map(str::to_string),
                sources: c.get("srcs").map(source_patterns).unwrap_or_default(),
                deps: c.get("deps").map(Expr::string_items).unwrap_or_default(),
            })
            .collect()
    }

    /// Look up a target by name.
    pub fn target(&self, name: &str) -> Option<TargetDecl> {
        self.targets()
            .into_iter()
            .find(|t| t.name.as_deref() == Some(name))
    }

    /// Change the rule kind of every `from` call to `to`, and make any
    /// `load` that imported `from` import `to` instead.
    ///
    /// Returns how many rule calls changed; zero means the manifest is
    /// untouched.
    pub fn set_kind(&mut self, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for call in self.file.calls_mut() {
            if call.function == from {
                call.function = to.to_string();
                changed += 1;
            }
        }

        if changed > 0 {
            for load in self.file.calls_mut().filter(|c| c.function == "load") {
                replace_loaded_symbol(load, from, to);
            }
        }
        changed
    }
}

impl TargetDecl {
    /// Expand the source patterns against `dir`.
    pub fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        glob_files(dir, &self.sources)
    }
}

/// Whether a `load` argument binds `symbol`, either positionally
/// (`"java_library"`) or as an alias (`java_library = "..."`).
fn binds(arg: &Argument, symbol: &str) -> bool {
    match &arg.name {
        Some(local) => local == symbol,
        None => arg.value.as_str() == Some(symbol),
    }
}

/// Rewrite the symbols of one `load` statement so it binds `to` where it
/// bound `from`. The first argument is the `.bzl` label and is left alone.
fn replace_loaded_symbol(load: &mut Call, from: &str, to: &str) {
    if !load.args.iter().skip(1).any(|a| binds(a, from)) {
        return;
    }

    if load.args.iter().skip(1).any(|a| binds(a, to)) {
        let mut index = 0;
        load.args.retain(|a| {
            index += 1;
            index == 1 || !binds(a, from)
        });
        return;
    }

    for arg in load.args.iter_mut().skip(1) {
        if !binds(arg, from) {
            continue;
        }
        match &mut arg.name {
            Some(local) => {
                *local = to.to_string();
                if arg.value.as_str() == Some(from) {
                    arg.value = Expr::str(to);
                }
            }
            None => arg.value = Expr::str(to),
        }
    }
}

fn source_patterns(srcs: &Expr) -> Vec<String> {
    match srcs {
        Expr::Call(call) if call.function == "glob" => call
            .args
            .iter()
            .find(|a| a.name.is_none() || a.name.as_deref() == Some("include"))
            .map(|a| a.value.string_items())
            .unwrap_or_default(),
        other => other.string_items(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate() {
        let manifest = Manifest::generate("a", &RuleSet::default());

        assert_eq!(
            manifest.render(),
            "package(default_visibility = [\"//:__subpackages__\"])\n\
             java_library(name = \"a\", srcs = glob([\"*.java\"]))\n"
        );
        assert_eq!(
            manifest.visibility(),
            Some(vec!["//:__subpackages__".to_string()])
        );

        let target = manifest.target("a").unwrap();
        assert_eq!(target.kind, "java_library");
        assert_eq!(target.sources, vec!["*.java"]);
        assert!(target.deps.is_empty());
    }

    #[test]
    fn test_generated_manifest_parses_back() {
        let manifest = Manifest::generate("util", &RuleSet::default());
        let parsed = Manifest::parse(&manifest.render()).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_resolver_edited_manifest() {
        let src = r#"package(default_visibility = ["//:__subpackages__"])

java_library(
    name = "a",
    srcs = glob(["*.java"]),
    deps = [
        "//core/src/main/java/com/example/b",
        "@maven//:com_google_guava_guava",
    ],
)
"#;
        let manifest = Manifest::parse(src).unwrap();
        let target = manifest.target("a").unwrap();
        assert_eq!(
            target.deps,
            vec![
                "//core/src/main/java/com/example/b",
                "@maven//:com_google_guava_guava"
            ]
        );
    }

    #[test]
    fn test_set_kind() {
        let mut manifest = Manifest::generate("a", &RuleSet::default());

        assert_eq!(manifest.set_kind("java_library", "java_test"), 1);
        assert_eq!(manifest.target("a").unwrap().kind, "java_test");

        // Already reclassified: nothing left to change.
        assert_eq!(manifest.set_kind("java_library", "java_test"), 0);
    }

    #[test]
    fn test_set_kind_rewrites_loads() {
        let mut manifest = Manifest::parse(
            "load(\"@rules_java//java:defs.bzl\", \"java_library\")\n\
             package(default_visibility = [\"//visibility:public\"])\n\
             java_library(name = \"a\", srcs = [\"A.java\"])\n",
        )
        .unwrap();

        assert_eq!(manifest.set_kind("java_library", "java_test"), 1);
        assert_eq!(
            manifest.render(),
            "load(\"@rules_java//java:defs.bzl\", \"java_test\")\n\
             package(default_visibility = [\"//visibility:public\"])\n\
             java_test(name = \"a\", srcs = [\"A.java\"])\n"
        );
    }

    #[test]
    fn test_set_kind_load_variants() {
        let mut manifest = Manifest::parse(
            "load(\"@rules_java//java:defs.bzl\", \"java_binary\", \"java_library\", \"java_test\")\n\
             load(\"//tools:aliases.bzl\", java_library = \"java_library\")\n\
             load(\"//tools:other.bzl\", \"kt_jvm_library\")\n\
             java_library(name = \"a\", srcs = [\"A.java\"])\n",
        )
        .unwrap();

        assert_eq!(manifest.set_kind("java_library", "java_test"), 1);
        let rendered = manifest.render();
        assert!(rendered.contains(
            "load(\"@rules_java//java:defs.bzl\", \"java_binary\", \"java_test\")\n"
        ));
        assert!(rendered.contains("load(\"//tools:aliases.bzl\", java_test = \"java_test\")\n"));
        assert!(rendered.contains("load(\"//tools:other.bzl\", \"kt_jvm_library\")\n"));
    }

    #[test]
    fn test_set_kind_without_targets_leaves_loads() {
        let src = "load(\"@rules_java//java:defs.bzl\", \"java_library\")\n\
                   java_test(name = \"a\", srcs = [\"A.java\"])\n";
        let mut manifest = Manifest::parse(src).unwrap();

        assert_eq!(manifest.set_kind("java_library", "java_test"), 0);
        assert_eq!(manifest.render(), src);
    }

    #[test]
    fn test_source_files_non_recursive() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("Foo.java"), "").unwrap();
        std::fs::write(tmp.path().join("sub/Bar.java"), "").unwrap();

        let manifest = Manifest::generate("a", &RuleSet::default());
        let files = manifest.target("a").unwrap().source_files(tmp.path()).unwrap();
        assert_eq!(files, vec![tmp.path().join("Foo.java")]);
    }
}
