// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// The package manifest, used to find the package name.
pub const MANIFEST: &str = "Cargo.toml";

/// The directories replaced when updating an existing API.
const UPDATE_TARGETS: [&str; 3] = ["src", "tests", "docs"];

const PACKAGE_RE: &str = "^google-cloud-([a-z0-9-]+)$";

/// The package name in the manifest is not a Google Cloud API package.
#[derive(Debug, thiserror::Error)]
#[error("could not determine the staging location from {}", manifest.display())]
pub struct UnknownPackage {
    manifest: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StageKind {
    Added,
    Updated,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

#[derive(Debug)]
pub struct Staged {
    pub dest: PathBuf,
    pub kind: StageKind,
    pub copied: Vec<PathBuf>,
}

/// Copies the auto-generated API in `src` into `repo_root`.
///
/// New APIs are copied in full. For existing APIs only the [UPDATE_TARGETS]
/// are replaced, other files (notably the manifest) are left alone.
pub fn stage_api(src: &Path, dest: Option<&str>, repo_root: &Path) -> Result<Staged> {
    let dest = match dest {
        Some(d) => {
            tracing::info!("destination directory explicitly set: {d}/");
            d.to_string()
        }
        None => {
            let d = destination_from_manifest(&src.join(MANIFEST))?;
            tracing::info!("destination directory determined from the manifest: {d}/");
            d
        }
    };

    let target = repo_root.join(&dest);
    let kind = if target.is_dir() {
        StageKind::Updated
    } else {
        StageKind::Added
    };
    tracing::info!("this API is being {kind}");

    let mut copied = Vec::new();
    match kind {
        StageKind::Added => {
            copy_tree(src, &target)?;
            copied.push(target.clone());
        }
        StageKind::Updated => {
            for name in UPDATE_TARGETS {
                let from = src.join(name);
                if !from.is_dir() {
                    tracing::debug!("skipping {name}/, not found in the auto-generated API");
                    continue;
                }
                let to = target.join(name);
                if to.exists() {
                    fs::remove_dir_all(&to)
                        .with_context(|| format!("removing {}", to.display()))?;
                }
                copy_tree(&from, &to)?;
                copied.push(to);
            }
        }
    }
    for path in &copied {
        tracing::info!("copied {}", path.display());
    }
    Ok(Staged {
        dest: target,
        kind,
        copied,
    })
}

/// Returns the staging directory for the package described by `manifest`.
///
/// The directory is the package name without the `google-cloud-` prefix, with
/// dashes replaced by underscores.
pub fn destination_from_manifest(manifest: &Path) -> Result<String> {
    let contents =
        fs::read_to_string(manifest).with_context(|| format!("reading {}", manifest.display()))?;
    let doc = contents
        .parse::<DocumentMut>()
        .with_context(|| format!("parsing {}", manifest.display()))?;
    let name = doc
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str());
    name.and_then(destination_from_package)
        .ok_or_else(|| {
            UnknownPackage {
                manifest: manifest.to_path_buf(),
            }
            .into()
        })
}

fn destination_from_package(name: &str) -> Option<String> {
    // Just panic on failures to compile the RE.
    let re = Regex::new(PACKAGE_RE).unwrap();
    re.captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace('-', "_"))
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).with_context(|| format!("creating {}", to.display()))?;
    for entry in fs::read_dir(from).with_context(|| format!("reading {}", from.display()))? {
        let entry = entry.with_context(|| format!("reading {}", from.display()))?;
        let path = entry.path();
        let target = to.join(entry.file_name());
        // Follows symlinks, linked directories are copied as directories.
        let metadata =
            fs::metadata(&path).with_context(|| format!("inspecting {}", path.display()))?;
        if metadata.is_dir() {
            copy_tree(&path, &target)?;
        } else {
            fs::copy(&path, &target).with_context(|| {
                format!("copying {} to {}", path.display(), target.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn write(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn manifest(name: &str) -> String {
        format!("[package]\nname = \"{name}\"\nversion = \"1.0.0\"\n")
    }

    fn autogen(root: &Path, name: &str) -> Result<PathBuf> {
        let src = root.join("autogen");
        write(&src.join(MANIFEST), &manifest(name))?;
        write(&src.join("src/lib.rs"), "// new lib")?;
        write(&src.join("src/model/mod.rs"), "// new model")?;
        write(&src.join("tests/smoke.rs"), "// new test")?;
        write(&src.join("README.md"), "# new readme")?;
        Ok(src)
    }

    #[test_case("google-cloud-secretmanager", Some("secretmanager"))]
    #[test_case("google-cloud-bigquery-v2", Some("bigquery_v2"))]
    #[test_case("google-cloud-pubsub", Some("pubsub"))]
    #[test_case("google-cloud-", None)]
    #[test_case("google-cloud-Storage", None)]
    #[test_case("my-cloud-storage", None)]
    #[test_case("not-google-cloud-storage", None)]
    fn package_names(name: &str, want: Option<&str>) {
        assert_eq!(destination_from_package(name).as_deref(), want);
    }

    #[test]
    fn from_manifest() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join(MANIFEST);
        write(&path, &manifest("google-cloud-language-v2"))?;
        assert_eq!(destination_from_manifest(&path)?, "language_v2");
        Ok(())
    }

    #[test_case("[package]\nname = \"other-package\"\n"; "not google cloud")]
    #[test_case("[package]\nversion = \"1.0.0\"\n"; "no name")]
    #[test_case("[workspace]\nmembers = []\n"; "no package")]
    fn unknown_package(contents: &str) -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join(MANIFEST);
        write(&path, contents)?;
        let err = destination_from_manifest(&path).unwrap_err();
        assert!(err.downcast_ref::<UnknownPackage>().is_some(), "{err:?}");
        Ok(())
    }

    #[test]
    fn invalid_manifest() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join(MANIFEST);
        write(&path, "[package\nname = ")?;
        let err = destination_from_manifest(&path).unwrap_err();
        assert!(err.downcast_ref::<UnknownPackage>().is_none(), "{err:?}");
        Ok(())
    }

    #[test]
    fn stage_new_api() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = autogen(tmp.path(), "google-cloud-secret-manager")?;
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo)?;

        let staged = stage_api(&src, None, &repo)?;
        assert_eq!(staged.kind, StageKind::Added);
        assert_eq!(staged.dest, repo.join("secret_manager"));
        assert_eq!(staged.copied, vec![repo.join("secret_manager")]);

        let dest = repo.join("secret_manager");
        assert_eq!(fs::read_to_string(dest.join("src/lib.rs"))?, "// new lib");
        assert_eq!(
            fs::read_to_string(dest.join("src/model/mod.rs"))?,
            "// new model"
        );
        assert_eq!(fs::read_to_string(dest.join("README.md"))?, "# new readme");
        assert!(dest.join(MANIFEST).is_file());
        Ok(())
    }

    #[test]
    fn stage_updated_api() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = autogen(tmp.path(), "google-cloud-pubsub")?;
        let repo = tmp.path().join("repo");
        let dest = repo.join("pubsub");
        write(&dest.join(MANIFEST), "# hand edited")?;
        write(&dest.join("src/lib.rs"), "// old lib")?;
        write(&dest.join("src/stale.rs"), "// removed upstream")?;
        write(&dest.join("docs/index.md"), "# old docs")?;

        let staged = stage_api(&src, None, &repo)?;
        assert_eq!(staged.kind, StageKind::Updated);
        assert_eq!(staged.copied, vec![dest.join("src"), dest.join("tests")]);

        assert_eq!(fs::read_to_string(dest.join("src/lib.rs"))?, "// new lib");
        assert!(!dest.join("src/stale.rs").exists());
        assert_eq!(fs::read_to_string(dest.join("tests/smoke.rs"))?, "// new test");
        // Not present in the auto-generated API, left alone.
        assert_eq!(fs::read_to_string(dest.join("docs/index.md"))?, "# old docs");
        // Updates never touch the manifest or other top-level files.
        assert_eq!(fs::read_to_string(dest.join(MANIFEST))?, "# hand edited");
        assert!(!dest.join("README.md").exists());
        Ok(())
    }

    #[test]
    fn stage_explicit_dest() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = autogen(tmp.path(), "not-a-google-package")?;
        let repo = tmp.path().join("repo");

        let staged = stage_api(&src, Some("custom/location"), &repo)?;
        assert_eq!(staged.kind, StageKind::Added);
        assert_eq!(staged.dest, repo.join("custom/location"));
        assert!(repo.join("custom/location/src/lib.rs").is_file());
        Ok(())
    }

    #[test]
    fn stage_unknown_package() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = autogen(tmp.path(), "not-a-google-package")?;
        let repo = tmp.path().join("repo");

        let err = stage_api(&src, None, &repo).unwrap_err();
        assert!(err.downcast_ref::<UnknownPackage>().is_some(), "{err:?}");
        assert!(!repo.exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn stage_symlinked_dir() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = autogen(tmp.path(), "google-cloud-pubsub")?;
        write(&src.join("shared/a.rs"), "// shared")?;
        std::os::unix::fs::symlink(src.join("shared"), src.join("linked"))?;
        std::os::unix::fs::symlink(src.join("shared/a.rs"), src.join("src/b.rs"))?;
        let repo = tmp.path().join("repo");

        let staged = stage_api(&src, None, &repo)?;
        assert_eq!(staged.kind, StageKind::Added);
        let dest = repo.join("pubsub");
        assert_eq!(fs::read_to_string(dest.join("linked/a.rs"))?, "// shared");
        assert_eq!(fs::read_to_string(dest.join("shared/a.rs"))?, "// shared");
        assert_eq!(fs::read_to_string(dest.join("src/b.rs"))?, "// shared");
        assert!(!fs::symlink_metadata(dest.join("linked"))?.is_symlink());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_reports_failing_path() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = autogen(tmp.path(), "google-cloud-pubsub")?;
        let dangling = src.join("dangling");
        std::os::unix::fs::symlink(tmp.path().join("missing"), &dangling)?;

        let err = copy_tree(&src, &tmp.path().join("out")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains(&dangling.display().to_string()), "{msg}");
        Ok(())
    }

    #[test]
    fn display_kind() {
        assert_eq!(StageKind::Added.to_string(), "added");
        assert_eq!(StageKind::Updated.to_string(), "updated");
    }
}
