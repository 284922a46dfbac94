use photo_export::core::{Exporter, FolderLibrary, Loader, FOLDER_SOURCE_ID};
use photo_export::error::ExportError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn build_library(root: &Path) {
    fs::create_dir_all(root.join("Events/2020-01-01")).unwrap();
    fs::create_dir_all(root.join("Events/2020-06-15")).unwrap();
    fs::create_dir_all(root.join("Misc")).unwrap();
    fs::write(root.join("Events/2020-01-01/IMG_1.HEIC"), b"jan pixels").unwrap();
    fs::write(root.join("Events/2020-06-15/IMG_2.HEIC"), b"jun pixels").unwrap();
    fs::write(root.join("Events/2020-06-15/IMG_2.edited.HEIC"), b"jun edited").unwrap();
    fs::write(root.join("Misc/note.txt"), b"misc").unwrap();
}

fn load_tree(root: &Path) -> photo_export::MediaTree {
    let library = FolderLibrary::new(root).unwrap();
    Loader::new(library, FOLDER_SOURCE_ID).load().unwrap()
}

/// All paths under `dir`, relative, sorted. Symlinks are listed with the
/// file name of their target so structure comparisons see link identity.
fn tree_shape(dir: &Path) -> Vec<String> {
    let mut shape = Vec::new();
    collect_shape(dir, dir, &mut shape);
    shape.sort();
    shape
}

fn collect_shape(root: &Path, dir: &Path, shape: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap().flatten() {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
        let metadata = path.symlink_metadata().unwrap();
        if metadata.is_dir() {
            collect_shape(root, &path, shape);
            shape.push(format!("{}/", relative));
        } else if metadata.is_symlink() {
            // compare the store-relative tail of the target, not the
            // absolute destination prefix
            let target = fs::read_link(&path).unwrap();
            let tail: PathBuf = target
                .iter()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            shape.push(format!("{} -> {}", relative, tail.display()));
        } else {
            shape.push(relative);
        }
    }
}

#[test]
fn test_full_export_flow() {
    let temp = TempDir::new().unwrap();
    let library_root = temp.path().join("Photos");
    build_library(&library_root);

    let tree = load_tree(&library_root);
    let destination = temp.path().join("export");
    Exporter::new(&destination).export(&tree).unwrap();

    // Content store entries are sharded by identifier.
    let originals: Vec<_> = fs::read_dir(destination.join("Originals"))
        .unwrap()
        .flatten()
        .collect();
    assert!(!originals.is_empty());

    // The mirror hierarchy starts at the first group under the root.
    let jan = destination.join("Events/2020-01-01/IMG_1.HEIC");
    assert!(jan.symlink_metadata().unwrap().is_symlink());
    assert_eq!(fs::read(&jan).unwrap(), b"jan pixels");

    // The edited item gets both slots.
    let jun = destination.join("Events/2020-06-15/IMG_2.HEIC");
    let jun_derivative = destination.join("Events/2020-06-15/IMG_2-Derivative.HEIC");
    assert_eq!(fs::read(&jun).unwrap(), b"jun pixels");
    assert_eq!(fs::read(&jun_derivative).unwrap(), b"jun edited");

    // The stored copy is where the links point.
    let stored = fs::read_link(&jan).unwrap();
    assert!(stored.starts_with(destination.join("Originals")));
    assert_eq!(fs::read(&stored).unwrap(), b"jan pixels");

    assert_eq!(fs::read(destination.join("Misc/note.txt")).unwrap(), b"misc");
}

#[test]
fn test_rerun_into_same_destination_fails() {
    let temp = TempDir::new().unwrap();
    let library_root = temp.path().join("Photos");
    build_library(&library_root);

    let destination = temp.path().join("export");
    Exporter::new(&destination)
        .export(&load_tree(&library_root))
        .unwrap();

    let err = Exporter::new(&destination)
        .export(&load_tree(&library_root))
        .unwrap_err();
    assert!(matches!(err, ExportError::DestinationExists(_)));
}

#[test]
fn test_rerun_into_fresh_destination_is_isomorphic() {
    let temp = TempDir::new().unwrap();
    let library_root = temp.path().join("Photos");
    build_library(&library_root);

    let first = temp.path().join("export-a");
    let second = temp.path().join("export-b");
    Exporter::new(&first).export(&load_tree(&library_root)).unwrap();
    Exporter::new(&second).export(&load_tree(&library_root)).unwrap();

    assert_eq!(tree_shape(&first), tree_shape(&second));
}

#[test]
fn test_load_fails_for_wrong_source_identifier() {
    let temp = TempDir::new().unwrap();
    let library_root = temp.path().join("Photos");
    build_library(&library_root);

    let library = FolderLibrary::new(&library_root).unwrap();
    let err = Loader::new(library, "not-the-photos-source")
        .load()
        .unwrap_err();
    assert!(matches!(err, ExportError::PhotosNotFound(_)));
}
