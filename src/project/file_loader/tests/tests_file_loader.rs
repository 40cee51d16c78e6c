#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).expect("Failed to write file");
}

#[test]
fn test_is_package_source() {
    assert!(is_package_source(Path::new("svc/user.go")));
    assert!(!is_package_source(Path::new("svc/user_test.go")));
    assert!(!is_package_source(Path::new("svc/user.proto")));
    assert!(!is_package_source(Path::new("svc/go")));
}

#[test]
fn test_collect_file_paths_is_flat_and_sorted() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let dir = temp_dir.path();
    write(dir, "b.go", "package p");
    write(dir, "a.go", "package p");
    write(dir, "a_test.go", "package p");
    write(dir, "README.md", "# p");
    fs::create_dir(dir.join("sub")).unwrap();
    write(&dir.join("sub"), "c.go", "package sub");

    let paths = collect_file_paths(dir).unwrap();
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.go", "b.go"]);
}

#[test]
fn test_collect_file_paths_missing_dir() {
    let result = collect_file_paths(Path::new("/nonexistent/gokit/pkg"));
    assert!(result.is_err());
}

#[test]
fn test_fs_loader_first_root_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let pkg = "example.com/api/pb";
    fs::create_dir_all(second.path().join(pkg)).unwrap();
    write(&second.path().join(pkg), "types.go", "package pb\n");

    let loader = FsLoader::new([first.path().to_path_buf(), second.path().to_path_buf()]);
    let units = loader.load_package(pkg).unwrap().expect("package found");
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "package pb\n");
    assert!(units[0].parse().ok());

    assert!(loader.load_package("example.com/missing").unwrap().is_none());
}

#[test]
fn test_fs_loader_from_config() {
    let root = TempDir::new().unwrap();
    let config = Config::new().with_search_root(root.path());
    let loader = FsLoader::from_config(&config);
    assert_eq!(loader.roots(), &[root.path().to_path_buf()]);
}

#[test]
fn test_memory_loader() {
    let loader = MemoryLoader::new()
        .with_file("x/pb", "a.go", "package pb")
        .with_file("x/pb", "b.go", "package pb");
    assert_eq!(loader.load_package("x/pb").unwrap().unwrap().len(), 2);
    assert!(loader.load_package("x/other").unwrap().is_none());
}

#[test]
fn test_load_and_parse_empty_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let file_path = temp_dir.path().join("empty.go");
    fs::write(&file_path, "").expect("Failed to write empty file");

    let parse = load_and_parse(&file_path).unwrap();
    // An empty file has no package clause
    assert!(!parse.ok());
}

#[test]
fn test_load_and_parse_invalid_utf8() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let file_path = temp_dir.path().join("invalid.go");
    fs::write(&file_path, vec![0xFF, 0xFE, 0xFD]).expect("Failed to write invalid UTF-8");

    assert!(load_and_parse(&file_path).is_err(), "Should fail on invalid UTF-8");
}

#[test]
#[cfg(unix)]
fn test_collect_file_paths_follows_symlinks() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let real_file = temp_dir.path().join("real.go.txt");
    fs::write(&real_file, "package p").unwrap();
    std::os::unix::fs::symlink(&real_file, temp_dir.path().join("link.go")).unwrap();

    let paths = collect_file_paths(temp_dir.path()).unwrap();
    assert_eq!(paths.len(), 1);
}
