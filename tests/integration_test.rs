use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

use md5_tree::config::DigestSettings;
use md5_tree::utils::format_listing;
use md5_tree::{md5_all, Digest, FileReader, TreeDigester, TreeError};

#[tokio::test]
async fn test_nested_tree_recursive_and_flat() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    // 多层目录，每层都放文件
    fs::write(root.join("top.txt"), "top").unwrap();
    let mut dir = root.to_path_buf();
    for depth in 0..5 {
        dir = dir.join(format!("level{depth}"));
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("file.txt"), format!("depth {depth}")).unwrap();
    }

    let recursive = md5_all(root, true).await.unwrap();
    assert_eq!(recursive.len(), 6);
    assert_eq!(
        recursive[&root.join("level0/level1/file.txt")],
        Digest::of(b"depth 1")
    );

    let flat = md5_all(root, false).await.unwrap();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[&root.join("top.txt")], Digest::of(b"top"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_flat_mode_ignores_symlinked_directories() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("root");
    let elsewhere = temp_dir.path().join("elsewhere");
    fs::create_dir(&root).unwrap();
    fs::create_dir(&elsewhere).unwrap();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(elsewhere.join("hidden.txt"), "nope").unwrap();
    std::os::unix::fs::symlink(&elsewhere, root.join("linked")).unwrap();

    for recursive in [false, true] {
        let map = md5_all(&root, recursive).await.unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&root.join("a.txt")));
    }
}

#[tokio::test]
async fn test_listing_matches_cli_format() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("b.txt"), "world").unwrap();
    fs::write(root.join("a.txt"), "hello").unwrap();

    let map = md5_all(root, false).await.unwrap();
    let lines = format_listing(&map);

    assert_eq!(
        lines,
        vec![
            format!("5d41402abc4b2a76b9719d911017c592   {}", root.join("a.txt").display()),
            format!("7d793037a0760186574b0282f2f435e7   {}", root.join("b.txt").display()),
        ]
    );
}

struct FlakyReader;

impl FileReader for FlakyReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if path.ends_with("sub/broken.txt") {
            return Err(io::Error::new(io::ErrorKind::Other, "磁盘错误"));
        }
        fs::read(path)
    }
}

#[tokio::test]
async fn test_single_failure_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    for i in 0..30 {
        fs::write(root.join(format!("{i}.txt")), format!("{i}")).unwrap();
    }
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/broken.txt"), "x").unwrap();

    let settings = DigestSettings {
        recursive: true,
        workers: 5,
        ..DigestSettings::default()
    };
    let digester = TreeDigester::new(&settings).with_reader(Arc::new(FlakyReader));

    let err = digester.digest_all(root).await.unwrap_err();
    assert!(matches!(err, TreeError::Read { .. }));
    assert!(err.to_string().contains("broken.txt"));

    // 不递归时坏文件不会被访问
    let flat = TreeDigester::new(&DigestSettings::default())
        .with_reader(Arc::new(FlakyReader))
        .digest_all(root)
        .await
        .unwrap();
    assert_eq!(flat.len(), 30);
}

#[tokio::test]
async fn test_root_that_is_a_file() {
    let temp_dir = tempdir().unwrap();
    let file = temp_dir.path().join("single.txt");
    fs::write(&file, "hello").unwrap();

    let map = md5_all(&file, false).await.unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map[&file], Digest::of(b"hello"));
}

/// 根目录下 `0.txt`、`a/1.txt` 可读，`b/` 无法列出。
/// 返回 `b/` 路径；当前用户无视权限位（root）时返回 None。
#[cfg(unix)]
fn tree_with_unreadable_dir(root: &Path) -> Option<std::path::PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    fs::write(root.join("0.txt"), "zero").unwrap();
    fs::create_dir(root.join("a")).unwrap();
    fs::write(root.join("a/1.txt"), "one").unwrap();
    let locked = root.join("b");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("2.txt"), "two").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return None;
    }
    Some(locked)
}

#[cfg(unix)]
fn unlock(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
struct FailFirstReader;

#[cfg(unix)]
impl FileReader for FailFirstReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if path.ends_with("0.txt") {
            return Err(io::Error::new(io::ErrorKind::Other, "磁盘错误"));
        }
        fs::read(path)
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_traversal_error_after_files_sent() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let Some(locked) = tree_with_unreadable_dir(root) else {
        eprintln!("以 root 运行，跳过权限测试");
        return;
    };

    let outcome = md5_all(root, true).await;
    unlock(&locked);

    match outcome {
        Err(TreeError::Traversal { path, .. }) => assert_eq!(path, locked),
        other => panic!("应为遍历错误，实际为 {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_read_error_wins_over_later_traversal_error() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let Some(locked) = tree_with_unreadable_dir(root) else {
        eprintln!("以 root 运行，跳过权限测试");
        return;
    };

    let settings = DigestSettings {
        recursive: true,
        ..DigestSettings::default()
    };
    let outcome = TreeDigester::new(&settings)
        .with_reader(Arc::new(FailFirstReader))
        .digest_all(root)
        .await;
    unlock(&locked);

    match outcome {
        Err(TreeError::Read { path, .. }) => assert_eq!(path, root.join("0.txt")),
        other => panic!("应为读取错误，实际为 {other:?}"),
    }
}
