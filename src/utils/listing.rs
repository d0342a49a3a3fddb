use crate::models::DigestMap;

/// 按路径排序，生成每行 `摘要   路径` 的输出
pub fn format_listing(map: &DigestMap) -> Vec<String> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries
        .into_iter()
        .map(|(path, digest)| format!("{}   {}", digest, path.display()))
        .collect()
}
