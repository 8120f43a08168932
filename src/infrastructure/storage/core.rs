use std::path::{Component, Path, PathBuf};

/// Lower-cased extension of an uploaded file name, limited to a sane charset.
pub fn sanitized_extension(original: Option<&str>) -> Option<String> {
    let ext = Path::new(original?).extension()?.to_str()?.to_ascii_lowercase();
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// Storage name for an upload: unix timestamp with microseconds, a random
/// suffix against collisions, and the original extension.
pub fn generate_file_name(original: Option<&str>, now: chrono::DateTime<chrono::Utc>) -> String {
    let stamp = format!("{}{:06}", now.timestamp(), now.timestamp_subsec_micros());
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    match sanitized_extension(original) {
        Some(ext) => format!("{}_{}.{}", stamp, &suffix[..8], ext),
        None => format!("{}_{}", stamp, &suffix[..8]),
    }
}

/// Joins a stored relative path onto the uploads root, rejecting anything
/// that could escape it.
pub fn resolve_under(root: &Path, relative: &str) -> anyhow::Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => continue,
            _ => anyhow::bail!("forbidden"),
        }
    }
    if clean.as_os_str().is_empty() {
        anyhow::bail!("forbidden");
    }
    Ok(root.join(clean))
}

pub fn relative_from_uploads(uploads_root: &Path, full: &Path) -> String {
    match full.strip_prefix(uploads_root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => full.to_string_lossy().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_filtered() {
        assert_eq!(sanitized_extension(Some("Photo.JPG")).as_deref(), Some("jpg"));
        assert_eq!(sanitized_extension(Some("archive.tar.gz")).as_deref(), Some("gz"));
        assert_eq!(sanitized_extension(Some("noext")), None);
        assert_eq!(sanitized_extension(Some("weird.p/ng")), None);
        assert_eq!(sanitized_extension(None), None);
    }

    #[test]
    fn generated_names_keep_extension_and_differ() {
        let now = chrono::Utc::now();
        let a = generate_file_name(Some("cat.png"), now);
        let b = generate_file_name(Some("cat.png"), now);
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_rejects_traversal() {
        let root = Path::new("/srv/uploads");
        assert_eq!(
            resolve_under(root, "images/a.png").unwrap(),
            PathBuf::from("/srv/uploads/images/a.png")
        );
        assert!(resolve_under(root, "../etc/passwd").is_err());
        assert!(resolve_under(root, "/etc/passwd").is_err());
        assert!(resolve_under(root, "").is_err());
    }
}
