use std::{
    cell::RefCell,
    collections::HashMap,
    fs::File,
    io::{self, Read},
    path::Path,
    rc::Rc,
};

use tracing::debug;

const PREVIEW_BYTES: usize = 4096;
const PREVIEW_LINES: usize = 3;
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Text,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewData {
    pub kind: PreviewKind,
    pub lines: Vec<String>,
}

#[derive(Debug, Default)]
struct PreviewTable {
    next_id: u64,
    entries: HashMap<u64, PreviewData>,
}

/// Registry of live file previews shared by every file field of a form.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    table: Rc<RefCell<PreviewTable>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the head of `path` and keeps it until the returned handle drops.
    pub fn create(&self, path: &Path) -> io::Result<PreviewHandle> {
        let data = load_preview(path)?;
        let mut table = self.table.borrow_mut();
        table.next_id += 1;
        let id = table.next_id;
        table.entries.insert(id, data);
        debug!(id, path = %path.display(), "preview created");
        Ok(PreviewHandle {
            id,
            registry: self.clone(),
        })
    }

    pub fn get(&self, id: u64) -> Option<PreviewData> {
        self.table.borrow().entries.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.table.borrow().entries.len()
    }

    fn release(&self, id: u64) {
        if self.table.borrow_mut().entries.remove(&id).is_some() {
            debug!(id, "preview released");
        }
    }
}

/// Owning handle to a preview; the registry entry is released on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn data(&self) -> Option<PreviewData> {
        self.registry.get(self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

pub(crate) fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_preview(path: &Path) -> io::Result<PreviewData> {
    let mut head = Vec::with_capacity(PREVIEW_BYTES);
    File::open(path)?
        .take(PREVIEW_BYTES as u64)
        .read_to_end(&mut head)?;

    if is_image(path) {
        return Ok(PreviewData {
            kind: PreviewKind::Image,
            lines: vec!["▣ image".to_string()],
        });
    }

    let text = match std::str::from_utf8(&head) {
        Ok(text) => Some(text),
        // a multi-byte character cut at the read boundary
        Err(err) if err.error_len().is_none() => std::str::from_utf8(&head[..err.valid_up_to()]).ok(),
        Err(_) => None,
    };
    match text {
        Some(text) if !text.contains('\0') => Ok(PreviewData {
            kind: PreviewKind::Text,
            lines: text
                .lines()
                .take(PREVIEW_LINES)
                .map(str::to_string)
                .collect(),
        }),
        _ => Ok(PreviewData {
            kind: PreviewKind::Binary,
            lines: vec!["▤ binary".to_string()],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::test_support::temp_file;
    use std::fs;

    #[test]
    fn handle_drop_releases_entry() {
        let path = temp_file(".txt", b"first\nsecond\nthird\nfourth");
        let registry = PreviewRegistry::new();
        let handle = registry.create(&path).unwrap();
        assert_eq!(registry.live_count(), 1);
        let data = handle.data().unwrap();
        assert_eq!(data.kind, PreviewKind::Text);
        assert_eq!(data.lines, vec!["first", "second", "third"]);
        drop(handle);
        assert_eq!(registry.live_count(), 0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn classifies_images_and_binaries() {
        let image = temp_file(".PNG", &[0x89, b'P', b'N', b'G']);
        let binary = temp_file(".bin", &[0, 159, 146, 150]);
        let registry = PreviewRegistry::new();
        assert_eq!(
            registry.create(&image).unwrap().data().unwrap().kind,
            PreviewKind::Image
        );
        assert_eq!(
            registry.create(&binary).unwrap().data().unwrap().kind,
            PreviewKind::Binary
        );
        assert_eq!(registry.live_count(), 0);
        let _ = fs::remove_file(image);
        let _ = fs::remove_file(binary);
    }

    #[test]
    fn missing_file_is_an_error() {
        let registry = PreviewRegistry::new();
        assert!(registry.create(Path::new("/definitely/not/here")).is_err());
        assert_eq!(registry.live_count(), 0);
    }
}
