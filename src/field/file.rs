use std::{fs, path::Path};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;
use super::helpers::{cursor_span, handle_text_edit, muted_style, value_style};
use super::preview::{PreviewHandle, PreviewKind, PreviewRegistry, is_image};

/// One selected file as stored in the form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub mime: String,
}

impl FileEntry {
    fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::other("not a regular file"));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            path: path.display().to_string(),
            size: metadata.len(),
            mime: mime_for(path).to_string(),
        })
    }
}

/// Path input resolved against the filesystem on Enter. The value is always a
/// list of [`FileEntry`]; without `props.multiple` it holds one entry.
#[derive(Debug)]
pub struct FileComponent {
    descriptor: FieldDescriptor,
    buffer: String,
    committed: Option<String>,
    preview: Option<PreviewHandle>,
    previews: PreviewRegistry,
    multiple: bool,
    accept: Vec<String>,
}

impl FileComponent {
    pub fn new(descriptor: FieldDescriptor, previews: PreviewRegistry) -> Self {
        let multiple = descriptor.prop_bool("multiple").unwrap_or(false);
        let accept = descriptor
            .prop_str("accept")
            .map(|raw| {
                raw.split(',')
                    .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            descriptor,
            buffer: String::new(),
            committed: None,
            preview: None,
            previews,
            multiple,
            accept,
        }
    }

    pub fn input(&self) -> &str {
        &self.buffer
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    fn requested_paths(&self) -> Vec<String> {
        let raw = self.buffer.trim();
        if self.multiple {
            raw.split(',')
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(str::to_string)
                .collect()
        } else if raw.is_empty() {
            Vec::new()
        } else {
            vec![raw.to_string()]
        }
    }

    fn is_accepted(&self, path: &Path) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.accept.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    fn select(&mut self, controller: &mut dyn FormController) -> bool {
        let paths = self.requested_paths();
        if paths.is_empty() {
            return false;
        }
        let name = self.descriptor.name.clone();
        if self.committed.as_deref() == Some(self.buffer.as_str())
            && controller.value(&name).is_some()
        {
            return false;
        }

        let mut entries = Vec::with_capacity(paths.len());
        for raw in &paths {
            let path = Path::new(raw);
            if !self.is_accepted(path) {
                let accepted = self
                    .accept
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                controller.set_error(&name, format!("{raw} is not one of {accepted}"));
                return true;
            }
            match FileEntry::from_path(path) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    controller.set_error(&name, format!("{raw}: {err}"));
                    return true;
                }
            }
        }

        // old handle goes first so the registry never holds both
        self.preview = None;
        self.preview = self.open_preview(&entries[0].path);
        let value = entries
            .iter()
            .filter_map(|entry| serde_json::to_value(entry).ok())
            .collect();
        controller.set_value(&name, Some(Value::Array(value)));
        self.committed = Some(self.buffer.clone());
        true
    }

    /// Drops the selection, releases the preview and empties the input so the
    /// same path can be picked again.
    fn clear(&mut self, controller: &mut dyn FormController) -> bool {
        let had_value = controller.value(&self.descriptor.name).is_some();
        let had_input = !self.buffer.is_empty();
        self.preview = None;
        self.buffer.clear();
        self.committed = None;
        if had_value {
            controller.set_value(&self.descriptor.name, None);
        }
        had_value || had_input
    }

    fn open_preview(&self, path: &str) -> Option<PreviewHandle> {
        match self.previews.create(Path::new(path)) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(field = %self.descriptor.name, "failed to preview {path}: {err}");
                None
            }
        }
    }

    fn entries(&self, controller: &dyn FormController) -> Vec<FileEntry> {
        match controller.value(&self.descriptor.name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl FieldComponent for FileComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn sync(&mut self, controller: &dyn FormController) {
        self.preview = None;
        let entries = self.entries(controller);
        if entries.is_empty() {
            self.buffer.clear();
            self.committed = None;
            return;
        }
        self.buffer = entries
            .iter()
            .map(|entry| entry.path.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.committed = Some(self.buffer.clone());
        self.preview = self.open_preview(&entries[0].path);
    }

    fn body_height(&self) -> u16 {
        3
    }

    fn render_body(&self, controller: &dyn FormController, focused: bool) -> Vec<Line<'static>> {
        let mut input = vec![Span::styled("path: ", muted_style())];
        if self.buffer.is_empty() {
            let prompt = self
                .descriptor
                .prop_str("placeholder")
                .unwrap_or("type a path, Enter to attach");
            input.push(Span::styled(prompt.to_string(), muted_style()));
        } else {
            input.push(Span::styled(self.buffer.clone(), value_style()));
        }
        input.extend(cursor_span(focused));
        let mut lines = vec![Line::from(input)];

        let entries = self.entries(controller);
        if entries.is_empty() {
            lines.push(Line::from(Span::styled("no file selected", muted_style())));
            return lines;
        }
        let icon = if is_image(Path::new(&entries[0].path)) {
            "▣"
        } else {
            "▤"
        };
        let mut summary = vec![
            Span::styled(format!("{icon} "), Style::default().fg(Color::Cyan)),
            Span::styled(entries[0].name.clone(), value_style()),
            Span::styled(format!(" ({})", human_size(entries[0].size)), muted_style()),
        ];
        if entries.len() > 1 {
            summary.push(Span::styled(
                format!(" +{} more", entries.len() - 1),
                muted_style(),
            ));
        }
        summary.push(Span::styled("  ✕ Del", Style::default().fg(Color::Red)));
        lines.push(Line::from(summary));

        if let Some(data) = self.preview.as_ref().and_then(PreviewHandle::data)
            && data.kind == PreviewKind::Text
            && let Some(first) = data.lines.first()
        {
            lines.push(Line::from(Span::styled(format!("  {first}"), muted_style())));
        }
        lines
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        match key.code {
            KeyCode::Enter => self.select(controller),
            KeyCode::Delete => self.clear(controller),
            _ => handle_text_edit(&mut self.buffer, key),
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use crate::field::test_support::{key, plain, temp_file, typed};
    use crate::form::FormState;

    fn attach(file: &mut FileComponent, state: &mut FormState, path: &str) -> bool {
        for event in typed(path) {
            file.handle_key(&event, state);
        }
        file.handle_key(&key(KeyCode::Enter), state)
    }

    fn component(registry: &PreviewRegistry) -> FileComponent {
        FileComponent::new(
            FieldDescriptor::new("doc", "Document", FieldKind::File),
            registry.clone(),
        )
    }

    #[test]
    fn enter_stores_one_entry_and_creates_preview() {
        let path = temp_file(".txt", b"hello\nworld");
        let registry = PreviewRegistry::new();
        let mut state = FormState::new();
        let mut file = component(&registry);
        file.bind(&mut state);

        assert!(attach(&mut file, &mut state, &path.display().to_string()));
        let value = state.value("doc").unwrap().as_array().unwrap().clone();
        assert_eq!(value.len(), 1);
        assert_eq!(value[0]["mime"], "text/plain");
        assert_eq!(value[0]["size"], 11);
        assert_eq!(registry.live_count(), 1);
        assert!(plain(&file.render_body(&state, false)).contains("  hello"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn clearing_releases_preview_and_allows_reselect() {
        let path = temp_file(".txt", b"data");
        let raw = path.display().to_string();
        let registry = PreviewRegistry::new();
        let mut state = FormState::new();
        let mut file = component(&registry);
        file.bind(&mut state);

        assert!(attach(&mut file, &mut state, &raw));
        assert!(
            !file.handle_key(&key(KeyCode::Enter), &mut state),
            "same selection does not fire a change"
        );

        assert!(file.handle_key(&key(KeyCode::Delete), &mut state));
        assert_eq!(registry.live_count(), 0);
        assert_eq!(file.input(), "");
        assert!(state.value("doc").is_none());

        assert!(attach(&mut file, &mut state, &raw), "re-selecting fires again");
        assert_eq!(registry.live_count(), 1);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn replacing_selection_releases_old_preview() {
        let first = temp_file(".txt", b"one");
        let second = temp_file(".txt", b"two");
        let registry = PreviewRegistry::new();
        let mut state = FormState::new();
        let mut file = component(&registry);
        file.bind(&mut state);

        attach(&mut file, &mut state, &first.display().to_string());
        let first_id = file.preview().unwrap().id();
        file.handle_key(&KeyEvent::from(KeyCode::Delete), &mut state);
        attach(&mut file, &mut state, &second.display().to_string());
        assert_eq!(registry.live_count(), 1);
        assert!(registry.get(first_id).is_none());
        let _ = std::fs::remove_file(first);
        let _ = std::fs::remove_file(second);
    }

    #[test]
    fn missing_path_sets_field_error() {
        let registry = PreviewRegistry::new();
        let mut state = FormState::new();
        let mut file = component(&registry);
        file.bind(&mut state);
        assert!(attach(&mut file, &mut state, "/no/such/file.txt"));
        assert!(state.error("doc").is_some());
        assert!(state.value("doc").is_none());
    }

    #[test]
    fn accept_filter_rejects_other_extensions() {
        let path = temp_file(".txt", b"x");
        let registry = PreviewRegistry::new();
        let mut state = FormState::new();
        let mut file = FileComponent::new(
            FieldDescriptor::new("img", "Image", FieldKind::File).with_prop("accept", ".png,.jpg"),
            registry,
        );
        file.bind(&mut state);
        attach(&mut file, &mut state, &path.display().to_string());
        assert!(state.error("img").unwrap().contains(".png, .jpg"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn multiple_paths_are_split() {
        let a = temp_file(".md", b"# a");
        let b = temp_file(".csv", b"x,y");
        let registry = PreviewRegistry::new();
        let mut state = FormState::new();
        let mut file = FileComponent::new(
            FieldDescriptor::new("docs", "Docs", FieldKind::File).with_prop("multiple", true),
            registry.clone(),
        );
        file.bind(&mut state);
        let input = format!("{}, {}", a.display(), b.display());
        attach(&mut file, &mut state, &input);
        let value = state.value("docs").unwrap().as_array().unwrap().clone();
        assert_eq!(value.len(), 2);
        assert_eq!(value[1]["mime"], "text/csv");
        assert_eq!(registry.live_count(), 1);
        let _ = std::fs::remove_file(a);
        let _ = std::fs::remove_file(b);
    }

    #[test]
    fn human_sizes() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
    }
}
