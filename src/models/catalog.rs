use once_cell::sync::Lazy;
use serde::Serialize;

const MIB: u64 = 1024 * 1024;

/// One supported model variant. Defined statically at process start and
/// immutable for the process lifetime.
///
/// `download_size_bytes` is approximate and used only to normalize the
/// filesystem-growth progress estimate; `resident_memory_bytes` is
/// informational, surfaced so the UI can warn on low-memory machines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub id: &'static str,
    /// Identifier the inference engine knows the model by.
    pub engine_id: &'static str,
    pub display_name: &'static str,
    pub download_size_bytes: u64,
    pub resident_memory_bytes: u64,
}

pub static CATALOG: Lazy<Vec<ModelDescriptor>> = Lazy::new(|| {
    vec![
        ModelDescriptor {
            id: "tiny",
            engine_id: "openai_whisper-tiny",
            display_name: "Tiny (Multilingual)",
            download_size_bytes: 150 * MIB,
            resident_memory_bytes: 390 * MIB,
        },
        ModelDescriptor {
            id: "tiny-en",
            engine_id: "openai_whisper-tiny.en",
            display_name: "Tiny (English)",
            download_size_bytes: 150 * MIB,
            resident_memory_bytes: 390 * MIB,
        },
        ModelDescriptor {
            id: "base",
            engine_id: "openai_whisper-base",
            display_name: "Base (Multilingual)",
            download_size_bytes: 290 * MIB,
            resident_memory_bytes: 560 * MIB,
        },
        ModelDescriptor {
            id: "small",
            engine_id: "openai_whisper-small",
            display_name: "Small (Multilingual)",
            download_size_bytes: 920 * MIB,
            resident_memory_bytes: 1400 * MIB,
        },
        ModelDescriptor {
            id: "large-v3-turbo",
            engine_id: "openai_whisper-large-v3-v20240930_turbo",
            display_name: "Large v3 Turbo",
            download_size_bytes: 1740 * MIB,
            resident_memory_bytes: 3200 * MIB,
        },
    ]
});

#[must_use]
pub fn descriptor(model_id: &str) -> Option<&'static ModelDescriptor> {
    CATALOG.iter().find(|descriptor| descriptor.id == model_id)
}
