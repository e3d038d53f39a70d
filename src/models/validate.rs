use std::path::{Path, PathBuf};

use super::paths::StorePaths;

const CONFIG_FILE: &str = "config.json";
const AUDIO_ENCODER_DIR: &str = "AudioEncoder.mlmodelc";
const TEXT_DECODER_DIR: &str = "TextDecoder.mlmodelc";
const MEL_SPECTROGRAM_DIR: &str = "MelSpectrogram.mlmodelc";
const WEIGHT_FILE: &str = "weights/weight.bin";
const COMPILED_MODEL_FILE: &str = "model.mil";

/// Whether `bundle_root` holds a complete, loadable model bundle.
///
/// Pure function of current disk state. Any missing path, including a
/// missing root, means incomplete — absence is the normal state of an
/// in-progress or not-yet-started download, never an error. The text
/// decoder accepts `model.mil` in place of binary weights: smaller
/// variants ship the decoder in that compiled form.
#[must_use]
pub fn is_complete(bundle_root: &Path) -> bool {
    if !bundle_root.join(CONFIG_FILE).is_file() {
        return false;
    }
    if !bundle_root.join(AUDIO_ENCODER_DIR).join(WEIGHT_FILE).is_file() {
        return false;
    }

    let decoder = bundle_root.join(TEXT_DECODER_DIR);
    if !decoder.is_dir() {
        return false;
    }
    if !decoder.join(WEIGHT_FILE).is_file() && !decoder.join(COMPILED_MODEL_FILE).is_file() {
        return false;
    }

    bundle_root.join(MEL_SPECTROGRAM_DIR).exists()
}

/// Locate the complete bundle for `model_id`, nested layout first, flat
/// layout as fallback. Returns `None` when neither location is complete.
#[must_use]
pub fn locate_bundle(paths: &StorePaths, model_id: &str) -> Option<PathBuf> {
    let nested = paths.nested_dir(model_id);
    if is_complete(&nested) {
        return Some(nested);
    }
    let flat = paths.flat_dir(model_id);
    if is_complete(&flat) {
        return Some(flat);
    }
    None
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    /// Lay down a complete bundle with decoder binary weights.
    pub fn write_complete_bundle(root: &Path) {
        write_bundle(root, true, false);
    }

    /// Lay down a bundle, choosing which decoder artifacts exist.
    pub fn write_bundle(root: &Path, decoder_weights: bool, decoder_mil: bool) {
        fs::create_dir_all(root).expect("bundle root");
        write_file(&root.join(CONFIG_FILE), b"{}");
        write_file(
            &root.join(AUDIO_ENCODER_DIR).join(WEIGHT_FILE),
            &[0u8; 32],
        );
        let decoder = root.join(TEXT_DECODER_DIR);
        fs::create_dir_all(&decoder).expect("decoder dir");
        if decoder_weights {
            write_file(&decoder.join(WEIGHT_FILE), &[0u8; 32]);
        }
        if decoder_mil {
            write_file(&decoder.join(COMPILED_MODEL_FILE), &[0u8; 16]);
        }
        fs::create_dir_all(root.join(MEL_SPECTROGRAM_DIR)).expect("mel dir");
    }

    fn write_file(path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        File::create(path)
            .and_then(|mut file| file.write_all(contents))
            .expect("write file");
    }
}
