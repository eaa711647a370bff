use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::inference::domain::inference_provider::InferenceProvider;
use crate::shared::constants::{FACE_PROTOTXT_NAME, FACE_WEIGHTS_NAME};

use super::onnx_inference_provider::OnnxInferenceProvider;
use super::opencv_dnn_provider::OpencvDnnProvider;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to load {backend:?} model from {path}: {source}")]
    Backend {
        backend: Backend,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
}

/// Runtime used to execute a model file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    OnnxRuntime,
    OpencvDnn,
}

impl Backend {
    /// `.onnx` files run on ONNX Runtime; everything else (Caffe, TFLite,
    /// TensorFlow, Darknet) goes through OpenCV DNN.
    pub fn for_model(path: &Path) -> Self {
        let is_onnx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"));
        if is_onnx {
            Backend::OnnxRuntime
        } else {
            Backend::OpencvDnn
        }
    }
}

/// Loads the SSD face detector from a directory holding
/// `deploy.prototxt` and `res10_300x300_ssd_iter_140000.caffemodel`.
pub fn load_face_detector(face_dir: &Path) -> Result<Box<dyn InferenceProvider>, ModelLoadError> {
    let prototxt = existing(face_dir.join(FACE_PROTOTXT_NAME))?;
    let weights = existing(face_dir.join(FACE_WEIGHTS_NAME))?;
    log::info!("Loading face detector model from {}", face_dir.display());

    let provider = OpencvDnnProvider::from_caffe(&prototxt, &weights).map_err(|source| {
        ModelLoadError::Backend {
            backend: Backend::OpencvDnn,
            path: weights.clone(),
            source,
        }
    })?;
    Ok(Box::new(provider))
}

/// Loads the mask classifier, picking the backend from the file extension.
///
/// ONNX Runtime takes the classifier's NHWC batch as is; OpenCV DNN is told
/// the layout so it can permute to NCHW.
pub fn load_mask_classifier(
    model_path: &Path,
) -> Result<Box<dyn InferenceProvider>, ModelLoadError> {
    let path = existing(model_path.to_path_buf())?;
    let backend = Backend::for_model(&path);
    log::info!(
        "Loading face mask classifier from {} ({backend:?})",
        path.display()
    );

    let provider: Result<Box<dyn InferenceProvider>, _> = match backend {
        Backend::OnnxRuntime => OnnxInferenceProvider::new(&path)
            .map(|p| Box::new(p) as Box<dyn InferenceProvider>),
        Backend::OpencvDnn => {
            OpencvDnnProvider::from_file(&path, MaskClassifier::INPUT_LAYOUT)
                .map(|p| Box::new(p) as Box<dyn InferenceProvider>)
        }
    };
    provider.map_err(|source| ModelLoadError::Backend {
        backend,
        path,
        source,
    })
}

fn existing(path: PathBuf) -> Result<PathBuf, ModelLoadError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ModelLoadError::NotFound { path })
    }
}
