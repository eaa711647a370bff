/// Inference provider backed by an OpenCV DNN network.
///
/// Loads Caffe (`prototxt` + `caffemodel`) pairs and any single-file format
/// `cv::dnn::readNet` understands, including TFLite. OpenCV blobs are always
/// NCHW, so NHWC batches are permuted before they reach the network.
use std::path::Path;

use ndarray::{Array4, ArrayD, IxDyn};
use opencv::core::{Mat, Scalar, CV_32F};
use opencv::dnn;
use opencv::prelude::*;

use crate::inference::domain::inference_provider::{InferenceProvider, TensorLayout};

pub struct OpencvDnnProvider {
    net: dnn::Net,
    input_layout: TensorLayout,
}

impl OpencvDnnProvider {
    pub fn from_caffe(prototxt: &Path, weights: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let net = dnn::read_net_from_caffe(&path_str(prototxt)?, &path_str(weights)?)?;
        Self::from_net(net, TensorLayout::Nchw)
    }

    /// Load a single-file model; the format is inferred from the extension.
    /// `input_layout` is the order the caller's batches arrive in.
    pub fn from_file(
        model: &Path,
        input_layout: TensorLayout,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let net = dnn::read_net(&path_str(model)?, "", "")?;
        Self::from_net(net, input_layout)
    }

    fn from_net(
        net: dnn::Net,
        input_layout: TensorLayout,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if net.empty()? {
            return Err("OpenCV DNN loaded an empty network".into());
        }
        Ok(Self { net, input_layout })
    }
}

impl InferenceProvider for OpencvDnnProvider {
    fn infer(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
        let blob = array_to_mat(into_nchw(input, self.input_layout))?;
        self.net.set_input(&blob, "", 1.0, Scalar::default())?;
        let output = self.net.forward_single("")?;
        mat_to_array(&output)
    }
}

fn path_str(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| format!("Model path is not valid UTF-8: {}", path.display()).into())
}

fn into_nchw(input: Array4<f32>, layout: TensorLayout) -> Array4<f32> {
    match layout {
        TensorLayout::Nchw => input,
        TensorLayout::Nhwc => input
            .permuted_axes([0, 3, 1, 2])
            .as_standard_layout()
            .into_owned(),
    }
}

fn array_to_mat(input: Array4<f32>) -> Result<Mat, Box<dyn std::error::Error>> {
    let sizes: Vec<i32> = input.shape().iter().map(|&d| d as i32).collect();
    let mut mat = Mat::new_nd_with_default(&sizes, CV_32F, Scalar::all(0.0))?;
    let input = input.as_standard_layout();
    let values = input.as_slice().ok_or("Cannot get input tensor slice")?;
    mat.data_typed_mut::<f32>()?.copy_from_slice(values);
    Ok(mat)
}

fn mat_to_array(mat: &Mat) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
    let dims: Vec<usize> = mat.mat_size().iter().map(|&d| d as usize).collect();
    let values = mat.data_typed::<f32>()?.to_vec();
    Ok(ArrayD::from_shape_vec(IxDyn(&dims), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::face_crop::FaceCrop;
    use crate::classification::domain::mask_classifier::MaskClassifier;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::frame::Frame;
    use ndarray::{stack, Axis};

    #[test]
    fn test_array_mat_round_trip_keeps_layout() {
        let input = Array4::from_shape_fn((1, 3, 2, 4), |(_, c, y, x)| (c * 100 + y * 10 + x) as f32);
        let mat = array_to_mat(input.clone()).unwrap();
        assert_eq!(mat.dims(), 4);

        let back = mat_to_array(&mat).unwrap();
        assert_eq!(back.shape(), &[1, 3, 2, 4]);
        assert_eq!(back[[0, 2, 1, 3]], 213.0);
        assert_eq!(back, input.into_dyn());
    }

    #[test]
    fn test_classifier_batch_reaches_network_as_nchw() {
        // Two crops of different colors, stacked the way MaskClassifier does.
        let frame = Frame::filled(30, 30, [255, 128, 0], 0);
        let bbox = BoundingBox::clamped(0, 0, 30, 30, 30, 30).unwrap();
        let first = FaceCrop::from_frame(&frame, &bbox).unwrap();
        let second = FaceCrop::from_frame(&Frame::filled(30, 30, [0, 0, 255], 0), &bbox).unwrap();
        let batch = stack(Axis(0), &[first.pixels(), second.pixels()]).unwrap();
        assert_eq!(batch.shape(), &[2, 224, 224, 3]);

        let blob = into_nchw(batch.clone(), MaskClassifier::INPUT_LAYOUT);
        assert_eq!(blob.shape(), &[2, 3, 224, 224]);
        assert!(blob.is_standard_layout());
        for ((n, c, y, x), &v) in blob.indexed_iter() {
            assert_eq!(v, batch[[n, y, x, c]]);
        }

        let mat = array_to_mat(blob).unwrap();
        let sizes: Vec<i32> = mat.mat_size().iter().copied().collect();
        assert_eq!(sizes, vec![2, 3, 224, 224]);
    }

    #[test]
    fn test_nchw_input_is_passed_through() {
        let input = Array4::from_shape_fn((1, 3, 4, 5), |(_, c, y, x)| (c + y + x) as f32);
        assert_eq!(into_nchw(input.clone(), TensorLayout::Nchw), input);
    }

    #[test]
    fn test_missing_model_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.tflite");
        assert!(OpencvDnnProvider::from_file(&missing, TensorLayout::Nhwc).is_err());
    }
}
