pub mod execution_provider;
pub mod model_loader;
pub mod onnx_inference_provider;
pub mod opencv_dnn_provider;
