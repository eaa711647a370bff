pub mod highgui_display;
pub mod opencv_camera;
