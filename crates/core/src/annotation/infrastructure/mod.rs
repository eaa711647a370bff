pub mod opencv_frame_annotator;
